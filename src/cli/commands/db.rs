use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::snapshot;
use crate::db::migrate::run_pending_migrations;
use crate::db::{Store, integrity, stats};
use crate::errors::AppResult;
use crate::kv::KvStore;
use crate::ui::messages::{FG_CYAN, FG_GREEN, FG_RED, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        repair,
        vacuum,
        info,
    } = cmd
    {
        // Unica istanza condivisa
        let mut store: Option<Store> = None;

        // Helper per ottenere lo Store (NON closure!)
        fn get_store<'a>(store: &'a mut Option<Store>, db_path: &str) -> AppResult<&'a mut Store> {
            if store.is_none() {
                *store = Some(Store::open(db_path)?);
            }
            Ok(store.as_mut().unwrap())
        }

        //
        // 1) MIGRATE
        //
        if *migrate {
            let store = get_store(&mut store, &cfg.database)?;
            println!("{}▶ Running migrations…{}", FG_CYAN, RESET);
            run_pending_migrations(&store.conn)?;
            println!("{}✔ Migration completed.{}\n", FG_GREEN, RESET);
        }

        //
        // 2) INFO
        //
        if *info {
            let store = get_store(&mut store, &cfg.database)?;
            stats::print_db_info(store)?;
        }

        //
        // 3) CHECK
        //
        if *check {
            let store = get_store(&mut store, &cfg.database)?;

            println!("{}▶ Running integrity check…{}", FG_CYAN, RESET);

            let sqlite_check: String = store
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if sqlite_check == "ok" {
                println!("{}✔ SQLite integrity check passed.{}", FG_GREEN, RESET);
            } else {
                println!(
                    "{}✘ SQLite integrity check failed:{} {}",
                    FG_RED, RESET, sqlite_check
                );
            }

            let report = integrity::check_integrity(store)?;
            if report.has_duplicates() {
                println!(
                    "{}✘ Duplicate timestamps found:{} {} uro, {} hydro, {} kegel",
                    FG_RED,
                    RESET,
                    report.uro_duplicates,
                    report.hydro_duplicates,
                    report.kegel_duplicates
                );
                println!("  Run `flowtracker db --repair` to remove them.\n");
            } else {
                println!("{}✔ No duplicate timestamps.{}\n", FG_GREEN, RESET);
            }
        }

        //
        // 4) REPAIR
        //
        if *repair {
            let store = get_store(&mut store, &cfg.database)?;
            println!("{}▶ Repairing duplicate timestamps…{}", FG_CYAN, RESET);

            let report = integrity::repair_duplicates(store)?;
            if report.total_removed() == 0 {
                println!("{}✔ Nothing to repair.{}\n", FG_GREEN, RESET);
            } else {
                println!(
                    "{}✔ Removed {} duplicate record(s){} ({} uro, {} hydro, {} kegel)",
                    FG_GREEN,
                    report.total_removed(),
                    RESET,
                    report.uro_removed,
                    report.hydro_removed,
                    report.kegel_removed
                );
                if report.had_conflicts {
                    println!(
                        "  Some duplicates differed in content; the most recently stored record was kept."
                    );
                }
                println!();

                let kv = KvStore::for_database(&cfg.database)?;
                snapshot::create_auto_backup(store, &kv);
            }
        }

        //
        // 5) VACUUM
        //
        if *vacuum {
            let store = get_store(&mut store, &cfg.database)?;
            println!("{}▶ Running VACUUM…{}", FG_CYAN, RESET);

            store.conn.execute_batch("VACUUM;")?;

            println!("{}✔ Vacuum completed.{}\n", FG_GREEN, RESET);
        }
    }

    Ok(())
}
