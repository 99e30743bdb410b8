use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::snapshot;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Snapshot {
        create,
        restore,
        status,
    } = cmd
    {
        let (mut store, kv) = open_store(cfg)?;

        if *create {
            if snapshot::create_auto_backup(&store, &kv) {
                success("Snapshot written.");
            } else {
                warning("Nothing to snapshot (database is empty).");
            }
        }

        if *restore {
            if snapshot::restore_from_auto_backup(&mut store, &kv) {
                let counts = store.database_counts()?;
                success(format!("Snapshot restored ({} records).", counts.total()));
            } else if !snapshot::has_auto_backup(&kv) {
                warning("No snapshot to restore.");
            } else {
                warning(
                    "Database is not empty; a snapshot is only restored into an empty database.",
                );
            }
        }

        if *status {
            match snapshot::read_auto_backup(&kv) {
                Some(s) => {
                    info(format!("Snapshot taken at {}", s.timestamp));
                    println!(
                        "  {} uro, {} hydro, {} kegel record(s)",
                        s.uro_logs.len(),
                        s.hydro_logs.len(),
                        s.kegel_logs.len()
                    );
                }
                None => info("No snapshot present."),
            }
        }
    }

    Ok(())
}
