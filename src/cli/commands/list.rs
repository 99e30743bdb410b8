use crate::cli::commands::open_store;
use crate::cli::parser::{Commands, ListTarget};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{BOLD, FG_CYAN, FG_GREY, RESET, info};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::List { what } = cmd else {
        return Ok(());
    };

    let (store, _kv) = open_store(cfg)?;

    match what {
        ListTarget::Uro => {
            let rows = store.uro_logs()?;
            if rows.is_empty() {
                info("No uro logs recorded.");
                return Ok(());
            }
            println!(
                "{}{}{:<26} {:>8} {:>8} {:>8}  {:<12} {:<8}{}",
                BOLD, FG_CYAN, "Timestamp", "mL", "sec", "mL/s", "Color", "Urgency", RESET
            );
            for e in &rows {
                println!(
                    "{:<26} {:>8.0} {:>8.0} {:>8.1}  {:<12} {:<8}",
                    e.timestamp,
                    e.volume,
                    e.duration,
                    e.effective_flow_rate(),
                    e.color,
                    e.urgency
                );
                if let Some(notes) = &e.notes {
                    println!("{}  └ {}{}", FG_GREY, notes, RESET);
                }
            }
            footer(cfg, rows.len(), "record");
        }

        ListTarget::Hydro => {
            let rows = store.hydro_logs()?;
            if rows.is_empty() {
                info("No hydro logs recorded.");
                return Ok(());
            }
            println!(
                "{}{}{:<26} {:<16} {:>8} {:<4}{}",
                BOLD, FG_CYAN, "Timestamp", "Beverage", "Amount", "Unit", RESET
            );
            for e in &rows {
                println!(
                    "{:<26} {:<16} {:>8.0} {:<4}",
                    e.timestamp,
                    e.label(),
                    e.amount,
                    e.unit
                );
            }
            footer(cfg, rows.len(), "record");
        }

        ListTarget::Kegel => {
            let rows = store.kegel_logs()?;
            if rows.is_empty() {
                info("No kegel logs recorded.");
                return Ok(());
            }
            println!(
                "{}{}{:<26} {:>6} {:>6} {:>8} {:>10}  {}{}",
                BOLD, FG_CYAN, "Timestamp", "Reps", "Sets", "Hold(s)", "Total(s)", "Done", RESET
            );
            for e in &rows {
                println!(
                    "{:<26} {:>6} {:>6} {:>8.1} {:>10.1}  {}",
                    e.timestamp,
                    e.reps,
                    e.sets,
                    e.hold_time,
                    e.total_time,
                    if e.completed { "✔" } else { "✘" }
                );
            }
            footer(cfg, rows.len(), "record");
        }

        ListTarget::Resources => {
            let rows = store.resources()?;
            if rows.is_empty() {
                info("No custom resources saved.");
                return Ok(());
            }
            println!(
                "{}{}{:<24} {:<28} {:<12} {}{}",
                BOLD, FG_CYAN, "Id", "Title", "Category", "Url", RESET
            );
            for r in &rows {
                println!("{:<24} {:<28} {:<12} {}", r.id, r.title, r.category, r.url);
            }
            footer(cfg, rows.len(), "resource");
        }
    }

    Ok(())
}

/// Separator line plus a count, closing every listing.
fn footer(cfg: &Config, n: usize, noun: &str) {
    println!("{}{}{}", FG_GREY, cfg.separator_char.repeat(56), RESET);
    println!("{}{} {}(s){}", FG_GREY, n, noun, RESET);
}
