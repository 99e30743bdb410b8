use crate::cli::commands::{open_store, refresh_snapshot};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::import;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::io::{Write, stdin, stdout};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Import { file, replace, yes } = cmd else {
        return Ok(());
    };

    let raw = fs::read_to_string(file)?;
    // Shape validation happens before the store is touched.
    let doc = import::parse_import(&raw)?;

    let (mut store, kv) = open_store(cfg)?;

    if *replace {
        if !*yes && !confirm_replace()? {
            info("Import cancelled.");
            return Ok(());
        }
        let report = import::restore_snapshot(&mut store, &kv, &doc)?;
        success(format!(
            "Snapshot restored: {} uro, {} hydro, {} kegel, {} resource(s).",
            report.uro_logs, report.hydro_logs, report.kegel_logs, report.resources
        ));
    } else {
        let report = import::merge_import(&mut store, &kv, &doc)?;
        success(format!(
            "Import completed: {} new record(s), {} duplicate(s) skipped, {} resource(s).",
            report.imported, report.skipped, report.resources
        ));
    }

    refresh_snapshot(&store, &kv);
    Ok(())
}

fn confirm_replace() -> AppResult<bool> {
    warning("--replace will DELETE the existing records in every collection the file contains.");
    print!("Continue? [y/N]: ");
    stdout().flush().ok();

    let mut answer = String::new();
    if stdin().read_line(&mut answer).is_err() {
        return Ok(false);
    }
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
