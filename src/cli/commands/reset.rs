use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::reset::{ResetOptions, reset_database};
use crate::db::Store;
use crate::errors::{AppError, AppResult};
use crate::kv::{AUTO_BACKUP_KEY, KvStore};
use crate::ui::messages::{info, success, warning};
use std::io::{Write, stdin, stdout};

/// Phrase required to confirm a full database deletion.
const CONFIRM_PHRASE: &str = "DELETE ALL DATA";

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Reset {
        clear_data,
        delete_database,
        yes,
    } = cmd
    else {
        return Ok(());
    };

    if !*clear_data && !*delete_database {
        warning("No reset mode selected; use --clear-data or --delete-database.");
        return Ok(());
    }
    if *clear_data && *delete_database {
        return Err(AppError::Reset(
            "--clear-data and --delete-database are mutually exclusive".into(),
        ));
    }

    if !*yes {
        let confirmed = if *delete_database {
            confirm_phrase()?
        } else {
            confirm_simple()?
        };
        if !confirmed {
            info("Reset cancelled.");
            return Ok(());
        }
    }

    // No startup restore here: restoring a snapshot right before wiping it
    // out would be pointless work.
    let mut store = Store::open(&cfg.database)?;
    let kv = KvStore::for_database(&cfg.database)?;

    let options = ResetOptions {
        clear_data: *clear_data,
        delete_database: *delete_database,
    };
    let outcome = reset_database(&mut store, options, |step| {
        println!("  … {step}");
    });

    if !outcome.success {
        return Err(AppError::Reset(outcome.message));
    }

    // Drop the auto-backup snapshot as well, so the next startup's
    // restore-on-empty pass cannot quietly undo the reset.
    kv.remove(AUTO_BACKUP_KEY)?;

    success(outcome.message);
    Ok(())
}

fn confirm_simple() -> AppResult<bool> {
    warning("--clear-data will delete every record in the database.");
    print!("Continue? [y/N]: ");
    stdout().flush().ok();

    let mut answer = String::new();
    if stdin().read_line(&mut answer).is_err() {
        return Ok(false);
    }
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn confirm_phrase() -> AppResult<bool> {
    warning("--delete-database will remove the database file entirely.");
    print!("Type '{CONFIRM_PHRASE}' to confirm: ");
    stdout().flush().ok();

    let mut answer = String::new();
    if stdin().read_line(&mut answer).is_err() {
        return Ok(false);
    }
    Ok(answer.trim() == CONFIRM_PHRASE)
}
