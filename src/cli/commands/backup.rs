use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::db::Store;
use crate::errors::{AppError, AppResult};
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = cmd
    {
        // Opening the store would create an empty file; check first.
        if !Path::new(&cfg.database).exists() {
            return Err(AppError::Backup(format!(
                "Database not found: {}",
                cfg.database
            )));
        }
        let store = Store::open(&cfg.database)?;
        BackupLogic::backup(&store, file, *compress, *force)?;
    }

    Ok(())
}
