use crate::cli::commands::open_store;
use crate::cli::parser::{Commands, ExportFormat};
use crate::config::Config;
use crate::core::export;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        file,
        format,
        force,
    } = cmd
    {
        let (store, kv) = open_store(cfg)?;

        let file = file
            .clone()
            .unwrap_or_else(export::default_export_filename);

        match format {
            ExportFormat::Json => export::export_json(&store, &kv, &file, *force)?,
            ExportFormat::Csv => export::export_csv(&store, &file, *force)?,
        }
    }

    Ok(())
}
