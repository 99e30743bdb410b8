use crate::db::Store;
use crate::errors::AppResult;
use crate::ui::messages::{FG_CYAN, FG_GREEN, FG_YELLOW, RESET};
use std::fs;

/// Print database diagnostics: file, size, schema version, tables, counts.
pub fn print_db_info(store: &Store) -> AppResult<()> {
    println!();

    let info = store.database_info()?;

    let file_size = fs::metadata(&info.path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", FG_CYAN, RESET, FG_YELLOW, info.path, RESET);
    println!("{}• Size:{} {:.2} MB", FG_CYAN, RESET, file_mb);
    println!("{}• Schema version:{} {}", FG_CYAN, RESET, info.version);
    println!("{}• Tables:{} {}", FG_CYAN, RESET, info.table_names.join(", "));

    println!("{}• Entry counts:{}", FG_CYAN, RESET);
    println!(
        "    uro logs:   {}{}{}",
        FG_GREEN, info.counts.uro_logs, RESET
    );
    println!(
        "    hydro logs: {}{}{}",
        FG_GREEN, info.counts.hydro_logs, RESET
    );
    println!(
        "    kegel logs: {}{}{}",
        FG_GREEN, info.counts.kegel_logs, RESET
    );
    println!("    resources:  {}{}{}", FG_GREEN, info.resources, RESET);

    println!();
    Ok(())
}
