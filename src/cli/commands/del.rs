use crate::cli::commands::{open_store, refresh_snapshot};
use crate::cli::parser::{Commands, DelTarget};
use crate::config::Config;
use crate::db::Collection;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Del { collection, key } = cmd else {
        return Ok(());
    };

    let (store, kv) = open_store(cfg)?;

    let target = match collection {
        DelTarget::Uro => Some(Collection::Uro),
        DelTarget::Hydro => Some(Collection::Hydro),
        DelTarget::Kegel => Some(Collection::Kegel),
        DelTarget::Resource => None,
    };

    match target {
        Some(target) => {
            if store.timestamp_exists(target, key)? {
                store.delete(target, key)?;
                success(format!("Deleted {} entry at {}", target.label(), key));
                refresh_snapshot(&store, &kv);
            } else {
                warning(format!("No {} entry at {}", target.label(), key));
            }
        }
        None => {
            if store.resource_by_id(key)?.is_some() {
                store.delete_resource(key)?;
                success(format!("Deleted resource {key}"));
            } else {
                warning(format!("No resource with id {key}"));
            }
        }
    }

    Ok(())
}
