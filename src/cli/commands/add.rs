use crate::cli::commands::{open_store, refresh_snapshot};
use crate::cli::parser::{AddCommands, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::{CustomResource, HydroLogEntry, KegelLogEntry, UroLogEntry};
use crate::ui::messages::success;
use crate::utils::timestamp;

/// Resolve the entry timestamp: the given value (validated) or now.
fn resolve_timestamp(at: &Option<String>) -> AppResult<String> {
    match at {
        Some(ts) => {
            timestamp::parse_rfc3339(ts)?;
            Ok(ts.clone())
        }
        None => Ok(timestamp::now_rfc3339()),
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Add { entry } = cmd else {
        return Ok(());
    };

    let (mut store, kv) = open_store(cfg)?;

    match entry {
        AddCommands::Uro {
            at,
            volume,
            duration,
            flow_rate,
            color,
            urgency,
            concerns,
            notes,
        } => {
            let record = UroLogEntry {
                timestamp: resolve_timestamp(at)?,
                volume: *volume,
                duration: *duration,
                flow_rate: flow_rate.unwrap_or(0.0),
                color: color.clone().unwrap_or_default(),
                urgency: urgency.clone().unwrap_or_default(),
                concerns: concerns.clone(),
                notes: notes.clone(),
                is_demo: false,
            };
            store.add_uro(&record)?;
            success(format!(
                "Uro log added at {} ({} mL, {:.1} mL/s)",
                record.timestamp,
                record.volume,
                record.effective_flow_rate()
            ));
        }

        AddCommands::Hydro {
            at,
            beverage,
            custom_type,
            amount,
            unit,
            notes,
        } => {
            let record = HydroLogEntry {
                timestamp: resolve_timestamp(at)?,
                beverage_type: beverage.clone(),
                custom_type: custom_type.clone(),
                amount: *amount,
                unit: unit.clone().unwrap_or_else(|| cfg.default_unit.clone()),
                notes: notes.clone(),
                is_demo: false,
            };
            store.add_hydro(&record)?;
            success(format!(
                "Hydro log added at {} ({} {} {})",
                record.timestamp,
                record.amount,
                record.unit,
                record.label()
            ));
        }

        AddCommands::Kegel {
            at,
            reps,
            hold_time,
            sets,
            total_time,
            incomplete,
        } => {
            let record = KegelLogEntry {
                timestamp: resolve_timestamp(at)?,
                reps: *reps,
                hold_time: *hold_time,
                sets: *sets,
                total_time: total_time
                    .unwrap_or_else(|| *reps as f64 * *hold_time * *sets as f64),
                completed: !incomplete,
                is_demo: false,
            };
            store.add_kegel(&record)?;
            success(format!(
                "Kegel log added at {} ({} reps x {} sets)",
                record.timestamp, record.reps, record.sets
            ));
        }

        AddCommands::Resource {
            title,
            url,
            category,
        } => {
            let resource = CustomResource::new(title, url, category);
            store.put_resource(&resource)?;
            success(format!("Resource saved: {} [{}]", resource.title, resource.id));
        }
    }

    refresh_snapshot(&store, &kv);
    Ok(())
}
