//! Duplicate-key detection and repair.
//!
//! Timestamp uniqueness is enforced by the insert paths, but duplicates can
//! still arrive through legacy data, raw SQL, or buggy past migrations.
//! `check_integrity` is a pure read; `repair_duplicates` rebuilds each
//! affected collection from a unique-by-timestamp projection.

use crate::db::{Collection, Store, insert_hydro, insert_kegel, insert_uro, log};
use crate::errors::AppResult;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    pub uro_duplicates: i64,
    pub hydro_duplicates: i64,
    pub kegel_duplicates: i64,
}

impl IntegrityReport {
    pub fn has_duplicates(&self) -> bool {
        self.uro_duplicates + self.hydro_duplicates + self.kegel_duplicates > 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub uro_removed: usize,
    pub hydro_removed: usize,
    pub kegel_removed: usize,
    /// True when at least one dropped duplicate differed in content from
    /// the record that survived (i.e. the duplicates were not byte-identical).
    pub had_conflicts: bool,
}

impl RepairReport {
    pub fn total_removed(&self) -> usize {
        self.uro_removed + self.hydro_removed + self.kegel_removed
    }
}

/// Count duplicate timestamps per collection. No side effects.
pub fn check_integrity(store: &Store) -> AppResult<IntegrityReport> {
    Ok(IntegrityReport {
        uro_duplicates: duplicate_count(store, Collection::Uro)?,
        hydro_duplicates: duplicate_count(store, Collection::Hydro)?,
        kegel_duplicates: duplicate_count(store, Collection::Kegel)?,
    })
}

fn duplicate_count(store: &Store, collection: Collection) -> AppResult<i64> {
    let sql = format!(
        "SELECT COUNT(*) - COUNT(DISTINCT timestamp) FROM {}",
        collection.table()
    );
    let n: i64 = store.conn.query_row(&sql, [], |r| r.get(0))?;
    Ok(n)
}

/// Deduplicate every collection using the explicit `lastWriteWins` policy:
/// when duplicate-keyed records differ, the one stored last silently wins.
///
/// Each collection is rebuilt inside a single transaction; clear and
/// refill commit together, so a crash mid-repair cannot leave a collection
/// half-cleared without its replacement data.
pub fn repair_duplicates(store: &mut Store) -> AppResult<RepairReport> {
    let mut report = RepairReport::default();

    report.uro_removed = {
        let rows = store.uro_logs()?;
        let (survivors, conflicts) = project_last_write_wins(rows, |e| e.timestamp.clone());
        report.had_conflicts |= conflicts;
        rebuild(store, Collection::Uro, &survivors, insert_uro)?
    };
    report.hydro_removed = {
        let rows = store.hydro_logs()?;
        let (survivors, conflicts) = project_last_write_wins(rows, |e| e.timestamp.clone());
        report.had_conflicts |= conflicts;
        rebuild(store, Collection::Hydro, &survivors, insert_hydro)?
    };
    report.kegel_removed = {
        let rows = store.kegel_logs()?;
        let (survivors, conflicts) = project_last_write_wins(rows, |e| e.timestamp.clone());
        report.had_conflicts |= conflicts;
        rebuild(store, Collection::Kegel, &survivors, insert_kegel)?
    };

    if report.total_removed() > 0 {
        let _ = log::ttlog(
            &store.conn,
            "repair_duplicates",
            "",
            &format!(
                "Removed {} duplicates (conflicting content: {})",
                report.total_removed(),
                report.had_conflicts
            ),
        );
    }
    Ok(report)
}

/// Project rows in storage order into a timestamp-keyed map where later
/// rows overwrite earlier ones. Returns the surviving rows plus a flag
/// telling whether any overwritten row actually differed from its survivor.
fn project_last_write_wins<T: PartialEq>(
    rows: Vec<T>,
    key: impl Fn(&T) -> String,
) -> (Vec<T>, bool) {
    let mut order: Vec<String> = Vec::new();
    let mut by_key: HashMap<String, T> = HashMap::new();
    let mut conflicts = false;

    for row in rows {
        let k = key(&row);
        if let Some(previous) = by_key.get(&k) {
            if *previous != row {
                conflicts = true;
            }
            by_key.insert(k, row);
        } else {
            order.push(k.clone());
            by_key.insert(k, row);
        }
    }

    let survivors = order
        .into_iter()
        .filter_map(|k| by_key.remove(&k))
        .collect();
    (survivors, conflicts)
}

/// Clear the collection and refill it from the projection, atomically.
fn rebuild<T>(
    store: &mut Store,
    collection: Collection,
    survivors: &[T],
    insert: impl Fn(&rusqlite::Connection, &T) -> AppResult<()>,
) -> AppResult<usize> {
    let before: i64 = store.count(collection)?;
    let removed = (before as usize).saturating_sub(survivors.len());
    if removed == 0 {
        return Ok(0);
    }

    let tx = store.conn.transaction()?;
    tx.execute(&format!("DELETE FROM {}", collection.table()), [])?;
    for row in survivors {
        insert(&tx, row)?;
    }
    tx.commit()?;
    Ok(removed)
}
