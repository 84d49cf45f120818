//! Node tree calculation on a compute session

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::domain::{build_bunch, BunchMap, RepoType, StatusChange, WorkflowRecord};
use crate::infrastructure::engine::EngineSession;

/// Group status changes by day and build one bunch per day.
///
/// Records must be in source order: a node's status is the last one seen
/// that day. Days without any status change produce no bunch.
#[instrument(level = "debug", skip(session, records), fields(records = records.len()))]
pub fn calculate_node_tree(
    session: &EngineSession,
    records: &[WorkflowRecord],
    repo_type: RepoType,
) -> BunchMap {
    let changes: Vec<(NaiveDate, StatusChange<'_>)> = session.install(|| {
        records
            .par_iter()
            .filter_map(|record| record.status_change().map(|change| (record.date, change)))
            .collect()
    });
    debug!(%repo_type, changes = changes.len(), "status changes extracted");

    let mut by_day: BTreeMap<NaiveDate, Vec<StatusChange<'_>>> = BTreeMap::new();
    for (date, change) in changes {
        by_day.entry(date).or_default().push(change);
    }

    session.install(|| {
        by_day
            .into_par_iter()
            .map(|(date, day_changes)| (date, build_bunch(day_changes)))
            .collect()
    })
}
