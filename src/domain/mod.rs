//! Domain layer: records, node trees and their construction
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod bunch;
pub mod date;
pub mod error;
pub mod record;
pub mod traversal;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::warn;

pub use bunch::{Bunch, BunchNode, NodeType};
pub use date::{format_date, parse_date, parse_optional_date, DateRange, DATE_FORMAT};
pub use error::{DomainError, DomainResult};
pub use record::{LogKind, NodeStatus, RecordQuery, RepoType, StatusChange, WorkflowRecord};
pub use traversal::{pre_order_travel, SimplePrintVisitor, Traversable, Visitor};

/// One reconstructed tree per day, in ascending date order.
pub type BunchMap = BTreeMap<NaiveDate, Bunch>;

/// Build one day's bunch from its status changes, given in record order.
///
/// Paths that were submitted become tasks; every other node is a family.
/// A node keeps the last status seen for it. Changes whose node path is
/// malformed (e.g. `/a//b`, `/a/`) are skipped.
pub fn build_bunch<'a, I>(changes: I) -> Bunch
where
    I: IntoIterator<Item = StatusChange<'a>>,
{
    let mut bunch = Bunch::new();
    for change in changes {
        let idx = match bunch.add_node(change.node_path) {
            Ok(idx) => idx,
            Err(e) => {
                warn!(status = %change.status, "skipping status change: {e}");
                continue;
            }
        };
        if change.status == NodeStatus::Submitted {
            bunch.set_node_type(idx, NodeType::Task);
        }
        bunch.set_status(idx, change.status);
    }
    bunch
}

/// Shell-style expansion of `~` and `$VAR` in user supplied paths.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(status: NodeStatus, node_path: &str) -> StatusChange<'_> {
        StatusChange { status, node_path }
    }

    #[test]
    fn given_submitted_path_when_building_bunch_then_node_is_task() {
        let bunch = build_bunch(vec![
            change(NodeStatus::Queued, "/gmf/00"),
            change(NodeStatus::Submitted, "/gmf/00/get"),
            change(NodeStatus::Active, "/gmf/00/get"),
            change(NodeStatus::Complete, "/gmf/00/get"),
            change(NodeStatus::Complete, "/gmf/00"),
        ]);

        let task = bunch.get_node(bunch.find("/gmf/00/get").unwrap()).unwrap();
        assert_eq!(task.node_type, NodeType::Task);
        assert_eq!(task.status, Some(NodeStatus::Complete));

        let family = bunch.get_node(bunch.find("/gmf/00").unwrap()).unwrap();
        assert_eq!(family.node_type, NodeType::Family);
        assert_eq!(family.status, Some(NodeStatus::Complete));

        let suite = bunch.get_node(bunch.find("/gmf").unwrap()).unwrap();
        assert_eq!(suite.status, None);
    }

    #[test]
    fn given_no_changes_when_building_bunch_then_only_root() {
        let bunch = build_bunch(Vec::new());
        assert!(bunch.is_empty());
    }

    #[test]
    fn given_malformed_node_path_when_building_bunch_then_change_is_skipped() {
        let bunch = build_bunch(vec![
            change(NodeStatus::Submitted, "/grapes/00/pre"),
            change(NodeStatus::Complete, "/grapes/00/"),
            change(NodeStatus::Aborted, "/grapes//pre"),
            change(NodeStatus::Complete, "/grapes/00/pre"),
        ]);

        assert_eq!(bunch.len(), 4);
        let task = bunch.get_node(bunch.find("/grapes/00/pre").unwrap()).unwrap();
        assert_eq!(task.status, Some(NodeStatus::Complete));
        let family = bunch.get_node(bunch.find("/grapes/00").unwrap()).unwrap();
        assert_eq!(family.status, None);
    }

    #[test]
    fn given_tilde_path_when_expanding_then_replaced_by_home() {
        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(expand_env_vars("~/logs/gmf.log").starts_with(&home));
    }
}
