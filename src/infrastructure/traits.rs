//! I/O boundary traits for testability
//!
//! Pipelines load records through these traits so they can be exercised with
//! in-memory implementations.

use crate::application::ApplicationResult;
use crate::domain::{RecordQuery, WorkflowRecord};
use crate::infrastructure::engine::EngineSession;

/// Source of workflow log records.
pub trait RecordSource: Send + Sync {
    /// Short human readable description for logs.
    fn describe(&self) -> String;

    /// Load the records matching `query`, in source order.
    fn load(
        &self,
        session: &EngineSession,
        query: &RecordQuery,
    ) -> ApplicationResult<Vec<WorkflowRecord>>;
}
