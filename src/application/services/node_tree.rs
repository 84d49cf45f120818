//! Node tree pipelines
//!
//! Both entry points run the same steps: acquire a session, load records,
//! calculate the per-day trees, release the session, log the elapsed time.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use crate::application::calculator::calculate_node_tree;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{BunchMap, RecordQuery};
use crate::infrastructure::engine::ComputeEngine;
use crate::infrastructure::sources::{LogFileSource, RmdbSource};
use crate::infrastructure::traits::RecordSource;

/// Service that turns workflow log records into per-day node trees.
pub struct NodeTreeService {
    engine: Arc<ComputeEngine>,
}

impl NodeTreeService {
    pub fn new(engine: Arc<ComputeEngine>) -> Self {
        Self { engine }
    }

    /// Build node trees from records in the configured database.
    pub fn generate_from_database(
        &self,
        settings: &Settings,
        query: &RecordQuery,
    ) -> ApplicationResult<BunchMap> {
        let datastore = settings
            .datastore
            .as_ref()
            .ok_or_else(|| ApplicationError::Config {
                message: "missing [datastore] section, required for database source".into(),
            })?;
        let source = RmdbSource::new(&datastore.database);
        self.generate(settings, &source, query)
    }

    /// Build node trees from a workflow log file.
    pub fn generate_from_file(
        &self,
        settings: &Settings,
        log_file: &Path,
        query: &RecordQuery,
    ) -> ApplicationResult<BunchMap> {
        let source = LogFileSource::new(log_file);
        self.generate(settings, &source, query)
    }

    /// Run the pipeline against any record source.
    ///
    /// The session is stopped after calculation; on any error it is
    /// released when dropped.
    #[instrument(skip(self, settings, source), fields(source = %source.describe()))]
    pub fn generate(
        &self,
        settings: &Settings,
        source: &dyn RecordSource,
        query: &RecordQuery,
    ) -> ApplicationResult<BunchMap> {
        let run_start = Instant::now();

        let session = self.engine.create_session(&settings.engine)?;
        let records = source.load(&session, query)?;
        debug!(records = records.len(), range = %query.range, "records loaded");

        let bunch_map = calculate_node_tree(&session, &records, query.repo_type);
        session.stop();

        info!(
            elapsed = ?run_start.elapsed(),
            days = bunch_map.len(),
            "step finished"
        );
        Ok(bunch_map)
    }
}
