//! Record sources: SQLite record database and flat log files

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rusqlite::{params_from_iter, Connection, OpenFlags};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{format_date, RecordQuery, WorkflowRecord};
use crate::infrastructure::engine::EngineSession;
use crate::infrastructure::traits::RecordSource;

/// Records stored in a relational database, one table per repo type.
///
/// Table `<repo_type>_record` (e.g. `ecflow_record`) with columns
/// `owner`, `repo`, `line_no`, `record_date` (`YYYY-MM-DD`) and `log_record`.
#[derive(Debug, Clone)]
pub struct RmdbSource {
    database: PathBuf,
}

impl RmdbSource {
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
        }
    }

    /// Name of the table holding records of a repo type.
    pub fn table_name(query: &RecordQuery) -> String {
        format!("{}_record", query.repo_type.as_str())
    }

    fn select_rows(&self, query: &RecordQuery) -> ApplicationResult<Vec<(i64, String)>> {
        let conn = Connection::open_with_flags(&self.database, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| datastore_err(format!("open {}", self.database.display()), e))?;

        let mut sql = format!(
            "SELECT line_no, log_record FROM {} WHERE owner = ?1 AND repo = ?2",
            Self::table_name(query)
        );
        let mut params = vec![query.owner.clone(), query.repo.clone()];
        if let Some(begin) = query.range.begin {
            params.push(format_date(begin));
            sql.push_str(&format!(" AND record_date >= ?{}", params.len()));
        }
        if let Some(end) = query.range.end {
            params.push(format_date(end));
            sql.push_str(&format!(" AND record_date < ?{}", params.len()));
        }
        sql.push_str(" ORDER BY record_date, line_no");
        debug!(%sql, "selecting records");

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| datastore_err("prepare record query", e))?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| datastore_err("query records", e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| datastore_err("read record row", e))?;
        Ok(rows)
    }
}

impl RecordSource for RmdbSource {
    fn describe(&self) -> String {
        format!("database {}", self.database.display())
    }

    #[instrument(level = "debug", skip(self, session))]
    fn load(
        &self,
        session: &EngineSession,
        query: &RecordQuery,
    ) -> ApplicationResult<Vec<WorkflowRecord>> {
        if !self.database.exists() {
            return Err(ApplicationError::InputNotFound(self.database.clone()));
        }
        let rows = self.select_rows(query)?;
        let repo_type = query.repo_type;
        let records: Vec<WorkflowRecord> = session.install(|| {
            rows.par_iter()
                .filter_map(|(line_no, line)| WorkflowRecord::parse(line, repo_type, *line_no as u64))
                .collect()
        });
        debug!(rows = rows.len(), records = records.len(), "loaded records from database");
        Ok(records)
    }
}

/// Records read from one workflow log file.
///
/// Owner and repo are not checked: a log file belongs to a single repo.
#[derive(Debug, Clone)]
pub struct LogFileSource {
    path: PathBuf,
}

impl LogFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for LogFileSource {
    fn describe(&self) -> String {
        format!("log file {}", self.path.display())
    }

    #[instrument(level = "debug", skip(self, session))]
    fn load(
        &self,
        session: &EngineSession,
        query: &RecordQuery,
    ) -> ApplicationResult<Vec<WorkflowRecord>> {
        if !self.path.is_file() {
            return Err(ApplicationError::InputNotFound(self.path.clone()));
        }
        // job output interleaved in the log may hold arbitrary bytes
        let content = std::fs::read(&self.path).with_path_context("read log file", &self.path)?;
        let lines: Vec<&[u8]> = content.split(|&b| b == b'\n').collect();

        let repo_type = query.repo_type;
        let range = query.range;
        let records: Vec<WorkflowRecord> = session.install(|| {
            lines
                .par_iter()
                .enumerate()
                .filter_map(|(i, line)| {
                    WorkflowRecord::parse(&String::from_utf8_lossy(line), repo_type, i as u64 + 1)
                })
                .filter(|record| range.contains(record.date))
                .collect()
        });
        debug!(lines = lines.len(), records = records.len(), "loaded records from log file");
        Ok(records)
    }
}

fn datastore_err(context: impl Into<String>, source: rusqlite::Error) -> ApplicationError {
    ApplicationError::Datastore {
        context: context.into(),
        source: Box::new(source),
    }
}
