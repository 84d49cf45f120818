//! Configuration and task descriptor loading
//!
//! Settings precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file given with `-c/--config` (YAML, TOML or JSON by extension)
//! 3. Environment variables: `NODE_TREE__*` prefix, `__` between nested keys
//!
//! Task files (file mode) are read from a single file with the same formats.

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, RepoType};

/// Compute engine settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Session label, also used for worker thread names
    pub name: String,
    /// Worker threads per session (0 = one per CPU)
    pub threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "node-tree".into(),
            threads: 0,
        }
    }
}

/// Record database settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatastoreConfig {
    /// SQLite database holding `<repo_type>_record` tables
    pub database: PathBuf,
}

/// Unified configuration for node-tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineConfig,
    /// Required by the database source only
    pub datastore: Option<DatastoreConfig>,
}

impl Settings {
    /// Load settings from a config file, then apply `NODE_TREE__*` overrides.
    pub fn load(path: &Path) -> Result<Self, ApplicationError> {
        if !path.is_file() {
            return Err(ApplicationError::InputNotFound(path.to_path_buf()));
        }
        let config = Config::builder()
            .add_source(File::from(path).required(true))
            .add_source(
                Environment::with_prefix("NODE_TREE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        let mut settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.expand_paths();
        debug!(?settings, "settings loaded");
        Ok(settings)
    }

    /// Expand `~` and `$VAR` in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(datastore) = self.datastore.as_mut() {
            let expanded = expand_env_vars(datastore.database.to_string_lossy().as_ref());
            datastore.database = PathBuf::from(expanded);
        }
    }
}

/// Kind of result sink.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    #[default]
    Print,
    File,
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputType::Print => write!(f, "print"),
            OutputType::File => write!(f, "file"),
        }
    }
}

/// `task` section of a task file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TaskSection {
    pub owner: String,
    pub repo: String,
    /// `YYYY-MM-DD`, inclusive
    #[serde(default)]
    pub begin_date: Option<String>,
    /// `YYYY-MM-DD`, exclusive
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub workflow_type: RepoType,
}

/// One entry of the `source` list.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SourceConfig {
    pub file_path: PathBuf,
}

/// One entry of the `sink` list.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SinkConfig {
    #[serde(rename = "type")]
    pub output_type: OutputType,
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

/// Task descriptor for file mode.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TaskFile {
    pub task: TaskSection,
    #[serde(default)]
    pub source: Vec<SourceConfig>,
    #[serde(default)]
    pub sink: Vec<SinkConfig>,
}

impl TaskFile {
    pub fn load(path: &Path) -> Result<Self, ApplicationError> {
        if !path.is_file() {
            return Err(ApplicationError::InputNotFound(path.to_path_buf()));
        }
        let config = Config::builder()
            .add_source(File::from(path).required(true))
            .build()
            .map_err(config_err)?;
        let mut task: Self = config.try_deserialize().map_err(config_err)?;
        for source in &mut task.source {
            source.file_path = PathBuf::from(expand_env_vars(&source.file_path.to_string_lossy()));
        }
        for sink in &mut task.sink {
            if let Some(file_path) = sink.file_path.as_mut() {
                *file_path = PathBuf::from(expand_env_vars(&file_path.to_string_lossy()));
            }
        }
        Ok(task)
    }

    /// First source entry; later entries are not consulted.
    pub fn primary_source(&self) -> Option<&SourceConfig> {
        if self.source.len() > 1 {
            warn!(count = self.source.len(), "multiple sources configured, using the first");
        }
        self.source.first()
    }

    /// First sink entry; later entries are not consulted.
    pub fn primary_sink(&self) -> Option<&SinkConfig> {
        if self.sink.len() > 1 {
            warn!(count = self.sink.len(), "multiple sinks configured, using the first");
        }
        self.sink.first()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
