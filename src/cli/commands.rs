use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::NodeTreeService;
use crate::cli::args::{Cli, Commands, DatabaseArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{OutputType, Settings, TaskFile};
use crate::domain::{BunchMap, DateRange, RecordQuery};
use crate::infrastructure::{sink_result, ComputeEngine, SinkTarget};

/// Run the parsed command with a fresh compute engine.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    run_command(cli, Arc::new(ComputeEngine::new()))
}

/// Run the parsed command on the given engine.
pub fn run_command(cli: &Cli, engine: Arc<ComputeEngine>) -> CliResult<()> {
    match &cli.command {
        Commands::Database(args) => cmd_database(args, engine),
        Commands::File { config, task_file } => cmd_file(config, task_file, engine),
        Commands::Completion { shell } => {
            cmd_completion(*shell);
            Ok(())
        }
    }
}

#[instrument(skip(engine))]
fn cmd_database(args: &DatabaseArgs, engine: Arc<ComputeEngine>) -> CliResult<()> {
    let range = DateRange::parse(args.begin_date.as_deref(), args.end_date.as_deref())?;
    let target = resolve_sink(args.output_type, args.output_file.as_deref())?;

    let settings = Settings::load(&args.config)?;

    let query = RecordQuery {
        owner: args.owner.clone(),
        repo: args.repo.clone(),
        repo_type: args.repo_type,
        range,
    };
    let bunch_map = NodeTreeService::new(engine).generate_from_database(&settings, &query)?;

    deliver(&target, &bunch_map)
}

#[instrument(skip(engine))]
fn cmd_file(config: &Path, task_file: &Path, engine: Arc<ComputeEngine>) -> CliResult<()> {
    let settings = Settings::load(config)?;
    let task = TaskFile::load(task_file)?;

    let source = task
        .primary_source()
        .ok_or_else(|| CliError::Usage("task file must define at least one source".into()))?;
    let sink = task
        .primary_sink()
        .ok_or_else(|| CliError::Usage("task file must define at least one sink".into()))?;

    let range = DateRange::parse(task.task.begin_date.as_deref(), task.task.end_date.as_deref())?;
    let target = resolve_sink(sink.output_type, sink.file_path.as_deref())?;
    debug!(?target, log_file = %source.file_path.display(), "task resolved");

    let query = RecordQuery {
        owner: task.task.owner.clone(),
        repo: task.task.repo.clone(),
        repo_type: task.task.workflow_type,
        range,
    };
    let bunch_map = NodeTreeService::new(engine).generate_from_file(
        &settings,
        &source.file_path,
        &query,
    )?;

    deliver(&target, &bunch_map)
}

fn cmd_completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

/// Map output type and optional path to a sink, failing when a file sink has no path.
pub fn resolve_sink(output_type: OutputType, output_file: Option<&Path>) -> CliResult<SinkTarget> {
    match output_type {
        OutputType::Print => Ok(SinkTarget::Print),
        OutputType::File => match output_file {
            Some(path) if !path.as_os_str().is_empty() => Ok(SinkTarget::File(path.to_path_buf())),
            _ => Err(CliError::Usage(
                "output_file must be set when output_type is file".into(),
            )),
        },
    }
}

fn deliver(target: &SinkTarget, bunch_map: &BunchMap) -> CliResult<()> {
    sink_result(target, bunch_map)?;
    if let SinkTarget::File(path) = target {
        output::action("Wrote", &path.display());
    }
    Ok(())
}
