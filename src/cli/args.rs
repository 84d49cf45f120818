//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::config::OutputType;
use crate::domain::RepoType;

/// Rebuild per-day workflow node trees from ecFlow and SMS log records
#[derive(Parser, Debug)]
#[command(name = "node-tree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate node tree from records in database
    Database(DatabaseArgs),

    /// Generate node tree from log file
    File {
        /// Config file path
        #[arg(short = 'c', long = "config", value_hint = ValueHint::FilePath)]
        config: PathBuf,
        /// Task file describing owner, repo, dates, source and sink
        #[arg(value_hint = ValueHint::FilePath)]
        task_file: PathBuf,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug)]
pub struct DatabaseArgs {
    /// Owner name
    #[arg(short, long)]
    pub owner: String,

    /// Repo name
    #[arg(short, long)]
    pub repo: String,

    /// Repo type
    #[arg(long, value_enum)]
    pub repo_type: RepoType,

    /// Begin date, YYYY-MM-DD, [begin_date, end_date)
    #[arg(long)]
    pub begin_date: Option<String>,

    /// End date, YYYY-MM-DD, [begin_date, end_date)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Config file path
    #[arg(short = 'c', long = "config", value_hint = ValueHint::FilePath)]
    pub config: PathBuf,

    /// Output type
    #[arg(long, value_enum, default_value_t = OutputType::Print)]
    pub output_type: OutputType,

    /// Output file path, required when output type is file
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub output_file: Option<PathBuf>,
}
