//! node-tree: rebuild per-day workflow node trees from ecFlow and SMS log records.
//!
//! Layers, innermost first:
//! - [`domain`]: records, dates, bunch trees and their traversal
//! - [`application`]: the node tree calculator and the generation service
//! - [`infrastructure`]: compute engine, record sources and result sinks
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
