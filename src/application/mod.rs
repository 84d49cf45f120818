//! Application layer: pipelines and tree calculation
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod calculator;
pub mod error;
pub mod error_ext;
pub mod services;

pub use calculator::calculate_node_tree;
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
