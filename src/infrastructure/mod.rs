//! Infrastructure layer: compute engine, record sources and result sinks
//!
//! This layer implements I/O boundary traits for the application services.

pub mod engine;
pub mod error;
pub mod sink;
pub mod sources;
pub mod traits;

pub use engine::{ComputeEngine, EngineSession};
pub use error::{InfraError, InfraResult};
pub use sink::{sink_result, SinkTarget};
pub use sources::{LogFileSource, RmdbSource};
pub use traits::RecordSource;
