//! Compute engine: scoped worker-pool sessions
//!
//! A session is created per pipeline run and must be released exactly once.
//! `stop()` releases it on the success path; dropping an unstopped session
//! releases it on every other path.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::EngineConfig;

/// Factory for sessions; keeps lifecycle counters.
#[derive(Debug, Default)]
pub struct ComputeEngine {
    created: AtomicUsize,
    released: Arc<AtomicUsize>,
}

impl ComputeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a session backed by a dedicated thread pool.
    #[instrument(level = "debug", skip(self))]
    pub fn create_session(&self, config: &EngineConfig) -> ApplicationResult<EngineSession> {
        let name = config.name.clone();
        let thread_prefix = name.clone();
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(move |i| format!("{thread_prefix}-{i}"))
            .build()
            .map_err(|e| ApplicationError::Engine {
                message: format!("create session '{}': {}", name, e),
            })?;

        self.created.fetch_add(1, Ordering::SeqCst);
        debug!(session = %name, threads = pool.current_num_threads(), "session created");

        Ok(EngineSession {
            name,
            pool: Some(pool),
            released: Arc::clone(&self.released),
        })
    }

    pub fn sessions_created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn sessions_released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

/// Live session; owns its worker pool until released.
#[derive(Debug)]
pub struct EngineSession {
    name: String,
    pool: Option<ThreadPool>,
    released: Arc<AtomicUsize>,
}

impl EngineSession {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threads(&self) -> usize {
        self.pool
            .as_ref()
            .map(|p| p.current_num_threads())
            .unwrap_or(0)
    }

    /// Run `op` inside the session's pool; rayon parallel iterators used by
    /// `op` execute on the session's workers.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Release the session.
    pub fn stop(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(pool) = self.pool.take() {
            drop(pool);
            self.released.fetch_add(1, Ordering::SeqCst);
            debug!(session = %self.name, "session released");
        }
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        if self.pool.is_some() {
            warn!(session = %self.name, "session dropped without stop, releasing");
            self.release();
        }
    }
}
