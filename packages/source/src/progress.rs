//! Progress reporting for the report pipeline.
//!
//! The pipeline advances one unit per stage (each file load, aggregation,
//! rendering). The CLI plugs in an `indicatif` bar; library callers and
//! tests use [`NullProgress`].

use std::sync::Arc;

/// Receives stage-level progress from the report pipeline.
pub trait ProgressCallback: Send + Sync {
    /// Set the total number of stages.
    fn set_total(&self, total: u64);

    /// Advance by `delta` stages.
    fn inc(&self, delta: u64);

    /// Describe the stage currently running.
    fn set_message(&self, msg: String);

    /// Mark the pipeline as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores all progress updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
