use crate::config::ConfigSource;
use crate::notifier::Notifier;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Context provided to jobs during execution.
///
/// Contains references to shared resources and a cancellation token
/// for graceful shutdown handling.
#[derive(Clone)]
pub struct JobContext {
    /// Token to check for cancellation/shutdown requests.
    pub cancellation_token: CancellationToken,

    /// Settings, re-read by the jobs on every run.
    pub config: Arc<dyn ConfigSource>,

    /// Outbound email.
    pub notifier: Arc<dyn Notifier>,
}

impl JobContext {
    /// Create a new job context with the given dependencies.
    pub fn new(
        cancellation_token: CancellationToken,
        config: Arc<dyn ConfigSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            cancellation_token,
            config,
            notifier,
        }
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }
}
