use std::sync::Arc;

use engine_logging::FailureSink;

use crate::fetch::HttpClient;

/// Collaborators threaded through every component of a run: the shared HTTP
/// client and the failure sink. Cheap to clone into worker tasks.
#[derive(Clone)]
pub struct EngineContext {
    pub client: Arc<dyn HttpClient>,
    pub failures: Arc<dyn FailureSink>,
}

impl EngineContext {
    pub fn new(client: Arc<dyn HttpClient>, failures: Arc<dyn FailureSink>) -> Self {
        Self { client, failures }
    }

    /// Record a failure that caused a unit of work to be skipped.
    pub fn report(&self, message: impl AsRef<str>) {
        self.failures.record(message.as_ref());
    }
}
