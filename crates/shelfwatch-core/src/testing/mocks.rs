//! Mock implementations used by this crate's own tests.

use crate::error::{EngineError, ErrorHandler, ErrorMetadata};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Records every error handed to it instead of logging, so tests can assert
/// on call counts without capturing tracing output.
#[derive(Default)]
pub struct RecordingErrorHandler {
    pub handled: Mutex<Vec<String>>,
    pub retry_calls: AtomicUsize,
}

impl ErrorHandler for RecordingErrorHandler {
    fn handle_error(&self, error: &EngineError, _metadata: &ErrorMetadata) {
        self.handled.lock().unwrap().push(error.to_string());
    }

    fn should_retry(&self, _error: &EngineError, metadata: &ErrorMetadata) -> bool {
        self.retry_calls.fetch_add(1, Ordering::SeqCst);
        metadata.retry_count < 3
    }

    fn retry_delay(&self, _error: &EngineError, _metadata: &ErrorMetadata) -> Option<std::time::Duration> {
        Some(std::time::Duration::from_millis(1))
    }
}
