//! Worker-specific error types.

use std::io;
use thiserror::Error;

/// Result type for worker operations.
pub type WorkerResult<T> = Result<T, WorkerError>;

/// Errors that can occur while spawning or talking to a language worker.
#[derive(Error, Debug)]
pub enum WorkerError {
    /// No build version was configured before a worker spawn was requested.
    #[error("build hash must be set before workers can be spawned")]
    BuildVersionUnset,

    /// The requested language has no worker in the address table.
    #[error("no worker available for language: {0}")]
    UnknownLanguage(String),

    /// An RPC method was called before `setup()`.
    #[error("worker proxy has not been setup")]
    NotSetup,

    /// Failed to spawn the worker process.
    #[error("failed to spawn worker process: {0}")]
    SpawnFailed(#[source] io::Error),

    /// Failed to write a request to the worker.
    #[error("failed to write to worker: {0}")]
    WriteFailed(#[source] io::Error),

    /// Failed to serialize a request to JSON.
    #[error("failed to serialize request: {0}")]
    SerializeFailed(#[source] serde_json::Error),

    /// Failed to deserialize a response payload.
    #[error("failed to deserialize response: {0}")]
    DeserializeFailed(#[source] serde_json::Error),

    /// No response arrived within the request timeout.
    #[error("Worker timeout")]
    Timeout,

    /// The worker answered the request with an error envelope.
    /// Surfaced verbatim so callers see the worker's own message.
    #[error("{0}")]
    Remote(String),

    /// The worker process exited while requests were still in flight.
    #[error("worker process exited unexpectedly")]
    Crashed,

    /// The proxy was stopped while this request was still in flight.
    #[error("worker proxy was stopped")]
    Stopped,

    /// Response channel was closed without a value (internal error).
    #[error("response channel closed unexpectedly")]
    ChannelClosed,
}

impl WorkerError {
    /// Check if this error is a configuration problem (wrong setup, not a
    /// runtime fault).
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::BuildVersionUnset | Self::UnknownLanguage(_))
    }

    /// Check if this error indicates the worker is gone.
    pub fn is_worker_gone(&self) -> bool {
        matches!(self, Self::Crashed | Self::Stopped | Self::ChannelClosed)
    }

    /// Check if retrying the call could succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Crashed | Self::ChannelClosed)
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for WorkerError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        Self::ChannelClosed
    }
}
