//! Protocol types for worker communication.
//!
//! The main process and the language worker exchange NDJSON envelopes over
//! the worker's stdin/stdout. Requests carry a correlation id that the worker
//! echoes back in its response, so responses may arrive in any order.

use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Envelope
// ============================================================================

/// Request envelope sent to the worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Correlation id, monotonically increasing per proxy connection.
    pub id: u64,
    /// Method name (`tokenize` or `validate`).
    pub method: String,
    /// Method arguments; both methods take a single source string.
    pub args: Vec<serde_json::Value>,
}

/// Response envelope received from the worker.
///
/// Exactly one of `result` and `error` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Request id this response corresponds to.
    pub id: u64,
    /// Result payload (present on success).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error message (present on failure).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RpcResponse {
    /// Build a success response.
    pub fn success(id: u64, result: serde_json::Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Build an error response.
    pub fn failure(id: u64, message: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(message.into()),
        }
    }
}

// ============================================================================
// Method Names
// ============================================================================

/// Worker method names.
pub mod methods {
    pub const TOKENIZE: &str = "tokenize";
    pub const VALIDATE: &str = "validate";
}
