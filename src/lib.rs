//! # PPL Services
//!
//! Worker-backed editor language services for the PPL query language:
//! tokenization for syntax coloring and validation for diagnostics.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Editor Host (TextModel)                │
//! │        content change / language change / dispose       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [highlight controller]
//! ┌─────────────────────────────────────────────────────────┐
//! │   HighlightController — markers under "PPL_WORKER"      │
//! │   sync coloring (local analyzer)  │  validate (worker)  │
//! └─────────────────────────────────────────────────────────┘
//!                                       │
//!                                       ▼ [worker proxy]
//! ┌─────────────────────────────────────────────────────────┐
//! │   WorkerProxy — id-correlated NDJSON RPC, 5s timeout    │
//! └─────────────────────────────────────────────────────────┘
//!                                       │
//!                                       ▼ [worker process]
//! ┌─────────────────────────────────────────────────────────┐
//! │   entry loop + PplAnalyzer (chumsky lexer + validator)  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation results flow back as `SyntaxError` values (1-based lines,
//! 0-based columns) and are mapped to clamped, 1-based editor markers by
//! the [`markers`] module.

pub mod analyzer;
pub mod config;
pub mod highlight;
pub mod markers;
pub mod worker;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::analyzer::{PplAnalyzer, SyntaxError, Token, ValidationResult};
    pub use crate::config::{Settings, WorkerSettings};
    pub use crate::highlight::{HighlightController, TextModel, MARKER_OWNER, PPL_LANGUAGE_ID};
    pub use crate::markers::{to_markers, DocLinkRegistry, EditorMarker};
    pub use crate::worker::{
        WorkerError, WorkerFactory, WorkerHandle, WorkerLabel, WorkerProxy, WorkerSpawner,
    };
}
