//! Worker address resolution.
//!
//! Language workers are addressed by a build-versioned URL so that a new
//! build never resolves to a stale cached worker script. Resolution is a
//! pure function over a static label table; it performs no I/O.

use std::fmt;

/// Languages that ship a background worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerLabel {
    Ppl,
    Json,
    Xjson,
}

impl WorkerLabel {
    /// All labels with a registered worker script.
    pub const ALL: [WorkerLabel; 3] = [WorkerLabel::Ppl, WorkerLabel::Json, WorkerLabel::Xjson];

    /// Parse a language id into a label.
    ///
    /// Returns `None` for unknown labels (including the empty string) so the
    /// caller decides whether that is fatal.
    pub fn parse(language: &str) -> Option<Self> {
        match language {
            "ppl" => Some(Self::Ppl),
            "json" => Some(Self::Json),
            "xjson" => Some(Self::Xjson),
            _ => None,
        }
    }

    /// The language id this label serves.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ppl => "ppl",
            Self::Json => "json",
            Self::Xjson => "xjson",
        }
    }

    /// Worker script filename for this label.
    fn worker_filename(&self) -> &'static str {
        match self {
            Self::Ppl => "ppl.editor.worker.js",
            Self::Json => "json.editor.worker.js",
            Self::Xjson => "xjson.editor.worker.js",
        }
    }
}

impl fmt::Display for WorkerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the build-versioned worker URL for a label.
pub fn resolve_worker_url(label: WorkerLabel, build_version: &str) -> String {
    format!(
        "/{}/editor/workers/{}",
        build_version,
        label.worker_filename()
    )
}

/// Resolve a worker URL from a raw language id.
///
/// Returns `None` when the language has no registered worker.
pub fn resolve_worker_url_for(language: &str, build_version: &str) -> Option<String> {
    WorkerLabel::parse(language).map(|label| resolve_worker_url(label, build_version))
}
