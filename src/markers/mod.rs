//! Marker mapping for editor diagnostics.
//!
//! Converts syntax errors from the analyzer's coordinate space (1-based
//! lines, 0-based columns) into editor marker ranges (1-based on both axes,
//! clamped, never degenerate). The clamping rules are deliberate edge-case
//! policy: a grammar error with no explicit end still produces a marker
//! spanning at least one character.

mod docs;

use serde::Serialize;

use crate::analyzer::SyntaxError;

pub use docs::{DocLink, DocLinkRegistry, DOC_LINK_TITLE, PPL_DOC_URL};

/// Severity of an editor marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSeverity {
    Hint,
    Info,
    Warning,
    Error,
}

/// A documentation link attached to a marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerCode {
    /// Link text shown next to the message.
    pub value: String,
    /// Link target.
    pub target: String,
}

/// An editor diagnostic annotation. All coordinates are 1-based and the
/// range is clamped so `end >= start` on both axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorMarker {
    pub severity: MarkerSeverity,
    pub message: String,
    pub start_line_number: u32,
    pub start_column: u32,
    pub end_line_number: u32,
    pub end_column: u32,
    pub code: MarkerCode,
}

/// Map syntax errors to editor markers.
///
/// An empty error list maps to an empty marker list; callers apply that as a
/// reset of the owner's markers, not as a no-op.
pub fn to_markers(errors: &[SyntaxError], links: &DocLinkRegistry) -> Vec<EditorMarker> {
    errors.iter().map(|error| to_marker(error, links)).collect()
}

/// Map one syntax error to a marker.
pub fn to_marker(error: &SyntaxError, links: &DocLinkRegistry) -> EditorMarker {
    let start_line_number = error.line.max(1);
    let end_line_number = error.end_line.unwrap_or(error.line).max(start_line_number);

    // 0-based grammar column to 1-based editor column
    let start_column = (error.column + 1).max(1);
    // with no explicit end, the marker spans at least one character
    let candidate = error.end_column.unwrap_or(error.column + 1) + 1;
    let end_column = candidate.max(start_column);

    let link = links.documentation_link(&error.message);
    EditorMarker {
        severity: MarkerSeverity::Error,
        message: error.message.clone(),
        start_line_number,
        start_column,
        end_line_number,
        end_column,
        code: MarkerCode {
            value: link.title.clone(),
            target: link.url.clone(),
        },
    }
}
