//! Syntax highlighting controller.
//!
//! The consumer that ties the worker RPC layer to an editor host. On every
//! content change of a PPL model it validates the text through the worker
//! proxy and applies the resulting markers under a fixed owner tag, so these
//! diagnostics can be cleared without touching other producers' markers.
//!
//! Two separate analyzer paths by design:
//! - **validate** goes through the worker, off the editor thread;
//! - **tokenize** for live coloring runs synchronously on a local analyzer
//!   and never round-trips through the worker.
//!
//! Validation failures degrade silently: prior markers stay in place and
//! the failure is only logged.

use once_cell::sync::OnceCell;

use crate::analyzer::{PplAnalyzer, ScopedToken};
use crate::markers::{to_markers, DocLinkRegistry};
use crate::worker::{WorkerFactory, WorkerProxy};

/// Owner tag under which this controller publishes markers.
pub const MARKER_OWNER: &str = "PPL_WORKER";

/// Language id this controller serves.
pub const PPL_LANGUAGE_ID: &str = "ppl";

/// The slice of an editor text model the controller needs.
///
/// `set_markers` replaces the full marker set for an owner; passing an empty
/// list clears that owner's markers.
pub trait TextModel {
    fn language_id(&self) -> String;
    fn contents(&self) -> String;
    fn set_markers(&self, owner: &str, markers: Vec<crate::markers::EditorMarker>);
}

/// Worker-backed diagnostics plus synchronous coloring for PPL models.
pub struct HighlightController<F: WorkerFactory> {
    proxy: WorkerProxy<F>,
    links: DocLinkRegistry,
    coloring: OnceCell<PplAnalyzer>,
}

impl<F: WorkerFactory> HighlightController<F> {
    /// Create a controller with the default documentation links.
    pub fn new(proxy: WorkerProxy<F>) -> Self {
        Self::with_links(proxy, DocLinkRegistry::new())
    }

    /// Create a controller with a custom documentation-link registry.
    pub fn with_links(proxy: WorkerProxy<F>, links: DocLinkRegistry) -> Self {
        Self {
            proxy,
            links,
            coloring: OnceCell::new(),
        }
    }

    /// Re-validate a model after a content change and publish markers.
    ///
    /// Models whose language is not PPL get this owner's markers cleared.
    /// The proxy is set up lazily; setup is idempotent so calling this on
    /// every keystroke is fine.
    pub async fn refresh_markers(&self, model: &dyn TextModel) {
        if model.language_id() != PPL_LANGUAGE_ID {
            model.set_markers(MARKER_OWNER, Vec::new());
            return;
        }

        if let Err(e) = self.proxy.setup().await {
            eprintln!("[highlight] worker setup failed: {}", e);
            return;
        }

        match self.proxy.validate(&model.contents()).await {
            // an empty marker list is a reset, applied like any other result
            Ok(result) => model.set_markers(MARKER_OWNER, to_markers(&result.errors, &self.links)),
            Err(e) => {
                // degrade silently: prior markers stay untouched
                eprintln!("[highlight] validation failed: {}", e);
            }
        }
    }

    /// React to a model's language change: when it is no longer PPL, this
    /// owner's markers are cleared.
    pub async fn handle_language_change(&self, model: &dyn TextModel) {
        if model.language_id() != PPL_LANGUAGE_ID {
            model.set_markers(MARKER_OWNER, Vec::new());
        } else {
            self.refresh_markers(model).await;
        }
    }

    /// Clear this owner's markers when a model is disposed.
    pub fn handle_model_disposal(&self, model: &dyn TextModel) {
        model.set_markers(MARKER_OWNER, Vec::new());
    }

    /// Synchronously classify one line for coloring.
    ///
    /// Served by a local analyzer, never the worker. A line that fails to
    /// lex degrades to an uncolored (empty) token list.
    pub fn tokenize_line(&self, line: &str) -> Vec<ScopedToken> {
        if line.trim().is_empty() {
            return Vec::new();
        }
        let analyzer = self.coloring.get_or_init(PplAnalyzer::new);
        match analyzer.line_scopes(line) {
            Ok(scopes) => scopes,
            Err(e) => {
                eprintln!("[highlight] tokenization failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Tear down the worker. Safe to call at any point and repeatedly.
    pub async fn shutdown(&self) {
        self.proxy.stop().await;
    }
}
