//! End-to-end tests for the syntax highlighting controller: model change →
//! worker validation → marker application, against the real worker loop
//! running in-process.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ppl_services::highlight::{HighlightController, TextModel, MARKER_OWNER, PPL_LANGUAGE_ID};
use ppl_services::markers::EditorMarker;
use ppl_services::worker::{
    run_worker_loop, WorkerFactory, WorkerHandle, WorkerProxy, WorkerResult,
};

struct LoopbackFactory {
    spawns: Arc<AtomicUsize>,
}

impl LoopbackFactory {
    fn new() -> Self {
        Self {
            spawns: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl WorkerFactory for LoopbackFactory {
    fn create(&self) -> WorkerResult<WorkerHandle> {
        self.spawns.fetch_add(1, Ordering::SeqCst);
        let (proxy_side, worker_side) = tokio::io::duplex(64 * 1024);
        let (worker_read, worker_write) = tokio::io::split(worker_side);
        tokio::spawn(async move {
            let _ = run_worker_loop(worker_read, worker_write).await;
        });
        let (proxy_read, proxy_write) = tokio::io::split(proxy_side);
        Ok(WorkerHandle::from_streams(proxy_read, proxy_write))
    }
}

/// Minimal editor model: mutable language/content plus a record of the last
/// marker set applied per owner.
struct StubModel {
    language: Mutex<String>,
    content: Mutex<String>,
    markers: Mutex<Option<Vec<EditorMarker>>>,
}

impl StubModel {
    fn ppl(content: &str) -> Self {
        Self {
            language: Mutex::new(PPL_LANGUAGE_ID.to_string()),
            content: Mutex::new(content.to_string()),
            markers: Mutex::new(None),
        }
    }

    fn set_content(&self, content: &str) {
        *self.content.lock().unwrap() = content.to_string();
    }

    fn set_language(&self, language: &str) {
        *self.language.lock().unwrap() = language.to_string();
    }

    fn markers(&self) -> Option<Vec<EditorMarker>> {
        self.markers.lock().unwrap().clone()
    }
}

impl TextModel for StubModel {
    fn language_id(&self) -> String {
        self.language.lock().unwrap().clone()
    }

    fn contents(&self) -> String {
        self.content.lock().unwrap().clone()
    }

    fn set_markers(&self, owner: &str, markers: Vec<EditorMarker>) {
        assert_eq!(owner, MARKER_OWNER);
        *self.markers.lock().unwrap() = Some(markers);
    }
}

fn controller() -> (HighlightController<LoopbackFactory>, Arc<AtomicUsize>) {
    let factory = LoopbackFactory::new();
    let spawns = factory.spawns.clone();
    (HighlightController::new(WorkerProxy::new(factory)), spawns)
}

#[tokio::test]
async fn test_invalid_content_publishes_markers() {
    let (controller, _) = controller();
    let model = StubModel::ppl("source=table1 | invalid_command");

    controller.refresh_markers(&model).await;

    let markers = model.markers().expect("markers were applied");
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].start_line_number, 1);
    assert_eq!(markers[0].start_column, 17);
    assert!(markers[0].end_column >= 18);
    assert!(markers[0].message.contains("invalid_command"));
    assert_eq!(markers[0].code.value, "View Documentation");
}

#[tokio::test]
async fn test_markers_reset_when_content_becomes_valid() {
    let (controller, _) = controller();
    let model = StubModel::ppl("source=logs | bogus");

    controller.refresh_markers(&model).await;
    assert!(!model.markers().unwrap().is_empty());

    model.set_content("source=logs | head 5");
    controller.refresh_markers(&model).await;

    // the empty set is applied as a reset, not skipped
    assert_eq!(model.markers().unwrap(), Vec::new());
}

#[tokio::test]
async fn test_repeated_refreshes_reuse_one_worker() {
    let (controller, spawns) = controller();
    let model = StubModel::ppl("source=logs");

    for _ in 0..5 {
        controller.refresh_markers(&model).await;
    }
    assert_eq!(spawns.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_language_change_away_clears_markers() {
    let (controller, _) = controller();
    let model = StubModel::ppl("source=logs | bogus");

    controller.refresh_markers(&model).await;
    assert!(!model.markers().unwrap().is_empty());

    model.set_language("json");
    controller.handle_language_change(&model).await;
    assert_eq!(model.markers().unwrap(), Vec::new());
}

#[tokio::test]
async fn test_disposal_clears_markers() {
    let (controller, _) = controller();
    let model = StubModel::ppl("source=logs | bogus");

    controller.refresh_markers(&model).await;
    controller.handle_model_disposal(&model);
    assert_eq!(model.markers().unwrap(), Vec::new());
}

#[tokio::test]
async fn test_shutdown_then_refresh_spawns_a_fresh_worker() {
    let (controller, spawns) = controller();
    let model = StubModel::ppl("source=logs");

    controller.refresh_markers(&model).await;
    controller.shutdown().await;
    controller.refresh_markers(&model).await;

    assert_eq!(spawns.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_sync_coloring_path_never_spawns_a_worker() {
    let (controller, spawns) = controller();

    let scopes = controller.tokenize_line("source=logs | stats avg(latency)");
    assert!(!scopes.is_empty());
    assert_eq!(scopes[0].scope, "keyword");
    assert_eq!(spawns.load(Ordering::SeqCst), 0);
}
