//! Integration tests for the worker entry loop.
//!
//! Drives `run_worker_loop` over duplex pipes the way the proxy's spawned
//! process would, asserting the one-response-per-envelope contract.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use ppl_services::worker::protocol::{RpcRequest, RpcResponse};
use ppl_services::worker::run_worker_loop;

struct WorkerUnderTest {
    writer: tokio::io::WriteHalf<tokio::io::DuplexStream>,
    lines: tokio::io::Lines<BufReader<tokio::io::ReadHalf<tokio::io::DuplexStream>>>,
    handle: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl WorkerUnderTest {
    fn start() -> Self {
        let (host_side, worker_side) = tokio::io::duplex(64 * 1024);
        let (worker_read, worker_write) = tokio::io::split(worker_side);
        let handle = tokio::spawn(run_worker_loop(worker_read, worker_write));
        let (host_read, host_write) = tokio::io::split(host_side);
        Self {
            writer: host_write,
            lines: BufReader::new(host_read).lines(),
            handle,
        }
    }

    async fn send_raw(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
    }

    async fn send(&mut self, id: u64, method: &str, args: Vec<serde_json::Value>) {
        let request = RpcRequest {
            id,
            method: method.to_string(),
            args,
        };
        self.send_raw(&serde_json::to_string(&request).unwrap()).await;
    }

    async fn recv(&mut self) -> RpcResponse {
        let line = self.lines.next_line().await.unwrap().unwrap();
        serde_json::from_str(&line).unwrap()
    }
}

#[tokio::test]
async fn test_tokenize_request_is_answered() {
    let mut worker = WorkerUnderTest::start();
    worker
        .send(1, "tokenize", vec![serde_json::json!("source=logs")])
        .await;

    let response = worker.recv().await;
    assert_eq!(response.id, 1);
    assert!(response.error.is_none());

    let tokens = response.result.unwrap();
    let types: Vec<&str> = tokens
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["SOURCE", "EQUAL", "ID"]);
}

#[tokio::test]
async fn test_validate_request_is_answered() {
    let mut worker = WorkerUnderTest::start();
    worker
        .send(2, "validate", vec![serde_json::json!("source=logs | head 5")])
        .await;

    let response = worker.recv().await;
    assert_eq!(response.id, 2);
    let payload = response.result.unwrap();
    assert_eq!(payload["isValid"], serde_json::json!(true));
    assert_eq!(payload["errors"], serde_json::json!([]));
}

#[tokio::test]
async fn test_validate_surfaces_syntax_errors_in_payload() {
    let mut worker = WorkerUnderTest::start();
    worker
        .send(
            3,
            "validate",
            vec![serde_json::json!("source=table1 | invalid_command")],
        )
        .await;

    let response = worker.recv().await;
    assert!(response.error.is_none());
    let payload = response.result.unwrap();
    assert_eq!(payload["isValid"], serde_json::json!(false));

    let errors = payload["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["line"], serde_json::json!(1));
    assert_eq!(errors[0]["column"], serde_json::json!(16));
}

#[tokio::test]
async fn test_unknown_method_is_answered_with_error() {
    let mut worker = WorkerUnderTest::start();
    worker
        .send(4, "frobnicate", vec![serde_json::json!("x")])
        .await;

    let response = worker.recv().await;
    assert_eq!(response.id, 4);
    assert_eq!(response.error.as_deref(), Some("Unknown method: frobnicate"));
    assert!(response.result.is_none());
}

#[tokio::test]
async fn test_bad_argument_is_answered_with_error() {
    let mut worker = WorkerUnderTest::start();
    worker.send(5, "tokenize", vec![]).await;

    let response = worker.recv().await;
    assert_eq!(response.id, 5);
    assert!(response
        .error
        .unwrap()
        .contains("expects a single string argument"));
}

#[tokio::test]
async fn test_malformed_line_is_skipped_not_fatal() {
    let mut worker = WorkerUnderTest::start();
    worker.send_raw("this is not json").await;
    worker
        .send(6, "validate", vec![serde_json::json!("source=logs")])
        .await;

    // exactly one response comes back, for the well-formed envelope
    let response = worker.recv().await;
    assert_eq!(response.id, 6);
}

#[tokio::test]
async fn test_every_envelope_answered_in_order() {
    let mut worker = WorkerUnderTest::start();
    for id in 10..15 {
        worker
            .send(id, "validate", vec![serde_json::json!("source=logs")])
            .await;
    }
    for id in 10..15 {
        assert_eq!(worker.recv().await.id, id);
    }
}

#[tokio::test]
async fn test_loop_exits_cleanly_on_eof() {
    let mut worker = WorkerUnderTest::start();
    worker
        .send(7, "validate", vec![serde_json::json!("source=logs")])
        .await;
    assert_eq!(worker.recv().await.id, 7);

    worker.writer.shutdown().await.unwrap();
    let result = worker.handle.await.unwrap();
    assert!(result.is_ok());
}
