//! Async RPC proxy for a language worker.
//!
//! The proxy owns the worker handle and correlates concurrent in-flight
//! requests with their responses by message id. Responses may arrive in any
//! order; each pending call is tracked independently in a map keyed by id,
//! and exactly one of {matching response, timeout, stop, worker exit}
//! settles a given call. Whichever terminal event removes the pending entry
//! first wins; the map no longer holds the entry, so the losing path is a
//! no-op.
//!
//! Lifecycle: `Unset --setup()--> Ready --stop()--> Unset`. `setup()` is
//! idempotent in `Ready`, `stop()` is safe in both states, and the RPC
//! methods reject immediately in `Unset`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::Child;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

use super::error::{WorkerError, WorkerResult};
use super::protocol::{methods, RpcRequest, RpcResponse};
use super::spawn::{WorkerFactory, WorkerHandle, WorkerSpawner};
use crate::analyzer::{Token, ValidationResult};
use crate::config::WorkerSettings;
use crate::worker::resolver::WorkerLabel;

/// Default per-request timeout (5 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_millis(WorkerSettings::DEFAULT_TIMEOUT_MS);

type Pending = HashMap<u64, oneshot::Sender<WorkerResult<RpcResponse>>>;

type BoxWriter = Box<dyn tokio::io::AsyncWrite + Send + Unpin>;

/// Live connection to a spawned worker.
struct Connection {
    writer: Arc<Mutex<BufWriter<BoxWriter>>>,
    pending: Arc<Mutex<Pending>>,
    next_id: Arc<AtomicU64>,
    child: Option<Child>,
    reader_task: JoinHandle<()>,
}

/// RPC proxy over a single language worker.
///
/// # Example
///
/// ```ignore
/// use ppl_services::config::WorkerSettings;
/// use ppl_services::worker::WorkerProxy;
///
/// let proxy = WorkerProxy::ppl(WorkerSettings::with_build_version("abc123"));
/// proxy.setup().await?;
/// let result = proxy.validate("source=logs | head 5").await?;
/// ```
pub struct WorkerProxy<F: WorkerFactory> {
    factory: F,
    timeout: Duration,
    conn: Mutex<Option<Connection>>,
}

impl WorkerProxy<WorkerSpawner> {
    /// Proxy for the PPL worker with the default timeout.
    pub fn ppl(settings: WorkerSettings) -> Self {
        let timeout = settings.timeout();
        Self::with_timeout(WorkerSpawner::new(settings, WorkerLabel::Ppl), timeout)
    }
}

impl<F: WorkerFactory> WorkerProxy<F> {
    /// Create a proxy with the default 5 second timeout.
    pub fn new(factory: F) -> Self {
        Self::with_timeout(factory, DEFAULT_TIMEOUT)
    }

    /// Create a proxy with a custom per-request timeout.
    pub fn with_timeout(factory: F, timeout: Duration) -> Self {
        Self {
            factory,
            timeout,
            conn: Mutex::new(None),
        }
    }

    /// Whether a worker connection currently exists.
    pub async fn is_setup(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Spawn the worker and start the response reader.
    ///
    /// Idempotent: when a worker already exists this is a no-op and the
    /// underlying factory is not invoked again.
    ///
    /// # Errors
    ///
    /// Propagates configuration and spawn failures from the factory.
    pub async fn setup(&self) -> WorkerResult<()> {
        let mut guard = self.conn.lock().await;
        if guard.is_some() {
            return Ok(());
        }

        let WorkerHandle {
            child,
            reader,
            writer,
        } = self.factory.create()?;

        let pending: Arc<Mutex<Pending>> = Arc::new(Mutex::new(HashMap::new()));
        let reader_task = spawn_reader_task(reader, pending.clone());

        *guard = Some(Connection {
            writer: Arc::new(Mutex::new(BufWriter::new(writer))),
            pending,
            next_id: Arc::new(AtomicU64::new(0)),
            child,
            reader_task,
        });
        Ok(())
    }

    /// Tokenize source text in the worker.
    ///
    /// # Errors
    ///
    /// Rejects with [`WorkerError::NotSetup`] before `setup()`, and with the
    /// usual transport errors otherwise.
    pub async fn tokenize(&self, content: &str) -> WorkerResult<Vec<Token>> {
        let value = self
            .send_request(methods::TOKENIZE, vec![Value::String(content.to_string())])
            .await?;
        serde_json::from_value(value).map_err(WorkerError::DeserializeFailed)
    }

    /// Validate source text in the worker.
    ///
    /// # Errors
    ///
    /// Rejects with [`WorkerError::NotSetup`] before `setup()`, and with the
    /// usual transport errors otherwise.
    pub async fn validate(&self, content: &str) -> WorkerResult<ValidationResult> {
        let value = self
            .send_request(methods::VALIDATE, vec![Value::String(content.to_string())])
            .await?;
        serde_json::from_value(value).map_err(WorkerError::DeserializeFailed)
    }

    /// Send one request and wait for its response or the timeout, whichever
    /// comes first.
    async fn send_request(&self, method: &str, args: Vec<Value>) -> WorkerResult<Value> {
        // grab shared pieces of the connection, then release the lock so
        // other calls can go in flight concurrently
        let (writer, pending, id) = {
            let guard = self.conn.lock().await;
            let conn = guard.as_ref().ok_or(WorkerError::NotSetup)?;
            (
                conn.writer.clone(),
                conn.pending.clone(),
                conn.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            )
        };

        let request = RpcRequest {
            id,
            method: method.to_string(),
            args,
        };
        let mut line = serde_json::to_string(&request).map_err(WorkerError::SerializeFailed)?;
        line.push('\n');

        // register before writing so a fast response can never miss the entry
        let (tx, rx) = oneshot::channel();
        pending.lock().await.insert(id, tx);

        let write_result = {
            let mut w = writer.lock().await;
            match w.write_all(line.as_bytes()).await {
                Ok(()) => w.flush().await,
                Err(e) => Err(e),
            }
        };
        if let Err(e) = write_result {
            pending.lock().await.remove(&id);
            return Err(WorkerError::WriteFailed(e));
        }

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(Ok(response))) => match response.error {
                Some(message) => Err(WorkerError::Remote(message)),
                None => Ok(response.result.unwrap_or(Value::Null)),
            },
            // the reader or stop() settled this call with a typed error
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(_)) => Err(WorkerError::ChannelClosed),
            Err(_) => {
                // timed out: remove the entry so a late response is ignored
                pending.lock().await.remove(&id);
                Err(WorkerError::Timeout)
            }
        }
    }

    /// Tear the worker down.
    ///
    /// Safe to call before `setup()` and safe to call repeatedly. All
    /// pending calls are rejected with [`WorkerError::Stopped`] so no caller
    /// is left hanging. Never fails.
    pub async fn stop(&self) {
        let conn = self.conn.lock().await.take();
        if let Some(mut conn) = conn {
            conn.reader_task.abort();
            if let Some(mut child) = conn.child.take() {
                let _ = child.start_kill();
            }
            let mut pending = conn.pending.lock().await;
            for (_, tx) in pending.drain() {
                let _ = tx.send(Err(WorkerError::Stopped));
            }
        }
    }
}

/// Background task that routes worker responses to their pending calls.
fn spawn_reader_task(
    reader: Box<dyn AsyncRead + Send + Unpin>,
    pending: Arc<Mutex<Pending>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut line = String::new();

        loop {
            line.clear();
            match reader.read_line(&mut line).await {
                Ok(0) => {
                    // EOF - worker exited
                    break;
                }
                Ok(_) => match serde_json::from_str::<RpcResponse>(&line) {
                    Ok(response) => {
                        let mut pending = pending.lock().await;
                        if let Some(tx) = pending.remove(&response.id) {
                            let _ = tx.send(Ok(response));
                        }
                        // a response whose id is unknown (already timed out,
                        // or stale after stop) is dropped silently
                    }
                    Err(e) => {
                        eprintln!("[worker] failed to parse response: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("[worker] read error: {}", e);
                    break;
                }
            }
        }

        // worker exited: fail everything still in flight instead of letting
        // each call ride out its timeout
        let mut pending = pending.lock().await;
        for (_, tx) in pending.drain() {
            let _ = tx.send(Err(WorkerError::Crashed));
        }
    })
}
