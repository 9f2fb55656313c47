//! Worker communication module.
//!
//! The heavy half of the language service (syntax validation) runs in a
//! background worker process so the editor thread never blocks on grammar
//! work. The main process talks to the worker exclusively via asynchronous
//! message passing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Main Process (Tokio)                        │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │                    WorkerProxy (Async)                    │  │
//! │  │  - Spawns worker via WorkerSpawner (build-versioned URL)  │  │
//! │  │  - NDJSON protocol over stdin/stdout                      │  │
//! │  │  - Message ids correlate concurrent requests              │  │
//! │  │  - 5s timeout per call; stop() rejects in-flight calls    │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │                              │                                  │
//! │               stdin (NDJSON) │ stdout (NDJSON)                  │
//! │                              ▼                                  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//!                                ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │           Worker Process (entry loop + PplAnalyzer)             │
//! │      every request envelope answered exactly once               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod entry;
mod error;
pub mod protocol;
mod proxy;
mod resolver;
mod spawn;

pub use entry::{run_worker, run_worker_loop};
pub use error::{WorkerError, WorkerResult};
pub use proxy::WorkerProxy;
pub use resolver::{resolve_worker_url, resolve_worker_url_for, WorkerLabel};
pub use spawn::{WorkerFactory, WorkerHandle, WorkerSpawner};
