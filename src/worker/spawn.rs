//! Worker handle factory.
//!
//! Spawns a language worker as a child process with piped stdin/stdout.
//! Every call creates a fresh process; the factory is deliberately not a
//! singleton. Reuse of a spawned worker is the responsibility of the
//! [`WorkerProxy`](super::proxy::WorkerProxy) that owns the handle.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::{Child, Command};

use super::error::{WorkerError, WorkerResult};
use super::resolver::{resolve_worker_url, WorkerLabel};
use crate::config::WorkerSettings;

/// Anything that can produce a connected worker handle.
///
/// The proxy only depends on this seam, so tests can swap the process
/// launcher for an in-memory worker.
pub trait WorkerFactory: Send + Sync {
    fn create(&self) -> WorkerResult<WorkerHandle>;
}

/// A connected worker: its I/O streams plus the child process, if any.
pub struct WorkerHandle {
    pub(crate) child: Option<Child>,
    pub(crate) reader: Box<dyn AsyncRead + Send + Unpin>,
    pub(crate) writer: Box<dyn AsyncWrite + Send + Unpin>,
}

impl WorkerHandle {
    /// Build a handle from raw streams, with no child process attached.
    ///
    /// Used for loopback workers that run inside the current process.
    pub fn from_streams(
        reader: impl AsyncRead + Send + Unpin + 'static,
        writer: impl AsyncWrite + Send + Unpin + 'static,
    ) -> Self {
        Self {
            child: None,
            reader: Box::new(reader),
            writer: Box::new(writer),
        }
    }
}

impl std::fmt::Debug for WorkerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerHandle")
            .field("child", &self.child.as_ref().map(|c| c.id()))
            .finish_non_exhaustive()
    }
}

/// Process-spawning worker factory for one language label.
#[derive(Debug, Clone)]
pub struct WorkerSpawner {
    settings: WorkerSettings,
    label: WorkerLabel,
}

impl WorkerSpawner {
    /// Create a spawner for a known label.
    pub fn new(settings: WorkerSettings, label: WorkerLabel) -> Self {
        Self { settings, label }
    }

    /// Create a spawner from a raw language id.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::UnknownLanguage`] when the language has no
    /// registered worker.
    pub fn for_language(settings: WorkerSettings, language: &str) -> WorkerResult<Self> {
        let label = WorkerLabel::parse(language)
            .ok_or_else(|| WorkerError::UnknownLanguage(language.to_string()))?;
        Ok(Self::new(settings, label))
    }

    /// The label this spawner serves.
    pub fn label(&self) -> WorkerLabel {
        self.label
    }

    /// Spawn a new worker process.
    ///
    /// The build version is checked on every call, not cached, so a settings
    /// object updated between calls always takes effect.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::BuildVersionUnset`] when no build version is
    /// configured, or [`WorkerError::SpawnFailed`] when the process cannot
    /// be launched.
    pub fn spawn(&self) -> WorkerResult<WorkerHandle> {
        let build_version = self
            .settings
            .resolved_build_version()
            .map_err(|e| WorkerError::SpawnFailed(std::io::Error::other(e)))?
            .ok_or(WorkerError::BuildVersionUnset)?;
        let address = resolve_worker_url(self.label, &build_version);

        let program = self.resolve_program()?;
        let mut child = Command::new(program)
            .arg("worker")
            .arg("--language")
            .arg(self.label.as_str())
            .arg("--address")
            .arg(&address)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(WorkerError::SpawnFailed)?;

        let stdin = child.stdin.take().expect("stdin not captured");
        let stdout = child.stdout.take().expect("stdout not captured");

        Ok(WorkerHandle {
            child: Some(child),
            reader: Box::new(stdout),
            writer: Box::new(stdin),
        })
    }

    /// Resolve the worker host binary: the configured path, or the current
    /// executable re-invoked with the `worker` subcommand.
    fn resolve_program(&self) -> WorkerResult<PathBuf> {
        if let Some(path) = self
            .settings
            .resolved_path()
            .map_err(|e| WorkerError::SpawnFailed(std::io::Error::other(e)))?
        {
            return Ok(path);
        }
        std::env::current_exe().map_err(WorkerError::SpawnFailed)
    }
}

impl WorkerFactory for WorkerSpawner {
    fn create(&self) -> WorkerResult<WorkerHandle> {
        self.spawn()
    }
}
