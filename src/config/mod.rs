//! Configuration loading and types.

mod settings;

pub use settings::{Settings, SettingsError, WorkerSettings};
