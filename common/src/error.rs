//! Typed error taxonomy shared across crates
//!
//! Three families, matching how failures propagate:
//! - `StoreError`: persistence backend failures, split into connection-level
//!   (init) and query-level (individual reads/writes) variants so callers can
//!   treat them differently.
//! - `GenerationError`: the completion backend responded but no usable signal
//!   could be produced; never yields a partial record.
//! - `LifecycleError`: invalid state transitions and degraded-mode rejections
//!   raised by the session coordinator.

use thiserror::Error;

/// Persistence backend failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend unreachable or misconfigured at init
    #[error("storage backend connection failed: {0}")]
    Connection(String),

    /// A specific read/write against an otherwise reachable backend failed
    #[error("storage query failed: {0}")]
    Query(String),

    #[error("failed to encode or decode stored document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the signal generation and price refresh pipelines
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("completion backend request failed: {0}")]
    Backend(String),

    #[error("completion backend returned an empty response")]
    EmptyResponse,

    #[error("no JSON object found in response text")]
    NoJsonPayload,

    #[error("failed to parse JSON payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("backend declared an unknown signal direction: {0:?}")]
    InvalidDirection(String),

    /// Stop/target do not bracket the entry consistently with the direction
    #[error("stop/target levels are inconsistent with a {direction} signal")]
    InconsistentLevels { direction: &'static str },
}

/// Invalid state transitions and degraded-mode rejections
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("no signal with id {0}")]
    UnknownSignal(String),

    #[error("signal {0} is already closed")]
    AlreadyClosed(String),

    #[error("no ad with id {0}")]
    UnknownAd(String),

    /// The backend was unreachable at startup and mutating actions are
    /// disabled for the session
    #[error("storage backend is degraded; mutating actions are disabled")]
    Degraded,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}
