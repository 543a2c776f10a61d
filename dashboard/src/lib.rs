//! Session coordinator and derived-state engine
//!
//! Owns the in-memory signal/ad collections for the lifetime of a session
//! and layers the derived state on top: opening and closing signals with
//! realized P&L, live unrealized P&L, conjunctive filtering, batched price
//! refresh, and the sponsor ad moderation workflow. Persistence is
//! write-through via the storage crate; memory stays authoritative after
//! the initial load.

pub mod admin;
pub mod ads;
pub mod config;
pub mod filter;
pub mod lifecycle;
pub mod session;

pub use admin::AdminGate;
pub use ads::{AdRotation, AdSubmission};
pub use config::AppConfig;
pub use filter::{SignalFilter, Tab};
pub use session::{LoadPolicy, Session};
