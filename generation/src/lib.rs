//! Signal generation and price refresh pipelines
//!
//! Turns free-text completions from a search-grounded generation backend
//! into validated domain records:
//! - `SignalGenerator` produces a `SignalDraft` (a signal missing only
//!   session-assigned fields) from an asset + user preferences.
//! - `PriceFeed` batch-resolves live prices for a set of symbols.
//!
//! Both paths share one tolerant JSON-extraction utility; neither ever
//! returns a half-formed record — any failure is a typed
//! `GenerationError`.

pub mod backend;
pub mod extract;
pub mod gemini;
pub mod pipeline;
pub mod prices;
pub mod prompt;

pub use backend::{Citation, Completion, CompletionBackend};
pub use extract::extract_json;
pub use gemini::{GeminiClient, GeminiConfig};
pub use pipeline::{SignalDraft, SignalGenerator};
pub use prices::PriceFeed;
