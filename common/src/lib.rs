//! Shared domain model for the AlphaSignal service
//!
//! This crate defines the entity shapes persisted by the storage layer and
//! exchanged with the generation backend:
//! - `TradingSignal` and its enumerations (direction, status, timeframe)
//! - `Ad` and the sponsor moderation states
//! - `UserPreferences` driving generation constraints
//! - The fixed asset catalog
//! - The typed error taxonomy used across crates

pub mod error;
pub mod types;

pub use error::{GenerationError, LifecycleError, StoreError};
pub use types::{
    Ad, AdStatus, AssetInfo, AssetType, ChartPoint, CloseOutcome, RiskLevel, SearchSource,
    SignalDirection, SignalStatus, Timeframe, TradeDuration, TradingSignal, UserPreferences,
    ASSETS, AVAILABLE_INDICATORS,
};
