//! Signal lifecycle math
//!
//! Pure functions; the session applies them and handles persistence.
//!
//! Closing uses the operator's outcome label, not the live price: a win
//! realizes the full distance to the target, a loss the full distance to
//! the stop, regardless of direction. Dollar values use a fixed
//! $100-per-1%-move notional — a deliberate simplification, not a
//! position-sizing model.

use chrono::{DateTime, Utc};
use common::{CloseOutcome, LifecycleError, SignalDirection, SignalStatus, TradingSignal};

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Realized (percent, dollar) for a close with the given outcome
pub fn realized_pnl(
    outcome: CloseOutcome,
    entry_price: f64,
    stop_loss: f64,
    take_profit: f64,
) -> (f64, f64) {
    let percent = match outcome {
        CloseOutcome::Win => ((take_profit - entry_price) / entry_price * 100.0).abs(),
        CloseOutcome::Loss => -((entry_price - stop_loss) / entry_price * 100.0).abs(),
    };
    let percent = round2(percent);
    let value = (100.0 * percent).round();
    (percent, value)
}

/// Apply the terminal close transition in place
///
/// Rejects a second close: realized fields are written exactly once and
/// `current_price` stays frozen at its last known value.
pub fn close_signal(
    signal: &mut TradingSignal,
    outcome: CloseOutcome,
    now: DateTime<Utc>,
) -> Result<(), LifecycleError> {
    if signal.status == SignalStatus::Closed {
        return Err(LifecycleError::AlreadyClosed(signal.id.clone()));
    }

    let (percent, value) = realized_pnl(
        outcome,
        signal.entry_price,
        signal.stop_loss,
        signal.take_profit,
    );
    signal.status = SignalStatus::Closed;
    signal.close_time = Some(now);
    signal.realized_pnl = Some(percent);
    signal.realized_pnl_value = Some(value);
    Ok(())
}

/// Live mark-to-market percent for an active signal; display-only, never
/// persisted
pub fn unrealized_pnl(signal: &TradingSignal) -> Option<f64> {
    if !signal.is_active() {
        return None;
    }
    let current = signal.current_price?;
    let entry = signal.entry_price;
    Some(match signal.direction {
        SignalDirection::Long => (current - entry) / entry * 100.0,
        SignalDirection::Short => (entry - current) / entry * 100.0,
    })
}
