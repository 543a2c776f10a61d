//! Conjunctive signal filtering
//!
//! All predicates must pass; an unset predicate is vacuously true.
//! Filtering never mutates the underlying collection.

use common::{AssetType, SignalDirection, SignalStatus, Timeframe, TradingSignal};

/// Which lifecycle slice the list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    All,
    Active,
    History,
}

/// The active filter set
#[derive(Debug, Clone, Default)]
pub struct SignalFilter {
    pub tab: Tab,
    pub asset_type: Option<AssetType>,
    pub direction: Option<SignalDirection>,
    pub timeframe: Option<Timeframe>,
    pub min_confidence: f64,
}

impl SignalFilter {
    pub fn matches(&self, signal: &TradingSignal) -> bool {
        match self.tab {
            Tab::All => {}
            Tab::Active => {
                if signal.status != SignalStatus::Active {
                    return false;
                }
            }
            Tab::History => {
                if signal.status != SignalStatus::Closed {
                    return false;
                }
            }
        }
        if self.asset_type.is_some_and(|t| signal.asset_type != t) {
            return false;
        }
        if self.direction.is_some_and(|d| signal.direction != d) {
            return false;
        }
        if self.timeframe.is_some_and(|t| signal.timeframe != t) {
            return false;
        }
        signal.confidence_score >= self.min_confidence
    }

    /// Borrowing view of the signals that pass; input order preserved
    pub fn apply<'a>(&self, signals: &'a [TradingSignal]) -> Vec<&'a TradingSignal> {
        signals.iter().filter(|s| self.matches(s)).collect()
    }

    /// Clear the four secondary predicates, keeping the tab
    pub fn clear(&mut self) {
        self.asset_type = None;
        self.direction = None;
        self.timeframe = None;
        self.min_confidence = 0.0;
    }

    /// How many secondary predicates are set (for the filter badge)
    pub fn active_count(&self) -> usize {
        usize::from(self.asset_type.is_some())
            + usize::from(self.direction.is_some())
            + usize::from(self.timeframe.is_some())
            + usize::from(self.min_confidence > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn signal(
        id: &str,
        status: SignalStatus,
        asset_type: AssetType,
        direction: SignalDirection,
        timeframe: Timeframe,
        confidence: f64,
    ) -> TradingSignal {
        TradingSignal {
            id: id.to_string(),
            asset: "BTC/USD".to_string(),
            asset_type,
            direction,
            entry_price: 100.0,
            current_price: Some(100.0),
            stop_loss: 90.0,
            take_profit: 120.0,
            status,
            open_time: Utc::now(),
            close_time: None,
            realized_pnl: None,
            realized_pnl_value: None,
            technical_analysis: String::new(),
            fundamental_analysis: String::new(),
            confidence_score: confidence,
            chart_data: Vec::new(),
            search_sources: None,
            pattern: None,
            support: None,
            resistance: None,
            timeframe,
        }
    }

    fn fixture() -> Vec<TradingSignal> {
        vec![
            signal("a", SignalStatus::Active, AssetType::Crypto, SignalDirection::Long, Timeframe::H1, 90.0),
            signal("b", SignalStatus::Active, AssetType::Forex, SignalDirection::Short, Timeframe::H4, 60.0),
            signal("c", SignalStatus::Closed, AssetType::Crypto, SignalDirection::Long, Timeframe::M15, 75.0),
            signal("d", SignalStatus::Closed, AssetType::Commodity, SignalDirection::Short, Timeframe::D1, 40.0),
        ]
    }

    fn ids(filtered: Vec<&TradingSignal>) -> Vec<&str> {
        filtered.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn default_filter_passes_everything() {
        let signals = fixture();
        assert_eq!(SignalFilter::default().apply(&signals).len(), 4);
    }

    #[test]
    fn tabs_slice_by_status() {
        let signals = fixture();
        let active = SignalFilter { tab: Tab::Active, ..Default::default() };
        assert_eq!(ids(active.apply(&signals)), vec!["a", "b"]);
        let history = SignalFilter { tab: Tab::History, ..Default::default() };
        assert_eq!(ids(history.apply(&signals)), vec!["c", "d"]);
    }

    #[test]
    fn predicates_are_conjunctive() {
        let signals = fixture();
        let filter = SignalFilter {
            tab: Tab::All,
            asset_type: Some(AssetType::Crypto),
            direction: Some(SignalDirection::Long),
            timeframe: None,
            min_confidence: 80.0,
        };
        assert_eq!(ids(filter.apply(&signals)), vec!["a"]);
    }

    #[test]
    fn predicate_order_is_irrelevant() {
        // Same predicate set expressed twice; conjunction is commutative,
        // so the result set must be identical.
        let signals = fixture();
        let a = SignalFilter {
            tab: Tab::Active,
            asset_type: Some(AssetType::Crypto),
            min_confidence: 50.0,
            ..Default::default()
        };
        let b = SignalFilter {
            min_confidence: 50.0,
            asset_type: Some(AssetType::Crypto),
            tab: Tab::Active,
            ..Default::default()
        };
        assert_eq!(ids(a.apply(&signals)), ids(b.apply(&signals)));
    }

    #[test]
    fn min_confidence_is_inclusive() {
        let signals = fixture();
        let filter = SignalFilter { min_confidence: 90.0, ..Default::default() };
        assert_eq!(ids(filter.apply(&signals)), vec!["a"]);
    }

    #[test]
    fn clear_keeps_tab_and_counts_reset() {
        let mut filter = SignalFilter {
            tab: Tab::History,
            asset_type: Some(AssetType::Forex),
            direction: Some(SignalDirection::Short),
            timeframe: Some(Timeframe::H4),
            min_confidence: 50.0,
        };
        assert_eq!(filter.active_count(), 4);
        filter.clear();
        assert_eq!(filter.active_count(), 0);
        assert_eq!(filter.tab, Tab::History);
    }

    #[test]
    fn filtering_does_not_mutate_input() {
        let signals = fixture();
        let filter = SignalFilter { tab: Tab::Active, ..Default::default() };
        let _ = filter.apply(&signals);
        assert_eq!(signals.len(), 4);
    }
}
