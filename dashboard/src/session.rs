//! Session coordinator
//!
//! Owns the in-memory signal and ad collections for the process lifetime.
//! The store is loaded once at startup and written through on every
//! mutation; memory stays authoritative afterwards, so reads never touch
//! the backend again.
//!
//! When the backend is unreachable at startup the session enters degraded
//! mode: whatever loaded stays readable, every persisting action is
//! rejected with `LifecycleError::Degraded`. Price refresh is memory-only
//! and keeps working.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use common::{
    Ad, AssetInfo, CloseOutcome, GenerationError, LifecycleError, SignalStatus, StoreError,
    TradingSignal, UserPreferences,
};
use generation::{PriceFeed, SignalGenerator};
use storage::{BackendKind, PreferencesStore, Store};
use tracing::{info, warn};
use uuid::Uuid;

use crate::ads::{self, AdSubmission};
use crate::filter::{SignalFilter, Tab};
use crate::lifecycle;

/// How hard to try against the backend at startup
#[derive(Debug, Clone, Copy)]
pub enum LoadPolicy {
    /// Race the load against a timeout; on loss, degrade instead of failing
    TimeBoxed(Duration),
    /// Propagate any init or load failure to the caller
    Strict,
}

/// Aggregate performance figures for the dashboard header
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionStats {
    pub total: usize,
    pub active: usize,
    pub closed: usize,
    pub wins: usize,
    /// Percent of closed signals that were wins; None until something closed
    pub win_rate: Option<f64>,
    /// Sum of realized dollar values across closed signals
    pub total_realized_value: f64,
}

/// One user's live view of the dashboard
pub struct Session {
    store: Arc<dyn Store>,
    generator: SignalGenerator,
    prices: PriceFeed,
    prefs_store: PreferencesStore,

    pub signals: Vec<TradingSignal>,
    pub ads: Vec<Ad>,
    pub preferences: UserPreferences,
    pub filter: SignalFilter,
    degraded: bool,
}

impl Session {
    pub fn new(
        store: Arc<dyn Store>,
        generator: SignalGenerator,
        prices: PriceFeed,
        prefs_store: PreferencesStore,
    ) -> Self {
        Self {
            store,
            generator,
            prices,
            prefs_store,
            signals: Vec::new(),
            ads: Vec::new(),
            preferences: UserPreferences::default(),
            filter: SignalFilter::default(),
            degraded: false,
        }
    }

    /// Initial load: preferences first (local, cannot fail), then the
    /// backend collections under the given policy.
    pub async fn load(&mut self, policy: LoadPolicy) -> Result<(), StoreError> {
        self.preferences = self.prefs_store.load().await;

        match policy {
            LoadPolicy::Strict => {
                self.load_collections().await?;
            }
            LoadPolicy::TimeBoxed(limit) => {
                match tokio::time::timeout(limit, self.load_collections()).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        warn!(error = %e, "backend load failed, entering degraded mode");
                        self.degraded = true;
                    }
                    Err(_) => {
                        warn!(
                            timeout_ms = limit.as_millis() as u64,
                            "backend load timed out, entering degraded mode"
                        );
                        self.degraded = true;
                    }
                }
            }
        }

        info!(
            backend = self.store.kind().as_str(),
            signals = self.signals.len(),
            ads = self.ads.len(),
            degraded = self.degraded,
            "session loaded"
        );
        Ok(())
    }

    async fn load_collections(&mut self) -> Result<(), StoreError> {
        self.store.init().await?;
        let (signals, ads) = tokio::join!(self.store.signals().get_all(), self.store.ads().get_all());
        self.signals = signals?;
        self.ads = ads?;
        Ok(())
    }

    pub fn backend(&self) -> BackendKind {
        self.store.kind()
    }

    pub fn degraded(&self) -> bool {
        self.degraded
    }

    fn ensure_writable(&self) -> Result<(), LifecycleError> {
        if self.degraded {
            return Err(LifecycleError::Degraded);
        }
        Ok(())
    }

    /// Generate, persist and front-insert a new ACTIVE signal for a
    /// catalog asset. On success the view resets to show it: tab back to
    /// All, secondary filters cleared.
    pub async fn generate_signal(
        &mut self,
        asset: &AssetInfo,
    ) -> Result<&TradingSignal, LifecycleError> {
        self.ensure_writable()?;

        let draft = self
            .generator
            .generate(asset.symbol, asset.asset_type, &self.preferences)
            .await?;

        let signal = TradingSignal {
            id: Uuid::new_v4().to_string(),
            asset: asset.symbol.to_string(),
            asset_type: asset.asset_type,
            direction: draft.direction,
            entry_price: draft.entry_price,
            // The mark starts at entry until the first refresh
            current_price: Some(draft.entry_price),
            stop_loss: draft.stop_loss,
            take_profit: draft.take_profit,
            status: SignalStatus::Active,
            open_time: Utc::now(),
            close_time: None,
            realized_pnl: None,
            realized_pnl_value: None,
            technical_analysis: draft.technical_analysis,
            fundamental_analysis: draft.fundamental_analysis,
            confidence_score: draft.confidence_score,
            chart_data: draft.chart_data,
            search_sources: if draft.search_sources.is_empty() {
                None
            } else {
                Some(draft.search_sources)
            },
            pattern: draft.pattern,
            support: draft.support,
            resistance: draft.resistance,
            timeframe: draft.timeframe,
        };

        self.store.signals().add(&signal).await?;
        self.signals.insert(0, signal);
        self.filter.tab = Tab::All;
        self.filter.clear();
        Ok(&self.signals[0])
    }

    /// Close a signal with the operator's outcome call.
    ///
    /// Persist-then-commit: memory changes only after the store accepted
    /// the update, so a write failure leaves the signal open.
    pub async fn close_signal(
        &mut self,
        id: &str,
        outcome: CloseOutcome,
    ) -> Result<(), LifecycleError> {
        self.ensure_writable()?;
        let index = self
            .signals
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| LifecycleError::UnknownSignal(id.to_string()))?;

        let mut closed = self.signals[index].clone();
        lifecycle::close_signal(&mut closed, outcome, Utc::now())?;
        self.store.signals().update(&closed).await?;
        self.signals[index] = closed;
        Ok(())
    }

    pub async fn delete_signal(&mut self, id: &str) -> Result<(), LifecycleError> {
        self.ensure_writable()?;
        let index = self
            .signals
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| LifecycleError::UnknownSignal(id.to_string()))?;

        self.store.signals().delete(id).await?;
        self.signals.remove(index);
        Ok(())
    }

    /// One batched refresh of the marks on active signals.
    ///
    /// Marks are memory-only between restarts, so this works in degraded
    /// mode too. Symbols the backend cannot resolve keep their prior mark;
    /// a total failure changes nothing. Returns how many marks moved.
    pub async fn refresh_prices(&mut self) -> Result<usize, GenerationError> {
        let symbols: BTreeSet<String> = self
            .signals
            .iter()
            .filter(|s| s.is_active())
            .map(|s| s.asset.clone())
            .collect();
        if symbols.is_empty() {
            return Ok(0);
        }

        let prices = self.prices.fetch(&symbols).await?;
        let mut updated = 0;
        for signal in self.signals.iter_mut().filter(|s| s.is_active()) {
            if let Some(price) = prices.get(&signal.asset) {
                signal.current_price = Some(*price);
                updated += 1;
            }
        }
        Ok(updated)
    }

    /// Persist and front-insert a PENDING sponsor submission.
    pub async fn submit_ad(&mut self, submission: AdSubmission) -> Result<&Ad, LifecycleError> {
        self.ensure_writable()?;
        let ad = submission.into_pending(Utc::now());
        self.store.ads().add(&ad).await?;
        self.ads.insert(0, ad);
        Ok(&self.ads[0])
    }

    /// Approve a pending ad into the public rotation.
    pub async fn approve_ad(&mut self, id: &str) -> Result<(), LifecycleError> {
        self.ensure_writable()?;
        let index = self
            .ads
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| LifecycleError::UnknownAd(id.to_string()))?;

        let mut approved = self.ads[index].clone();
        ads::approve(&mut approved);
        self.store.ads().update(&approved).await?;
        self.ads[index] = approved;
        Ok(())
    }

    /// Rejection deletes the submission outright; nothing REJECTED is kept.
    pub async fn reject_ad(&mut self, id: &str) -> Result<(), LifecycleError> {
        self.ensure_writable()?;
        let index = self
            .ads
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| LifecycleError::UnknownAd(id.to_string()))?;

        self.store.ads().delete(id).await?;
        self.ads.remove(index);
        Ok(())
    }

    /// Replace preferences and save them; device-local, works degraded.
    pub async fn update_preferences(
        &mut self,
        preferences: UserPreferences,
    ) -> Result<(), StoreError> {
        self.preferences = preferences;
        self.prefs_store.save(&self.preferences).await
    }

    /// Signals passing the current filter, input order preserved
    pub fn filtered_signals(&self) -> Vec<&TradingSignal> {
        self.filter.apply(&self.signals)
    }

    pub fn stats(&self) -> SessionStats {
        let active = self.signals.iter().filter(|s| s.is_active()).count();
        let closed_signals: Vec<_> = self
            .signals
            .iter()
            .filter(|s| s.status == SignalStatus::Closed)
            .collect();
        let closed = closed_signals.len();
        let wins = closed_signals
            .iter()
            .filter(|s| s.realized_pnl.unwrap_or(0.0) > 0.0)
            .count();
        let total_realized_value = closed_signals
            .iter()
            .filter_map(|s| s.realized_pnl_value)
            .sum();
        SessionStats {
            total: self.signals.len(),
            active,
            closed,
            wins,
            win_rate: (closed > 0).then(|| wins as f64 / closed as f64 * 100.0),
            total_realized_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::{AssetType, SignalStatus, ASSETS};
    use generation::{Completion, CompletionBackend};
    use storage::MemoryStore;

    struct StaticBackend {
        text: String,
    }

    #[async_trait]
    impl CompletionBackend for StaticBackend {
        async fn complete(
            &self,
            _prompt: &str,
            _temperature: f32,
        ) -> Result<Completion, GenerationError> {
            Ok(Completion {
                text: self.text.clone(),
                citations: Vec::new(),
            })
        }
    }

    const SIGNAL_BODY: &str = r#"{"type":"LONG","entryPrice":42500,"stopLoss":41000,
        "takeProfit":45000,"timeframe":"4H","technicalAnalysis":"ta",
        "fundamentalAnalysis":"fa","confidenceScore":88,"chartData":[]}"#;

    fn session_with(dir: &std::path::Path, store: Arc<dyn Store>, text: &str) -> Session {
        let backend: Arc<dyn CompletionBackend> = Arc::new(StaticBackend {
            text: text.to_string(),
        });
        Session::new(
            store,
            SignalGenerator::new(backend.clone()),
            PriceFeed::new(backend),
            PreferencesStore::new(dir),
        )
    }

    async fn loaded_session(dir: &std::path::Path, text: &str) -> Session {
        let mut session = session_with(dir, Arc::new(MemoryStore::new()), text);
        session.load(LoadPolicy::Strict).await.unwrap();
        session
    }

    fn btc() -> AssetInfo {
        ASSETS[0]
    }

    #[tokio::test]
    async fn generate_persists_and_front_inserts() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = loaded_session(dir.path(), SIGNAL_BODY).await;

        let created = session.generate_signal(&btc()).await.unwrap();
        assert_eq!(created.asset, "BTC/USD");
        assert_eq!(created.status, SignalStatus::Active);
        assert_eq!(created.current_price, Some(42500.0));

        // Write-through landed in the store too.
        let stored = session.store.signals().get_all().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, session.signals[0].id);
    }

    #[tokio::test]
    async fn generate_resets_the_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = loaded_session(dir.path(), SIGNAL_BODY).await;
        session.filter.tab = Tab::History;
        session.filter.asset_type = Some(AssetType::Forex);

        session.generate_signal(&btc()).await.unwrap();
        assert_eq!(session.filter.tab, Tab::All);
        assert_eq!(session.filter.active_count(), 0);
        assert_eq!(session.filtered_signals()[0].id, session.signals[0].id);
    }

    #[tokio::test]
    async fn generation_failure_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = loaded_session(dir.path(), "no json here").await;

        let result = session.generate_signal(&btc()).await;
        assert!(matches!(
            result,
            Err(LifecycleError::Generation(GenerationError::NoJsonPayload))
        ));
        assert!(session.signals.is_empty());
        assert!(session.store.signals().get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn close_realizes_pnl_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = loaded_session(dir.path(), SIGNAL_BODY).await;
        session.generate_signal(&btc()).await.unwrap();
        let id = session.signals[0].id.clone();

        session.close_signal(&id, CloseOutcome::Win).await.unwrap();
        assert_eq!(session.signals[0].realized_pnl, Some(5.88));
        assert_eq!(session.signals[0].realized_pnl_value, Some(588.0));

        let again = session.close_signal(&id, CloseOutcome::Loss).await;
        assert!(matches!(again, Err(LifecycleError::AlreadyClosed(_))));
    }

    #[tokio::test]
    async fn close_of_unknown_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = loaded_session(dir.path(), SIGNAL_BODY).await;
        let result = session.close_signal("missing", CloseOutcome::Win).await;
        assert!(matches!(result, Err(LifecycleError::UnknownSignal(_))));
    }

    #[tokio::test]
    async fn refresh_updates_only_active_marks() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = loaded_session(dir.path(), SIGNAL_BODY).await;
        session.generate_signal(&btc()).await.unwrap();
        session.generate_signal(&btc()).await.unwrap();
        let closed_id = session.signals[1].id.clone();
        session
            .close_signal(&closed_id, CloseOutcome::Win)
            .await
            .unwrap();

        // Swap the completion text to a price map for the refresh.
        let backend: Arc<dyn CompletionBackend> = Arc::new(StaticBackend {
            text: r#"{"BTC/USD": 64000.5}"#.to_string(),
        });
        session.prices = PriceFeed::new(backend);

        let updated = session.refresh_prices().await.unwrap();
        assert_eq!(updated, 1);
        assert_eq!(session.signals[0].current_price, Some(64000.5));
        // The closed signal's mark stays frozen.
        assert_eq!(session.signals[1].current_price, Some(42500.0));
    }

    #[tokio::test]
    async fn refresh_with_no_active_signals_skips_the_backend() {
        let dir = tempfile::tempdir().unwrap();
        // A braceless completion would error if the backend were called.
        let mut session = loaded_session(dir.path(), "not json").await;
        assert_eq!(session.refresh_prices().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn ad_moderation_flow() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = loaded_session(dir.path(), SIGNAL_BODY).await;

        let submission = AdSubmission {
            company: "BitVault".to_string(),
            text: "Cold storage".to_string(),
            uri: None,
            color: "orange".to_string(),
        };
        let id = session.submit_ad(submission).await.unwrap().id.clone();
        assert_eq!(session.ads[0].status, common::AdStatus::Pending);

        session.approve_ad(&id).await.unwrap();
        assert_eq!(session.ads[0].status, common::AdStatus::Active);

        session.reject_ad(&id).await.unwrap();
        assert!(session.ads.is_empty());
        assert!(session.store.ads().get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_ad_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = loaded_session(dir.path(), SIGNAL_BODY).await;
        assert!(matches!(
            session.approve_ad("missing").await,
            Err(LifecycleError::UnknownAd(_))
        ));
    }

    #[tokio::test]
    async fn degraded_session_rejects_mutations_but_refreshes() {
        struct DownStore;

        #[async_trait]
        impl Store for DownStore {
            fn kind(&self) -> BackendKind {
                BackendKind::Remote
            }
            async fn init(&self) -> Result<(), StoreError> {
                Err(StoreError::Connection("unreachable".to_string()))
            }
            fn signals(&self) -> &dyn storage::Collection<TradingSignal> {
                unreachable!("init fails first")
            }
            fn ads(&self) -> &dyn storage::Collection<Ad> {
                unreachable!("init fails first")
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(dir.path(), Arc::new(DownStore), SIGNAL_BODY);
        session
            .load(LoadPolicy::TimeBoxed(Duration::from_secs(4)))
            .await
            .unwrap();
        assert!(session.degraded());

        assert!(matches!(
            session.generate_signal(&btc()).await,
            Err(LifecycleError::Degraded)
        ));
        assert!(matches!(
            session.close_signal("x", CloseOutcome::Win).await,
            Err(LifecycleError::Degraded)
        ));
        // Memory-only refresh still runs (no active signals, so a no-op).
        assert_eq!(session.refresh_prices().await.unwrap(), 0);
        // Preferences are device-local and still save.
        session
            .update_preferences(UserPreferences::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn strict_policy_propagates_init_failure() {
        struct DownStore;

        #[async_trait]
        impl Store for DownStore {
            fn kind(&self) -> BackendKind {
                BackendKind::Remote
            }
            async fn init(&self) -> Result<(), StoreError> {
                Err(StoreError::Connection("unreachable".to_string()))
            }
            fn signals(&self) -> &dyn storage::Collection<TradingSignal> {
                unreachable!("init fails first")
            }
            fn ads(&self) -> &dyn storage::Collection<Ad> {
                unreachable!("init fails first")
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(dir.path(), Arc::new(DownStore), SIGNAL_BODY);
        assert!(matches!(
            session.load(LoadPolicy::Strict).await,
            Err(StoreError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn stats_track_wins_and_realized_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = loaded_session(dir.path(), SIGNAL_BODY).await;
        session.generate_signal(&btc()).await.unwrap();
        session.generate_signal(&btc()).await.unwrap();
        session.generate_signal(&btc()).await.unwrap();

        let win_id = session.signals[0].id.clone();
        let loss_id = session.signals[1].id.clone();
        session.close_signal(&win_id, CloseOutcome::Win).await.unwrap();
        session.close_signal(&loss_id, CloseOutcome::Loss).await.unwrap();

        let stats = session.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.closed, 2);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.win_rate, Some(50.0));
        assert_eq!(stats.total_realized_value, 588.0 - 353.0);
    }

    #[tokio::test]
    async fn preferences_survive_sessions() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut session = loaded_session(dir.path(), SIGNAL_BODY).await;
            let mut prefs = session.preferences.clone();
            prefs.toggle_indicator("Volume Profile");
            session.update_preferences(prefs).await.unwrap();
        }

        let mut session = session_with(dir.path(), Arc::new(MemoryStore::new()), SIGNAL_BODY);
        session.load(LoadPolicy::Strict).await.unwrap();
        assert!(session
            .preferences
            .preferred_indicators
            .iter()
            .any(|i| i == "Volume Profile"));
    }
}
