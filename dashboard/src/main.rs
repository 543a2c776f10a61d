use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use dashboard::{AdRotation, AdminGate, AppConfig, Session};
use generation::{CompletionBackend, GeminiClient, PriceFeed, SignalGenerator};
use storage::{select_store, PreferencesStore};
use tracing::{info, warn, Level};
use tracing_subscriber::fmt;

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_max_level(Level::INFO).init();

    let config_path = std::env::var("ALPHASIGNAL_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("alphasignal.toml"));
    let config = AppConfig::load(&config_path)?;

    let gate = AdminGate::new(config.admin.secret.clone());
    if gate.verify("admin123") {
        warn!("moderation console is using the default secret");
    }

    let data_dir = config.data_dir();
    let store = select_store(config.remote_config(), &data_dir);

    let backend: Arc<dyn CompletionBackend> = Arc::new(GeminiClient::new(config.gemini_config()));
    let mut session = Session::new(
        store,
        SignalGenerator::new(backend.clone()),
        PriceFeed::new(backend),
        PreferencesStore::new(&data_dir),
    );
    session.load(config.load_policy()).await?;

    let stats = session.stats();
    info!(
        backend = session.backend().as_str(),
        degraded = session.degraded(),
        signals = stats.total,
        active = stats.active,
        ads = session.ads.len(),
        "dashboard ready"
    );

    let mut rotation = AdRotation::new();
    let mut price_tick = tokio::time::interval(config.price_refresh_interval());
    let mut ad_tick = tokio::time::interval(config.ad_rotation_interval());
    // The first tick of an interval fires immediately; skip it.
    price_tick.tick().await;
    ad_tick.tick().await;

    loop {
        tokio::select! {
            _ = price_tick.tick() => {
                match session.refresh_prices().await {
                    Ok(updated) if updated > 0 => {
                        info!(updated, "refreshed marks on active signals");
                    }
                    Ok(_) => {}
                    // Marks keep their prior values on a failed batch.
                    Err(e) => warn!(error = %e, "price refresh failed"),
                }
            }
            _ = ad_tick.tick() => {
                rotation.advance();
                if let Some(ad) = rotation.current(&session.ads) {
                    info!(company = %ad.company, "rotated sponsor slot");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }

    Ok(())
}
