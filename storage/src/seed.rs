//! Demo dataset written on a backend's first run
//!
//! Keeps the dashboard from starting empty: two historical closed signals
//! and five active ads.

use chrono::{Duration, Utc};
use common::{
    Ad, AdStatus, AssetType, ChartPoint, SignalDirection, SignalStatus, Timeframe, TradingSignal,
};

fn chart(base: f64, spread: f64) -> Vec<ChartPoint> {
    // Deterministic 20-point series; the values only need to look plausible.
    (0..20)
        .map(|i| ChartPoint {
            time: format!("{i}:00"),
            price: base + spread * ((i * 7 + 3) % 20) as f64 / 20.0,
        })
        .collect()
}

/// Two closed historical signals
pub fn demo_signals() -> Vec<TradingSignal> {
    vec![
        TradingSignal {
            id: "demo-1".to_string(),
            asset: "BTC/USD".to_string(),
            asset_type: AssetType::Crypto,
            direction: SignalDirection::Long,
            entry_price: 42500.0,
            current_price: Some(42500.0),
            stop_loss: 41000.0,
            take_profit: 45000.0,
            support: Some(41200.0),
            resistance: Some(44800.0),
            pattern: Some("Bull Flag Breakout".to_string()),
            timeframe: Timeframe::H4,
            status: SignalStatus::Closed,
            open_time: Utc::now() - Duration::days(2),
            close_time: Some(Utc::now() - Duration::days(1)),
            realized_pnl: Some(5.88),
            realized_pnl_value: Some(588.0),
            confidence_score: 88.0,
            technical_analysis: "Bull flag breakout on the 4H chart confirmed by volume spike."
                .to_string(),
            fundamental_analysis: "Spot ETF inflows remain strong, creating supply shock."
                .to_string(),
            chart_data: chart(41500.0, 2000.0),
            search_sources: None,
        },
        TradingSignal {
            id: "demo-2".to_string(),
            asset: "XAU/USD".to_string(),
            asset_type: AssetType::Commodity,
            direction: SignalDirection::Short,
            entry_price: 2050.0,
            current_price: Some(2050.0),
            stop_loss: 2065.0,
            take_profit: 2010.0,
            support: Some(2015.0),
            resistance: Some(2060.0),
            pattern: Some("Double Top".to_string()),
            timeframe: Timeframe::H1,
            status: SignalStatus::Closed,
            open_time: Utc::now() - Duration::days(5),
            close_time: Some(Utc::now() - Duration::days(4)),
            realized_pnl: Some(-0.73),
            realized_pnl_value: Some(-73.0),
            confidence_score: 72.0,
            technical_analysis: "Double top formation at resistance with RSI divergence."
                .to_string(),
            fundamental_analysis: "Stronger than expected CPI data pushed yields higher."
                .to_string(),
            chart_data: chart(2040.0, 30.0),
            search_sources: None,
        },
    ]
}

/// Five pre-approved ads so the rotation is never empty on first run
pub fn demo_ads() -> Vec<Ad> {
    let now = Utc::now();
    let entries = [
        ("ad-1", "BitVault", "Secure Cold Storage", "orange"),
        ("ad-2", "ForexPro", "0 Pip Spreads", "blue"),
        ("ad-3", "GoldRush", "Buy Physical Gold", "yellow"),
        ("ad-4", "AlphaBets", "AI Trading Signals", "purple"),
        ("ad-5", "SecureWallet", "Hardware Wallet Sale", "emerald"),
    ];
    entries
        .iter()
        .map(|(id, company, text, color)| Ad {
            id: id.to_string(),
            company: company.to_string(),
            text: text.to_string(),
            uri: None,
            color: color.to_string(),
            status: AdStatus::Active,
            timestamp: now,
        })
        .collect()
}
