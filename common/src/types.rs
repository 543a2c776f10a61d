use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Directional bias of a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalDirection {
    Long,
    Short,
}

impl SignalDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalDirection::Long => "LONG",
            SignalDirection::Short => "SHORT",
        }
    }
}

/// Lifecycle state of a signal
///
/// `Pending` is reserved in the wire format but never produced by this
/// service; signals go straight to `Active` on open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalStatus {
    Active,
    Closed,
    Pending,
}

/// Asset class of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetType {
    Crypto,
    Forex,
    Commodity,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Crypto => "Crypto",
            AssetType::Forex => "Forex",
            AssetType::Commodity => "Commodity",
        }
    }
}

/// Chart timeframe of the analysis behind a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "1H")]
    H1,
    #[serde(rename = "4H")]
    H4,
    #[serde(rename = "Daily")]
    D1,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M15 => "15m",
            Timeframe::H1 => "1H",
            Timeframe::H4 => "4H",
            Timeframe::D1 => "Daily",
        }
    }

    /// Parse a backend-provided timeframe label, if it is one of the
    /// known values.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "15m" => Some(Timeframe::M15),
            "1H" => Some(Timeframe::H1),
            "4H" => Some(Timeframe::H4),
            "Daily" => Some(Timeframe::D1),
            _ => None,
        }
    }
}

/// User risk appetite, embedded into generation prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Conservative => "Conservative",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::Aggressive => "Aggressive",
        }
    }
}

/// Intended holding period, embedded into generation prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeDuration {
    #[serde(rename = "Scalp (Short-term)")]
    Scalp,
    #[serde(rename = "Intraday")]
    Intraday,
    #[serde(rename = "Swing (Multi-day)")]
    Swing,
}

impl TradeDuration {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeDuration::Scalp => "Scalp (Short-term)",
            TradeDuration::Intraday => "Intraday",
            TradeDuration::Swing => "Swing (Multi-day)",
        }
    }
}

/// Operator's judgment when closing a signal manually
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Win,
    Loss,
}

/// One point of the simulated chart attached to a signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub time: String,
    pub price: f64,
}

/// A supporting citation returned by the generation backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSource {
    pub title: String,
    pub uri: String,
}

/// A recommended directional trade with defined entry, stop and target
///
/// Field names follow the persisted document shape: the same struct is
/// written to the local store and to the remote document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingSignal {
    pub id: String,
    /// Symbol from the asset catalog, e.g. "BTC/USD"
    pub asset: String,
    pub asset_type: AssetType,
    #[serde(rename = "type")]
    pub direction: SignalDirection,
    pub entry_price: f64,
    /// Live mark, refreshed while the signal is active; frozen at close
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub status: SignalStatus,
    pub open_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_time: Option<DateTime<Utc>>,
    /// Realized percent move, 2-decimal rounded; set exactly once at close
    #[serde(rename = "realizedPnL", default, skip_serializing_if = "Option::is_none")]
    pub realized_pnl: Option<f64>,
    /// Realized dollar amount at the fixed $100-per-1%-move notional
    #[serde(rename = "realizedPnLValue", default, skip_serializing_if = "Option::is_none")]
    pub realized_pnl_value: Option<f64>,
    pub technical_analysis: String,
    pub fundamental_analysis: String,
    /// 0-100
    pub confidence_score: f64,
    pub chart_data: Vec<ChartPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_sources: Option<Vec<SearchSource>>,
    /// Identified technical pattern, e.g. "Bull Flag"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistance: Option<f64>,
    pub timeframe: Timeframe,
}

impl TradingSignal {
    pub fn is_active(&self) -> bool {
        self.status == SignalStatus::Active
    }
}

/// Moderation state of a sponsor submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdStatus {
    Pending,
    Active,
    Rejected,
}

/// A sponsored ad shown in the public rotation once approved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ad {
    pub id: String,
    pub company: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Theme tag used by the presentation layer
    pub color: String,
    pub status: AdStatus,
    pub timestamp: DateTime<Utc>,
}

/// Device-scoped generation preferences
///
/// Stored locally only, never synced to the signal/ad backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub risk_level: RiskLevel,
    pub trade_duration: TradeDuration,
    /// Order-preserving set, toggled add/remove
    pub preferred_indicators: Vec<String>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            risk_level: RiskLevel::Moderate,
            trade_duration: TradeDuration::Intraday,
            preferred_indicators: vec![
                "RSI (Relative Strength Index)".to_string(),
                "Moving Averages (SMA/EMA)".to_string(),
            ],
        }
    }
}

impl UserPreferences {
    /// Add the indicator if absent, remove it if present.
    pub fn toggle_indicator(&mut self, indicator: &str) {
        if let Some(pos) = self.preferred_indicators.iter().position(|i| i == indicator) {
            self.preferred_indicators.remove(pos);
        } else {
            self.preferred_indicators.push(indicator.to_string());
        }
    }
}

/// Indicators offered in the preferences UI
pub const AVAILABLE_INDICATORS: [&str; 7] = [
    "RSI (Relative Strength Index)",
    "MACD (Moving Average Convergence Divergence)",
    "Bollinger Bands",
    "Fibonacci Retracement",
    "Moving Averages (SMA/EMA)",
    "Volume Profile",
    "Stochastic Oscillator",
];

/// A tradable entry of the fixed asset catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetInfo {
    pub symbol: &'static str,
    pub name: &'static str,
    pub asset_type: AssetType,
}

/// The fixed, ordered catalog of tradable assets
///
/// The first entry is the default selection.
pub const ASSETS: [AssetInfo; 7] = [
    AssetInfo { symbol: "BTC/USD", name: "Bitcoin", asset_type: AssetType::Crypto },
    AssetInfo { symbol: "ETH/USD", name: "Ethereum", asset_type: AssetType::Crypto },
    AssetInfo { symbol: "XAU/USD", name: "Gold", asset_type: AssetType::Commodity },
    AssetInfo { symbol: "XAG/USD", name: "Silver", asset_type: AssetType::Commodity },
    AssetInfo { symbol: "EUR/USD", name: "Euro/Dollar", asset_type: AssetType::Forex },
    AssetInfo { symbol: "GBP/USD", name: "Pound/Dollar", asset_type: AssetType::Forex },
    AssetInfo { symbol: "USD/JPY", name: "Dollar/Yen", asset_type: AssetType::Forex },
];
