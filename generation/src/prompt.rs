//! Prompt construction
//!
//! The backend has no schema enforcement; these prompts carry the whole
//! contract (exact enum strings, 20-point chart, raw-JSON-only answers).
//! User preferences are rendered as natural-language constraints, not
//! validated structurally.

use common::{AssetType, UserPreferences};

/// Prompt asking for one trading signal as a raw JSON object
pub fn signal_prompt(symbol: &str, asset_type: AssetType, prefs: &UserPreferences) -> String {
    let risk_instruction = format!(
        "Risk Profile: {}. Adjust Stop Loss and Take Profit width accordingly. {}",
        prefs.risk_level.as_str(),
        match prefs.risk_level {
            common::RiskLevel::Conservative =>
                "Prioritize capital preservation with tight stops.",
            _ => "Allow for wider volatility.",
        }
    );

    let duration_instruction = format!(
        "Trade Duration: {}. Analysis should reflect this timeframe. \
         (Scalp = 15m/1H, Intraday = 1H/4H, Swing = 4H/Daily).",
        prefs.trade_duration.as_str()
    );

    let indicators_instruction = if prefs.preferred_indicators.is_empty() {
        String::new()
    } else {
        format!(
            "MANDATORY: You MUST incorporate the following technical indicators \
             in your Technical Analysis text: {}.",
            prefs.preferred_indicators.join(", ")
        )
    };

    format!(
        r#"Act as a world-class financial analyst (top 1% percentile).

TASK:
1. Use web search to find the CURRENT LIVE PRICE of {symbol} ({asset_type}) and the latest technical/fundamental news from the last 24 hours.
2. Based on this REAL-TIME data, formulate a high-probability trading signal.
3. Identify a specific technical chart pattern (e.g., Bull Flag, Head and Shoulders, Double Bottom, Support Bounce, Breakout) that justifies this trade.
4. Return the response STRICTLY as a raw JSON object. Do not use Markdown formatting. Do not include comments in the JSON.

USER PREFERENCES (Apply these strictly):
{risk_instruction}
{duration_instruction}
{indicators_instruction}

RESPONSE FORMAT:
{{
  "type": "LONG",
  "entryPrice": 0,
  "stopLoss": 0,
  "takeProfit": 0,
  "pattern": "Name of pattern",
  "timeframe": "15m",
  "support": 0,
  "resistance": 0,
  "technicalAnalysis": "Analysis text",
  "fundamentalAnalysis": "Analysis text",
  "confidenceScore": 85,
  "chartData": [
    {{"time": "HH:MM", "price": 0}}
  ]
}}

CRITICAL REQUIREMENTS:
- "type" must be exactly "LONG" or "SHORT".
- "timeframe" must be one of: "15m", "1H", "4H", "Daily".
- "entryPrice" must be the live market price found via search.
- "chartData" must contain exactly 20 objects.
- The "chartData" prices must visually form the identified "pattern" and END exactly at the "entryPrice".
- Do not include explanations outside the JSON."#,
        asset_type = asset_type.as_str(),
    )
}

/// Prompt asking for current prices of a symbol batch as a JSON map
pub fn price_prompt<'a>(symbols: impl IntoIterator<Item = &'a str>) -> String {
    let joined = symbols.into_iter().collect::<Vec<_>>().join(", ");
    format!(
        r#"Find the CURRENT LIVE market price for the following assets: {joined}.
Return a RAW JSON object mapping the asset symbol to its current numerical price.
Example: {{"BTC/USD": 64000.50, "XAU/USD": 2300.10}}
Do not include any text other than the JSON."#
    )
}
