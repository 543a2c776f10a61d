//! Signal generation pipeline
//!
//! One completion round-trip, then defensive parsing and validation. The
//! result is a `SignalDraft`: a signal missing only the session-assigned
//! fields (id, status, open time, asset, current price), which the
//! lifecycle engine completes before persisting.

use std::sync::Arc;

use common::{
    AssetType, ChartPoint, GenerationError, SearchSource, SignalDirection, Timeframe,
    UserPreferences,
};
use serde::Deserialize;
use tracing::debug;

use crate::backend::{Completion, CompletionBackend};
use crate::extract::extract_json;
use crate::prompt;

const SIGNAL_TEMPERATURE: f32 = 0.4;

/// The backend-declared JSON shape; numeric and text fields are trusted
/// and passed through without re-derivation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSignal {
    #[serde(rename = "type")]
    direction: String,
    entry_price: f64,
    stop_loss: f64,
    take_profit: f64,
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    timeframe: Option<String>,
    #[serde(default)]
    support: Option<f64>,
    #[serde(default)]
    resistance: Option<f64>,
    #[serde(default)]
    technical_analysis: String,
    #[serde(default)]
    fundamental_analysis: String,
    #[serde(default)]
    confidence_score: f64,
    #[serde(default)]
    chart_data: Vec<ChartPoint>,
}

/// A validated signal awaiting session-assigned fields
#[derive(Debug, Clone)]
pub struct SignalDraft {
    pub direction: SignalDirection,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub pattern: Option<String>,
    pub timeframe: Timeframe,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    pub technical_analysis: String,
    pub fundamental_analysis: String,
    pub confidence_score: f64,
    pub chart_data: Vec<ChartPoint>,
    pub search_sources: Vec<SearchSource>,
}

/// Turns completions into validated signal drafts
pub struct SignalGenerator {
    backend: Arc<dyn CompletionBackend>,
}

impl SignalGenerator {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Generate a draft for one catalog asset under the given preferences.
    pub async fn generate(
        &self,
        symbol: &str,
        asset_type: AssetType,
        prefs: &UserPreferences,
    ) -> Result<SignalDraft, GenerationError> {
        let prompt = prompt::signal_prompt(symbol, asset_type, prefs);
        let completion = self.backend.complete(&prompt, SIGNAL_TEMPERATURE).await?;
        let draft = parse_draft(completion)?;
        debug!(
            symbol,
            direction = draft.direction.as_str(),
            confidence = draft.confidence_score,
            "generated signal draft"
        );
        Ok(draft)
    }
}

fn parse_draft(completion: Completion) -> Result<SignalDraft, GenerationError> {
    if completion.text.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let raw: RawSignal = extract_json(&completion.text)?;

    let direction = match raw.direction.as_str() {
        "LONG" => SignalDirection::Long,
        "SHORT" => SignalDirection::Short,
        other => return Err(GenerationError::InvalidDirection(other.to_string())),
    };

    // The backend is trusted for numeric content, but stop/target must at
    // least bracket the entry consistently with the declared direction.
    let levels_consistent = match direction {
        SignalDirection::Long => {
            raw.stop_loss < raw.entry_price && raw.entry_price < raw.take_profit
        }
        SignalDirection::Short => {
            raw.take_profit < raw.entry_price && raw.entry_price < raw.stop_loss
        }
    };
    if !levels_consistent {
        return Err(GenerationError::InconsistentLevels {
            direction: direction.as_str(),
        });
    }

    let timeframe = raw
        .timeframe
        .as_deref()
        .and_then(Timeframe::parse)
        .unwrap_or(Timeframe::H1);

    // Citations without a usable link are dropped; no sources is fine.
    let search_sources = completion
        .citations
        .into_iter()
        .filter_map(|citation| {
            citation
                .uri
                .filter(|uri| !uri.is_empty())
                .map(|uri| SearchSource {
                    title: citation.title,
                    uri,
                })
        })
        .collect();

    Ok(SignalDraft {
        direction,
        entry_price: raw.entry_price,
        stop_loss: raw.stop_loss,
        take_profit: raw.take_profit,
        pattern: raw.pattern,
        timeframe,
        support: raw.support,
        resistance: raw.resistance,
        technical_analysis: raw.technical_analysis,
        fundamental_analysis: raw.fundamental_analysis,
        confidence_score: raw.confidence_score,
        chart_data: raw.chart_data,
        search_sources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Citation;
    use async_trait::async_trait;

    struct StaticBackend {
        completion: Completion,
    }

    #[async_trait]
    impl CompletionBackend for StaticBackend {
        async fn complete(
            &self,
            _prompt: &str,
            _temperature: f32,
        ) -> Result<Completion, GenerationError> {
            Ok(self.completion.clone())
        }
    }

    fn generator(text: &str, citations: Vec<Citation>) -> SignalGenerator {
        SignalGenerator::new(Arc::new(StaticBackend {
            completion: Completion {
                text: text.to_string(),
                citations,
            },
        }))
    }

    const LONG_BODY: &str = r#"{"type":"LONG","entryPrice":42500,"stopLoss":41000,
        "takeProfit":45000,"pattern":"Bull Flag","timeframe":"4H","support":41200,
        "resistance":44800,"technicalAnalysis":"ta","fundamentalAnalysis":"fa",
        "confidenceScore":88,"chartData":[{"time":"09:00","price":42400}]}"#;

    async fn run(gen: &SignalGenerator) -> Result<SignalDraft, GenerationError> {
        gen.generate("BTC/USD", AssetType::Crypto, &UserPreferences::default())
            .await
    }

    #[tokio::test]
    async fn parses_noisy_completion() {
        let text = format!("Here is your signal:\n{LONG_BODY}\nGood luck!");
        let draft = run(&generator(&text, Vec::new())).await.unwrap();
        assert_eq!(draft.direction, SignalDirection::Long);
        assert_eq!(draft.entry_price, 42500.0);
        assert_eq!(draft.timeframe, Timeframe::H4);
        assert_eq!(draft.pattern.as_deref(), Some("Bull Flag"));
        assert_eq!(draft.chart_data.len(), 1);
    }

    #[tokio::test]
    async fn invalid_timeframe_defaults_to_one_hour() {
        let text = LONG_BODY.replace("\"4H\"", "\"2H\"");
        let draft = run(&generator(&text, Vec::new())).await.unwrap();
        assert_eq!(draft.timeframe, Timeframe::H1);
    }

    #[tokio::test]
    async fn missing_timeframe_defaults_to_one_hour() {
        let text = r#"{"type":"SHORT","entryPrice":2050,"stopLoss":2065,"takeProfit":2010}"#;
        let draft = run(&generator(text, Vec::new())).await.unwrap();
        assert_eq!(draft.timeframe, Timeframe::H1);
        assert_eq!(draft.direction, SignalDirection::Short);
    }

    #[tokio::test]
    async fn unknown_direction_is_rejected() {
        let text = LONG_BODY.replace("LONG", "SIDEWAYS");
        match run(&generator(&text, Vec::new())).await {
            Err(GenerationError::InvalidDirection(d)) => assert_eq!(d, "SIDEWAYS"),
            other => panic!("expected InvalidDirection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn inverted_levels_are_rejected() {
        // Stop above entry on a LONG call.
        let text = LONG_BODY.replace("41000", "43000");
        match run(&generator(&text, Vec::new())).await {
            Err(GenerationError::InconsistentLevels { direction }) => {
                assert_eq!(direction, "LONG")
            }
            other => panic!("expected InconsistentLevels, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_response_is_rejected() {
        match run(&generator("   ", Vec::new())).await {
            Err(GenerationError::EmptyResponse) => {}
            other => panic!("expected EmptyResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn braceless_response_is_rejected() {
        match run(&generator("sorry, no signal today", Vec::new())).await {
            Err(GenerationError::NoJsonPayload) => {}
            other => panic!("expected NoJsonPayload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn citations_without_links_are_dropped() {
        let citations = vec![
            Citation {
                title: "CoinDesk".to_string(),
                uri: Some("https://coindesk.com/a".to_string()),
            },
            Citation {
                title: "Unlinked".to_string(),
                uri: None,
            },
            Citation {
                title: "Blank".to_string(),
                uri: Some(String::new()),
            },
        ];
        let draft = run(&generator(LONG_BODY, citations)).await.unwrap();
        assert_eq!(draft.search_sources.len(), 1);
        assert_eq!(draft.search_sources[0].title, "CoinDesk");
    }
}
