//! Batched price refresh
//!
//! One completion call resolves current prices for a whole batch of
//! symbols. Symbols the backend cannot resolve are simply absent from the
//! returned map; a total failure returns an error and the caller keeps its
//! prior prices.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use common::GenerationError;
use tracing::debug;

use crate::backend::CompletionBackend;
use crate::extract::extract_json;
use crate::prompt;

const PRICE_TEMPERATURE: f32 = 0.1;

/// Batch price lookups through the completion backend
pub struct PriceFeed {
    backend: Arc<dyn CompletionBackend>,
}

impl PriceFeed {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Resolve current prices for the given symbols.
    ///
    /// The set is already deduplicated by construction; sorted iteration
    /// keeps the prompt stable for identical batches.
    pub async fn fetch(
        &self,
        symbols: &BTreeSet<String>,
    ) -> Result<BTreeMap<String, f64>, GenerationError> {
        if symbols.is_empty() {
            return Ok(BTreeMap::new());
        }

        let prompt = prompt::price_prompt(symbols.iter().map(String::as_str));
        let completion = self.backend.complete(&prompt, PRICE_TEMPERATURE).await?;
        if completion.text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        // Non-numeric entries are dropped rather than failing the batch.
        let raw: BTreeMap<String, serde_json::Value> = extract_json(&completion.text)?;
        let prices: BTreeMap<String, f64> = raw
            .into_iter()
            .filter_map(|(symbol, value)| value.as_f64().map(|price| (symbol, price)))
            .collect();

        debug!(requested = symbols.len(), resolved = prices.len(), "price refresh");
        Ok(prices)
    }
}
