//! AI weight suggestions: provider abstraction + validation.
//!
//! A provider proposes a weight vector and a short explanation for a set of rooms.
//! Whatever it returns is checked against the sum-to-100 invariant before anyone
//! uses it; a bad vector is an error, never silently repaired.

pub mod openai;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ai::AiConfig;
use crate::room::Room;
use crate::weights::WeightVector;

pub use openai::OpenAiSuggester;

/// Unvalidated provider output. Signed on purpose: models do return negatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSuggestion {
    pub size_weight: i64,
    pub feature_weight: i64,
    pub comfort_weight: i64,
    #[serde(default)]
    pub explanation: String,
}

/// A suggestion that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub weights: WeightVector,
    pub explanation: String,
}

#[async_trait]
pub trait WeightSuggester: Send + Sync {
    /// Propose weights for these rooms.
    async fn suggest(&self, rooms: &[Room]) -> Result<RawSuggestion>;
    /// Explain, in a short paragraph, why `weights` fit these rooms.
    async fn explain(&self, rooms: &[Room], weights: &WeightVector) -> Result<String>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

pub type DynSuggester = Arc<dyn WeightSuggester>;

/// The provider cannot serve requests at all, as opposed to a call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Unavailable {
    #[error("AI suggestions are disabled")]
    Disabled,
    #[error("OpenAI API key not found")]
    MissingApiKey,
}

/// Always fails; used when AI is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSuggester;

#[async_trait]
impl WeightSuggester for DisabledSuggester {
    async fn suggest(&self, _rooms: &[Room]) -> Result<RawSuggestion> {
        Err(Unavailable::Disabled.into())
    }
    async fn explain(&self, _rooms: &[Room], _weights: &WeightVector) -> Result<String> {
        Err(Unavailable::Disabled.into())
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Deterministic provider for tests and local runs.
#[derive(Debug, Clone)]
pub struct MockSuggester {
    pub fixed: RawSuggestion,
}

impl Default for MockSuggester {
    fn default() -> Self {
        Self {
            fixed: RawSuggestion {
                size_weight: 50,
                feature_weight: 30,
                comfort_weight: 20,
                explanation: "Size matters most; features and comfort refine the split (mock)."
                    .to_string(),
            },
        }
    }
}

#[async_trait]
impl WeightSuggester for MockSuggester {
    async fn suggest(&self, _rooms: &[Room]) -> Result<RawSuggestion> {
        Ok(self.fixed.clone())
    }
    async fn explain(&self, rooms: &[Room], weights: &WeightVector) -> Result<String> {
        Ok(format!(
            "For {} rooms: size {}%, features {}%, comfort {}% (mock).",
            rooms.len(),
            weights.size,
            weights.features,
            weights.comfort
        ))
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Ask the provider, validate the vector, and fill in an explanation if it gave none.
pub async fn suggest_weights(provider: &dyn WeightSuggester, rooms: &[Room]) -> Result<Suggestion> {
    let raw = match provider.suggest(rooms).await {
        Ok(raw) => raw,
        Err(e) => {
            counter!("rent_split_suggestions_total", "outcome" => "provider_error").increment(1);
            return Err(e);
        }
    };

    let weights = match WeightVector::try_from_parts(
        raw.size_weight,
        raw.feature_weight,
        raw.comfort_weight,
    ) {
        Ok(w) => w,
        Err(e) => {
            counter!("rent_split_suggestions_total", "outcome" => "rejected").increment(1);
            warn!(target: "suggest", provider = provider.provider_name(), error = %e, "rejected AI weights");
            return Err(e.into());
        }
    };

    let explanation = if raw.explanation.trim().is_empty() {
        provider.explain(rooms, &weights).await?
    } else {
        raw.explanation
    };

    counter!("rent_split_suggestions_total", "outcome" => "accepted").increment(1);
    info!(
        target: "suggest",
        provider = provider.provider_name(),
        size = weights.size,
        features = weights.features,
        comfort = weights.comfort,
        "AI weights accepted"
    );
    Ok(Suggestion {
        weights,
        explanation: explanation.trim().to_string(),
    })
}

/// Factory: build a provider according to config and environment variables.
///
/// * If `AI_TEST_MODE=mock`, returns the deterministic mock.
/// * Else if `config.enabled == false`, returns the disabled provider.
/// * Else builds the configured provider.
pub fn build_suggester(config: &AiConfig) -> Result<DynSuggester> {
    if std::env::var("AI_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Ok(Arc::new(MockSuggester::default()));
    }

    if !config.enabled {
        return Ok(Arc::new(DisabledSuggester));
    }

    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiSuggester::from_config(config)?)),
        "mock" => Ok(Arc::new(MockSuggester::default())),
        other => {
            warn!(target: "suggest", provider = other, "unknown AI provider; disabling");
            Ok(Arc::new(DisabledSuggester))
        }
    }
}
