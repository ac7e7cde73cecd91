//! OpenAI provider (Chat Completions, JSON mode). Requires an API key from config
//! or `OPENAI_API_KEY`.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{RawSuggestion, Unavailable, WeightSuggester};
use crate::config::ai::AiConfig;
use crate::room::Room;
use crate::weights::WeightVector;

const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

const SUGGEST_SYSTEM: &str = "You are an expert in fair rent distribution among roommates. \
Analyze the room details and suggest fair integer weights (0-100) for size, features and comfort. \
Larger rooms generally warrant higher rent. Private bathrooms, closets, balconies and air \
conditioning add value. Lower noise and more natural light improve comfort. \
sizeWeight + featureWeight + comfortWeight MUST equal 100. \
Reply with JSON only: {\"sizeWeight\":int,\"featureWeight\":int,\"comfortWeight\":int,\"explanation\":string}.";

const EXPLAIN_SYSTEM: &str = "You explain why certain weight distributions were suggested for a \
rent splitting tool. Answer in one short, friendly paragraph with specific reasons for each \
weight based on the room details (for example a much larger room or a private bathroom). \
Reply with JSON only: {\"explanation\":string}.";

/// Room fields the model sees. Ids are left out.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PromptRoom<'a> {
    name: &'a str,
    size: f64,
    has_private_bathroom: bool,
    has_closet: bool,
    has_balcony: bool,
    air_conditioning: bool,
    noise_level: u8,
    natural_light: u8,
    custom_features: Vec<PromptFeature<'a>>,
}

#[derive(Serialize)]
struct PromptFeature<'a> {
    name: &'a str,
    importance: u8,
}

fn prompt_rooms(rooms: &[Room]) -> Vec<PromptRoom<'_>> {
    rooms
        .iter()
        .map(|r| PromptRoom {
            name: &r.name,
            size: r.size,
            has_private_bathroom: r.amenities.has_private_bathroom,
            has_closet: r.amenities.has_closet,
            has_balcony: r.amenities.has_balcony,
            air_conditioning: r.amenities.has_air_conditioning,
            noise_level: r.noise_level,
            natural_light: r.natural_light,
            custom_features: r
                .custom_features
                .iter()
                .map(|f| PromptFeature {
                    name: &f.name,
                    importance: f.importance,
                })
                .collect(),
        })
        .collect()
}

pub struct OpenAiSuggester {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiSuggester {
    pub fn from_config(cfg: &AiConfig) -> Result<Self> {
        let api_key = if cfg.api_key.trim().is_empty() {
            std::env::var("OPENAI_API_KEY").unwrap_or_default()
        } else {
            cfg.api_key.clone()
        };
        let http = reqwest::Client::builder()
            .user_agent("fair-rent-splitter/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building reqwest client")?;
        Ok(Self {
            http,
            api_key,
            model: cfg.model.clone(),
        })
    }

    /// One chat round-trip in JSON mode; returns the raw content string.
    async fn complete(&self, system: &str, user: String) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(Unavailable::MissingApiKey.into());
        }

        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct ResponseFormat {
            #[serde(rename = "type")]
            kind: &'static str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            response_format: ResponseFormat,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: system,
                },
                Msg {
                    role: "user",
                    content: &user,
                },
            ],
            temperature: 0.2,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let body: Resp = self
            .http
            .post(ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("openai request")?
            .error_for_status()
            .context("openai non-2xx")?
            .json()
            .await
            .context("openai response body")?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!("openai returned no choices"))
    }
}

#[async_trait]
impl WeightSuggester for OpenAiSuggester {
    async fn suggest(&self, rooms: &[Room]) -> Result<RawSuggestion> {
        let user = format!("Rooms: {}", serde_json::to_string(&prompt_rooms(rooms))?);
        let content = self.complete(SUGGEST_SYSTEM, user).await?;
        parse_suggestion(&content)
    }

    async fn explain(&self, rooms: &[Room], weights: &WeightVector) -> Result<String> {
        let user = format!(
            "Rooms: {}\nSize Weight: {}\nFeature Weight: {}\nComfort Weight: {}",
            serde_json::to_string(&prompt_rooms(rooms))?,
            weights.size,
            weights.features,
            weights.comfort
        );
        let content = self.complete(EXPLAIN_SYSTEM, user).await?;

        #[derive(Deserialize)]
        struct Explained {
            explanation: String,
        }
        let parsed: Explained =
            serde_json::from_str(strip_fences(&content)).context("parsing explanation JSON")?;
        Ok(parsed.explanation)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

/// Parse the model's JSON reply. Tolerates a surrounding ```json fence.
pub(crate) fn parse_suggestion(content: &str) -> Result<RawSuggestion> {
    serde_json::from_str(strip_fences(content)).context("parsing suggestion JSON")
}

fn strip_fences(content: &str) -> &str {
    let t = content.trim();
    let t = t
        .strip_prefix("```json")
        .or_else(|| t.strip_prefix("```"))
        .unwrap_or(t);
    t.strip_suffix("```").unwrap_or(t).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::sample_rooms;

    #[test]
    fn parses_plain_and_fenced_json() {
        let plain = r#"{"sizeWeight":50,"featureWeight":30,"comfortWeight":20,"explanation":"ok"}"#;
        assert_eq!(parse_suggestion(plain).unwrap().size_weight, 50);

        let fenced = format!("```json\n{plain}\n```");
        assert_eq!(parse_suggestion(&fenced).unwrap().comfort_weight, 20);

        assert!(parse_suggestion("sure! here you go").is_err());
    }

    #[test]
    fn prompt_rooms_use_model_field_names() {
        let v = serde_json::to_value(prompt_rooms(&sample_rooms())).unwrap();
        assert_eq!(v[0]["name"], "Master Bedroom");
        assert_eq!(v[0]["airConditioning"], true);
        assert!(v[0].get("id").is_none());
    }

    #[serial_test::serial]
    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let cfg = AiConfig {
            enabled: true,
            api_key: String::new(),
            ..AiConfig::default()
        };
        std::env::remove_var("OPENAI_API_KEY");
        let s = OpenAiSuggester::from_config(&cfg).unwrap();
        let err = s.suggest(&sample_rooms()).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<Unavailable>(),
            Some(&Unavailable::MissingApiKey)
        );
    }
}
