//! Itinerary text generation through an LLM responses endpoint

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::LlmConfig;
use crate::{Result, TripPlannerError};

/// Turns a planning prompt into free text
#[async_trait]
pub trait ItineraryWriter: Send + Sync {
    async fn write(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsesPayload {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputContent {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesPayload {
    fn text(self) -> Option<String> {
        if let Some(text) = self.output_text.filter(|text| !text.trim().is_empty()) {
            return Some(text);
        }
        let text: Vec<String> = self
            .output
            .into_iter()
            .flat_map(|item| item.content)
            .filter(|content| content.kind.as_deref().is_none_or(|kind| kind == "output_text"))
            .filter_map(|content| content.text)
            .collect();
        (!text.is_empty()).then(|| text.join("\n"))
    }
}

/// OpenAI-compatible `POST {base_url}/responses` client
pub struct OpenAiWriter {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiWriter {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| TripPlannerError::config("Missing LLM api_key (OPENAI_API_KEY)"))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .build()
            .map_err(|e| TripPlannerError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    /// Writer when a key is configured, `None` otherwise
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>> {
        if config.api_key.is_none() {
            return Ok(None);
        }
        Self::new(config).map(Some)
    }
}

#[async_trait]
impl ItineraryWriter for OpenAiWriter {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn write(&self, prompt: &str) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&ResponsesRequest {
                model: &self.model,
                input: prompt,
            })
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let details = response.json::<Value>().await.ok();
            return Err(TripPlannerError::upstream(
                "LLM request failed",
                Some(status.as_u16()),
                details,
            ));
        }

        let payload: ResponsesPayload = response.json().await?;
        let text = payload
            .text()
            .ok_or_else(|| TripPlannerError::upstream("LLM returned no text", None, None))?;
        debug!("LLM returned {} characters", text.len());
        Ok(text)
    }
}
