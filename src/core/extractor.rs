use crate::domain::model::{ExtractedVehicle, UNKNOWN_SENTINEL};
use crate::domain::ports::{Prompt, TextGenerator, VehicleExtractor};
use crate::utils::error::{ExtractionError, GenerationError};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// 建立抽取 make/model 的提示
pub fn build_prompt(title: &str, description: &str) -> Prompt {
    let system = format!(
        "You are an expert at extracting vehicle information from text. \
         You must respond with a single JSON object that strictly follows this format: \
         {{\"make\": string, \"model\": string}}. \
         \"make\" is the manufacturer of the car, e.g. \"Honda\"; \
         \"model\" is the specific model, e.g. \"Accord\". \
         Do not include any other keys, comments or text. \
         If you cannot identify the vehicle with confidence, respond with \
         {{\"make\": \"{sentinel}\", \"model\": \"{sentinel}\"}} instead of guessing.",
        sentinel = UNKNOWN_SENTINEL
    );

    let user = format!(
        "Extract the make and model from the following car listing:\nTitle: {}\nDescription: {}",
        title, description
    );

    Prompt { system, user }
}

/// 去掉模型常加的 Markdown code fence
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // 跳過 ```json 之類的語言標籤，不論是否與 JSON 同一行
    let tag_len = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    body[tag_len..].trim()
}

fn malformed(detail: impl Into<String>) -> ExtractionError {
    ExtractionError::MalformedModelOutput {
        detail: detail.into(),
    }
}

/// 模型輸出的原始形狀：恰好 make/model 兩個鍵，重複或多餘的鍵都拒絕
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVehicle {
    make: Value,
    model: Value,
}

fn string_or_null(key: &str, value: Value) -> Result<Option<String>, ExtractionError> {
    match value {
        Value::String(s) => Ok(Some(s)),
        Value::Null => Ok(None),
        other => Err(malformed(format!("field '{}' is not a string: {}", key, other))),
    }
}

/// Parses raw model text into a vehicle. Shape problems are
/// `MalformedModelOutput`; well-formed but empty answers are
/// `VehicleNotIdentifiable`.
pub fn parse_model_output(raw: &str) -> Result<ExtractedVehicle, ExtractionError> {
    let text = strip_code_fence(raw);
    if !text.starts_with('{') {
        return Err(malformed("expected a JSON object"));
    }

    let raw_vehicle: RawVehicle =
        serde_json::from_str(text).map_err(|e| malformed(format!("invalid vehicle object: {}", e)))?;

    let make = string_or_null("make", raw_vehicle.make)?;
    let model = string_or_null("model", raw_vehicle.model)?;

    ExtractedVehicle::from_parts(make, model)
}

/// Extractor backed by a generative model.
pub struct LlmVehicleExtractor<G: TextGenerator> {
    generator: G,
    timeout: Option<Duration>,
}

impl<G: TextGenerator> LlmVehicleExtractor<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.generator.generate(prompt))
                .await
                .map_err(|_| GenerationError::Timeout(limit))?,
            None => self.generator.generate(prompt).await,
        }
    }
}

#[async_trait]
impl<G: TextGenerator> VehicleExtractor for LlmVehicleExtractor<G> {
    async fn extract(
        &self,
        title: &str,
        description: &str,
    ) -> Result<ExtractedVehicle, ExtractionError> {
        let prompt = build_prompt(title, description);

        tracing::debug!("🤖 Requesting vehicle extraction from model");
        let raw = self.generate(&prompt).await?;
        tracing::debug!(raw_output = %raw, "Model responded");

        parse_model_output(&raw).inspect_err(|e| {
            if let ExtractionError::MalformedModelOutput { detail } = e {
                tracing::warn!(raw_output = %raw, %detail, "⚠️ Model output failed validation");
            }
        })
    }
}
