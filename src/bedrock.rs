use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_bedrockruntime::{Client, config::Region, error::DisplayErrorContext, primitives::Blob};
use tracing::debug;

use crate::types::{CompletionRequest, CompletionResponse, Model};

pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-instant-v1";
pub const DEFAULT_MAX_TOKENS: u32 = 500;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Text-completion model hosted on Amazon Bedrock.
#[derive(Debug, Clone)]
pub struct Bedrock {
    client: Client,
    model_id: String,
    max_tokens: u32,
}

impl Bedrock {
    /// Loads AWS credentials from the default provider chain and binds the
    /// client to `region`.
    pub async fn from_region(
        region: impl Into<String>,
        model_id: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.into()))
            .load()
            .await;
        Self {
            client: Client::new(&config),
            model_id: model_id.into(),
            max_tokens,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Serializes the invocation body sent to the model.
pub fn encode_request(prompt: &str, max_tokens: u32) -> Result<Vec<u8>> {
    serde_json::to_vec(&CompletionRequest {
        prompt,
        max_tokens_to_sample: max_tokens,
    })
    .context("Failed to encode model request")
}

/// Extracts the completion text from a model response body.
pub fn parse_completion(body: &[u8]) -> Result<String> {
    let response: CompletionResponse =
        serde_json::from_slice(body).context("Malformed model response body")?;
    Ok(response.completion)
}

#[async_trait]
impl Model for Bedrock {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = encode_request(prompt, self.max_tokens)?;
        debug!(model = %self.model_id, bytes = body.len(), "invoking model");

        let output = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type(JSON_CONTENT_TYPE)
            .accept(JSON_CONTENT_TYPE)
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                anyhow::anyhow!(
                    "Failed to invoke model '{}': {}",
                    self.model_id,
                    DisplayErrorContext(&e)
                )
            })?;

        parse_completion(output.body().as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_prompt_and_token_budget() {
        let bytes = encode_request("\n\nHuman: hi\n\nAssistant:", DEFAULT_MAX_TOKENS).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "prompt": "\n\nHuman: hi\n\nAssistant:",
                "max_tokens_to_sample": 500,
            })
        );
    }

    #[test]
    fn parse_completion_returns_completion_text() {
        let body = br#"{"completion": " Looks good.", "stop_reason": "stop_sequence"}"#;
        assert_eq!(parse_completion(body).unwrap(), " Looks good.");
    }

    #[test]
    fn parse_completion_rejects_missing_field() {
        let err = parse_completion(br#"{"stop_reason": "max_tokens"}"#).unwrap_err();
        assert!(err.to_string().contains("Malformed model response"));
    }

    #[test]
    fn parse_completion_rejects_non_json() {
        assert!(parse_completion(b"<html>bad gateway</html>").is_err());
    }
}
