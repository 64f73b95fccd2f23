use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::{OracleError, OracleResult};

/// Produces a short piece of generated text for a prompt. Used by the
/// header labeler's generative strategy.
pub trait GenerationOracle {
    fn generate(&self, prompt: &str) -> OracleResult<String>;
}

/// Configuration for the Anthropic Messages API client
#[derive(Debug, Clone)]
pub struct ClaudeConfig {
    /// API key (from ANTHROPIC_API_KEY env var)
    pub api_key: String,
    /// Model to use
    pub model: String,
    /// Temperature (0-1, lower = more deterministic)
    pub temperature: f64,
    /// Maximum tokens in response - headings are short
    pub max_tokens: u32,
}

impl ClaudeConfig {
    /// Create config from environment variables
    pub fn from_env() -> OracleResult<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            OracleError::Unavailable("ANTHROPIC_API_KEY environment variable not set".to_string())
        })?;

        Ok(Self {
            api_key,
            model: "claude-sonnet-4-20250514".to_string(),
            temperature: 0.3,
            max_tokens: 64,
        })
    }

    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            temperature: 0.3,
            max_tokens: 64,
        }
    }
}

/// Text-generation oracle backed by the Anthropic Messages API
pub struct ClaudeGenerator {
    client: Client,
    config: ClaudeConfig,
}

impl ClaudeGenerator {
    pub fn new(config: ClaudeConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

impl GenerationOracle for ClaudeGenerator {
    fn generate(&self, prompt: &str) -> OracleResult<String> {
        let request = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .map_err(|e| OracleError::Call(format!("request to Anthropic API failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(OracleError::Call(format!(
                "Anthropic API error: {status} - {body}"
            )));
        }

        let response: MessagesResponse = response
            .json()
            .map_err(|e| OracleError::Call(format!("failed to parse API response: {e}")))?;

        response
            .content
            .iter()
            .find(|c| c.content_type == "text")
            .map(|c| c.text.clone())
            .ok_or_else(|| OracleError::Call("no text content in response".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing() {
        let json = r#"{"content": [{"type": "text", "text": "Machine Learning Basics"}]}"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.content[0].text, "Machine Learning Basics");
    }
}
