// src/services/vision_client.rs
use crate::errors::AnalyzeError;
use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const GROQ_MODEL: &str = "llama-3.2-90b-vision-preview";
const MAX_COMPLETION_TOKENS: u32 = 1500;
const TEMPERATURE: f64 = 0.7;
// Vision completions on large photos can take tens of seconds; the hosting
// platform enforces no timeout of its own.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A vision-capable chat-completion backend. One attempt per user request,
/// no retries: every attempt is billed inference.
#[async_trait]
pub trait VisionApi: Send + Sync {
    /// Sends one text+image prompt and returns the raw completion text.
    /// `image_url` must already be a complete `data:` URI.
    async fn complete(
        &self,
        api_key: &str,
        prompt: &str,
        image_url: &str,
    ) -> Result<String, AnalyzeError>;
}

pub struct GroqClient {
    client: Client,
    api_url: String,
}

impl GroqClient {
    pub fn new() -> Self {
        Self::with_api_url(GROQ_API_URL.to_string())
    }

    pub fn with_api_url(api_url: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
        }
    }
}

impl Default for GroqClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VisionApi for GroqClient {
    async fn complete(
        &self,
        api_key: &str,
        prompt: &str,
        image_url: &str,
    ) -> Result<String, AnalyzeError> {
        let response = self
            .client
            .post(&self.api_url)
            .timeout(REQUEST_TIMEOUT)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&json!({
                "model": GROQ_MODEL,
                "messages": [{
                    "role": "user",
                    "content": [
                        {
                            "type": "text",
                            "text": prompt
                        },
                        {
                            "type": "image_url",
                            "image_url": {
                                "url": image_url
                            }
                        }
                    ]
                }],
                "max_tokens": MAX_COMPLETION_TOKENS,
                "temperature": TEMPERATURE
            }))
            .send()
            .await
            .map_err(|e| AnalyzeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Groq API error ({}): {}", status, body);
            return Err(AnalyzeError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AnalyzeError::Transport(format!("failed to read Groq response: {}", e)))?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                AnalyzeError::Transport("no content in Groq completion".to_string())
            })?;

        Ok(content.to_string())
    }
}
