//! AI receipt parser backed by an OpenAI-compatible chat completions API.

use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{DynamicImage, ImageFormat};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use struk_core::ai::{parse_ai_response, AiInput, AiReceiptParser, TOKEN_RECEIPT_PROMPT};
use struk_core::models::config::AiConfig;
use struk_core::{AiError, ReceiptRecord};

/// Chat completions client for token receipts.
pub struct HttpAiParser {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl HttpAiParser {
    /// Build a parser from config.
    ///
    /// Returns `None` when AI parsing is disabled or the API key variable is
    /// unset, so the rules handle everything.
    pub fn from_config(config: &AiConfig) -> anyhow::Result<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }

        let api_key = match std::env::var(&config.api_key_env) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => {
                warn!(
                    "AI parsing enabled but {} is not set, using rules only",
                    config.api_key_env
                );
                return Ok(None);
            }
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Some(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
        }))
    }

    fn request(&self, input: AiInput<'_>) -> Result<ChatRequest, AiError> {
        let user = match input {
            AiInput::Text(text) => vec![ContentPart::Text {
                text: format!("OCR text of the receipt:\n{}", text),
            }],
            AiInput::Image(image) => vec![
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: format!("data:image/png;base64,{}", BASE64.encode(encode_png(image)?)),
                    },
                },
                ContentPart::Text {
                    text: "Read this receipt.".to_string(),
                },
            ],
        };

        Ok(ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: vec![ContentPart::Text {
                        text: TOKEN_RECEIPT_PROMPT.to_string(),
                    }],
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        })
    }
}

#[async_trait]
impl AiReceiptParser for HttpAiParser {
    async fn parse(&self, input: AiInput<'_>) -> Result<Option<ReceiptRecord>, AiError> {
        let request = self.request(input)?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;

        match first_content(body) {
            Some(content) => parse_ai_response(&content).map(Some),
            None => {
                debug!("AI response had no content");
                Ok(None)
            }
        }
    }

    fn name(&self) -> &str {
        &self.model
    }
}

fn transport_error(e: reqwest::Error) -> AiError {
    if e.is_timeout() {
        AiError::Timeout
    } else {
        AiError::Transport(e.to_string())
    }
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, AiError> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| AiError::Transport(format!("failed to encode image: {}", e)))?;
    Ok(buf)
}

/// Text of the first choice, if it says anything.
fn first_content(response: ChatResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| {
            let content = content.trim();
            !content.is_empty() && content != "null"
        })
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
