use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Ollama client for the chat API
#[derive(Debug, Clone)]
pub struct Ollama {
    /// Full URL of the chat endpoint, e.g. `http://localhost:11434/api/chat`
    endpoint: String,
    /// HTTP client for making requests
    client: Client,
}

/// Chat message object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// System instruction message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// User message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Generation options for the Ollama API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat request for the Ollama API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model name to use for generation
    model: String,
    /// Messages of the conversation
    messages: Vec<ChatMessage>,
    /// Whether to stream the response
    stream: bool,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
}

impl ChatRequest {
    /// Create a new non-streaming chat request
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            stream: false,
            options: None,
        }
    }

    /// Set the temperature parameter
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(GenerationOptions {
            temperature: Some(temperature),
        });
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Content of the last user message
    pub fn user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
    }
}

/// Chat response from the Ollama API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Generated message
    pub message: ChatMessage,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
    /// Total duration of the request in nanoseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u64>,
    /// Number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

impl ChatResponse {
    /// Response carrying only an assistant message
    pub fn from_content(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            created_at: String::new(),
            message: ChatMessage {
                role: "assistant".to_string(),
                content: content.into(),
            },
            done: true,
            total_duration: None,
            prompt_eval_count: None,
            eval_count: None,
        }
    }
}

impl Ollama {
    /// Create a client posting to `endpoint` with the given request timeout
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            // Ollama uses HTTP/1.1
            .http1_only()
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client, using defaults without a timeout: {}", e);
                Client::new()
            });

        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Chat with the Ollama API. A single attempt is made.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        debug!("Sending chat request to {} (model {})", self.endpoint, request.model());

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Ollama API error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let response_text = response.text().await.map_err(|e| {
            ProviderError::RequestFailed(format!("Failed to get response text from Ollama API: {}", e))
        })?;

        parse_chat_response(&response_text)
    }

    /// Get the Ollama API version from the endpoint's server
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = Url::parse(&self.endpoint)
            .and_then(|base| base.join("/api/version"))
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint {}: {}", self.endpoint, e)))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Ollama version response: {}", e)))?;

        value["version"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::ParseError("Invalid version format in response".to_string()))
    }
}

fn map_transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_connect() || e.is_timeout() {
        ProviderError::ConnectionError(e.to_string())
    } else {
        ProviderError::RequestFailed(e.to_string())
    }
}

/// Decode a chat response body.
///
/// A single JSON object is expected. A JSONL body (streamed response) is
/// accepted too, its message contents concatenated in order.
pub fn parse_chat_response(body: &str) -> Result<ChatResponse, ProviderError> {
    let e = match serde_json::from_str::<ChatResponse>(body) {
        Ok(chat_response) => return Ok(chat_response),
        Err(e) => e,
    };

    error!(
        "Failed to parse Ollama API chat response: {}. Raw response (first 500 chars): {}",
        e,
        body.chars().take(500).collect::<String>()
    );

    let objects: Vec<serde_json::Value> = body
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .collect();

    let Some(last) = objects.last() else {
        return Err(ProviderError::ParseError(format!(
            "Failed to parse Ollama API chat response: {}. Response contains invalid JSON.",
            e
        )));
    };

    let mut content = String::new();
    let mut found_message = false;
    for obj in &objects {
        if let Some(piece) = obj
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
        {
            content.push_str(piece);
            found_message = true;
        }
    }

    if !found_message {
        return Err(ProviderError::ParseError(format!(
            "No message content in Ollama API chat response: {}",
            e
        )));
    }

    let model = last.get("model").and_then(|v| v.as_str()).unwrap_or("unknown");
    let mut response = ChatResponse::from_content(model, content);
    response.created_at = last
        .get("created_at")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    response.prompt_eval_count = last.get("prompt_eval_count").and_then(|v| v.as_u64());
    response.eval_count = last.get("eval_count").and_then(|v| v.as_u64());
    Ok(response)
}

#[async_trait]
impl Provider for Ollama {
    type Request = ChatRequest;
    type Response = ChatResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        self.chat(request).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.version().await.map(|_| ())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.message.content.clone()
    }
}
