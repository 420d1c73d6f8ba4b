/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService struct, which turns a piece of
 * text into a chat request for the configured provider and returns the raw
 * provider output.
 */

use anyhow::Result;
use log::trace;
use std::time::Instant;

use crate::app_config::Config;
use crate::errors::ProviderError;
use crate::providers::ollama::{ChatMessage, ChatRequest, ChatResponse};
use crate::providers::Provider;

/// Sends text to a chat provider with a fixed system instruction
#[derive(Debug)]
pub struct TranslationService<P> {
    /// Provider used for every request
    provider: P,
    /// Model identifier passed with each request
    model: String,
    /// Rendered system instruction
    system_prompt: String,
    /// Optional sampling temperature
    temperature: Option<f32>,
}

impl<P> TranslationService<P>
where
    P: Provider<Request = ChatRequest, Response = ChatResponse>,
{
    /// Create a new translation service
    pub fn new(provider: P, model: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            system_prompt: system_prompt.into(),
            temperature: None,
        }
    }

    /// Create a translation service from the application configuration
    pub fn from_config(provider: P, config: &Config) -> Result<Self> {
        let service = Self::new(provider, config.provider.model.clone(), config.render_system_prompt()?)
            .with_temperature(config.provider.temperature);
        Ok(service)
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Build the chat request for a piece of text
    pub fn build_request(&self, text: &str) -> ChatRequest {
        let request = ChatRequest::new(
            self.model.clone(),
            vec![ChatMessage::system(self.system_prompt.clone()), ChatMessage::user(text)],
        );
        match self.temperature {
            Some(temperature) => request.temperature(temperature),
            None => request,
        }
    }

    /// Translate a piece of text, returning the provider output unmodified
    pub async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        let started = Instant::now();
        let response = self.provider.complete(self.build_request(text)).await?;
        trace!("Provider answered in {:?}", started.elapsed());
        Ok(P::extract_text(&response))
    }
}
