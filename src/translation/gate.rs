/*!
 * Translation gate: translate, cleanse, then accept or fall back.
 */

use crate::errors::TranslationError;
use crate::providers::ollama::{ChatRequest, ChatResponse};
use crate::providers::Provider;
use crate::validation::{RatioReport, RatioValidator};

use super::cleanser::cleanse;
use super::core::TranslationService;

/// Result of gating one translation
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOutcome {
    /// Text sent to the provider
    pub original: String,
    /// Cleansed provider output
    pub candidate: String,
    /// Whether the candidate replaces the original
    pub accepted: bool,
    /// Ratios behind the decision
    pub report: RatioReport,
}

impl TranslationOutcome {
    /// Text to emit: the candidate when accepted, the original otherwise
    pub fn final_text(&self) -> &str {
        if self.accepted {
            &self.candidate
        } else {
            &self.original
        }
    }

    pub fn into_final_text(self) -> String {
        if self.accepted {
            self.candidate
        } else {
            self.original
        }
    }
}

/// Submits text for translation and rejects implausibly long results
#[derive(Debug)]
pub struct TranslationGate<P> {
    service: TranslationService<P>,
    validator: RatioValidator,
}

impl<P> TranslationGate<P>
where
    P: Provider<Request = ChatRequest, Response = ChatResponse>,
{
    pub fn new(service: TranslationService<P>, validator: RatioValidator) -> Self {
        Self { service, validator }
    }

    /// Cleanse a raw provider output and decide whether to keep it.
    ///
    /// Surrounding whitespace of the cleansed output is dropped before measuring.
    pub fn assess(&self, original: &str, raw_translation: &str) -> TranslationOutcome {
        let candidate = cleanse(raw_translation).trim().to_string();
        let report = self.validator.evaluate(original, &candidate);
        TranslationOutcome {
            original: original.to_string(),
            accepted: report.accepted(),
            candidate,
            report,
        }
    }

    /// Translate `original` and gate the result.
    ///
    /// Provider failures are returned with the offending text attached; there
    /// is no retry.
    pub async fn gate(&self, original: &str) -> Result<TranslationOutcome, TranslationError> {
        let raw = self
            .service
            .translate(original)
            .await
            .map_err(|e| TranslationError::for_part(original, e))?;
        Ok(self.assess(original, &raw))
    }
}
