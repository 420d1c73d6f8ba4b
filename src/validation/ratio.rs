/*!
 * Length ratio validation for translated parts.
 *
 * An oversized translation relative to its source usually means the provider
 * repeated itself or added commentary. This module compares the UTF-8 length
 * and word count of a candidate translation against the original:
 * - Character ratio upper bound
 * - Word ratio upper bound
 * - Optional character ratio lower bound
 */

use log::debug;
use std::fmt;

use crate::markdown::part::word_count;

/// Default maximum character ratio (translation / source)
pub const DEFAULT_MAX_CHAR_RATIO: f64 = 2.0;

/// Default maximum word ratio (translation / source)
pub const DEFAULT_MAX_WORD_RATIO: f64 = 2.0;

/// Bounds a candidate translation has to stay within
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioThresholds {
    /// Maximum acceptable character ratio
    pub max_char_ratio: f64,
    /// Maximum acceptable word ratio
    pub max_word_ratio: f64,
    /// Minimum acceptable character ratio, unchecked when `None`
    pub min_char_ratio: Option<f64>,
}

impl Default for RatioThresholds {
    fn default() -> Self {
        Self {
            max_char_ratio: DEFAULT_MAX_CHAR_RATIO,
            max_word_ratio: DEFAULT_MAX_WORD_RATIO,
            min_char_ratio: None,
        }
    }
}

/// Why a candidate translation was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// Original has no characters or no words, ratios are undefined
    EmptyOriginal,
    /// Candidate has too many characters
    CharRatioTooHigh { ratio: f64, max_ratio: f64 },
    /// Candidate has too many words
    WordRatioTooHigh { ratio: f64, max_ratio: f64 },
    /// Candidate has too few characters
    CharRatioTooLow { ratio: f64, min_ratio: f64 },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::EmptyOriginal => {
                write!(f, "Original has no words, ratios are undefined")
            }
            RejectReason::CharRatioTooHigh { ratio, max_ratio } => {
                write!(f, "Character ratio too high: {:.2} > {:.2}", ratio, max_ratio)
            }
            RejectReason::WordRatioTooHigh { ratio, max_ratio } => {
                write!(f, "Word ratio too high: {:.2} > {:.2}", ratio, max_ratio)
            }
            RejectReason::CharRatioTooLow { ratio, min_ratio } => {
                write!(f, "Character ratio too low: {:.2} < {:.2}", ratio, min_ratio)
            }
        }
    }
}

/// Measured ratios and the resulting verdict for one candidate
#[derive(Debug, Clone, PartialEq)]
pub struct RatioReport {
    /// Candidate bytes / original bytes, `None` when the original is empty
    pub char_ratio: Option<f64>,
    /// Candidate words / original words, `None` when the original has no words
    pub word_ratio: Option<f64>,
    /// Set when the candidate must be discarded
    pub rejection: Option<RejectReason>,
}

impl RatioReport {
    pub fn accepted(&self) -> bool {
        self.rejection.is_none()
    }
}

impl fmt::Display for RatioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |ratio: Option<f64>| ratio.map_or_else(|| "n/a".to_string(), |r| format!("{:.2}", r));
        write!(
            f,
            "char ratio {}, word ratio {}",
            show(self.char_ratio),
            show(self.word_ratio)
        )
    }
}

/// Validates candidate translations against [`RatioThresholds`]
#[derive(Debug, Clone, Default)]
pub struct RatioValidator {
    thresholds: RatioThresholds,
}

impl RatioValidator {
    /// Create a validator with the default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with custom thresholds
    pub fn with_thresholds(thresholds: RatioThresholds) -> Self {
        Self { thresholds }
    }

    /// Ratio of `value` to `base`, `None` for a zero base
    pub fn calculate_ratio(value: usize, base: usize) -> Option<f64> {
        if base == 0 {
            None
        } else {
            Some(value as f64 / base as f64)
        }
    }

    /// Compare a candidate against its original.
    ///
    /// Checks run in order: undefined ratios, character ratio, word ratio,
    /// then the optional lower bound. The character ratio is measured in
    /// UTF-8 bytes, so scripts with multi-byte letters get more room.
    pub fn evaluate(&self, original: &str, candidate: &str) -> RatioReport {
        let char_ratio = Self::calculate_ratio(candidate.len(), original.len());
        let word_ratio = Self::calculate_ratio(word_count(candidate), word_count(original));

        let rejection = match (char_ratio, word_ratio) {
            (Some(chars), Some(words)) => self.check(chars, words),
            _ => Some(RejectReason::EmptyOriginal),
        };

        debug!(
            "Ratio check: chars {:?}, words {:?}, rejection {:?}",
            char_ratio, word_ratio, rejection
        );

        RatioReport {
            char_ratio,
            word_ratio,
            rejection,
        }
    }

    fn check(&self, char_ratio: f64, word_ratio: f64) -> Option<RejectReason> {
        let t = &self.thresholds;
        if char_ratio > t.max_char_ratio {
            return Some(RejectReason::CharRatioTooHigh {
                ratio: char_ratio,
                max_ratio: t.max_char_ratio,
            });
        }
        if word_ratio > t.max_word_ratio {
            return Some(RejectReason::WordRatioTooHigh {
                ratio: word_ratio,
                max_ratio: t.max_word_ratio,
            });
        }
        match t.min_char_ratio {
            Some(min_ratio) if char_ratio < min_ratio => Some(RejectReason::CharRatioTooLow {
                ratio: char_ratio,
                min_ratio,
            }),
            _ => None,
        }
    }
}
