/*!
 * Validation module for translation quality gating.
 *
 * - `ratio`: Validates character and word length ratios of a translation
 *   against its source
 */

pub mod ratio;

// Re-export main types
pub use ratio::{RatioReport, RatioThresholds, RatioValidator, RejectReason};
