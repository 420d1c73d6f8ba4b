/*!
 * # mdtranslate - markdown translation with a local LLM
 *
 * A Rust library for translating markdown documents part by part through an
 * Ollama chat model.
 *
 * ## Features
 *
 * - Streaming segmentation of markdown into blank-line separated parts
 * - Pass-through of code fences, numbers, URLs and paths
 * - Header markers kept verbatim, only header text is translated
 * - Removal of model commentary such as `(Note: ...)`
 * - Length-ratio gate falling back to the original text
 * - Ordered output with optional concurrent requests
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `markdown`: Segmentation, classification and header splitting
 * - `translation`: Provider-backed translation:
 *   - `translation::core`: Chat request construction
 *   - `translation::cleanser`: Commentary removal
 *   - `translation::gate`: Ratio-based acceptance
 *   - `translation::pipeline`: Document orchestration
 * - `validation`: Length ratio heuristics
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::ollama`: Ollama API client
 *   - `providers::mock`: Scripted provider for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod language_utils;
pub mod markdown;
pub mod providers;
pub mod translation;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, ProviderError, TranslationError};
pub use language_utils::{get_language_name, normalize_to_part2t};
pub use markdown::{Classification, Document, Part, PartReader};
pub use translation::{DocumentPipeline, PipelineStats, TranslationGate, TranslationService};
pub use validation::{RatioThresholds, RatioValidator};
