/*!
 * Translation of markdown parts using a chat provider.
 *
 * - `core`: Builds chat requests and returns raw provider output
 * - `cleanser`: Strips provider commentary from outputs
 * - `gate`: Accepts or rejects a cleansed translation by length ratios
 * - `pipeline`: Drives a whole document through classification and gating
 */

// Re-export main types for easier usage
pub use self::cleanser::cleanse;
pub use self::core::TranslationService;
pub use self::gate::{TranslationGate, TranslationOutcome};
pub use self::pipeline::{Disposition, DocumentPipeline, PipelineStats, ProcessedPart};

// Submodules
pub mod cleanser;
pub mod core;
pub mod gate;
pub mod pipeline;
