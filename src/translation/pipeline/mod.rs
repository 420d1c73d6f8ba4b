/*!
 * Document pipeline for part-by-part markdown translation.
 *
 * Parts are read from a stream, classified, passed through or gated, and
 * written back in input order:
 * 1. **Segmentation**: `PartReader` yields blank-line separated parts
 * 2. **Routing**: classification and header splitting pick what is translated
 * 3. **Gating**: translations are cleansed and checked against length ratios
 */

pub mod orchestrator;
pub mod stats;

// Re-export types used externally
pub use orchestrator::{Disposition, DocumentPipeline, ProcessedPart};
pub use stats::PipelineStats;
