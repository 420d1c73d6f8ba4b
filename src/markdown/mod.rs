/*!
 * Markdown segmentation and classification.
 *
 * - `reader`: streaming segmenter splitting input at blank lines
 * - `part`: the `Part` unit and its text metrics
 * - `document`: a whole document held in memory as parts
 * - `classifier`: text/URL/path/header predicates and header splitting
 */

pub mod classifier;
pub mod document;
pub mod part;
pub mod reader;

// Re-export main types
pub use classifier::{classify, classify_content, split_header, try_split_header, Classification};
pub use document::{Document, PART_SEPARATOR};
pub use part::Part;
pub use reader::PartReader;
