/*!
 * In-memory view of a whole markdown document as an ordered list of parts.
 */

use super::part::Part;
use super::reader::PartReader;

/// Separator placed between parts on output
pub const PART_SEPARATOR: &str = "\n\n";

/// An immutable document split into parts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    parts: Vec<Part>,
}

impl Document {
    /// Split a complete markdown text into parts
    pub fn from_text(markdown: &str) -> Self {
        // reading from memory cannot fail, str is already valid UTF-8
        let parts = PartReader::new(markdown.as_bytes())
            .filter_map(Result::ok)
            .collect();
        Self { parts }
    }

    /// Parts in document order
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Join the parts with a single blank line between them
    pub fn render(&self) -> String {
        self.parts
            .iter()
            .map(Part::as_str)
            .collect::<Vec<_>>()
            .join(PART_SEPARATOR)
    }
}

impl IntoIterator for Document {
    type Item = Part;
    type IntoIter = std::vec::IntoIter<Part>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.into_iter()
    }
}
