/*!
 * A single blank-line delimited unit of a markdown document.
 */

use std::fmt;

/// A contiguous span of the input bounded by blank lines.
///
/// Parts are never mutated in place; every transformation returns a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Part(String);

impl Part {
    /// Create a part from raw text
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Borrow the raw text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the part and return its text
    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether the part holds no text at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of the part without trailing whitespace.
    ///
    /// Leading indentation is kept since it is significant in markdown
    /// (indented code blocks, nested lists).
    pub fn trimmed(&self) -> Part {
        Part(self.0.trim_end().to_string())
    }

    /// Whether the part contains at least one alphabetic character
    pub fn contains_text(&self) -> bool {
        contains_text(&self.0)
    }

    /// Number of words, a word being a maximal run of alphanumeric characters
    pub fn word_count(&self) -> usize {
        word_count(&self.0)
    }

    /// Number of characters (not bytes)
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Part {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Part {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl AsRef<str> for Part {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether `text` contains at least one alphabetic character
pub fn contains_text(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
}

/// Count maximal runs of alphanumeric characters
pub fn word_count(text: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if !in_word {
                count += 1;
                in_word = true;
            }
        } else {
            in_word = false;
        }
    }
    count
}
