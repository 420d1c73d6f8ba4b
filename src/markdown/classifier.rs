/*!
 * Classification of parts into translatable text and pass-through content.
 *
 * Each predicate lives behind its own function so the precedence rules in
 * [`classify_content`] do not depend on how a predicate is matched.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use super::part::{contains_text, Part};

/// Characters allowed in a single path segment
const FILE_CHARS: &str = r"A-Za-z0-9_\-";

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)$",
    )
    .expect("URL pattern must compile")
});

static PATH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let double_dot = r"\.{1,2}";
    let name_with_dot = format!("[{FILE_CHARS}][{FILE_CHARS}.]*");
    let dot_with_name = format!("[{FILE_CHARS}.]*[{FILE_CHARS}]");
    let segment = format!("({double_dot}|{name_with_dot}|{dot_with_name})");
    let home = format!("(~[{FILE_CHARS}]*/|/)?");
    Regex::new(&format!("^{home}({segment}/)*{segment}?$")).expect("path pattern must compile")
});

static HEADER_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#+ ").expect("header marker pattern must compile"));

static HEADER_SPLIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<prefix>[ \t]*#+ +)(?P<text>.*)$").expect("header split pattern must compile")
});

/// Category assigned to a part, deciding whether and how it is translated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Natural language text that should be translated
    TextBearing,
    /// No alphabetic characters at all (numbers, punctuation, fences)
    NonText,
    /// The whole part is a single URL
    Url,
    /// The whole part is a filesystem path or a bare file name
    Path,
    /// A single line markdown header
    Header,
}

impl Classification {
    /// Whether content with this classification is sent to the provider
    pub fn is_translatable(self) -> bool {
        matches!(self, Self::TextBearing)
    }

    /// Short lowercase label used in logs
    pub fn label(self) -> &'static str {
        match self {
            Self::TextBearing => "text",
            Self::NonText => "non-text",
            Self::Url => "url",
            Self::Path => "path",
            Self::Header => "header",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// True when the text has no alphabetic character
pub fn is_non_text(text: &str) -> bool {
    !contains_text(text)
}

/// True when the whole trimmed text is an http(s) URL
pub fn is_url(text: &str) -> bool {
    URL_PATTERN.is_match(text.trim())
}

/// True when the whole trimmed text is a path: optional `~`, `~user/` or `/`,
/// then `/`-separated segments that are file names, `.` or `..`.
///
/// A segment holding `...` anywhere is never a path, so `Loading...` stays text.
pub fn is_path(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.split('/').any(|segment| segment.contains("...")) {
        return false;
    }
    PATH_PATTERN.is_match(trimmed)
}

/// True when the trimmed text is a single line starting with `#` markers and a space
pub fn is_header(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.contains('\n') && HEADER_MARKER.is_match(trimmed)
}

/// Classify text ignoring header markers.
///
/// Order: non-text, URL, path, otherwise text.
pub fn classify_content(text: &str) -> Classification {
    if is_non_text(text) {
        Classification::NonText
    } else if is_url(text) {
        Classification::Url
    } else if is_path(text) {
        Classification::Path
    } else {
        Classification::TextBearing
    }
}

/// Classify text, headers taking precedence over content checks
pub fn classify(text: &str) -> Classification {
    if is_header(text) {
        Classification::Header
    } else {
        classify_content(text)
    }
}

/// Split a header into its marker prefix and its text.
///
/// Returns `None` for non-headers and for headers the split pattern cannot
/// capture. On success `prefix + text` equals the input.
pub fn try_split_header(text: &str) -> Option<(&str, &str)> {
    if !is_header(text) {
        return None;
    }
    let captures = HEADER_SPLIT.captures(text)?;
    let prefix = captures.name("prefix")?.as_str();
    let body = captures.name("text")?.as_str();
    Some((prefix, body))
}

/// Split a header into `(prefix, text)`, or `("", text)` when it is not a header
pub fn split_header(text: &str) -> (&str, &str) {
    try_split_header(text).unwrap_or(("", text))
}

impl Part {
    /// Classification of this part
    pub fn classify(&self) -> Classification {
        classify(self.as_str())
    }
}
