/*!
 * Streaming segmenter.
 *
 * Reads a line oriented stream and yields one [`Part`] per group of
 * consecutive non-blank lines. Runs of blank lines never produce a part.
 */

use std::io::{self, BufRead, StdinLock};

use super::part::Part;

/// Reads from a buffered stream and returns one part at a time
#[derive(Debug)]
pub struct PartReader<R> {
    /// Underlying stream, `None` once end of stream or a read error was seen
    reader: Option<R>,
    /// Reusable line buffer
    line: String,
}

impl<R: BufRead> PartReader<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            line: String::new(),
        }
    }

    /// Read lines until a blank line or end of stream and return them as a part.
    ///
    /// Returns `Ok(None)` once the stream is exhausted. Lines accumulated
    /// before a read error are dropped together with the error.
    pub fn read_part(&mut self) -> io::Result<Option<Part>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        let mut lines: Vec<String> = Vec::new();
        loop {
            self.line.clear();
            let read = match reader.read_line(&mut self.line) {
                Ok(read) => read,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.reader = None;
                    return Err(e);
                }
            };

            // end of stream
            if read == 0 {
                self.reader = None;
                break;
            }

            let content = self.line.trim_end_matches(['\n', '\r']);
            if content.trim().is_empty() {
                if lines.is_empty() {
                    continue;
                }
                break;
            }
            lines.push(content.to_string());
        }

        if lines.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Part::new(lines.join("\n"))))
        }
    }
}

impl PartReader<StdinLock<'static>> {
    /// Reader over the process standard input
    pub fn from_stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> Iterator for PartReader<R> {
    type Item = io::Result<Part>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_part().transpose()
    }
}
