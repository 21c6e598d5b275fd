//! Line splitting for line-oriented protocols.

use tracing::debug;

/// Splits one direction of a byte stream into lines.
///
/// A line ends at CR, LF or CRLF; the terminator is not part of the line.
/// Lines longer than the configured maximum are cut and delivered in
/// pieces of the maximum length.
#[derive(Debug, Clone, Default)]
pub struct ContentLine {
    buf: Vec<u8>,
    max_line_length: Option<usize>,
    last_was_cr: bool,
}

impl ContentLine {
    /// Create a splitter with no line length limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a splitter delivering at most `max` bytes per line.
    #[must_use]
    pub fn with_max_line_length(max: usize) -> Self {
        Self {
            max_line_length: Some(max.max(1)),
            ..Self::default()
        }
    }

    /// Feed bytes, returning every line completed by them.
    pub fn push(&mut self, data: &[u8]) -> Vec<Vec<u8>> {
        let mut lines = Vec::new();

        for &byte in data {
            match byte {
                b'\n' if self.last_was_cr => {
                    self.last_was_cr = false;
                },
                b'\r' | b'\n' => {
                    self.last_was_cr = byte == b'\r';
                    lines.push(std::mem::take(&mut self.buf));
                },
                _ => {
                    self.last_was_cr = false;
                    self.buf.push(byte);
                    if self.max_line_length.is_some_and(|max| self.buf.len() >= max) {
                        debug!(length = self.buf.len(), "line exceeds maximum length, delivering partial line");
                        lines.push(std::mem::take(&mut self.buf));
                    }
                },
            }
        }

        lines
    }

    /// Whether bytes are buffered without a terminator yet.
    #[must_use]
    pub fn has_partial_line(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Take the unterminated remainder, if any.
    pub fn flush(&mut self) -> Option<Vec<u8>> {
        self.last_was_cr = false;
        (!self.buf.is_empty()).then(|| std::mem::take(&mut self.buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminators() {
        let mut splitter = ContentLine::new();
        let lines = splitter.push(b"one\r\ntwo\nthree\rfour");
        assert_eq!(lines, vec![b"one".to_vec(), b"two".to_vec(), b"three".to_vec()]);
        assert!(splitter.has_partial_line());
        assert_eq!(splitter.flush(), Some(b"four".to_vec()));
        assert_eq!(splitter.flush(), None);
    }

    #[test]
    fn test_crlf_split_across_pushes() {
        let mut splitter = ContentLine::new();
        assert_eq!(splitter.push(b"alice\r"), vec![b"alice".to_vec()]);
        assert!(splitter.push(b"\n").is_empty());
        assert_eq!(splitter.push(b"\n"), vec![Vec::<u8>::new()]);
    }

    #[test]
    fn test_max_line_length() {
        let mut splitter = ContentLine::with_max_line_length(4);
        let lines = splitter.push(b"abcdefghij\n");
        assert_eq!(lines, vec![b"abcd".to_vec(), b"efgh".to_vec(), b"ij".to_vec()]);
        assert!(!splitter.has_partial_line());
    }
}
