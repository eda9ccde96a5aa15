//! Immutable source text with a lazily built line table.

mod change;
mod encoding;
mod lines;

use std::{fmt, sync::Arc};

use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};
use text_size::{TextRange, TextSize};

use crate::TextError;

pub(crate) use self::{change::validate as validate_changes, lines::is_line_break};
pub use self::{
    change::{TextChange, TextChangeRange},
    encoding::Encoding,
    lines::{LineCol, Lines, TextLine},
};

/// Immutable UTF-8 source text. Cloning is cheap; clones share the text, the checksum and the line table.
#[derive(Clone)]
pub struct SourceText {
    inner: Arc<TextInner>,
}

struct TextInner {
    text:     Box<str>,
    encoding: Option<Encoding>,
    checksum: OnceCell<[u8; 32]>,
    lines:    OnceCell<Box<[TextSize]>>,
}

impl SourceText {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_encoding(text.into(), None)
    }

    fn with_encoding(text: String, encoding: Option<Encoding>) -> Self {
        assert!(
            text.len() <= u32::MAX as usize,
            "source text of {} bytes does not fit into a `TextSize`",
            text.len()
        );
        Self {
            inner: Arc::new(TextInner {
                text: text.into_boxed_str(),
                encoding,
                checksum: OnceCell::new(),
                lines: OnceCell::new(),
            }),
        }
    }

    /// Decodes `bytes`. Without an explicit `encoding`, a byte order mark selects it and UTF-8 is assumed
    /// otherwise.
    pub fn from_bytes(bytes: &[u8], encoding: Option<Encoding>) -> Result<Self, TextError> {
        let encoding = encoding
            .or_else(|| Encoding::detect(bytes).map(|(encoding, _)| encoding))
            .unwrap_or(Encoding::Utf8);
        let text = encoding::decode(bytes, encoding)?;
        Ok(Self::with_encoding(text, Some(encoding)))
    }

    /// Applies an ascending, non-overlapping list of changes, producing a new text.
    pub fn with_changes(&self, changes: &[TextChange]) -> Result<Self, TextError> {
        if changes.is_empty() {
            return Ok(self.clone());
        }
        change::validate(self.as_str(), changes)?;
        let text = change::apply(self.as_str(), changes);
        Ok(Self::with_encoding(text, self.inner.encoding))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner.text
    }

    #[inline]
    pub fn len(&self) -> TextSize {
        TextSize::of(self.as_str())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.text.is_empty()
    }

    pub fn encoding(&self) -> Option<Encoding> {
        self.inner.encoding
    }

    /// Text in `span`.
    ///
    /// # Panics
    /// If `span` is out of bounds or splits a character.
    pub fn slice(&self, span: TextRange) -> &str {
        &self.as_str()[span]
    }

    /// A new text holding the text in `span`.
    pub fn sub_text(&self, span: TextRange) -> SourceText {
        if span == TextRange::up_to(self.len()) {
            return self.clone();
        }
        Self::with_encoding(self.slice(span).to_string(), self.inner.encoding)
    }

    /// SHA-256 of the UTF-8 text, computed on first use.
    pub fn checksum(&self) -> &[u8; 32] {
        self.inner
            .checksum
            .get_or_init(|| Sha256::digest(self.as_str().as_bytes()).into())
    }

    fn line_starts(&self) -> &[TextSize] {
        self.inner.lines.get_or_init(|| lines::line_starts(self.as_str()))
    }

    pub fn lines(&self) -> Lines<'_> {
        Lines {
            text:   self.as_str(),
            starts: self.line_starts(),
            next:   0,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts().len()
    }

    pub fn line(&self, number: usize) -> Option<TextLine> {
        Lines::line(self.as_str(), self.line_starts(), number)
    }

    /// Number of the line containing `offset`. An offset at the end of the text belongs to the last line.
    pub fn line_from_position(&self, offset: TextSize) -> usize {
        let starts = self.line_starts();
        match starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let line = self.line_from_position(offset);
        LineCol {
            line,
            col: offset - self.line_starts()[line],
        }
    }

    /// Whether both texts hold the same characters.
    pub fn content_eq(&self, other: &SourceText) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.as_str() == other.as_str()
    }
}

impl fmt::Debug for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceText")
            .field("text", &self.as_str())
            .field("encoding", &self.inner.encoding)
            .finish()
    }
}

impl fmt::Display for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        SourceText::new(text)
    }
}

impl From<String> for SourceText {
    fn from(text: String) -> Self {
        SourceText::new(text)
    }
}

impl PartialEq<str> for SourceText {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for SourceText {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_table() {
        let text = SourceText::new("ab\r\ncd\n\nef\u{2028}g");
        let lines: Vec<_> = text.lines().map(|line| text.slice(line.span).to_string()).collect();
        assert_eq!(lines, ["ab", "cd", "", "ef", "g"]);
        assert_eq!(text.line_count(), 5);
        assert_eq!(text.line_from_position(0.into()), 0);
        assert_eq!(text.line_from_position(3.into()), 0);
        assert_eq!(text.line_from_position(4.into()), 1);
        assert_eq!(text.line_from_position(text.len()), 4);
        assert_eq!(text.line_col(5.into()), LineCol {
            line: 1,
            col:  1.into(),
        });
        let first = text.line(0).unwrap();
        assert_eq!(first.span_including_break, TextRange::new(0.into(), 4.into()));
    }

    #[test]
    fn lines_are_restartable() {
        let text = SourceText::new("a\nb");
        let lines = text.lines();
        assert_eq!(lines.clone().count(), 2);
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn checksum_is_cached() {
        let text = SourceText::new("class C {}");
        let first = *text.checksum();
        assert_eq!(&first, text.clone().checksum());
        assert_ne!(&first, SourceText::new("class D {}").checksum());
    }
}
