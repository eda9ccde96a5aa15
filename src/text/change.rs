use text_size::{TextRange, TextSize};

use crate::TextError;

/// Replace the text in `span` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct TextChange {
    pub span:     TextRange,
    pub new_text: String,
}

impl TextChange {
    pub fn new(span: TextRange, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }

    pub fn insert(offset: TextSize, text: impl Into<String>) -> Self {
        Self::new(TextRange::empty(offset), text)
    }

    pub fn delete(span: TextRange) -> Self {
        Self::new(span, String::new())
    }

    pub fn new_len(&self) -> TextSize {
        TextSize::of(self.new_text.as_str())
    }
}

/// The collapsed effect of a list of changes: `span` of the old text was replaced by `new_len` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextChangeRange {
    pub span:    TextRange,
    pub new_len: TextSize,
}

impl TextChangeRange {
    /// Collapses an ordered, non-overlapping change list. Returns `None` for an empty list.
    pub fn collapse(changes: &[TextChange]) -> Option<TextChangeRange> {
        let first = changes.first()?;
        let last = changes.last()?;
        let span = TextRange::new(first.span.start(), last.span.end());
        let removed: TextSize = changes.iter().map(|change| change.span.len()).sum();
        let inserted: TextSize = changes.iter().map(TextChange::new_len).sum();
        // untouched text between the first and the last change stays in the new text
        let new_len = span.len() - removed + inserted;
        Some(TextChangeRange { span, new_len })
    }

    pub fn new_end(&self) -> TextSize {
        self.span.start() + self.new_len
    }

    /// Maps an old offset at or after the end of the change into the new text.
    pub fn map_old(&self, old: TextSize) -> TextSize {
        debug_assert!(old >= self.span.end());
        old - self.span.end() + self.new_end()
    }

    /// Maps a new offset at or after the end of the change into the old text.
    pub fn map_new(&self, new: TextSize) -> TextSize {
        debug_assert!(new >= self.new_end());
        new - self.new_end() + self.span.end()
    }
}

/// Checks that `changes` are ascending, non-overlapping and inside `text`.
pub(crate) fn validate(text: &str, changes: &[TextChange]) -> Result<(), TextError> {
    let len = TextSize::of(text);
    let mut previous: Option<TextRange> = None;
    for change in changes {
        let span = change.span;
        let in_bounds = span.end() <= len
            && text.is_char_boundary(usize::from(span.start()))
            && text.is_char_boundary(usize::from(span.end()));
        if !in_bounds {
            return Err(TextError::InvalidChangeRange { span, len });
        }
        if let Some(previous) = previous {
            // touching is fine, two insertions at the same offset are not
            if span.start() < previous.end() || (span.is_empty() && previous.is_empty() && span == previous) {
                return Err(TextError::UnorderedChanges { previous, next: span });
            }
        }
        previous = Some(span);
    }
    Ok(())
}

/// Applies validated `changes` in one pass.
pub(super) fn apply(text: &str, changes: &[TextChange]) -> String {
    let inserted: usize = changes.iter().map(|change| change.new_text.len()).sum();
    let mut result = String::with_capacity(text.len() + inserted);
    let mut copied = 0;
    for change in changes {
        result.push_str(&text[copied..usize::from(change.span.start())]);
        result.push_str(&change.new_text);
        copied = change.span.end().into();
    }
    result.push_str(&text[copied..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(start.into(), end.into())
    }

    #[test]
    fn collapse_spans_all_changes() {
        let changes = [TextChange::new(range(2, 4), "xyz"), TextChange::delete(range(8, 9))];
        let collapsed = TextChangeRange::collapse(&changes).unwrap();
        assert_eq!(collapsed.span, range(2, 9));
        // 7 old bytes, minus 3 removed, plus 3 inserted
        assert_eq!(collapsed.new_len, 7.into());
        assert_eq!(collapsed.map_old(10.into()), 10.into());
        assert_eq!(TextChangeRange::collapse(&[]), None);
    }

    #[test]
    fn apply_in_one_pass() {
        let changes = [TextChange::new(range(0, 1), "A"), TextChange::insert(3.into(), "!")];
        assert!(validate("abcd", &changes).is_ok());
        assert_eq!(apply("abcd", &changes), "Abc!d");
    }
}
