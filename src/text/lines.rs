use text_size::{TextRange, TextSize};

/// A line of a [`SourceText`](crate::SourceText).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextLine {
    /// Zero-based line number.
    pub number:               usize,
    /// The line's text without its line break.
    pub span:                 TextRange,
    pub span_including_break: TextRange,
}

/// Zero-based line and column (in bytes) of an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: usize,
    pub col:  TextSize,
}

pub(crate) fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// Offsets at which lines start. Always contains 0.
pub(super) fn line_starts(text: &str) -> Box<[TextSize]> {
    let mut starts = vec![TextSize::from(0)];
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(_, '\n')) = chars.peek() {
                chars.next();
                end += 1;
            }
        }
        starts.push(TextSize::from(end as u32));
    }
    starts.into_boxed_slice()
}

/// Restartable iterator over the lines of a text.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    pub(super) text:   &'a str,
    pub(super) starts: &'a [TextSize],
    pub(super) next:   usize,
}

impl Lines<'_> {
    pub(super) fn line(text: &str, starts: &[TextSize], number: usize) -> Option<TextLine> {
        let start = *starts.get(number)?;
        let end_including_break = starts.get(number + 1).copied().unwrap_or_else(|| TextSize::of(text));
        let line = &text[usize::from(start)..usize::from(end_including_break)];
        // a line holds at most one break, `\r\n` included
        let content = line.trim_end_matches(is_line_break);
        let end = start + TextSize::of(content);
        Some(TextLine {
            number,
            span: TextRange::new(start, end),
            span_including_break: TextRange::new(start, end_including_break),
        })
    }
}

impl Iterator for Lines<'_> {
    type Item = TextLine;

    fn next(&mut self) -> Option<TextLine> {
        let line = Self::line(self.text, self.starts, self.next)?;
        self.next += 1;
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.starts.len() - self.next.min(self.starts.len());
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Lines<'_> {}
