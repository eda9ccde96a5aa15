use text_size::TextSize;

use super::Lexer;
use crate::{green::GreenTrivia, text::is_line_break, DiagnosticCode, SyntaxKind};

/// Whitespace that does not end a line.
#[inline]
pub(super) fn is_whitespace(c: char) -> bool {
    c.is_whitespace() && !is_line_break(c)
}

/// Whether only whitespace separates `pos` from the start of its line.
pub fn is_at_line_start(text: &str, pos: TextSize) -> bool {
    let before = &text[..usize::from(pos)];
    match before.trim_end_matches(is_whitespace).chars().next_back() {
        None => true,
        Some(c) => is_line_break(c),
    }
}

impl Lexer<'_> {
    /// Lexes a run of trivia. Trailing trivia stops after the first line break and never contains documentation
    /// comments or directives.
    pub(super) fn lex_trivia(&mut self, out: &mut Vec<GreenTrivia>, trailing: bool) {
        loop {
            let start = self.cursor.pos();
            let Some(c) = self.cursor.peek() else {
                break;
            };
            let kind = if is_whitespace(c) {
                self.cursor.eat_while(is_whitespace);
                SyntaxKind::Whitespace
            } else if is_line_break(c) {
                if !self.cursor.eat_str("\r\n") {
                    self.cursor.bump();
                }
                SyntaxKind::EndOfLine
            } else if self.cursor.starts_with("//") {
                let documentation = !trailing
                    && self.documentation_comments
                    && self.cursor.starts_with("///")
                    && !self.cursor.starts_with("////");
                self.cursor.eat_while(|c| !is_line_break(c));
                if documentation {
                    SyntaxKind::DocumentationComment
                } else {
                    SyntaxKind::SingleLineComment
                }
            } else if self.cursor.starts_with("/*") {
                self.lex_block_comment(start);
                SyntaxKind::MultiLineComment
            } else if c == '#' && !trailing && is_at_line_start(self.cursor.text(), TextSize::from(start as u32)) {
                self.cursor.eat_while(|c| !is_line_break(c));
                SyntaxKind::PreprocessorDirective
            } else {
                break;
            };

            let text = self.cursor.slice_from(start);
            out.push(GreenTrivia::Text {
                kind,
                text: self.interner.get_or_intern(text),
                len: TextSize::of(text),
            });
            if trailing && kind == SyntaxKind::EndOfLine {
                break;
            }
        }
    }

    fn lex_block_comment(&mut self, start: usize) {
        self.cursor.eat_str("/*");
        loop {
            if self.cursor.eat_str("*/") {
                return;
            }
            if self.cursor.bump().is_none() {
                self.report(DiagnosticCode::UnterminatedComment, start, self.cursor.pos() - start);
                return;
            }
        }
    }
}
