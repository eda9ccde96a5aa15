use lasso::Spur;
use text_size::TextSize;

use crate::{
    green::{GreenToken, TokenInterner},
    SyntaxKind,
};

/// A piece of trivia attached to a green token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GreenTrivia {
    /// Whitespace, a line break, a comment or a directive.
    Text { kind: SyntaxKind, text: Spur, len: TextSize },
    /// A token the parser could not place. It keeps its own trivia and diagnostics.
    Skipped(GreenToken),
}

impl GreenTrivia {
    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        match self {
            GreenTrivia::Text { kind, .. } => *kind,
            GreenTrivia::Skipped(_) => SyntaxKind::SkippedTokens,
        }
    }

    #[inline]
    pub fn full_width(&self) -> TextSize {
        match self {
            GreenTrivia::Text { len, .. } => *len,
            GreenTrivia::Skipped(token) => token.full_width(),
        }
    }

    /// Appends the exact source text of this trivia.
    pub fn write_text(&self, interner: &TokenInterner, out: &mut String) {
        match self {
            GreenTrivia::Text { text, .. } => out.push_str(interner.resolve(text)),
            GreenTrivia::Skipped(token) => token.write_full_text(interner, out),
        }
    }

    pub fn as_skipped(&self) -> Option<&GreenToken> {
        match self {
            GreenTrivia::Skipped(token) => Some(token),
            GreenTrivia::Text { .. } => None,
        }
    }
}
