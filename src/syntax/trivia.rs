use std::{borrow::Cow, fmt};

use text_size::{TextRange, TextSize};

use super::*;
use crate::{
    green::{GreenToken, GreenTrivia},
    SyntaxKind,
};

/// A piece of trivia of a [`SyntaxToken`], with its position.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SyntaxTrivia {
    token:   SyntaxToken,
    leading: bool,
    index:   u32,
    offset:  TextSize,
}

impl SyntaxTrivia {
    pub(super) fn new(token: SyntaxToken, leading: bool, index: usize, offset: TextSize) -> Self {
        Self {
            token,
            leading,
            index: index as u32,
            offset,
        }
    }

    /// Kind, span and text of the trivia.
    pub fn debug(&self) -> String {
        format!("{:?}@{:?} {:?}", self.kind(), self.full_span(), self.text())
    }

    /// The token this trivia is attached to.
    #[inline]
    pub fn token(&self) -> &SyntaxToken {
        &self.token
    }

    #[inline]
    pub fn is_leading(&self) -> bool {
        self.leading
    }

    pub fn green(&self) -> &GreenTrivia {
        let pieces = if self.leading {
            self.token.green().leading_trivia()
        } else {
            self.token.green().trailing_trivia()
        };
        &pieces[self.index as usize]
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.green().kind()
    }

    #[inline]
    pub fn full_span(&self) -> TextRange {
        TextRange::at(self.offset, self.green().full_width())
    }

    /// The exact source text of this trivia. For skipped tokens, this includes their own trivia.
    pub fn text(&self) -> Cow<'_, str> {
        let interner = self.token.parent().interner();
        match self.green() {
            GreenTrivia::Text { text, .. } => Cow::Borrowed(interner.resolve(text)),
            skipped @ GreenTrivia::Skipped(_) => {
                let mut out = String::new();
                skipped.write_text(interner, &mut out);
                Cow::Owned(out)
            }
        }
    }

    /// The token the parser skipped, if this is skipped-tokens trivia.
    #[inline]
    pub fn skipped_token(&self) -> Option<&GreenToken> {
        self.green().as_skipped()
    }
}

impl fmt::Debug for SyntaxTrivia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug())
    }
}

impl fmt::Display for SyntaxTrivia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
