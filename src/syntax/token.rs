use std::{
    fmt::{self, Write},
    hash::{Hash, Hasher},
};

use text_size::{TextRange, TextSize};

use super::*;
use crate::{
    diagnostics::{self, Diagnostic},
    green::{GreenToken, GreenTrivia, TokenValue},
    NodeOrToken, SyntaxKind,
};

/// The value of a literal token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Integer(u64),
    Real(f64),
    Char(char),
    Str(&'a str),
}

/// Syntax tree token.
#[derive(Clone)]
pub struct SyntaxToken {
    parent: SyntaxNode,
    index:  u32,
    offset: TextSize,
    green:  GreenToken,
}

impl Hash for SyntaxToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parent.hash(state);
        self.index.hash(state);
        self.offset.hash(state);
    }
}

impl PartialEq for SyntaxToken {
    fn eq(&self, other: &SyntaxToken) -> bool {
        self.parent == other.parent && self.index == other.index && self.offset == other.offset
    }
}

impl Eq for SyntaxToken {}

impl SyntaxToken {
    pub(super) fn new(parent: SyntaxNode, index: usize, offset: TextSize, green: GreenToken) -> SyntaxToken {
        Self {
            parent,
            index: index as u32,
            offset,
            green,
        }
    }

    /// Kind, span and text of the token with its trivia.
    pub fn debug(&self) -> String {
        let mut res = String::new();
        write!(res, "{:?}@{:?}", self.kind(), self.span()).unwrap();
        if self.is_missing() {
            res.push_str(" (missing)");
        } else {
            write!(res, " {:?}", self.text()).unwrap();
        }
        res
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.green.kind()
    }

    #[inline]
    pub fn green(&self) -> &GreenToken {
        &self.green
    }

    /// The token's text, without trivia. Missing tokens have empty text.
    #[inline]
    pub fn text(&self) -> &str {
        self.green.text(self.parent.interner())
    }

    /// The text of this token including its leading and trailing trivia.
    pub fn full_text(&self) -> String {
        let mut out = String::new();
        self.green.write_full_text(self.parent.interner(), &mut out);
        out
    }

    /// The value of a literal token, `None` for other tokens and literals that could not be evaluated.
    pub fn value(&self) -> Option<Value<'_>> {
        let value = match self.green.value()? {
            TokenValue::Integer(value) => Value::Integer(value),
            TokenValue::Real(bits) => Value::Real(f64::from_bits(bits)),
            TokenValue::Char(c) => Value::Char(c),
            TokenValue::Str(key) => Value::Str(self.parent.interner().resolve(&key)),
        };
        Some(value)
    }

    /// The range of the token's text, without trivia.
    #[inline]
    pub fn span(&self) -> TextRange {
        TextRange::at(self.offset + self.green.leading_trivia_width(), self.green.text_len())
    }

    /// The range of the token including its trivia.
    #[inline]
    pub fn full_span(&self) -> TextRange {
        TextRange::at(self.offset, self.green.full_width())
    }

    /// Whether this token was inserted by error recovery and has no text.
    #[inline]
    pub fn is_missing(&self) -> bool {
        self.green.is_missing()
    }

    pub fn leading_trivia(&self) -> impl Iterator<Item = SyntaxTrivia> + '_ {
        self.trivia(self.green.leading_trivia(), self.offset, true)
    }

    pub fn trailing_trivia(&self) -> impl Iterator<Item = SyntaxTrivia> + '_ {
        self.trivia(self.green.trailing_trivia(), self.span().end(), false)
    }

    fn trivia<'t>(
        &'t self,
        pieces: &'t [GreenTrivia],
        mut offset: TextSize,
        leading: bool,
    ) -> impl Iterator<Item = SyntaxTrivia> + 't {
        pieces.iter().enumerate().map(move |(index, piece)| {
            let trivia = SyntaxTrivia::new(self.clone(), leading, index, offset);
            offset += piece.full_width();
            trivia
        })
    }

    /// Every diagnostic of this token, including those of tokens skipped into its trivia.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        diagnostics::collect_token(&self.green, self.offset, self.parent.interner(), &mut out);
        out.sort_by_key(|diagnostic| diagnostic.span.start());
        out
    }

    /// The parent node of this token.
    #[inline]
    pub fn parent(&self) -> &SyntaxNode {
        &self.parent
    }

    /// Returns an iterator along the chain of parents of this token.
    #[inline]
    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode> {
        self.parent.ancestors()
    }

    /// The index of this token in its parent's slots.
    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }

    #[inline]
    pub fn next_sibling_or_token(&self) -> Option<SyntaxElement> {
        self.parent.next_child_or_token_after(self.index(), self.full_span().end())
    }

    #[inline]
    pub fn prev_sibling_or_token(&self) -> Option<SyntaxElement> {
        self.parent.prev_child_or_token_before(self.index(), self.offset)
    }

    /// Returns the next token in the tree. This is not necessary a direct sibling of this token, but will always be
    /// further right in the tree.
    pub fn next_token(&self) -> Option<SyntaxToken> {
        let mut current: SyntaxElement = self.clone().into();
        loop {
            match current.next_sibling_or_token() {
                Some(NodeOrToken::Token(token)) => return Some(token),
                Some(NodeOrToken::Node(node)) => match node.first_token() {
                    Some(token) => return Some(token),
                    None => current = node.into(),
                },
                None => current = current.parent()?.into(),
            }
        }
    }

    /// Returns the previous token in the tree. This is not necessary a direct sibling of this token, but will
    /// always be further left in the tree.
    pub fn prev_token(&self) -> Option<SyntaxToken> {
        let mut current: SyntaxElement = self.clone().into();
        loop {
            match current.prev_sibling_or_token() {
                Some(NodeOrToken::Token(token)) => return Some(token),
                Some(NodeOrToken::Node(node)) => match node.last_token() {
                    Some(token) => return Some(token),
                    None => current = node.into(),
                },
                None => current = current.parent()?.into(),
            }
        }
    }
}

impl fmt::Debug for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug())
    }
}

impl fmt::Display for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
