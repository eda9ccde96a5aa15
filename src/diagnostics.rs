//! Lexical and syntactic diagnostics.
//!
//! Diagnostics are stored on green tokens with offsets relative to the token's text, so they move together with the
//! token when it is reused in another tree. [`collect`] turns them into [`Diagnostic`]s with absolute spans.

use std::fmt;

use text_size::{TextRange, TextSize};

use crate::{
    green::{GreenFlags, GreenNode, GreenToken, GreenTrivia, TokenInterner},
    NodeOrToken,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// What went wrong. Every code maps to a stable `CSxxxx` identifier and a message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticCode {
    IllegalEscape,
    NewlineInConstant,
    EmptyCharLiteral,
    TooManyCharsInConstant,
    InvalidNumber,
    IntegerOverflow,
    UnterminatedComment,
    UnterminatedString,
    BadDirectivePlacement,
    UnexpectedCharacter,
    IdentifierExpected,
    SemicolonExpected,
    TokenExpected,
    CloseParenExpected,
    CloseBraceExpected,
    OpenBraceExpected,
    InvalidExpressionTerm,
    InvalidToken,
    TooDeeplyNested,
}

impl DiagnosticCode {
    pub fn id(self) -> &'static str {
        match self {
            DiagnosticCode::IllegalEscape => "CS1009",
            DiagnosticCode::NewlineInConstant => "CS1010",
            DiagnosticCode::EmptyCharLiteral => "CS1011",
            DiagnosticCode::TooManyCharsInConstant => "CS1012",
            DiagnosticCode::InvalidNumber => "CS1013",
            DiagnosticCode::IntegerOverflow => "CS1021",
            DiagnosticCode::UnterminatedComment => "CS1035",
            DiagnosticCode::UnterminatedString => "CS1039",
            DiagnosticCode::BadDirectivePlacement => "CS1040",
            DiagnosticCode::UnexpectedCharacter => "CS1056",
            DiagnosticCode::IdentifierExpected => "CS1001",
            DiagnosticCode::SemicolonExpected => "CS1002",
            DiagnosticCode::TokenExpected => "CS1003",
            DiagnosticCode::CloseParenExpected => "CS1026",
            DiagnosticCode::CloseBraceExpected => "CS1513",
            DiagnosticCode::OpenBraceExpected => "CS1514",
            DiagnosticCode::InvalidExpressionTerm => "CS1525",
            DiagnosticCode::InvalidToken => "CS1519",
            DiagnosticCode::TooDeeplyNested => "CS8078",
        }
    }

    /// Message template; `{0}` is replaced with the first argument.
    pub fn template(self) -> &'static str {
        match self {
            DiagnosticCode::IllegalEscape => "Unrecognized escape sequence",
            DiagnosticCode::NewlineInConstant => "Newline in constant",
            DiagnosticCode::EmptyCharLiteral => "Empty character literal",
            DiagnosticCode::TooManyCharsInConstant => "Too many characters in character literal",
            DiagnosticCode::InvalidNumber => "Invalid number",
            DiagnosticCode::IntegerOverflow => "Integral constant is too large",
            DiagnosticCode::UnterminatedComment => "End-of-file found, '*/' expected",
            DiagnosticCode::UnterminatedString => "Unterminated string literal",
            DiagnosticCode::BadDirectivePlacement => {
                "Preprocessor directives must appear as the first non-whitespace character on a line"
            }
            DiagnosticCode::UnexpectedCharacter => "Unexpected character '{0}'",
            DiagnosticCode::IdentifierExpected => "Identifier expected",
            DiagnosticCode::SemicolonExpected => "; expected",
            DiagnosticCode::TokenExpected => "Syntax error, '{0}' expected",
            DiagnosticCode::CloseParenExpected => ") expected",
            DiagnosticCode::CloseBraceExpected => "} expected",
            DiagnosticCode::OpenBraceExpected => "{ expected",
            DiagnosticCode::InvalidExpressionTerm => "Invalid expression term '{0}'",
            DiagnosticCode::InvalidToken => "Invalid token '{0}'",
            DiagnosticCode::TooDeeplyNested => "An expression is too long or complex to compile",
        }
    }

    pub fn severity(self) -> Severity {
        Severity::Error
    }

    /// The code for a missing token of `kind`.
    pub(crate) fn expected(kind: crate::SyntaxKind) -> DiagnosticCode {
        use crate::SyntaxKind::*;
        match kind {
            Identifier => DiagnosticCode::IdentifierExpected,
            Semicolon => DiagnosticCode::SemicolonExpected,
            CloseParen => DiagnosticCode::CloseParenExpected,
            CloseBrace => DiagnosticCode::CloseBraceExpected,
            OpenBrace => DiagnosticCode::OpenBraceExpected,
            _ => DiagnosticCode::TokenExpected,
        }
    }
}

/// A diagnostic as stored in the green tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct SyntaxDiagnostic {
    pub(crate) code:   DiagnosticCode,
    /// Relative to the start of the owning token's text. Negative values point into leading trivia or before the
    /// token.
    pub(crate) offset: i32,
    pub(crate) len:    u32,
    pub(crate) args:   Box<[Box<str>]>,
}

impl SyntaxDiagnostic {
    pub(crate) fn new(code: DiagnosticCode, offset: i32, len: u32) -> Self {
        Self {
            code,
            offset,
            len,
            args: Box::default(),
        }
    }

    pub(crate) fn with_arg(mut self, arg: impl Into<Box<str>>) -> Self {
        let mut args = self.args.into_vec();
        args.push(arg.into());
        self.args = args.into_boxed_slice();
        self
    }
}

/// A diagnostic with an absolute position in a tree's text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub span:     TextRange,
    pub severity: Severity,
    pub code:     DiagnosticCode,
    pub args:     Vec<String>,
}

impl Diagnostic {
    pub fn message(&self) -> String {
        let mut message = self.code.template().to_string();
        for (i, arg) in self.args.iter().enumerate() {
            message = message.replace(&format!("{{{i}}}"), arg);
        }
        message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: error {}: {}", self.span, self.code.id(), self.message())
    }
}

/// Append-only collector for diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Reports every diagnostic inside `node`, which starts at `offset`, in document order.
pub(crate) fn collect(node: &GreenNode, offset: TextSize, interner: &TokenInterner, sink: &mut dyn DiagnosticSink) {
    let mut found = Vec::new();
    collect_node(node, offset, interner, &mut found);
    // diagnostics of one token are recorded in lexing order, which is not always positional
    found.sort_by_key(|d: &Diagnostic| d.span.start());
    for diagnostic in found {
        sink.report(diagnostic);
    }
}

fn collect_node(node: &GreenNode, offset: TextSize, interner: &TokenInterner, out: &mut Vec<Diagnostic>) {
    if !node.flags().contains(GreenFlags::CONTAINS_DIAGNOSTICS) {
        return;
    }
    let mut stack = vec![(node.children(), offset)];
    while let Some((children, offset)) = stack.last_mut() {
        let Some(child) = children.next() else {
            stack.pop();
            continue;
        };
        let start = *offset;
        *offset += child.full_width();
        match child {
            NodeOrToken::Node(node) if node.flags().contains(GreenFlags::CONTAINS_DIAGNOSTICS) => {
                stack.push((node.children(), start));
            }
            NodeOrToken::Node(_) => {}
            NodeOrToken::Token(token) => collect_token(token, start, interner, out),
        }
    }
}

pub(crate) fn collect_token(token: &GreenToken, offset: TextSize, interner: &TokenInterner, out: &mut Vec<Diagnostic>) {
    if !token.flags().contains(GreenFlags::CONTAINS_DIAGNOSTICS) {
        return;
    }
    let mut trivia_offset = offset;
    for trivia in token.leading_trivia() {
        if let GreenTrivia::Skipped(skipped) = trivia {
            let text_start = trivia_offset + skipped.leading_trivia_width();
            out.push(Diagnostic {
                span:     TextRange::at(text_start, skipped.text_len()),
                severity: DiagnosticCode::InvalidToken.severity(),
                code:     DiagnosticCode::InvalidToken,
                args:     vec![skipped.text(interner).to_string()],
            });
            collect_token(skipped, trivia_offset, interner, out);
        }
        trivia_offset += trivia.full_width();
    }

    let text_start = i64::from(u32::from(offset + token.leading_trivia_width()));
    for diagnostic in token.diagnostics() {
        let start = (text_start + i64::from(diagnostic.offset)).max(0);
        let start = TextSize::from(u32::try_from(start).unwrap_or(u32::MAX));
        out.push(Diagnostic {
            span:     TextRange::at(start, diagnostic.len.into()),
            severity: diagnostic.code.severity(),
            code:     diagnostic.code,
            args:     diagnostic.args.iter().map(|arg| arg.to_string()).collect(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_substitutes_arguments() {
        let diagnostic = Diagnostic {
            span:     TextRange::empty(0.into()),
            severity: Severity::Error,
            code:     DiagnosticCode::TokenExpected,
            args:     vec![")".to_string()],
        };
        assert_eq!(diagnostic.message(), "Syntax error, ')' expected");
        assert_eq!(diagnostic.to_string(), "0..0: error CS1003: Syntax error, ')' expected");
    }
}
