//! Turns source text into green tokens with attached trivia.
//!
//! The lexer never fails: malformed input still produces tokens, with diagnostics attached to them. It can start
//! at any position given the [`LexerMode`] there, which is what incremental relexing relies on.

mod cursor;
mod literals;
mod mode;
mod trivia;

use fxhash::FxHashMap;
use text_size::TextSize;

use crate::{
    diagnostics::SyntaxDiagnostic,
    green::{GreenToken, GreenTokenData, TokenInterner, TokenParts, TokenValue},
    DiagnosticCode, SyntaxKind,
};

use self::{cursor::Cursor, mode::Frame};

pub use self::{mode::LexerMode, trivia::is_at_line_start};

/// How far past the end of a token the lexer may look when deciding on it, in bytes.
/// Incremental relexing restarts at least this far in front of a change.
pub const LEXER_LOOKAHEAD: TextSize = TextSize::new(16);

/// Lexes exactly one token starting at `start`, with its leading and trailing trivia.
/// Returns the token, the position after it and the mode after it.
pub fn lex(text: &str, start: TextSize, mode: &LexerMode, interner: &TokenInterner) -> (GreenToken, TextSize, LexerMode) {
    let mut lexer = Lexer::with_mode(text, start, mode.clone(), interner);
    let token = lexer.next_token();
    (token, lexer.position(), lexer.mode)
}

#[derive(Debug)]
struct PendingDiagnostic {
    code:  DiagnosticCode,
    start: usize,
    len:   usize,
    arg:   Option<String>,
}

/// Streaming lexer over a text. After the end of the text, every call returns another `EndOfFile` token.
#[derive(Debug)]
pub struct Lexer<'a> {
    cursor:                 Cursor<'a>,
    mode:                   LexerMode,
    interner:               &'a TokenInterner,
    documentation_comments: bool,
    tokens:                 FxHashMap<GreenTokenData, GreenToken>,
    diagnostics:            Vec<PendingDiagnostic>,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str, interner: &'a TokenInterner) -> Self {
        Self::with_mode(text, 0.into(), LexerMode::base(), interner)
    }

    /// A lexer resuming at `start` in `mode`.
    pub fn with_mode(text: &'a str, start: TextSize, mode: LexerMode, interner: &'a TokenInterner) -> Self {
        Self {
            cursor: Cursor::new(text, start.into()),
            mode,
            interner,
            documentation_comments: true,
            tokens: FxHashMap::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Whether `///` comments are classified as documentation comments. On by default.
    pub fn with_documentation_comments(mut self, enabled: bool) -> Self {
        self.documentation_comments = enabled;
        self
    }

    #[inline]
    pub fn position(&self) -> TextSize {
        TextSize::from(self.cursor.pos() as u32)
    }

    #[inline]
    pub fn mode(&self) -> &LexerMode {
        &self.mode
    }

    /// Continues lexing at `position` in `mode`.
    pub fn reset(&mut self, position: TextSize, mode: LexerMode) {
        self.cursor.set_pos(position.into());
        self.mode = mode;
    }

    pub fn next_token(&mut self) -> GreenToken {
        self.diagnostics.clear();
        let in_interpolation = !self.mode.is_base();

        let mut leading = Vec::new();
        if self.mode.allows_trivia() {
            self.lex_trivia(&mut leading, false);
        }
        let text_start = self.cursor.pos();
        let (kind, value) = self.lex_token();
        let text = self.cursor.slice_from(text_start);
        let mut trailing = Vec::new();
        if kind != SyntaxKind::EndOfFile && self.mode.allows_trivia() {
            self.lex_trivia(&mut trailing, true);
        }

        let diagnostics = self
            .diagnostics
            .drain(..)
            .map(|pending| {
                let offset = pending.start as i64 - text_start as i64;
                let diagnostic = SyntaxDiagnostic::new(pending.code, offset as i32, pending.len as u32);
                match pending.arg {
                    Some(arg) => diagnostic.with_arg(arg),
                    None => diagnostic,
                }
            })
            .collect();
        let data = TokenParts {
            kind,
            text: (kind.static_text().is_none() && !text.is_empty()).then(|| self.interner.get_or_intern(text)),
            text_len: TextSize::of(text),
            value,
            leading,
            trailing,
            diagnostics,
            in_interpolation,
        }
        .into_data();
        self.tokens
            .entry(data)
            .or_insert_with_key(|data| GreenToken::from_data(data.clone()))
            .clone()
    }

    fn report(&mut self, code: DiagnosticCode, start: usize, len: usize) {
        self.diagnostics.push(PendingDiagnostic {
            code,
            start,
            len,
            arg: None,
        });
    }

    fn report_with(&mut self, code: DiagnosticCode, start: usize, len: usize, arg: String) {
        self.diagnostics.push(PendingDiagnostic {
            code,
            start,
            len,
            arg: Some(arg),
        });
    }

    fn lex_token(&mut self) -> (SyntaxKind, Option<TokenValue>) {
        if let Some(Frame::Text { verbatim }) = self.mode.top() {
            return (self.lex_interpolated_text(verbatim), None);
        }

        let start = self.cursor.pos();
        let Some(c) = self.cursor.peek() else {
            self.mode.clear();
            return (SyntaxKind::EndOfFile, None);
        };
        let second = self.cursor.peek_nth(1);
        let third = self.cursor.peek_nth(2);
        match c {
            '"' => self.lex_string(),
            '\'' => self.lex_char(),
            '@' if second == Some('"') => self.lex_verbatim_string(),
            '@' if second == Some('$') && third == Some('"') => self.lex_interpolated_start(true),
            '@' if second.is_some_and(is_identifier_start) => (self.lex_identifier(true), None),
            '$' if second == Some('"') => self.lex_interpolated_start(false),
            '$' if second == Some('@') && third == Some('"') => self.lex_interpolated_start(true),
            c if c.is_ascii_digit() => self.lex_number(),
            '.' if second.is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),
            c if is_identifier_start(c) => (self.lex_identifier(false), None),
            '#' => {
                self.cursor.bump();
                self.report(DiagnosticCode::BadDirectivePlacement, start, 1);
                (SyntaxKind::BadToken, None)
            }
            _ => match self.lex_punctuation(c) {
                Some(kind) => (kind, None),
                None => {
                    self.cursor.bump();
                    let len = self.cursor.pos() - start;
                    self.report_with(DiagnosticCode::UnexpectedCharacter, start, len, c.to_string());
                    (SyntaxKind::BadToken, None)
                }
            },
        }
    }

    fn lex_identifier(&mut self, verbatim: bool) -> SyntaxKind {
        let start = self.cursor.pos();
        if verbatim {
            self.cursor.bump();
        }
        self.cursor.bump();
        self.cursor.eat_while(unicode_ident::is_xid_continue);
        if verbatim {
            return SyntaxKind::Identifier;
        }
        SyntaxKind::from_keyword(self.cursor.slice_from(start)).unwrap_or(SyntaxKind::Identifier)
    }

    fn lex_interpolated_start(&mut self, verbatim: bool) -> (SyntaxKind, Option<TokenValue>) {
        self.cursor.bump_n(if verbatim { 3 } else { 2 });
        self.mode.push_text(verbatim);
        (SyntaxKind::InterpolatedStringStart, None)
    }

    /// Lexes inside the text part of an interpolated string: a run of text, the `{` opening a hole, or the end.
    fn lex_interpolated_text(&mut self, verbatim: bool) -> SyntaxKind {
        let start = self.cursor.pos();
        match self.cursor.peek() {
            None => {
                self.report(DiagnosticCode::UnterminatedString, start, 0);
                self.mode.pop();
                return SyntaxKind::InterpolatedStringEnd;
            }
            Some('"') if !(verbatim && self.cursor.starts_with("\"\"")) => {
                self.cursor.bump();
                self.mode.pop();
                return SyntaxKind::InterpolatedStringEnd;
            }
            Some('{') if !self.cursor.starts_with("{{") => {
                self.cursor.bump();
                self.mode.enter_hole();
                return SyntaxKind::OpenBrace;
            }
            Some(c) if !verbatim && crate::text::is_line_break(c) => {
                // the string ends here without its quote
                self.report(DiagnosticCode::NewlineInConstant, start, 0);
                self.mode.pop();
                return SyntaxKind::InterpolatedStringEnd;
            }
            Some(_) => {}
        }

        while let Some(c) = self.cursor.peek() {
            match c {
                '"' if verbatim && self.cursor.starts_with("\"\"") => self.cursor.bump_n(2),
                '"' => break,
                '{' if self.cursor.starts_with("{{") => self.cursor.bump_n(2),
                '{' => break,
                '}' if self.cursor.starts_with("}}") => self.cursor.bump_n(2),
                '\\' if !verbatim => {
                    self.lex_escape();
                }
                c if !verbatim && crate::text::is_line_break(c) => break,
                _ => {
                    self.cursor.bump();
                }
            }
        }
        SyntaxKind::InterpolatedStringText
    }

    fn lex_punctuation(&mut self, c: char) -> Option<SyntaxKind> {
        use SyntaxKind::*;

        let cursor = &mut self.cursor;
        cursor.bump();
        let kind = match c {
            '{' => {
                self.mode.open_brace();
                OpenBrace
            }
            '}' => {
                self.mode.close_brace();
                CloseBrace
            }
            '(' => OpenParen,
            ')' => CloseParen,
            '[' => OpenBracket,
            ']' => CloseBracket,
            ';' => Semicolon,
            ',' => Comma,
            '.' => Dot,
            ':' => Colon,
            '~' => Tilde,
            '?' if cursor.eat_str("?=") => QuestionQuestionEquals,
            '?' if cursor.eat('?') => QuestionQuestion,
            '?' => Question,
            '=' => with_equals(cursor, Equals, EqualsEquals),
            '!' => with_equals(cursor, Exclamation, ExclamationEquals),
            '<' if cursor.eat('<') => with_equals(cursor, LessLess, LessLessEquals),
            '<' => with_equals(cursor, Less, LessEquals),
            '>' if cursor.eat('>') => with_equals(cursor, GreaterGreater, GreaterGreaterEquals),
            '>' => with_equals(cursor, Greater, GreaterEquals),
            '+' if cursor.eat('+') => PlusPlus,
            '+' => with_equals(cursor, Plus, PlusEquals),
            '-' if cursor.eat('-') => MinusMinus,
            '-' => with_equals(cursor, Minus, MinusEquals),
            '*' => with_equals(cursor, Asterisk, AsteriskEquals),
            '/' => with_equals(cursor, Slash, SlashEquals),
            '%' => with_equals(cursor, Percent, PercentEquals),
            '^' => with_equals(cursor, Caret, CaretEquals),
            '&' if cursor.eat('&') => AmpersandAmpersand,
            '&' => with_equals(cursor, Ampersand, AmpersandEquals),
            '|' if cursor.eat('|') => BarBar,
            '|' => with_equals(cursor, Bar, BarEquals),
            _ => {
                // not punctuation; put the character back
                let pos = cursor.pos() - c.len_utf8();
                cursor.set_pos(pos);
                return None;
            }
        };
        Some(kind)
    }
}

/// `plain`, or `compound` if followed by `=`.
fn with_equals(cursor: &mut Cursor<'_>, plain: SyntaxKind, compound: SyntaxKind) -> SyntaxKind {
    if cursor.eat('=') {
        compound
    } else {
        plain
    }
}

#[inline]
fn is_identifier_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}
