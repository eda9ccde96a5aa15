use super::Lexer;
use crate::{green::TokenValue, text::is_line_break, DiagnosticCode, SyntaxKind};

impl Lexer<'_> {
    /// Lexes an integer or real literal. The cursor is at a digit or at a `.` followed by a digit.
    pub(super) fn lex_number(&mut self) -> (SyntaxKind, Option<TokenValue>) {
        let start = self.cursor.pos();
        for (prefix, radix) in [("0x", 16), ("0X", 16), ("0b", 2), ("0B", 2)] {
            if self.cursor.eat_str(prefix) {
                let digits_start = self.cursor.pos();
                self.cursor.eat_while(|c| c.is_digit(radix) || c == '_');
                let digits = self.cursor.slice_from(digits_start);
                let value = self.integer_value(start, digits, radix);
                self.eat_integer_suffix();
                return (SyntaxKind::IntegerLiteral, Some(TokenValue::Integer(value)));
            }
        }

        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
        let mut real = false;
        let mut malformed = false;
        if self.cursor.peek() == Some('.') && self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.cursor.bump();
            self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
            real = true;
        }
        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            self.cursor.bump();
            if !self.cursor.eat('+') {
                self.cursor.eat('-');
            }
            if self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_') == 0 {
                self.report(DiagnosticCode::InvalidNumber, start, self.cursor.pos() - start);
                malformed = true;
            }
            real = true;
        }
        let number_end = self.cursor.pos();
        if matches!(self.cursor.peek(), Some('f' | 'F' | 'd' | 'D' | 'm' | 'M')) {
            self.cursor.bump();
            real = true;
        }

        let text = &self.cursor.text()[start..number_end];
        if real {
            let cleaned: String = text.chars().filter(|&c| c != '_').collect();
            let value = match cleaned.parse::<f64>() {
                Ok(value) => value,
                Err(_) => {
                    if !malformed {
                        self.report(DiagnosticCode::InvalidNumber, start, self.cursor.pos() - start);
                    }
                    0.0
                }
            };
            (SyntaxKind::RealLiteral, Some(TokenValue::Real(value.to_bits())))
        } else {
            let value = self.integer_value(start, text, 10);
            self.eat_integer_suffix();
            (SyntaxKind::IntegerLiteral, Some(TokenValue::Integer(value)))
        }
    }

    fn integer_value(&mut self, start: usize, digits: &str, radix: u32) -> u64 {
        let len = self.cursor.pos() - start;
        if digits.is_empty() || digits.ends_with('_') {
            self.report(DiagnosticCode::InvalidNumber, start, len);
            return 0;
        }
        let mut value: u64 = 0;
        for digit in digits.chars().filter_map(|c| c.to_digit(radix)) {
            match value.checked_mul(u64::from(radix)).and_then(|v| v.checked_add(u64::from(digit))) {
                Some(next) => value = next,
                None => {
                    self.report(DiagnosticCode::IntegerOverflow, start, len);
                    return 0;
                }
            }
        }
        value
    }

    fn eat_integer_suffix(&mut self) {
        if self.cursor.eat('u') || self.cursor.eat('U') {
            let _ = self.cursor.eat('l') || self.cursor.eat('L');
        } else if self.cursor.eat('l') || self.cursor.eat('L') {
            let _ = self.cursor.eat('u') || self.cursor.eat('U');
        }
    }

    /// Lexes a regular string literal. Unterminated literals end at the line break.
    pub(super) fn lex_string(&mut self) -> (SyntaxKind, Option<TokenValue>) {
        let start = self.cursor.pos();
        self.cursor.bump();
        let mut value = String::new();
        loop {
            match self.cursor.peek() {
                None => {
                    self.report(DiagnosticCode::UnterminatedString, start, self.cursor.pos() - start);
                    break;
                }
                Some('"') => {
                    self.cursor.bump();
                    break;
                }
                Some('\\') => value.extend(self.lex_escape()),
                Some(c) if is_line_break(c) => {
                    self.report(DiagnosticCode::NewlineInConstant, start, self.cursor.pos() - start);
                    break;
                }
                Some(c) => {
                    self.cursor.bump();
                    value.push(c);
                }
            }
        }
        let value = self.interner.get_or_intern(value);
        (SyntaxKind::StringLiteral, Some(TokenValue::Str(value)))
    }

    /// Lexes `@"..."`, which may span lines and escapes quotes by doubling them.
    pub(super) fn lex_verbatim_string(&mut self) -> (SyntaxKind, Option<TokenValue>) {
        let start = self.cursor.pos();
        self.cursor.eat_str("@\"");
        let mut value = String::new();
        loop {
            match self.cursor.peek() {
                None => {
                    self.report(DiagnosticCode::UnterminatedString, start, self.cursor.pos() - start);
                    break;
                }
                Some('"') if self.cursor.eat_str("\"\"") => value.push('"'),
                Some('"') => {
                    self.cursor.bump();
                    break;
                }
                Some(c) => {
                    self.cursor.bump();
                    value.push(c);
                }
            }
        }
        let value = self.interner.get_or_intern(value);
        (SyntaxKind::StringLiteral, Some(TokenValue::Str(value)))
    }

    pub(super) fn lex_char(&mut self) -> (SyntaxKind, Option<TokenValue>) {
        let start = self.cursor.pos();
        self.cursor.bump();
        let mut value = None;
        let mut count = 0;
        let terminated = loop {
            match self.cursor.peek() {
                None => {
                    self.report(DiagnosticCode::UnterminatedString, start, self.cursor.pos() - start);
                    break false;
                }
                Some('\'') => {
                    self.cursor.bump();
                    break true;
                }
                Some(c) if is_line_break(c) => {
                    self.report(DiagnosticCode::NewlineInConstant, start, self.cursor.pos() - start);
                    break false;
                }
                Some('\\') => {
                    let escaped = self.lex_escape();
                    value = value.or(escaped);
                    count += 1;
                }
                Some(c) => {
                    self.cursor.bump();
                    value = value.or(Some(c));
                    count += 1;
                }
            }
        };
        let len = self.cursor.pos() - start;
        if terminated && count == 0 {
            self.report(DiagnosticCode::EmptyCharLiteral, start, len);
        } else if terminated && count > 1 {
            self.report(DiagnosticCode::TooManyCharsInConstant, start, len);
        }
        (SyntaxKind::CharLiteral, value.map(TokenValue::Char))
    }

    /// Lexes an escape sequence at a `\`. Returns the escaped character, `None` if the sequence is invalid.
    pub(super) fn lex_escape(&mut self) -> Option<char> {
        let start = self.cursor.pos();
        self.cursor.bump();
        let c = match self.cursor.peek() {
            Some(c) if !is_line_break(c) => c,
            _ => {
                self.report(DiagnosticCode::IllegalEscape, start, 1);
                return None;
            }
        };
        self.cursor.bump();
        let escaped = match c {
            '\'' | '"' | '\\' => c,
            '0' => '\0',
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{b}',
            'u' => return self.lex_hex_escape(start, 4, 4),
            'U' => return self.lex_hex_escape(start, 8, 8),
            'x' => return self.lex_hex_escape(start, 1, 4),
            _ => {
                self.report(DiagnosticCode::IllegalEscape, start, self.cursor.pos() - start);
                return None;
            }
        };
        Some(escaped)
    }

    fn lex_hex_escape(&mut self, start: usize, min: usize, max: usize) -> Option<char> {
        let digits_start = self.cursor.pos();
        let mut count = 0;
        while count < max && self.cursor.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            self.cursor.bump();
            count += 1;
        }
        let digits = self.cursor.slice_from(digits_start);
        let escaped = (count >= min)
            .then(|| u32::from_str_radix(digits, 16).ok())
            .flatten()
            .and_then(char::from_u32);
        if escaped.is_none() {
            self.report(DiagnosticCode::IllegalEscape, start, self.cursor.pos() - start);
        }
        escaped
    }
}
