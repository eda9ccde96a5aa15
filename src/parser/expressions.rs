use super::*;

const ASSIGNMENT: u8 = 1;
const CONDITIONAL: u8 = 2;
const COALESCE: u8 = 3;
const UNARY: u8 = 14;

/// Binding power of a binary operator. Higher binds tighter.
fn binary_precedence(kind: SyntaxKind) -> Option<u8> {
    use SyntaxKind::*;
    let precedence = match kind {
        QuestionQuestion => COALESCE,
        BarBar => 4,
        AmpersandAmpersand => 5,
        Bar => 6,
        Caret => 7,
        Ampersand => 8,
        EqualsEquals | ExclamationEquals => 9,
        Less | Greater | LessEquals | GreaterEquals => 10,
        LessLess | GreaterGreater => 11,
        Plus | Minus => 12,
        Asterisk | Slash | Percent => 13,
        _ => return None,
    };
    Some(precedence)
}

fn is_prefix_operator(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    matches!(kind, Plus | Minus | Exclamation | Tilde | PlusPlus | MinusMinus)
}

/// Tokens that may appear inside an expression after its first token.
pub(super) fn continues_expression(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    can_start_expression(kind)
        || binary_precedence(kind).is_some()
        || kind.is_assignment_operator()
        || matches!(kind, Question | Dot | PlusPlus | MinusMinus | OpenBracket)
}

pub(super) fn can_start_expression(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    kind.is_literal()
        || kind.is_predefined_type()
        || is_prefix_operator(kind)
        || matches!(
            kind,
            Identifier | InterpolatedStringStart | ThisKeyword | BaseKeyword | OpenParen | NewKeyword
        )
}

impl<S: TokenSource> Parser<'_, S> {
    pub(super) fn parse_expression(&mut self) {
        self.parse_sub_expression(0);
    }

    /// Precedence climbing: parses an operand, then every operator binding at least as tight as `min_precedence`.
    fn parse_sub_expression(&mut self, min_precedence: u8) {
        if self.too_deep() {
            return;
        }
        self.nested(|p| {
            let lhs = p.builder.checkpoint();
            if is_prefix_operator(p.current()) {
                p.builder.start_node(SyntaxKind::PrefixUnaryExpression);
                p.bump();
                p.parse_sub_expression(UNARY);
                p.builder.finish_node();
            } else {
                p.parse_postfix_expression();
            }

            loop {
                let operator = p.current();
                if operator.is_assignment_operator() {
                    if ASSIGNMENT < min_precedence {
                        break;
                    }
                    if p.too_tall(lhs) {
                        break;
                    }
                    p.builder.start_node_at(lhs, SyntaxKind::AssignmentExpression);
                    p.bump();
                    p.parse_sub_expression(ASSIGNMENT);
                    p.builder.finish_node();
                } else if operator == SyntaxKind::Question {
                    if CONDITIONAL < min_precedence {
                        break;
                    }
                    if p.too_tall(lhs) {
                        break;
                    }
                    p.builder.start_node_at(lhs, SyntaxKind::ConditionalExpression);
                    p.bump();
                    p.parse_expression();
                    p.expect(SyntaxKind::Colon);
                    p.parse_sub_expression(CONDITIONAL);
                    p.builder.finish_node();
                } else if let Some(precedence) = binary_precedence(operator) {
                    if precedence < min_precedence {
                        break;
                    }
                    if p.too_tall(lhs) {
                        break;
                    }
                    p.builder.start_node_at(lhs, SyntaxKind::BinaryExpression);
                    p.bump();
                    // `??` is right associative
                    let rhs = if operator == SyntaxKind::QuestionQuestion { precedence } else { precedence + 1 };
                    p.parse_sub_expression(rhs);
                    p.builder.finish_node();
                } else {
                    break;
                }
            }
        });
    }

    fn parse_postfix_expression(&mut self) {
        let expression = self.builder.checkpoint();
        self.parse_primary_expression();
        loop {
            let current = self.current();
            if !matches!(
                current,
                SyntaxKind::Dot
                    | SyntaxKind::OpenParen
                    | SyntaxKind::OpenBracket
                    | SyntaxKind::PlusPlus
                    | SyntaxKind::MinusMinus
            ) || self.too_tall(expression)
            {
                break;
            }
            match current {
                SyntaxKind::Dot => {
                    self.builder.start_node_at(expression, SyntaxKind::MemberAccessExpression);
                    self.bump();
                    self.parse_simple_name();
                }
                SyntaxKind::OpenParen => {
                    self.builder.start_node_at(expression, SyntaxKind::InvocationExpression);
                    self.parse_argument_list(SyntaxKind::ArgumentList, SyntaxKind::CloseParen);
                }
                SyntaxKind::OpenBracket => {
                    self.builder.start_node_at(expression, SyntaxKind::ElementAccessExpression);
                    self.parse_argument_list(SyntaxKind::BracketedArgumentList, SyntaxKind::CloseBracket);
                }
                SyntaxKind::PlusPlus | SyntaxKind::MinusMinus => {
                    self.builder.start_node_at(expression, SyntaxKind::PostfixUnaryExpression);
                    self.bump();
                }
                _ => break,
            }
            self.builder.finish_node();
        }
    }

    fn parse_primary_expression(&mut self) {
        let current = self.current();
        match current {
            _ if current.is_literal() => self.wrap_token(SyntaxKind::LiteralExpression),
            _ if current.is_predefined_type() => self.wrap_token(SyntaxKind::PredefinedType),
            SyntaxKind::Identifier => self.wrap_token(SyntaxKind::IdentifierName),
            SyntaxKind::ThisKeyword => self.wrap_token(SyntaxKind::ThisExpression),
            SyntaxKind::BaseKeyword => self.wrap_token(SyntaxKind::BaseExpression),
            SyntaxKind::InterpolatedStringStart => self.parse_interpolated_string(),
            SyntaxKind::NewKeyword => self.parse_creation_expression(),
            SyntaxKind::OpenParen if self.nth(1).is_predefined_type() && self.nth(2) == SyntaxKind::CloseParen => {
                self.builder.start_node(SyntaxKind::CastExpression);
                self.bump();
                self.wrap_token(SyntaxKind::PredefinedType);
                self.bump();
                self.parse_sub_expression(UNARY);
                self.builder.finish_node();
            }
            SyntaxKind::OpenParen => {
                self.builder.start_node(SyntaxKind::ParenthesizedExpression);
                self.bump();
                self.parse_expression();
                self.expect(SyntaxKind::CloseParen);
                self.builder.finish_node();
            }
            _ => {
                let diagnostic = self
                    .diagnostic_at_previous(DiagnosticCode::InvalidExpressionTerm)
                    .with_arg(current.describe());
                self.missing_name(diagnostic);
            }
        }
    }

    /// A node of `kind` around the current token.
    fn wrap_token(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind);
        self.bump();
        self.builder.finish_node();
    }

    /// `new Type ArgumentList` or `new Type '[' Expression ']'`.
    fn parse_creation_expression(&mut self) {
        let creation = self.builder.checkpoint();
        self.bump();
        self.parse_type();
        if self.at(SyntaxKind::OpenBracket) {
            self.builder.start_node_at(creation, SyntaxKind::ArrayCreationExpression);
            self.bump();
            self.parse_expression();
            self.expect(SyntaxKind::CloseBracket);
        } else {
            self.builder.start_node_at(creation, SyntaxKind::ObjectCreationExpression);
            if self.at(SyntaxKind::OpenParen) {
                self.parse_argument_list(SyntaxKind::ArgumentList, SyntaxKind::CloseParen);
            } else {
                self.builder.start_node(SyntaxKind::ArgumentList);
                self.missing(SyntaxKind::OpenParen);
                self.missing(SyntaxKind::CloseParen);
                self.builder.finish_node();
            }
        }
        self.builder.finish_node();
    }

    /// An argument list whose opening token is current, closed by `close`.
    fn parse_argument_list(&mut self, kind: SyntaxKind, close: SyntaxKind) {
        self.builder.start_node(kind);
        self.bump();
        if !self.at(close) {
            loop {
                self.builder.start_node(SyntaxKind::Argument);
                self.parse_expression();
                self.builder.finish_node();
                if !self.at(SyntaxKind::Comma) {
                    break;
                }
                self.bump();
            }
        }
        self.expect(close);
        self.builder.finish_node();
    }

    fn parse_interpolated_string(&mut self) {
        self.builder.start_node(SyntaxKind::InterpolatedStringExpression);
        self.bump();
        loop {
            match self.current() {
                SyntaxKind::InterpolatedStringText => self.bump(),
                SyntaxKind::OpenBrace => self.parse_interpolation(),
                SyntaxKind::InterpolatedStringEnd => {
                    self.bump();
                    break;
                }
                _ => {
                    self.missing(SyntaxKind::InterpolatedStringEnd);
                    break;
                }
            }
        }
        self.builder.finish_node();
    }

    /// `{ Expression }` inside an interpolated string. Anything between the expression and the closing brace, such
    /// as a format specifier, is skipped.
    fn parse_interpolation(&mut self) {
        self.builder.start_node(SyntaxKind::Interpolation);
        self.bump();
        self.parse_expression();
        while !self.at(SyntaxKind::CloseBrace) && !self.at(SyntaxKind::EndOfFile) {
            self.skip();
        }
        self.expect(SyntaxKind::CloseBrace);
        self.builder.finish_node();
    }
}
