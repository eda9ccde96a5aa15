use super::{declarations::can_start_statement, *};

impl<S: TokenSource> Parser<'_, S> {
    pub(super) fn parse_statement(&mut self) {
        if self.too_deep() {
            if !self.at(SyntaxKind::CloseBrace) {
                self.skip();
            }
            return;
        }
        self.nested(|p| match p.current() {
            SyntaxKind::OpenBrace => p.parse_block(),
            SyntaxKind::Semicolon => {
                p.builder.start_node(SyntaxKind::EmptyStatement);
                p.bump();
                p.builder.finish_node();
            }
            SyntaxKind::IfKeyword => p.parse_if_statement(),
            SyntaxKind::WhileKeyword => p.parse_while_statement(),
            SyntaxKind::DoKeyword => p.parse_do_statement(),
            SyntaxKind::ForKeyword => p.parse_for_statement(),
            SyntaxKind::ForeachKeyword => p.parse_foreach_statement(),
            SyntaxKind::ReturnKeyword => p.parse_jump_statement(SyntaxKind::ReturnStatement, true),
            SyntaxKind::ThrowKeyword => p.parse_jump_statement(SyntaxKind::ThrowStatement, true),
            SyntaxKind::BreakKeyword => p.parse_jump_statement(SyntaxKind::BreakStatement, false),
            SyntaxKind::ContinueKeyword => p.parse_jump_statement(SyntaxKind::ContinueStatement, false),
            _ if p.at_local_declaration() => {
                p.builder.start_node(SyntaxKind::LocalDeclarationStatement);
                p.parse_variable_declaration();
                p.expect(SyntaxKind::Semicolon);
                p.builder.finish_node();
            }
            _ => {
                p.builder.start_node(SyntaxKind::ExpressionStatement);
                p.parse_expression();
                p.expect(SyntaxKind::Semicolon);
                p.builder.finish_node();
            }
        });
    }

    /// `{ Statement* }`. Ends early in front of tokens that can only start a member or a type.
    pub(super) fn parse_block(&mut self) {
        self.builder.start_node(SyntaxKind::Block);
        self.expect(SyntaxKind::OpenBrace);
        loop {
            let current = self.current();
            if matches!(current, SyntaxKind::CloseBrace | SyntaxKind::EndOfFile) || ends_block(current) {
                break;
            }
            if self.try_reuse(SyntaxKind::is_statement) {
                continue;
            }
            let before = self.position;
            if can_start_statement(current) {
                self.parse_statement();
            }
            if self.position == before {
                self.skip();
            }
        }
        self.expect(SyntaxKind::CloseBrace);
        self.builder.finish_node();
    }

    /// An embedded statement, such as the body of an `if`.
    fn parse_embedded_statement(&mut self) {
        if self.try_reuse(SyntaxKind::is_statement) {
            return;
        }
        if can_start_statement(self.current()) {
            self.parse_statement();
        } else {
            // an expression statement made of missing tokens keeps the production intact
            self.builder.start_node(SyntaxKind::ExpressionStatement);
            self.parse_expression();
            self.expect(SyntaxKind::Semicolon);
            self.builder.finish_node();
        }
    }

    /// Whether a local declaration `Type Ident ...` comes next, as opposed to an expression statement.
    fn at_local_declaration(&mut self) -> bool {
        match self.scan_type(0) {
            Some(n) => self.nth(n) == SyntaxKind::Identifier,
            None => false,
        }
    }

    fn parse_variable_declaration(&mut self) {
        self.builder.start_node(SyntaxKind::VariableDeclaration);
        self.parse_type();
        self.parse_variable_declarators();
        self.builder.finish_node();
    }

    /// `'(' Expression ')'` of a condition.
    fn parse_condition(&mut self) {
        self.expect(SyntaxKind::OpenParen);
        self.parse_expression();
        self.expect(SyntaxKind::CloseParen);
    }

    fn parse_if_statement(&mut self) {
        self.builder.start_node(SyntaxKind::IfStatement);
        self.bump();
        self.parse_condition();
        self.parse_embedded_statement();
        if self.at(SyntaxKind::ElseKeyword) {
            self.builder.start_node(SyntaxKind::ElseClause);
            self.bump();
            self.parse_embedded_statement();
            self.builder.finish_node();
        } else {
            self.builder.absent();
        }
        self.builder.finish_node();
    }

    fn parse_while_statement(&mut self) {
        self.builder.start_node(SyntaxKind::WhileStatement);
        self.bump();
        self.parse_condition();
        self.parse_embedded_statement();
        self.builder.finish_node();
    }

    fn parse_do_statement(&mut self) {
        self.builder.start_node(SyntaxKind::DoStatement);
        self.bump();
        self.parse_embedded_statement();
        self.expect(SyntaxKind::WhileKeyword);
        self.parse_condition();
        self.expect(SyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    fn parse_for_statement(&mut self) {
        self.builder.start_node(SyntaxKind::ForStatement);
        self.bump();
        self.expect(SyntaxKind::OpenParen);

        if self.at(SyntaxKind::Semicolon) {
            self.builder.absent();
        } else if self.at_local_declaration() {
            self.parse_variable_declaration();
        } else {
            self.parse_expression();
        }
        self.expect(SyntaxKind::Semicolon);

        if self.at(SyntaxKind::Semicolon) {
            self.builder.absent();
        } else {
            self.parse_expression();
        }
        self.expect(SyntaxKind::Semicolon);

        if self.at(SyntaxKind::CloseParen) {
            self.builder.absent();
        } else {
            loop {
                self.parse_expression();
                if !self.at(SyntaxKind::Comma) {
                    break;
                }
                self.bump();
            }
        }
        self.expect(SyntaxKind::CloseParen);
        self.parse_embedded_statement();
        self.builder.finish_node();
    }

    fn parse_foreach_statement(&mut self) {
        self.builder.start_node(SyntaxKind::ForeachStatement);
        self.bump();
        self.expect(SyntaxKind::OpenParen);
        self.parse_type();
        self.expect(SyntaxKind::Identifier);
        self.expect(SyntaxKind::InKeyword);
        self.parse_expression();
        self.expect(SyntaxKind::CloseParen);
        self.parse_embedded_statement();
        self.builder.finish_node();
    }

    /// `return` and `throw` take an optional expression, `break` and `continue` none.
    fn parse_jump_statement(&mut self, kind: SyntaxKind, has_expression: bool) {
        self.builder.start_node(kind);
        self.bump();
        if has_expression {
            if expressions::can_start_expression(self.current()) {
                self.parse_expression();
            } else {
                self.builder.absent();
            }
        }
        self.expect(SyntaxKind::Semicolon);
        self.builder.finish_node();
    }
}

/// Tokens that can only start a member, a type or a namespace element.
fn ends_block(kind: SyntaxKind) -> bool {
    kind.is_modifier()
        || kind.is_type_declaration_keyword()
        || matches!(kind, SyntaxKind::NamespaceKeyword | SyntaxKind::UsingKeyword)
}
