use super::*;

impl<S: TokenSource> Parser<'_, S> {
    pub(super) fn parse_top_level_element(&mut self) {
        match self.current() {
            SyntaxKind::UsingKeyword => self.parse_using_directive(),
            SyntaxKind::NamespaceKeyword => self.parse_namespace_declaration(),
            _ if self.at_type_declaration() => self.parse_type_declaration(),
            kind if can_start_statement(kind) => {
                self.builder.start_node(SyntaxKind::GlobalStatement);
                self.parse_statement();
                self.builder.finish_node();
            }
            _ => self.skip(),
        }
    }

    fn parse_using_directive(&mut self) {
        self.builder.start_node(SyntaxKind::UsingDirective);
        self.bump();
        self.parse_name();
        self.expect(SyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    fn parse_namespace_declaration(&mut self) {
        if self.too_deep() {
            self.skip();
            return;
        }
        self.builder.start_node(SyntaxKind::NamespaceDeclaration);
        self.bump();
        self.parse_name();
        self.expect(SyntaxKind::OpenBrace);
        self.nested(|p| {
            while !p.at(SyntaxKind::CloseBrace) && !p.at(SyntaxKind::EndOfFile) {
                if p.try_reuse(is_namespace_member) {
                    continue;
                }
                let before = p.position;
                match p.current() {
                    SyntaxKind::UsingKeyword => p.parse_using_directive(),
                    SyntaxKind::NamespaceKeyword => p.parse_namespace_declaration(),
                    _ if p.at_type_declaration() => p.parse_type_declaration(),
                    _ => p.skip(),
                }
                if p.position == before {
                    p.skip();
                }
            }
        });
        self.expect(SyntaxKind::CloseBrace);
        self.builder.finish_node();
    }

    /// Whether modifiers followed by `class`, `struct` or `interface` come next.
    pub(super) fn at_type_declaration(&mut self) -> bool {
        let mut n = 0;
        while self.nth(n).is_modifier() {
            n += 1;
        }
        self.nth(n).is_type_declaration_keyword()
    }

    pub(super) fn parse_type_declaration(&mut self) {
        if self.too_deep() {
            self.skip();
            return;
        }
        let mut n = 0;
        while self.nth(n).is_modifier() {
            n += 1;
        }
        let kind = match self.nth(n) {
            SyntaxKind::StructKeyword => SyntaxKind::StructDeclaration,
            SyntaxKind::InterfaceKeyword => SyntaxKind::InterfaceDeclaration,
            _ => SyntaxKind::ClassDeclaration,
        };

        self.builder.start_node(kind);
        self.parse_modifiers();
        self.bump();
        self.expect(SyntaxKind::Identifier);
        if self.at(SyntaxKind::Colon) {
            self.parse_base_list();
        } else {
            self.builder.absent();
        }
        self.expect(SyntaxKind::OpenBrace);
        self.nested(|p| p.parse_members());
        self.expect(SyntaxKind::CloseBrace);
        self.builder.finish_node();
    }

    fn parse_members(&mut self) {
        loop {
            match self.current() {
                SyntaxKind::CloseBrace | SyntaxKind::EndOfFile => break,
                // these close the type; the enclosing namespace or compilation unit picks them up
                SyntaxKind::NamespaceKeyword | SyntaxKind::UsingKeyword => break,
                _ => {}
            }
            if self.try_reuse(SyntaxKind::is_member_declaration) {
                continue;
            }
            let before = self.position;
            let kind = self.current();
            if kind.is_modifier() || kind.is_type_declaration_keyword() || can_start_type(kind) {
                self.parse_member();
            }
            if self.position == before {
                self.skip();
            }
        }
    }

    fn parse_modifiers(&mut self) {
        if !self.current().is_modifier() {
            self.builder.absent();
            return;
        }
        self.builder.start_node(SyntaxKind::ModifierList);
        while self.current().is_modifier() {
            self.bump();
        }
        self.builder.finish_node();
    }

    fn parse_base_list(&mut self) {
        self.builder.start_node(SyntaxKind::BaseList);
        self.bump();
        self.parse_type();
        while self.at(SyntaxKind::Comma) {
            self.bump();
            self.parse_type();
        }
        self.builder.finish_node();
    }

    fn parse_member(&mut self) {
        if self.at_type_declaration() {
            self.parse_type_declaration();
            return;
        }

        let member = self.builder.checkpoint();
        let mut n = 0;
        while self.nth(n).is_modifier() {
            n += 1;
        }
        if self.nth(n) == SyntaxKind::Identifier && self.nth(n + 1) == SyntaxKind::OpenParen {
            self.builder.start_node(SyntaxKind::ConstructorDeclaration);
            self.parse_modifiers();
            self.bump();
            self.parse_parameter_list();
            self.parse_body();
            self.builder.finish_node();
            return;
        }

        self.parse_modifiers();
        let declaration = self.builder.checkpoint();
        self.parse_type();
        if self.at(SyntaxKind::Identifier) && self.nth(1) == SyntaxKind::OpenParen {
            self.builder.start_node_at(member, SyntaxKind::MethodDeclaration);
            self.bump();
            self.parse_parameter_list();
            self.parse_body();
            self.builder.finish_node();
        } else {
            self.builder.start_node_at(member, SyntaxKind::FieldDeclaration);
            self.builder.start_node_at(declaration, SyntaxKind::VariableDeclaration);
            self.parse_variable_declarators();
            self.builder.finish_node();
            self.expect(SyntaxKind::Semicolon);
            self.builder.finish_node();
        }
    }

    /// A block, or `;` for a body-less member.
    fn parse_body(&mut self) {
        if self.at(SyntaxKind::OpenBrace) {
            self.parse_block();
        } else {
            self.expect(SyntaxKind::Semicolon);
        }
    }

    fn parse_parameter_list(&mut self) {
        self.builder.start_node(SyntaxKind::ParameterList);
        self.expect(SyntaxKind::OpenParen);
        if !self.at(SyntaxKind::CloseParen) && can_start_type(self.current()) {
            loop {
                self.builder.start_node(SyntaxKind::Parameter);
                self.parse_type();
                self.expect(SyntaxKind::Identifier);
                self.builder.finish_node();
                if !self.at(SyntaxKind::Comma) {
                    break;
                }
                self.bump();
            }
        }
        self.expect(SyntaxKind::CloseParen);
        self.builder.finish_node();
    }

    /// `VariableDeclarator (',' VariableDeclarator)*`, after the type of a field or local declaration.
    pub(super) fn parse_variable_declarators(&mut self) {
        loop {
            self.builder.start_node(SyntaxKind::VariableDeclarator);
            self.expect(SyntaxKind::Identifier);
            if self.at(SyntaxKind::Equals) {
                self.builder.start_node(SyntaxKind::EqualsValueClause);
                self.bump();
                self.parse_expression();
                self.builder.finish_node();
            } else {
                self.builder.absent();
            }
            self.builder.finish_node();
            if !self.at(SyntaxKind::Comma) {
                break;
            }
            self.bump();
        }
    }

    /// `Ident ('.' Ident)*`, left nested.
    pub(super) fn parse_name(&mut self) {
        let name = self.builder.checkpoint();
        self.parse_simple_name();
        while self.at(SyntaxKind::Dot) && self.nth(1) == SyntaxKind::Identifier {
            if self.too_tall(name) {
                break;
            }
            self.builder.start_node_at(name, SyntaxKind::QualifiedName);
            self.bump();
            self.parse_simple_name();
            self.builder.finish_node();
        }
    }

    pub(super) fn parse_simple_name(&mut self) {
        self.builder.start_node(SyntaxKind::IdentifierName);
        self.expect(SyntaxKind::Identifier);
        self.builder.finish_node();
    }

    pub(super) fn parse_type(&mut self) {
        let ty = self.builder.checkpoint();
        let current = self.current();
        if current.is_predefined_type() {
            self.builder.start_node(SyntaxKind::PredefinedType);
            self.bump();
            self.builder.finish_node();
        } else {
            self.parse_name();
        }

        if self.at_rank_specifier(0) {
            self.builder.start_node_at(ty, SyntaxKind::ArrayType);
            while self.at_rank_specifier(0) {
                self.builder.start_node(SyntaxKind::ArrayRankSpecifier);
                self.bump();
                while self.at(SyntaxKind::Comma) {
                    self.bump();
                }
                self.expect(SyntaxKind::CloseBracket);
                self.builder.finish_node();
            }
            self.builder.finish_node();
        }

        if self.at(SyntaxKind::Question)
            && self.nth(1) == SyntaxKind::Identifier
            && matches!(
                self.nth(2),
                SyntaxKind::Equals
                    | SyntaxKind::Semicolon
                    | SyntaxKind::Comma
                    | SyntaxKind::CloseParen
                    | SyntaxKind::OpenParen
                    | SyntaxKind::InKeyword
            )
        {
            self.builder.start_node_at(ty, SyntaxKind::NullableType);
            self.bump();
            self.builder.finish_node();
        }
    }

    /// `[` followed by `,`s and `]`, starting `n` tokens ahead.
    fn at_rank_specifier(&mut self, n: usize) -> bool {
        if self.nth(n) != SyntaxKind::OpenBracket {
            return false;
        }
        let mut m = n + 1;
        while self.nth(m) == SyntaxKind::Comma {
            m += 1;
        }
        self.nth(m) == SyntaxKind::CloseBracket
    }

    /// Scans a type starting `n` tokens ahead without consuming anything. Returns the index of the token after it.
    pub(super) fn scan_type(&mut self, mut n: usize) -> Option<usize> {
        let first = self.nth(n);
        if first.is_predefined_type() {
            n += 1;
        } else if first == SyntaxKind::Identifier {
            n += 1;
            while self.nth(n) == SyntaxKind::Dot && self.nth(n + 1) == SyntaxKind::Identifier {
                n += 2;
            }
        } else {
            return None;
        }
        while self.at_rank_specifier(n) {
            n += 1;
            while self.nth(n) == SyntaxKind::Comma {
                n += 1;
            }
            n += 1;
        }
        if self.nth(n) == SyntaxKind::Question
            && self.nth(n + 1) == SyntaxKind::Identifier
            && matches!(
                self.nth(n + 2),
                SyntaxKind::Equals | SyntaxKind::Semicolon | SyntaxKind::Comma
            )
        {
            n += 1;
        }
        Some(n)
    }
}

pub(super) fn can_start_type(kind: SyntaxKind) -> bool {
    kind.is_predefined_type() || kind == SyntaxKind::Identifier
}

pub(super) fn can_start_statement(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    matches!(
        kind,
        OpenBrace
            | Semicolon
            | IfKeyword
            | WhileKeyword
            | DoKeyword
            | ForKeyword
            | ForeachKeyword
            | ReturnKeyword
            | BreakKeyword
            | ContinueKeyword
            | ThrowKeyword
    ) || expressions::can_start_expression(kind)
}
