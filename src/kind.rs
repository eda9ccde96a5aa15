//! The closed set of node, token and trivia kinds of the grammar.

macro_rules! syntax_kinds {
    (
        tokens { $($tok:ident = $text:literal,)* }
        keywords { $($kw:ident = $kw_text:literal,)* }
        other { $($other:ident,)* }
    ) => {
        /// Kind of a node, token or trivia piece.
        ///
        /// Tokens come first, then keywords, then everything with variable text and all node kinds.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u16)]
        pub enum SyntaxKind {
            $($tok,)*
            $($kw,)*
            $($other,)*
        }

        impl SyntaxKind {
            /// The text every token of this kind has, if it is fixed.
            pub fn static_text(self) -> Option<&'static str> {
                match self {
                    $(SyntaxKind::$tok => Some($text),)*
                    $(SyntaxKind::$kw => Some($kw_text),)*
                    _ => None,
                }
            }

            /// Looks up the keyword spelled `text`.
            pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
                match text {
                    $($kw_text => Some(SyntaxKind::$kw),)*
                    _ => None,
                }
            }

            pub fn is_keyword(self) -> bool {
                matches!(self, $(SyntaxKind::$kw)|*)
            }

            pub fn is_punctuation(self) -> bool {
                matches!(self, $(SyntaxKind::$tok)|*)
            }
        }
    };
}

syntax_kinds! {
    tokens {
        OpenBrace = "{",
        CloseBrace = "}",
        OpenParen = "(",
        CloseParen = ")",
        OpenBracket = "[",
        CloseBracket = "]",
        Semicolon = ";",
        Comma = ",",
        Dot = ".",
        Colon = ":",
        Question = "?",
        QuestionQuestion = "??",
        QuestionQuestionEquals = "??=",
        Equals = "=",
        EqualsEquals = "==",
        Exclamation = "!",
        ExclamationEquals = "!=",
        Less = "<",
        LessEquals = "<=",
        LessLess = "<<",
        LessLessEquals = "<<=",
        Greater = ">",
        GreaterEquals = ">=",
        GreaterGreater = ">>",
        GreaterGreaterEquals = ">>=",
        Plus = "+",
        PlusEquals = "+=",
        PlusPlus = "++",
        Minus = "-",
        MinusEquals = "-=",
        MinusMinus = "--",
        Asterisk = "*",
        AsteriskEquals = "*=",
        Slash = "/",
        SlashEquals = "/=",
        Percent = "%",
        PercentEquals = "%=",
        Ampersand = "&",
        AmpersandEquals = "&=",
        AmpersandAmpersand = "&&",
        Bar = "|",
        BarEquals = "|=",
        BarBar = "||",
        Caret = "^",
        CaretEquals = "^=",
        Tilde = "~",
    }
    keywords {
        UsingKeyword = "using",
        NamespaceKeyword = "namespace",
        ClassKeyword = "class",
        StructKeyword = "struct",
        InterfaceKeyword = "interface",
        PublicKeyword = "public",
        PrivateKeyword = "private",
        ProtectedKeyword = "protected",
        InternalKeyword = "internal",
        StaticKeyword = "static",
        ReadonlyKeyword = "readonly",
        ConstKeyword = "const",
        AbstractKeyword = "abstract",
        VirtualKeyword = "virtual",
        OverrideKeyword = "override",
        SealedKeyword = "sealed",
        NewKeyword = "new",
        ThisKeyword = "this",
        BaseKeyword = "base",
        IfKeyword = "if",
        ElseKeyword = "else",
        WhileKeyword = "while",
        DoKeyword = "do",
        ForKeyword = "for",
        ForeachKeyword = "foreach",
        InKeyword = "in",
        ReturnKeyword = "return",
        BreakKeyword = "break",
        ContinueKeyword = "continue",
        ThrowKeyword = "throw",
        TrueKeyword = "true",
        FalseKeyword = "false",
        NullKeyword = "null",
        VoidKeyword = "void",
        BoolKeyword = "bool",
        ByteKeyword = "byte",
        SByteKeyword = "sbyte",
        ShortKeyword = "short",
        UShortKeyword = "ushort",
        IntKeyword = "int",
        UIntKeyword = "uint",
        LongKeyword = "long",
        ULongKeyword = "ulong",
        FloatKeyword = "float",
        DoubleKeyword = "double",
        DecimalKeyword = "decimal",
        CharKeyword = "char",
        StringKeyword = "string",
        ObjectKeyword = "object",
    }
    other {
        // tokens with variable text
        Identifier,
        IntegerLiteral,
        RealLiteral,
        StringLiteral,
        CharLiteral,
        InterpolatedStringStart,
        InterpolatedStringText,
        InterpolatedStringEnd,
        BadToken,
        EndOfFile,

        // trivia
        Whitespace,
        EndOfLine,
        SingleLineComment,
        MultiLineComment,
        DocumentationComment,
        PreprocessorDirective,
        SkippedTokens,

        // declarations
        CompilationUnit,
        UsingDirective,
        NamespaceDeclaration,
        ClassDeclaration,
        StructDeclaration,
        InterfaceDeclaration,
        ModifierList,
        BaseList,
        FieldDeclaration,
        MethodDeclaration,
        ConstructorDeclaration,
        ParameterList,
        Parameter,
        VariableDeclaration,
        VariableDeclarator,
        EqualsValueClause,
        GlobalStatement,

        // statements
        Block,
        LocalDeclarationStatement,
        ExpressionStatement,
        IfStatement,
        ElseClause,
        WhileStatement,
        DoStatement,
        ForStatement,
        ForeachStatement,
        ReturnStatement,
        BreakStatement,
        ContinueStatement,
        ThrowStatement,
        EmptyStatement,

        // types
        PredefinedType,
        IdentifierName,
        QualifiedName,
        ArrayType,
        ArrayRankSpecifier,
        NullableType,

        // expressions
        LiteralExpression,
        InterpolatedStringExpression,
        Interpolation,
        ThisExpression,
        BaseExpression,
        ParenthesizedExpression,
        CastExpression,
        ObjectCreationExpression,
        ArrayCreationExpression,
        MemberAccessExpression,
        InvocationExpression,
        ElementAccessExpression,
        ArgumentList,
        BracketedArgumentList,
        Argument,
        PrefixUnaryExpression,
        PostfixUnaryExpression,
        BinaryExpression,
        AssignmentExpression,
        ConditionalExpression,
    }
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace
                | SyntaxKind::EndOfLine
                | SyntaxKind::SingleLineComment
                | SyntaxKind::MultiLineComment
                | SyntaxKind::DocumentationComment
                | SyntaxKind::PreprocessorDirective
                | SyntaxKind::SkippedTokens
        )
    }

    pub fn is_token(self) -> bool {
        self < SyntaxKind::Whitespace
    }

    pub fn is_node(self) -> bool {
        self >= SyntaxKind::CompilationUnit
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::IntegerLiteral
                | SyntaxKind::RealLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::CharLiteral
                | SyntaxKind::TrueKeyword
                | SyntaxKind::FalseKeyword
                | SyntaxKind::NullKeyword
        )
    }

    /// Keywords naming a built-in type, including `void`.
    pub fn is_predefined_type(self) -> bool {
        (SyntaxKind::VoidKeyword..=SyntaxKind::ObjectKeyword).contains(&self)
    }

    pub fn is_modifier(self) -> bool {
        (SyntaxKind::PublicKeyword..=SyntaxKind::SealedKeyword).contains(&self)
    }

    pub fn is_type_declaration_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::ClassKeyword | SyntaxKind::StructKeyword | SyntaxKind::InterfaceKeyword
        )
    }

    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::Equals
                | SyntaxKind::PlusEquals
                | SyntaxKind::MinusEquals
                | SyntaxKind::AsteriskEquals
                | SyntaxKind::SlashEquals
                | SyntaxKind::PercentEquals
                | SyntaxKind::AmpersandEquals
                | SyntaxKind::BarEquals
                | SyntaxKind::CaretEquals
                | SyntaxKind::LessLessEquals
                | SyntaxKind::GreaterGreaterEquals
                | SyntaxKind::QuestionQuestionEquals
        )
    }

    pub fn is_statement(self) -> bool {
        (SyntaxKind::Block..=SyntaxKind::EmptyStatement).contains(&self) && self != SyntaxKind::ElseClause
    }

    pub fn is_member_declaration(self) -> bool {
        matches!(
            self,
            SyntaxKind::ClassDeclaration
                | SyntaxKind::StructDeclaration
                | SyntaxKind::InterfaceDeclaration
                | SyntaxKind::FieldDeclaration
                | SyntaxKind::MethodDeclaration
                | SyntaxKind::ConstructorDeclaration
        )
    }

    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            SyntaxKind::ClassDeclaration | SyntaxKind::StructDeclaration | SyntaxKind::InterfaceDeclaration
        )
    }

    /// Short human readable form used in diagnostics, e.g. `'}'` or `identifier`.
    pub fn describe(self) -> &'static str {
        match self.static_text() {
            Some(text) => text,
            None => match self {
                SyntaxKind::Identifier => "identifier",
                SyntaxKind::IntegerLiteral | SyntaxKind::RealLiteral => "number",
                SyntaxKind::StringLiteral => "string",
                SyntaxKind::CharLiteral => "character",
                SyntaxKind::InterpolatedStringEnd => "\"",
                SyntaxKind::EndOfFile => "end-of-file",
                _ => "token",
            },
        }
    }
}

impl From<SyntaxKind> for u16 {
    #[inline]
    fn from(kind: SyntaxKind) -> u16 {
        kind as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip() {
        for kind in [SyntaxKind::ClassKeyword, SyntaxKind::ForeachKeyword, SyntaxKind::ObjectKeyword] {
            let text = kind.static_text().unwrap();
            assert_eq!(SyntaxKind::from_keyword(text), Some(kind));
            assert!(kind.is_keyword());
        }
        assert_eq!(SyntaxKind::from_keyword("var"), None);
    }

    #[test]
    fn categories() {
        assert!(SyntaxKind::IntKeyword.is_predefined_type());
        assert!(SyntaxKind::VoidKeyword.is_predefined_type());
        assert!(!SyntaxKind::NullKeyword.is_predefined_type());
        assert!(SyntaxKind::StaticKeyword.is_modifier());
        assert!(!SyntaxKind::NewKeyword.is_modifier());
        assert!(SyntaxKind::EndOfFile.is_token());
        assert!(!SyntaxKind::Whitespace.is_token());
        assert!(SyntaxKind::Whitespace.is_trivia());
        assert!(SyntaxKind::ReturnStatement.is_statement());
        assert!(!SyntaxKind::ElseClause.is_statement());
        assert!(SyntaxKind::ConditionalExpression.is_node());
        assert_eq!(SyntaxKind::Semicolon.static_text(), Some(";"));
        assert_eq!(SyntaxKind::Identifier.static_text(), None);
    }
}
