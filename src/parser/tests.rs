use super::*;
use text_size::TextRange;

use crate::{green::new_interner, NodeOrToken, SyntaxNode};

fn parse_with(text: &str, options: &ParseOptions) -> SyntaxNode {
    let interner = new_interner();
    let parsed = parse(Lexer::new(text, &interner), options);
    assert!(parsed.root.verify_widths());
    let root = SyntaxNode::new_root(parsed.root, interner);
    assert_eq!(root.full_text(), text);
    root
}

fn parse_text(text: &str) -> SyntaxNode {
    parse_with(text, &ParseOptions::default())
}

/// Node kinds in s-expression form, tokens left out.
fn shape(node: &SyntaxNode) -> String {
    let children: Vec<_> = node.children().map(|child| shape(&child)).collect();
    if children.is_empty() {
        format!("{:?}", node.kind())
    } else {
        format!("{:?}({})", node.kind(), children.join(" "))
    }
}

/// Shape of the single statement of a one-statement program.
fn statement(text: &str) -> String {
    let root = parse_text(text);
    let global = root.first_child().unwrap();
    assert_eq!(global.kind(), SyntaxKind::GlobalStatement);
    shape(&global.first_child().unwrap())
}

fn codes(node: &SyntaxNode) -> Vec<DiagnosticCode> {
    node.diagnostics().into_iter().map(|diagnostic| diagnostic.code).collect()
}

#[test]
fn empty_input() {
    let root = parse_text("");
    assert_eq!(root.kind(), SyntaxKind::CompilationUnit);
    let children: Vec<_> = root.children_with_tokens().map(|child| child.kind()).collect();
    assert_eq!(children, vec![SyntaxKind::EndOfFile]);
    assert!(root.diagnostics().is_empty());
}

#[test]
fn declarations() {
    let root = parse_text(
        "using System.Text;\nnamespace N.M {\n  public static class C : B, I {\n    C() { }\n    int f, g = 1;\n    \
         void M(int a, string[] b);\n    struct S { }\n  }\n}\n",
    );
    assert!(root.diagnostics().is_empty(), "{:?}", root.diagnostics());
    assert_eq!(
        shape(&root),
        "CompilationUnit(UsingDirective(QualifiedName(IdentifierName IdentifierName)) \
         NamespaceDeclaration(QualifiedName(IdentifierName IdentifierName) \
         ClassDeclaration(ModifierList BaseList(IdentifierName IdentifierName) \
         ConstructorDeclaration(ParameterList Block) \
         FieldDeclaration(VariableDeclaration(PredefinedType VariableDeclarator \
         VariableDeclarator(EqualsValueClause(LiteralExpression)))) \
         MethodDeclaration(PredefinedType ParameterList(Parameter(PredefinedType) \
         Parameter(ArrayType(PredefinedType ArrayRankSpecifier)))) \
         StructDeclaration)))"
    );
}

#[test]
fn precedence() {
    assert_eq!(
        statement("x = a + b * c;"),
        "ExpressionStatement(AssignmentExpression(IdentifierName BinaryExpression(IdentifierName \
         BinaryExpression(IdentifierName IdentifierName))))"
    );
    assert_eq!(
        statement("a - b - c;"),
        "ExpressionStatement(BinaryExpression(BinaryExpression(IdentifierName IdentifierName) IdentifierName))"
    );
    assert_eq!(
        statement("a ?? b ?? c;"),
        "ExpressionStatement(BinaryExpression(IdentifierName BinaryExpression(IdentifierName IdentifierName)))"
    );
    assert_eq!(
        statement("a = b ? c : d;"),
        "ExpressionStatement(AssignmentExpression(IdentifierName ConditionalExpression(IdentifierName \
         IdentifierName IdentifierName)))"
    );
    assert_eq!(
        statement("-a.b(c)[0]++;"),
        "ExpressionStatement(PrefixUnaryExpression(PostfixUnaryExpression(ElementAccessExpression(\
         InvocationExpression(MemberAccessExpression(IdentifierName IdentifierName) ArgumentList(Argument(\
         IdentifierName))) BracketedArgumentList(Argument(LiteralExpression))))))"
    );
}

#[test]
fn cast_or_parenthesized() {
    assert_eq!(
        statement("(int)x;"),
        "ExpressionStatement(CastExpression(PredefinedType IdentifierName))"
    );
    assert_eq!(
        statement("(x) + y;"),
        "ExpressionStatement(BinaryExpression(ParenthesizedExpression(IdentifierName) IdentifierName))"
    );
    assert_eq!(
        statement("(int.MaxValue);"),
        "ExpressionStatement(ParenthesizedExpression(MemberAccessExpression(PredefinedType IdentifierName)))"
    );
}

#[test]
fn declaration_or_expression() {
    assert_eq!(
        statement("a b;"),
        "LocalDeclarationStatement(VariableDeclaration(IdentifierName VariableDeclarator))"
    );
    assert_eq!(statement("a = b;"), "ExpressionStatement(AssignmentExpression(IdentifierName IdentifierName))");
    assert_eq!(
        statement("int? x = null;"),
        "LocalDeclarationStatement(VariableDeclaration(NullableType(PredefinedType) \
         VariableDeclarator(EqualsValueClause(LiteralExpression))))"
    );
    assert_eq!(
        statement("int[] a = new int[3];"),
        "LocalDeclarationStatement(VariableDeclaration(ArrayType(PredefinedType ArrayRankSpecifier) \
         VariableDeclarator(EqualsValueClause(ArrayCreationExpression(PredefinedType LiteralExpression)))))"
    );
    assert_eq!(
        statement("x = a ? b : c;"),
        "ExpressionStatement(AssignmentExpression(IdentifierName ConditionalExpression(IdentifierName \
         IdentifierName IdentifierName)))"
    );
}

#[test]
fn statements() {
    assert_eq!(
        statement("if (a) b(); else { }"),
        "IfStatement(IdentifierName ExpressionStatement(InvocationExpression(IdentifierName ArgumentList)) \
         ElseClause(Block))"
    );
    assert_eq!(
        statement("for (int i = 0; i < n; i++) ;"),
        "ForStatement(VariableDeclaration(PredefinedType VariableDeclarator(EqualsValueClause(LiteralExpression))) \
         BinaryExpression(IdentifierName IdentifierName) PostfixUnaryExpression(IdentifierName) EmptyStatement)"
    );
    assert_eq!(
        statement("foreach (var x in xs) continue;"),
        "ForeachStatement(IdentifierName IdentifierName ContinueStatement)"
    );
    assert_eq!(
        statement("do break; while (true);"),
        "DoStatement(BreakStatement LiteralExpression)"
    );
    assert_eq!(statement("return;"), "ReturnStatement");
    assert_eq!(
        statement("throw new E();"),
        "ThrowStatement(ObjectCreationExpression(IdentifierName ArgumentList))"
    );
}

#[test]
fn optional_parts_are_absent_slots() {
    let root = parse_text("if (a) b;");
    let statement = root.first_child().and_then(|global| global.first_child()).unwrap();
    assert_eq!(statement.kind(), SyntaxKind::IfStatement);
    assert_eq!(statement.slot_count(), 6);
    assert!(statement.child_at(5).is_none());

    let root = parse_text("for (;;) ;");
    let statement = root.first_child().and_then(|global| global.first_child()).unwrap();
    assert_eq!(statement.slot_count(), 9);
    assert!(statement.child_at(2).is_none());
    assert!(statement.child_at(4).is_none());
    assert!(statement.child_at(6).is_none());
}

#[test]
fn interpolated_strings() {
    assert_eq!(
        statement("s = $\"a{b + 1}c{d}\";"),
        "ExpressionStatement(AssignmentExpression(IdentifierName InterpolatedStringExpression(\
         Interpolation(BinaryExpression(IdentifierName LiteralExpression)) Interpolation(IdentifierName))))"
    );
    // the format specifier is skipped
    let root = parse_text("s = $\"{x:N2}\";");
    assert_eq!(codes(&root), vec![DiagnosticCode::InvalidToken, DiagnosticCode::InvalidToken]);
}

#[test]
fn missing_semicolon_is_reported_after_previous_token() {
    let root = parse_text("int x = 1  \n");
    let diagnostics = root.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, DiagnosticCode::SemicolonExpected);
    assert_eq!(diagnostics[0].span, TextRange::empty(9.into()));
    let missing = root.descendants_with_tokens().filter_map(NodeOrToken::into_token).find(|t| t.is_missing());
    assert_eq!(missing.map(|token| token.kind()), Some(SyntaxKind::Semicolon));
}

#[test]
fn unexpected_tokens_are_skipped() {
    let root = parse_text("class C { ) int x; }");
    let diagnostics = root.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, DiagnosticCode::InvalidToken);
    assert_eq!(diagnostics[0].span, TextRange::new(10.into(), 11.into()));
    assert_eq!(diagnostics[0].message(), "Invalid token ')'");

    let class = root.first_child().unwrap();
    let field = class.children().find(|child| child.kind() == SyntaxKind::FieldDeclaration).unwrap();
    let int = field.first_token().unwrap();
    let skipped: Vec<_> = int
        .leading_trivia()
        .filter_map(|trivia| trivia.skipped_token().map(|token| token.kind()))
        .collect();
    assert_eq!(skipped, vec![SyntaxKind::CloseParen]);
}

#[test]
fn trailing_garbage_goes_to_end_of_file() {
    let root = parse_text("class C { }\n}");
    assert_eq!(codes(&root), vec![DiagnosticCode::InvalidToken]);
    let eof = root.last_token().unwrap();
    assert_eq!(eof.kind(), SyntaxKind::EndOfFile);
    assert_eq!(eof.leading_trivia().count(), 1);
}

#[test]
fn unclosed_block_stops_at_member_tokens() {
    let root = parse_text("class C { void M() { x();\n public int y; }");
    let class = root.first_child().unwrap();
    let members: Vec<_> = class.children().map(|child| child.kind()).collect();
    assert_eq!(
        members,
        vec![SyntaxKind::MethodDeclaration, SyntaxKind::FieldDeclaration]
    );
    assert_eq!(codes(&root), vec![DiagnosticCode::CloseBraceExpected]);
}

#[test]
fn missing_expression() {
    let root = parse_text("x = ;");
    let diagnostics = root.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message(), "Invalid expression term ';'");
}

#[test]
fn depth_limit() {
    let options = ParseOptions::default().with_max_depth(8);
    let text = format!("x = {}y{};", "(".repeat(20), ")".repeat(20));
    let root = parse_with(&text, &options);
    assert!(codes(&root).contains(&DiagnosticCode::TooDeeplyNested));

    let text = format!("{}{}", "{".repeat(20), "}".repeat(20));
    let root = parse_with(&text, &options);
    assert!(codes(&root).contains(&DiagnosticCode::TooDeeplyNested));

    let text = "class A { class B { class C { } } }";
    let root = parse_with(text, &ParseOptions::default().with_max_depth(2));
    assert!(codes(&root).contains(&DiagnosticCode::TooDeeplyNested));
}

#[test]
fn deep_nesting_within_limit() {
    let text = format!("x = {}y{};", "(".repeat(50), ")".repeat(50));
    let root = parse_text(&text);
    assert!(root.diagnostics().is_empty());
}

#[test]
fn long_chains_are_bounded() {
    let options = ParseOptions::default();
    for text in [
        format!("x = a{};", "+a".repeat(5_000)),
        format!("x = a{};", ".b".repeat(5_000)),
        format!("f(){};", "(1)[0]".repeat(2_000)),
        format!("x = {}1;", "(".repeat(5_000)),
        format!("using A{};", ".B".repeat(5_000)),
    ] {
        let root = parse_with(&text, &options);
        assert!(usize::from(root.green().height()) <= 4 * options.max_depth);
        assert!(codes(&root).contains(&DiagnosticCode::TooDeeplyNested));
    }
}

#[test]
fn chains_within_limit() {
    let text = format!("x = a{};", "+a".repeat(100));
    assert!(parse_text(&text).diagnostics().is_empty());
    let text = format!("x = a{};", ".b".repeat(100));
    assert!(parse_text(&text).diagnostics().is_empty());
}

#[test]
fn rest_of_a_long_chain_is_skipped() {
    let options = ParseOptions::default().with_max_depth(6);
    let root = parse_with("x = a + b + c + d + e + f + g + h; y = 1;", &options);
    assert_eq!(codes(&root), vec![DiagnosticCode::TooDeeplyNested]);
    let statements: Vec<_> = root.children().map(|child| child.kind()).collect();
    assert_eq!(statements, vec![SyntaxKind::GlobalStatement, SyntaxKind::GlobalStatement]);
}
