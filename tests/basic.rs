mod common;

use common::{assert_incremental, check_tree, offset_of, parse, tokens, PROGRAM};
use sharptree::{
    Diagnostic, DiagnosticCode, Direction, NodeOrToken, SyntaxKind, SyntaxNode, SyntaxTree, TextChange, TextRange,
    TextSize, TokenAtOffset, WalkEvent,
};

fn child_nodes(node: &SyntaxNode) -> Vec<SyntaxNode> {
    node.children().collect()
}

#[test]
fn binary_expression() {
    let tree = parse("a+b");
    assert_eq!(tree.green().full_width(), TextSize::from(3));

    let binary = tree
        .root()
        .descendants()
        .find(|node| node.kind() == SyntaxKind::BinaryExpression)
        .unwrap();
    assert_eq!(binary.full_span(), TextRange::up_to(3.into()));
    assert_eq!(binary.green().full_width(), TextSize::from(3));
    let kinds: Vec<_> = tokens(&binary).into_iter().map(|(kind, _)| kind).collect();
    assert_eq!(
        kinds,
        vec![SyntaxKind::Identifier, SyntaxKind::Plus, SyntaxKind::Identifier]
    );
    let texts: Vec<_> = binary
        .descendants_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .map(|token| token.text().to_string())
        .collect();
    assert_eq!(texts, vec!["a", "+", "b"]);

    // no `;` after the expression
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, DiagnosticCode::SemicolonExpected);
    assert_eq!(diagnostics[0].span, TextRange::empty(3.into()));
}

#[test]
fn unterminated_block_comment() {
    let text = "x = 1;\ny = 2; /* never closed\nz = 3;\nw = 4;\n";
    let tree = parse(text);
    let comment_start = offset_of(text, "/*");
    assert!(tree
        .diagnostics()
        .iter()
        .any(|diagnostic| diagnostic.code == DiagnosticCode::UnterminatedComment));

    let edited = assert_incremental(&tree, &[TextChange::insert(offset_of(text, "closed"), "x")]);
    let eof = edited.root().last_token().unwrap();
    assert_eq!(eof.kind(), SyntaxKind::EndOfFile);
    let comment = eof
        .leading_trivia()
        .find(|trivia| trivia.kind() == SyntaxKind::MultiLineComment)
        .or_else(|| {
            eof.prev_token()
                .unwrap()
                .trailing_trivia()
                .find(|trivia| trivia.kind() == SyntaxKind::MultiLineComment)
        })
        .unwrap();
    assert_eq!(
        comment.full_span(),
        TextRange::new(comment_start, edited.text().len())
    );

    // closing the comment brings the statements back
    let closed = assert_incremental(&edited, &[TextChange::insert(offset_of(edited.text().as_str(), "\nz"), " */")]);
    assert!(closed.diagnostics().is_empty());
    assert_eq!(closed.root().children().count(), 4);
}

#[test]
fn whitespace_edit_keeps_tokens() {
    let text: String = (0..10).map(|i| format!("s{i} = {i};\n")).collect();
    let tree = parse(&text);
    let edited = assert_incremental(&tree, &[TextChange::insert(offset_of(&text, "s6") + TextSize::from(2), " ")]);

    let old_statements = child_nodes(tree.root());
    let new_statements = child_nodes(edited.root());
    assert_eq!(old_statements.len(), 10);
    assert_eq!(new_statements.len(), 10);
    for i in [0, 1, 2, 7, 8, 9] {
        assert!(
            old_statements[i].green().ptr_eq(new_statements[i].green()),
            "statement {i} was not reused"
        );
    }

    let old_tokens: Vec<_> = old_statements[6].green().tokens().cloned().collect();
    let new_tokens: Vec<_> = new_statements[6].green().tokens().cloned().collect();
    assert_eq!(old_tokens.len(), new_tokens.len());
    for (old, new) in old_tokens.iter().zip(&new_tokens) {
        assert_eq!(old.kind(), new.kind());
        assert_eq!(old.text(tree.interner()), new.text(edited.interner()));
    }
    // only the trivia after `s6` changed, the tokens behind it are the old ones
    assert_eq!(new_tokens[0].trailing_trivia_width(), TextSize::from(2));
    for (old, new) in old_tokens.iter().zip(&new_tokens).skip(1) {
        assert!(old.ptr_eq(new));
    }
}

#[test]
fn deleted_close_brace() {
    let text = "class A\n{\n    void M()\n    {\n        x = 1;\n    }\n\n    public int f;\n}\nclass B { }\n";
    let tree = parse(text);
    assert!(tree.diagnostics().is_empty());

    let brace = offset_of(text, "    }\n") + TextSize::from(4);
    let edited = assert_incremental(&tree, &[TextChange::delete(TextRange::at(brace, 1.into()))]);
    assert_eq!(edited.root().full_span(), TextRange::up_to(edited.text().len()));
    let codes: Vec<_> = edited.diagnostics().iter().map(|diagnostic| diagnostic.code).collect();
    assert_eq!(codes, vec![DiagnosticCode::CloseBraceExpected]);

    // the method body ends before the field, whose declaration stays intact
    let class = edited.root().first_child().unwrap();
    let members: Vec<_> = class.children().map(|member| member.kind()).collect();
    assert_eq!(
        members,
        vec![SyntaxKind::MethodDeclaration, SyntaxKind::FieldDeclaration]
    );
    assert_eq!(
        edited.root().children().nth(1).map(|class| class.kind()),
        Some(SyntaxKind::ClassDeclaration)
    );
}

#[test]
fn empty_input() {
    let tree = parse("");
    let root = tree.root();
    assert_eq!(root.kind(), SyntaxKind::CompilationUnit);
    assert_eq!(root.children().count(), 0);
    let elements: Vec<_> = root.children_with_tokens().collect();
    assert_eq!(elements.len(), 1);
    let eof = elements[0].as_token().unwrap();
    assert_eq!(eof.kind(), SyntaxKind::EndOfFile);
    assert_eq!(eof.full_span(), TextRange::empty(0.into()));
    assert!(tree.diagnostics().is_empty());
}

#[test]
fn program() {
    let tree = parse(PROGRAM);
    assert!(tree.diagnostics().is_empty(), "{:?}", tree.diagnostics());
    let kinds: Vec<_> = tree.root().children().map(|node| node.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::UsingDirective,
            SyntaxKind::UsingDirective,
            SyntaxKind::NamespaceDeclaration,
        ]
    );
    let declarations: Vec<_> = tree.root().children().nth(2).unwrap().children().map(|node| node.kind()).collect();
    assert_eq!(
        declarations,
        vec![
            SyntaxKind::QualifiedName,
            SyntaxKind::ClassDeclaration,
            SyntaxKind::StructDeclaration,
            SyntaxKind::InterfaceDeclaration,
        ]
    );
}

#[test]
fn navigation() {
    let tree = parse("class C { int x; void M() { x = 1; } }");
    let root = tree.root();
    let class = root.first_child().unwrap();
    let method = class.last_child().unwrap();
    assert_eq!(method.kind(), SyntaxKind::MethodDeclaration);
    assert_eq!(method.parent().as_ref(), Some(&class));
    assert_eq!(method.ancestors().count(), 3);

    let field = method.prev_sibling().unwrap();
    assert_eq!(field.kind(), SyntaxKind::FieldDeclaration);
    assert_eq!(field.text(), "int x;");
    assert_eq!(field.span(), TextRange::new(10.into(), 16.into()));
    assert_eq!(field.full_span(), TextRange::new(10.into(), 17.into()));
    assert_eq!(
        field.siblings(Direction::Next).map(|node| node.kind()).collect::<Vec<_>>(),
        vec![SyntaxKind::FieldDeclaration, SyntaxKind::MethodDeclaration]
    );

    let assignment = method
        .descendants()
        .find(|node| node.kind() == SyntaxKind::AssignmentExpression)
        .unwrap();
    assert_eq!(assignment.text(), "x = 1");
    match root.token_at_offset(18.into()) {
        TokenAtOffset::Single(token) => assert_eq!(token.kind(), SyntaxKind::VoidKeyword),
        other => panic!("unexpected {other:?}"),
    }
    let covering = root.covering_element(TextRange::new(28.into(), 33.into()));
    assert_eq!(covering.kind(), SyntaxKind::AssignmentExpression);

    let mut depth = 0;
    let mut max_depth = 0;
    for event in root.preorder() {
        match event {
            WalkEvent::Enter(_) => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            WalkEvent::Leave(_) => depth -= 1,
        }
    }
    assert_eq!(depth, 0);
    assert!(max_depth >= 6);
}

#[test]
fn repeated_navigation_is_structurally_equal() {
    let tree = parse(PROGRAM);
    let first: Vec<_> = tree
        .root()
        .descendants()
        .map(|node| (node.kind(), node.full_span()))
        .collect();
    let second: Vec<_> = tree
        .root()
        .descendants()
        .map(|node| (node.kind(), node.full_span()))
        .collect();
    assert_eq!(first, second);
    assert_eq!(tokens(tree.root()), tokens(tree.root()));
}

#[test]
fn skipped_tokens_are_trivia() {
    let tree = parse("class C { ) ) int x; }");
    let codes: Vec<_> = tree.diagnostics().iter().map(|diagnostic| diagnostic.code).collect();
    assert_eq!(codes, vec![DiagnosticCode::InvalidToken, DiagnosticCode::InvalidToken]);

    let int = tree
        .root()
        .descendants_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .find(|token| token.kind() == SyntaxKind::IntKeyword)
        .unwrap();
    let skipped: Vec<_> = int
        .leading_trivia()
        .filter(|trivia| trivia.kind() == SyntaxKind::SkippedTokens)
        .map(|trivia| trivia.text().into_owned())
        .collect();
    assert_eq!(skipped, vec![") ", ") "]);
}

#[test]
fn report_into_sink() {
    let tree = parse("int x = ;\nint y = 1");
    let mut sink: Vec<Diagnostic> = Vec::new();
    tree.report_diagnostics(&mut sink);
    assert_eq!(sink, tree.diagnostics());
    let codes: Vec<_> = sink.iter().map(|diagnostic| diagnostic.code).collect();
    assert_eq!(
        codes,
        vec![DiagnosticCode::InvalidExpressionTerm, DiagnosticCode::SemicolonExpected]
    );
    assert!(sink.windows(2).all(|pair| pair[0].span.start() <= pair[1].span.start()));
}

#[test]
fn no_op_edit_returns_same_tree() {
    let tree = parse(PROGRAM);
    let same = tree.with_changes(&[]).unwrap();
    assert!(same.green().ptr_eq(tree.green()));
    check_tree(&same);

    let reparsed = SyntaxTree::parse_with_interner(PROGRAM, *tree.options(), tree.interner().clone());
    assert_eq!(reparsed.green(), tree.green());
}

#[test]
fn long_chains_on_a_default_stack() {
    for text in [
        format!("x = a{};", "+a".repeat(5_000)),
        format!("x = a{};", ".b".repeat(100_000)),
        format!("x = {}1;", "(".repeat(5_000)),
    ] {
        let tree = parse(&text);
        assert!(tree
            .diagnostics()
            .iter()
            .any(|diagnostic| diagnostic.code == DiagnosticCode::TooDeeplyNested));
        let last = tree.root().last_token().unwrap();
        assert_eq!(last.kind(), SyntaxKind::EndOfFile);
        assert!(tree.root().descendants().count() > 1);
        drop(tree);
    }
}

#[test]
fn edit_inside_a_long_chain() {
    let text = format!("x = a{};\ny = 2;\n", "+a".repeat(3_000));
    let tree = parse(&text);
    let edited = assert_incremental(&tree, &[TextChange::insert(offset_of(&text, "y"), "z")]);
    drop(tree);
    drop(edited);
}

#[test]
fn child_at_matches_children() {
    let tree = parse(PROGRAM);
    for node in tree.root().descendants() {
        let expected: Vec<_> = node
            .children_with_tokens()
            .map(|child| (child.kind(), child.full_span()))
            .collect();
        // once before and once after the children were materialized
        for _ in 0..2 {
            let found: Vec<_> = (0..node.slot_count())
                .filter_map(|index| node.child_at(index))
                .map(|child| (child.kind(), child.full_span()))
                .collect();
            assert_eq!(found, expected);
        }
    }
}
