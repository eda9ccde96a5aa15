#![allow(unused)]

use sharptree::{
    NodeOrToken, ParseOptions, SourceText, SyntaxKind, SyntaxNode, SyntaxTree, TextChange, TextRange, TextSize,
};

/// A small program touching every part of the grammar.
pub const PROGRAM: &str = r#"using System;
using System.Collections.Generic;

namespace Demo.Shapes
{
    /// <summary>A point.</summary>
    public sealed class Point : IShape
    {
        private readonly int x, y = 0;
        public static Point Origin;

        public Point(int x, int y)
        {
            this.x = x;
            this.y = y;
        }

        public double Length()
        {
            // squared length first
            var sum = x * x + y * y;
            if (sum == 0) return 0; else { return Math.Sqrt(sum); }
        }

        public string Describe(string? name)
        {
            /* interpolated */
            return $"{name ?? "point"} at ({x}, {y})";
        }
    }

    internal struct Grid
    {
        int[] cells;

        void Fill(int value)
        {
            for (int i = 0; i < cells.Length; i++) cells[i] = value;
            foreach (var cell in cells) { total += cell; }
            while (!done) { done = step() > 10 ? true : false; }
            do { count--; } while (count > 0);
        }
    }

    interface IShape { double Length(); }
}
"#;

pub fn parse(text: &str) -> SyntaxTree {
    let tree = SyntaxTree::parse_str(text);
    check_tree(&tree);
    tree
}

/// Checks that the tree reproduces its text and that every node is as wide as its children.
pub fn check_tree(tree: &SyntaxTree) {
    assert!(tree.green().verify_widths(), "width mismatch");
    assert_eq!(tree.root().full_text(), tree.text().as_str());
    assert_eq!(tree.root().full_span(), TextRange::up_to(tree.text().len()));
}

/// Kinds and spans of all tokens, missing ones included.
pub fn tokens(node: &SyntaxNode) -> Vec<(SyntaxKind, TextRange)> {
    node.descendants_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .map(|token| (token.kind(), token.full_span()))
        .collect()
}

/// Applies `changes` to `tree` incrementally and checks the result against a full parse of the new text.
pub fn assert_incremental(tree: &SyntaxTree, changes: &[TextChange]) -> SyntaxTree {
    let incremental = tree.with_changes(changes).unwrap();
    check_tree(&incremental);

    let full = SyntaxTree::parse_with_interner(
        incremental.text().clone(),
        *tree.options(),
        tree.interner().clone(),
    );
    assert_eq!(
        incremental.root().debug(true),
        full.root().debug(true),
        "incremental and full parse differ after {changes:?}"
    );
    assert_eq!(incremental.green(), full.green());
    assert_eq!(incremental.diagnostics(), full.diagnostics());
    incremental
}

/// Offset of the first occurrence of `needle` in `text`.
pub fn offset_of(text: &str, needle: &str) -> TextSize {
    let index = text.find(needle).unwrap_or_else(|| panic!("{needle:?} not in text"));
    TextSize::from(index as u32)
}

pub fn apply(text: &str, changes: &[TextChange]) -> String {
    SourceText::new(text).with_changes(changes).unwrap().as_str().to_owned()
}
