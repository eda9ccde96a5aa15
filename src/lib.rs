//! `sharptree` parses a C#-like language into lossless, incrementally updatable syntax trees.
//!
//! The design follows the red/green split known from Roslyn and
//! [`rowan`](https://github.com/rust-analyzer/rowan/):
//! - Green nodes and tokens are immutable, position independent and reference counted. They store kinds, widths and
//!   children, and are shared freely between trees. Token text is interned, trivia (whitespace, comments,
//!   preprocessor lines and skipped tokens) hangs off the tokens it surrounds.
//! - Red [`SyntaxNode`]s add absolute positions and parent pointers. They are created lazily while a tree is
//!   navigated and are `Send` and `Sync`, so a tree can be read from many threads.
//!
//! Every tree covers its text exactly: printing a tree with its trivia gives back the input, byte for byte, however
//! malformed that input was. Errors are reported as [`Diagnostic`]s attached to the tree, never as `Err`.
//!
//! After an edit, [`SyntaxTree::with_changes`] relexes only the region around the change and reuses whole subtrees
//! of the previous tree where nothing changed. The result is the same tree a full parse would produce.
//!
//! ```
//! use sharptree::{SyntaxKind, SyntaxTree, TextChange, TextRange};
//!
//! let tree = SyntaxTree::parse_str("class Point { int x; int y; }");
//! let class = tree.root().first_child().unwrap();
//! assert_eq!(class.kind(), SyntaxKind::ClassDeclaration);
//!
//! let change = TextChange::new(TextRange::new(25.into(), 26.into()), "z");
//! let edited = tree.with_changes(&[change]).unwrap();
//! assert_eq!(edited.root().full_text(), "class Point { int x; int z; }");
//! assert!(edited.diagnostics().is_empty());
//! ```
#![forbid(
    // missing_debug_implementations,
    unconditional_recursion,
    future_incompatible,
    // missing_docs,
)]
#![deny(unsafe_code)]

pub mod diagnostics;
mod diff;
mod error;
pub mod green;
mod incremental;
mod kind;
pub mod lexer;
mod options;
mod parser;
pub mod syntax;
pub mod text;
mod tree;
mod utility_types;

// Reexport types for working with strings.
pub use text_size::{TextLen, TextRange, TextSize};

pub use crate::{
    diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Severity},
    error::TextError,
    green::{
        new_interner, GreenFlags, GreenNode, GreenNodeBuilder, GreenToken, GreenTrivia, NodeCache, TokenInterner,
    },
    kind::SyntaxKind,
    lexer::{lex, Lexer, LexerMode, LEXER_LOOKAHEAD},
    options::ParseOptions,
    syntax::{SyntaxElement, SyntaxNode, SyntaxToken, SyntaxTrivia},
    text::{Encoding, LineCol, SourceText, TextChange, TextChangeRange, TextLine},
    tree::{parse, SyntaxTree},
    utility_types::{Direction, NodeOrToken, TokenAtOffset, WalkEvent},
};
