//! Recursive descent parser producing green trees.
//!
//! Tokens are pulled lazily from a [`TokenSource`] through a small lookahead buffer. Declarations and statements are
//! parsed by recursive descent, expressions by precedence climbing. The parser never fails: required tokens that are
//! not there are inserted as zero-width missing tokens, and tokens that fit nowhere are attached to the next consumed
//! token as skipped-token trivia, so the tree always covers the whole input.

mod declarations;
mod expressions;
mod statements;

use std::collections::VecDeque;

use text_size::TextSize;

use crate::{
    diagnostics::SyntaxDiagnostic,
    green::{Checkpoint, GreenFlags, GreenNode, GreenNodeBuilder, GreenToken},
    lexer::Lexer,
    DiagnosticCode, ParseOptions, SyntaxKind,
};

/// Where the parser gets its tokens from.
pub(crate) trait TokenSource {
    /// The next token of the stream. After the end of input, keeps returning `EndOfFile`.
    fn next_token(&mut self) -> GreenToken;

    /// Nodes of a previous tree that start exactly at `position` and may be spliced into the new tree, outermost
    /// first.
    fn reusable_nodes(&mut self, _position: TextSize) -> Vec<GreenNode> {
        Vec::new()
    }

    /// The parser took a reused node and continues at `position`.
    fn reset_to(&mut self, _position: TextSize) {}
}

impl<T: TokenSource + ?Sized> TokenSource for &mut T {
    #[inline]
    fn next_token(&mut self) -> GreenToken {
        (**self).next_token()
    }

    #[inline]
    fn reusable_nodes(&mut self, position: TextSize) -> Vec<GreenNode> {
        (**self).reusable_nodes(position)
    }

    #[inline]
    fn reset_to(&mut self, position: TextSize) {
        (**self).reset_to(position)
    }
}

impl TokenSource for Lexer<'_> {
    #[inline]
    fn next_token(&mut self) -> GreenToken {
        Lexer::next_token(self)
    }
}

/// Result of a parse.
#[derive(Debug)]
pub(crate) struct Parsed {
    pub(crate) root:         GreenNode,
    pub(crate) reused_nodes: usize,
}

/// Parses a whole compilation unit from `source`.
pub(crate) fn parse<S: TokenSource>(source: S, options: &ParseOptions) -> Parsed {
    let mut parser = Parser::new(source, options);
    parser.parse_compilation_unit();
    Parsed {
        reused_nodes: parser.reused_nodes,
        root:         parser.builder.finish(),
    }
}

pub(crate) struct Parser<'o, S> {
    source:         S,
    options:        &'o ParseOptions,
    builder:        GreenNodeBuilder<'static>,
    lookahead:      VecDeque<GreenToken>,
    /// Full start of `lookahead[0]`.
    position:       TextSize,
    /// Skipped tokens waiting for the next consumed token.
    pending:        Vec<GreenToken>,
    /// Trailing trivia width of the last consumed element that covered text.
    prev_trailing:  TextSize,
    depth:          usize,
    reused_nodes:   usize,
}

impl<'o, S: TokenSource> Parser<'o, S> {
    fn new(source: S, options: &'o ParseOptions) -> Self {
        Self {
            source,
            options,
            builder: GreenNodeBuilder::new(),
            lookahead: VecDeque::with_capacity(4),
            position: 0.into(),
            pending: Vec::new(),
            prev_trailing: 0.into(),
            depth: 0,
            reused_nodes: 0,
        }
    }

    fn fill(&mut self, n: usize) {
        while self.lookahead.len() <= n {
            let token = match self.lookahead.back() {
                Some(last) if last.kind() == SyntaxKind::EndOfFile => last.clone(),
                _ => self.source.next_token(),
            };
            self.lookahead.push_back(token);
        }
    }

    fn peek(&mut self, n: usize) -> &GreenToken {
        self.fill(n);
        &self.lookahead[n]
    }

    /// Kind of the `n`-th token ahead; `0` is the current token.
    #[inline]
    fn nth(&mut self, n: usize) -> SyntaxKind {
        self.peek(n).kind()
    }

    #[inline]
    fn current(&mut self) -> SyntaxKind {
        self.nth(0)
    }

    #[inline]
    fn at(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    fn take(&mut self) -> GreenToken {
        self.fill(0);
        let token = match self.lookahead.pop_front() {
            Some(token) => token,
            None => unreachable!("lookahead was just filled"),
        };
        self.position += token.full_width();
        token
    }

    /// Consumes the current token into the tree, with any pending skipped tokens in front of it.
    fn bump(&mut self) {
        let token = self.take();
        let token = token.with_skipped(self.pending.drain(..));
        if token.full_width() > TextSize::from(0) {
            self.prev_trailing = token.trailing_trivia_width();
        }
        self.builder.token(token);
    }

    /// Moves the current token into the skipped trivia of the next consumed token. `EndOfFile` is never skipped.
    fn skip(&mut self) {
        if self.at(SyntaxKind::EndOfFile) {
            return;
        }
        let token = self.take();
        self.pending.push(token);
    }

    /// Consumes a token of `kind`, or inserts a missing one.
    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            self.missing(kind);
            false
        }
    }

    /// Inserts a zero-width token of `kind` reporting that it was expected right after the previous token.
    fn missing(&mut self, kind: SyntaxKind) {
        let code = DiagnosticCode::expected(kind);
        let diagnostic = self.diagnostic_at_previous(code);
        let diagnostic = match code {
            DiagnosticCode::TokenExpected => diagnostic.with_arg(kind.describe()),
            _ => diagnostic,
        };
        self.builder.token(GreenToken::missing(kind, diagnostic));
    }

    fn diagnostic_at_previous(&self, code: DiagnosticCode) -> SyntaxDiagnostic {
        SyntaxDiagnostic::new(code, -(u32::from(self.prev_trailing) as i32), 0)
    }

    /// Emits a name made of a missing identifier, for an expression or type that is not there.
    fn missing_name(&mut self, diagnostic: SyntaxDiagnostic) {
        self.builder.start_node(SyntaxKind::IdentifierName);
        self.builder.token(GreenToken::missing(SyntaxKind::Identifier, diagnostic));
        self.builder.finish_node();
    }

    /// Whether the depth budget is used up. Reports it with a missing name if so.
    fn too_deep(&mut self) -> bool {
        if self.depth < self.options.max_depth {
            return false;
        }
        let diagnostic = self.diagnostic_at_previous(DiagnosticCode::TooDeeplyNested);
        self.missing_name(diagnostic);
        true
    }

    /// Whether wrapping what was built since `checkpoint` in one more node would exceed the depth budget. Operator,
    /// member and name chains grow the tree without recursing, so they are bounded by height. If so, reports it and
    /// skips the rest of the chain.
    fn too_tall(&mut self, checkpoint: Checkpoint) -> bool {
        let height = usize::from(self.builder.height_since(checkpoint));
        if self.depth + height < self.options.max_depth {
            return false;
        }
        let diagnostic = self.diagnostic_at_previous(DiagnosticCode::TooDeeplyNested);
        self.missing_name(diagnostic);
        self.skip_chain();
        true
    }

    /// Skips tokens that continue an expression, up to the token that ends it.
    fn skip_chain(&mut self) {
        let mut open = 0usize;
        let mut strings = 0usize;
        loop {
            let kind = self.current();
            match kind {
                SyntaxKind::EndOfFile => break,
                SyntaxKind::InterpolatedStringStart => strings += 1,
                SyntaxKind::InterpolatedStringEnd if strings > 0 => strings -= 1,
                _ if strings > 0 => {}
                SyntaxKind::OpenParen | SyntaxKind::OpenBracket => open += 1,
                SyntaxKind::CloseParen | SyntaxKind::CloseBracket if open > 0 => open -= 1,
                SyntaxKind::Comma if open > 0 => {}
                _ if expressions::continues_expression(kind) => {}
                _ => break,
            }
            self.skip();
        }
    }

    /// Splices a node of a previous tree starting at the current position, if the token source has one whose kind
    /// `accept`s.
    fn try_reuse(&mut self, accept: fn(SyntaxKind) -> bool) -> bool {
        if !self.options.reuse_nodes || !self.pending.is_empty() {
            return false;
        }
        let position = self.position;
        let budget = self.options.max_depth.saturating_sub(self.depth);
        let candidate = self.source.reusable_nodes(position).into_iter().find(|node| {
            accept(node.kind())
                && node.full_width() > TextSize::from(0)
                && !node.flags().intersects(GreenFlags::CONTAINS_DIAGNOSTICS | GreenFlags::IS_MISSING)
                && usize::from(node.height()) < budget
        });
        let Some(node) = candidate else {
            return false;
        };

        tracing::trace!(kind = ?node.kind(), ?position, width = ?node.full_width(), "reusing node");
        self.lookahead.clear();
        self.position += node.full_width();
        self.prev_trailing = node.trailing_trivia_width();
        self.source.reset_to(self.position);
        self.builder.node(node);
        self.reused_nodes += 1;
        true
    }

    /// Runs `f` one nesting level deeper.
    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    fn parse_compilation_unit(&mut self) {
        self.builder.start_node(SyntaxKind::CompilationUnit);
        while !self.at(SyntaxKind::EndOfFile) {
            if self.try_reuse(is_top_level_element) {
                continue;
            }
            let before = self.position;
            self.parse_top_level_element();
            if self.position == before {
                self.skip();
            }
        }
        self.bump();
        self.builder.finish_node();
    }
}

fn is_top_level_element(kind: SyntaxKind) -> bool {
    is_namespace_member(kind) || kind == SyntaxKind::GlobalStatement
}

fn is_namespace_member(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::UsingDirective | SyntaxKind::NamespaceDeclaration) || kind.is_type_declaration()
}

#[cfg(test)]
mod tests;
