//! Cursors over the tokens and nodes of a previous green tree.
//!
//! The token cursors see the tree as the lexer produced it: tokens the parser skipped come back out of the trivia
//! they were merged into, and missing tokens, which the lexer never produced, are left out.

use std::{collections::VecDeque, iter, slice};

use text_size::TextSize;

use crate::{
    green::{GreenElement, GreenNode, GreenToken},
    NodeOrToken,
};

/// Old lexer tokens in document order, each with its full start.
#[derive(Debug)]
pub(super) struct OldTokens<'a> {
    stack:   Vec<slice::Iter<'a, Option<GreenElement>>>,
    offset:  TextSize,
    /// Tokens starting before this are not yielded.
    skip_to: TextSize,
    pending: VecDeque<(TextSize, GreenToken)>,
}

impl<'a> OldTokens<'a> {
    /// Tokens of `root` starting at or after `position`.
    pub(super) fn starting_at(root: &'a GreenNode, position: TextSize) -> Self {
        Self {
            stack:   vec![root.raw_slots()],
            offset:  0.into(),
            skip_to: position,
            pending: VecDeque::new(),
        }
    }

    fn fill(&mut self) {
        while self.pending.is_empty() {
            let Some(top) = self.stack.last_mut() else {
                return;
            };
            match top.next() {
                None => {
                    self.stack.pop();
                }
                Some(None) => {}
                Some(Some(NodeOrToken::Node(node))) => {
                    let end = self.offset + node.full_width();
                    if end <= self.skip_to {
                        self.offset = end;
                    } else {
                        self.stack.push(node.raw_slots());
                    }
                }
                Some(Some(NodeOrToken::Token(token))) => {
                    if token.is_missing() {
                        continue;
                    }
                    let (skipped, token) = token.unmerge();
                    for piece in skipped.into_iter().chain(iter::once(token)) {
                        let start = self.offset;
                        self.offset += piece.full_width();
                        if start >= self.skip_to {
                            self.pending.push_back((start, piece));
                        }
                    }
                }
            }
        }
    }
}

impl Iterator for OldTokens<'_> {
    type Item = (TextSize, GreenToken);

    fn next(&mut self) -> Option<Self::Item> {
        self.fill();
        self.pending.pop_front()
    }
}

/// The old lexer token whose full span contains `position`, with its full start.
pub(super) fn token_at(root: &GreenNode, position: TextSize) -> Option<(TextSize, GreenToken)> {
    let mut node = root;
    let mut offset = TextSize::from(0);
    'descend: loop {
        for child in node.children() {
            let end = offset + child.full_width();
            if position < end {
                match child {
                    NodeOrToken::Node(child) => {
                        node = child;
                        continue 'descend;
                    }
                    NodeOrToken::Token(token) => {
                        let (skipped, token) = token.unmerge();
                        for piece in skipped.into_iter().chain(iter::once(token)) {
                            let piece_end = offset + piece.full_width();
                            if position < piece_end {
                                return Some((offset, piece));
                            }
                            offset = piece_end;
                        }
                        return None;
                    }
                }
            }
            offset = end;
        }
        return None;
    }
}

/// Full start of the old token before the one starting at `position`.
pub(super) fn step_back(root: &GreenNode, position: TextSize) -> TextSize {
    if position == TextSize::from(0) {
        return position;
    }
    token_at(root, position - TextSize::from(1)).map_or(0.into(), |(start, _)| start)
}

/// Nodes of `root` whose full span starts at `position`, outermost first. The root itself is not included.
pub(super) fn nodes_at(root: &GreenNode, position: TextSize) -> Vec<GreenNode> {
    let mut found = Vec::new();
    let mut node = root;
    let mut offset = TextSize::from(0);
    'descend: loop {
        for child in node.children() {
            let width = child.full_width();
            let end = offset + width;
            if width > TextSize::from(0) && position < end {
                match child {
                    NodeOrToken::Node(child) => {
                        if offset == position {
                            found.push(child.clone());
                        }
                        node = child;
                        continue 'descend;
                    }
                    NodeOrToken::Token(_) => break 'descend,
                }
            }
            offset = end;
        }
        break;
    }
    found
}
