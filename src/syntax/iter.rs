//! Red tree iterators.

use std::iter::FusedIterator;

use text_size::TextSize;

use super::*;
use crate::{NodeOrToken, WalkEvent};

/// An iterator over the child elements of a [`SyntaxNode`], skipping absent slots.
/// Cloning restarts nothing: the clone continues from the same position.
#[derive(Clone, Debug)]
pub struct SyntaxElementChildren {
    parent: SyntaxNode,
    index:  usize,
    offset: TextSize,
}

impl SyntaxElementChildren {
    pub(super) fn new(parent: &SyntaxNode) -> Self {
        Self {
            parent: parent.clone(),
            index:  0,
            offset: parent.full_span().start(),
        }
    }
}

impl Iterator for SyntaxElementChildren {
    type Item = SyntaxElement;

    fn next(&mut self) -> Option<SyntaxElement> {
        while self.index < self.parent.slot_count() {
            let index = self.index;
            self.index += 1;
            if let Some(green) = self.parent.green().slot(index) {
                let offset = self.offset;
                self.offset += green.full_width();
                return Some(self.parent.element(index, green, offset));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.parent.slot_count() - self.index))
    }
}

impl FusedIterator for SyntaxElementChildren {}

/// An iterator over the child nodes of a [`SyntaxNode`].
#[derive(Clone, Debug)]
pub struct SyntaxNodeChildren {
    inner: SyntaxElementChildren,
}

impl SyntaxNodeChildren {
    pub(super) fn new(parent: &SyntaxNode) -> Self {
        Self {
            inner: SyntaxElementChildren::new(parent),
        }
    }
}

impl Iterator for SyntaxNodeChildren {
    type Item = SyntaxNode;

    fn next(&mut self) -> Option<SyntaxNode> {
        self.inner.by_ref().find_map(SyntaxElement::into_node)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl FusedIterator for SyntaxNodeChildren {}

/// Preorder traversal of the nodes below (and including) a [`SyntaxNode`].
#[derive(Clone, Debug)]
pub struct Preorder {
    start: SyntaxNode,
    next:  Option<WalkEvent<SyntaxNode>>,
}

impl Preorder {
    pub(super) fn new(start: SyntaxNode) -> Self {
        let next = Some(WalkEvent::Enter(start.clone()));
        Self { start, next }
    }

    /// Do not descend into the node that was just entered.
    pub fn skip_subtree(&mut self) {
        self.next = self.next.take().map(|next| match next {
            WalkEvent::Enter(first_child) => WalkEvent::Leave(first_child.parent().unwrap_or(first_child)),
            WalkEvent::Leave(parent) => WalkEvent::Leave(parent),
        });
    }
}

impl Iterator for Preorder {
    type Item = WalkEvent<SyntaxNode>;

    fn next(&mut self) -> Option<WalkEvent<SyntaxNode>> {
        let next = self.next.take();
        self.next = next.as_ref().and_then(|event| match event {
            WalkEvent::Enter(node) => Some(match node.first_child() {
                Some(child) => WalkEvent::Enter(child),
                None => WalkEvent::Leave(node.clone()),
            }),
            WalkEvent::Leave(node) => {
                if node == &self.start {
                    return None;
                }
                Some(match node.next_sibling() {
                    Some(sibling) => WalkEvent::Enter(sibling),
                    None => WalkEvent::Leave(node.parent()?),
                })
            }
        });
        next
    }
}

impl FusedIterator for Preorder {}

/// Preorder traversal of the nodes and tokens below (and including) a [`SyntaxNode`].
#[derive(Clone, Debug)]
pub struct PreorderWithTokens {
    start: SyntaxElement,
    next:  Option<WalkEvent<SyntaxElement>>,
}

impl PreorderWithTokens {
    pub(super) fn new(start: SyntaxNode) -> Self {
        let start: SyntaxElement = start.into();
        let next = Some(WalkEvent::Enter(start.clone()));
        Self { start, next }
    }
}

impl Iterator for PreorderWithTokens {
    type Item = WalkEvent<SyntaxElement>;

    fn next(&mut self) -> Option<WalkEvent<SyntaxElement>> {
        let next = self.next.take();
        self.next = next.as_ref().and_then(|event| match event {
            WalkEvent::Enter(element) => Some(match element {
                NodeOrToken::Node(node) => match node.first_child_or_token() {
                    Some(child) => WalkEvent::Enter(child),
                    None => WalkEvent::Leave(element.clone()),
                },
                NodeOrToken::Token(_) => WalkEvent::Leave(element.clone()),
            }),
            WalkEvent::Leave(element) => {
                if element == &self.start {
                    return None;
                }
                Some(match element.next_sibling_or_token() {
                    Some(sibling) => WalkEvent::Enter(sibling),
                    None => WalkEvent::Leave(element.parent()?.into()),
                })
            }
        });
        next
    }
}

impl FusedIterator for PreorderWithTokens {}
