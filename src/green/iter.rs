//! Green tree iterators.

use std::{iter::FusedIterator, slice};

use crate::{
    green::{GreenElement, GreenElementRef, GreenNode, GreenToken},
    NodeOrToken,
};

/// An iterator over all slots of a [`GreenNode`], absent slots included.
#[derive(Debug, Clone)]
pub struct Slots<'a> {
    inner: slice::Iter<'a, Option<GreenElement>>,
}

impl<'a> Slots<'a> {
    #[inline]
    pub(super) fn new(inner: slice::Iter<'a, Option<GreenElement>>) -> Self {
        Self { inner }
    }
}

impl ExactSizeIterator for Slots<'_> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<'a> Iterator for Slots<'a> {
    type Item = Option<GreenElementRef<'a>>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|slot| slot.as_ref().map(GreenElement::as_ref))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.inner.nth(n).map(|slot| slot.as_ref().map(GreenElement::as_ref))
    }
}

impl DoubleEndedIterator for Slots<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|slot| slot.as_ref().map(GreenElement::as_ref))
    }
}

impl FusedIterator for Slots<'_> {}

/// An iterator over the present children of a [`GreenNode`].
#[derive(Debug, Clone)]
pub struct Children<'a> {
    inner: slice::Iter<'a, Option<GreenElement>>,
}

impl<'a> Children<'a> {
    #[inline]
    pub(super) fn new(inner: slice::Iter<'a, Option<GreenElement>>) -> Self {
        Self { inner }
    }
}

impl<'a> Iterator for Children<'a> {
    type Item = GreenElementRef<'a>;

    #[inline]
    fn next(&mut self) -> Option<GreenElementRef<'a>> {
        self.inner.by_ref().flatten().next().map(GreenElement::as_ref)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.inner.len()))
    }
}

impl<'a> DoubleEndedIterator for Children<'a> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().rev().flatten().next().map(GreenElement::as_ref)
    }
}

impl FusedIterator for Children<'_> {}

/// Preorder iterator over the tokens below a [`GreenNode`], in document order.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    stack: Vec<Children<'a>>,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(node: &'a GreenNode) -> Self {
        Self {
            stack: vec![node.children()],
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a GreenToken;

    fn next(&mut self) -> Option<&'a GreenToken> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(NodeOrToken::Node(node)) => self.stack.push(node.children()),
                Some(NodeOrToken::Token(token)) => return Some(token),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl FusedIterator for Tokens<'_> {}
