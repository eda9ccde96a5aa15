use std::{
    fmt::{self, Write},
    hash::{Hash, Hasher},
    iter,
    sync::{Arc, Weak},
};

use parking_lot::RwLock;
use text_size::{TextRange, TextSize};

use super::*;
use crate::{
    diagnostics::{self, Diagnostic, DiagnosticSink},
    green::{GreenElementRef, GreenNode, TokenInterner},
    Direction, NodeOrToken, SyntaxKind, TokenAtOffset, WalkEvent,
};

/// Shared by every handle into one red tree. Holding it keeps all materialized nodes alive.
struct Tree {
    root:     Arc<NodeData>,
    interner: Arc<TokenInterner>,
}

pub(super) struct NodeData {
    green:    GreenNode,
    parent:   Option<(Weak<NodeData>, u32)>,
    offset:   TextSize,
    /// One cell per slot. Only node slots are ever filled; tokens are cheap values created on access.
    children: Box<[RwLock<Option<Arc<NodeData>>>]>,
}

impl NodeData {
    fn new(green: GreenNode, parent: Option<(Weak<NodeData>, u32)>, offset: TextSize) -> Self {
        let children = (0..green.slot_count()).map(|_| RwLock::new(None)).collect();
        Self {
            green,
            parent,
            offset,
            children,
        }
    }
}

/// A node of the positioned, parent-aware "red" tree.
///
/// Red nodes are created lazily on top of a green tree as it is navigated. Every handle keeps the whole tree
/// alive, and nodes can be shared between threads. Handles are cheap to clone (two reference counts).
#[derive(Clone)]
pub struct SyntaxNode {
    tree: Arc<Tree>,
    data: Arc<NodeData>,
}

impl SyntaxNode {
    /// Builds the root of a red tree for `green`. Token text is resolved through `interner`.
    pub fn new_root(green: GreenNode, interner: Arc<TokenInterner>) -> SyntaxNode {
        let root = Arc::new(NodeData::new(green, None, 0.into()));
        SyntaxNode {
            tree: Arc::new(Tree {
                root: root.clone(),
                interner,
            }),
            data: root,
        }
    }

    #[inline]
    fn with_data(&self, data: Arc<NodeData>) -> SyntaxNode {
        SyntaxNode {
            tree: self.tree.clone(),
            data,
        }
    }

    /// Materializes the node in slot `index`, or returns the existing wrapper.
    fn child_node(&self, index: usize, green: &GreenNode, offset: TextSize) -> SyntaxNode {
        let cell = &self.data.children[index];
        if let Some(data) = &*cell.read() {
            return self.with_data(data.clone());
        }
        // another thread may win the race; its wrapper is kept and ours dropped
        let fresh = Arc::new(NodeData::new(
            green.clone(),
            Some((Arc::downgrade(&self.data), index as u32)),
            offset,
        ));
        let data = cell.write().get_or_insert(fresh).clone();
        self.with_data(data)
    }

    pub(super) fn element(&self, index: usize, green: GreenElementRef<'_>, offset: TextSize) -> SyntaxElement {
        match green {
            NodeOrToken::Node(node) => NodeOrToken::Node(self.child_node(index, node, offset)),
            NodeOrToken::Token(token) => NodeOrToken::Token(SyntaxToken::new(self.clone(), index, offset, token.clone())),
        }
    }

    /// Kind and span of this node, or with `recursive` the whole subtree with trivia, one element per line.
    pub fn debug(&self, recursive: bool) -> String {
        // NOTE: `fmt::Write` methods on `String` never fail
        let mut res = String::new();
        if !recursive {
            write!(res, "{:?}@{:?}", self.kind(), self.full_span()).unwrap();
            return res;
        }
        let mut level = 0;
        for event in self.preorder_with_tokens() {
            match event {
                WalkEvent::Enter(element) => {
                    let indent = "  ".repeat(level);
                    match element {
                        NodeOrToken::Node(node) => writeln!(res, "{indent}{}", node.debug(false)).unwrap(),
                        NodeOrToken::Token(token) => {
                            for trivia in token.leading_trivia() {
                                writeln!(res, "{indent}{}", trivia.debug()).unwrap();
                            }
                            writeln!(res, "{indent}{}", token.debug()).unwrap();
                            for trivia in token.trailing_trivia() {
                                writeln!(res, "{indent}{}", trivia.debug()).unwrap();
                            }
                        }
                    }
                    level += 1;
                }
                WalkEvent::Leave(_) => level -= 1,
            }
        }
        assert_eq!(level, 0);
        res
    }

    /// The root of the tree this node belongs to.
    #[inline]
    pub fn root(&self) -> SyntaxNode {
        self.with_data(self.tree.root.clone())
    }

    /// The interner resolving token text of this tree.
    #[inline]
    pub fn interner(&self) -> &Arc<TokenInterner> {
        &self.tree.interner
    }

    /// Returns the underlying green tree node of this node.
    #[inline]
    pub fn green(&self) -> &GreenNode {
        &self.data.green
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data.green.kind()
    }

    /// The range this node covers in the source text, in bytes, without the leading trivia of its first token and
    /// the trailing trivia of its last token.
    #[inline]
    pub fn span(&self) -> TextRange {
        let green = &self.data.green;
        TextRange::at(self.data.offset + green.leading_trivia_width(), green.width())
    }

    /// The range this node covers in the source text, in bytes, including all trivia.
    #[inline]
    pub fn full_span(&self) -> TextRange {
        TextRange::at(self.data.offset, self.data.green.full_width())
    }

    /// The source text of this node, without outer trivia.
    pub fn text(&self) -> String {
        let full = self.full_text();
        let green = &self.data.green;
        let start = usize::from(green.leading_trivia_width());
        let end = full.len() - usize::from(green.trailing_trivia_width());
        full[start..end.max(start)].to_string()
    }

    /// The exact source text of this node, including all trivia.
    pub fn full_text(&self) -> String {
        let mut out = String::with_capacity(usize::from(self.data.green.full_width()));
        self.data.green.write_full_text(&self.tree.interner, &mut out);
        out
    }

    /// Every diagnostic of the tokens in this node, with absolute spans, sorted by position.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        self.report_diagnostics(&mut out);
        out
    }

    pub fn report_diagnostics(&self, sink: &mut dyn DiagnosticSink) {
        diagnostics::collect(&self.data.green, self.data.offset, &self.tree.interner, sink);
    }

    /// Returns a green tree, equal to the green tree this node belongs to, except with this node substituted.
    /// Only the nodes on the path to the root are rebuilt, so the complexity is proportional to the depth of the
    /// tree.
    pub fn replace_with(&self, replacement: GreenNode) -> GreenNode {
        match self.parent_and_index() {
            None => replacement,
            Some((parent, index)) => {
                let new_parent = parent.green().with_slot(index, Some(replacement.into()));
                parent.replace_with(new_parent)
            }
        }
    }

    fn parent_and_index(&self) -> Option<(SyntaxNode, usize)> {
        let (parent, index) = self.data.parent.as_ref()?;
        let parent = parent.upgrade()?;
        Some((self.with_data(parent), *index as usize))
    }

    /// The index of this node in its parent's slots.
    #[inline]
    pub fn index(&self) -> usize {
        self.data.parent.as_ref().map_or(0, |(_, index)| *index as usize)
    }

    /// The parent node of this node, except if this node is the root.
    #[inline]
    pub fn parent(&self) -> Option<SyntaxNode> {
        self.parent_and_index().map(|(parent, _)| parent)
    }

    /// Returns an iterator along the chain of parents of this node, starting with this node.
    #[inline]
    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode> {
        iter::successors(Some(self.clone()), SyntaxNode::parent)
    }

    /// The number of slots of this node, including absent ones.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.data.green.slot_count()
    }

    /// The element in slot `index`, `None` if the slot is absent.
    pub fn child_at(&self, index: usize) -> Option<SyntaxElement> {
        let green = self.data.green.slot(index)?;
        // token slots are never cached
        let cached = self.data.children[index].read().clone();
        if let Some(data) = cached {
            return Some(NodeOrToken::Node(self.with_data(data)));
        }
        let offset = self.data.offset
            + self
                .data
                .green
                .slots()
                .take(index)
                .flatten()
                .map(|element| element.full_width())
                .sum::<TextSize>();
        Some(self.element(index, green, offset))
    }

    /// Returns an iterator over all nodes that are children of this node.
    ///
    /// If you want to also consider leafs, see [`children_with_tokens`](SyntaxNode::children_with_tokens).
    #[inline]
    pub fn children(&self) -> SyntaxNodeChildren {
        SyntaxNodeChildren::new(self)
    }

    /// Returns an iterator over child elements of this node, including tokens.
    #[inline]
    pub fn children_with_tokens(&self) -> SyntaxElementChildren {
        SyntaxElementChildren::new(self)
    }

    #[inline]
    pub fn first_child(&self) -> Option<SyntaxNode> {
        self.children().next()
    }

    #[inline]
    pub fn first_child_or_token(&self) -> Option<SyntaxElement> {
        self.children_with_tokens().next()
    }

    pub fn last_child(&self) -> Option<SyntaxNode> {
        self.children().last()
    }

    pub fn last_child_or_token(&self) -> Option<SyntaxElement> {
        let (index, green) = (0..self.slot_count())
            .rev()
            .find_map(|index| Some((index, self.data.green.slot(index)?)))?;
        let offset = self.full_span().end() - green.full_width();
        Some(self.element(index, green, offset))
    }

    /// The element after slot `index`, which ends at `end`.
    pub(super) fn next_child_or_token_after(&self, index: usize, end: TextSize) -> Option<SyntaxElement> {
        let (index, green) = (index + 1..self.slot_count())
            .find_map(|index| Some((index, self.data.green.slot(index)?)))?;
        Some(self.element(index, green, end))
    }

    /// The element before slot `index`, which starts at `start`.
    pub(super) fn prev_child_or_token_before(&self, index: usize, start: TextSize) -> Option<SyntaxElement> {
        let (index, green) = (0..index)
            .rev()
            .find_map(|index| Some((index, self.data.green.slot(index)?)))?;
        Some(self.element(index, green, start - green.full_width()))
    }

    pub fn next_sibling(&self) -> Option<SyntaxNode> {
        iter::successors(self.next_sibling_or_token(), SyntaxElement::next_sibling_or_token)
            .find_map(SyntaxElement::into_node)
    }

    pub fn next_sibling_or_token(&self) -> Option<SyntaxElement> {
        let (parent, index) = self.parent_and_index()?;
        parent.next_child_or_token_after(index, self.full_span().end())
    }

    pub fn prev_sibling(&self) -> Option<SyntaxNode> {
        iter::successors(self.prev_sibling_or_token(), SyntaxElement::prev_sibling_or_token)
            .find_map(SyntaxElement::into_node)
    }

    pub fn prev_sibling_or_token(&self) -> Option<SyntaxElement> {
        let (parent, index) = self.parent_and_index()?;
        parent.prev_child_or_token_before(index, self.full_span().start())
    }

    /// Return the leftmost token in the subtree of this node.
    pub fn first_token(&self) -> Option<SyntaxToken> {
        self.children_with_tokens().find_map(|child| match child {
            NodeOrToken::Node(node) => node.first_token(),
            NodeOrToken::Token(token) => Some(token),
        })
    }

    /// Return the rightmost token in the subtree of this node.
    pub fn last_token(&self) -> Option<SyntaxToken> {
        let mut child = self.last_child_or_token();
        while let Some(element) = child {
            match element {
                NodeOrToken::Token(token) => return Some(token),
                NodeOrToken::Node(node) => {
                    if let Some(token) = node.last_token() {
                        return Some(token);
                    }
                    child = node.prev_sibling_or_token();
                }
            }
        }
        None
    }

    /// Returns an iterator over all sibling nodes of this node in the given `direction`, starting with this node.
    pub fn siblings(&self, direction: Direction) -> impl Iterator<Item = SyntaxNode> {
        iter::successors(Some(self.clone()), move |node| match direction {
            Direction::Next => node.next_sibling(),
            Direction::Prev => node.prev_sibling(),
        })
    }

    /// Returns an iterator over all siblings of this node in the given `direction`, starting with this node.
    pub fn siblings_with_tokens(&self, direction: Direction) -> impl Iterator<Item = SyntaxElement> {
        let me: SyntaxElement = self.clone().into();
        iter::successors(Some(me), move |element| match direction {
            Direction::Next => element.next_sibling_or_token(),
            Direction::Prev => element.prev_sibling_or_token(),
        })
    }

    /// Returns an iterator over all nodes in the subtree of this node, including this node, in preorder.
    pub fn descendants(&self) -> impl Iterator<Item = SyntaxNode> {
        self.preorder().filter_map(|event| match event {
            WalkEvent::Enter(node) => Some(node),
            WalkEvent::Leave(_) => None,
        })
    }

    /// Returns an iterator over all elements in the subtree of this node, including this node, in preorder.
    pub fn descendants_with_tokens(&self) -> impl Iterator<Item = SyntaxElement> {
        self.preorder_with_tokens().filter_map(|event| match event {
            WalkEvent::Enter(element) => Some(element),
            WalkEvent::Leave(_) => None,
        })
    }

    /// Traverse the subtree rooted at the current node (including the current node) in preorder, excluding tokens.
    #[inline]
    pub fn preorder(&self) -> Preorder {
        Preorder::new(self.clone())
    }

    /// Traverse the subtree rooted at the current node (including the current node) in preorder, including tokens.
    #[inline]
    pub fn preorder_with_tokens(&self) -> PreorderWithTokens {
        PreorderWithTokens::new(self.clone())
    }

    /// Find the token in the subtree of this node whose full span covers the offset. An offset between two tokens
    /// yields both.
    ///
    /// # Panics
    /// If the offset is outside of this node's full span.
    pub fn token_at_offset(&self, offset: TextSize) -> TokenAtOffset<SyntaxToken> {
        let range = self.full_span();
        assert!(
            range.start() <= offset && offset <= range.end(),
            "Bad offset: range {range:?} offset {offset:?}"
        );
        if range.is_empty() {
            return TokenAtOffset::None;
        }

        let mut children = self.children_with_tokens().filter(|child| {
            let child_range = child.full_span();
            !child_range.is_empty() && child_range.start() <= offset && offset <= child_range.end()
        });

        let Some(left) = children.next() else {
            return TokenAtOffset::None;
        };
        match children.next() {
            Some(right) => match (left.token_at_offset(offset), right.token_at_offset(offset)) {
                (TokenAtOffset::Single(left), TokenAtOffset::Single(right)) => TokenAtOffset::Between(left, right),
                (left, right) => left.right_biased().or(right.left_biased()).map_or(TokenAtOffset::None, TokenAtOffset::Single),
            },
            None => left.token_at_offset(offset),
        }
    }

    /// Return the deepest node or token in the current subtree whose full span contains the range. If the range is
    /// empty and is contained in two leaves, either one can be returned.
    ///
    /// # Panics
    /// If the range is not contained in this node's full span.
    pub fn covering_element(&self, range: TextRange) -> SyntaxElement {
        let mut res: SyntaxElement = self.clone().into();
        loop {
            assert!(
                res.full_span().contains_range(range),
                "Bad range: node range {:?}, range {:?}",
                res.full_span(),
                range,
            );
            res = match &res {
                NodeOrToken::Token(_) => return res,
                NodeOrToken::Node(node) => match node
                    .children_with_tokens()
                    .find(|child| child.full_span().contains_range(range))
                {
                    Some(child) => child,
                    None => return res,
                },
            };
        }
    }
}

// Identity within one tree: a green node occurs at most once at a given offset on a root path.
impl PartialEq for SyntaxNode {
    fn eq(&self, other: &SyntaxNode) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
            || (Arc::ptr_eq(&self.tree, &other.tree)
                && self.data.green.ptr_eq(&other.data.green)
                && self.data.offset == other.data.offset)
    }
}

impl Eq for SyntaxNode {}

impl Hash for SyntaxNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.data.offset.hash(state);
    }
}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxNode")
            .field("kind", &self.kind())
            .field("full_span", &self.full_span())
            .finish()
    }
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_text())
    }
}
