use fxhash::FxHashMap;

use crate::{
    green::{GreenElement, GreenNode, GreenToken},
    utility_types::MaybeOwned,
    NodeOrToken, SyntaxKind,
};

use super::node::GreenNodeHead;

/// If a node has at most this many slots, we will not create a new [`GreenNode`] but look it up in the cache first.
/// Small nodes (names, literals, argument lists of one argument) repeat a lot in real code.
const CHILDREN_CACHE_THRESHOLD: usize = 3;

/// A `NodeCache` deduplicates identical small nodes during tree construction.
/// You can re-use the same cache for multiple trees with [`GreenNodeBuilder::with_cache`].
#[derive(Debug, Default)]
pub struct NodeCache {
    nodes: FxHashMap<GreenNodeHead, GreenNode>,
}

impl NodeCache {
    /// Constructs a new, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct nodes stored in the cache.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&mut self, kind: SyntaxKind, all_slots: &mut Vec<Option<GreenElement>>, offset: usize) -> GreenNode {
        // NOTE: this fn must remove all slots starting at `offset` from `all_slots` before returning
        let head = GreenNodeHead::compute(kind, &all_slots[offset..]);
        let slots = all_slots.drain(offset..);
        if slots.len() > CHILDREN_CACHE_THRESHOLD {
            return GreenNode::from_head_and_slots(head, slots);
        }

        // the head only carries a hash of the children, so a hit still has to compare them
        match self.nodes.get(&head) {
            Some(cached) if cached.raw_slots().eq(slots.as_slice().iter()) => cached.clone(),
            Some(_) => GreenNode::from_head_and_slots(head, slots),
            None => {
                let node = GreenNode::from_head_and_slots(head.clone(), slots);
                self.nodes.insert(head, node.clone());
                node
            }
        }
    }
}

/// A checkpoint for maybe wrapping a node. See [`GreenNodeBuilder::checkpoint`] for details.
#[derive(Clone, Copy, Debug)]
pub struct Checkpoint(usize);

/// A builder for green trees.
///
/// Start nodes with [`start_node`](GreenNodeBuilder::start_node), add [`token`](GreenNodeBuilder::token)s, complete
/// child [`node`](GreenNodeBuilder::node)s and [`absent`](GreenNodeBuilder::absent) slots, then
/// [`finish_node`](GreenNodeBuilder::finish_node). When the whole tree is constructed, call
/// [`finish`](GreenNodeBuilder::finish) to obtain the root.
#[derive(Debug)]
pub struct GreenNodeBuilder<'cache> {
    cache:    MaybeOwned<'cache, NodeCache>,
    parents:  Vec<(SyntaxKind, usize)>,
    children: Vec<Option<GreenElement>>,
}

impl GreenNodeBuilder<'static> {
    /// Creates new builder with an empty [`NodeCache`].
    pub fn new() -> Self {
        Self {
            cache:    MaybeOwned::Owned(NodeCache::new()),
            parents:  Vec::with_capacity(8),
            children: Vec::with_capacity(8),
        }
    }
}

impl Default for GreenNodeBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'cache> GreenNodeBuilder<'cache> {
    /// Reusing a [`NodeCache`] between multiple builders saves memory, as it allows to structurally share
    /// underlying trees.
    pub fn with_cache(cache: &'cache mut NodeCache) -> Self {
        Self {
            cache:    MaybeOwned::Borrowed(cache),
            parents:  Vec::with_capacity(8),
            children: Vec::with_capacity(8),
        }
    }

    /// Add a token to the current node.
    #[inline]
    pub fn token(&mut self, token: GreenToken) {
        self.children.push(Some(token.into()));
    }

    /// Add a complete node to the current node. Used to splice in reused subtrees.
    #[inline]
    pub fn node(&mut self, node: GreenNode) {
        self.children.push(Some(node.into()));
    }

    /// Add an absent slot to the current node, for an optional part of a production that is not there.
    #[inline]
    pub fn absent(&mut self) {
        self.children.push(None);
    }

    /// Start new node of the given `kind` and make it current.
    #[inline]
    pub fn start_node(&mut self, kind: SyntaxKind) {
        let len = self.children.len();
        self.parents.push((kind, len));
    }

    /// Finish the current node and restore the previous node as current.
    ///
    /// # Panics
    /// If there is no started node.
    #[inline]
    pub fn finish_node(&mut self) {
        let Some((kind, first_child)) = self.parents.pop() else {
            panic!("`finish_node` called without a matching `start_node`");
        };
        let node = self.cache.node(kind, &mut self.children, first_child);
        self.children.push(Some(node.into()));
    }

    /// Prepare for maybe wrapping the next elements with a surrounding node.
    ///
    /// The way wrapping works is that you first get a checkpoint, then you add nodes and tokens as normal, and then
    /// you *maybe* call [`start_node_at`](GreenNodeBuilder::start_node_at). The parser uses this for binary
    /// expressions, where the operator decides the node kind only after the left operand was built.
    #[inline]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.children.len())
    }

    /// Height of the tallest element added since `checkpoint`, or `0` if there is none.
    pub fn height_since(&self, checkpoint: Checkpoint) -> u16 {
        let Checkpoint(checkpoint) = checkpoint;
        self.children
            .get(checkpoint..)
            .unwrap_or_default()
            .iter()
            .flatten()
            .map(GreenElement::height)
            .max()
            .unwrap_or(0)
    }

    /// Wrap the elements added since `checkpoint` in a new node and make it current.
    #[inline]
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        let Checkpoint(checkpoint) = checkpoint;
        assert!(
            checkpoint <= self.children.len(),
            "checkpoint no longer valid, was finish_node called early?"
        );

        if let Some(&(_, first_child)) = self.parents.last() {
            assert!(
                checkpoint >= first_child,
                "checkpoint no longer valid, was an unmatched start_node_at called?"
            );
        }

        self.parents.push((kind, checkpoint));
    }

    /// Complete building the tree.
    ///
    /// Make sure that calls to [`start_node`](GreenNodeBuilder::start_node) /
    /// [`start_node_at`](GreenNodeBuilder::start_node_at) and [`finish_node`](GreenNodeBuilder::finish_node) are
    /// balanced, i.e. that every started node has been completed!
    pub fn finish(mut self) -> GreenNode {
        assert!(self.parents.is_empty(), "unfinished nodes: {:?}", self.parents);
        assert_eq!(self.children.len(), 1, "a tree needs exactly one root");
        match self.children.pop() {
            Some(Some(NodeOrToken::Node(node))) => node,
            _ => panic!("called `finish` on a `GreenNodeBuilder` whose root is not a node"),
        }
    }
}
