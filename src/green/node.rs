use std::{
    fmt,
    hash::{Hash, Hasher},
    ptr, slice,
};

use fxhash::FxHasher32;
use text_size::TextSize;
use triomphe::{Arc, HeaderWithLength, ThinArc};

use crate::{
    green::{Children, GreenElement, GreenElementRef, GreenFlags, GreenToken, Slots, TokenInterner, Tokens},
    NodeOrToken, SyntaxKind,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) struct GreenNodeHead {
    pub(super) kind:           SyntaxKind,
    pub(super) flags:          GreenFlags,
    pub(super) height:         u16,
    pub(super) full_width:     TextSize,
    pub(super) leading_width:  TextSize,
    pub(super) trailing_width: TextSize,
    pub(super) child_hash:     u32,
}

impl GreenNodeHead {
    /// Computes widths, flags, height and the child hash once, at construction.
    pub(super) fn compute(kind: SyntaxKind, slots: &[Option<GreenElement>]) -> Self {
        let mut hasher = FxHasher32::default();
        let mut full_width = TextSize::from(0);
        let mut flags = GreenFlags::NONE;
        let mut height = 0;
        for slot in slots {
            slot.hash(&mut hasher);
            if let Some(element) = slot {
                full_width += element.full_width();
                flags |= element.flags();
                height = height.max(element.height());
            }
        }
        // outer trivia belongs to the first and last token that actually cover text
        let mut present = slots.iter().flatten().filter(|element| element.full_width() > TextSize::from(0));
        let leading_width = present.clone().next().map_or(0.into(), GreenElement::leading_trivia_width);
        let trailing_width = present.next_back().map_or(0.into(), GreenElement::trailing_trivia_width);
        Self {
            kind,
            flags,
            height: height.saturating_add(1),
            full_width,
            leading_width,
            trailing_width,
            child_hash: hasher.finish() as u32,
        }
    }
}

/// Internal node in the immutable "green" tree.
/// It contains other nodes and tokens as its children. Optional parts of a production are absent slots.
#[derive(Clone)]
pub struct GreenNode {
    pub(super) data: ThinArc<GreenNodeHead, Option<GreenElement>>,
}

impl fmt::Debug for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = &self.data.header.header;
        f.debug_struct("GreenNode")
            .field("kind", &head.kind)
            .field("full_width", &head.full_width)
            .field("flags", &head.flags)
            .field("slots", &&self.data.slice)
            .finish()
    }
}

impl GreenNode {
    /// Creates a new node from its child slots.
    #[inline]
    pub fn new<I>(kind: SyntaxKind, slots: I) -> GreenNode
    where
        I: IntoIterator<Item = Option<GreenElement>>,
    {
        let slots: Vec<_> = slots.into_iter().collect();
        let head = GreenNodeHead::compute(kind, &slots);
        Self::from_head_and_slots(head, slots)
    }

    #[inline]
    pub(super) fn from_head_and_slots<I>(head: GreenNodeHead, slots: I) -> GreenNode
    where
        I: IntoIterator<Item = Option<GreenElement>>,
        I::IntoIter: ExactSizeIterator,
    {
        let slots = slots.into_iter();
        let header = HeaderWithLength::new(head, slots.len());
        GreenNode {
            data: Arc::into_thin(Arc::from_header_and_iter(header, slots)),
        }
    }

    #[inline]
    pub(super) fn head(&self) -> &GreenNodeHead {
        &self.data.header.header
    }

    /// [`SyntaxKind`] of this node.
    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.head().kind
    }

    #[inline]
    pub fn flags(&self) -> GreenFlags {
        self.head().flags
    }

    /// Length of the text covered by this node, including the leading trivia of its first token and the trailing
    /// trivia of its last token.
    #[inline]
    pub fn full_width(&self) -> TextSize {
        self.head().full_width
    }

    /// Length of the text covered by this node without its outer trivia.
    #[inline]
    pub fn width(&self) -> TextSize {
        let head = self.head();
        head.full_width - head.leading_width - head.trailing_width
    }

    #[inline]
    pub fn leading_trivia_width(&self) -> TextSize {
        self.head().leading_width
    }

    #[inline]
    pub fn trailing_trivia_width(&self) -> TextSize {
        self.head().trailing_width
    }

    /// Longest path to a token, counted in nodes.
    #[inline]
    pub fn height(&self) -> u16 {
        self.head().height
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.data.slice.len()
    }

    /// The child in slot `index`, `None` if the slot is absent or out of range.
    #[inline]
    pub fn slot(&self, index: usize) -> Option<GreenElementRef<'_>> {
        self.data.slice.get(index)?.as_ref().map(GreenElement::as_ref)
    }

    #[inline]
    pub(crate) fn raw_slots(&self) -> slice::Iter<'_, Option<GreenElement>> {
        self.data.slice.iter()
    }

    /// Iterator over all slots of this node, absent ones included.
    #[inline]
    pub fn slots(&self) -> Slots<'_> {
        Slots::new(self.data.slice.iter())
    }

    /// Iterator over the children of this node, skipping absent slots.
    #[inline]
    pub fn children(&self) -> Children<'_> {
        Children::new(self.data.slice.iter())
    }

    /// All tokens below this node, in document order.
    #[inline]
    pub fn tokens(&self) -> Tokens<'_> {
        Tokens::new(self)
    }

    pub fn first_token(&self) -> Option<&GreenToken> {
        self.children().find_map(|child| match child {
            NodeOrToken::Node(node) => node.first_token(),
            NodeOrToken::Token(token) => Some(token),
        })
    }

    pub fn last_token(&self) -> Option<&GreenToken> {
        self.children().rev().find_map(|child| match child {
            NodeOrToken::Node(node) => node.last_token(),
            NodeOrToken::Token(token) => Some(token),
        })
    }

    /// A copy of this node with slot `index` replaced.
    ///
    /// # Panics
    /// If `index` is out of range.
    pub fn with_slot(&self, index: usize, element: Option<GreenElement>) -> GreenNode {
        assert!(index < self.slot_count(), "slot {index} out of range for {:?}", self.kind());
        let slots = self
            .raw_slots()
            .enumerate()
            .map(|(i, slot)| if i == index { element.clone() } else { slot.clone() });
        GreenNode::new(self.kind(), slots)
    }

    /// Checks that every node's cached width equals the sum of its children's widths.
    pub fn verify_widths(&self) -> bool {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            let sum: TextSize = node.children().map(|child| child.full_width()).sum();
            if sum != node.full_width() {
                return false;
            }
            for child in node.children() {
                match child {
                    NodeOrToken::Node(node) => stack.push(node),
                    NodeOrToken::Token(token) => {
                        let leading: TextSize = token.leading_trivia().iter().map(|trivia| trivia.full_width()).sum();
                        let trailing: TextSize = token.trailing_trivia().iter().map(|trivia| trivia.full_width()).sum();
                        if leading != token.leading_trivia_width() || trailing != token.trailing_trivia_width() {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    pub fn write_full_text(&self, interner: &TokenInterner, out: &mut String) {
        for token in self.tokens() {
            token.write_full_text(interner, out);
        }
    }

    /// Whether both handles point to the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &GreenNode) -> bool {
        ptr::eq(&self.data.header, &other.data.header)
    }
}

impl Hash for GreenNode {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.head().hash(state);
    }
}

impl PartialEq for GreenNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.head() == other.head() && self.data.slice == other.data.slice)
    }
}

impl Eq for GreenNode {}
