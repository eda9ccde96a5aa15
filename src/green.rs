//! Implementation of the inner, "green" tree.
//!
//! Green nodes and tokens are immutable, position independent and shared: the same subtree may appear in many trees
//! at once, which is what makes incremental reparsing cheap. The [`GreenNodeBuilder`] is the entry point to
//! constructing [`GreenNode`]s; tokens come out of the lexer.

mod builder;
mod element;
mod flags;
mod interner;
mod iter;
mod node;
mod token;
mod trivia;

pub use self::{
    builder::{Checkpoint, GreenNodeBuilder, NodeCache},
    element::{GreenElement, GreenElementRef},
    flags::GreenFlags,
    interner::{new_interner, TokenInterner},
    iter::{Children, Slots, Tokens},
    node::GreenNode,
    token::GreenToken,
    trivia::GreenTrivia,
};

pub(crate) use self::token::{GreenTokenData, TokenParts, TokenValue};

#[cfg(test)]
mod tests {
    use super::*;
    use node::GreenNodeHead;

    #[test]
    #[cfg_attr(miri, ignore)]
    fn assert_send_sync() {
        fn f<T: Send + Sync>() {}
        f::<GreenNode>();
        f::<GreenToken>();
        f::<GreenTrivia>();
        f::<GreenElement>();
        f::<TokenInterner>();
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    #[rustfmt::skip]
    fn assert_green_sizes() {
        use std::mem::size_of;

        assert_eq!(size_of::<GreenNode>(),     size_of::<*const u8>());
        assert_eq!(size_of::<GreenToken>(),    size_of::<*const u8>());
        assert_eq!(size_of::<GreenNodeHead>(), size_of::<u32>() * 6);
        assert_eq!(size_of::<GreenElement>(),  size_of::<*const u8>() * 2);
    }
}
