use text_size::TextSize;

use crate::{
    green::{GreenFlags, GreenNode, GreenToken},
    NodeOrToken, SyntaxKind,
};

pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;
pub type GreenElementRef<'a> = NodeOrToken<&'a GreenNode, &'a GreenToken>;

impl From<GreenNode> for GreenElement {
    #[inline]
    fn from(node: GreenNode) -> GreenElement {
        NodeOrToken::Node(node)
    }
}

impl From<GreenToken> for GreenElement {
    #[inline]
    fn from(token: GreenToken) -> GreenElement {
        NodeOrToken::Token(token)
    }
}

impl<'a> From<&'a GreenNode> for GreenElementRef<'a> {
    #[inline]
    fn from(node: &'a GreenNode) -> GreenElementRef<'a> {
        NodeOrToken::Node(node)
    }
}

impl<'a> From<&'a GreenToken> for GreenElementRef<'a> {
    #[inline]
    fn from(token: &'a GreenToken) -> GreenElementRef<'a> {
        NodeOrToken::Token(token)
    }
}

macro_rules! forward {
    ($($(#[$attr:meta])* fn $name:ident(&self) -> $ret:ty;)*) => {
        impl GreenElement {
            $(
                $(#[$attr])*
                #[inline]
                pub fn $name(&self) -> $ret {
                    match self {
                        NodeOrToken::Node(it) => it.$name(),
                        NodeOrToken::Token(it) => it.$name(),
                    }
                }
            )*
        }

        impl GreenElementRef<'_> {
            $(
                $(#[$attr])*
                #[inline]
                pub fn $name(&self) -> $ret {
                    match self {
                        NodeOrToken::Node(it) => it.$name(),
                        NodeOrToken::Token(it) => it.$name(),
                    }
                }
            )*
        }
    };
}

forward! {
    fn kind(&self) -> SyntaxKind;
    fn flags(&self) -> GreenFlags;
    /// Width including the outer leading and trailing trivia.
    fn full_width(&self) -> TextSize;
    fn leading_trivia_width(&self) -> TextSize;
    fn trailing_trivia_width(&self) -> TextSize;
}

impl GreenElement {
    /// Tokens have height 0.
    #[inline]
    pub fn height(&self) -> u16 {
        self.as_ref().height()
    }
}

impl GreenElementRef<'_> {
    #[inline]
    pub fn height(&self) -> u16 {
        match self {
            NodeOrToken::Node(node) => node.height(),
            NodeOrToken::Token(_) => 0,
        }
    }
}
