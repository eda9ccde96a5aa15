//! Implementation of the outer, "red" tree.
//!
//! Red [`SyntaxNode`]s add absolute positions and parent pointers to green nodes. They are created lazily while
//! the tree is navigated and cached per slot, so every node is materialized at most once per tree (up to benign
//! races between threads). Leaf [`SyntaxToken`]s and [`SyntaxTrivia`] are lightweight values created on access.
//! Use [`SyntaxNode::new_root`] to construct a red tree on top of a green tree.

mod element;
pub use element::SyntaxElement;
mod iter;
pub use iter::{Preorder, PreorderWithTokens, SyntaxElementChildren, SyntaxNodeChildren};
mod node;
pub use node::SyntaxNode;
mod token;
pub use token::{SyntaxToken, Value};
mod trivia;
pub use trivia::SyntaxTrivia;
