use std::sync::Arc;

use fxhash::FxBuildHasher;
use lasso::{Spur, ThreadedRodeo};

/// The interner deduplicating token and trivia text.
///
/// One interner is shared by a tree and every tree incrementally derived from it, so interned keys stay valid
/// across tree versions.
pub type TokenInterner = ThreadedRodeo<Spur, FxBuildHasher>;

/// Creates an empty interner.
pub fn new_interner() -> Arc<TokenInterner> {
    Arc::new(TokenInterner::with_hasher(FxBuildHasher::default()))
}
