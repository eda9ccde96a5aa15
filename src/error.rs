use text_size::{TextRange, TextSize};
use thiserror::Error;

use crate::text::Encoding;

/// Errors from constructing or editing a [`SourceText`](crate::SourceText).
///
/// Malformed *source code* never produces an error; it produces diagnostics in the tree instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("invalid {encoding} byte sequence at offset {position}")]
    Decoding { encoding: Encoding, position: usize },
    #[error("change range {span:?} is out of bounds or splits a character in text of length {len:?}")]
    InvalidChangeRange { span: TextRange, len: TextSize },
    #[error("change {next:?} overlaps or precedes change {previous:?}")]
    UnorderedChanges { previous: TextRange, next: TextRange },
}
