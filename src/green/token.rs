use std::{fmt, hash, sync::Arc as StdArc};

use lasso::Spur;
use text_size::TextSize;
use triomphe::Arc;

use crate::{
    diagnostics::SyntaxDiagnostic,
    green::{GreenFlags, GreenTrivia, TokenInterner},
    SyntaxKind,
};

/// The value of a literal token, computed once by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TokenValue {
    Integer(u64),
    /// Bits of an `f64`, so the value can be hashed.
    Real(u64),
    Char(char),
    Str(Spur),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GreenTokenData {
    pub(super) kind:           SyntaxKind,
    pub(super) flags:          GreenFlags,
    pub(super) text:           Option<Spur>,
    pub(super) text_len:       TextSize,
    pub(super) value:          Option<TokenValue>,
    pub(super) leading:        Option<StdArc<[GreenTrivia]>>,
    pub(super) leading_width:  TextSize,
    pub(super) trailing:       Option<StdArc<[GreenTrivia]>>,
    pub(super) trailing_width: TextSize,
    pub(super) diagnostics:    Option<StdArc<[SyntaxDiagnostic]>>,
}

/// Everything a token is built from. Widths and flags are derived.
#[derive(Debug)]
pub(crate) struct TokenParts {
    pub(crate) kind:             SyntaxKind,
    pub(crate) text:             Option<Spur>,
    pub(crate) text_len:         TextSize,
    pub(crate) value:            Option<TokenValue>,
    pub(crate) leading:          Vec<GreenTrivia>,
    pub(crate) trailing:         Vec<GreenTrivia>,
    pub(crate) diagnostics:      Vec<SyntaxDiagnostic>,
    pub(crate) in_interpolation: bool,
}

impl TokenParts {
    pub(crate) fn into_data(self) -> GreenTokenData {
        let own = if self.in_interpolation {
            GreenFlags::IN_INTERPOLATION
        } else {
            GreenFlags::NONE
        };
        GreenTokenData::new(
            self.kind,
            own,
            self.text,
            self.text_len,
            self.value,
            self.leading,
            self.trailing,
            self.diagnostics,
        )
    }
}

fn shared<T>(items: Vec<T>) -> Option<StdArc<[T]>> {
    if items.is_empty() {
        None
    } else {
        Some(items.into())
    }
}

fn trivia_flags(trivia: &[GreenTrivia]) -> GreenFlags {
    // every skipped token is reported as invalid; its missing/interpolation bits stay with it
    if trivia.iter().any(|trivia| trivia.as_skipped().is_some()) {
        GreenFlags::CONTAINS_SKIPPED | GreenFlags::CONTAINS_DIAGNOSTICS
    } else {
        GreenFlags::NONE
    }
}

impl GreenTokenData {
    #[allow(clippy::too_many_arguments)]
    fn new(
        kind: SyntaxKind,
        own: GreenFlags,
        text: Option<Spur>,
        text_len: TextSize,
        value: Option<TokenValue>,
        leading: Vec<GreenTrivia>,
        trailing: Vec<GreenTrivia>,
        diagnostics: Vec<SyntaxDiagnostic>,
    ) -> Self {
        let mut flags = own & GreenFlags::TOKEN_OWN;
        flags |= trivia_flags(&leading) | trivia_flags(&trailing);
        if !diagnostics.is_empty() {
            flags |= GreenFlags::CONTAINS_DIAGNOSTICS;
        }
        Self {
            kind,
            flags,
            text,
            text_len,
            value,
            leading_width: leading.iter().map(GreenTrivia::full_width).sum(),
            leading: shared(leading),
            trailing_width: trailing.iter().map(GreenTrivia::full_width).sum(),
            trailing: shared(trailing),
            diagnostics: shared(diagnostics),
        }
    }
}

/// Leaf node in the immutable "green" tree.
///
/// A token owns its text (interned), its literal value, its leading and trailing trivia and the diagnostics the
/// lexer or parser attached to it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GreenToken {
    data: Arc<GreenTokenData>,
}

impl GreenToken {
    #[inline]
    pub(crate) fn from_data(data: GreenTokenData) -> GreenToken {
        GreenToken { data: Arc::new(data) }
    }

    /// A zero-width token inserted by error recovery, carrying the diagnostic explaining what was expected.
    pub(crate) fn missing(kind: SyntaxKind, diagnostic: SyntaxDiagnostic) -> GreenToken {
        Self::from_data(GreenTokenData::new(
            kind,
            GreenFlags::IS_MISSING,
            None,
            0.into(),
            None,
            Vec::new(),
            Vec::new(),
            vec![diagnostic],
        ))
    }

    /// This token with `skipped` tokens in front of its leading trivia.
    pub(crate) fn with_skipped(&self, skipped: impl IntoIterator<Item = GreenToken>) -> GreenToken {
        let mut leading: Vec<GreenTrivia> = skipped.into_iter().map(GreenTrivia::Skipped).collect();
        if leading.is_empty() {
            return self.clone();
        }
        leading.extend(self.leading_trivia().iter().cloned());
        self.rebuild(leading)
    }

    /// Splits off skipped tokens at the front of the leading trivia, giving back the token stream the lexer
    /// produced. Returns the skipped tokens and the token without them.
    pub(crate) fn unmerge(&self) -> (Vec<GreenToken>, GreenToken) {
        if !self.data.flags.contains(GreenFlags::CONTAINS_SKIPPED) {
            return (Vec::new(), self.clone());
        }
        let leading = self.leading_trivia();
        let split = leading.iter().take_while(|trivia| trivia.as_skipped().is_some()).count();
        let skipped = leading[..split].iter().filter_map(GreenTrivia::as_skipped).cloned().collect();
        (skipped, self.rebuild(leading[split..].to_vec()))
    }

    fn rebuild(&self, leading: Vec<GreenTrivia>) -> GreenToken {
        let data = &self.data;
        Self::from_data(GreenTokenData::new(
            data.kind,
            data.flags,
            data.text,
            data.text_len,
            data.value,
            leading,
            self.trailing_trivia().to_vec(),
            self.diagnostics().to_vec(),
        ))
    }

    /// [`SyntaxKind`] of this token.
    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    #[inline]
    pub fn flags(&self) -> GreenFlags {
        self.data.flags
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.data.flags.contains(GreenFlags::IS_MISSING)
    }

    /// The token's text, without trivia. Missing tokens have empty text.
    #[inline]
    pub fn text<'i>(&self, interner: &'i TokenInterner) -> &'i str {
        match self.data.text {
            Some(key) => interner.resolve(&key),
            None if self.is_missing() => "",
            None => self.data.kind.static_text().unwrap_or(""),
        }
    }

    /// Returns the interned key of the text of this token, `None` for tokens with static text.
    #[inline]
    pub fn text_key(&self) -> Option<Spur> {
        self.data.text
    }

    /// Length of the token's text, without trivia.
    #[inline]
    pub fn text_len(&self) -> TextSize {
        self.data.text_len
    }

    #[inline]
    pub fn leading_trivia_width(&self) -> TextSize {
        self.data.leading_width
    }

    #[inline]
    pub fn trailing_trivia_width(&self) -> TextSize {
        self.data.trailing_width
    }

    /// Length of the token's text including its leading and trailing trivia.
    #[inline]
    pub fn full_width(&self) -> TextSize {
        self.data.leading_width + self.data.text_len + self.data.trailing_width
    }

    #[inline]
    pub fn leading_trivia(&self) -> &[GreenTrivia] {
        self.data.leading.as_deref().unwrap_or(&[])
    }

    #[inline]
    pub fn trailing_trivia(&self) -> &[GreenTrivia] {
        self.data.trailing.as_deref().unwrap_or(&[])
    }

    #[inline]
    pub(crate) fn value(&self) -> Option<TokenValue> {
        self.data.value
    }

    #[inline]
    pub(crate) fn diagnostics(&self) -> &[SyntaxDiagnostic] {
        self.data.diagnostics.as_deref().unwrap_or(&[])
    }

    pub fn write_full_text(&self, interner: &TokenInterner, out: &mut String) {
        for trivia in self.leading_trivia() {
            trivia.write_text(interner, out);
        }
        out.push_str(self.text(interner));
        for trivia in self.trailing_trivia() {
            trivia.write_text(interner, out);
        }
    }

    /// Whether both handles point to the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &GreenToken) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Debug for GreenToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = &*self.data;
        f.debug_struct("GreenToken")
            .field("kind", &data.kind)
            .field("text", &data.text)
            .field("full_width", &self.full_width())
            .field("flags", &data.flags)
            .finish()
    }
}

// trivia, values and diagnostics are left out of the hash
impl hash::Hash for GreenTokenData {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.flags.hash(state);
        self.text.hash(state);
        self.text_len.hash(state);
        self.leading_width.hash(state);
        self.trailing_width.hash(state);
    }
}
