use std::{fmt, ops};

/// Annotation bits of a green element. On nodes, every bit is the union over all children.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GreenFlags(u8);

impl GreenFlags {
    pub const NONE: GreenFlags = GreenFlags(0);
    /// The element is (or contains) a token synthesized by error recovery.
    pub const IS_MISSING: GreenFlags = GreenFlags(1 << 0);
    pub const CONTAINS_DIAGNOSTICS: GreenFlags = GreenFlags(1 << 1);
    pub const CONTAINS_SKIPPED: GreenFlags = GreenFlags(1 << 2);
    /// The token was lexed while inside an interpolated string.
    pub const IN_INTERPOLATION: GreenFlags = GreenFlags(1 << 3);

    /// Bits a token carries on its own, independent of its trivia.
    pub(crate) const TOKEN_OWN: GreenFlags = GreenFlags(Self::IS_MISSING.0 | Self::IN_INTERPOLATION.0);

    #[inline]
    pub fn contains(self, other: GreenFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn intersects(self, other: GreenFlags) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl ops::BitOr for GreenFlags {
    type Output = GreenFlags;

    #[inline]
    fn bitor(self, rhs: GreenFlags) -> GreenFlags {
        GreenFlags(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for GreenFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: GreenFlags) {
        self.0 |= rhs.0;
    }
}

impl ops::BitAnd for GreenFlags {
    type Output = GreenFlags;

    #[inline]
    fn bitand(self, rhs: GreenFlags) -> GreenFlags {
        GreenFlags(self.0 & rhs.0)
    }
}

impl fmt::Debug for GreenFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (GreenFlags::IS_MISSING, "IS_MISSING"),
            (GreenFlags::CONTAINS_DIAGNOSTICS, "CONTAINS_DIAGNOSTICS"),
            (GreenFlags::CONTAINS_SKIPPED, "CONTAINS_SKIPPED"),
            (GreenFlags::IN_INTERPOLATION, "IN_INTERPOLATION"),
        ];
        let mut set = f.debug_set();
        for (flag, name) in names {
            if self.contains(flag) {
                set.entry(&format_args!("{name}"));
            }
        }
        set.finish()
    }
}
