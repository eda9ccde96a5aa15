/// One open interpolated string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) enum Frame {
    /// Between `$"` and `"`, outside of holes.
    Text { verbatim: bool },
    /// Inside `{ ... }`; `braces` counts unmatched `{` opened within the hole.
    Hole { verbatim: bool, braces: u32 },
}

/// The lexer state that is not derivable from the text: the stack of open interpolated strings.
///
/// The empty stack is the base mode. Only tokens lexed in base mode can start or end an incrementally relexed
/// region, since everything else depends on how the lexer got there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LexerMode {
    frames: Vec<Frame>,
}

impl LexerMode {
    /// The mode at the start of a file.
    #[inline]
    pub fn base() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_base(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of interpolated strings the lexer is inside of.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Whether the lexer is in the text part of an interpolated string.
    #[inline]
    pub fn in_text(&self) -> bool {
        matches!(self.frames.last(), Some(Frame::Text { .. }))
    }

    /// Trivia exists between syntax tokens only, never inside string text.
    #[inline]
    pub(super) fn allows_trivia(&self) -> bool {
        !self.in_text()
    }

    #[inline]
    pub(super) fn top(&self) -> Option<Frame> {
        self.frames.last().copied()
    }

    pub(super) fn push_text(&mut self, verbatim: bool) {
        self.frames.push(Frame::Text { verbatim });
    }

    pub(super) fn pop(&mut self) {
        self.frames.pop();
    }

    pub(super) fn clear(&mut self) {
        self.frames.clear();
    }

    pub(super) fn open_brace(&mut self) {
        if let Some(Frame::Hole { braces, .. }) = self.frames.last_mut() {
            *braces += 1;
        }
    }

    /// Returns `true` if the brace closes the current hole.
    pub(super) fn close_brace(&mut self) -> bool {
        let Some(frame) = self.frames.last_mut() else {
            return false;
        };
        match *frame {
            Frame::Hole { verbatim, braces: 0 } => {
                *frame = Frame::Text { verbatim };
                true
            }
            Frame::Hole { verbatim, braces } => {
                *frame = Frame::Hole {
                    verbatim,
                    braces: braces - 1,
                };
                false
            }
            Frame::Text { .. } => false,
        }
    }

    pub(super) fn enter_hole(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            if let Frame::Text { verbatim } = *frame {
                *frame = Frame::Hole { verbatim, braces: 0 };
            }
        }
    }
}
