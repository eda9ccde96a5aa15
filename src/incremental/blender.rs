use text_size::TextSize;

use super::cursor::{self, OldTokens};
use crate::{
    green::{GreenFlags, GreenNode, GreenToken, TokenInterner},
    lexer::{is_at_line_start, Lexer, LexerMode},
    parser::TokenSource,
    SyntaxKind, TextChangeRange,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Replaying old tokens in front of the restart point.
    Prefix,
    /// Lexing the new text.
    Relex,
    /// Replaying old tokens after the lexers resynchronized.
    Suffix,
}

/// Where old and new token streams meet again after the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Resync {
    pub(super) new: TextSize,
    pub(super) old: TextSize,
}

/// Mixes the tokens of a previous tree with freshly lexed tokens of the new text, and offers old nodes for reuse
/// where the parser is in unchanged territory.
#[derive(Debug)]
pub(super) struct Blender<'a> {
    old_root:    &'a GreenNode,
    old_text:    &'a str,
    new_text:    &'a str,
    change:      TextChangeRange,
    restart:     TextSize,
    reuse_limit: TextSize,
    phase:       Phase,
    old_tokens:  OldTokens<'a>,
    lexer:       Lexer<'a>,
    /// New-text full start of the next token to hand out.
    position:    TextSize,
    resync:      Option<Resync>,
    eof:         Option<GreenToken>,
}

impl<'a> Blender<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        old_root: &'a GreenNode,
        old_text: &'a str,
        new_text: &'a str,
        change: TextChangeRange,
        restart: TextSize,
        reuse_limit: TextSize,
        interner: &'a TokenInterner,
        documentation_comments: bool,
    ) -> Self {
        let lexer = Lexer::with_mode(new_text, restart, LexerMode::base(), interner)
            .with_documentation_comments(documentation_comments);
        let mut blender = Self {
            old_root,
            old_text,
            new_text,
            change,
            restart,
            reuse_limit,
            phase: Phase::Prefix,
            old_tokens: OldTokens::starting_at(old_root, 0.into()),
            lexer,
            position: 0.into(),
            resync: None,
            eof: None,
        };
        blender.enter_prefix(0.into());
        blender
    }

    pub(super) fn resync(&self) -> Option<Resync> {
        self.resync
    }

    fn enter_prefix(&mut self, position: TextSize) {
        self.position = position;
        self.resync = None;
        if position < self.restart {
            self.phase = Phase::Prefix;
            self.old_tokens = OldTokens::starting_at(self.old_root, position);
        } else {
            self.enter_relex();
        }
    }

    fn enter_relex(&mut self) {
        self.phase = Phase::Relex;
        self.position = self.restart;
        self.lexer.reset(self.restart, LexerMode::base());
    }

    fn enter_suffix(&mut self, resync: Resync) {
        self.phase = Phase::Suffix;
        self.position = resync.new;
        self.resync = Some(resync);
        self.old_tokens = OldTokens::starting_at(self.old_root, resync.old);
    }

    /// Old position matching the new `position` behind the change.
    fn map_to_old(&self, position: TextSize) -> TextSize {
        match self.resync {
            Some(resync) => position - resync.new + resync.old,
            None => self.change.map_new(position),
        }
    }

    /// Checks whether the old token stream can take over at the current new position.
    fn try_resync(&self) -> Option<Resync> {
        if self.position < self.change.new_end() || !self.lexer.mode().is_base() {
            return None;
        }
        let old = self.change.map_new(self.position);
        if old > TextSize::of(self.old_text) {
            return None;
        }
        let (start, token) = cursor::token_at(self.old_root, old)?;
        let resumable = start == old
            && !token.flags().contains(GreenFlags::IN_INTERPOLATION)
            && is_at_line_start(self.old_text, old) == is_at_line_start(self.new_text, self.position);
        resumable.then_some(Resync {
            new: self.position,
            old,
        })
    }

    fn next_old_token(&mut self) -> GreenToken {
        match self.old_tokens.next() {
            Some((_, token)) => {
                if token.kind() == SyntaxKind::EndOfFile {
                    self.eof = Some(token.clone());
                }
                token
            }
            // old streams end with their end-of-file token, which is repeated from then on
            None => match &self.eof {
                Some(eof) => eof.clone(),
                None => self.lexer.next_token(),
            },
        }
    }
}

impl TokenSource for Blender<'_> {
    fn next_token(&mut self) -> GreenToken {
        match self.phase {
            Phase::Prefix => {
                let token = self.next_old_token();
                self.position += token.full_width();
                if self.position >= self.restart {
                    self.enter_relex();
                }
                token
            }
            Phase::Relex => {
                let token = self.lexer.next_token();
                self.position = self.lexer.position();
                if token.kind() != SyntaxKind::EndOfFile {
                    if let Some(resync) = self.try_resync() {
                        self.enter_suffix(resync);
                    }
                }
                token
            }
            Phase::Suffix => {
                let token = self.next_old_token();
                self.position += token.full_width();
                token
            }
        }
    }

    fn reusable_nodes(&mut self, position: TextSize) -> Vec<GreenNode> {
        if position < self.restart {
            let mut nodes = cursor::nodes_at(self.old_root, position);
            nodes.retain(|node| position + node.full_width() <= self.reuse_limit);
            return nodes;
        }
        match self.resync {
            Some(resync) if position >= resync.new => cursor::nodes_at(self.old_root, self.map_to_old(position)),
            _ => Vec::new(),
        }
    }

    fn reset_to(&mut self, position: TextSize) {
        match self.resync {
            Some(resync) if position >= resync.new => {
                self.phase = Phase::Suffix;
                self.position = position;
                self.old_tokens = OldTokens::starting_at(self.old_root, self.map_to_old(position));
            }
            _ => self.enter_prefix(position),
        }
    }
}
