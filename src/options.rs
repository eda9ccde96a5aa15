/// Knobs for a single parse.
///
/// Options are stored in the resulting [`SyntaxTree`](crate::SyntaxTree); incremental reparses of that tree keep
/// using them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde1", serde(default))]
pub struct ParseOptions {
    /// Nesting limit for statements, type declarations and sub-expressions. Deeper input is cut off with a
    /// `TooDeeplyNested` diagnostic instead of recursing further.
    pub max_depth:              usize,
    /// Whether incremental reparses may splice subtrees of the previous tree. Turning this off still re-uses old
    /// tokens but re-parses every node.
    pub reuse_nodes:            bool,
    /// Lex `///` comments as [`DocumentationComment`](crate::SyntaxKind::DocumentationComment) trivia.
    pub documentation_comments: bool,
}

impl ParseOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_node_reuse(mut self, reuse_nodes: bool) -> Self {
        self.reuse_nodes = reuse_nodes;
        self
    }

    pub fn with_documentation_comments(mut self, documentation_comments: bool) -> Self {
        self.documentation_comments = documentation_comments;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth:              Self::DEFAULT_MAX_DEPTH,
            reuse_nodes:            true,
            documentation_comments: true,
        }
    }
}

#[cfg(all(test, feature = "serde1"))]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let options: ParseOptions = serde_json::from_str(r#"{ "max_depth": 12 }"#).unwrap();
        assert_eq!(options, ParseOptions::default().with_max_depth(12));
    }
}
