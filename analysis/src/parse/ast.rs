use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Tree};

/// Pass-internal identifier for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(pub u64);

/// A fully parsed Go source file: source text plus the tree-sitter AST.
#[derive(Debug)]
pub struct ParsedFile {
    pub file_id: FileId,
    pub path: String,
    pub source: Arc<String>,
    pub tree: Tree,
}

impl ParsedFile {
    /// Get the exact source text for a node.
    pub fn text_for_node(&self, node: &Node) -> &str {
        &self.source[node.byte_range()]
    }
}
