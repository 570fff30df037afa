//! Semantic model extracted from parsed Go files.
//!
//! The extractor walks the tree-sitter AST once and produces an ordered
//! event stream (assignments and method calls) plus file-level tables
//! (imports, constants, comments, string literals) that the checks and fix
//! builders consume. No type checker runs here; argument classification is
//! a syntactic heuristic and unknown stays unknown.

pub mod extract;
pub mod model;

pub use extract::extract_semantics;
pub use model::{
    ArgKind, Assignment, CallArg, ConstBlock, ConstDecl, GoFileSemantics, GoFunctionScope,
    GoImport, MethodCall, ReceiverKind, SemanticEvent, TypeClass, VarDefine,
};
