pub mod ast;
pub mod go;

pub use ast::{FileId, ParsedFile};
pub use go::parse_go_file;
