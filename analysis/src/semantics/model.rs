use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::parse::ast::FileId;

/// Representation of a Go import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoImport {
    /// The import path, e.g. "github.com/willibrandon/mtlog"
    pub path: String,
    /// Optional alias
    pub alias: Option<String>,
    pub start_byte: usize,
    pub end_byte: usize,
}

/// A single constant declaration (one spec inside a const decl).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstDecl {
    pub name: String,
    /// String value when the constant is a string literal.
    pub string_value: Option<String>,
    pub start_byte: usize,
    pub end_byte: usize,
    /// Whether the declaration sits at file scope.
    pub top_level: bool,
}

/// A parenthesized `const (...)` block at file scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstBlock {
    pub start_byte: usize,
    pub end_byte: usize,
    pub names: Vec<String>,
    /// End byte of the last spec inside the block; new entries go after it.
    pub last_spec_end: usize,
}

impl ConstBlock {
    /// Whether the block already holds context-key style constants.
    pub fn looks_like_key_block(&self) -> bool {
        self.names.iter().any(|n| {
            n.ends_with("ContextKey") || n.ends_with("CtxKey") || n.ends_with("Key")
        })
    }
}

/// Syntactic classification of one call argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgKind {
    /// String literal with its unquoted value.
    StringLit { value: String },
    IntLit,
    FloatLit,
    BoolLit,
    NilLit,
    Ident(String),
    /// Field access like `user.Name`.
    Selector,
    /// A nested call; `callee` is the function expression text.
    FuncCall { callee: String },
    /// Composite, slice, map, or function literal (including `&T{...}`);
    /// carries the literal's type text when present.
    Composite { type_name: Option<String> },
    Other,
}

/// Coarse type classes used where the original type checker would answer.
/// `Unknown` makes checks skip silently rather than guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeClass {
    Str,
    Basic,
    Nil,
    Complex,
    Time,
    Error,
    Unknown,
}

const ERROR_FACTORY_CALLEES: &[&str] = &["errors.New", "fmt.Errorf"];
const TIME_CALLEES: &[&str] = &["time.Now", "time.Date", "time.Parse"];

/// Variable names that by convention hold errors.
pub fn is_likely_error_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    matches!(lower.as_str(), "err" | "error" | "e" | "errs" | "errors")
        || name.ends_with("Err")
        || name.ends_with("Error")
        || lower.starts_with("err")
        || lower.starts_with("error")
}

impl ArgKind {
    pub fn type_class(&self) -> TypeClass {
        match self {
            ArgKind::StringLit { .. } => TypeClass::Str,
            ArgKind::IntLit | ArgKind::FloatLit | ArgKind::BoolLit => TypeClass::Basic,
            ArgKind::NilLit => TypeClass::Nil,
            ArgKind::Composite { .. } => TypeClass::Complex,
            ArgKind::FuncCall { callee } => {
                if ERROR_FACTORY_CALLEES.contains(&callee.as_str()) {
                    TypeClass::Error
                } else if TIME_CALLEES.contains(&callee.as_str()) {
                    TypeClass::Time
                } else {
                    TypeClass::Unknown
                }
            }
            ArgKind::Ident(name) => {
                if is_likely_error_name(name) {
                    TypeClass::Error
                } else {
                    TypeClass::Unknown
                }
            }
            ArgKind::Selector | ArgKind::Other => TypeClass::Unknown,
        }
    }

    /// Human description for the With() non-string key message.
    pub fn describe(&self) -> String {
        match self {
            ArgKind::IntLit => "numeric literal".to_string(),
            ArgKind::FloatLit => "float literal".to_string(),
            ArgKind::StringLit { .. } => "string literal".to_string(),
            ArgKind::BoolLit | ArgKind::NilLit => "literal".to_string(),
            ArgKind::Ident(name) => format!("variable '{name}'"),
            ArgKind::Selector => "field or method".to_string(),
            ArgKind::FuncCall { .. } => "function call".to_string(),
            ArgKind::Composite { .. } | ArgKind::Other => "expression".to_string(),
        }
    }

    /// Go type text for capturing-hint messages, when it can be named.
    pub fn type_display(&self) -> Option<String> {
        match self {
            ArgKind::StringLit { .. } => Some("string".to_string()),
            ArgKind::IntLit => Some("int".to_string()),
            ArgKind::FloatLit => Some("float64".to_string()),
            ArgKind::BoolLit => Some("bool".to_string()),
            ArgKind::Composite { type_name } => type_name.clone(),
            ArgKind::FuncCall { callee } if callee == "time.Now" => {
                Some("time.Time".to_string())
            }
            _ => None,
        }
    }
}

/// One argument at a call site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallArg {
    pub text: String,
    pub kind: ArgKind,
    pub start_byte: usize,
    pub end_byte: usize,
    /// 1-based
    pub line: u32,
    pub column: u32,
}

impl CallArg {
    pub fn string_value(&self) -> Option<&str> {
        match &self.kind {
            ArgKind::StringLit { value } => Some(value),
            _ => None,
        }
    }
}

/// What a method call's receiver expression is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReceiverKind {
    /// Plain identifier; a variable or a package qualifier.
    Ident(String),
    /// Chained call, e.g. the `log.With(...)` in `log.With(...).Info(...)`.
    Call(Box<MethodCall>),
    /// Field access like `s.logger`.
    Selector(String),
    Other,
}

/// A `recv.Method(args...)` call site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    pub receiver_text: String,
    pub receiver: ReceiverKind,
    pub args: Vec<CallArg>,
    pub start_byte: usize,
    pub end_byte: usize,
    /// 1-based position of the call expression.
    pub line: u32,
    pub column: u32,
}

impl MethodCall {
    /// Walk the receiver chain down to its base identifier, if any.
    pub fn base_ident(&self) -> Option<&str> {
        match &self.receiver {
            ReceiverKind::Ident(name) => Some(name),
            ReceiverKind::Call(inner) => inner.base_ident(),
            _ => None,
        }
    }

    /// The chain from the base outward, ending with this call.
    pub fn chain(&self) -> Vec<&MethodCall> {
        let mut links = match &self.receiver {
            ReceiverKind::Call(inner) => inner.chain(),
            _ => Vec::new(),
        };
        links.push(self);
        links
    }
}

/// A `name := ...` or `name = ...` binding whose right side is a method call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub name: String,
    pub call: MethodCall,
    pub start_byte: usize,
}

/// Source-ordered stream of the events the checks consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SemanticEvent {
    Assign(Assignment),
    Call(MethodCall),
}

/// A `name := value` define inside a function body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarDefine {
    pub name: String,
    /// 1-based
    pub line: u32,
}

/// Scope facts for one function or method body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoFunctionScope {
    pub name: String,
    pub start_byte: usize,
    pub end_byte: usize,
    /// Parameter and named-result identifiers whose declared type is `error`.
    pub error_params: Vec<String>,
    pub defines: Vec<VarDefine>,
    /// Byte spans of if statements inside the body.
    pub if_spans: Vec<(usize, usize)>,
}

impl GoFunctionScope {
    pub fn contains(&self, byte: usize) -> bool {
        self.start_byte <= byte && byte <= self.end_byte
    }

    pub fn in_if_block(&self, start: usize, end: usize) -> bool {
        self.if_spans
            .iter()
            .any(|&(s, e)| s <= start && end <= e)
    }
}

/// Semantic model for a single Go file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoFileSemantics {
    pub file_id: FileId,
    pub path: String,

    pub package_name: String,
    /// End byte of the package clause.
    pub package_clause_end: usize,

    pub imports: Vec<GoImport>,
    /// End byte of the last import declaration.
    pub last_import_end: Option<usize>,

    pub consts: Vec<ConstDecl>,
    pub const_blocks: Vec<ConstBlock>,
    /// End byte of the last file-scope const declaration.
    pub last_const_end: Option<usize>,

    /// Every declared identifier in the file, for name collision avoidance.
    pub scope_names: HashSet<String>,

    pub functions: Vec<GoFunctionScope>,

    /// Assignments and method calls in source order.
    pub events: Vec<SemanticEvent>,

    /// Line (1-based) to end byte of the last comment on that line.
    pub comments_by_line: HashMap<u32, usize>,
}

impl GoFileSemantics {
    pub fn new(file_id: FileId, path: String) -> Self {
        Self {
            file_id,
            path,
            package_name: String::new(),
            package_clause_end: 0,
            imports: Vec::new(),
            last_import_end: None,
            consts: Vec::new(),
            const_blocks: Vec::new(),
            last_const_end: None,
            scope_names: HashSet::new(),
            functions: Vec::new(),
            events: Vec::new(),
            comments_by_line: HashMap::new(),
        }
    }

    /// Local name of the mtlog package in this file, if imported.
    pub fn mtlog_alias(&self) -> Option<&str> {
        self.imports
            .iter()
            .find(|imp| {
                imp.path.contains("github.com/willibrandon/mtlog")
                    || imp.path.ends_with("/mtlog")
                    || imp.path == "mtlog"
            })
            .map(|imp| match &imp.alias {
                Some(alias) => alias.as_str(),
                None => "mtlog",
            })
    }

    /// Existing string constant with the given value, if declared.
    pub fn constant_for_value(&self, value: &str) -> Option<&ConstDecl> {
        self.consts
            .iter()
            .find(|c| c.string_value.as_deref() == Some(value))
    }

    /// The function scope enclosing a byte offset, innermost not tracked;
    /// function bodies do not nest in Go apart from literals, so the first
    /// containing scope is the right one.
    pub fn enclosing_function(&self, byte: usize) -> Option<&GoFunctionScope> {
        self.functions.iter().find(|f| f.contains(byte))
    }
}
