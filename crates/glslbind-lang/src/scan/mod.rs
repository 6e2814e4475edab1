pub mod scanner;

pub use scanner::{scan, ScanOutput};

use std::collections::HashMap;

/// Raw (unresolved) array length token, as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LenToken {
    Literal(usize),
    /// A `#define` symbol, resolved against the define table later.
    Symbol(String),
}

/// One scanned declaration: a struct field or a top-level uniform.
/// `type_name` is still textual here — the registry decides whether it is
/// a primitive, a struct reference, or an opaque type.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDecl {
    pub type_name: String,
    pub name: String,
    pub array_len: Option<LenToken>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawStruct {
    pub name: String,
    pub fields: Vec<RawDecl>,
    pub line: usize,
}

/// Preprocessor symbol table. Last occurrence of a name wins.
pub type DefineTable = HashMap<String, String>;
