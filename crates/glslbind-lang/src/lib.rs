//! GPU-free front-end of the glslbind engine.
//!
//! Turns raw shader source into a typed uniform schema, and host values
//! into a stream of typed upload commands. The companion renderer crate
//! executes those commands against a compiled GL program; nothing in this
//! crate touches a GPU, which is what makes the whole binding pipeline
//! unit-testable.

pub mod error;
pub mod scan;
pub mod schema;
pub mod runtime;

pub use error::{Error, ErrorCode};
pub use runtime::{
    sync_all, sync_variable, BindIssue, BindReport, ImageData, Payload, Severity, UniformWrite,
    Value, Variables,
};
pub use schema::{ScalarKind, Schema, StructDef, TypeDesc, RESOLUTION};

/// Scan shader source text and resolve it into a typed uniform schema.
///
/// Fails on unterminated struct blocks, unresolvable array lengths,
/// cyclic struct definitions, and a missing or mistyped
/// `uniform vec2 resolution;` — everything else in the source is ignored.
pub fn parse(source: &str) -> Result<Schema, Vec<Error>> {
    let scanned = scan::scan(source)?;
    schema::resolve(scanned)
}
