//! The binder's output: typed upload commands plus per-leaf diagnostics.

use std::sync::Arc;

use crate::runtime::value::ImageData;

/// One resolved upload, keyed by Binding Path. The renderer maps the path
/// to a compiled-program location and issues the matching `glUniform*` call.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformWrite {
    pub path: String,
    pub payload: Payload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// bool and int scalars (bool as 0/1).
    Int(i32),
    Float(f32),
    /// ivec / bvec; only the first `arity` components are meaningful.
    IntVec { arity: u8, v: [i32; 4] },
    FloatVec { arity: u8, v: [f32; 4] },
    /// Whole primitive array in one call; `components` per element.
    IntArray { components: u8, data: Vec<i32> },
    FloatArray { components: u8, data: Vec<f32> },
    /// One matrix (or a whole matrix array): `order`² floats per matrix.
    Matrix { order: u8, data: Vec<f32> },
    Texture(Arc<ImageData>),
}

// ─── Diagnostics ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A per-leaf problem. Never fatal: the leaf is skipped, siblings continue.
#[derive(Debug, Clone, PartialEq)]
pub struct BindIssue {
    pub severity: Severity,
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BindReport {
    pub writes: Vec<UniformWrite>,
    pub issues: Vec<BindIssue>,
}

impl BindReport {
    pub fn write(&mut self, path: impl Into<String>, payload: Payload) {
        self.writes.push(UniformWrite { path: path.into(), payload });
    }

    pub fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(BindIssue {
            severity: Severity::Warning,
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(BindIssue {
            severity: Severity::Error,
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn merge(&mut self, other: BindReport) {
        self.writes.extend(other.writes);
        self.issues.extend(other.issues);
    }
}
