//! Recursive value-to-uniform binder.
//!
//! Walks a host value against its type descriptor and lowers every leaf to
//! one `UniformWrite`. Nothing here can fail the frame: every problem is a
//! `BindIssue` and the walk continues with the next sibling.

use std::collections::HashMap;

use crate::runtime::command::{BindReport, Payload};
use crate::runtime::value::{probe_vector, Value};
use crate::schema::{ScalarKind, Schema, StructDef, TypeDesc};

/// The host's variable map. Keys are top-level uniform names.
#[derive(Debug, Clone, Default)]
pub struct Variables(pub HashMap<String, Value>);

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}

impl<'a> FromIterator<(&'a str, Value)> for Variables {
    fn from_iter<T: IntoIterator<Item = (&'a str, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Synchronize one variable by name.
pub fn sync_variable(name: &str, vars: &Variables, schema: &Schema) -> BindReport {
    let mut report = BindReport::default();

    let Some(desc) = schema.get(name) else {
        report.warn(name, format!("variable '{name}' not found in your GLSL"));
        return report;
    };
    let Some(value) = vars.get(name) else {
        report.warn(name, format!("variable '{name}' not initialized"));
        return report;
    };

    bind(value, desc, name, schema, &mut report);
    report
}

/// Synchronize every schema uniform, in declaration order. Equivalent to
/// `sync_variable` over all names — just less selective.
pub fn sync_all(vars: &Variables, schema: &Schema) -> BindReport {
    let mut report = BindReport::default();
    for name in schema.names() {
        report.merge(sync_variable(name, vars, schema));
    }
    report
}

// ─── Recursive walk ──────────────────────────────────────────────────────────

fn bind(value: &Value, desc: &TypeDesc, path: &str, schema: &Schema, report: &mut BindReport) {
    match desc {
        TypeDesc::Struct(sname) => match schema.structs.get(sname) {
            Some(def) => bind_struct(value, def, path, schema, report),
            None => report.error(path, format!("type '{sname}' not found")),
        },

        TypeDesc::Array(inner, len) => bind_array(value, inner, *len, path, schema, report),

        TypeDesc::Scalar(ScalarKind::Float) => match value.as_f32() {
            Some(f) => report.write(path, Payload::Float(f)),
            None => report.error(path, format!("cannot read '{path}' as a float")),
        },

        TypeDesc::Scalar(_) => match value.as_i32() {
            Some(i) => report.write(path, Payload::Int(i)),
            None => report.error(path, format!("cannot read '{path}' as an int")),
        },

        TypeDesc::Vector(kind, arity) => bind_vector(value, *kind, *arity, path, report),

        TypeDesc::Matrix(order) => match flatten_numbers(value, None) {
            Some(data) if data.len() == (*order as usize).pow(2) => {
                report.write(path, Payload::Matrix {
                    order: *order,
                    data: data.iter().map(|&v| v as f32).collect(),
                });
            }
            _ => report.error(path,
                format!("'{path}' must hold {} floats for a mat{order}", (*order as usize).pow(2))),
        },

        TypeDesc::Sampler2D => match value {
            Value::Image(img) => report.write(path, Payload::Texture(img.clone())),
            _ => report.error(path, format!("'{path}' is a sampler2D and needs an image value")),
        },

        TypeDesc::Opaque(tname) => report.error(path, format!("type '{tname}' not found")),
    }
}

fn bind_struct(
    value: &Value,
    def: &StructDef,
    path: &str,
    schema: &Schema,
    report: &mut BindReport,
) {
    for field in &def.fields {
        let Some(v) = value.field(&field.name) else {
            // abort the remaining fields of THIS struct value; siblings go on
            report.warn(path,
                format!("variable '{path}' ({}) has no field '{}'", def.name, field.name));
            break;
        };
        bind(v, &field.ty, &format!("{path}.{}", field.name), schema, report);
    }
}

fn bind_array(
    value: &Value,
    inner: &TypeDesc,
    len: usize,
    path: &str,
    schema: &Schema,
    report: &mut BindReport,
) {
    match inner {
        TypeDesc::Struct(sname) => {
            let Some(def) = schema.structs.get(sname) else {
                report.error(path, format!("type '{sname}' not found"));
                return;
            };
            let Some(have) = value.len() else {
                report.error(path, format!("'{path}' ({sname}[{len}]) needs a sequence value"));
                return;
            };
            // sync only what the host provides; extra GPU slots keep their
            // last-written contents
            for i in 0..len.min(have) {
                if let Some(elem) = value.index(i) {
                    bind_struct(&elem, def, &format!("{path}[{i}]"), schema, report);
                }
            }
        }

        TypeDesc::Scalar(kind) => bind_flat_array(value, *kind, 1, len, path, report),

        TypeDesc::Vector(kind, arity) => {
            bind_flat_array(value, *kind, *arity as usize, len, path, report)
        }

        TypeDesc::Matrix(order) => {
            let per = (*order as usize).pow(2);
            match flatten_numbers(value, None) {
                Some(mut data) if !data.is_empty() && data.len() % per == 0 => {
                    data.truncate(len * per);
                    report.write(path, Payload::Matrix {
                        order: *order,
                        data: data.iter().map(|&v| v as f32).collect(),
                    });
                }
                _ => report.error(path,
                    format!("'{path}' must hold a multiple of {per} floats for mat{order}[{len}]")),
            }
        }

        TypeDesc::Sampler2D => {
            report.error(path, format!("'{path}': sampler2D arrays are not supported"));
        }

        TypeDesc::Opaque(tname) => report.error(path, format!("type '{tname}' not found")),

        TypeDesc::Array(..) => {
            report.error(path, format!("'{path}': nested arrays are not supported"));
        }
    }
}

/// One write for a whole scalar/vector array. The host may pass flat data
/// (`Floats`, `Ints`, flat `List`) or a `List` of vector-shaped elements.
fn bind_flat_array(
    value: &Value,
    kind: ScalarKind,
    components: usize,
    len: usize,
    path: &str,
    report: &mut BindReport,
) {
    let Some(mut data) = flatten_numbers(value, Some(components)) else {
        report.error(path, format!("cannot read '{path}' as a numeric array"));
        return;
    };
    // keep whole elements only, trimmed to the declared length
    data.truncate(len * components);
    data.truncate(data.len() - data.len() % components);
    if data.is_empty() {
        report.warn(path, format!("'{path}' has no elements to synchronize"));
        return;
    }
    let payload = match kind {
        ScalarKind::Float => Payload::FloatArray {
            components: components as u8,
            data: data.iter().map(|&v| v as f32).collect(),
        },
        _ => Payload::IntArray {
            components: components as u8,
            data: data.iter().map(|&v| v as i32).collect(),
        },
    };
    report.write(path, payload);
}

fn bind_vector(value: &Value, kind: ScalarKind, arity: u8, path: &str, report: &mut BindReport) {
    let Some((_, c)) = probe_vector(value, arity as usize) else {
        report.error(path,
            format!("'{path}' is not a recognized {}-component vector shape", arity));
        return;
    };
    let payload = match kind {
        ScalarKind::Float => Payload::FloatVec {
            arity,
            v: [c[0] as f32, c[1] as f32, c[2] as f32, c[3] as f32],
        },
        // bvec and ivec both upload through the int entry points
        _ => Payload::IntVec {
            arity,
            v: [c[0] as i32, c[1] as i32, c[2] as i32, c[3] as i32],
        },
    };
    report.write(path, payload);
}

/// Flatten a host value to a number sequence. `vec_arity` enables probing
/// of vector-shaped `List` elements (a `List` of `{x,y}` records for a
/// `vec2[n]`, say); nested lists always flatten.
fn flatten_numbers(value: &Value, vec_arity: Option<usize>) -> Option<Vec<f64>> {
    match value {
        Value::Floats(v) => Some(v.iter().map(|&f| f as f64).collect()),
        Value::Ints(v) => Some(v.iter().map(|&i| i as f64).collect()),
        Value::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if let Some(n) = item.as_f64() {
                    out.push(n);
                } else if let Some(flat) = flatten_numbers(item, None) {
                    out.extend(flat);
                } else if let Some((_, c)) = vec_arity
                    .filter(|a| (2..=4).contains(a))
                    .and_then(|a| probe_vector(item, a).map(|p| (p.0, p.1)))
                {
                    out.extend(&c[..vec_arity.unwrap()]);
                } else {
                    return None;
                }
            }
            Some(out)
        }
        _ => value.as_f64().map(|n| vec![n]),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
