//! Host-side values fed to the binder.

use std::collections::HashMap;
use std::sync::Arc;

/// Decoded RGBA8 pixel source for sampler uniforms. Rows top-to-bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: i32,
    pub height: i32,
    pub pixels: Vec<u8>,
}

impl ImageData {
    pub fn new(width: i32, height: i32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);
        Self { width, height, pixels }
    }
}

/// One host variable. Several shapes can describe the same uniform — a
/// `vec3` accepts a positional `List`, `{x,y,z}`, `{s,t,p}` or `{r,g,b}` —
/// so the binder probes, it never requires one canonical form.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Float(f32),
    /// Positional elements: vector components, array elements, flat matrices.
    List(Vec<Value>),
    /// Named fields: struct values and the named vector shapes.
    Record(HashMap<String, Value>),
    /// Flat float data (large arrays, matrices) without per-element boxing.
    Floats(Vec<f32>),
    /// Flat int data (int/bool arrays).
    Ints(Vec<i32>),
    /// Pixel source for a `sampler2D`.
    Image(Arc<ImageData>),
}

impl Value {
    pub fn record<'a>(fields: impl IntoIterator<Item = (&'a str, Value)>) -> Value {
        Value::Record(fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Value {
        Value::List(items.into_iter().collect())
    }

    pub fn image(width: i32, height: i32, pixels: Vec<u8>) -> Value {
        Value::Image(Arc::new(ImageData::new(width, height, pixels)))
    }

    /// Numeric view. Bools coerce to 0/1 like they do on upload.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bool(b)  => Some(if *b { 1.0 } else { 0.0 }),
            Value::Int(i)   => Some(*i as f64),
            Value::Float(f) => Some(*f as f64),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        self.as_f64().map(|v| v as f32)
    }

    pub fn as_i32(&self) -> Option<i32> {
        self.as_f64().map(|v| v as i32)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Number of positional elements, if this value is indexable.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::List(v)   => Some(v.len()),
            Value::Floats(v) => Some(v.len()),
            Value::Ints(v)   => Some(v.len()),
            _ => None,
        }
    }

    pub fn index(&self, i: usize) -> Option<Value> {
        match self {
            Value::List(v)   => v.get(i).cloned(),
            Value::Floats(v) => v.get(i).copied().map(Value::Float),
            Value::Ints(v)   => v.get(i).copied().map(Value::Int),
            _ => None,
        }
    }
}

impl From<bool> for Value { fn from(v: bool) -> Self { Value::Bool(v) } }
impl From<i32>  for Value { fn from(v: i32)  -> Self { Value::Int(v) } }
impl From<f32>  for Value { fn from(v: f32)  -> Self { Value::Float(v) } }
impl From<Vec<f32>> for Value { fn from(v: Vec<f32>) -> Self { Value::Floats(v) } }
impl From<Vec<i32>> for Value { fn from(v: Vec<i32>) -> Self { Value::Ints(v) } }
impl From<Arc<ImageData>> for Value { fn from(v: Arc<ImageData>) -> Self { Value::Image(v) } }

// ─── Vector shape probing ────────────────────────────────────────────────────

/// The closed set of accepted host shapes for a vector uniform, in probe
/// priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VecShape {
    /// Positional: `[a, b, c]`, `Floats`, `Ints`.
    Indexed,
    /// Named axes: `{x, y, z, w}`.
    Axis,
    /// Texture coordinates: `{s, t, p, q}`.
    TexCoord,
    /// Color channels: `{r, g, b, a}` — arity 3 and 4 only.
    Color,
}

impl VecShape {
    const PRIORITY: [VecShape; 4] =
        [VecShape::Indexed, VecShape::Axis, VecShape::TexCoord, VecShape::Color];

    fn field_names(self) -> &'static [&'static str; 4] {
        match self {
            VecShape::Indexed  => unreachable!("Indexed has no field names"),
            VecShape::Axis     => &["x", "y", "z", "w"],
            VecShape::TexCoord => &["s", "t", "p", "q"],
            VecShape::Color    => &["r", "g", "b", "a"],
        }
    }
}

/// Probe a host value as an `arity`-component vector. Shapes are tried in
/// fixed priority order; the first complete match wins. Unused trailing
/// components stay 0.
pub fn probe_vector(value: &Value, arity: usize) -> Option<(VecShape, [f64; 4])> {
    debug_assert!((2..=4).contains(&arity));
    for shape in VecShape::PRIORITY {
        if shape == VecShape::Color && arity < 3 {
            continue;
        }
        let mut out = [0.0f64; 4];
        let complete = match shape {
            VecShape::Indexed => (0..arity).all(|i| {
                match value.index(i).and_then(|v| v.as_f64()) {
                    Some(n) => { out[i] = n; true }
                    None => false,
                }
            }),
            _ => {
                let names = shape.field_names();
                (0..arity).all(|i| {
                    match value.field(names[i]).and_then(|v| v.as_f64()) {
                        Some(n) => { out[i] = n; true }
                        None => false,
                    }
                })
            }
        };
        if complete {
            return Some((shape, out));
        }
    }
    None
}

// ─── Tests ───────────────────────────────────────────────────────────────────
