//! Type descriptors — the engine's view of a uniform's declared shape.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
}

/// Declared type of one uniform or struct field.
///
/// `Struct` is a by-name reference into the struct table (never inlined, so
/// forward and mutual references stay representable). `Opaque` is a type
/// name that matched neither a primitive nor a declared struct; it is kept
/// in the schema and only becomes an error if a value is bound to it.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDesc {
    Scalar(ScalarKind),
    /// Component kind and arity (2..=4).
    Vector(ScalarKind, u8),
    /// Square matrix order (2..=4), column-major floats.
    Matrix(u8),
    Sampler2D,
    Struct(String),
    Opaque(String),
    /// Fixed-size array of any of the above, length fully resolved.
    Array(Box<TypeDesc>, usize),
}

impl TypeDesc {
    /// Map a GLSL primitive keyword to its descriptor.
    pub fn primitive(name: &str) -> Option<TypeDesc> {
        use ScalarKind::*;
        Some(match name {
            "bool"  => TypeDesc::Scalar(Bool),
            "int"   => TypeDesc::Scalar(Int),
            "float" => TypeDesc::Scalar(Float),
            "vec2"  => TypeDesc::Vector(Float, 2),
            "vec3"  => TypeDesc::Vector(Float, 3),
            "vec4"  => TypeDesc::Vector(Float, 4),
            "ivec2" => TypeDesc::Vector(Int, 2),
            "ivec3" => TypeDesc::Vector(Int, 3),
            "ivec4" => TypeDesc::Vector(Int, 4),
            "bvec2" => TypeDesc::Vector(Bool, 2),
            "bvec3" => TypeDesc::Vector(Bool, 3),
            "bvec4" => TypeDesc::Vector(Bool, 4),
            "mat2"  => TypeDesc::Matrix(2),
            "mat3"  => TypeDesc::Matrix(3),
            "mat4"  => TypeDesc::Matrix(4),
            "sampler2D" => TypeDesc::Sampler2D,
            _ => return None,
        })
    }

    /// Struct name referenced by this descriptor, looking through one
    /// array wrapper.
    pub fn struct_name(&self) -> Option<&str> {
        match self {
            TypeDesc::Struct(name) => Some(name),
            TypeDesc::Array(inner, _) => inner.struct_name(),
            _ => None,
        }
    }
}

impl std::fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ScalarKind::*;
        match self {
            TypeDesc::Scalar(Bool)  => write!(f, "bool"),
            TypeDesc::Scalar(Int)   => write!(f, "int"),
            TypeDesc::Scalar(Float) => write!(f, "float"),
            TypeDesc::Vector(kind, n) => {
                let prefix = match kind { Float => "", Int => "i", Bool => "b" };
                write!(f, "{prefix}vec{n}")
            }
            TypeDesc::Matrix(n)    => write!(f, "mat{n}"),
            TypeDesc::Sampler2D    => write!(f, "sampler2D"),
            TypeDesc::Struct(name) => write!(f, "{name}"),
            TypeDesc::Opaque(name) => write!(f, "{name}"),
            TypeDesc::Array(inner, n) => write!(f, "{inner}[{n}]"),
        }
    }
}
