//! GL back-end of the glslbind engine.
//!
//! Consumes the upload commands produced by `glslbind-lang` and executes
//! them against a compiled program through `glow`: program compilation
//! with annotated driver diagnostics, uniform location lookup, texture
//! unit allocation, and the fullscreen quad that fragment shaders draw on.

pub mod engine;
pub mod error;
pub mod locations;
pub mod program;
pub mod textures;

pub use engine::Glsl;
pub use error::RenderError;
pub use program::VERTEX_SHADER;
