use thiserror::Error;

/// Fatal construction/reload failures. Everything past construction is a
/// logged per-leaf diagnostic instead — one bad uniform never stops a frame.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("schema build failed:\n{}", format_errors(.0))]
    Schema(Vec<glslbind_lang::Error>),

    #[error("vertex shader did not compile:\n{0}")]
    VertexCompile(String),

    #[error("fragment shader did not compile:\n{0}")]
    FragmentCompile(String),

    #[error("program did not link: {0}")]
    Link(String),

    #[error("GL resource allocation failed: {0}")]
    Resource(String),
}

fn format_errors(errors: &[glslbind_lang::Error]) -> String {
    errors.iter().map(|e| format!("  {e}")).collect::<Vec<_>>().join("\n")
}
