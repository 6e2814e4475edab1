/// Error codes prefixed by phase: D = declaration scan, R = schema resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    // Declaration scan
    D001, // unterminated struct block
    D002, // malformed struct field

    // Schema resolve
    R001, // array length symbol not in define table
    R002, // array length does not parse as an integer
    R003, // missing `vec2 resolution` uniform
    R004, // cyclic struct definition
    R005, // `resolution` declared with the wrong type
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::D001 => "D001",
            Self::D002 => "D002",
            Self::R001 => "R001",
            Self::R002 => "R002",
            Self::R003 => "R003",
            Self::R004 => "R004",
            Self::R005 => "R005",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    /// 1-based source line of the offending declaration; 0 when the error
    /// concerns the source as a whole (e.g. a missing uniform).
    pub line: usize,
    pub message: String,
}

impl Error {
    pub fn new(code: ErrorCode, line: usize, message: impl Into<String>) -> Self {
        Self { code, line, message: message.into() }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line > 0 {
            write!(f, "[{}] line {} — {}", self.code.as_str(), self.line, self.message)
        } else {
            write!(f, "[{}] {}", self.code.as_str(), self.message)
        }
    }
}
