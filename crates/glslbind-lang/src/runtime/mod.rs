pub mod binder;
pub mod command;
pub mod value;

pub use binder::{sync_all, sync_variable, Variables};
pub use command::{BindIssue, BindReport, Payload, Severity, UniformWrite};
pub use value::{probe_vector, ImageData, Value, VecShape};
