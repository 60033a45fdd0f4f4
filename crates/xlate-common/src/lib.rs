mod span;
mod lines;
mod diagnostic;

pub use span::Span;
pub use lines::LineIndex;
pub use diagnostic::{Diagnostic, DiagnosticLevel};
