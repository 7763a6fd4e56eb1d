mod report;
mod snippet;
mod source;

pub use report::{EmitError, Level, Report};
pub use source::Source;
