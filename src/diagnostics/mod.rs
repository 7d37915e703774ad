//! Diagnostic entries, the single-writer/single-reader channel, and output
//! formatting (`spec.md` §4.6, §5).

pub mod entry;
pub mod format;
pub mod sink;

pub use entry::{DiagnosticEntry, Reason, Severity};
pub use format::OutputMode;
pub use sink::{run_with_sink, DiagnosticsSink, Summary};
