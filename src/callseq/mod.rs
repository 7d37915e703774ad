//! Call trees, call sequences, and lowering of C function bodies to them.

pub mod lower;
pub mod tree;

pub use lower::lower_function;
pub use tree::{CallSequence, CallTree};
