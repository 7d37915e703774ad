//! The permission lattice inference engine: transfer functions, the
//! per-function fixed point, whole-program fixed-point propagation,
//! enforcement selection, and restriction evaluation (`spec.md` §4.4,
//! §4.5).

pub mod engine;
pub mod enforcement;
pub mod restriction;
pub mod summary;
pub mod transfer;

pub use engine::{analyze, initial_state, FunctionAnalysis};
pub use summary::{infer_program, ProgramAnalysis};
