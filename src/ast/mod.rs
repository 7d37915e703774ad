//! The C AST shape Ward consumes from the external preprocessor/parser.
//!
//! The real C preprocessor and parser are out of scope (`spec.md` §1); this
//! module defines the abstraction level of AST the rest of the pipeline
//! needs, a builder API for constructing it programmatically (tests), and a
//! JSON ingest format a real frontend adapter would emit.

pub mod builder;
pub mod serde_ast;
pub mod types;

pub use types::{Callee, Declaration, Expr, FunctionBody, Position, Span, Stmt, StorageClass, TranslationUnit};
