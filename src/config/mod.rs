//! Declarative policy: permission declarations, restrictions, and
//! enforcement rules (`spec.md` §3, §6, §4.8 of `SPEC_FULL.md`).

pub mod parse;
pub mod types;

pub use parse::parse_config;
pub use types::{Config, Declaration, Enforcement, Expression, Restriction};
