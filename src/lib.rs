//! Ward — a static permission checker for C programs.
//!
//! Infers, from `ward(action(permission))` attributes on function
//! declarations, which permissions a program's functions need, grant,
//! revoke, deny, or waive, and reports conflicts, restriction violations,
//! and enforcement mismatches as diagnostics.

pub mod ast;
pub mod attrs;
pub mod callmap;
pub mod callmap_dump;
pub mod callseq;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod ident;
pub mod inference;
pub mod namemap;
pub mod permission;
pub mod pipeline;
pub mod statics;
