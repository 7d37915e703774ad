//! Interned names and function identifiers.
//!
//! `spec.md` §3 describes a permission name as "an interned, hashable string
//! identifier" and a function identifier as a `(name, hash, source-position)`
//! triple preserved from the external AST. Neither the teacher repo nor the
//! wider example pack pulls in a dedicated interner crate for this shape, so
//! both are plain `Arc<str>` newtypes — cheap to clone, cheap to hash,
//! no extra dependency.

use std::fmt;
use std::sync::Arc;

use crate::ast::types::Position;

/// An interned permission name. Two `PermName`s compare equal iff their
/// underlying text is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PermName(Arc<str>);

impl PermName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PermName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PermName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PermName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl serde::Serialize for PermName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for PermName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(PermName::new(String::deserialize(deserializer)?))
    }
}

/// `(name, hash, source-position)`, preserved from the external AST.
///
/// Equality is by `name` + `hash` *after* static-prefixing (§4.1) has already
/// happened, so position is deliberately excluded from `Eq`/`Hash`: two
/// occurrences of the same identifier at different call sites must still
/// compare equal to key the same call-map entry.
#[derive(Debug, Clone)]
pub struct FunctionIdent {
    pub name: String,
    pub hash: u64,
    pub position: Position,
}

impl FunctionIdent {
    pub fn new(name: impl Into<String>, hash: u64, position: Position) -> Self {
        Self { name: name.into(), hash, position }
    }

    /// Rename a static (file-local) identifier to `` `path`name ``, per
    /// §4.1. Idempotent only in the sense that re-prefixing an
    /// already-prefixed name produces a new, distinct name — callers are
    /// responsible for prefixing each identifier exactly once.
    pub fn with_static_prefix(&self, path: &str) -> Self {
        Self {
            name: static_prefixed_name(path, &self.name),
            hash: self.hash,
            position: self.position.clone(),
        }
    }
}

impl PartialEq for FunctionIdent {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.hash == other.hash
    }
}

impl Eq for FunctionIdent {}

impl std::hash::Hash for FunctionIdent {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.hash.hash(state);
    }
}

impl fmt::Display for FunctionIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The renamed form ``path`name`` used for file-local (`static`) functions,
/// so that two translation units each defining `static void init(void)`
/// cannot collide in the call map (§4.1).
pub fn static_prefixed_name(path: &str, name: &str) -> String {
    format!("{path}`{name}")
}
