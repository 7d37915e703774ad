//! Config data model (`spec.md` §3).

use indexmap::IndexMap;

use crate::ident::PermName;
use crate::permission::lattice::PermissionPresence;

/// Boolean tree over `Context(permission, presence)` atoms. Output
/// precedence (not parse precedence) is `Not` > `And` > `Or`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Context(PermName, PermissionPresence),
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_or(self, f)
    }
}

fn fmt_or(e: &Expression, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    if let Expression::Or(a, b) = e {
        fmt_or(a, f)?;
        write!(f, " || ")?;
        fmt_or(b, f)
    } else {
        fmt_and(e, f)
    }
}

fn fmt_and(e: &Expression, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    if let Expression::And(a, b) = e {
        fmt_and(a, f)?;
        write!(f, " && ")?;
        fmt_and(b, f)
    } else {
        fmt_unary(e, f)
    }
}

fn fmt_unary(e: &Expression, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match e {
        Expression::Not(inner) => {
            write!(f, "!")?;
            fmt_unary(inner, f)
        }
        Expression::Context(name, presence) => write!(f, "{name}[{presence}]"),
        other => write!(f, "({other})"),
    }
}

/// One restriction on a declared permission: `uses(name) => expression`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restriction {
    pub name: PermName,
    pub expression: Expression,
    pub description: Option<String>,
}

/// A permission's config declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declaration {
    pub implicit: bool,
    pub description: Option<String>,
    pub restrictions: Vec<Restriction>,
}

impl Declaration {
    /// Merge two declarations of the same permission name (§3): OR
    /// `implicit`, join descriptions with `"; "`, concatenate restrictions.
    pub fn merge(mut self, other: Declaration) -> Declaration {
        self.implicit = self.implicit || other.implicit;
        self.description = match (self.description.take(), other.description) {
            (Some(a), Some(b)) => Some(format!("{a}; {b}")),
            (Some(a), None) => Some(a),
            (None, b) => b,
        };
        self.restrictions.extend(other.restrictions);
        self
    }
}

/// Which functions an enforcement rule selects (§4.5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enforcement {
    EnforcePath(String),
    EnforceFunction(String),
    EnforcePathFunction(String, String),
}

impl Enforcement {
    /// §4.5: does this rule select a function at `path` named `name`?
    pub fn matches(&self, path: &str, name: &str) -> bool {
        match self {
            Enforcement::EnforcePath(s) => path.ends_with(s.as_str()),
            Enforcement::EnforceFunction(n) => name == n,
            Enforcement::EnforcePathFunction(s, n) => path.ends_with(s.as_str()) && name == n,
        }
    }
}

/// The full declarative policy: permission declarations plus enforcement
/// rules, merged from every `--config` file in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub declarations: IndexMap<PermName, Declaration>,
    pub enforcements: Vec<Enforcement>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, other: Config) {
        for (name, decl) in other.declarations {
            match self.declarations.shift_remove(&name) {
                Some(existing) => {
                    self.declarations.insert(name, existing.merge(decl));
                }
                None => {
                    self.declarations.insert(name, decl);
                }
            }
        }
        self.enforcements.extend(other.enforcements);
    }

    pub fn is_implicit(&self, name: &PermName) -> bool {
        self.declarations.get(name).map(|d| d.implicit).unwrap_or(false)
    }

    pub fn implicit_permissions(&self) -> impl Iterator<Item = &PermName> {
        self.declarations.iter().filter(|(_, d)| d.implicit).map(|(name, _)| name)
    }

    pub fn is_enforced(&self, path: &str, name: &str) -> bool {
        self.enforcements.iter().any(|e| e.matches(path, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_ors_implicit_and_joins_descriptions() {
        let a = Declaration { implicit: true, description: Some("a".into()), restrictions: vec![] };
        let b = Declaration { implicit: false, description: Some("b".into()), restrictions: vec![] };
        let merged = a.merge(b);
        assert!(merged.implicit);
        assert_eq!(merged.description.as_deref(), Some("a; b"));
    }

    #[test]
    fn enforce_path_matches_suffix() {
        let e = Enforcement::EnforcePath("public.h".into());
        assert!(e.matches("src/include/public.h", "anything"));
        assert!(!e.matches("src/include/private.h", "anything"));
    }

    #[test]
    fn enforce_path_function_requires_both() {
        let e = Enforcement::EnforcePathFunction("public.h".into(), "init".into());
        assert!(e.matches("public.h", "init"));
        assert!(!e.matches("public.h", "other"));
        assert!(!e.matches("other.h", "init"));
    }
}
