//! Name map construction (`spec.md` §2 step 3, §3, §4.3).
//!
//! Collects every declared/defined function in a (already static-prefixed,
//! concatenated) declaration list into `ident -> (position, optional body,
//! action set)`, merging repeated declarations of the same identifier:
//! actions union, the non-empty body wins, and two differing non-empty
//! bodies are a fatal [`SetupError::MultipleDefinitions`] — checked here,
//! before lowering, since [`FunctionBody`] is already structurally
//! comparable.

use indexmap::IndexMap;

use crate::ast::types::{Declaration, FunctionBody, Position};
use crate::attrs::extract_actions;
use crate::diagnostics::entry::DiagnosticEntry;
use crate::errors::SetupError;
use crate::permission::action::PermissionActionSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMapEntry {
    pub position: Position,
    pub body: Option<FunctionBody>,
    pub actions: PermissionActionSet,
}

#[derive(Debug, Clone, Default)]
pub struct NameMap {
    entries: IndexMap<String, NameMapEntry>,
}

impl NameMap {
    pub fn get(&self, name: &str) -> Option<&NameMapEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &NameMapEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build a [`NameMap`] from a flat, already-disambiguated declaration list.
/// Returns any structural warnings raised while extracting attributes
/// alongside the map; a duplicate non-equal definition is fatal.
pub fn build_name_map(declarations: &[Declaration]) -> Result<(NameMap, Vec<DiagnosticEntry>), SetupError> {
    let mut entries: IndexMap<String, NameMapEntry> = IndexMap::new();
    let mut warnings = Vec::new();

    for decl in declarations {
        let (actions, attr_warnings) = extract_actions(&decl.attributes, &decl.position);
        warnings.extend(attr_warnings);

        match entries.get_mut(&decl.name) {
            None => {
                entries.insert(
                    decl.name.clone(),
                    NameMapEntry { position: decl.position.clone(), body: decl.body.clone(), actions },
                );
            }
            Some(existing) => {
                existing.actions.extend(&actions);
                match (&existing.body, &decl.body) {
                    (None, Some(_)) => {
                        existing.body = decl.body.clone();
                        existing.position = decl.position.clone();
                    }
                    (Some(a), Some(b)) if a != b => {
                        return Err(SetupError::MultipleDefinitions { name: decl.name.clone() });
                    }
                    _ => {}
                }
            }
        }
    }

    Ok((NameMap { entries }, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::FunctionBuilder;

    #[test]
    fn prototype_then_definition_merges_body_and_actions() {
        let proto = FunctionBuilder::new("take_lock", 1).needs("setup").extern_only().build();
        let def = FunctionBuilder::new("take_lock", 1).grants("lock").calling(&["helper"]).build();
        let (map, warnings) = build_name_map(&[proto, def]).unwrap();
        assert!(warnings.is_empty());
        let entry = map.get("take_lock").unwrap();
        assert!(entry.body.is_some());
        assert_eq!(entry.actions.len(), 2);
    }

    #[test]
    fn differing_non_empty_bodies_is_fatal() {
        let a = FunctionBuilder::new("init", 1).calling(&["x"]).build();
        let b = FunctionBuilder::new("init", 1).calling(&["y"]).build();
        let err = build_name_map(&[a, b]).unwrap_err();
        assert!(matches!(err, SetupError::MultipleDefinitions { name } if name == "init"));
    }

    #[test]
    fn identical_redefinition_is_not_an_error() {
        let a = FunctionBuilder::new("init", 1).calling(&["x"]).build();
        let b = FunctionBuilder::new("init", 1).calling(&["x"]).build();
        let (map, _) = build_name_map(&[a, b]).unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn malformed_attribute_warns() {
        let decl = FunctionBuilder::new("f", 1).attr("garbage").build();
        let (_, warnings) = build_name_map(&[decl]).unwrap();
        assert_eq!(warnings.len(), 1);
    }
}
