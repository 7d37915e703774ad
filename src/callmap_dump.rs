//! Call-graph dump/parse JSON format (`spec.md` §6).
//!
//! When `--action graph` is selected, the call map is emitted as a JSON
//! document mapping function identifier to `{position, calls, permissions}`,
//! with `calls` the recursive sum type `Call | Choice | Sequence` over
//! identifiers. The same shape is accepted back as input; invalid input
//! yields [`SetupError::CallMapUnitParseError`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ast::types::Position;
use crate::callmap::{CallMap, CallMapEntry};
use crate::callseq::{CallSequence, CallTree};
use crate::errors::SetupError;
use crate::permission::action::{PermissionAction, PermissionActionSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
enum CallNode {
    Call { name: String },
    Choice { a: Box<CallNode>, b: Box<CallNode> },
    Sequence { items: Vec<CallNode> },
}

impl From<&CallTree> for CallNode {
    fn from(tree: &CallTree) -> Self {
        match tree {
            CallTree::Call(name) => CallNode::Call { name: name.clone() },
            CallTree::Choice(a, b) => CallNode::Choice { a: Box::new(from_seq(a)), b: Box::new(from_seq(b)) },
        }
    }
}

fn from_seq(seq: &CallSequence) -> CallNode {
    CallNode::Sequence { items: seq.iter().map(CallNode::from).collect() }
}

fn to_seq(node: &CallNode) -> CallSequence {
    match node {
        CallNode::Sequence { items } => items.iter().map(to_tree).collect(),
        other => CallSequence::single(to_tree(other)),
    }
}

fn to_tree(node: &CallNode) -> CallTree {
    match node {
        CallNode::Call { name } => CallTree::Call(name.clone()),
        CallNode::Choice { a, b } => CallTree::Choice(to_seq(a), to_seq(b)),
        // `to_seq` always unwraps a `Sequence` node before calling `to_tree`
        // on its contents, so this only fires on hand-edited dump files
        // that nest a sequence where a single call-tree node belongs.
        CallNode::Sequence { items } => CallTree::Choice(CallSequence::empty(), items.iter().map(to_tree).collect()),
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct DumpEntry {
    position: Position,
    calls: CallNode,
    permissions: Vec<String>,
}

/// Serialize a [`CallMap`] to its JSON dump form.
pub fn dump_call_map(map: &CallMap) -> String {
    let dump: IndexMap<String, DumpEntry> = map
        .iter()
        .map(|(name, entry)| {
            (
                name.clone(),
                DumpEntry {
                    position: entry.position.clone(),
                    calls: from_seq(&entry.calls),
                    permissions: entry.actions.iter().map(|a| a.to_string()).collect(),
                },
            )
        })
        .collect();
    serde_json::to_string_pretty(&dump).expect("call map dump is always representable as JSON")
}

/// Parse a call map back from its JSON dump form. `permissions` strings are
/// not re-parsed into structured actions (the dump format exists to let a
/// graph survive a round trip through `--action graph`, not to recover a
/// live action taxonomy) — they're recorded as bare `Use` markers keyed by
/// name so downstream tooling still sees the permission names involved.
pub fn parse_call_map(text: &str) -> Result<CallMap, SetupError> {
    let dump: IndexMap<String, DumpEntry> =
        serde_json::from_str(text).map_err(|e| SetupError::CallMapUnitParseError { message: e.to_string() })?;

    let mut entries = IndexMap::new();
    for (name, entry) in dump {
        let mut actions = PermissionActionSet::new();
        for perm in entry.permissions {
            actions.insert(PermissionAction::Use(perm.as_str().into()));
        }
        entries.insert(
            name,
            CallMapEntry { position: entry.position, calls: to_seq(&entry.calls), actions },
        );
    }
    Ok(CallMap::from_entries(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::FunctionBuilder;
    use crate::callmap::build_call_map;
    use crate::namemap::build_name_map;

    #[test]
    fn round_trips_a_simple_call_map() {
        let decl = FunctionBuilder::new("main", 1).calling(&["take_lock", "do_work"]).build();
        let (names, _) = build_name_map(&[decl]).unwrap();
        let (map, _) = build_call_map(&names);
        let text = dump_call_map(&map);
        let parsed = parse_call_map(&text).unwrap();
        let original = map.get("main").unwrap();
        let round_tripped = parsed.get("main").unwrap();
        assert_eq!(original.calls, round_tripped.calls);
    }

    #[test]
    fn malformed_json_is_a_call_map_parse_error() {
        assert!(parse_call_map("not json").is_err());
    }
}
