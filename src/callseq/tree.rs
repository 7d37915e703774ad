//! Call trees and call sequences (`spec.md` §3): the compact,
//! side-effect-preserving representation a function body lowers to.

/// A single node in a call sequence: either a call site, or a branch whose
/// two arms must both be analyzed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallTree {
    /// A call site naming an identifier (already static-prefixed if needed).
    Call(String),
    /// The two arms of a branch. `Choice` with an empty arm is equivalent to
    /// making that arm optional.
    Choice(CallSequence, CallSequence),
}

/// An ordered, finite sequence of call trees (sequential composition). The
/// empty sequence denotes "no call".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallSequence(pub Vec<CallTree>);

impl CallSequence {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn single(tree: CallTree) -> Self {
        Self(vec![tree])
    }

    pub fn call(name: impl Into<String>) -> Self {
        Self::single(CallTree::Call(name.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sequential composition: `self` then `other`, left-to-right.
    pub fn then(mut self, other: Self) -> Self {
        self.0.extend(other.0);
        self
    }

    pub fn push(&mut self, tree: CallTree) {
        self.0.push(tree);
    }

    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &CallTree> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Collapse adjacent empty arms, drop call-tree nodes whose contribution
    /// is entirely empty (both `Choice` arms reduce to nothing), and
    /// recursively simplify branch contents. Idempotent: simplifying an
    /// already-simplified sequence changes nothing.
    pub fn simplify(self) -> Self {
        let simplified: Vec<CallTree> = self
            .0
            .into_iter()
            .filter_map(CallTree::simplify)
            .collect();
        Self(simplified)
    }
}

impl CallTree {
    fn simplify(self) -> Option<CallTree> {
        match self {
            CallTree::Call(name) => Some(CallTree::Call(name)),
            CallTree::Choice(a, b) => {
                let a = a.simplify();
                let b = b.simplify();
                if a.is_empty() && b.is_empty() {
                    None
                } else {
                    Some(CallTree::Choice(a, b))
                }
            }
        }
    }
}

impl FromIterator<CallTree> for CallSequence {
    fn from_iter<T: IntoIterator<Item = CallTree>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_identity_for_then() {
        let s = CallSequence::call("f");
        assert_eq!(s.clone().then(CallSequence::empty()), s);
        assert_eq!(CallSequence::empty().then(s.clone()), s);
    }

    #[test]
    fn then_is_associative() {
        let a = CallSequence::call("a");
        let b = CallSequence::call("b");
        let c = CallSequence::call("c");
        assert_eq!(
            a.clone().then(b.clone()).then(c.clone()),
            a.then(b.then(c))
        );
    }

    #[test]
    fn simplify_drops_fully_empty_choice() {
        let seq = CallSequence(vec![
            CallTree::Choice(CallSequence::empty(), CallSequence::empty()),
            CallTree::Call("f".into()),
        ]);
        let simplified = seq.simplify();
        assert_eq!(simplified, CallSequence::call("f"));
    }

    #[test]
    fn simplify_keeps_optional_branch() {
        let seq = CallSequence::single(CallTree::Choice(CallSequence::empty(), CallSequence::call("f")));
        let simplified = seq.clone().simplify();
        assert_eq!(simplified, seq);
    }

    #[test]
    fn simplify_is_idempotent() {
        let seq = CallSequence(vec![
            CallTree::Choice(CallSequence::empty(), CallSequence::empty()),
            CallTree::Choice(CallSequence::call("a"), CallSequence::empty()),
            CallTree::Call("f".into()),
        ]);
        let once = seq.simplify();
        let twice = once.clone().simplify();
        assert_eq!(once, twice);
    }
}
