//! Deferred type-union matching.
//!
//! `match_kind`/`match_array` never fail on their own: an element that does not
//! fit a case is simply skipped. Whether *some* declared case covered every
//! element is decided when the node's result is read.
//!
//! ```text
//! Idle ──declare──▶ Matching(cases) ──read, not fatal──▶ Resolved
//!   ▲                    │  ▲                                │
//!   └──── flatten ───────┘  └────────────declare─────────────┘
//! ```
use indexmap::IndexSet;
use tracing::debug;

use super::{Kind, Node};
use crate::error::ContractViolation;
use crate::value::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchCase {
    Kind(Kind),
    /// The synthetic case declared by `match_array`.
    Array,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(super) enum MatchState {
    #[default]
    Idle,
    Matching(IndexSet<MatchCase>),
    Resolved,
}

impl MatchState {
    /// # Panics
    ///
    /// If `case` is already pending.
    fn declare(&mut self, case: MatchCase) {
        match self {
            MatchState::Matching(cases) => {
                if !cases.insert(case) {
                    panic!("{}", ContractViolation::DuplicateMatch(case));
                }
            }
            MatchState::Idle | MatchState::Resolved => {
                *self = MatchState::Matching(IndexSet::from([case]));
            }
        }
    }

    pub(super) fn reset(&mut self) { *self = MatchState::Idle; }
}

impl<'a> Node<'a> {
    /// Declares `kind` as a case without inspecting matching elements further.
    pub fn match_kind(&mut self, kind: Kind) -> &mut Self {
        self.match_kind_with(kind, |_| {})
    }

    /// Declares `kind` as a case and runs `visit` on a child for every buffered
    /// element of that kind. Elements of other kinds are skipped here; if no
    /// declared case covers them, that is reported when the result is read.
    ///
    /// # Panics
    ///
    /// If `kind` is already a pending case on this node.
    pub fn match_kind_with<F>(&mut self, kind: Kind, mut visit: F) -> &mut Self
    where
        F: FnMut(&mut Node<'a>),
    {
        if self.fatal { return self; }
        self.matches.declare(MatchCase::Kind(kind));

        for i in 0..self.buffer.len() {
            let item: &'a Value = self.buffer[i];
            if item.kind() != kind { continue; }

            let mut child = Node::scalar(item, self.iterator_label(i));
            visit(&mut child);
            if self.fold("", child) { break; }
        }
        self
    }

    /// Declares the array case. Every object-kind element is dispatched: arrays
    /// to `on_array` on a flattened child, everything else to `on_other` on a
    /// scalar child.
    ///
    /// # Panics
    ///
    /// If the array case is already pending on this node.
    pub fn match_array<A, O>(&mut self, mut on_array: A, mut on_other: O) -> &mut Self
    where
        A: FnMut(&mut Node<'a>),
        O: FnMut(&mut Node<'a>),
    {
        if self.fatal { return self; }
        self.matches.declare(MatchCase::Array);

        for i in 0..self.buffer.len() {
            let item: &'a Value = self.buffer[i];
            if item.kind() != Kind::Object { continue; }

            let label = self.iterator_label(i);
            let child = match item.elements() {
                Some(elements) => {
                    let mut child = Node::flattened(elements, label);
                    on_array(&mut child);
                    child
                }
                None => {
                    let mut child = Node::scalar(item, label);
                    on_other(&mut child);
                    child
                }
            };
            if self.fold("", child) { break; }
        }
        self
    }

    /// Turns pending cases into a real check: every element not covered by a
    /// declared case gets a type mismatch listing the declared kinds. Skipped
    /// while fatal, leaving the cases pending.
    ///
    /// Coverage is checked against the cases alone. A `type_any` that already
    /// passed does not vouch for the elements, so `type_any(&[Number, String])`
    /// followed by `match_kind(Number)` still rejects a string.
    pub(super) fn resolve_matches(&mut self) {
        if self.fatal || !matches!(self.matches, MatchState::Matching(_)) { return; }
        let MatchState::Matching(cases) = std::mem::replace(&mut self.matches, MatchState::Resolved) else {
            return;
        };
        debug!(label = %self.label, cases = ?cases, "resolving pending match cases");

        // the array case dispatches every object-kind element
        let mut expected: IndexSet<Kind> = cases.iter()
            .filter_map(|case| match case {
                MatchCase::Kind(kind) => Some(*kind),
                MatchCase::Array => None,
            })
            .collect();
        if cases.contains(&MatchCase::Array) {
            expected.insert(Kind::Object);
        }
        self.check_kinds(&expected.into_iter().collect::<Vec<_>>());
    }
}
