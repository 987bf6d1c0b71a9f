//! The deterministic automaton: a packed transition table plus a per-state accepting flag.

pub mod algebra;
pub mod format;
pub mod minimize;
pub mod packed;

use std::collections::VecDeque;

use crate::charclass::ByteSet;
use crate::nfa::{Nfa, NfaState};
use packed::{PackedTable, Width};

/// A complete DFA over the byte alphabet. Missing transitions are the implicit DEADEND sink:
/// once a byte has no outgoing edge from the current state, the whole input is rejected.
#[derive(Debug, Clone)]
pub struct Dfa {
    table: PackedTable,
    accepting: Vec<bool>,
    start: usize,
    /// Free-text annotation carried alongside the automaton (the originating pattern text, or a
    /// `\n`-joined record of the inputs combined to produce it). Never inspected by matching.
    comment: String,
}

impl Dfa {
    pub fn from_parts(table: PackedTable, accepting: Vec<bool>, start: usize) -> Self {
        Self::from_parts_with_comment(table, accepting, start, String::new())
    }

    pub fn from_parts_with_comment(
        table: PackedTable,
        accepting: Vec<bool>,
        start: usize,
        comment: String,
    ) -> Self {
        debug_assert_eq!(table.rows(), accepting.len());
        Self { table, accepting, start, comment }
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn state_count(&self) -> usize {
        self.table.rows()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn is_accepting(&self, state: usize) -> bool {
        self.accepting[state]
    }

    pub fn step(&self, state: usize, byte: u8) -> Option<usize> {
        self.table.get(state, byte)
    }

    pub fn width(&self) -> Width {
        self.table.width()
    }

    /// Runs the whole input through the table; an unmatched byte lands in DEADEND and short
    /// circuits to a rejection instead of walking the rest of the input.
    pub fn accepts(&self, input: &[u8]) -> bool {
        let mut state = self.start;
        for &b in input {
            match self.step(state, b) {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.accepting[state]
    }

    /// Every state reachable from the start state, in BFS order (the start state is always
    /// first). Unreachable rows can appear in a table built by [`algebra`] before their garbage
    /// is collected; this is the order used to walk "the DFA" everywhere else.
    pub fn reachable_states(&self) -> Vec<usize> {
        let mut seen = vec![false; self.state_count()];
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        seen[self.start] = true;
        queue.push_back(self.start);
        while let Some(s) = queue.pop_front() {
            order.push(s);
            for b in 0u16..256 {
                if let Some(t) = self.step(s, b as u8) {
                    if !seen[t] {
                        seen[t] = true;
                        queue.push_back(t);
                    }
                }
            }
        }
        order
    }

    /// Embeds this DFA as an NFA: each DFA state becomes an NFA state, and each run of bytes
    /// sharing a target is folded into one `ByteSet` edge. Used by [`algebra`] to reuse the
    /// subset-construction machinery for union/append instead of duplicating it.
    pub fn to_nfa(&self) -> Nfa {
        let n = self.state_count();
        let mut states = vec![NfaState::default(); n];
        for s in 0..n {
            states[s].accepting = self.accepting[s];
            let mut by_target: std::collections::BTreeMap<usize, ByteSet> = std::collections::BTreeMap::new();
            for b in 0u16..256 {
                if let Some(t) = self.step(s, b as u8) {
                    by_target.entry(t).or_insert_with(ByteSet::empty).insert(b as u8);
                }
            }
            states[s].transitions = by_target.into_iter().map(|(t, mask)| (mask, t)).collect();
        }
        Nfa { states, start: self.start, comment: self.comment.clone() }
    }

    /// Structural equivalence: both automata are minimized first (canonical up to state
    /// renumbering), then compared via a BFS relabeling from each start state.
    pub fn equivalent_to(&self, other: &Dfa) -> bool {
        let a = minimize::minimize(self);
        let b = minimize::minimize(other);
        canonical_form(&a) == canonical_form(&b)
    }
}

/// A minimized DFA's shape, independent of how its states happen to be numbered: relabel states
/// in BFS-discovery order and record `(accepting, [target_or_sink; 256])` for each.
fn canonical_form(dfa: &Dfa) -> Vec<(bool, Vec<Option<usize>>)> {
    let order = dfa.reachable_states();
    let mut relabel = vec![usize::MAX; dfa.state_count()];
    for (new, &old) in order.iter().enumerate() {
        relabel[old] = new;
    }
    order
        .iter()
        .map(|&s| {
            let row = (0u16..256)
                .map(|b| dfa.step(s, b as u8).map(|t| relabel[t]))
                .collect();
            (dfa.is_accepting(s), row)
        })
        .collect()
}
