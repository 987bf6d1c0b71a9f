//! Thompson construction: turns a [`RegexTree`] into a λ-NFA.

use crate::nfa::Nfa;

use super::tree::{RegexTree, Repeat};

pub fn tree_to_nfa(tree: &RegexTree, comment: impl Into<String>) -> Nfa {
    let mut nfa = Nfa::new();
    nfa.comment = comment.into();
    let start = nfa.add_state();
    nfa.start = start;
    let end = build(&mut nfa, tree, start);
    nfa.states[end].accepting = true;
    nfa
}

fn build(nfa: &mut Nfa, tree: &RegexTree, from: usize) -> usize {
    match tree {
        RegexTree::Empty => from,
        RegexTree::Char(b) => {
            let to = nfa.add_state();
            nfa.add_transition(from, crate::charclass::ByteSet::singleton(*b), to);
            to
        }
        RegexTree::CharClass(mask) => {
            let to = nfa.add_state();
            nfa.add_transition(from, *mask, to);
            to
        }
        RegexTree::Concat(items) => {
            let mut cur = from;
            for item in items {
                cur = build(nfa, item, cur);
            }
            cur
        }
        RegexTree::Union(branches) => {
            let end = nfa.add_state();
            for branch in branches {
                let branch_end = build(nfa, branch, from);
                nfa.add_epsilon(branch_end, end);
            }
            end
        }
        RegexTree::Repeat(inner, r) => build_repeat(nfa, inner, r, from),
    }
}

/// `min` mandatory copies, then either an unbounded loop (`max == None`) or `max - min` optional
/// copies all epsilon-joined into a shared exit state.
fn build_repeat(nfa: &mut Nfa, inner: &RegexTree, r: &Repeat, from: usize) -> usize {
    let mut cur = from;
    for _ in 0..r.min {
        cur = build(nfa, inner, cur);
    }
    match r.max {
        None => {
            let loop_end = build(nfa, inner, cur);
            nfa.add_epsilon(loop_end, cur);
            cur
        }
        Some(max) => {
            let optional = max - r.min;
            if optional == 0 {
                return cur;
            }
            let after = nfa.add_state();
            nfa.add_epsilon(cur, after);
            for _ in 0..optional {
                cur = build(nfa, inner, cur);
                nfa.add_epsilon(cur, after);
            }
            after
        }
    }
}
