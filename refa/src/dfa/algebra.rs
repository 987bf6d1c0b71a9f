//! Binary and unary operations on built DFAs: union/intersection/difference by product
//! construction, and concatenation by accepting-state splicing.

use std::collections::{BTreeMap, VecDeque};

use crate::error::{Error, Result};

use super::packed::PackedTable;
use super::Dfa;

type Pair = (Option<usize>, Option<usize>);

fn pair_accepting(a: &Dfa, b: &Dfa, pair: Pair, combine: fn(bool, bool) -> bool) -> bool {
    let av = pair.0.is_some_and(|s| a.is_accepting(s));
    let bv = pair.1.is_some_and(|s| b.is_accepting(s));
    combine(av, bv)
}

/// Product construction. A `(None, None)` pair is the implicit DEADEND sink and is never
/// allocated as a real state: both automata have run out of transitions, so the product can
/// never accept from there regardless of `combine`.
fn product(a: &Dfa, b: &Dfa, combine: fn(bool, bool) -> bool, comment: String) -> Dfa {
    let mut keys: BTreeMap<Pair, usize> = BTreeMap::new();
    let mut rows: Vec<Vec<Option<usize>>> = Vec::new();
    let mut accepting: Vec<bool> = Vec::new();
    let mut pairs: Vec<Pair> = Vec::new();
    let mut queue: VecDeque<usize> = VecDeque::new();

    let start_pair: Pair = (Some(a.start()), Some(b.start()));
    let start_idx = rows.len();
    rows.push(vec![None; 256]);
    accepting.push(pair_accepting(a, b, start_pair, combine));
    pairs.push(start_pair);
    keys.insert(start_pair, start_idx);
    queue.push_back(start_idx);

    while let Some(cur) = queue.pop_front() {
        let (pa, pb) = pairs[cur];
        for byte in 0u16..256 {
            let byte = byte as u8;
            let na = pa.and_then(|s| a.step(s, byte));
            let nb = pb.and_then(|s| b.step(s, byte));
            if na.is_none() && nb.is_none() {
                continue;
            }
            let next_pair = (na, nb);
            let target_idx = match keys.get(&next_pair) {
                Some(&idx) => idx,
                None => {
                    let idx = rows.len();
                    rows.push(vec![None; 256]);
                    accepting.push(pair_accepting(a, b, next_pair, combine));
                    pairs.push(next_pair);
                    keys.insert(next_pair, idx);
                    queue.push_back(idx);
                    idx
                }
            };
            rows[cur][byte as usize] = Some(target_idx);
        }
    }

    pack(rows, accepting, start_idx, comment)
}

/// Joins two comments the way every binary operation below combines its inputs' annotations: both
/// kept, newline-separated, empty operands dropped instead of leaving a stray blank line.
fn join_comments(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => String::new(),
        (true, false) => b.to_string(),
        (false, true) => a.to_string(),
        (false, false) => format!("{a}\n{b}"),
    }
}

pub fn union(a: &Dfa, b: &Dfa) -> Dfa {
    product(a, b, |x, y| x || y, join_comments(a.comment(), b.comment()))
}

pub fn intersect(a: &Dfa, b: &Dfa) -> Dfa {
    product(a, b, |x, y| x && y, join_comments(a.comment(), b.comment()))
}

pub fn difference(a: &Dfa, b: &Dfa) -> Dfa {
    product(a, b, |x, y| x && !y, join_comments(a.comment(), b.comment()))
}

pub fn symmetric_difference(a: &Dfa, b: &Dfa) -> Dfa {
    product(a, b, |x, y| x ^ y, join_comments(a.comment(), b.comment()))
}

/// Concatenation: every accepting state of `a` grows a free (non-consuming) splice into `b`'s
/// transition row, so any accepting state of `a` also behaves like `b`'s start state from there
/// on. Requires `a` to have at least one accepting state, the same way the source library
/// requires an acceptor before it can be appended to.
pub fn append(a: &Dfa, b: &Dfa) -> Result<Dfa> {
    if !(0..a.state_count()).any(|s| a.is_accepting(s)) {
        return Err(Error::NotApplicable("append requires the left automaton to accept at least one string"));
    }

    let a_n = a.state_count();
    let b_n = b.state_count();
    // Layout: states 0..a_n are a's states (verbatim except accepting states also gain b's edges
    // merged in), states a_n..a_n+b_n are a fresh copy of b's states.
    let total = a_n + b_n;
    let mut rows: Vec<Vec<Option<usize>>> = vec![vec![None; 256]; total];
    let mut accepting = vec![false; total];

    for s in 0..a_n {
        for byte in 0u16..256 {
            let byte = byte as u8;
            rows[s][byte as usize] = a.step(s, byte);
        }
        // An accepting state of `a` is also, simultaneously, `b`'s start state: wherever `b`'s
        // start state has a transition, it overwrites whatever `a` had there, so matching a full
        // string in `a` alone no longer reads as matching the concatenation.
        if a.is_accepting(s) {
            accepting[s] = b.is_accepting(b.start());
            for byte in 0u16..256 {
                let byte = byte as u8;
                if let Some(t) = b.step(b.start(), byte) {
                    rows[s][byte as usize] = Some(a_n + t);
                }
            }
        }
    }
    for s in 0..b_n {
        accepting[a_n + s] = b.is_accepting(s);
        for byte in 0u16..256 {
            let byte = byte as u8;
            if let Some(t) = b.step(s, byte) {
                rows[a_n + s][byte as usize] = Some(a_n + t);
            }
        }
    }

    Ok(pack(rows, accepting, a.start(), join_comments(a.comment(), b.comment())))
}

fn pack(rows: Vec<Vec<Option<usize>>>, accepting: Vec<bool>, start: usize, comment: String) -> Dfa {
    let n = rows.len();
    let mut table = PackedTable::new(n, n.saturating_sub(1));
    for (state, row) in rows.iter().enumerate() {
        for (byte, target) in row.iter().enumerate() {
            table.set(state, byte as u8, *target);
        }
    }
    Dfa::from_parts_with_comment(table, accepting, start, comment)
}
