//! Hopcroft-style partition refinement.
//!
//! The missing-edge DEADEND sink is folded in as one synthetic extra state with a self-loop on
//! every byte, so the refinement below always works over a total transition function; real trap
//! states naturally merge into it, which is exactly the minimization we want.

use std::collections::{BTreeSet, VecDeque};

use crate::error::{Error, Result};

use super::packed::PackedTable;
use super::Dfa;

/// Minimizes with no cap on the number of live partitions. Cannot fail: a `None` limit never
/// trips the bound checked by [`minimize_with`].
pub fn minimize(dfa: &Dfa) -> Dfa {
    match minimize_with(dfa, None) {
        Ok(d) => d,
        Err(_) => unreachable!("unbounded minimize cannot exceed a partition-class limit"),
    }
}

pub fn minimize_with(dfa: &Dfa, class_limit: Option<usize>) -> Result<Dfa> {
    let old_n = dfa.state_count();
    let dead = old_n;
    let total = old_n + 1;

    let trans = |s: usize, b: u8| -> usize {
        if s == dead {
            dead
        } else {
            dfa.step(s, b).unwrap_or(dead)
        }
    };

    // rev[b][t] = every source state s with trans(s, b) == t.
    let mut rev: Vec<Vec<Vec<usize>>> = vec![vec![Vec::new(); total]; 256];
    for s in 0..total {
        for b in 0u16..256 {
            let t = trans(s, b as u8);
            rev[b as usize][t].push(s);
        }
    }

    let accepting_set: Vec<usize> = (0..total).filter(|&s| s != dead && dfa.is_accepting(s)).collect();
    let nonaccepting_set: Vec<usize> = (0..total).filter(|&s| s == dead || !dfa.is_accepting(s)).collect();

    let mut partitions: Vec<Vec<usize>> = Vec::new();
    if !accepting_set.is_empty() {
        partitions.push(accepting_set);
    }
    if !nonaccepting_set.is_empty() {
        partitions.push(nonaccepting_set);
    }

    let mut state_part = vec![0usize; total];
    for (pi, p) in partitions.iter().enumerate() {
        for &s in p {
            state_part[s] = pi;
        }
    }

    // ITSELF: a partition popped off the worklist is examined as a splitter directly.
    // PREIMAGE: when splitting Y by the preimage X of a splitter, the half not already queued
    // (preferring the smaller one) is what actually gets pushed back onto the worklist.
    let mut worklist: VecDeque<usize> = (0..partitions.len()).collect();

    while let Some(a_idx) = worklist.pop_front() {
        if a_idx >= partitions.len() || partitions[a_idx].is_empty() {
            continue;
        }
        let a_members = partitions[a_idx].clone();
        for b in 0u16..256 {
            let mut in_x = vec![false; total];
            let mut touched: BTreeSet<usize> = BTreeSet::new();
            for &t in &a_members {
                for &s in &rev[b as usize][t] {
                    if !in_x[s] {
                        in_x[s] = true;
                        touched.insert(state_part[s]);
                    }
                }
            }
            for y_idx in touched {
                let y = &partitions[y_idx];
                let (inside, outside): (Vec<usize>, Vec<usize>) = y.iter().partition(|&&s| in_x[s]);
                if inside.is_empty() || outside.is_empty() {
                    continue;
                }
                if let Some(limit) = class_limit {
                    if partitions.len() >= limit {
                        return Err(Error::ClassLimit { limit });
                    }
                }
                let y_was_pending = worklist.contains(&y_idx);
                partitions[y_idx] = inside.clone();
                let new_idx = partitions.len();
                partitions.push(outside.clone());
                for &s in &outside {
                    state_part[s] = new_idx;
                }
                if y_was_pending {
                    worklist.push_back(new_idx);
                } else if inside.len() <= outside.len() {
                    worklist.push_back(y_idx);
                } else {
                    worklist.push_back(new_idx);
                }
            }
        }
    }

    Ok(rebuild(dfa, &partitions, &state_part, dead))
}

fn rebuild(old: &Dfa, partitions: &[Vec<usize>], state_part: &[usize], dead: usize) -> Dfa {
    let dead_part = state_part[dead];
    let start_part = state_part[old.start()];

    if start_part == dead_part {
        // The start state can never reach an accepting state: the minimized language is empty,
        // represented as the single all-DEADEND state.
        let table = PackedTable::new(1, 0);
        return Dfa::from_parts_with_comment(table, vec![false], 0, old.comment().to_string());
    }

    let mut new_index: Vec<Option<usize>> = vec![None; partitions.len()];
    let mut order = vec![start_part];
    for (pi, p) in partitions.iter().enumerate() {
        if pi != dead_part && pi != start_part && !p.is_empty() {
            order.push(pi);
        }
    }
    let mut next = 0;
    for &pi in &order {
        new_index[pi] = Some(next);
        next += 1;
    }

    let rows = next;
    let mut table = PackedTable::new(rows, rows.saturating_sub(1));
    let mut accepting = vec![false; rows];

    for &pi in &order {
        let new_i = new_index[pi].unwrap();
        let rep = partitions[pi][0];
        accepting[new_i] = rep != dead && old.is_accepting(rep);
        for b in 0u16..256 {
            let byte = b as u8;
            let target = if rep == dead { dead } else { old.step(rep, byte).unwrap_or(dead) };
            let mapped = new_index[state_part[target]];
            table.set(new_i, byte, mapped);
        }
    }

    let new_start = new_index[start_part].expect("start partition always survives");
    Dfa::from_parts_with_comment(table, accepting, new_start, old.comment().to_string())
}
