//! NFA → DFA subset construction over an already ε-eliminated NFA.

use std::collections::{BTreeMap, VecDeque};

use crate::config::CompileConfig;
use crate::dfa::packed::{PackedTable, Width};
use crate::dfa::Dfa;
use crate::error::{Error, Result};

use super::Nfa;

struct Builder {
    rows: Vec<Vec<Option<usize>>>,
    accepting: Vec<bool>,
    sets: Vec<Vec<usize>>,
}

/// Runs subset construction, returning a fully-packed [`Dfa`].
///
/// `nfa` must already be ε-eliminated (see [`super::normalize`]). State-set keys are sorted,
/// deduplicated NFA-state-index vectors kept in a `BTreeMap`, and the worklist is a FIFO so newly
/// discovered sets are processed in the order they were first reached.
pub fn subset_construct(nfa: &Nfa, config: &CompileConfig) -> Result<Dfa> {
    let mut keys: BTreeMap<Vec<usize>, usize> = BTreeMap::new();
    let mut builder = Builder { rows: Vec::new(), accepting: Vec::new(), sets: Vec::new() };
    let mut queue: VecDeque<usize> = VecDeque::new();

    let start_key = sorted_unique(vec![nfa.start]);
    let start_idx = alloc(&mut keys, &mut builder, nfa, start_key, config)?;
    queue.push_back(start_idx);

    while let Some(cur) = queue.pop_front() {
        let cur_set = builder.sets[cur].clone();

        for b in 0u16..256 {
            let byte = b as u8;
            let mut target = Vec::new();
            for &s in &cur_set {
                for &(mask, t) in &nfa.states[s].transitions {
                    if mask.contains(byte) {
                        target.push(t);
                    }
                }
            }
            let target = sorted_unique(target);
            if target.is_empty() {
                continue;
            }
            let target_idx = match keys.get(&target) {
                Some(&idx) => idx,
                None => {
                    let idx = alloc(&mut keys, &mut builder, nfa, target, config)?;
                    queue.push_back(idx);
                    idx
                }
            };
            builder.rows[cur][byte as usize] = Some(target_idx);
        }
    }

    Ok(pack(builder, start_idx, nfa.comment.clone()))
}

fn sorted_unique(mut v: Vec<usize>) -> Vec<usize> {
    v.sort_unstable();
    v.dedup();
    v
}

fn alloc(
    keys: &mut BTreeMap<Vec<usize>, usize>,
    builder: &mut Builder,
    nfa: &Nfa,
    key: Vec<usize>,
    config: &CompileConfig,
) -> Result<usize> {
    if let Some(limit) = config.state_limit {
        if builder.rows.len() >= limit {
            return Err(Error::StateLimit { limit });
        }
    }
    let idx = builder.rows.len();
    let accepting = key.iter().any(|&s| nfa.states[s].accepting);
    builder.rows.push(vec![None; 256]);
    builder.accepting.push(accepting);
    builder.sets.push(key.clone());
    keys.insert(key, idx);
    Ok(idx)
}

fn pack(builder: Builder, start: usize, comment: String) -> Dfa {
    let rows = builder.rows.len();
    let max_index = rows.saturating_sub(1);
    let mut table = PackedTable::new(rows, max_index);
    // PackedTable::new already picks the narrowest width for max_index; resize_width is a no-op
    // here but documents that callers needing a specific width (e.g. after minimization) can ask.
    table.resize_width(Width::smallest_for(max_index as u64));
    for (state, row) in builder.rows.iter().enumerate() {
        for (byte, target) in row.iter().enumerate() {
            table.set(state, byte as u8, *target);
        }
    }
    Dfa::from_parts_with_comment(table, builder.accepting, start, comment)
}
