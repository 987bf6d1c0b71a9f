//! ε-elimination, reachability/garbage pruning, and the `self_closed`/`prefinal` derived flags.

use super::{Nfa, NfaState};

/// Removes every ε-edge, drops states unreachable from the start state or unable to reach an
/// accepting state, and stamps the per-state derived flags used by later passes.
pub fn normalize(nfa: &Nfa) -> Nfa {
    let closures = epsilon_closures(nfa);
    let n = nfa.state_count();

    let mut out = Nfa {
        states: vec![NfaState::default(); n],
        start: nfa.start,
        comment: nfa.comment.clone(),
    };
    for s in 0..n {
        let mut accepting = false;
        let mut transitions = Vec::new();
        for &r in &closures[s] {
            accepting |= nfa.states[r].accepting;
            transitions.extend(nfa.states[r].transitions.iter().copied());
        }
        out.states[s].accepting = accepting;
        out.states[s].transitions = transitions;
    }

    prune(&mut out);
    derive_flags(&mut out);
    out
}

fn epsilon_closures(nfa: &Nfa) -> Vec<Vec<usize>> {
    (0..nfa.state_count())
        .map(|s| {
            let mut seen = vec![false; nfa.state_count()];
            let mut stack = vec![s];
            let mut order = vec![s];
            seen[s] = true;
            while let Some(cur) = stack.pop() {
                for &next in &nfa.states[cur].epsilon {
                    if !seen[next] {
                        seen[next] = true;
                        stack.push(next);
                        order.push(next);
                    }
                }
            }
            order
        })
        .collect()
}

/// Drops states neither reachable from the start state nor able to reach an accepting state,
/// then renumbers the survivors so indices stay contiguous from 0.
fn prune(nfa: &mut Nfa) {
    let n = nfa.state_count();

    let mut forward = vec![false; n];
    let mut forward_order = vec![nfa.start];
    let mut stack = vec![nfa.start];
    forward[nfa.start] = true;
    while let Some(s) = stack.pop() {
        for &(_, t) in &nfa.states[s].transitions {
            if !forward[t] {
                forward[t] = true;
                forward_order.push(t);
                stack.push(t);
            }
        }
    }

    let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); n];
    for s in 0..n {
        for &(_, t) in &nfa.states[s].transitions {
            incoming[t].push(s);
        }
    }
    let mut backward = vec![false; n];
    let mut stack: Vec<usize> = (0..n).filter(|&s| nfa.states[s].accepting).collect();
    for &s in &stack {
        backward[s] = true;
    }
    while let Some(s) = stack.pop() {
        for &p in &incoming[s] {
            if !backward[p] {
                backward[p] = true;
                stack.push(p);
            }
        }
    }

    let keep: Vec<bool> = (0..n)
        .map(|s| s == nfa.start || (forward[s] && backward[s]))
        .collect();

    // State ordering is a depth-first ordering from q0: renumber survivors by the order they were
    // first reached in the forward-reachability walk above, not by original index.
    let mut new_index = vec![usize::MAX; n];
    let mut next = 0;
    for &s in &forward_order {
        if keep[s] {
            new_index[s] = next;
            next += 1;
        }
    }

    // Built by new index, not by original index: the two orders diverge now that survivors are
    // renumbered by DFS visit order rather than original position.
    let mut new_states: Vec<NfaState> = vec![NfaState::default(); next];
    for s in 0..n {
        if !keep[s] {
            continue;
        }
        let old = &nfa.states[s];
        let transitions = old
            .transitions
            .iter()
            .filter(|&&(_, t)| keep[t])
            .map(|&(m, t)| (m, new_index[t]))
            .collect();
        new_states[new_index[s]] = NfaState {
            transitions,
            epsilon: Vec::new(),
            accepting: old.accepting,
            self_closed: false,
            prefinal: false,
        };
    }

    nfa.start = new_index[nfa.start];
    nfa.states = new_states;
}

fn derive_flags(nfa: &mut Nfa) {
    let n = nfa.state_count();
    for s in 0..n {
        let transitions = &nfa.states[s].transitions;
        let self_closed = !transitions.is_empty() && transitions.iter().all(|&(_, t)| t == s);
        let prefinal = !transitions.is_empty()
            && transitions.iter().all(|&(_, t)| nfa.states[t].accepting);
        nfa.states[s].self_closed = self_closed;
        nfa.states[s].prefinal = prefinal;
    }
}
