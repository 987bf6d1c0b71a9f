//! The NFA produced by Thompson construction, before ε-elimination.
//!
//! Mirrors `dandy`'s `nfa` module shape (states + per-state transition lists + epsilon lists)
//! generalized from the grapheme alphabet to the fixed byte alphabet.

pub mod normalize;
pub mod subset;

use crate::charclass::ByteSet;

/// One state: a list of `(byte-set, target)` edges plus epsilon edges to other states.
#[derive(Debug, Clone, Default)]
pub struct NfaState {
    pub transitions: Vec<(ByteSet, usize)>,
    pub epsilon: Vec<usize>,
    pub accepting: bool,
    /// Set by [`normalize`]: true if every outgoing byte-transition loops back to this state.
    pub self_closed: bool,
    /// Set by [`normalize`]: true if every outgoing byte-transition leads to an accepting state.
    pub prefinal: bool,
}

/// A Thompson-construction NFA: possibly-ε-edged, not yet minimized or subset-constructed.
#[derive(Debug, Clone, Default)]
pub struct Nfa {
    pub states: Vec<NfaState>,
    pub start: usize,
    /// Free-text annotation carried through to the [`Dfa`](crate::dfa::Dfa) this NFA eventually
    /// becomes — typically the original pattern text.
    pub comment: String,
}

impl Nfa {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self) -> usize {
        self.states.push(NfaState::default());
        self.states.len() - 1
    }

    pub fn add_transition(&mut self, from: usize, mask: ByteSet, to: usize) {
        self.states[from].transitions.push((mask, to));
    }

    pub fn add_epsilon(&mut self, from: usize, to: usize) {
        if from != to {
            self.states[from].epsilon.push(to);
        }
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

pub use normalize::normalize;
pub use subset::subset_construct;
