//! `/body/flags` pattern parsing and the end-to-end pattern → DFA pipeline.

pub mod compile;
pub mod parser;
pub mod tree;

pub use tree::{RegexTree, Repeat};

use log::debug;

use crate::config::{CompileConfig, RegexFlags};
use crate::dfa::Dfa;
use crate::error::Result;
use crate::nfa::{normalize, subset_construct};

/// A compiled pattern: the minimized DFA plus the flags it was compiled with.
#[derive(Debug, Clone)]
pub struct Regex {
    dfa: Dfa,
    flags: RegexFlags,
}

impl Regex {
    pub fn compile(pattern: &str) -> Result<Regex> {
        Self::compile_with(pattern, CompileConfig::unbounded())
    }

    pub fn compile_with(pattern: &str, config: CompileConfig) -> Result<Regex> {
        let (tree, flags) = parser::compile(pattern)?;
        debug!("parsed {pattern:?} into tree with flags {flags:?}");

        let raw_nfa = compile::tree_to_nfa(&tree, pattern);
        debug!("thompson construction produced {} states", raw_nfa.state_count());

        let nfa = normalize(&raw_nfa);
        debug!("normalized nfa has {} states", nfa.state_count());

        let dfa = subset_construct(&nfa, &config)?;
        debug!("subset construction produced {} dfa states", dfa.state_count());

        let dfa = crate::dfa::minimize::minimize_with(&dfa, config.class_limit)?;
        debug!("minimized dfa has {} states", dfa.state_count());

        Ok(Regex { dfa, flags })
    }

    pub fn flags(&self) -> RegexFlags {
        self.flags
    }

    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    pub fn is_match(&self, input: &[u8]) -> bool {
        self.dfa.accepts(input)
    }
}
