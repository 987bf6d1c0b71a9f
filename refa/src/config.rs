//! Explicit configuration threaded into the pipeline, replacing any global mutable state.

/// Mode flags parsed from the trailing `/flags` portion of a pattern.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegexFlags {
    /// `s`: `.` also matches `\n`.
    pub dot_all: bool,
    /// `m`: `^`/`$` additionally match right after/before a `\n`.
    pub multiline: bool,
    /// `i`: case-insensitive matching.
    pub case_insensitive: bool,
}

impl RegexFlags {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut flags = Self::default();
        for &b in bytes {
            match b {
                b's' => flags.dot_all = true,
                b'm' => flags.multiline = true,
                b'i' => flags.case_insensitive = true,
                // Unknown flag bytes are silently ignored.
                _ => {}
            }
        }
        flags
    }
}

/// Configuration for a single compile pipeline run.
///
/// Passed explicitly end to end instead of read from global/static state.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompileConfig {
    /// Abort subset construction once this many DFA states have been allocated.
    pub state_limit: Option<usize>,
    /// Abort minimization once this many partition classes are live.
    pub class_limit: Option<usize>,
}

impl CompileConfig {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_state_limit(mut self, limit: usize) -> Self {
        self.state_limit = Some(limit);
        self
    }

    pub fn with_class_limit(mut self, limit: usize) -> Self {
        self.class_limit = Some(limit);
        self
    }
}
