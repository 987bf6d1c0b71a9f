//! Argument definitions for every subcommand.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "refa", version, about = "Compile /body/flags patterns and combine the resulting automata")]
pub struct RefaArgs {
    /// Suppress the progress lines each subcommand prints to stdout before its result.
    #[arg(long, global = true)]
    pub no_log: bool,
    /// Raise the log crate's level; repeat for more (-v = info, -vv = debug, -vvv = trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a pattern into a minimized DFA and write it to disk.
    Compile(CompileArgs),
    /// Check whether a single input matches a compiled automaton.
    Test(TestArgs),
    /// Check every line of one or more files against a compiled automaton.
    TestFiles(TestFileArgs),
    Union(BinaryOpArgs),
    Intersection(BinaryOpArgs),
    Difference(BinaryOpArgs),
    SymmetricDifference(BinaryOpArgs),
    /// Compare a compiled automaton against others for language equivalence.
    Equivalence(EquivalenceArgs),
    /// Print the state count, start state and transition table of a compiled automaton.
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug)]
pub struct CompileArgs {
    /// One or more `/body/flags` patterns, e.g. `/a[bc]+/i`.
    #[arg(required = true)]
    pub pattern: Vec<String>,
    /// Reduce a batch of more than one pattern into a single DFA via repeated union. Required
    /// whenever more than one pattern is given.
    #[arg(long)]
    pub join: bool,
    /// Where to write the compiled automaton.
    #[arg(short, long)]
    pub output: PathBuf,
    /// Compress the transition table with gzip instead of storing it flat.
    #[arg(long)]
    pub gzip: bool,
    /// Abort subset construction past this many DFA states.
    #[arg(long)]
    pub state_limit: Option<usize>,
    /// Abort minimization past this many live partitions.
    #[arg(long)]
    pub class_limit: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct TestArgs {
    pub automata: PathBuf,
    pub input: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TestMode {
    /// Every line is tested and reported individually.
    Lines,
    /// Stop at (and report) the first line that fails; otherwise report overall success.
    FirstFailure,
}

#[derive(clap::Args, Debug)]
pub struct TestFileArgs {
    pub automata: PathBuf,
    pub files: Vec<PathBuf>,
    #[arg(long, value_enum, default_value_t = TestMode::Lines)]
    pub mode: TestMode,
}

#[derive(clap::Args, Debug)]
pub struct BinaryOpArgs {
    pub first: PathBuf,
    pub second: PathBuf,
    /// Minimize both inputs before combining them.
    #[arg(long)]
    pub minimized: bool,
    /// Write the (always minimized) result here instead of just printing its state count.
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub gzip: bool,
}

#[derive(clap::Args, Debug)]
pub struct EquivalenceArgs {
    pub first: PathBuf,
    pub files: Vec<PathBuf>,
    /// Print `true`/`false` instead of a descriptive result per file.
    #[arg(long)]
    pub bool: bool,
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    pub automata: PathBuf,
}
