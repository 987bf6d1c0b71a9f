mod automata;
mod binary_op;
mod cli;
mod equivalence;
mod test_files;

use clap::Parser;
use log::LevelFilter;
use thiserror::Error;

use refa::config::CompileConfig;
use refa::dfa::{algebra, minimize};
use refa::regex::Regex;

use cli::{Command, RefaArgs};

#[derive(Debug, Error)]
enum CliError {
    #[error("only one pattern was given without --join ({0} patterns require it)")]
    JoinRequired(usize),
    #[error(transparent)]
    Compile(#[from] refa::Error),
    #[error(transparent)]
    Automata(#[from] automata::Error),
    #[error(transparent)]
    BinaryOp(#[from] binary_op::Error),
    #[error(transparent)]
    Equivalence(#[from] equivalence::Error),
    #[error(transparent)]
    TestFiles(#[from] test_files::Error),
}

fn main() {
    let args = RefaArgs::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();

    let result = match &args.command {
        Command::Compile(compile_args) => compile(&args, compile_args),
        Command::Test(test_args) => test_one(&args, test_args),
        Command::TestFiles(test_file_args) => test_files::run(&args, test_file_args).map_err(CliError::from),
        Command::Union(op_args) => binary_op::run(&args, op_args, binary_op::Op::Union).map_err(CliError::from),
        Command::Intersection(op_args) => {
            binary_op::run(&args, op_args, binary_op::Op::Intersection).map_err(CliError::from)
        }
        Command::Difference(op_args) => {
            binary_op::run(&args, op_args, binary_op::Op::Difference).map_err(CliError::from)
        }
        Command::SymmetricDifference(op_args) => {
            binary_op::run(&args, op_args, binary_op::Op::SymmetricDifference).map_err(CliError::from)
        }
        Command::Equivalence(eq_args) => equivalence::run(&args, eq_args).map_err(CliError::from),
        Command::Inspect(inspect_args) => inspect(inspect_args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn compile(main_args: &RefaArgs, args: &cli::CompileArgs) -> Result<(), CliError> {
    let log = |s: &str| {
        if !main_args.no_log {
            println!("{s}");
        }
    };

    if args.pattern.len() > 1 && !args.join {
        return Err(CliError::JoinRequired(args.pattern.len()));
    }

    let mut config = CompileConfig::unbounded();
    if let Some(limit) = args.state_limit {
        config = config.with_state_limit(limit);
    }
    if let Some(limit) = args.class_limit {
        config = config.with_class_limit(limit);
    }

    let first = Regex::compile_with(&args.pattern[0], config)?;
    let mut dfa = first.dfa().clone();
    for pattern in &args.pattern[1..] {
        let next = Regex::compile_with(pattern, config)?;
        dfa = minimize::minimize(&algebra::union(&dfa, next.dfa()));
        log(&format!("joined in {pattern:?}, now a {}-state DFA", dfa.state_count()));
    }

    log(&format!(
        "compiled {} pattern(s) into a {}-state DFA",
        args.pattern.len(),
        dfa.state_count()
    ));
    automata::save(&dfa, &args.output, args.gzip)?;
    log(&format!("wrote {}", args.output.display()));
    Ok(())
}

fn test_one(main_args: &RefaArgs, args: &cli::TestArgs) -> Result<(), CliError> {
    let dfa = automata::load(&args.automata)?;
    if !main_args.no_log {
        println!("loaded {} ({} states)", args.automata.display(), dfa.state_count());
    }
    let ok = dfa.accepts(args.input.as_bytes());
    println!("{}", if ok { "ACCEPT" } else { "REJECT" });
    Ok(())
}

fn inspect(args: &cli::InspectArgs) -> Result<(), CliError> {
    let dfa = automata::load(&args.automata)?;
    println!("states: {}", dfa.state_count());
    println!("start: {}", dfa.start());
    println!("width: {:?}", dfa.width());
    if !dfa.comment().is_empty() {
        println!("comment: {}", dfa.comment());
    }
    for state in dfa.reachable_states() {
        let marker = if dfa.is_accepting(state) { "*" } else { " " };
        print!("{marker}{state}:");
        let mut byte = 0u16;
        while byte < 256 {
            if let Some(target) = dfa.step(state, byte as u8) {
                let run_start = byte;
                while byte < 256 && dfa.step(state, byte as u8) == Some(target) {
                    byte += 1;
                }
                print!(" {run_start}..{}->{target}", byte - 1);
            } else {
                byte += 1;
            }
        }
        println!();
    }
    Ok(())
}
