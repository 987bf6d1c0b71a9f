//! `equivalence` subcommand: compare one automaton against a list of others.

use std::time::SystemTime;

use thiserror::Error;

use crate::automata;
use crate::cli::{EquivalenceArgs, RefaArgs};

#[derive(Debug, Error)]
pub enum Error {
    #[error("error loading base automaton: {0}")]
    Base(#[source] automata::Error),
}

pub fn run(main_args: &RefaArgs, args: &EquivalenceArgs) -> Result<(), Error> {
    let log = |s: &str| {
        if !main_args.no_log {
            println!("{s}");
        }
    };

    let first = automata::load(&args.first).map_err(Error::Base)?;
    log(&format!("loaded {} ({} states)", args.first.display(), first.state_count()));

    let start = SystemTime::now();
    let mut successes = 0usize;
    for path in &args.files {
        let result = automata::load(path).map(|other| first.equivalent_to(&other));
        let line = match result {
            Ok(true) => {
                successes += 1;
                if args.bool { "true".to_string() } else { "equivalent".to_string() }
            }
            Ok(false) => {
                if args.bool { "false".to_string() } else { "not equivalent".to_string() }
            }
            Err(e) => format!("error: {e}"),
        };
        println!("{}: {line}", path.display());
    }
    let elapsed = SystemTime::now().duration_since(start).unwrap_or_default();

    log(&format!(
        "{successes}/{} files equivalent, checked in {}ms",
        args.files.len(),
        elapsed.as_millis()
    ));

    Ok(())
}
