//! `union`/`intersection`/`difference`/`symmetric-difference` subcommand bodies.

use thiserror::Error;

use refa::dfa::{algebra, minimize};

use crate::automata;
use crate::cli::{BinaryOpArgs, RefaArgs};

#[derive(Copy, Clone, Debug)]
pub enum Op {
    Union,
    Intersection,
    Difference,
    SymmetricDifference,
}

impl Op {
    fn as_str(self) -> &'static str {
        match self {
            Op::Union => "union",
            Op::Intersection => "intersection",
            Op::Difference => "difference",
            Op::SymmetricDifference => "symmetric difference",
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Automata(#[from] automata::Error),
}

pub fn run(main_args: &RefaArgs, args: &BinaryOpArgs, op: Op) -> Result<(), Error> {
    let log = |s: &str| {
        if !main_args.no_log {
            println!("{s}");
        }
    };

    let mut first = automata::load(&args.first)?;
    let mut second = automata::load(&args.second)?;

    if args.minimized {
        first = minimize::minimize(&first);
        second = minimize::minimize(&second);
        log("minimized both inputs before combining them");
    }

    let combined = match op {
        Op::Union => algebra::union(&first, &second),
        Op::Intersection => algebra::intersect(&first, &second),
        Op::Difference => algebra::difference(&first, &second),
        Op::SymmetricDifference => algebra::symmetric_difference(&first, &second),
    };
    let combined = minimize::minimize(&combined);

    log(&format!(
        "{} of the two inputs, minimized to {} states:",
        op.as_str(),
        combined.state_count()
    ));

    match &args.output {
        Some(path) => automata::save(&combined, path, args.gzip)?,
        None => println!("{} states, start = {}", combined.state_count(), combined.start()),
    }

    Ok(())
}
