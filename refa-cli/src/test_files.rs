//! `test-files` subcommand: run a compiled automaton against one or more text files, a line at a
//! time.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::automata;
use crate::cli::{RefaArgs, TestFileArgs, TestMode};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Automata(#[from] automata::Error),
    #[error("{0}: {1}")]
    File(PathBuf, #[source] io::Error),
}

pub fn run(main_args: &RefaArgs, args: &TestFileArgs) -> Result<(), Error> {
    let log = |s: &str| {
        if !main_args.no_log {
            println!("{s}");
        }
    };

    let dfa = automata::load(&args.automata)?;
    log(&format!("loaded {} ({} states)", args.automata.display(), dfa.state_count()));

    for file in &args.files {
        let contents =
            fs::read_to_string(file).map_err(|e| Error::File(file.clone(), e))?;
        match args.mode {
            TestMode::Lines => {
                println!("testing {}:", file.display());
                let mut total = 0;
                let mut passed = 0;
                for line in contents.lines() {
                    total += 1;
                    let ok = dfa.accepts(line.as_bytes());
                    if ok {
                        passed += 1;
                    }
                    println!("[{}] {line}", if ok { " OK " } else { "FAIL" });
                }
                println!("{passed}/{total} lines passed in {}", file.display());
            }
            TestMode::FirstFailure => {
                let counterexample = contents.lines().find(|line| !dfa.accepts(line.as_bytes()));
                match counterexample {
                    None => println!("[ OK ] {}", file.display()),
                    Some(line) => println!("[FAIL] {} failed on {line}", file.display()),
                }
            }
        }
    }

    Ok(())
}
