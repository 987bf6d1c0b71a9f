//! Loading and saving compiled automata, shared by every subcommand.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use thiserror::Error;

use refa::dfa::format::{self, Algorithm};
use refa::Dfa;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}: {1}")]
    File(PathBuf, #[source] io::Error),
    #[error("{0}: {1}")]
    Format(PathBuf, #[source] refa::Error),
}

pub fn load(path: &Path) -> Result<Dfa, Error> {
    let file = File::open(path).map_err(|e| Error::File(path.to_path_buf(), e))?;
    format::load(file).map_err(|e| Error::Format(path.to_path_buf(), e))
}

pub fn save(dfa: &Dfa, path: &Path, gzip: bool) -> Result<(), Error> {
    let file = File::create(path).map_err(|e| Error::File(path.to_path_buf(), e))?;
    let algorithm = if gzip { Algorithm::Gzip } else { Algorithm::Flat };
    format::save(dfa, algorithm, BufWriter::new(file)).map_err(|e| Error::Format(path.to_path_buf(), e))
}
