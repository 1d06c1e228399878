use std::io;

use thiserror::Error;

/// Errors raised while ingesting records, reading benchmarks or configuring scoring.
#[derive(Error, Debug)]
pub enum Error {
    /// A line of input did not have the expected shape.
    #[error("format error on line {line}: {message}")]
    Format { line: usize, message: String },

    /// A BM25 tunable outside its legal range.
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub fn format(line: usize, message: impl Into<String>) -> Self {
        Error::Format { line, message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
