//! Error types for the idsp-core library.
//!
//! Only construction-time work (gazetteer parsing, config loading) can fail.
//! Bulletin processing itself never returns an error; per-record and
//! per-field failures are counted in the [`ErrorAccumulator`](crate::ErrorAccumulator).

use thiserror::Error;

/// Main error type for the idsp library.
#[derive(Error, Debug)]
pub enum IdspError {
    /// Gazetteer construction error.
    #[error("gazetteer error: {0}")]
    Gazetteer(#[from] GazetteerError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while building a [`Gazetteer`](crate::Gazetteer).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GazetteerError {
    /// A vocabulary contained no usable entries.
    #[error("{0} vocabulary is empty")]
    EmptyVocabulary(&'static str),

    /// A district line had a state column but no district name.
    #[error("malformed district entry on line {line}: {content:?}")]
    MalformedDistrict { line: usize, content: String },
}

/// Result type for the idsp library.
pub type Result<T> = std::result::Result<T, IdspError>;
