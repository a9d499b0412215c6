//! Error types for the parse module

use thiserror::Error;

/// Error type for mirror parsing operations
#[derive(Debug, Error)]
pub enum ParseError {
    /// Agenda item filename does not encode a usable item number
    #[error("agenda item filename does not encode an item number: {0}")]
    ItemNumber(String),

    /// Neither the cover page text nor the directory name yields a start
    /// datetime; the mirror violates the on-disk naming contract
    #[error("no start datetime in cover page or directory name: {0}")]
    StartDate(String),

    /// Filesystem error while reading the mirror
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
