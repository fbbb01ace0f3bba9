use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while reading, parsing or writing a WAD
#[derive(Error, Debug)]
pub enum WadError {
    /// The file could not be read or written
    #[error("{path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file exists but is not a usable WAD container
    #[error("{path:?} is not a WAD file: {reason}")]
    NotAWad { path: PathBuf, reason: String },
    /// A lump's bytes do not parse as the record layout it claims to be
    #[error("malformed {lump} lump: {reason}")]
    MalformedLump { lump: String, reason: String },
    /// A lump or resource name can not be stored in the 8 byte name field
    #[error("invalid name {0:?}")]
    InvalidName(String),
}

impl WadError {
    pub(crate) fn malformed(lump: &str, reason: impl Into<String>) -> Self {
        WadError::MalformedLump {
            lump: lump.to_owned(),
            reason: reason.into(),
        }
    }
}
