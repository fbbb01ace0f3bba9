use std::io;
use std::path::PathBuf;

use thiserror::Error;
use wad::WadError;

/// Process exit codes
pub const EXIT_OK: u8 = 0;
pub const EXIT_BAD_FILE: u8 = 1;
pub const EXIT_NO_FILES: u8 = 2;
pub const EXIT_IO_ERROR: u8 = 3;
pub const EXIT_BAD_OPTIONS: u8 = 4;

#[derive(Error, Debug)]
pub enum ExportError {
    /// A `TEXTUREx` lump with nothing to resolve its patch indexes against
    #[error("{archive:?}: TEXTUREx without PNAMES")]
    MissingPatchTable { archive: PathBuf },
    #[error("{archive:?}: {namespace}_START without {namespace}_END")]
    UnterminatedNamespace { archive: PathBuf, namespace: String },
    /// A requested name that can never be a lump name. Only this one is not
    /// fatal: the request is skipped.
    #[error("texture {0:?} has an invalid name, skipping")]
    InvalidName(String),
    #[error("{path:?} could not be opened: {source}")]
    ArchiveOpenFailure {
        path: PathBuf,
        #[source]
        source: WadError,
    },
    #[error("{archive:?}: {source}")]
    MalformedLump {
        archive: PathBuf,
        #[source]
        source: WadError,
    },
    #[error("{context}: {source}")]
    IoFailure {
        context: String,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: name {name:?} before '-textures' or '-flats'")]
    NoSectionHeader { line: usize, name: String },
}

impl ExportError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ExportError::MissingPatchTable { .. }
            | ExportError::UnterminatedNamespace { .. }
            | ExportError::ArchiveOpenFailure { .. }
            | ExportError::MalformedLump { .. }
            | ExportError::InvalidName(_) => EXIT_BAD_FILE,
            ExportError::IoFailure { .. } => EXIT_IO_ERROR,
            ExportError::NoSectionHeader { .. } => EXIT_BAD_OPTIONS,
        }
    }

    /// Sort a container error from writing the output in to the right kind
    pub(crate) fn from_write(path: &std::path::Path, err: WadError) -> Self {
        match err {
            WadError::Io { source, .. } => ExportError::IoFailure {
                context: format!("writing {path:?}"),
                source,
            },
            other => ExportError::MalformedLump {
                archive: path.to_path_buf(),
                source: other,
            },
        }
    }
}
