//! Pull textures and flats, along with everything they need, out of a set of
//! WADs and in to one output WAD.
//!
//! The run goes:
//! 1. scan the base WAD and every source in to an [`ArchiveIndex`],
//! 2. read the request list, expanding animations and switches
//!    ([`RequestList`]),
//! 3. find each name in the first source that has it ([`resolve()`]),
//! 4. carry over matching `ANIMATED` and `SWITCHES` entries
//!    ([`ExportSet::merge_tables`]),
//! 5. write the output ([`write_export`]).
//!
//! Nothing is written until every step before has succeeded.

use std::io::BufRead;
use std::path::PathBuf;

use log::info;
use wad::{WadData, WadKind};

mod error;
pub mod export;
pub mod index;
pub mod request;
pub mod resolve;
pub mod tables;
pub mod writer;

#[cfg(test)]
mod test_wads;

pub use crate::error::*;
pub use crate::export::ExportSet;
pub use crate::index::{ArchiveIndex, ScanOptions};
pub use crate::request::RequestList;
pub use crate::resolve::resolve;
pub use crate::writer::{ExportSummary, write_export};

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Source WADs, highest priority first
    pub files: Vec<PathBuf>,
    /// Supplies the starting texture set and the texture lump layout
    pub base: PathBuf,
    pub output: PathBuf,
    /// Add to an existing output instead of replacing it
    pub additive: bool,
    /// Texture to put first in `TEXTURE1`
    pub null_texture: Option<String>,
    pub animated: bool,
    pub switches: bool,
}

impl ExportOptions {
    pub fn new(files: Vec<PathBuf>, base: PathBuf, output: PathBuf) -> Self {
        Self {
            files,
            base,
            output,
            additive: false,
            null_texture: None,
            animated: true,
            switches: true,
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            animated: self.animated,
            switches: self.switches,
        }
    }
}

/// Run a complete export. `requests` is the request list text.
pub fn run<R: BufRead>(options: &ExportOptions, requests: R) -> Result<ExportSummary, ExportError> {
    let scan = options.scan_options();

    let base = ArchiveIndex::scan_file(&options.base, scan)?;
    let sources = options
        .files
        .iter()
        .map(|path| ArchiveIndex::scan_file(path, scan))
        .collect::<Result<Vec<_>, _>>()?;

    let requests = RequestList::read(requests, &sources, scan)?;

    if let Some(name) = &options.null_texture {
        info!("Using {} as the null texture in TEXTURE1...", name.to_ascii_uppercase());
    }

    let mut export = ExportSet::new(&base);
    resolve(&requests, &sources, &mut export)?;
    export.merge_tables(&base, &sources, scan);

    let mut out = if options.additive {
        WadData::open_or_create(&options.output).map_err(|source| {
            ExportError::ArchiveOpenFailure {
                path: options.output.clone(),
                source,
            }
        })?
    } else {
        WadData::create(WadKind::Pwad)
    };

    let summary = write_export(
        &mut out,
        &options.output,
        export,
        &base,
        options.null_texture.as_deref(),
        scan,
    )?;
    out.save(&options.output)
        .map_err(|e| ExportError::from_write(&options.output, e))?;

    info!(
        "Wrote {} textures, {} patches, {} flats, {} namespace textures to {:?}",
        summary.textures,
        summary.patches,
        summary.flats,
        summary.namespace_textures,
        options.output
    );
    Ok(summary)
}
