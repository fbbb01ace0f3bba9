//! The request list: which textures and flats to pull out of the sources.
//!
//! ```text
//! # comment
//! -textures
//! DOOR3
//! SW1BRN1
//! -flats
//! NUKAGE1
//! -end
//! ```
//!
//! Every name read also pulls in the rest of its animation cycle and its
//! switch partner, as found in any of the sources.

use std::io::BufRead;

use indexmap::IndexSet;
use log::{debug, error};
use wad::names::is_valid_name;

use crate::index::{ArchiveIndex, ScanOptions};
use crate::tables::builtin_switch_partner;
use crate::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Textures,
    Flats,
}

#[derive(Debug, Default, Clone)]
pub struct RequestList {
    pub textures: IndexSet<String>,
    pub flats: IndexSet<String>,
    /// Names skipped because they can never be lump names
    pub rejected: Vec<String>,
}

impl RequestList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a whole list. Reading stops at `-end` or the end of the stream.
    /// Bytes that are not UTF-8 are replaced, so they can only ever end up in
    /// a comment or a rejected name.
    pub fn read<R: BufRead>(
        reader: R,
        sources: &[ArchiveIndex],
        options: ScanOptions,
    ) -> Result<Self, ExportError> {
        let mut list = Self::new();
        let mut section = None;

        for (number, line) in reader.split(b'\n').enumerate() {
            let line = line.map_err(|source| ExportError::IoFailure {
                context: "reading the request list".to_owned(),
                source,
            })?;
            let line = String::from_utf8_lossy(&line);
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match header(line) {
                Some(Header::Textures) => section = Some(Section::Textures),
                Some(Header::Flats) => section = Some(Section::Flats),
                Some(Header::End) => break,
                None => match section {
                    Some(Section::Textures) => list.add_texture(line, sources, options),
                    Some(Section::Flats) => list.add_flat(line, sources, options),
                    None => {
                        return Err(ExportError::NoSectionHeader {
                            line: number + 1,
                            name: line.to_owned(),
                        });
                    }
                },
            }
        }

        debug!(
            "Requested {} textures, {} flats",
            list.textures.len(),
            list.flats.len()
        );
        Ok(list)
    }

    /// Request a texture along with its animation cycle and switch partner.
    /// An invalid name is logged and skipped.
    pub fn add_texture(&mut self, name: &str, sources: &[ArchiveIndex], options: ScanOptions) {
        let name = name.to_ascii_uppercase();
        if !is_valid_name(&name) {
            error!("{}", ExportError::InvalidName(name.clone()));
            self.rejected.push(name);
            return;
        }
        self.textures.insert(name.clone());

        for source in sources {
            if options.animated {
                if let Some(chain) = source.texture_chain(&name) {
                    self.textures.extend(chain.iter().cloned());
                }
            }
            if options.switches {
                let partner = source
                    .switch_partner(&name)
                    .or_else(|| builtin_switch_partner(&name));
                if let Some(partner) = partner {
                    self.textures.insert(partner.to_owned());
                }
            }
        }
    }

    /// Request a flat along with its animation cycle
    pub fn add_flat(&mut self, name: &str, sources: &[ArchiveIndex], options: ScanOptions) {
        let name = name.to_ascii_uppercase();
        if !is_valid_name(&name) {
            error!("flat {name:?} has an invalid name, skipping");
            self.rejected.push(name);
            return;
        }
        self.flats.insert(name.clone());

        if options.animated {
            for source in sources {
                if let Some(chain) = source.flat_chain(&name) {
                    self.flats.extend(chain.iter().cloned());
                }
            }
        }
    }
}

enum Header {
    Textures,
    Flats,
    End,
}

/// `-textures`, `-flats` and `-end` in any case. Older lists used a `:`
/// instead of the `-`.
fn header(line: &str) -> Option<Header> {
    let word = line.strip_prefix('-').or_else(|| line.strip_prefix(':'))?;
    if word.eq_ignore_ascii_case("textures") {
        Some(Header::Textures)
    } else if word.eq_ignore_ascii_case("flats") {
        Some(Header::Flats)
    } else if word.eq_ignore_ascii_case("end") {
        Some(Header::End)
    } else {
        None
    }
}
