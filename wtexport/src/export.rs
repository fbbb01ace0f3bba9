//! Everything that will be written to the output, gathered during resolution.
//! Payloads are borrowed from the sources' archives and only copied when the
//! output is built.

use std::collections::BTreeMap;

use log::{debug, info};
use wad::animated::Animated;
use wad::switches::Switches;
use wad::texture_set::{Texture, TextureSet};

use crate::index::{ArchiveIndex, ScanOptions};

/// Lump name to data. Iterates in name order, which is the order the lumps
/// are written in.
pub type Payloads<'a> = BTreeMap<String, &'a [u8]>;

#[derive(Debug, Default)]
pub struct ExportSet<'a> {
    /// Starts as a copy of the base archive's textures
    pub(crate) textures: TextureSet,
    pub(crate) patches: Payloads<'a>,
    pub(crate) flats: Payloads<'a>,
    pub(crate) namespace_textures: Payloads<'a>,
    pub(crate) animated: Animated,
    pub(crate) switches: Switches,
}

impl<'a> ExportSet<'a> {
    pub fn new(base: &ArchiveIndex) -> Self {
        Self {
            textures: base.texture_set().cloned().unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn textures(&self) -> &TextureSet {
        &self.textures
    }

    pub fn contains_texture(&self, name: &str) -> bool {
        self.textures.contains(name)
    }

    pub(crate) fn set_texture(&mut self, texture: Texture) -> Result<(), wad::WadError> {
        debug!("Copying texture {}", texture.name);
        self.textures.insert(texture)
    }

    /// Record a payload unless one of that name is already recorded.
    /// Returns true if it was added.
    pub(crate) fn add_patch(&mut self, name: &str, data: &'a [u8]) -> bool {
        add_payload(&mut self.patches, "patch", name, data)
    }

    pub(crate) fn add_flat(&mut self, name: &str, data: &'a [u8]) -> bool {
        add_payload(&mut self.flats, "flat", name, data)
    }

    pub(crate) fn add_namespace_texture(&mut self, name: &str, data: &'a [u8]) -> bool {
        add_payload(&mut self.namespace_textures, "namespace texture", name, data)
    }

    pub fn patches(&self) -> &Payloads<'a> {
        &self.patches
    }

    pub fn flats(&self) -> &Payloads<'a> {
        &self.flats
    }

    pub fn namespace_textures(&self) -> &Payloads<'a> {
        &self.namespace_textures
    }

    pub fn animated(&self) -> &Animated {
        &self.animated
    }

    pub fn switches(&self) -> &Switches {
        &self.switches
    }

    /// Carry over the sources' `ANIMATED` and `SWITCHES` entries that refer to
    /// something in the export. A flat cycle may also refer to a flat the base
    /// archive already has.
    pub fn merge_tables(
        &mut self,
        base: &ArchiveIndex,
        sources: &[ArchiveIndex],
        options: ScanOptions,
    ) {
        if options.animated {
            info!("    Merging ANIMATED...");
            for source in sources {
                for entry in source.animated().iter() {
                    let first = entry.first_name.as_str();
                    let keep = if entry.is_texture() {
                        self.textures.contains(first)
                            || self.namespace_textures.contains_key(first)
                    } else {
                        self.flats.contains_key(first) || base.has_flat(first)
                    };
                    if keep {
                        self.animated.add_entry(entry.clone());
                    }
                }
            }
        }

        if options.switches {
            info!("    Merging SWITCHES...");
            for source in sources {
                for entry in source.switches().iter() {
                    if self.textures.contains(&entry.off_name)
                        || self.textures.contains(&entry.on_name)
                    {
                        self.switches.add_entry(entry.clone());
                    }
                }
            }
        }
    }
}

fn add_payload<'a>(payloads: &mut Payloads<'a>, kind: &str, name: &str, data: &'a [u8]) -> bool {
    if payloads.contains_key(name) {
        return false;
    }
    info!("        Extracting {kind} {name}...");
    payloads.insert(name.to_owned(), data);
    true
}
