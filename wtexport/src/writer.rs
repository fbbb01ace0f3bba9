//! Put an [`ExportSet`] in to an output archive.

use std::path::Path;

use log::info;
use wad::WadData;

use crate::export::{ExportSet, Payloads};
use crate::index::{ArchiveIndex, ScanOptions};
use crate::tables::NULL_TEXTURE_NAMES;
use crate::ExportError;

/// What went in to the output
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub textures: usize,
    pub patches: usize,
    pub flats: usize,
    pub namespace_textures: usize,
    pub animated: usize,
    pub switches: usize,
}

/// True for the texture that has to come first in `TEXTURE1`
fn is_null_texture(name: &str, null_texture: Option<&str>) -> bool {
    match null_texture {
        Some(null) => name.eq_ignore_ascii_case(null),
        None => NULL_TEXTURE_NAMES.iter().any(|n| n.eq_ignore_ascii_case(name)),
    }
}

/// Write the export in to `out`, which is only modified in memory. The
/// texture lumps keep the layout and `TEXTURE1`/`TEXTURE2` split of the base
/// archive. `path` is used for messages only.
pub fn write_export(
    out: &mut WadData,
    path: &Path,
    mut export: ExportSet<'_>,
    base: &ArchiveIndex,
    null_texture: Option<&str>,
    options: ScanOptions,
) -> Result<ExportSummary, ExportError> {
    let write_err = |e: wad::WadError| ExportError::from_write(path, e);

    info!("Sorting entries...");
    export
        .textures
        .sort_by_key(|t| !is_null_texture(&t.name, null_texture));

    info!("Dumping entries...");
    let (pnames, list1, list2) = export
        .textures
        .export(base.texture_format(), base.primary_names())
        .map_err(write_err)?;
    out.set_lump("TEXTURE1", list1.to_bytes().map_err(write_err)?)
        .map_err(write_err)?;
    if let Some(list2) = &list2 {
        out.set_lump("TEXTURE2", list2.to_bytes().map_err(write_err)?)
            .map_err(write_err)?;
    }
    out.set_lump("PNAMES", pnames.to_bytes()).map_err(write_err)?;

    let write_animated = options.animated && !export.animated.is_empty();
    if write_animated {
        out.set_lump("ANIMATED", export.animated.to_bytes())
            .map_err(write_err)?;
    }
    let write_switches = options.switches && !export.switches.is_empty();
    if write_switches {
        out.set_lump("SWITCHES", export.switches.to_bytes())
            .map_err(write_err)?;
    }

    write_namespace(out, "PP", &export.patches).map_err(write_err)?;
    write_namespace(out, "FF", &export.flats).map_err(write_err)?;
    write_namespace(out, "TX", &export.namespace_textures).map_err(write_err)?;

    Ok(ExportSummary {
        textures: export.textures.len(),
        patches: export.patches.len(),
        flats: export.flats.len(),
        namespace_textures: export.namespace_textures.len(),
        animated: if write_animated { export.animated.len() } else { 0 },
        switches: if write_switches { export.switches.len() } else { 0 },
    })
}

/// Bracket the payloads with `<ns>_START` and `<ns>_END`. Nothing at all is
/// written for an empty set.
fn write_namespace(
    out: &mut WadData,
    ns: &str,
    payloads: &Payloads<'_>,
) -> Result<(), wad::WadError> {
    if payloads.is_empty() {
        return Ok(());
    }
    out.add_lump(&format!("{ns}_START"), Vec::new())?;
    for (name, data) in payloads {
        out.add_lump(name, data.to_vec())?;
    }
    out.add_lump(&format!("{ns}_END"), Vec::new())
}
