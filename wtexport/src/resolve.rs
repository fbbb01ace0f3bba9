//! Find each requested name in the sources and copy what it needs in to the
//! export. Sources are searched in the order given and the first one that
//! has a name wins.

use log::{debug, info};

use crate::ExportError;
use crate::export::ExportSet;
use crate::index::ArchiveIndex;
use crate::request::RequestList;

pub fn resolve<'a>(
    requests: &RequestList,
    sources: &'a [ArchiveIndex],
    export: &mut ExportSet<'a>,
) -> Result<(), ExportError> {
    info!("    Extracting textures...");
    for name in &requests.textures {
        resolve_texture(name, sources, export)?;
    }
    info!("    Extracting flats...");
    for name in &requests.flats {
        resolve_flat(name, sources, export);
    }
    Ok(())
}

/// A texture from a `TEXTUREx` list brings its patches along. Failing that a
/// lone image between `TX_START` and `TX_END` is taken as is.
pub fn resolve_texture<'a>(
    name: &str,
    sources: &'a [ArchiveIndex],
    export: &mut ExportSet<'a>,
) -> Result<(), ExportError> {
    let defined = sources
        .iter()
        .find_map(|s| s.texture_set().and_then(|set| set.get(name)).map(|t| (s, t)));

    if let Some((source, texture)) = defined {
        // Any patch this source supplies means the texture differs from the
        // copy already in the export, if there is one.
        let mut has_patches = false;
        for patch in &texture.patches {
            if let Some(data) = source.patch_data(&patch.name) {
                has_patches = true;
                export.add_patch(&patch.name, data);
            }
        }

        if has_patches || !export.contains_texture(name) {
            export
                .set_texture(texture.clone())
                .map_err(|source_err| ExportError::MalformedLump {
                    archive: source.path().to_path_buf(),
                    source: source_err,
                })?;
        }
        return Ok(());
    }

    match sources.iter().find_map(|s| s.namespace_texture_data(name)) {
        Some(data) => {
            export.add_namespace_texture(name, data);
        }
        None => debug!("Texture {name} is not in any source"),
    }
    Ok(())
}

pub fn resolve_flat<'a>(name: &str, sources: &'a [ArchiveIndex], export: &mut ExportSet<'a>) {
    match sources.iter().find_map(|s| s.flat_data(name)) {
        Some(data) => {
            export.add_flat(name, data);
        }
        None => debug!("Flat {name} is not in any source"),
    }
}
