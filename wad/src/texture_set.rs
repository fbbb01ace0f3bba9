//! A name-resolved view of `PNAMES` + `TEXTUREx`.
//!
//! In the lumps a texture refers to its patches by index in to `PNAMES`, so
//! moving a texture between WADs means rewriting those indexes. A
//! [`TextureSet`] holds textures with patch *names* instead, and only turns
//! them back in to indexes on [`TextureSet::export`].

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::WadError;
use crate::lumps::{PatchNames, TextureFormat, TextureList, WadTexture, WadTexturePatch};
use crate::names::normalise_name;

/// A patch placed in a texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexturePatch {
    pub name: String,
    pub origin_x: i16,
    pub origin_y: i16,
}

impl TexturePatch {
    pub fn new(name: &str, origin_x: i16, origin_y: i16) -> Self {
        Self {
            name: name.to_ascii_uppercase(),
            origin_x,
            origin_y,
        }
    }
}

/// A composite wall texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub name: String,
    pub width: u16,
    pub height: u16,
    pub patches: Vec<TexturePatch>,
}

impl Texture {
    pub fn new(name: &str, width: u16, height: u16) -> Self {
        Self {
            name: name.to_ascii_uppercase(),
            width,
            height,
            patches: Vec::new(),
        }
    }

    pub fn with_patch(mut self, name: &str, origin_x: i16, origin_y: i16) -> Self {
        self.patches.push(TexturePatch::new(name, origin_x, origin_y));
        self
    }
}

/// Ordered set of textures plus the patch-name table they reference. Every
/// patch name used by a texture is always present in [`TextureSet::patch_names`].
#[derive(Debug, Default, Clone)]
pub struct TextureSet {
    patch_names: Vec<String>,
    textures: IndexMap<String, Texture>,
}

impl TextureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve one or more texture lists against their `PNAMES`. Textures in
    /// later lists replace earlier ones of the same name.
    pub fn from_lumps(pnames: &PatchNames, lists: &[&TextureList]) -> Result<Self, WadError> {
        let mut set = Self {
            patch_names: pnames.names.clone(),
            textures: IndexMap::new(),
        };

        for list in lists {
            for wad_tex in &list.textures {
                let mut texture = Texture::new(&wad_tex.name, wad_tex.width, wad_tex.height);
                for p in &wad_tex.patches {
                    let name = pnames.names.get(p.patch_index as usize).ok_or_else(|| {
                        WadError::malformed(
                            "TEXTUREx",
                            format!(
                                "texture {} uses patch {} but PNAMES has {}",
                                wad_tex.name,
                                p.patch_index,
                                pnames.len()
                            ),
                        )
                    })?;
                    texture.patches.push(TexturePatch::new(name, p.origin_x, p.origin_y));
                }
                set.textures.shift_remove(&texture.name);
                set.textures.insert(texture.name.clone(), texture);
            }
        }
        Ok(set)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(&name.to_ascii_uppercase())
    }

    pub fn get(&self, name: &str) -> Option<&Texture> {
        self.textures.get(&name.to_ascii_uppercase())
    }

    /// Add a texture at the end of the set. A texture of the same name is
    /// removed first, so an overwrite also moves it to the end.
    pub fn insert(&mut self, mut texture: Texture) -> Result<(), WadError> {
        texture.name = normalise_name(&texture.name)?;
        for patch in &mut texture.patches {
            patch.name = normalise_name(&patch.name)?;
            if !self.patch_names.contains(&patch.name) {
                self.patch_names.push(patch.name.clone());
            }
        }
        self.textures.shift_remove(&texture.name);
        self.textures.insert(texture.name.clone(), texture);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<Texture> {
        self.textures.shift_remove(&name.to_ascii_uppercase())
    }

    /// Stable sort by a key on the texture
    pub fn sort_by_key<K: Ord>(&mut self, mut key: impl FnMut(&Texture) -> K) {
        self.textures.sort_by(|_, a, _, b| key(a).cmp(&key(b)));
    }

    pub fn patch_names(&self) -> &[String] {
        &self.patch_names
    }

    pub fn iter(&self) -> impl Iterator<Item = &Texture> {
        self.textures.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.textures.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Turn the set back in to lumps. `PNAMES` is rebuilt from scratch in the
    /// order patches are first used. If `primary` is given the textures are
    /// split: names in `primary` go to the first list, the rest to a second.
    /// Fails if there are more patch names than `PNAMES` can index.
    pub fn export(
        &self,
        format: TextureFormat,
        primary: Option<&HashSet<String>>,
    ) -> Result<(PatchNames, TextureList, Option<TextureList>), WadError> {
        let mut pnames = PatchNames::default();
        let mut indexes: HashMap<&str, usize> = HashMap::new();
        let mut list1 = TextureList::new(format);
        let mut list2 = primary.map(|_| TextureList::new(format));

        for texture in self.textures.values() {
            let patches = texture
                .patches
                .iter()
                .map(|p| {
                    let index = *indexes.entry(p.name.as_str()).or_insert_with(|| {
                        pnames.names.push(p.name.clone());
                        pnames.names.len() - 1
                    });
                    let patch_index = u16::try_from(index).map_err(|_| {
                        WadError::malformed(
                            "PNAMES",
                            format!("too many patch names to index {}", p.name),
                        )
                    })?;
                    Ok(WadTexturePatch {
                        origin_x: p.origin_x,
                        origin_y: p.origin_y,
                        patch_index,
                    })
                })
                .collect::<Result<Vec<_>, WadError>>()?;

            let wad_tex = WadTexture {
                name: texture.name.clone(),
                flags: 0,
                width: texture.width,
                height: texture.height,
                patches,
            };

            match (primary, list2.as_mut()) {
                (Some(names), Some(list2)) if !names.contains(&texture.name) => {
                    list2.textures.push(wad_tex)
                }
                _ => list1.textures.push(wad_tex),
            }
        }

        Ok((pnames, list1, list2))
    }
}
