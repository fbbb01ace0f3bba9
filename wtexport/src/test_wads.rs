//! Small in-memory archives for unit tests

use std::collections::HashSet;

use wad::animated::{Animated, AnimatedEntry};
use wad::lumps::TextureFormat;
use wad::switches::{SwitchEntry, Switches};
use wad::texture_set::{Texture, TextureSet};
use wad::{WadData, WadKind};

pub(crate) struct TestWad {
    wad: WadData,
}

impl TestWad {
    pub fn new() -> Self {
        Self {
            wad: WadData::create(WadKind::Pwad),
        }
    }

    pub fn lump(mut self, name: &str, data: &[u8]) -> Self {
        self.wad.add_lump(name, data.to_vec()).unwrap();
        self
    }

    /// `PNAMES` and a Doom format `TEXTURE1`
    pub fn textures(self, textures: &[Texture]) -> Self {
        self.texture_lumps(TextureFormat::Doom, textures, None)
    }

    pub fn strife_textures(self, textures: &[Texture]) -> Self {
        self.texture_lumps(TextureFormat::Strife, textures, None)
    }

    /// `PNAMES`, `TEXTURE1` and `TEXTURE2`
    pub fn textures_split(self, primary: &[Texture], secondary: &[Texture]) -> Self {
        self.texture_lumps(TextureFormat::Doom, primary, Some(secondary))
    }

    fn texture_lumps(
        mut self,
        format: TextureFormat,
        primary: &[Texture],
        secondary: Option<&[Texture]>,
    ) -> Self {
        let mut set = TextureSet::new();
        for texture in primary.iter().chain(secondary.unwrap_or_default()) {
            set.insert(texture.clone()).unwrap();
        }
        let primary_names: Option<HashSet<String>> =
            secondary.map(|_| primary.iter().map(|t| t.name.clone()).collect());
        let (pnames, list1, list2) = set.export(format, primary_names.as_ref()).unwrap();
        self.wad.add_lump("PNAMES", pnames.to_bytes()).unwrap();
        self.wad.add_lump("TEXTURE1", list1.to_bytes().unwrap()).unwrap();
        if let Some(list2) = list2 {
            self.wad.add_lump("TEXTURE2", list2.to_bytes().unwrap()).unwrap();
        }
        self
    }

    /// A `<ns>_START`/`<ns>_END` block. Entry data is the given text.
    pub fn namespace(mut self, ns: &str, entries: &[(&str, &str)]) -> Self {
        self.wad.add_lump(&format!("{ns}_START"), Vec::new()).unwrap();
        for (name, data) in entries {
            self.wad.add_lump(name, data.as_bytes().to_vec()).unwrap();
        }
        self.wad.add_lump(&format!("{ns}_END"), Vec::new()).unwrap();
        self
    }

    pub fn animated(mut self, entries: &[AnimatedEntry]) -> Self {
        let table = Animated {
            entries: entries.to_vec(),
        };
        self.wad.add_lump("ANIMATED", table.to_bytes()).unwrap();
        self
    }

    pub fn switches(mut self, entries: &[SwitchEntry]) -> Self {
        let table = Switches {
            entries: entries.to_vec(),
        };
        self.wad.add_lump("SWITCHES", table.to_bytes()).unwrap();
        self
    }

    pub fn build(self) -> WadData {
        self.wad
    }
}
