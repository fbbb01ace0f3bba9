//! The texture lumps: `PNAMES` and `TEXTURE1`/`TEXTURE2`.
//!
//! `TEXTUREx` comes in two layouts. Doom (and everything descended from it)
//! carries an obsolete column directory and two unused fields per patch.
//! Strife dropped them. The layout is not flagged anywhere so it is worked
//! out from the record sizes, see [`TextureFormat::detect`].

use crate::WadError;
use crate::names::{NAME_LEN, name_from_bytes, name_to_bytes};
use crate::wad::{read_2_bytes, read_4_bytes};

/// The shared patch-name table that `TEXTUREx` patch indexes point in to
///
/// | Field Size | Data Type    | Content                     |
/// |------------|--------------|-----------------------------|
/// | 0x00-0x03  | unsigned int | Number of names             |
/// | 8 * N      | 8 ASCII char | Patch names, NUL padded     |
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PatchNames {
    pub names: Vec<String>,
}

impl PatchNames {
    pub fn from_bytes(data: &[u8]) -> Result<Self, WadError> {
        let count = read_4_bytes(data, 0)
            .ok_or_else(|| WadError::malformed("PNAMES", "missing count"))?
            as usize;
        let names = (0..count)
            .map(|i| {
                let ofs = 4 + i * NAME_LEN;
                data.get(ofs..ofs + NAME_LEN)
                    .map(name_from_bytes)
                    .ok_or_else(|| {
                        WadError::malformed("PNAMES", format!("{count} names but only {i} fit"))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { names })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.names.len() * NAME_LEN);
        out.extend_from_slice(&(self.names.len() as u32).to_le_bytes());
        for name in &self.names {
            name_to_bytes(name, NAME_LEN, &mut out);
        }
        out
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One patch placed in a texture, as stored in the lump
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WadTexturePatch {
    pub origin_x: i16,
    pub origin_y: i16,
    /// Index in to `PNAMES`
    pub patch_index: u16,
}

/// A texture record as stored in the lump
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WadTexture {
    pub name: String,
    pub flags: u32,
    pub width: u16,
    pub height: u16,
    pub patches: Vec<WadTexturePatch>,
}

/// The two binary layouts of `TEXTUREx`
///
/// Doom:
///
/// | Field Size | Data Type    | Content                       |
/// |------------|--------------|-------------------------------|
/// | 0x00-0x07  | 8 ASCII char | Texture name                  |
/// | 0x08-0x0b  | unsigned int | Flags                         |
/// | 0x0c-0x0d  | short        | Width                         |
/// | 0x0e-0x0f  | short        | Height                        |
/// | 0x10-0x13  | unsigned int | Column directory, always zero |
/// | 0x14-0x15  | short        | Patch count                   |
/// | 10 * N     | mappatch     | x, y, patch, stepdir, colormap|
///
/// Strife is the same without the column directory, and each patch is only
/// x, y, patch (6 bytes).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    #[default]
    Doom,
    Strife,
}

impl TextureFormat {
    fn header_size(&self) -> usize {
        match self {
            TextureFormat::Doom => 22,
            TextureFormat::Strife => 18,
        }
    }

    fn patch_size(&self) -> usize {
        match self {
            TextureFormat::Doom => 10,
            TextureFormat::Strife => 6,
        }
    }

    fn patch_count_offset(&self) -> usize {
        self.header_size() - 2
    }

    /// Size of the record at `offset` if it were laid out in this format
    fn record_size(&self, data: &[u8], offset: usize) -> Option<usize> {
        let count = read_2_bytes(data, offset + self.patch_count_offset())? as i16;
        if count < 0 {
            return None;
        }
        Some(self.header_size() + count as usize * self.patch_size())
    }

    /// True if the records at `offsets` sit back to back and end exactly at
    /// the end of the lump
    fn tiles(&self, data: &[u8], offsets: &[usize]) -> bool {
        let mut sorted = offsets.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        sorted.iter().enumerate().all(|(i, ofs)| {
            let end = sorted.get(i + 1).copied().unwrap_or(data.len());
            self.record_size(data, *ofs).map(|s| ofs + s) == Some(end)
        })
    }

    fn fits(&self, data: &[u8], offsets: &[usize]) -> bool {
        offsets.iter().all(|ofs| {
            self.record_size(data, *ofs)
                .is_some_and(|s| ofs + s <= data.len())
        })
    }

    /// Work out which layout a `TEXTUREx` lump uses. A layout whose records
    /// exactly tile the lump is preferred (Doom first); failing that the first
    /// layout whose records at least fit inside the lump.
    pub fn detect(lump: &str, data: &[u8]) -> Result<Self, WadError> {
        let offsets = read_offsets(lump, data)?;
        if offsets.is_empty() {
            return Ok(TextureFormat::Doom);
        }
        for format in [TextureFormat::Doom, TextureFormat::Strife] {
            if format.tiles(data, &offsets) {
                return Ok(format);
            }
        }
        for format in [TextureFormat::Doom, TextureFormat::Strife] {
            if format.fits(data, &offsets) {
                return Ok(format);
            }
        }
        Err(WadError::malformed(
            lump,
            "records match neither the Doom nor the Strife layout",
        ))
    }

    fn read_texture(&self, lump: &str, data: &[u8], offset: usize) -> Result<WadTexture, WadError> {
        let truncated = || WadError::malformed(lump, format!("texture at {offset} is truncated"));

        let name = data
            .get(offset..offset + NAME_LEN)
            .map(name_from_bytes)
            .ok_or_else(truncated)?;
        let flags = read_4_bytes(data, offset + 8).ok_or_else(truncated)?;
        let width = read_2_bytes(data, offset + 12).ok_or_else(truncated)?;
        let height = read_2_bytes(data, offset + 14).ok_or_else(truncated)?;
        let count = read_2_bytes(data, offset + self.patch_count_offset()).ok_or_else(truncated)?
            as i16;
        if count < 0 {
            return Err(WadError::malformed(
                lump,
                format!("texture {name} has a negative patch count"),
            ));
        }

        let mut patches = Vec::with_capacity(count as usize);
        for i in 0..count as usize {
            let ofs = offset + self.header_size() + i * self.patch_size();
            patches.push(WadTexturePatch {
                origin_x: read_2_bytes(data, ofs).ok_or_else(truncated)? as i16,
                origin_y: read_2_bytes(data, ofs + 2).ok_or_else(truncated)? as i16,
                patch_index: read_2_bytes(data, ofs + 4).ok_or_else(truncated)?,
            });
        }

        Ok(WadTexture {
            name,
            flags,
            width,
            height,
            patches,
        })
    }

    fn write_texture(&self, texture: &WadTexture, out: &mut Vec<u8>) -> Result<(), WadError> {
        let count = i16::try_from(texture.patches.len()).map_err(|_| {
            WadError::malformed(
                "TEXTUREx",
                format!("texture {} has too many patches", texture.name),
            )
        })?;
        name_to_bytes(&texture.name, NAME_LEN, out);
        out.extend_from_slice(&texture.flags.to_le_bytes());
        out.extend_from_slice(&texture.width.to_le_bytes());
        out.extend_from_slice(&texture.height.to_le_bytes());
        if *self == TextureFormat::Doom {
            out.extend_from_slice(&0u32.to_le_bytes());
        }
        out.extend_from_slice(&count.to_le_bytes());
        for patch in &texture.patches {
            out.extend_from_slice(&patch.origin_x.to_le_bytes());
            out.extend_from_slice(&patch.origin_y.to_le_bytes());
            out.extend_from_slice(&patch.patch_index.to_le_bytes());
            if *self == TextureFormat::Doom {
                // stepdir, colormap: unused by every engine
                out.extend_from_slice(&1u16.to_le_bytes());
                out.extend_from_slice(&0u16.to_le_bytes());
            }
        }
        Ok(())
    }
}

fn read_offsets(lump: &str, data: &[u8]) -> Result<Vec<usize>, WadError> {
    let count = read_4_bytes(data, 0)
        .ok_or_else(|| WadError::malformed(lump, "missing texture count"))? as usize;
    (0..count)
        .map(|i| {
            read_4_bytes(data, 4 + i * 4)
                .map(|o| o as usize)
                .ok_or_else(|| WadError::malformed(lump, "offset table is truncated"))
        })
        .collect()
}

/// The contents of a `TEXTURE1` or `TEXTURE2` lump
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextureList {
    pub format: TextureFormat,
    pub textures: Vec<WadTexture>,
}

impl TextureList {
    pub fn new(format: TextureFormat) -> Self {
        Self {
            format,
            textures: Vec::new(),
        }
    }

    /// Parse a lump, detecting its layout. `lump` is only used for errors.
    pub fn from_bytes(lump: &str, data: &[u8]) -> Result<Self, WadError> {
        let format = TextureFormat::detect(lump, data)?;
        let textures = read_offsets(lump, data)?
            .into_iter()
            .map(|ofs| format.read_texture(lump, data, ofs))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { format, textures })
    }

    /// Fails if a texture has more patches than the count field can hold
    pub fn to_bytes(&self) -> Result<Vec<u8>, WadError> {
        let count = self.textures.len();
        let mut records = Vec::new();
        let mut offsets = Vec::with_capacity(count);
        let table_size = 4 + count * 4;
        for texture in &self.textures {
            offsets.push((table_size + records.len()) as u32);
            self.format.write_texture(texture, &mut records)?;
        }

        let mut out = Vec::with_capacity(table_size + records.len());
        out.extend_from_slice(&(count as u32).to_le_bytes());
        for ofs in offsets {
            out.extend_from_slice(&ofs.to_le_bytes());
        }
        out.extend_from_slice(&records);
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
