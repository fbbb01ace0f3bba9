//! The Boom `ANIMATED` lump, which replaces the animation table that vanilla
//! Doom had compiled in.

use crate::WadError;
use crate::names::{TABLE_NAME_LEN, name_from_bytes, name_to_bytes};
use crate::wad::read_4_bytes;

const RECORD_SIZE: usize = 23;
const TERMINATOR: u8 = 0xff;
const DECALS_BIT: u8 = 0x02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimatedKind {
    Flat,
    Texture,
}

/// One animation cycle: every picture between `first_name` and `last_name`
/// inclusive, each shown for `ticks` tics.
///
/// | Field Size | Data Type    | Content                                     |
/// |------------|--------------|---------------------------------------------|
/// | 0x00       | byte         | 0 = flat, 1 = texture, bit 2 = allow decals |
/// | 0x01-0x09  | 9 ASCII char | Last name in the cycle, NUL terminated      |
/// | 0x0a-0x12  | 9 ASCII char | First name in the cycle, NUL terminated     |
/// | 0x13-0x16  | unsigned int | Tics per frame                              |
///
/// The table ends with a type byte of `0xFF`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimatedEntry {
    pub kind: AnimatedKind,
    pub last_name: String,
    pub first_name: String,
    pub ticks: u32,
    /// ZDoom extension, only meaningful for textures
    pub allow_decals: bool,
}

impl AnimatedEntry {
    pub fn texture(last_name: &str, first_name: &str, ticks: u32, allow_decals: bool) -> Self {
        Self {
            kind: AnimatedKind::Texture,
            last_name: last_name.to_ascii_uppercase(),
            first_name: first_name.to_ascii_uppercase(),
            ticks,
            allow_decals,
        }
    }

    pub fn flat(last_name: &str, first_name: &str, ticks: u32) -> Self {
        Self {
            kind: AnimatedKind::Flat,
            last_name: last_name.to_ascii_uppercase(),
            first_name: first_name.to_ascii_uppercase(),
            ticks,
            allow_decals: false,
        }
    }

    pub fn is_texture(&self) -> bool {
        self.kind == AnimatedKind::Texture
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Animated {
    pub entries: Vec<AnimatedEntry>,
}

impl Animated {
    pub fn from_bytes(data: &[u8]) -> Result<Self, WadError> {
        let mut entries = Vec::new();
        let mut ofs = 0;
        loop {
            let kind_byte = *data
                .get(ofs)
                .ok_or_else(|| WadError::malformed("ANIMATED", "missing 0xFF terminator"))?;
            if kind_byte == TERMINATOR {
                break;
            }
            let record = data.get(ofs..ofs + RECORD_SIZE).ok_or_else(|| {
                WadError::malformed("ANIMATED", format!("entry {} is truncated", entries.len()))
            })?;

            let kind = if kind_byte & 0x01 != 0 {
                AnimatedKind::Texture
            } else {
                AnimatedKind::Flat
            };
            entries.push(AnimatedEntry {
                kind,
                last_name: name_from_bytes(&record[1..1 + TABLE_NAME_LEN]),
                first_name: name_from_bytes(&record[10..10 + TABLE_NAME_LEN]),
                ticks: read_4_bytes(record, 19).unwrap_or_default(),
                allow_decals: kind == AnimatedKind::Texture && kind_byte & DECALS_BIT != 0,
            });
            ofs += RECORD_SIZE;
        }
        Ok(Self { entries })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.entries.len() * RECORD_SIZE + 1);
        for entry in &self.entries {
            let kind_byte = match entry.kind {
                AnimatedKind::Flat => 0,
                AnimatedKind::Texture if entry.allow_decals => 1 | DECALS_BIT,
                AnimatedKind::Texture => 1,
            };
            out.push(kind_byte);
            name_to_bytes(&entry.last_name, TABLE_NAME_LEN, &mut out);
            name_to_bytes(&entry.first_name, TABLE_NAME_LEN, &mut out);
            out.extend_from_slice(&entry.ticks.to_le_bytes());
        }
        out.push(TERMINATOR);
        out
    }

    /// Add an entry unless an identical one is already present
    pub fn add_entry(&mut self, entry: AnimatedEntry) {
        if !self.entries.contains(&entry) {
            self.entries.push(entry);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnimatedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
