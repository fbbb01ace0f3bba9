//! The Boom `SWITCHES` lump: pairs of wall textures that swap when a switch
//! is used.

use crate::WadError;
use crate::names::{TABLE_NAME_LEN, name_from_bytes, name_to_bytes};
use crate::wad::read_2_bytes;

const RECORD_SIZE: usize = 20;

/// | Field Size | Data Type    | Content                                         |
/// |------------|--------------|-------------------------------------------------|
/// | 0x00-0x08  | 9 ASCII char | Texture shown while off, NUL terminated         |
/// | 0x09-0x11  | 9 ASCII char | Texture shown while on, NUL terminated          |
/// | 0x12-0x13  | short        | 1 = shareware, 2 = registered, 3 = commercial   |
///
/// The table ends with a record whose episode is zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchEntry {
    pub off_name: String,
    pub on_name: String,
    pub episode: u16,
}

impl SwitchEntry {
    pub fn new(off_name: &str, on_name: &str, episode: u16) -> Self {
        Self {
            off_name: off_name.to_ascii_uppercase(),
            on_name: on_name.to_ascii_uppercase(),
            episode,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Switches {
    pub entries: Vec<SwitchEntry>,
}

impl Switches {
    pub fn from_bytes(data: &[u8]) -> Result<Self, WadError> {
        let mut entries = Vec::new();
        let mut ofs = 0;
        loop {
            let record = data.get(ofs..ofs + RECORD_SIZE).ok_or_else(|| {
                WadError::malformed(
                    "SWITCHES",
                    format!("entry {} is truncated or the terminator is missing", entries.len()),
                )
            })?;
            let episode = read_2_bytes(record, 18).unwrap_or_default();
            if episode == 0 {
                break;
            }
            entries.push(SwitchEntry {
                off_name: name_from_bytes(&record[0..TABLE_NAME_LEN]),
                on_name: name_from_bytes(&record[9..9 + TABLE_NAME_LEN]),
                episode,
            });
            ofs += RECORD_SIZE;
        }
        Ok(Self { entries })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity((self.entries.len() + 1) * RECORD_SIZE);
        for entry in &self.entries {
            name_to_bytes(&entry.off_name, TABLE_NAME_LEN, &mut out);
            name_to_bytes(&entry.on_name, TABLE_NAME_LEN, &mut out);
            out.extend_from_slice(&entry.episode.to_le_bytes());
        }
        out.resize(out.len() + RECORD_SIZE, 0);
        out
    }

    /// Add an entry unless an identical one is already present
    pub fn add_entry(&mut self, entry: SwitchEntry) {
        if !self.entries.contains(&entry) {
            self.entries.push(entry);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SwitchEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
