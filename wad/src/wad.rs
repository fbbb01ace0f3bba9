use std::fs::{self, File};
use std::io::prelude::*;
use std::path::{Path, PathBuf};
use std::fmt;

use log::debug;

use crate::WadError;
use crate::names::{NAME_LEN, name_from_bytes, name_to_bytes, normalise_name};

const HEADER_SIZE: usize = 12;
const DIRECTORY_SIZE: usize = 16;

pub(crate) fn read_2_bytes(data: &[u8], offset: usize) -> Option<u16> {
    let b = data.get(offset..offset + 2)?;
    Some((b[1] as u16) << 8 | (b[0] as u16))
}

pub(crate) fn read_4_bytes(data: &[u8], offset: usize) -> Option<u32> {
    let b = data.get(offset..offset + 4)?;
    Some((b[3] as u32) << 24 | (b[2] as u32) << 16 | (b[1] as u32) << 8 | (b[0] as u32))
}

/// Whether the WAD is a game (`IWAD`) or a patch (`PWAD`)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WadKind {
    Iwad,
    #[default]
    Pwad,
}

impl WadKind {
    fn magic(&self) -> &'static [u8; 4] {
        match self {
            WadKind::Iwad => b"IWAD",
            WadKind::Pwad => b"PWAD",
        }
    }
}

/// Header which tells us the WAD type and where the data is
///
/// The header structure in the WAD is as follows:
///
/// | Field Size | Data Type    | Content                                              |
/// |------------|--------------|------------------------------------------------------|
/// | 0x00-0x03  | 4 ASCII char | *Must* be an ASCII string (either "IWAD" or "PWAD")  |
/// | 0x04-0x07  | unsigned int | The number entries in the directory                  |
/// | 0x08-0x0b  | unsigned int | Offset in bytes to the directory in the WAD file     |
///
struct WadHeader {
    kind: WadKind,
    /// The count of "lumps" of data
    dir_count: u32,
    /// Offset in bytes that the directory starts at
    dir_offset: u32,
}

impl WadHeader {
    fn read(data: &[u8], path: &Path) -> Result<Self, WadError> {
        let not_a_wad = |reason: &str| WadError::NotAWad {
            path: path.to_path_buf(),
            reason: reason.to_owned(),
        };

        let kind = match data.get(0..4) {
            Some(b"IWAD") => WadKind::Iwad,
            Some(b"PWAD") => WadKind::Pwad,
            Some(_) => return Err(not_a_wad("bad magic")),
            None => return Err(not_a_wad("file too short for a header")),
        };
        let dir_count = read_4_bytes(data, 4).ok_or_else(|| not_a_wad("truncated header"))?;
        let dir_offset = read_4_bytes(data, 8).ok_or_else(|| not_a_wad("truncated header"))?;

        let dir_end = dir_offset as usize + dir_count as usize * DIRECTORY_SIZE;
        if dir_end > data.len() {
            return Err(not_a_wad("directory extends past end of file"));
        }

        Ok(WadHeader {
            kind,
            dir_count,
            dir_offset,
        })
    }
}

impl fmt::Debug for WadHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "\nWadHeader {{\n  kind: {:?},\n  dir_count: {},\n  dir_offset: {},\n}}",
            self.kind, self.dir_count, self.dir_offset
        )
    }
}

/// A named blob of bytes. The data is copied out of the file when the WAD is
/// opened so lumps can be freely replaced or appended before writing back.
///
/// Each directory entry in the WAD is as follows:
///
/// | Field Size | Data Type    | Content                                                    |
/// |------------|--------------|------------------------------------------------------------|
/// | 0x00-0x03  | unsigned int | Offset value to the start of the lump data in the WAD file |
/// | 0x04-0x07  | unsigned int | The size of the lump in bytes                              |
/// | 0x08-0x0f  | 8 ASCII char | ASCII holding the name of the lump                         |
///
#[derive(Clone, PartialEq, Eq)]
pub struct Lump {
    pub name: String,
    pub data: Vec<u8>,
}

impl Lump {
    /// Markers such as `P_START` carry no data
    pub fn is_marker(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for Lump {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "\nLump {{\n  name: {},\n  size: {},\n}}",
            &self.name,
            self.data.len()
        )
    }
}

/// "Where's All (the) Data": the lumps of a WAD held in memory, in directory
/// order. Opening reads the whole file; nothing touches the disk again until
/// [`WadData::save`].
#[derive(Clone, Default)]
pub struct WadData {
    kind: WadKind,
    lumps: Vec<Lump>,
}

impl fmt::Debug for WadData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "\nWadData {{\n  kind: {:?},\n  lumps: {:?},\n}}",
            self.kind, self.lumps
        )
    }
}

impl WadData {
    /// An empty WAD of the given kind
    pub fn create(kind: WadKind) -> Self {
        WadData {
            kind,
            lumps: Vec::new(),
        }
    }

    /// Read a WAD file in to memory
    pub fn open(path: &Path) -> Result<Self, WadError> {
        let mut file = File::open(path).map_err(|source| WadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|source| WadError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let wad = Self::parse(&data, path)?;
        debug!("Read {} lumps from {:?}", wad.lumps.len(), path);
        Ok(wad)
    }

    /// Open an existing WAD, or start a new empty PWAD if nothing exists at
    /// `path` yet
    pub fn open_or_create(path: &Path) -> Result<Self, WadError> {
        if path.exists() {
            Self::open(path)
        } else {
            Ok(Self::create(WadKind::Pwad))
        }
    }

    /// Parse a complete WAD image
    pub fn from_bytes(data: &[u8]) -> Result<Self, WadError> {
        Self::parse(data, Path::new("<memory>"))
    }

    fn parse(data: &[u8], path: &Path) -> Result<Self, WadError> {
        let header = WadHeader::read(data, path)?;
        let mut lumps = Vec::with_capacity(header.dir_count as usize);

        for i in 0..header.dir_count as usize {
            let offset = header.dir_offset as usize + i * DIRECTORY_SIZE;
            // Bounds were checked against the header
            let lump_offset = read_4_bytes(data, offset).unwrap_or_default() as usize;
            let lump_size = read_4_bytes(data, offset + 4).unwrap_or_default() as usize;
            let name = name_from_bytes(&data[offset + 8..offset + 8 + NAME_LEN]);

            let lump_data = data
                .get(lump_offset..lump_offset + lump_size)
                .ok_or_else(|| WadError::NotAWad {
                    path: path.to_path_buf(),
                    reason: format!("lump {name} extends past end of file"),
                })?;
            lumps.push(Lump {
                name,
                data: lump_data.to_vec(),
            });
        }

        Ok(WadData {
            kind: header.kind,
            lumps,
        })
    }

    pub fn kind(&self) -> WadKind {
        self.kind
    }

    pub fn lumps(&self) -> &[Lump] {
        &self.lumps
    }

    pub fn lump_count(&self) -> usize {
        self.lumps.len()
    }

    pub fn lump(&self, index: usize) -> Option<&Lump> {
        self.lumps.get(index)
    }

    /// Index of the first lump named `name`
    pub fn find_lump_index(&self, name: &str) -> Option<usize> {
        self.find_lump_index_from(name, 0)
    }

    /// Index of the first lump named `name` at or after `start`
    pub fn find_lump_index_from(&self, name: &str, start: usize) -> Option<usize> {
        self.lumps
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, l)| l.name.eq_ignore_ascii_case(name))
            .map(|(i, _)| i)
    }

    /// Index of the last lump named `name`
    pub fn find_last_lump_index(&self, name: &str) -> Option<usize> {
        self.lumps
            .iter()
            .rposition(|l| l.name.eq_ignore_ascii_case(name))
    }

    pub fn lump_exists(&self, name: &str) -> bool {
        self.find_lump_index(name).is_some()
    }

    /// The first lump named `name`
    pub fn get_lump(&self, name: &str) -> Option<&Lump> {
        self.find_lump_index(name).map(|i| &self.lumps[i])
    }

    /// Append a lump to the end of the directory
    pub fn add_lump(&mut self, name: &str, data: Vec<u8>) -> Result<(), WadError> {
        let name = normalise_name(name)?;
        self.lumps.push(Lump { name, data });
        Ok(())
    }

    /// Swap the data of an existing lump, keeping its name and position
    pub fn replace_lump(&mut self, index: usize, data: Vec<u8>) -> Result<(), WadError> {
        let count = self.lumps.len();
        let lump = self.lumps.get_mut(index).ok_or_else(|| {
            WadError::malformed("directory", format!("no lump {index} of {count}"))
        })?;
        lump.data = data;
        Ok(())
    }

    /// Replace the first lump named `name`, or append it if there is none
    pub fn set_lump(&mut self, name: &str, data: Vec<u8>) -> Result<(), WadError> {
        match self.find_lump_index(name) {
            Some(index) => self.replace_lump(index, data),
            None => self.add_lump(name, data),
        }
    }

    /// The complete WAD image: header, lump data, then the directory
    pub fn to_bytes(&self) -> Vec<u8> {
        let data_len: usize = self.lumps.iter().map(|l| l.data.len()).sum();
        let mut out =
            Vec::with_capacity(HEADER_SIZE + data_len + self.lumps.len() * DIRECTORY_SIZE);

        out.extend_from_slice(self.kind.magic());
        out.extend_from_slice(&(self.lumps.len() as u32).to_le_bytes());
        out.extend_from_slice(&((HEADER_SIZE + data_len) as u32).to_le_bytes());

        let mut offsets = Vec::with_capacity(self.lumps.len());
        for lump in &self.lumps {
            offsets.push(out.len() as u32);
            out.extend_from_slice(&lump.data);
        }

        for (lump, offset) in self.lumps.iter().zip(offsets) {
            out.extend_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(&(lump.data.len() as u32).to_le_bytes());
            name_to_bytes(&lump.name, NAME_LEN, &mut out);
        }
        out
    }

    /// Write the WAD to `path`. The image goes to a temporary file beside the
    /// target first and is then renamed over it, so a failed write leaves any
    /// existing file untouched. A replaced file keeps its permissions, a new
    /// one gets the usual permissions for the current umask.
    pub fn save(&self, path: &Path) -> Result<(), WadError> {
        let io_err = |source| WadError::Io {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut builder = tempfile::Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let mut file = builder.tempfile_in(&dir).map_err(io_err)?;
        if let Ok(existing) = fs::metadata(path) {
            file.as_file()
                .set_permissions(existing.permissions())
                .map_err(io_err)?;
        }
        file.write_all(&self.to_bytes()).map_err(io_err)?;
        file.as_file().sync_all().map_err(io_err)?;
        file.persist(path).map_err(|e| io_err(e.error))?;

        debug!("Wrote {} lumps to {:?}", self.lumps.len(), path);
        Ok(())
    }
}
