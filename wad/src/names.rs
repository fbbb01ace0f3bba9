//! Rules for the fixed-width names used by lumps, patches, textures and flats.

use crate::WadError;

/// Width of a name field in the WAD directory, `PNAMES` and `TEXTUREx`
pub const NAME_LEN: usize = 8;

/// Names in `ANIMATED` and `SWITCHES` carry a terminating NUL
pub const TABLE_NAME_LEN: usize = 9;

/// True if `name` is 1-8 characters of `A-Z 0-9 [ ] - _ \ ^` once upper-cased
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= NAME_LEN
        && name.chars().all(|c| {
            let c = c.to_ascii_uppercase();
            c.is_ascii_uppercase() || c.is_ascii_digit() || "[]-_\\^".contains(c)
        })
}

/// Upper-case and validate a resource name
pub fn normalise_name(name: &str) -> Result<String, WadError> {
    let name = name.trim().to_ascii_uppercase();
    if is_valid_name(&name) {
        Ok(name)
    } else {
        Err(WadError::InvalidName(name))
    }
}

/// Read a NUL (or space) padded name field. Anything after the first NUL is
/// junk left over by old editors and is discarded.
pub fn name_from_bytes(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end])
        .trim_end_matches(' ')
        .to_ascii_uppercase()
}

/// Write `name` into a NUL padded field of `len` bytes, truncating if needed
pub fn name_to_bytes(name: &str, len: usize, out: &mut Vec<u8>) {
    let bytes = name.as_bytes();
    let n = bytes.len().min(len);
    out.extend_from_slice(&bytes[..n]);
    out.resize(out.len() + (len - n), 0);
}
