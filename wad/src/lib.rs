//! This crate contains the structures and tools for reading and writing
//! WAD files, and for the texture lumps inside them: `PNAMES`, `TEXTURE1`
//! and `TEXTURE2` (Doom or Strife layout), `ANIMATED` and `SWITCHES`.
//!
//! The structure of a WAD is this:
//!
//! ```text,ignore
//!                        <───── 32 bits ──────>
//!                        ┌────────────────────┐
//!             ┌──── 0x00 |  ASCII WAD Type    | 0x03
//!             |          | ────────────────── |
//!     Header ─┤     0x04 | # of directories   | 0x07
//!             |          | ────────────────── |
//!             └──── 0x08 | offset to listing ───0x0B ──┐
//!             ┌───────── | ────────────────── |        |
//!             |     0x0C | ┌────────────────┐ |        |
//!             |          | |   Lump Bytes   |<─────┐   |
//!     Lumps ──┤          | |       .        | |    |   |
//!             |          | └────────────────┘ |    |   |
//!             |          |         .          |    |   |
//!             └───────── |         .          |    |   |
//!             ┌───────── | ┌────────────────┐<─────────┘
//!             |          | |   Lump Offset  |──────┘
//!             |          | |----------------| |
//!  Directory ─┤          | |   Lump Size    | |
//!     List    |          | |----------------| |
//!             |          | |   Lump Name    | |
//!             |          | └────────────────┘ |
//!             |          |         .          |
//!             |          |         .          |
//!             |          |         .          |
//!             └───────── └────────────────────┘
//! ```

/// Bring the WAD structs down to root level
pub use crate::error::WadError;
pub use crate::wad::*;

mod error;

/// The WAD container and parser
pub mod wad;

/// A Lump is a named chunk of data that starts at an offset in the WAD.
///
/// The lumps module contains the texture lump records `PNAMES` and
/// `TEXTUREx`, and their binary layouts
pub mod lumps;

pub mod animated;
pub mod names;
pub mod switches;
pub mod texture_set;
