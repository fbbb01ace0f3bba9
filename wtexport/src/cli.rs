use std::path::PathBuf;

use argh::FromArgs;
use wtexport::ExportOptions;

/// Extract textures and flats, plus the patches, animations and switches they
/// need, from a set of WADs in to one output WAD. The request list is read
/// from --list, or stdin if not given.
#[derive(Debug, Clone, FromArgs)]
pub struct CLIOptions {
    /// verbose level: off, error, warn, info, debug
    #[argh(option)]
    pub verbose: Option<log::LevelFilter>,
    /// the base WAD (usually the IWAD) whose texture lumps are added to
    #[argh(option, short = 'b')]
    pub base_wad: Option<PathBuf>,
    /// the WAD to write
    #[argh(option, short = 'o')]
    pub output: Option<PathBuf>,
    /// add to the output WAD if it exists instead of replacing it
    #[argh(switch, short = 'a')]
    pub add: bool,
    /// texture to put first in TEXTURE1, default is the first of AASTINKY,
    /// AASHITTY, BADPATCH or ABADONE
    #[argh(option)]
    pub null_texture: Option<String>,
    /// do not follow or write ANIMATED
    #[argh(switch)]
    pub no_animated: bool,
    /// do not follow or write SWITCHES
    #[argh(switch)]
    pub no_switches: bool,
    /// file to read the request list from
    #[argh(option)]
    pub list: Option<PathBuf>,
    /// source WADs, highest priority first
    #[argh(positional)]
    pub files: Vec<PathBuf>,
}

impl CLIOptions {
    pub fn export_options(&self, base: PathBuf, output: PathBuf) -> ExportOptions {
        ExportOptions {
            additive: self.add,
            null_texture: self.null_texture.clone(),
            animated: !self.no_animated,
            switches: !self.no_switches,
            ..ExportOptions::new(self.files.clone(), base, output)
        }
    }
}
