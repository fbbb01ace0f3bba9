//! User configuration options.

use std::fs;
use std::path::PathBuf;

use dirs::config_dir;
use log::{info, warn};
use nanoserde::{DeRon, SerRon};

use crate::BASE_DIR;
use crate::cli::CLIOptions;

const LOG_TAG: &str = "UserConfig";

fn get_cfg_file() -> Option<PathBuf> {
    let mut dir = config_dir()?;
    dir.push(BASE_DIR);
    dir.push("config.ron");
    Some(dir)
}

/// Defaults for options not given on the command line
#[derive(Debug, Default, Clone, PartialEq, DeRon, SerRon)]
pub struct UserConfig {
    #[nserde(default)]
    pub null_texture: Option<String>,
    #[nserde(default)]
    pub no_animated: bool,
    #[nserde(default)]
    pub no_switches: bool,
    /// off, error, warn, info, debug or trace
    #[nserde(default)]
    pub verbose: Option<String>,
}

impl UserConfig {
    /// Read the config file if there is one. A file that can't be parsed is
    /// ignored.
    pub fn load() -> Self {
        let Some(path) = get_cfg_file() else {
            return Self::default();
        };
        let Ok(text) = fs::read_to_string(&path) else {
            return Self::default();
        };
        Self::parse(&text).unwrap_or_else(|e| {
            warn!(target: LOG_TAG, "Could not deserialise {:?}: {}", path, e);
            Self::default()
        })
    }

    fn parse(text: &str) -> Result<Self, nanoserde::DeRonErr> {
        let config = UserConfig::deserialize_ron(text)?;
        info!(target: LOG_TAG, "Loaded user config file");
        Ok(config)
    }

    /// Fill in anything the command line left unset. Command line options
    /// always win.
    pub fn sync_cli(&self, cli: &mut CLIOptions) {
        if cli.null_texture.is_none() {
            cli.null_texture.clone_from(&self.null_texture);
        }
        cli.no_animated |= self.no_animated;
        cli.no_switches |= self.no_switches;

        if cli.verbose.is_none() {
            cli.verbose = self.verbose.as_deref().and_then(|v| match v.parse() {
                Ok(level) => Some(level),
                Err(_) => {
                    warn!(target: LOG_TAG, "Unknown verbose level {:?}", v);
                    None
                }
            });
        }
    }
}
