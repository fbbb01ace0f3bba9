mod cli;
mod config;

use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;

use cli::CLIOptions;
use log::{LevelFilter, error, info};
use simplelog::TermLogger;
use wtexport::{EXIT_NO_FILES, EXIT_OK, ExportError, run};

use crate::config::UserConfig;

const BASE_DIR: &str = "wtexport/";

fn main() -> ExitCode {
    let mut options: CLIOptions = argh::from_env();

    // Filtering is done with `log::set_max_level` so the config file can
    // still change the level after this
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        simplelog::ConfigBuilder::default()
            .set_time_level(LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("Could not start logging: {e}");
    }
    log::set_max_level(options.verbose.unwrap_or(LevelFilter::Info));

    let user_config = UserConfig::load();
    user_config.sync_cli(&mut options);
    log::set_max_level(options.verbose.unwrap_or(LevelFilter::Info));

    if options.files.is_empty() {
        error!("No input WADs given");
        return ExitCode::from(EXIT_NO_FILES);
    }
    let Some(base) = options.base_wad.clone() else {
        error!("No base WAD given, use --base-wad");
        return ExitCode::from(EXIT_NO_FILES);
    };
    let Some(output) = options.output.clone() else {
        error!("No output WAD given, use --output");
        return ExitCode::from(EXIT_NO_FILES);
    };
    let export_options = options.export_options(base, output);

    let result = match &options.list {
        Some(path) => match File::open(path) {
            Ok(file) => run(&export_options, BufReader::new(file)),
            Err(source) => Err(ExportError::IoFailure {
                context: format!("opening {path:?}"),
                source,
            }),
        },
        None => {
            info!("Reading the request list from stdin...");
            run(&export_options, io::stdin().lock())
        }
    };

    match result {
        Ok(_) => ExitCode::from(EXIT_OK),
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
