#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	clap::Parser,
	const_format::formatcp,
	log::LevelFilter,
	rm2kfix::{
		config::Config,
		fixer::{fixFile, Outcome, RetryPolicy},
		project::Project,
		watcher::{self, CONVERTED_FILE_TEXT},
		MAX_PALETTE_LEN,
	},
	std::{
		io::{self, BufRead},
		path::{Path, PathBuf},
		process::ExitCode,
	},
};

const ABOUT: &str = formatcp!(
	"
rm2kfix is a tool for auto-fixing PNG files so they work in RPG Maker. It will \"watch\" an RPG Maker \
project folder for changes and automatically convert PNG files to an 8-bit PNG (if they do not exceed \
{max} colors)

How it works
-------------------------
If your PNG files are not already an 8-bit PNG, it will attempt to convert any PNG format to an 8-bit PNG by:
- Iterating over every pixel and building up a palette of colors
- It will decide that the top-left corner is the transparent pixel (except for Chipsets, it picks from the transparent tile)

If your PNG file exceeds {max} colors, it will give up on the conversion process and do nothing.

How to use (beginners)
-------------------------
First, make sure you *backup* your RPG Maker project files to avoid any images becoming corrupted, then \
to use this drag your RPG Maker folder onto this exe file.

How to use (nerds)
-------------------------
rm2kfix [--debug] [--fix] <folder>

Why does this tool exist?
-------------------------
This tool exists so that users can work in paint tools they're comfortable in without needing to think \
about managing their palette (until they exceed the max {max} colors that is!).
",
	max = MAX_PALETTE_LEN,
);

#[derive(Parser)]
#[clap(about = ABOUT)]
struct Args {
	/// Get additional debugging information
	#[clap(long)]
	debug: bool,

	/// Only run the fixing pass once and don't watch the folder
	#[clap(long)]
	fix: bool,

	/// RPG Maker 2000/2003 project folder (the one with RPG_RT.exe)
	folder: Option<PathBuf>,
}

fn main() -> ExitCode {
	let Args { debug, fix, folder } = Args::parse();
	env_logger::Builder::new()
		.filter_level(if debug { LevelFilter::Debug } else { LevelFilter::Info })
		.parse_default_env()
		.format_timestamp(None)
		.format_target(false)
		.init();

	let Some(folder) = folder else {
		// Double-clicking the exe gives a console that would vanish instantly.
		println!("{ABOUT}");
		println!("Press Enter to close");
		_ = io::stdin().lock().read_line(&mut String::new());
		return ExitCode::SUCCESS;
	};
	match run(&folder, fix) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			log::error!("{err}");
			ExitCode::FAILURE
		}
	}
}

fn run(folder: &Path, isFixOnlyMode: bool) -> Result<(), Box<dyn std::error::Error>> {
	let config = if folder.is_dir() { Config::load(folder)? } else { Config::default() };
	let project = Project::open(folder, &config.extraAssetFolders)?;
	log::debug!("{config:?}");

	let pngFiles = project.pngFiles()?;
	let filesConverted = fixAll(&pngFiles);
	if filesConverted.is_empty() {
		log::info!("No files converted.");
	} else {
		for path in &filesConverted {
			log::info!("{CONVERTED_FILE_TEXT} {}", path.display());
		}
	}
	if isFixOnlyMode {
		return Ok(());
	}
	watcher::watch(&project, config.retryPolicy())?;
	Ok(())
}

fn fixAll(paths: &[PathBuf]) -> Vec<&Path> {
	let mut filesConverted = Vec::with_capacity(paths.len());
	for path in paths {
		match fixFile(path, RetryPolicy::NONE) {
			Ok(Outcome::Converted { .. }) => filesConverted.push(path.as_path()),
			Ok(Outcome::AlreadyCompatible) => {}
			Ok(Outcome::Skipped(err)) | Err(err) => {
				log::warn!("Skipping file: {}, error: {err}", path.display());
			}
		}
	}
	filesConverted
}
