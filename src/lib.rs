#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case, confusable_idents, mixed_script_confusables, uncommon_codepoints)]

pub const RGB_SIZE: usize = 3;
pub const RGBA_SIZE: usize = 4;

/// Largest palette the RPG Maker 2000/2003 runtime accepts.
pub const MAX_PALETTE_LEN: usize = 256;

// The Rm2k3 editor blacks out charsets whose palette has fewer than 17 entries
// (1 transparent + 16 colors). 16 was tried and did not work.
pub const MIN_PALETTE_LEN: usize = 17;

pub mod codec;
pub mod config;
pub mod convert;
pub mod error;
pub mod fileswap;
pub mod fixer;
pub mod image;
pub mod palette;
pub mod project;
pub mod reencode;
pub mod watcher;

pub use {
	convert::{convert, convertImage},
	error::{ConversionError, DecodeError, Dimension},
	image::{IndexedImage, Pixels, Rectangle, Rgba16, Rgba8, SourceImage},
	palette::{buildPalette, Palette},
	reencode::{reencode, verify},
};

use std::fs::File;

#[cfg(unix)]
pub fn stdoutRaw() -> File {
	use std::os::unix::io::FromRawFd;
	unsafe { File::from_raw_fd(1) }
}

#[cfg(windows)]
pub fn stdoutRaw() -> File {
	use std::{
		io,
		os::windows::io::{AsRawHandle, FromRawHandle},
	};
	unsafe { File::from_raw_handle(io::stdout().as_raw_handle()) }
}
