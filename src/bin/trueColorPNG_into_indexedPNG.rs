#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	rm2kfix::{codec, convert, stdoutRaw, ConversionError},
	std::{
		io::{self, BufWriter, Read, Write},
		process::ExitCode,
	},
};

/// Reads a PNG from stdin and writes its Rm2k-compatible 8-bit version to stdout.
///
/// An already compatible PNG is passed through unchanged.
fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
		.format_timestamp(None)
		.init();
	let stdin = &mut Vec::new();
	if let Err(err) = io::stdin().lock().read_to_end(stdin) {
		log::error!("stdin: {err}");
		return ExitCode::FAILURE;
	}
	let stdout = &mut BufWriter::new(stdoutRaw());
	let written = match convert(stdin.as_slice()) {
		Ok(indexed) => codec::encode(&indexed, &mut *stdout).map_err(|err| err.to_string()),
		Err(err @ ConversionError::AlreadyCompatible { .. }) => {
			log::info!("{err}");
			stdout.write_all(stdin).map_err(|err| err.to_string())
		}
		Err(err) => Err(err.to_string()),
	};
	match written.and_then(|()| stdout.flush().map_err(|err| err.to_string())) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			log::error!("{err}");
			ExitCode::FAILURE
		}
	}
}
