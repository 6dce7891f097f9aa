use {
	crate::{
		fileswap::{convertFileInPlace, FixError},
		ConversionError,
	},
	std::{path::Path, thread, time::Duration},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
	Skip,
	/// Cannot be converted; tell the user and move on.
	Report,
	/// Probably still being written by an editor.
	Retry,
	Abort,
}

impl FixError {
	pub fn disposition(&self) -> Disposition {
		match self {
			FixError::Open(_) | FixError::Conversion(ConversionError::DecodeFailed(_)) => Disposition::Retry,
			FixError::Conversion(ConversionError::AlreadyCompatible { .. }) => Disposition::Skip,
			FixError::Conversion(ConversionError::PaletteTooLarge { .. }) => Disposition::Report,
			FixError::Conversion(
				ConversionError::DimensionMismatch { .. } | ConversionError::PixelMismatch { .. },
			)
			| FixError::Encode(_)
			| FixError::Swap { .. } => Disposition::Abort,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	pub retries: u32,
	pub delay: Duration,
}

impl RetryPolicy {
	pub const NONE: Self = Self { retries: 0, delay: Duration::ZERO };
}

#[derive(Debug)]
pub enum Outcome {
	Converted { retries: u32 },
	AlreadyCompatible,
	Skipped(FixError),
}

/// Runs [`convertFileInPlace`] until it succeeds, fails for good, or runs out of retries.
///
/// Only [`Disposition::Abort`] failures come back as `Err`.
pub fn fixFile(path: &Path, policy: RetryPolicy) -> Result<Outcome, FixError> {
	fixWith(path, policy, convertFileInPlace)
}

fn fixWith(
	path: &Path,
	policy: RetryPolicy,
	mut attempt: impl FnMut(&Path) -> Result<(), FixError>,
) -> Result<Outcome, FixError> {
	let mut retries = 0;
	loop {
		let err = match attempt(path) {
			Ok(()) => return Ok(Outcome::Converted { retries }),
			Err(err) => err,
		};
		match err.disposition() {
			Disposition::Skip => return Ok(Outcome::AlreadyCompatible),
			Disposition::Report => return Ok(Outcome::Skipped(err)),
			Disposition::Retry if retries < policy.retries => {
				retries += 1;
				thread::sleep(policy.delay);
			}
			Disposition::Retry => return Ok(Outcome::Skipped(err)),
			Disposition::Abort => return Err(err),
		}
	}
}

#[cfg(test)]
mod tests {
	use {
		super::*,
		crate::DecodeError,
		std::{cell::Cell, io},
	};

	const POLICY: RetryPolicy = RetryPolicy { retries: 3, delay: Duration::ZERO };

	fn locked() -> FixError {
		FixError::Open(io::Error::new(io::ErrorKind::PermissionDenied, "in use"))
	}

	#[test]
	fn dispositions() {
		use ConversionError::*;
		let cases = [
			(locked(), Disposition::Retry),
			(DecodeFailed(DecodeError::MissingPalette).into(), Disposition::Retry),
			(AlreadyCompatible { paletteLen: 256 }.into(), Disposition::Skip),
			(PaletteTooLarge { paletteLen: 300 }.into(), Disposition::Report),
			(PixelMismatch { point: glam::IVec2::ZERO }.into(), Disposition::Abort),
			(
				FixError::Swap { step: crate::fileswap::SwapStep::Backup, source: io::ErrorKind::Other.into() },
				Disposition::Abort,
			),
		];
		for (err, disposition) in cases {
			assert_eq!(err.disposition(), disposition, "{err}");
		}
	}

	#[test]
	fn retriesUntilItWorks() {
		let calls = Cell::new(0);
		let outcome = fixWith(Path::new("x.png"), POLICY, |_| {
			calls.set(calls.get() + 1);
			if calls.get() < 3 { Err(locked()) } else { Ok(()) }
		});
		assert!(matches!(outcome, Ok(Outcome::Converted { retries: 2 })));
	}

	#[test]
	fn givesUpAfterPolicy() {
		let calls = Cell::new(0);
		let outcome = fixWith(Path::new("x.png"), POLICY, |_| {
			calls.set(calls.get() + 1);
			Err(locked())
		});
		assert!(matches!(outcome, Ok(Outcome::Skipped(FixError::Open(_)))));
		assert_eq!(calls.get(), 4);
	}

	#[test]
	fn noRetryForFinalErrors() {
		let calls = Cell::new(0);
		let outcome = fixWith(Path::new("x.png"), POLICY, |_| {
			calls.set(calls.get() + 1);
			Err(ConversionError::PaletteTooLarge { paletteLen: 257 }.into())
		});
		assert!(matches!(outcome, Ok(Outcome::Skipped(_))));
		assert_eq!(calls.get(), 1);

		let outcome = fixWith(Path::new("x.png"), RetryPolicy::NONE, |_| {
			Err(ConversionError::AlreadyCompatible { paletteLen: 17 }.into())
		});
		assert!(matches!(outcome, Ok(Outcome::AlreadyCompatible)));

		let outcome = fixWith(Path::new("x.png"), POLICY, |_| {
			Err(ConversionError::PixelMismatch { point: glam::IVec2::ONE }.into())
		});
		assert!(matches!(outcome, Err(FixError::Conversion(ConversionError::PixelMismatch { .. }))));
	}
}
