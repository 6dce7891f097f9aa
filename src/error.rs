use {
	crate::MAX_PALETTE_LEN,
	core::fmt,
	glam::IVec2,
};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
	#[error(transparent)]
	Png(#[from] png::DecodingError),

	#[error("indexed PNG has no PLTE chunk")]
	MissingPalette,

	#[error("image is {width}x{height}, which does not fit the pixel grid")]
	Dimensions { width: u32, height: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dimension {
	Width,
	Height,
}

impl fmt::Display for Dimension {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Dimension::Width => "width",
			Dimension::Height => "height",
		})
	}
}

/// Callers are expected to match on the kind: `AlreadyCompatible` means there is nothing to do,
/// `DecodeFailed` may go away on retry, `PaletteTooLarge` is final for that file, and the two
/// mismatch kinds mean the re-encoder itself is broken.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
	#[error("unable to decode PNG: {0}")]
	DecodeFailed(#[from] DecodeError),

	#[error("{}", alreadyCompatibleMessage(.paletteLen))]
	AlreadyCompatible { paletteLen: usize },

	#[error("Palette size is {paletteLen}, which is too big")]
	PaletteTooLarge { paletteLen: usize },

	#[error("source and destination do not match in {dimension}: {expected} != {actual}")]
	DimensionMismatch { dimension: Dimension, expected: i32, actual: i32 },

	#[error("source and destination do not match at pixel: {}x{}", .point.x, .point.y)]
	PixelMismatch { point: IVec2 },
}

fn alreadyCompatibleMessage(&paletteLen: &usize) -> String {
	if paletteLen == MAX_PALETTE_LEN {
		format!("PNG is valid Rm2k png with {paletteLen} colors.")
	} else {
		format!(
			"PNG is valid Rm2k png with less than {MAX_PALETTE_LEN} colors in its palette. It has {paletteLen}."
		)
	}
}

impl From<png::DecodingError> for ConversionError {
	fn from(err: png::DecodingError) -> Self {
		Self::DecodeFailed(err.into())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages() {
		assert_eq!(
			ConversionError::AlreadyCompatible { paletteLen: 256 }.to_string(),
			"PNG is valid Rm2k png with 256 colors."
		);
		assert_eq!(
			ConversionError::AlreadyCompatible { paletteLen: 16 }.to_string(),
			"PNG is valid Rm2k png with less than 256 colors in its palette. It has 16."
		);
		assert_eq!(
			ConversionError::DimensionMismatch { dimension: Dimension::Height, expected: 2, actual: 3 }
				.to_string(),
			"source and destination do not match in height: 2 != 3"
		);
		assert_eq!(
			ConversionError::PixelMismatch { point: IVec2::new(4, 5) }.to_string(),
			"source and destination do not match at pixel: 4x5"
		);
	}
}
