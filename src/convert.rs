use {
	crate::{buildPalette, codec, reencode, ConversionError, IndexedImage, SourceImage, MAX_PALETTE_LEN},
	std::io::Read,
};

/// Losslessly converts any PNG stream into an Rm2k-compatible indexed image.
///
/// If the PNG is already indexed with a palette of [`MAX_PALETTE_LEN`] colors or fewer, nothing is
/// converted and [`ConversionError::AlreadyCompatible`] comes back instead.
pub fn convert(sourceBytes: impl Read) -> Result<IndexedImage, ConversionError> {
	convertImage(&codec::decode(sourceBytes)?)
}

pub fn convertImage(source: &SourceImage) -> Result<IndexedImage, ConversionError> {
	// Most Rm2k assets carry a full 256-color palette whether or not it is all used, but fewer
	// colors load fine too, so any indexed image within budget is left alone.
	if let Some(palette) = source.palette() {
		if palette.len() <= MAX_PALETTE_LEN {
			return Err(ConversionError::AlreadyCompatible { paletteLen: palette.len() });
		}
	}
	let palette = buildPalette(source)?;
	reencode(source, &palette)
}
