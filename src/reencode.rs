use {
	crate::{
		image::{truncate, IndexedImage, Rgba8, SourceImage},
		ConversionError, Dimension, Palette, MAX_PALETTE_LEN,
	},
	glam::IVec2,
	std::collections::HashMap,
};

/// Redraws `source` with indices into `palette`, then checks the result pixel by pixel.
///
/// Exact match only. A color the palette does not hold is drawn with index 0 and then
/// caught by [`verify`].
pub fn reencode(source: &SourceImage, palette: &Palette) -> Result<IndexedImage, ConversionError> {
	if palette.len() > MAX_PALETTE_LEN {
		return Err(ConversionError::PaletteTooLarge { paletteLen: palette.len() });
	}
	let mut lookup = HashMap::<Rgba8, u8>::with_capacity(palette.len());
	for (i, &color) in palette.colors().iter().enumerate() {
		lookup.entry(color).or_insert(i as _);
	}
	let dest = IndexedImage {
		bounds: source.bounds,
		indices: source
			.bounds
			.points()
			.map(|point| lookup.get(&truncate(source.at(point))).copied().unwrap_or(0))
			.collect(),
		palette: palette.clone(),
	};
	verify(source, &dest)?;
	Ok(dest)
}

/// Sanity check that `dest` shows the same image as `source`, pixel by pixel.
pub fn verify(source: &SourceImage, dest: &IndexedImage) -> Result<(), ConversionError> {
	let (sourceSize, destSize) = (source.bounds.size(), dest.bounds.size());
	if sourceSize.x != destSize.x {
		return Err(ConversionError::DimensionMismatch {
			dimension: Dimension::Width,
			expected: sourceSize.x,
			actual: destSize.x,
		});
	}
	if sourceSize.y != destSize.y {
		return Err(ConversionError::DimensionMismatch {
			dimension: Dimension::Height,
			expected: sourceSize.y,
			actual: destSize.y,
		});
	}
	for y in 0..sourceSize.y {
		for x in 0..sourceSize.x {
			let Δ = IVec2::new(x, y);
			if source.at(source.bounds.min + Δ) != dest.at(dest.bounds.min + Δ) {
				return Err(ConversionError::PixelMismatch { point: source.bounds.min + Δ });
			}
		}
	}
	Ok(())
}
