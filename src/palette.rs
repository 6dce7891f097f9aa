use {
	crate::{
		image::{truncate, Rectangle, Rgba16, Rgba8, SourceImage, FULLY_TRANSPARENT},
		ConversionError, MAX_PALETTE_LEN, MIN_PALETTE_LEN, RGB_SIZE,
	},
	glam::IVec2,
	std::collections::HashMap,
};

/// Ordered palette. Index 0 is always the transparency color.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette(Vec<Rgba8>);

impl Palette {
	pub fn colors(&self) -> &[Rgba8] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn transparency(&self) -> Option<Rgba8> {
		self.0.first().copied()
	}

	pub fn toPLTE(&self) -> Vec<u8> {
		self.0.iter().flat_map(|color| color[..RGB_SIZE].iter().copied()).collect()
	}

	/// tRNS chunk payload, cut after the last entry that is not fully opaque.
	pub fn toTRNS(&self) -> Option<Vec<u8>> {
		let last = self.0.iter().rposition(|&[.., alpha]| alpha != u8::MAX)?;
		Some(self.0[..=last].iter().map(|&[.., alpha]| alpha).collect())
	}
}

impl From<Vec<Rgba8>> for Palette {
	fn from(colors: Vec<Rgba8>) -> Self {
		Self(colors)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Canvas {
	/// 480×256 Rm2k/3 chipset.
	Chipset,
	Other,
}

impl Canvas {
	pub const CHIPSET_SIZE: IVec2 = IVec2::new(480, 256);
	pub const CHIPSET_TRANSPARENT_TILE: IVec2 = IVec2::new(296, 135);

	pub fn of(bounds: &Rectangle) -> Self {
		if bounds.size() == Self::CHIPSET_SIZE {
			Canvas::Chipset
		} else {
			Canvas::Other
		}
	}

	/// Where the transparency color is read from, relative to `bounds.min`.
	pub fn transparentPoint(self) -> IVec2 {
		match self {
			Canvas::Chipset => Self::CHIPSET_TRANSPARENT_TILE,
			Canvas::Other => IVec2::ZERO,
		}
	}
}

pub fn transparencyColor(image: &SourceImage) -> Rgba16 {
	image.at(image.bounds.min + Canvas::of(&image.bounds).transparentPoint())
}

/// Builds an Rm2k-compatible palette by visiting every pixel once.
///
/// The transparency color goes first, the rest follow in discovery order. Colors are
/// deduplicated on their exact value but stored truncated to 8 bits per channel.
/// Fails with [`ConversionError::PaletteTooLarge`] carrying the full count when more than
/// [`MAX_PALETTE_LEN`] colors are found; otherwise pads up to [`MIN_PALETTE_LEN`].
pub fn buildPalette(image: &SourceImage) -> Result<Palette, ConversionError> {
	let (mut colors, mut seen) = (Vec::with_capacity(MAX_PALETTE_LEN), HashMap::<Rgba16, usize>::new());
	let mut insert = |color: Rgba16| {
		seen.entry(color).or_insert_with(|| {
			colors.push(truncate(color));
			colors.len() - 1
		});
	};
	insert(transparencyColor(image));
	for point in image.bounds.points() {
		insert(image.at(point));
	}
	if colors.len() > MAX_PALETTE_LEN {
		return Err(ConversionError::PaletteTooLarge { paletteLen: colors.len() });
	}
	if colors.len() < MIN_PALETTE_LEN {
		colors.resize(MIN_PALETTE_LEN, FULLY_TRANSPARENT);
	}
	Ok(Palette(colors))
}
