use {
	crate::{palette::Palette, RGBA_SIZE},
	glam::IVec2,
};

/// Exact color at source precision, each channel widened to 16 bits. Alpha is straight.
pub type Rgba16 = [u16; RGBA_SIZE];

pub type Rgba8 = [u8; RGBA_SIZE];

pub const FULLY_TRANSPARENT: Rgba8 = [0; RGBA_SIZE];

#[inline]
pub fn truncate(color: Rgba16) -> Rgba8 {
	color.map(|colorComponent| (colorComponent >> u8::BITS) as _)
}

#[inline]
pub fn widen(color: Rgba8) -> Rgba16 {
	color.map(|colorComponent| u16::from(colorComponent) * 0x101)
}

/// Color under alpha 0 is invisible, so every fully transparent pixel is the same color.
#[inline]
pub fn canonical(color: Rgba16) -> Rgba16 {
	match color {
		[.., 0] => [0; RGBA_SIZE],
		color => color,
	}
}

/// Half-open: `min` is inside, `max` is not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rectangle {
	pub min: IVec2,
	pub max: IVec2,
}

impl Rectangle {
	pub fn new(min: IVec2, max: IVec2) -> Self {
		Self { min, max }
	}

	pub fn fromSize(size: IVec2) -> Self {
		Self { min: IVec2::ZERO, max: size }
	}

	pub fn width(&self) -> i32 {
		(self.max.x - self.min.x).max(0)
	}

	pub fn height(&self) -> i32 {
		(self.max.y - self.min.y).max(0)
	}

	pub fn size(&self) -> IVec2 {
		IVec2::new(self.width(), self.height())
	}

	pub fn area(&self) -> usize {
		self.width() as usize * self.height() as usize
	}

	pub fn contains(&self, point: IVec2) -> bool {
		(self.min.x..self.max.x).contains(&point.x) && (self.min.y..self.max.y).contains(&point.y)
	}

	pub fn points(self) -> impl Iterator<Item = IVec2> {
		let Self { min, max } = self;
		(min.y..max.y).flat_map(move |y| (min.x..max.x).map(move |x| IVec2::new(x, y)))
	}

	fn offsetOf(&self, point: IVec2) -> Option<usize> {
		self.contains(point).then(|| {
			let Δ = point - self.min;
			Δ.y as usize * self.width() as usize + Δ.x as usize
		})
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pixels {
	TrueColor(Box<[Rgba16]>),
	Indexed { indices: Box<[u8]>, palette: Box<[Rgba8]> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
	pub bounds: Rectangle,
	pixels: Pixels,
}

impl SourceImage {
	pub fn fromFn(bounds: Rectangle, mut colorAt: impl FnMut(IVec2) -> Rgba16) -> Self {
		Self { bounds, pixels: Pixels::TrueColor(bounds.points().map(&mut colorAt).collect()) }
	}

	/// An index past the end of `palette` reads as transparent black.
	pub fn indexedFromFn(
		bounds: Rectangle,
		palette: Vec<Rgba8>,
		mut indexAt: impl FnMut(IVec2) -> u8,
	) -> Self {
		Self {
			bounds,
			pixels: Pixels::Indexed {
				indices: bounds.points().map(&mut indexAt).collect(),
				palette: palette.into_boxed_slice(),
			},
		}
	}

	/// `pixels` must hold exactly `bounds.area()` entries.
	pub(crate) fn fromParts(bounds: Rectangle, pixels: Pixels) -> Self {
		debug_assert_eq!(
			match &pixels {
				Pixels::TrueColor(colors) => colors.len(),
				Pixels::Indexed { indices, .. } => indices.len(),
			},
			bounds.area()
		);
		Self { bounds, pixels }
	}

	pub fn pixels(&self) -> &Pixels {
		&self.pixels
	}

	pub fn palette(&self) -> Option<&[Rgba8]> {
		match &self.pixels {
			Pixels::TrueColor(_) => None,
			Pixels::Indexed { palette, .. } => Some(&palette[..]),
		}
	}

	/// Outside the bounds every image is transparent black. Fully transparent colors come back
	/// as [`canonical`].
	pub fn at(&self, point: IVec2) -> Rgba16 {
		let Some(offset) = self.bounds.offsetOf(point) else {
			return widen(FULLY_TRANSPARENT);
		};
		canonical(match &self.pixels {
			Pixels::TrueColor(colors) => colors[offset],
			Pixels::Indexed { indices, palette } => {
				widen(palette.get(indices[offset] as usize).copied().unwrap_or(FULLY_TRANSPARENT))
			}
		})
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedImage {
	pub bounds: Rectangle,
	pub indices: Box<[u8]>,
	pub palette: Palette,
}

impl IndexedImage {
	pub fn indexAt(&self, point: IVec2) -> Option<u8> {
		self.bounds.offsetOf(point).map(|offset| self.indices[offset])
	}

	pub fn at(&self, point: IVec2) -> Rgba16 {
		canonical(widen(
			self.indexAt(point)
				.and_then(|index| self.palette.colors().get(index as usize).copied())
				.unwrap_or(FULLY_TRANSPARENT),
		))
	}
}
