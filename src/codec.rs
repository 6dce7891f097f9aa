use {
	crate::{
		image::{IndexedImage, Pixels, Rectangle, Rgba16, Rgba8, SourceImage},
		DecodeError, RGBA_SIZE, RGB_SIZE,
	},
	byteorder::{ByteOrder, BE},
	core::iter,
	glam::IVec2,
	png::{BitDepth, ColorType, Transformations},
	std::io::{Read, Write},
};

const OPAQUE_BLACK: Rgba8 = [0, 0, 0, u8::MAX];

/// Reads `bitDepth`-wide samples packed most significant bit first, as PNG scanlines store them.
fn samples(row: &[u8], bitDepth: u8, count: usize) -> impl Iterator<Item = u16> + '_ {
	let bitDepth = usize::from(bitDepth);
	(0..count).map(move |i| match bitDepth {
		16 => BE::read_u16(&row[i * 2..]),
		8 => u16::from(row[i]),
		_ => {
			let bitOffset = i * bitDepth;
			let shift = u8::BITS as usize - bitDepth - bitOffset % u8::BITS as usize;
			u16::from(row[bitOffset / u8::BITS as usize] >> shift) & ((1 << bitDepth) - 1)
		}
	})
}

/// Stretches a `bitDepth`-wide sample over the full 16-bit range. Exact for every PNG depth.
#[inline]
fn widenSample(sample: u16, bitDepth: u8) -> u16 {
	sample * (u16::MAX / ((1_u32 << bitDepth) - 1) as u16)
}

/// Indexed PNGs stay indexed; everything else becomes true-color [`Rgba16`] at source precision.
pub fn decode(reader: impl Read) -> Result<SourceImage, DecodeError> {
	let mut decoder = png::Decoder::new(reader);
	decoder.set_transformations(Transformations::IDENTITY);
	let png = &mut decoder.read_info()?;
	let mut data = vec![0; png.output_buffer_size()];
	let frame = png.next_frame(&mut data)?;
	let (width, height) = (frame.width, frame.height);
	let bounds = match (i32::try_from(width), i32::try_from(height)) {
		(Ok(width), Ok(height)) => Rectangle::fromSize(IVec2::new(width, height)),
		_ => return Err(DecodeError::Dimensions { width, height }),
	};
	let (colorType, bitDepth) = (frame.color_type, frame.bit_depth as u8);
	let info = png.info();
	let rows = data[..frame.buffer_size()].chunks_exact(frame.line_size).take(height as _);
	let samplesPerRow = width as usize * colorType.samples();

	if colorType == ColorType::Indexed {
		let mut palette: Vec<Rgba8> = info
			.palette
			.as_ref()
			.ok_or(DecodeError::MissingPalette)?
			.chunks_exact(RGB_SIZE)
			.map(|rgb| [rgb[0], rgb[1], rgb[2], u8::MAX])
			.collect();
		if let Some(trns) = &info.trns {
			for (color, &alpha) in palette.iter_mut().zip(trns.iter()) {
				color[3] = alpha;
			}
		}
		let mut indices = Vec::with_capacity(bounds.area());
		for row in rows {
			for index in samples(row, bitDepth, samplesPerRow) {
				let index = index as u8;
				// Indices past the end of PLTE read as opaque black, like most decoders do.
				if usize::from(index) >= palette.len() {
					palette.resize(usize::from(index) + 1, OPAQUE_BLACK);
				}
				indices.push(index);
			}
		}
		return Ok(SourceImage::fromParts(
			bounds,
			Pixels::Indexed { indices: indices.into_boxed_slice(), palette: palette.into_boxed_slice() },
		));
	}

	let colorKey: Option<Vec<u16>> = info.trns.as_ref().and_then(|trns| match colorType {
		ColorType::Grayscale | ColorType::Rgb => Some(trns.chunks_exact(2).map(BE::read_u16).collect()),
		_ => None,
	});
	let mut colors = Vec::<Rgba16>::with_capacity(bounds.area());
	for row in rows {
		let rowSamples: Vec<u16> = samples(row, bitDepth, samplesPerRow).collect();
		for pixel in rowSamples.chunks_exact(colorType.samples()) {
			let mut widened = [0; RGBA_SIZE];
			for (widened, &sample) in iter::zip(&mut widened, pixel) {
				*widened = widenSample(sample, bitDepth);
			}
			let [red, green, blue, alpha] = match (pixel.len(), widened) {
				(1, [gray, ..]) => [gray, gray, gray, u16::MAX],
				(2, [gray, alpha, ..]) => [gray, gray, gray, alpha],
				(3, [red, green, blue, _]) => [red, green, blue, u16::MAX],
				(_, rgba) => rgba,
			};
			let isKeyedOut = colorKey.as_deref() == Some(pixel);
			colors.push([red, green, blue, if isKeyedOut { 0 } else { alpha }]);
		}
	}
	Ok(SourceImage::fromParts(bounds, Pixels::TrueColor(colors.into_boxed_slice())))
}

pub fn encode(image: &IndexedImage, writer: impl Write) -> Result<(), png::EncodingError> {
	let mut png = png::Encoder::new(writer, image.bounds.width() as _, image.bounds.height() as _);
	png.set_color(ColorType::Indexed);
	png.set_depth(BitDepth::Eight);
	png.set_palette(image.palette.toPLTE());
	if let Some(trns) = image.palette.toTRNS() {
		png.set_trns(trns);
	}
	let mut writer = png.write_header()?;
	writer.write_image_data(&image.indices)?;
	writer.finish()
}

pub fn encodeToVec(image: &IndexedImage) -> Result<Vec<u8>, png::EncodingError> {
	let mut bytes = Vec::new();
	encode(image, &mut bytes)?;
	Ok(bytes)
}
