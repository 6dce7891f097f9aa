use {
	crate::{codec, convert, ConversionError, IndexedImage},
	const_format::concatcp,
	core::fmt,
	std::{
		ffi::OsString,
		fs::{self, File},
		io::{self, BufWriter},
		path::{Path, PathBuf},
	},
};

const FIX_TAG: &str = "Rm2kFix";
pub const AFTER_SUFFIX: &str = concatcp!(".after", FIX_TAG);
pub const BEFORE_SUFFIX: &str = concatcp!(".before", FIX_TAG);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapStep {
	Create,
	Sync,
	Backup,
	Replace,
	RemoveBackup,
}

#[derive(Debug, thiserror::Error)]
pub enum FixError {
	#[error("{0}")]
	Open(#[source] io::Error),

	#[error(transparent)]
	Conversion(#[from] ConversionError),

	#[error("unable to encode PNG: {0}")]
	Encode(#[from] png::EncodingError),

	#[error("{step}: {source}")]
	Swap { step: SwapStep, source: io::Error },
}

impl fmt::Display for SwapStep {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			SwapStep::Create => "Unable to write converted file",
			SwapStep::Sync => "Unable to sync converted file",
			SwapStep::Backup => "Unable to backup original file",
			SwapStep::Replace => "Unable to replace original file",
			SwapStep::RemoveBackup => "Unable to remove original",
		})
	}
}

fn swap(step: SwapStep) -> impl FnOnce(io::Error) -> FixError {
	move |source| FixError::Swap { step, source }
}

fn withSuffix(path: &Path, suffix: &str) -> PathBuf {
	let mut path = OsString::from(path);
	path.push(suffix);
	path.into()
}

fn writeSynced(path: &Path, image: &IndexedImage) -> Result<(), FixError> {
	let mut file = BufWriter::new(File::create(path).map_err(swap(SwapStep::Create))?);
	codec::encode(image, &mut file)?;
	let file = file.into_inner().map_err(|err| swap(SwapStep::Create)(err.into_error()))?;
	// Make sure it is really on disk before the original goes away.
	file.sync_all().map_err(swap(SwapStep::Sync))
}

/// Converts the PNG at `path` and swaps the result in.
///
/// The new image is written to `<path>.afterRm2kFix` and synced, the original is moved to
/// `<path>.beforeRm2kFix`, the new file takes the original name, and the backup is deleted.
/// On any conversion error the file is left untouched.
pub fn convertFileInPlace(path: &Path) -> Result<(), FixError> {
	let sourceBytes = fs::read(path).map_err(FixError::Open)?;
	let converted = convert(sourceBytes.as_slice())?;
	drop(sourceBytes);

	let (afterPath, beforePath) = (withSuffix(path, AFTER_SUFFIX), withSuffix(path, BEFORE_SUFFIX));
	if let Err(err) = writeSynced(&afterPath, &converted) {
		_ = fs::remove_file(&afterPath);
		return Err(err);
	}
	swapIn(path, &afterPath, &beforePath)
}

/// Moves `afterPath` over `path`, keeping the original at `beforePath` until the new file is in
/// place. A failed backup or replace puts the original back under `path`.
fn swapIn(path: &Path, afterPath: &Path, beforePath: &Path) -> Result<(), FixError> {
	if let Err(source) = fs::rename(path, beforePath) {
		_ = fs::remove_file(afterPath);
		return Err(swap(SwapStep::Backup)(source));
	}
	if let Err(source) = fs::rename(afterPath, path) {
		_ = fs::rename(beforePath, path);
		_ = fs::remove_file(afterPath);
		return Err(swap(SwapStep::Replace)(source));
	}
	fs::remove_file(beforePath).map_err(swap(SwapStep::RemoveBackup))
}

#[cfg(test)]
mod tests {
	use {
		super::*,
		crate::{codec::decode, Rectangle, SourceImage},
		glam::IVec2,
		png::{BitDepth, ColorType},
	};

	fn scratchDir(name: &str) -> PathBuf {
		let dir = std::env::temp_dir().join(format!("rm2kfix-fileswap-{name}-{}", std::process::id()));
		_ = fs::remove_dir_all(&dir);
		fs::create_dir_all(&dir).unwrap();
		dir
	}

	fn writeRgbaPng(path: &Path, width: u32, height: u32, data: &[u8]) {
		let mut png = png::Encoder::new(File::create(path).unwrap(), width, height);
		png.set_color(ColorType::Rgba);
		png.set_depth(BitDepth::Eight);
		png.write_header().unwrap().write_image_data(data).unwrap();
	}

	#[test]
	fn suffixesAppendToFullName() {
		assert_eq!(withSuffix(Path::new("a/b.png"), AFTER_SUFFIX), Path::new("a/b.png.afterRm2kFix"));
		assert_eq!(BEFORE_SUFFIX, ".beforeRm2kFix");
	}

	#[test]
	fn replacesFileAndCleansUp() {
		let dir = scratchDir("replace");
		let path = dir.join("hero.png");
		writeRgbaPng(&path, 2, 1, &[0, 0, 0, 0, 200, 100, 50, 255]);
		let original = decode(File::open(&path).unwrap()).unwrap();

		convertFileInPlace(&path).unwrap();

		let replaced = decode(File::open(&path).unwrap()).unwrap();
		assert_eq!(replaced.palette().map(<[_]>::len), Some(17));
		for point in original.bounds.points() {
			assert_eq!(replaced.at(point), original.at(point));
		}
		let mut leftovers: Vec<_> = fs::read_dir(&dir).unwrap().map(|entry| entry.unwrap().file_name()).collect();
		leftovers.sort();
		assert_eq!(leftovers, ["hero.png"]);
		fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn leavesCompatibleFileAlone() {
		let dir = scratchDir("compatible");
		let path = dir.join("hero.png");
		let source = SourceImage::fromFn(Rectangle::fromSize(IVec2::new(3, 3)), |point| {
			[point.x as u16 * 0x101, 0, 0, u16::MAX]
		});
		fs::write(&path, codec::encodeToVec(&crate::convertImage(&source).unwrap()).unwrap()).unwrap();
		let before = fs::read(&path).unwrap();

		assert!(matches!(
			convertFileInPlace(&path),
			Err(FixError::Conversion(ConversionError::AlreadyCompatible { paletteLen: 17 }))
		));
		assert_eq!(fs::read(&path).unwrap(), before);
		fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn failedBackupDropsConvertedCopy() {
		let dir = scratchDir("backup");
		let path = dir.join("hero.png");
		let (afterPath, beforePath) = (withSuffix(&path, AFTER_SUFFIX), withSuffix(&path, BEFORE_SUFFIX));
		fs::write(&afterPath, "converted").unwrap();

		assert!(matches!(
			swapIn(&path, &afterPath, &beforePath),
			Err(FixError::Swap { step: SwapStep::Backup, .. })
		));
		assert!(fs::read_dir(&dir).unwrap().next().is_none());
		fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn failedReplaceRestoresOriginal() {
		let dir = scratchDir("restore");
		let path = dir.join("hero.png");
		let (afterPath, beforePath) = (withSuffix(&path, AFTER_SUFFIX), withSuffix(&path, BEFORE_SUFFIX));
		fs::write(&path, "original").unwrap();

		assert!(matches!(
			swapIn(&path, &afterPath, &beforePath),
			Err(FixError::Swap { step: SwapStep::Replace, .. })
		));
		assert_eq!(fs::read_to_string(&path).unwrap(), "original");
		assert!(!beforePath.exists());
		fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn missingFileIsAnOpenError() {
		assert!(matches!(
			convertFileInPlace(Path::new("/nonexistent/rm2kfix/hero.png")),
			Err(FixError::Open(_))
		));
	}
}
