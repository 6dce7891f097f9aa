use {
	std::{
		fs, io,
		path::{Path, PathBuf},
	},
	walkdir::WalkDir,
};

pub const RUNTIME_SENTINEL: &str = "RPG_RT.exe";

pub const ASSET_FOLDERS: [&str; 14] = [
	// Rm2k
	"Battle",
	"Charset",
	"Chipset",
	"FaceSet",
	"Panorama",
	"Picture",
	"Monster",
	"System",
	// Rm2k3
	"Backdrop",
	"Battle2",
	"BattleCharSet",
	"BattleWeapon",
	"Frame",
	"System2",
];

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
	#[error("File or folder does not exist: {0:?}")]
	NotFound(PathBuf),

	#[error("Must be a folder: {0:?}")]
	NotAFolder(PathBuf),

	#[error("Unable to find RPG_RT in given folder: {0:?}")]
	MissingRuntime(PathBuf),

	#[error("Cannot get absolute path of {path:?}: {source}")]
	Canonicalize { path: PathBuf, source: io::Error },

	#[error("Cannot list {path:?}: {source}")]
	Walk { path: PathBuf, source: walkdir::Error },
}

#[derive(Clone, Debug)]
pub struct Project {
	pub root: PathBuf,
	pub assetFolders: Vec<PathBuf>,
}

impl Project {
	pub fn open(root: &Path, extraAssetFolders: &[String]) -> Result<Self, ProjectError> {
		let metadata = fs::metadata(root).map_err(|_| ProjectError::NotFound(root.to_owned()))?;
		if !metadata.is_dir() {
			return Err(ProjectError::NotAFolder(root.to_owned()));
		}
		let runtime = root.join(RUNTIME_SENTINEL);
		if !runtime.is_file() {
			return Err(ProjectError::MissingRuntime(runtime));
		}
		let root = root
			.canonicalize()
			.map_err(|source| ProjectError::Canonicalize { path: root.to_owned(), source })?;
		let assetFolders = ASSET_FOLDERS
			.iter()
			.copied()
			.chain(extraAssetFolders.iter().map(String::as_str))
			.map(|baseName| root.join(baseName))
			.filter(|path| path.is_dir())
			.collect();
		Ok(Self { root, assetFolders })
	}

	/// PNG files directly inside the asset folders. Subfolders are not visited, the runtime
	/// never looks into them either.
	pub fn pngFiles(&self) -> Result<Vec<PathBuf>, ProjectError> {
		let mut pngFiles = Vec::with_capacity(100);
		for assetFolder in &self.assetFolders {
			for entry in WalkDir::new(assetFolder).min_depth(1).max_depth(1).sort_by_file_name() {
				let entry =
					entry.map_err(|source| ProjectError::Walk { path: assetFolder.clone(), source })?;
				if entry.file_type().is_file() && isPng(entry.path()) {
					pngFiles.push(entry.into_path());
				}
			}
		}
		Ok(pngFiles)
	}
}

pub fn isPng(path: &Path) -> bool {
	path.extension().map_or(false, |extension| extension.eq_ignore_ascii_case("png"))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scratchDir(name: &str) -> PathBuf {
		let dir = std::env::temp_dir().join(format!("rm2kfix-project-{name}-{}", std::process::id()));
		_ = fs::remove_dir_all(&dir);
		fs::create_dir_all(&dir).unwrap();
		dir
	}

	#[test]
	fn recognizesPngExtension() {
		assert!(isPng(Path::new("Charset/hero.png")));
		assert!(isPng(Path::new("Charset/HERO.PNG")));
		assert!(!isPng(Path::new("Charset/hero.png.afterRm2kFix")));
		assert!(!isPng(Path::new("Charset/hero.bmp")));
		assert!(!isPng(Path::new("Charset/png")));
	}

	#[test]
	fn rejectsFolderWithoutRuntime() {
		let dir = scratchDir("noruntime");
		assert!(matches!(Project::open(&dir, &[]), Err(ProjectError::MissingRuntime(_))));
		assert!(matches!(
			Project::open(&dir.join("missing"), &[]),
			Err(ProjectError::NotFound(_))
		));
		fs::write(dir.join("file"), "").unwrap();
		assert!(matches!(Project::open(&dir.join("file"), &[]), Err(ProjectError::NotAFolder(_))));
		fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn listsExistingAssetFoldersAndTheirPngs() {
		let dir = scratchDir("assets");
		fs::write(dir.join(RUNTIME_SENTINEL), "").unwrap();
		for folder in ["Charset", "Chipset", "Title", "Music"] {
			fs::create_dir(dir.join(folder)).unwrap();
		}
		fs::create_dir(dir.join("Charset").join("old")).unwrap();
		for file in ["Charset/b.png", "Charset/a.PNG", "Charset/notes.txt", "Charset/old/c.png", "Title/t.png"] {
			fs::write(dir.join(file), "").unwrap();
		}

		let project = Project::open(&dir, &["Title".to_owned()]).unwrap();
		let root = dir.canonicalize().unwrap();
		assert_eq!(project.assetFolders, [root.join("Charset"), root.join("Chipset"), root.join("Title")]);
		assert_eq!(
			project.pngFiles().unwrap(),
			[root.join("Charset/a.PNG"), root.join("Charset/b.png"), root.join("Title/t.png")]
		);
		fs::remove_dir_all(&dir).unwrap();
	}
}
