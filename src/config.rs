use {
	crate::fixer::RetryPolicy,
	serde::{Deserialize, Serialize},
	std::{
		fs, io,
		path::{Path, PathBuf},
		time::Duration,
	},
};

pub const CONFIG_FILENAME: &str = "rm2kfix.toml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Extra attempts for a file an editor is still writing.
	pub retries: u32,
	pub retryDelayMs: u64,
	pub extraAssetFolders: Vec<String>,
}

impl Default for Config {
	fn default() -> Self {
		// Saving from MS Paint on Windows held the file for ~3 retries, Pinta on macOS left it
		// half-written for ~5, both at 10ms.
		Self { retries: 10, retryDelayMs: 10, extraAssetFolders: Vec::new() }
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("unable to read {path:?}: {source}")]
	Read { path: PathBuf, source: io::Error },

	#[error("invalid {path:?}: {source}")]
	Parse { path: PathBuf, source: toml::de::Error },
}

impl Config {
	pub fn load(projectRoot: &Path) -> Result<Self, ConfigError> {
		let path = projectRoot.join(CONFIG_FILENAME);
		let text = match fs::read_to_string(&path) {
			Ok(text) => text,
			Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
			Err(source) => return Err(ConfigError::Read { path, source }),
		};
		toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
	}

	pub fn retryPolicy(&self) -> RetryPolicy {
		RetryPolicy { retries: self.retries, delay: self.retryDelay() }
	}

	pub fn retryDelay(&self) -> Duration {
		Duration::from_millis(self.retryDelayMs)
	}
}
