use {
	crate::{
		fileswap::FixError,
		fixer::{fixFile, Outcome, RetryPolicy},
		project::{isPng, Project},
	},
	notify::{
		event::{CreateKind, ModifyKind},
		Event, EventKind, RecursiveMode, Watcher,
	},
	std::{
		path::{Path, PathBuf},
		sync::mpsc,
	},
};

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
	#[error("Unable to start file watcher: {0}")]
	Start(#[source] notify::Error),

	#[error("Unable to watch {path:?} folder: {source}")]
	Watch { path: PathBuf, source: notify::Error },

	#[error("file watcher stopped")]
	Disconnected,

	#[error("Failed to convert changed file: {path:?}\ninternal error: {source}")]
	Fix { path: PathBuf, source: FixError },
}

/// Created or rewritten `.png` files in `events`, first occurrence order, no duplicates.
pub fn changedPngs(events: impl IntoIterator<Item = Event>) -> Vec<PathBuf> {
	let mut changed = Vec::<PathBuf>::new();
	for event in events {
		if !matches!(
			event.kind,
			EventKind::Create(CreateKind::File | CreateKind::Any)
				| EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any)
		) {
			continue;
		}
		for path in event.paths {
			if isPng(&path) && !changed.contains(&path) {
				changed.push(path);
			}
		}
	}
	changed
}

pub const CONVERTED_FILE_TEXT: &str = "Converted file to 8-bit PNG:";

fn report(path: &Path, outcome: Outcome) {
	match outcome {
		Outcome::Converted { retries } => {
			log::info!("{CONVERTED_FILE_TEXT} {}", path.display());
			if retries > 0 {
				log::debug!("(retries taken: {retries})");
			}
		}
		Outcome::AlreadyCompatible => {}
		Outcome::Skipped(err @ FixError::Conversion(_)) => {
			log::warn!("Failed to convert changed file: {}, error: {err}", path.display());
		}
		Outcome::Skipped(err) => {
			log::warn!("Was unable to fix file: {}, error: {err}", path.display());
		}
	}
}

/// Blocks forever, converting `.png` files in the asset folders as they change.
///
/// Returns only when the watcher dies or a file hits an internal conversion defect.
pub fn watch(project: &Project, policy: RetryPolicy) -> Result<(), WatchError> {
	let (sender, receiver) = mpsc::channel::<notify::Result<Event>>();
	let mut watcher = notify::recommended_watcher(sender).map_err(WatchError::Start)?;
	for assetFolder in &project.assetFolders {
		watcher
			.watch(assetFolder, RecursiveMode::NonRecursive)
			.map_err(|source| WatchError::Watch { path: assetFolder.clone(), source })?;
	}

	log::info!("Waiting for you to change files in asset folders:");
	for assetFolder in &project.assetFolders {
		log::info!("- {}", assetFolder.file_name().unwrap_or(assetFolder.as_os_str()).to_string_lossy());
	}

	loop {
		let first = receiver.recv().map_err(|_| WatchError::Disconnected)?;
		let mut events = Vec::new();
		for result in std::iter::once(first).chain(receiver.try_iter()) {
			match result {
				Ok(event) => events.push(event),
				Err(err) => log::warn!("Watcher error: {err}"),
			}
		}
		for path in changedPngs(events) {
			log::debug!("changed: {}", path.display());
			match fixFile(&path, policy) {
				Ok(outcome) => report(&path, outcome),
				Err(source) => return Err(WatchError::Fix { path, source }),
			}
		}
	}
}
