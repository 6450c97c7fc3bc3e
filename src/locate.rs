use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

pub const METADATA_DIR: &str = ".git";

/// Path to a repository's `.git` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoMarker {
    git_dir: PathBuf,
}

impl RepoMarker {
    pub fn new(git_dir: impl Into<PathBuf>) -> Self {
        Self {
            git_dir: git_dir.into(),
        }
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// The repository's working directory, i.e. the parent of `.git`.
    pub fn work_dir(&self) -> &Path {
        self.git_dir.parent().unwrap_or(&self.git_dir)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    NoneFound,
    /// Non-empty, sorted by full path string.
    Found(Vec<RepoMarker>),
}

impl Discovery {
    pub fn markers(&self) -> &[RepoMarker] {
        match self {
            Discovery::NoneFound => &[],
            Discovery::Found(markers) => markers,
        }
    }
}

fn is_metadata_name(name: Option<&OsStr>) -> bool {
    name == Some(OsStr::new(METADATA_DIR))
}

fn inside_metadata_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0 && is_metadata_name(entry.path().parent().and_then(Path::file_name))
}

pub fn locate_repos(root: &Path) -> Discovery {
    let mut markers: Vec<RepoMarker> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !inside_metadata_dir(e))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("skipping unreadable entry under {}: {}", root.display(), e);
                None
            }
        })
        // `is_dir` follows links, so a `.git` symlink to a directory counts.
        .filter(|e| is_metadata_name(Some(e.file_name())) && e.path().is_dir())
        .map(|e| RepoMarker::new(e.into_path()))
        .collect();

    markers.sort_by_cached_key(|m| m.git_dir.to_string_lossy().into_owned());
    debug!(root = %root.display(), count = markers.len(), "located repositories");

    if markers.is_empty() {
        Discovery::NoneFound
    } else {
        Discovery::Found(markers)
    }
}
