//! Name-keyed index of the directories under a source tree.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories keyed by bare name, built once per generation run.
///
/// When two directories share a name the first one found in traversal order
/// (sorted by file name, parents before children) is kept and the others are
/// recorded as collisions so callers can report the ambiguity.
#[derive(Debug, Clone, Default)]
pub struct DirectoryIndex {
    base: PathBuf,
    dirs: IndexMap<String, PathBuf>,
    collisions: IndexMap<String, Vec<PathBuf>>,
}

impl DirectoryIndex {
    /// Build the index starting from any directory inside the source tree.
    ///
    /// Ascends from `hint` until the current directory's parent is named
    /// `marker` (`src`), or until `boundary` or the filesystem root is
    /// reached, then indexes every directory below that point.
    pub fn build(hint: &Path, marker: &str, boundary: &Path) -> Self {
        let base = Self::ascend(hint, marker, boundary);
        let mut index = DirectoryIndex {
            base: base.clone(),
            dirs: IndexMap::new(),
            collisions: IndexMap::new(),
        };

        for entry in WalkDir::new(&base)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e.path()) || e.depth() == 0)
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
        {
            index.insert(entry.path());
        }

        for (name, paths) in &index.collisions {
            tracing::warn!(
                "Directory name '{}' is ambiguous: using {}, ignoring {}",
                name,
                index.dirs.get(name).map(|p| p.display().to_string()).unwrap_or_default(),
                paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
            );
        }
        tracing::debug!("Indexed {} directories under {}", index.dirs.len(), index.base.display());

        index
    }

    fn ascend(hint: &Path, marker: &str, boundary: &Path) -> PathBuf {
        let mut current = hint.to_path_buf();
        while current != boundary {
            match current.parent() {
                Some(parent) if parent.file_name().map_or(false, |n| n == marker) => break,
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }
        current
    }

    /// Directory the index was built from
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Look up a directory by bare name
    pub fn find(&self, name: &str) -> Option<&Path> {
        self.dirs.get(name).map(PathBuf::as_path)
    }

    /// Register a directory. An already-indexed name keeps its first path.
    pub fn insert(&mut self, path: &Path) {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            return;
        };
        match self.dirs.get(&name) {
            Some(existing) if existing != path => {
                self.collisions.entry(name).or_default().push(path.to_path_buf());
            }
            Some(_) => {}
            None => {
                self.dirs.insert(name, path.to_path_buf());
            }
        }
    }

    /// Names found more than once, with the paths that lost
    pub fn collisions(&self) -> &IndexMap<String, Vec<PathBuf>> {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map_or(false, |n| n.to_string_lossy().starts_with('.'))
}
