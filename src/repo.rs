// src/repo.rs

use crate::error::{Error, Result};
use git2::Repository;
use std::path::{Path, PathBuf};

/// Where a file lives relative to the working tree that contains it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    pub root: PathBuf,
    pub file: PathBuf,
    pub relative: PathBuf,
}

impl RepoLocation {
    pub fn locate(file: &Path) -> Result<Self> {
        let file = file.canonicalize().map_err(|e| Error::RepositoryNotFound {
            path: file.to_path_buf(),
            message: e.to_string(),
        })?;
        let root = resolve_root(&file)?;
        let relative = relative_path(&file, &root)?;
        tracing::debug!(root = %root.display(), relative = %relative.display(), "located file");

        Ok(Self { root, file, relative })
    }
}

/// Finds the top of the working tree enclosing `file`, searching upward from its directory.
pub fn resolve_root(file: &Path) -> Result<PathBuf> {
    let dir = file.parent().unwrap_or(file);
    let not_found = |message: String| Error::RepositoryNotFound {
        path: file.to_path_buf(),
        message,
    };

    let repo = Repository::discover(dir).map_err(|e| not_found(e.message().to_string()))?;
    let workdir = repo
        .workdir()
        .ok_or_else(|| not_found("repository has no working tree".to_string()))?;

    Ok(workdir.canonicalize()?)
}

/// Strips `root` from the front of `file`.
pub fn relative_path(file: &Path, root: &Path) -> Result<PathBuf> {
    match file.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => Ok(relative.to_path_buf()),
        _ => Err(Error::InvalidPath {
            path: file.to_path_buf(),
            root: root.to_path_buf(),
        }),
    }
}
