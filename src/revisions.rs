// src/revisions.rs

use crate::annotator::Annotator;
use crate::error::{Error, Result};
use crate::model::HistoryModel;
use crate::repo::RepoLocation;
use std::collections::HashMap;
use std::path::PathBuf;

/// Path to annotate for commit `id`, as recorded by the next more recent snapshot.
///
/// Porcelain output names the file as it was called in the commit that
/// introduced each line, so a successor that still carries lines from `id`
/// knows the name the file had back then, even across a rename.
pub fn resolve_path(successor: &HistoryModel, id: &str) -> Result<PathBuf> {
    let commit = successor
        .commit(id)
        .ok_or_else(|| Error::UnknownCommit(id.to_string()))?;

    if commit.path.is_empty() {
        return Err(Error::UnknownCommit(format!("{} has no recorded filename", id)));
    }
    Ok(PathBuf::from(&commit.path))
}

/// Historical snapshots of one file, keyed by commit id.
///
/// Entries live as long as the viewing session and are never evicted.
#[derive(Debug)]
pub struct RevisionCache {
    annotator: Annotator,
    location: Option<RepoLocation>,
    models: HashMap<String, HistoryModel>,
}

impl RevisionCache {
    pub fn new(annotator: Annotator) -> Self {
        Self {
            annotator,
            location: None,
            models: HashMap::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&HistoryModel> {
        self.models.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.models.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub(crate) fn insert(&mut self, id: impl Into<String>, model: HistoryModel) {
        self.models.insert(id.into(), model);
    }

    /// The file as of `base.changes[index]`, annotating it on first request.
    ///
    /// Working-tree lines have no revision to annotate, so asking for them
    /// hands back `base` itself.
    pub fn history_at<'a>(&'a mut self, base: &'a HistoryModel, index: usize) -> Result<&'a HistoryModel> {
        let commit = base.commit_at(index).ok_or(Error::IndexOutOfRange {
            index,
            len: base.changes.len(),
        })?;

        if commit.is_uncommitted() {
            tracing::debug!(index, "uncommitted changes, using the working tree model");
            return Ok(base);
        }

        let id = commit.id.clone();
        if self.models.contains_key(&id) {
            tracing::debug!(%id, "revision cache hit");
        } else {
            tracing::debug!(%id, "revision cache miss");
            let relative = resolve_path(self.successor(base, index, &id), &id)?;
            let location = match &self.location {
                Some(location) => location.clone(),
                None => {
                    let location = RepoLocation::locate(&base.filename)?;
                    self.location = Some(location.clone());
                    location
                }
            };

            let model = self.annotator.annotate_in(&location, &relative, Some(&id))?;
            self.models.insert(id.clone(), model);
        }

        self.models
            .get(&id)
            .ok_or(Error::UnknownCommit(id))
    }

    /// The snapshot one step newer than `index` if it is cached and still
    /// knows `id`, otherwise the base model.
    fn successor<'a>(&'a self, base: &'a HistoryModel, index: usize, id: &str) -> &'a HistoryModel {
        base.commit_at(index + 1)
            .and_then(|next| self.models.get(&next.id))
            .filter(|model| model.commit(id).is_some())
            .unwrap_or(base)
    }
}
