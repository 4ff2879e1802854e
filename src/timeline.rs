// src/timeline.rs

use crate::annotator::Annotator;
use crate::error::Result;
use crate::model::{Commit, HistoryModel};
use crate::revisions::RevisionCache;
use std::path::Path;

/// Position of `changes[index]` between the oldest and newest change, in percent.
///
/// A history whose changes all share one timestamp has no span; every change
/// then sits at 100%.
pub fn percentage(changes: &[Commit], index: usize) -> Option<f64> {
    let start = changes.first()?.timestamp;
    let end = changes.last()?.timestamp;
    let timestamp = changes.get(index)?.timestamp;

    if end == start {
        return Some(100.0);
    }
    Some((timestamp - start) as f64 / (end - start) as f64 * 100.0)
}

/// Percentages of every change, oldest first
pub fn markers(changes: &[Commit]) -> Vec<f64> {
    (0..changes.len())
        .filter_map(|index| percentage(changes, index))
        .collect()
}

/// Index of the change closest to `target` percent. The first of equally
/// close changes wins.
pub fn nearest(changes: &[Commit], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for index in 0..changes.len() {
        let diff = (percentage(changes, index)? - target).abs();
        if best.map_or(true, |(_, min)| diff < min) {
            best = Some((index, diff));
        }
    }
    best.map(|(index, _)| index)
}

/// One file's viewing session: the working-tree model plus whatever
/// historical snapshots have been visited so far.
#[derive(Debug)]
pub struct Session {
    base: HistoryModel,
    cache: RevisionCache,
    index: usize,
    revision: Option<String>,
}

impl Session {
    pub fn open(file: &Path, annotator: Annotator) -> Result<Self> {
        let base = annotator.annotate(file, None)?;
        Ok(Self::new(base, annotator))
    }

    /// Starts at the newest change, showing `base`.
    pub fn new(base: HistoryModel, annotator: Annotator) -> Self {
        let index = base.changes.len().saturating_sub(1);
        Self {
            base,
            cache: RevisionCache::new(annotator),
            index,
            revision: None,
        }
    }

    pub fn base(&self) -> &HistoryModel {
        &self.base
    }

    pub fn cache(&self) -> &RevisionCache {
        &self.cache
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.base.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.changes.is_empty()
    }

    /// The model currently on display
    pub fn current(&self) -> &HistoryModel {
        self.revision
            .as_deref()
            .and_then(|id| self.cache.get(id))
            .unwrap_or(&self.base)
    }

    pub fn percentage(&self) -> Option<f64> {
        percentage(&self.base.changes, self.index)
    }

    pub fn markers(&self) -> Vec<f64> {
        markers(&self.base.changes)
    }

    /// Moves to `index`. Returns the new percentage, or `None` when `index`
    /// is outside the history. On failure the session stays where it was.
    pub fn jump(&mut self, index: usize) -> Result<Option<f64>> {
        if index >= self.len() {
            return Ok(None);
        }

        let model = self.cache.history_at(&self.base, index)?;
        let revision = if std::ptr::eq(model, &self.base) {
            None
        } else {
            self.base.commit_at(index).map(|commit| commit.id.clone())
        };

        tracing::debug!(from = self.index, to = index, "moved through history");
        self.index = index;
        self.revision = revision;
        Ok(self.percentage())
    }

    /// One change forward in time
    pub fn next(&mut self) -> Result<Option<f64>> {
        match self.index.checked_add(1) {
            Some(index) => self.jump(index),
            None => Ok(None),
        }
    }

    /// One change back in time
    pub fn prev(&mut self) -> Result<Option<f64>> {
        match self.index.checked_sub(1) {
            Some(index) => self.jump(index),
            None => Ok(None),
        }
    }

    /// Moves by `delta` changes, clamped to the history.
    pub fn step(&mut self, delta: i64) -> Result<Option<f64>> {
        if self.is_empty() || delta == 0 {
            return Ok(None);
        }
        let last = (self.len() - 1) as i64;
        let target = (self.index as i64 + delta).clamp(0, last) as usize;
        if target == self.index {
            return Ok(None);
        }
        self.jump(target)
    }

    /// Jumps to the change nearest `target` percent. Returns `None` if that is
    /// where the session already is.
    pub fn seek(&mut self, target: f64) -> Result<Option<f64>> {
        match nearest(&self.base.changes, target) {
            Some(index) if index != self.index => self.jump(index),
            _ => Ok(None),
        }
    }
}
