// src/model.rs

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Identifier git reports for lines that are not committed yet
pub const UNCOMMITTED_ID: &str = "0000000000000000000000000000000000000000";

/// A unique commit that left at least one line in the annotated revision
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub id: String,
    /// Committer time in seconds since the epoch, 0 when unknown
    pub timestamp: i64,
    pub author: String,
    /// Accumulated verbatim from every `author-mail` field, may be empty
    pub author_mail: String,
    pub summary: String,
    /// The file's path as of this commit, so renames can be followed
    pub path: String,
}

impl Commit {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Author name, followed by the mail address when one is known
    pub fn author_display(&self) -> String {
        if self.author_mail.is_empty() {
            self.author.clone()
        } else {
            format!("{} {}", self.author, self.author_mail)
        }
    }

    pub fn is_uncommitted(&self) -> bool {
        self.id == UNCOMMITTED_ID
    }

    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

/// One line of file content along with who last touched it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineRecord {
    pub author: String,
    pub source: String,
    pub summary: String,
    pub timestamp: i64,
    /// Back-reference into `HistoryModel::changes`
    pub commit: Option<String>,
}

/// The annotated state of a single file at a single revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryModel {
    pub filename: PathBuf,
    /// File order, index is the 0-based line number
    pub lines: Vec<LineRecord>,
    /// Unique commits, ascending by timestamp
    pub changes: Vec<Commit>,
}

impl HistoryModel {
    pub fn commit(&self, id: &str) -> Option<&Commit> {
        self.changes.iter().find(|commit| commit.id == id)
    }

    pub fn commit_at(&self, index: usize) -> Option<&Commit> {
        self.changes.get(index)
    }

    /// Distinct timestamps of the lines, the input to heat mapping
    pub fn timestamps(&self) -> BTreeSet<i64> {
        self.lines.iter().map(|line| line.timestamp).collect()
    }

    /// Timestamps of the oldest and newest surviving commits
    pub fn time_span(&self) -> Option<(i64, i64)> {
        let first = self.changes.first()?;
        let last = self.changes.last()?;
        Some((first.timestamp, last.timestamp))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
