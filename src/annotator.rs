// src/annotator.rs

use crate::config::AnnotateConfig;
use crate::error::{Error, Result};
use crate::model::*;
use crate::repo::RepoLocation;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::process::Command;

/// Runs `git annotate` in porcelain mode and turns its output into a `HistoryModel`.
#[derive(Debug, Clone)]
pub struct Annotator {
    git: PathBuf,
    ignore_whitespace: bool,
    diffstat: bool,
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new(&AnnotateConfig::default())
    }
}

impl Annotator {
    pub fn new(config: &AnnotateConfig) -> Self {
        Self {
            git: config.git.clone(),
            ignore_whitespace: config.ignore_whitespace,
            diffstat: config.diffstat,
        }
    }

    /// Annotates `file` as it is in the working tree, or as of `revision`.
    pub fn annotate(&self, file: &Path, revision: Option<&str>) -> Result<HistoryModel> {
        let location = RepoLocation::locate(file)?;
        self.annotate_in(&location, &location.relative, revision)
    }

    /// Annotates `relative` (a path under `location.root`) at `revision`, but
    /// records the model under `location.file`. This is how an older name of a
    /// renamed file is annotated.
    pub fn annotate_in(
        &self,
        location: &RepoLocation,
        relative: &Path,
        revision: Option<&str>,
    ) -> Result<HistoryModel> {
        let output = self.run(&location.root, relative, revision)?;
        let model = parse(location.file.clone(), &output);
        tracing::info!(
            file = %relative.display(),
            revision = revision.unwrap_or("HEAD"),
            lines = model.lines.len(),
            changes = model.changes.len(),
            "built history model"
        );
        Ok(model)
    }

    fn args<'a>(&self, relative: &'a Path, revision: Option<&'a str>) -> Vec<&'a OsStr> {
        let mut args = vec![OsStr::new("annotate"), OsStr::new("-p")];
        if self.ignore_whitespace {
            args.push(OsStr::new("-w"));
        }
        if self.diffstat {
            args.push(OsStr::new("--stat"));
        }
        if let Some(revision) = revision {
            args.push(OsStr::new(revision));
        }
        args.push(OsStr::new("--"));
        args.push(relative.as_os_str());
        args
    }

    fn run(&self, root: &Path, relative: &Path, revision: Option<&str>) -> Result<String> {
        let args = self.args(relative, revision);
        tracing::debug!(git = %self.git.display(), ?args, root = %root.display(), "running annotate");

        let output = Command::new(&self.git)
            .args(&args)
            .current_dir(root)
            .output()
            .map_err(|e| Error::AnnotationFailed(format!("failed to run {}: {}", self.git.display(), e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("{} exited with {}", self.git.display(), output.status)
            } else {
                stderr
            };
            tracing::warn!(%message, "annotate failed");
            return Err(Error::AnnotationFailed(message));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectingHeader,
    ExpectingFieldOrContent,
}

/// Parses porcelain annotate output.
///
/// Every record is a header (`<sha> <orig> <final> [<count>]`), a run of
/// `<key> <value>` fields, and a tab-prefixed content line. Fields are only
/// emitted the first time a commit appears, so commits are kept in an arena
/// keyed by sha and later records for the same sha resolve to the same entry.
pub fn parse(filename: impl Into<PathBuf>, output: &str) -> HistoryModel {
    let mut commits: Vec<Commit> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();
    let mut lines: Vec<LineRecord> = Vec::new();

    let mut state = State::ExpectingHeader;
    let mut current: Option<usize> = None;
    let blank = Commit::default();

    for output_line in output.trim_end().split('\n') {
        if output_line.is_empty() {
            continue;
        }

        if let Some(source) = output_line.strip_prefix('\t') {
            let commit = current.map_or(&blank, |index| &commits[index]);
            lines.push(LineRecord {
                author: commit.author_display(),
                source: source.to_string(),
                summary: commit.summary.clone(),
                timestamp: commit.timestamp,
                commit: current.map(|_| commit.id.clone()),
            });

            state = State::ExpectingHeader;
            current = None;
            continue;
        }

        let Some((key, value)) = output_line.split_once(' ') else {
            continue;
        };

        match state {
            State::ExpectingHeader => {
                let index = *by_id.entry(key.to_string()).or_insert_with(|| {
                    commits.push(Commit::new(key));
                    commits.len() - 1
                });
                current = Some(index);
                state = State::ExpectingFieldOrContent;
            }
            State::ExpectingFieldOrContent => {
                if let Some(index) = current {
                    apply_field(&mut commits[index], key, value);
                }
            }
        }
    }

    // Stable, so commits sharing a timestamp stay in order of first appearance
    commits.sort_by_key(|commit| commit.timestamp);

    HistoryModel {
        filename: filename.into(),
        lines,
        changes: commits,
    }
}

fn apply_field(commit: &mut Commit, key: &str, value: &str) {
    match key {
        "committer-time" => match value.trim().parse() {
            Ok(timestamp) => commit.timestamp = timestamp,
            Err(_) => tracing::debug!(commit = %commit.id, value, "unparseable committer-time"),
        },
        "author" => commit.author = value.to_string(),
        "author-mail" => commit.author_mail.push_str(value),
        "summary" => commit.summary = value.to_string(),
        "filename" => commit.path = native_path(value),
        _ => {}
    }
}

fn native_path(path: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        path.to_string()
    } else {
        path.replace('/', &MAIN_SEPARATOR.to_string())
    }
}
