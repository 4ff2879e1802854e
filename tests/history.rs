//! End-to-end tests against throw-away git repositories.
//!
//! Every test builds its repository with the `git` binary and fixed commit
//! dates, and quietly passes when no `git` is installed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use yellow_snow::repo::{resolve_root, RepoLocation};
use yellow_snow::{build_levels, Annotator, Error, RevisionCache, Session};

const T0: i64 = 1_000_000_000;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str], (name, timestamp): (&str, i64)) {
    let date = format!("{} +0000", timestamp);
    let email = format!("{}@example.com", name.to_lowercase());
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_CONFIG_GLOBAL", "/dev/null")
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_AUTHOR_NAME", name)
        .env("GIT_AUTHOR_EMAIL", &email)
        .env("GIT_AUTHOR_DATE", &date)
        .env("GIT_COMMITTER_NAME", name)
        .env("GIT_COMMITTER_EMAIL", &email)
        .env("GIT_COMMITTER_DATE", &date)
        .output()
        .expect("git should run");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

struct Repo {
    dir: TempDir,
}

impl Repo {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        git(dir.path(), &["init", "-q"], ("Nobody", T0));
        Self { dir }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn commit(&self, message: &str, who: (&str, i64)) {
        git(self.dir.path(), &["add", "-A"], who);
        git(self.dir.path(), &["commit", "-q", "-m", message], who);
    }

    fn run(&self, args: &[&str], who: (&str, i64)) {
        git(self.dir.path(), args, who);
    }
}

/// Alice writes three lines, Bob rewrites the middle one.
fn two_authors() -> Repo {
    let repo = Repo::new();
    repo.write("src/notes.txt", "alpha\nbeta\ngamma\n");
    repo.commit("Add notes", ("Alice", T0));
    repo.write("src/notes.txt", "alpha\nBETA\ngamma\n");
    repo.commit("Shout beta", ("Bob", T0 + 100));
    repo
}

#[test]
fn locates_the_repository_root() {
    if !git_available() {
        return;
    }
    let repo = two_authors();
    let location = RepoLocation::locate(&repo.path("src/notes.txt")).unwrap();

    assert_eq!(location.root, repo.dir.path().canonicalize().unwrap());
    assert_eq!(location.relative, PathBuf::from("src/notes.txt"));
    assert_eq!(resolve_root(&location.file).unwrap(), location.root);
}

#[test]
fn files_outside_a_repository_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("loose.txt");
    fs::write(&file, "hello\n").unwrap();

    let err = Annotator::default().annotate(&file, None).unwrap_err();
    // A temp dir nested inside some checkout would be found instead
    if !matches!(err, Error::RepositoryNotFound { .. }) {
        assert!(matches!(err, Error::AnnotationFailed(_)), "unexpected error: {}", err);
    }
}

#[test]
fn annotates_the_working_tree() {
    if !git_available() {
        return;
    }
    let repo = two_authors();
    let model = Annotator::default().annotate(&repo.path("src/notes.txt"), None).unwrap();

    let sources: Vec<&str> = model.lines.iter().map(|l| l.source.as_str()).collect();
    assert_eq!(sources, vec!["alpha", "BETA", "gamma"]);

    assert_eq!(model.lines[0].author, "Alice <alice@example.com>");
    assert_eq!(model.lines[0].timestamp, T0);
    assert_eq!(model.lines[0].summary, "Add notes");
    assert_eq!(model.lines[1].author, "Bob <bob@example.com>");
    assert_eq!(model.lines[1].timestamp, T0 + 100);

    assert_eq!(model.changes.len(), 2);
    assert_eq!(model.changes[0].author, "Alice");
    assert_eq!(model.changes[0].path, "src/notes.txt".replace('/', std::path::MAIN_SEPARATOR_STR));
    assert_eq!(model.changes[1].summary, "Shout beta");
    for line in &model.lines {
        let id = line.commit.as_deref().unwrap();
        assert_eq!(model.changes.iter().filter(|c| c.id == id).count(), 1);
    }

    let heat = build_levels(model.timestamps());
    assert_eq!(heat.level(T0), 0);
    assert_eq!(heat.level(T0 + 100), 255);
}

#[test]
fn annotating_twice_gives_the_same_model() {
    if !git_available() {
        return;
    }
    let repo = two_authors();
    let annotator = Annotator::default();
    let file = repo.path("src/notes.txt");
    assert_eq!(annotator.annotate(&file, None).unwrap(), annotator.annotate(&file, None).unwrap());
}

#[test]
fn obliterated_commits_are_not_listed() {
    if !git_available() {
        return;
    }
    let repo = Repo::new();
    repo.write("a.txt", "one\n");
    repo.commit("First", ("Alice", T0));
    repo.write("a.txt", "two\n");
    repo.commit("Second", ("Bob", T0 + 10));

    let model = Annotator::default().annotate(&repo.path("a.txt"), None).unwrap();
    assert_eq!(model.changes.len(), 1);
    assert_eq!(model.changes[0].summary, "Second");
}

#[test]
fn unknown_revisions_fail_annotation() {
    if !git_available() {
        return;
    }
    let repo = two_authors();
    let err = Annotator::default()
        .annotate(&repo.path("src/notes.txt"), Some("0123456789abcdef0123456789abcdef01234567"))
        .unwrap_err();
    assert!(matches!(err, Error::AnnotationFailed(_)));
}

#[test]
fn reconstructs_history_across_a_rename() {
    if !git_available() {
        return;
    }
    let repo = Repo::new();
    repo.write("old.txt", "first line\nsecond line\nthird line\n");
    repo.commit("Create", ("Alice", T0));
    repo.run(&["mv", "old.txt", "new.txt"], ("Alice", T0 + 100));
    repo.commit("Rename", ("Alice", T0 + 100));
    repo.write("new.txt", "first line\nsecond line\nthird line\nfourth line\n");
    repo.commit("Append", ("Bob", T0 + 200));

    let annotator = Annotator::default();
    let base = annotator.annotate(&repo.path("new.txt"), None).unwrap();
    assert_eq!(base.lines.len(), 4);
    assert_eq!(base.changes.len(), 2);
    assert_eq!(base.changes[0].path, "old.txt");
    assert_eq!(base.changes[1].path, "new.txt");

    let mut cache = RevisionCache::new(annotator);
    let oldest = cache.history_at(&base, 0).unwrap().clone();
    let sources: Vec<&str> = oldest.lines.iter().map(|l| l.source.as_str()).collect();
    assert_eq!(sources, vec!["first line", "second line", "third line"]);
    assert_eq!(oldest.changes.len(), 1);
    assert_eq!(oldest.filename, base.filename);

    let newest = cache.history_at(&base, 1).unwrap().clone();
    assert_eq!(newest.lines.len(), 4);
    assert_eq!(cache.len(), 2);

    // Revisiting is served from the cache
    assert_eq!(cache.history_at(&base, 0).unwrap(), &oldest);
    assert_eq!(cache.len(), 2);
}

#[test]
fn session_walks_back_and_forth() {
    if !git_available() {
        return;
    }
    let repo = Repo::new();
    repo.write("log.txt", "a\n");
    repo.commit("One", ("Alice", T0));
    repo.write("log.txt", "a\nb\n");
    repo.commit("Two", ("Bob", T0 + 500));
    repo.write("log.txt", "a\nb\nc\n");
    repo.commit("Three", ("Carol", T0 + 1000));

    yellow_snow::logging::init_test();
    let mut session = Session::open(&repo.path("log.txt"), Annotator::default()).unwrap();
    assert_eq!(session.len(), 3);
    assert_eq!(session.index(), 2);
    assert_eq!(session.markers(), vec![0.0, 50.0, 100.0]);
    assert_eq!(session.current().lines.len(), 3);

    assert_eq!(session.next().unwrap(), None);
    assert_eq!(session.prev().unwrap(), Some(50.0));
    assert_eq!(session.current().lines.len(), 2);

    assert_eq!(session.seek(0.0).unwrap(), Some(0.0));
    assert_eq!(session.current().lines.len(), 1);
    assert_eq!(session.current().lines[0].author, "Alice <alice@example.com>");
    assert_eq!(session.prev().unwrap(), None);

    assert_eq!(session.seek(100.0).unwrap(), Some(100.0));
    assert_eq!(session.index(), 2);
    assert_eq!(session.current().lines.len(), 3);
    assert_eq!(session.cache().len(), 3);
}
