use folder_organizer::organizer::{
    FolderMover, FolderOutcome, FsMover, OrganizeError, Organizer, organize,
};
use folder_organizer::{FilterConfig, FolderFilter};
/// Integration tests for folder-organizer
///
/// These tests build real directory trees in temporary directories and run
/// the organizer over them end to end.
///
/// Test categories:
/// 1. Basic organization
/// 2. Idempotence and pre-existing buckets
/// 3. Failure isolation
/// 4. Filtering and dry runs
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A temporary root directory with helpers for building folder trees.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn create_dir(&self, rel_path: &str) {
        fs::create_dir_all(self.path().join(rel_path)).expect("Failed to create directory");
    }

    fn create_dirs(&self, names: &[&str]) {
        for name in names {
            self.create_dir(name);
        }
    }

    fn create_text_file(&self, rel_path: &str, content: &str) {
        fs::write(self.path().join(rel_path), content).expect("Failed to write file");
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_dir(), "Directory should exist: {}", path.display());
    }

    fn assert_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "Path should not exist: {}", path.display());
    }

    /// Sorted names of the root's immediate subdirectories.
    fn top_level_dirs(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path())
            .expect("Failed to read directory")
            .flatten()
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    /// Every path under the root, relative and sorted.
    fn snapshot(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        Self::walk(self.path(), self.path(), &mut paths);
        paths.sort();
        paths
    }

    fn walk(root: &Path, dir: &Path, paths: &mut Vec<PathBuf>) {
        for entry in fs::read_dir(dir).expect("Failed to read directory").flatten() {
            let path = entry.path();
            paths.push(path.strip_prefix(root).unwrap().to_path_buf());
            if path.is_dir() {
                Self::walk(root, &path, paths);
            }
        }
    }
}

/// Fails with `PermissionDenied` for one folder name, renames the rest.
struct DenyOneMover {
    denied: &'static str,
}

impl FolderMover for DenyOneMover {
    fn move_folder(&self, source: &Path, destination: &Path) -> io::Result<()> {
        if source.file_name().is_some_and(|name| name == self.denied) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "access is denied",
            ));
        }
        FsMover.move_folder(source, destination)
    }
}

// ============================================================================
// Test Suite 1: Basic Organization
// ============================================================================

#[test]
fn test_organize_empty_directory() {
    let fixture = TestFixture::new();

    let report = organize(fixture.path()).expect("Should succeed on empty directory");

    assert_eq!(report.processed(), 0);
    assert_eq!(
        fixture.top_level_dirs(),
        vec!["A-E", "F-J", "K-O", "P-T", "U-Z"],
        "All five buckets are created, Other is not"
    );
}

#[test]
fn test_organize_mixed_names() {
    let fixture = TestFixture::new();
    fixture.create_dirs(&["Apple", "Zebra", "7-Eleven", "banana"]);

    let report = organize(fixture.path()).unwrap();

    assert_eq!(report.processed(), 4);
    assert_eq!(report.succeeded(), 4);
    assert!(report.failures().is_empty());

    fixture.assert_dir_exists("A-E/Apple");
    fixture.assert_dir_exists("A-E/banana");
    fixture.assert_dir_exists("U-Z/Zebra");
    fixture.assert_dir_exists("Other/7-Eleven");
    fixture.assert_not_exists("Apple");
    fixture.assert_not_exists("7-Eleven");
}

#[test]
fn test_organize_every_bucket() {
    let fixture = TestFixture::new();
    fixture.create_dirs(&[
        "echo", "Foxtrot", "juliet", "Kilo", "oscar", "Papa", "tango", "Uniform", "zulu",
    ]);

    organize(fixture.path()).unwrap();

    for path in [
        "A-E/echo",
        "F-J/Foxtrot",
        "F-J/juliet",
        "K-O/Kilo",
        "K-O/oscar",
        "P-T/Papa",
        "P-T/tango",
        "U-Z/Uniform",
        "U-Z/zulu",
    ] {
        fixture.assert_dir_exists(path);
    }
}

#[test]
fn test_symbols_and_digits_go_to_other() {
    let fixture = TestFixture::new();
    fixture.create_dirs(&["2024", "_private", "#tag", "(old)", "~backup"]);

    let report = organize(fixture.path()).unwrap();

    assert_eq!(report.succeeded(), 5);
    assert_eq!(report.bucket_counts(), vec![("Other", 5)]);
    for name in ["2024", "_private", "#tag", "(old)", "~backup"] {
        fixture.assert_dir_exists(&format!("Other/{}", name));
    }
}

#[test]
fn test_subtree_moves_with_folder() {
    let fixture = TestFixture::new();
    fixture.create_dir("Music/Albums/Live");
    fixture.create_text_file("Music/Albums/Live/track.txt", "la la");
    fixture.create_text_file("Music/readme.md", "notes");

    organize(fixture.path()).unwrap();

    let moved = fixture.path().join("K-O/Music");
    assert_eq!(
        fs::read_to_string(moved.join("Albums/Live/track.txt")).unwrap(),
        "la la"
    );
    assert_eq!(fs::read_to_string(moved.join("readme.md")).unwrap(), "notes");
}

#[test]
fn test_files_in_root_are_left_alone() {
    let fixture = TestFixture::new();
    fixture.create_text_file("apple.txt", "not a folder");
    fixture.create_dir("Apple");

    let report = organize(fixture.path()).unwrap();

    assert_eq!(report.processed(), 1);
    assert!(fixture.path().join("apple.txt").is_file());
    fixture.assert_dir_exists("A-E/Apple");
}

#[test]
fn test_report_paths_are_absolute() {
    let fixture = TestFixture::new();
    fixture.create_dir("Delta");

    let report = organize(fixture.path()).unwrap();

    assert!(report.root.is_absolute());
    match &report.outcomes[0] {
        FolderOutcome::Moved {
            source,
            destination,
            bucket,
        } => {
            assert!(source.is_absolute());
            assert_eq!(destination, &report.root.join("A-E").join("Delta"));
            assert_eq!(bucket, "A-E");
        }
        other => panic!("expected a move, got {:?}", other),
    }
}

// ============================================================================
// Test Suite 2: Idempotence and Pre-existing Buckets
// ============================================================================

#[test]
fn test_second_run_changes_nothing() {
    let fixture = TestFixture::new();
    fixture.create_dirs(&["Apple", "Zebra", "7-Eleven", "banana", "Quince"]);

    organize(fixture.path()).unwrap();
    let after_first = fixture.snapshot();

    let report = organize(fixture.path()).unwrap();
    assert_eq!(report.processed(), 0, "Bucket directories are never candidates");
    assert_eq!(fixture.snapshot(), after_first);
}

#[test]
fn test_existing_buckets_are_reused() {
    let fixture = TestFixture::new();
    fixture.create_dirs(&["A-E/Earlier", "U-Z"]);
    fixture.create_text_file("A-E/Earlier/keep.txt", "keep");
    fixture.create_dir("Cherry");

    let report = organize(fixture.path()).unwrap();

    assert_eq!(report.processed(), 1);
    assert!(report.failures().is_empty());
    fixture.assert_dir_exists("A-E/Cherry");
    assert_eq!(
        fs::read_to_string(fixture.path().join("A-E/Earlier/keep.txt")).unwrap(),
        "keep"
    );
}

#[test]
fn test_new_folders_after_first_run_are_picked_up() {
    let fixture = TestFixture::new();
    fixture.create_dirs(&["Apple", "9lives"]);
    organize(fixture.path()).unwrap();

    fixture.create_dirs(&["Grape", "0day"]);
    let report = organize(fixture.path()).unwrap();

    assert_eq!(report.processed(), 2);
    fixture.assert_dir_exists("F-J/Grape");
    fixture.assert_dir_exists("Other/0day");
    fixture.assert_dir_exists("Other/9lives");
}

#[test]
fn test_lowercase_bucket_name_is_a_candidate() {
    let fixture = TestFixture::new();
    fixture.create_dir("other");

    organize(fixture.path()).unwrap();

    fixture.assert_dir_exists("K-O/other");
}

// ============================================================================
// Test Suite 3: Failure Isolation
// ============================================================================

#[test]
fn test_failed_move_does_not_stop_run() {
    let fixture = TestFixture::new();
    fixture.create_dirs(&["Apple", "Mango", "Zebra", "42"]);

    let report = Organizer::new()
        .with_mover(DenyOneMover { denied: "Mango" })
        .run(fixture.path())
        .unwrap();

    assert_eq!(report.processed(), 4);
    assert_eq!(report.succeeded(), 3);

    let failures = report.failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].0.ends_with("Mango"));
    assert!(failures[0].1.contains("access is denied"));

    fixture.assert_dir_exists("Mango");
    fixture.assert_dir_exists("A-E/Apple");
    fixture.assert_dir_exists("U-Z/Zebra");
    fixture.assert_dir_exists("Other/42");
}

#[test]
fn test_failed_folder_is_retried_on_next_run() {
    let fixture = TestFixture::new();
    fixture.create_dirs(&["Mango"]);

    let report = Organizer::new()
        .with_mover(DenyOneMover { denied: "Mango" })
        .run(fixture.path())
        .unwrap();
    assert_eq!(report.failures().len(), 1);

    let report = organize(fixture.path()).unwrap();
    assert_eq!(report.succeeded(), 1);
    fixture.assert_dir_exists("K-O/Mango");
}

#[test]
fn test_collision_leaves_both_folders_intact() {
    let fixture = TestFixture::new();
    fixture.create_dirs(&["P-T/Pear", "Pear"]);
    fixture.create_text_file("P-T/Pear/old.txt", "old");
    fixture.create_text_file("Pear/new.txt", "new");

    let report = organize(fixture.path()).unwrap();

    assert_eq!(report.failures().len(), 1);
    assert!(fixture.path().join("P-T/Pear/old.txt").is_file());
    assert!(fixture.path().join("Pear/new.txt").is_file());
    assert!(!fixture.path().join("P-T/Pear/new.txt").exists());
}

#[test]
fn test_missing_root_is_fatal() {
    let fixture = TestFixture::new();
    let missing = fixture.path().join("does-not-exist");

    let result = organize(&missing);

    assert!(matches!(result, Err(OrganizeError::InvalidRoot { .. })));
}

#[test]
fn test_bucket_blocked_by_file_is_fatal() {
    let fixture = TestFixture::new();
    fixture.create_text_file("K-O", "a file where a bucket should be");
    fixture.create_dir("Apple");

    let result = organize(fixture.path());

    match result {
        Err(OrganizeError::BucketCreationFailed { path, .. }) => assert!(path.ends_with("K-O")),
        other => panic!("expected bucket creation failure, got {:?}", other),
    }
    fixture.assert_dir_exists("Apple");
}

#[test]
fn test_unavailable_other_dir_fails_only_that_folder() {
    let fixture = TestFixture::new();
    fixture.create_text_file("Other", "a file where the catch-all should be");
    fixture.create_dirs(&["7up", "Apple"]);

    let report = organize(fixture.path()).unwrap();

    assert_eq!(report.processed(), 2);
    assert_eq!(report.succeeded(), 1);

    let failures = report.failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].0.ends_with("7up"));
    assert!(failures[0].1.contains("could not create Other directory"));

    fixture.assert_dir_exists("7up");
    fixture.assert_dir_exists("A-E/Apple");
    assert_eq!(
        fs::read_to_string(fixture.path().join("Other")).unwrap(),
        "a file where the catch-all should be"
    );
}

#[cfg(unix)]
#[test]
fn test_non_utf8_name_is_skipped() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fixture = TestFixture::new();
    let odd = fixture.path().join(OsStr::from_bytes(b"caf\xe9"));
    fs::create_dir(&odd).unwrap();
    fixture.create_dir("Apple");

    let report = organize(fixture.path()).unwrap();

    assert_eq!(report.processed(), 2);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.skipped().len(), 1);
    assert!(report.failures().is_empty());
    assert!(odd.is_dir());
    fixture.assert_dir_exists("A-E/Apple");
}

// ============================================================================
// Test Suite 4: Filtering and Dry Runs
// ============================================================================

#[test]
fn test_filter_excludes_folders() {
    let fixture = TestFixture::new();
    fixture.create_dirs(&[".git", "node_modules", "Apple"]);
    fixture.create_text_file(
        "filters.toml",
        r#"
[filters]
include_hidden = false

[filters.exclude]
names = ["node_modules"]
"#,
    );

    let config_path = fixture.path().join("filters.toml");
    let filter: FolderFilter = FilterConfig::load(Some(&config_path), fixture.path())
        .unwrap()
        .compile()
        .unwrap();
    let report = Organizer::new().with_filter(filter).run(fixture.path()).unwrap();

    assert_eq!(report.processed(), 1);
    fixture.assert_dir_exists(".git");
    fixture.assert_dir_exists("node_modules");
    fixture.assert_dir_exists("A-E/Apple");
}

#[test]
fn test_hidden_folders_are_organized_by_default() {
    let fixture = TestFixture::new();
    fixture.create_dir(".cache");

    organize(fixture.path()).unwrap();

    fixture.assert_dir_exists("Other/.cache");
}

#[test]
fn test_dry_run_reports_plan_without_changes() {
    let fixture = TestFixture::new();
    fixture.create_dirs(&["Apple", "Zebra", "7-Eleven"]);
    let before = fixture.snapshot();

    let report = Organizer::new().dry_run(true).run(fixture.path()).unwrap();

    assert_eq!(report.succeeded(), 3);
    assert_eq!(fixture.snapshot(), before);
    let planned: Vec<_> = report
        .outcomes
        .iter()
        .map(|o| match o {
            FolderOutcome::Planned { bucket, .. } => bucket.as_str(),
            other => panic!("expected a planned move, got {:?}", other),
        })
        .collect();
    assert_eq!(planned, vec!["Other", "A-E", "U-Z"]);
}

#[test]
fn test_progress_callback_sees_every_outcome() {
    let fixture = TestFixture::new();
    fixture.create_dirs(&["Apple", "Mango", "3d"]);

    let mut seen = Vec::new();
    let report = Organizer::new()
        .run_with_progress(fixture.path(), |outcome| {
            seen.push(outcome.path().to_path_buf());
        })
        .unwrap();

    let reported: Vec<_> = report.outcomes.iter().map(|o| o.path().to_path_buf()).collect();
    assert_eq!(seen, reported);
    assert_eq!(seen.len(), 3);
}
