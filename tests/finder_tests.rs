//! Finder tests: directory walking, filtering and queue closing.

mod common;

use archive_uploader::engine::tools::extension_predicate;
use archive_uploader::pipeline::{DirFinder, FileSource, NoopObserver, Scope};
use archive_uploader::{FileId, FoundFile, UploadError, UploadOpts};
use common::create_test_files;
use crossbeam_channel::{RecvTimeoutError, bounded, unbounded};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn finder(root: &Path, recursive: bool, extensions: &[&str]) -> DirFinder {
    let exts: Vec<String> = extensions.iter().map(|e| e.to_string()).collect();
    DirFinder::new(
        root,
        recursive,
        extension_predicate(&exts),
        Arc::new(NoopObserver),
    )
}

/// Run the finder to completion on an unbounded queue and return the sorted ids.
fn collect(finder: &DirFinder) -> Result<Vec<FileId>, UploadError> {
    let (tx, rx) = unbounded();
    finder.run(&Scope::root(), tx)?;
    let mut ids = Vec::new();
    for file in rx.iter() {
        assert!(file.path.starts_with(finder.root()), "{file:?}");
        assert!(file.path.is_file(), "{file:?}");
        ids.push(file.id);
    }
    ids.sort();
    Ok(ids)
}

#[test]
fn test_finder_recursive_lists_nested_files() {
    let dir = tempfile::tempdir().unwrap();
    create_test_files(
        dir.path(),
        &["one.pdf", "a/two.pdf", "a/b/three.pdf", "a/b/c/four.pdf"],
    );

    let ids = collect(&finder(dir.path(), true, &["pdf"])).unwrap();

    assert_eq!(
        ids,
        vec!["a/b/c/four.pdf", "a/b/three.pdf", "a/two.pdf", "one.pdf"]
    );
}

#[test]
fn test_finder_non_recursive_stays_at_top_level() {
    let dir = tempfile::tempdir().unwrap();
    create_test_files(dir.path(), &["one.pdf", "two.pdf", "a/three.pdf"]);

    let ids = collect(&finder(dir.path(), false, &["pdf"])).unwrap();

    assert_eq!(ids, vec!["one.pdf", "two.pdf"]);
}

#[test]
fn test_finder_applies_suffix_filter_exactly() {
    let dir = tempfile::tempdir().unwrap();
    create_test_files(
        dir.path(),
        &["keep.pdf", "skip.PDF", "skip.pdfx", "skip.txt", "alsokeep.csv", "notcsv"],
    );

    let ids = collect(&finder(dir.path(), true, &["pdf", ".csv"])).unwrap();

    assert_eq!(ids, vec!["alsokeep.csv", "keep.pdf"]);
}

#[test]
fn test_finder_directories_are_never_ids() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("folder.pdf/inner.pdf")).unwrap();
    create_test_files(dir.path(), &["folder.pdf/file.pdf"]);

    let ids = collect(&finder(dir.path(), true, &["pdf"])).unwrap();

    assert_eq!(ids, vec!["folder.pdf/file.pdf"]);
}

#[test]
fn test_finder_empty_extension_set_matches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    create_test_files(dir.path(), &["one.pdf", "two.txt"]);

    let ids = collect(&finder(dir.path(), true, &[])).unwrap();

    assert!(ids.is_empty());
}

#[test]
fn test_finder_runs_are_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    create_test_files(dir.path(), &["one.pdf", "a/two.pdf", "a/b/three.pdf"]);
    let f = finder(dir.path(), true, &["pdf"]);

    let first = collect(&f).unwrap();
    let second = collect(&f).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_finder_from_opts_uses_root_and_filter() {
    let dir = tempfile::tempdir().unwrap();
    create_test_files(dir.path(), &["one.pdf", "two.csv", "sub/three.pdf"]);
    let mut opts = UploadOpts::new(dir.path());
    opts.recursive = false;
    opts.include_extensions = vec!["pdf".into()];

    let f = DirFinder::from_opts(&opts, Arc::new(NoopObserver));

    assert_eq!(f.root(), dir.path());
    assert_eq!(collect(&f).unwrap(), vec!["one.pdf"]);
}

#[test]
fn test_finder_missing_root_is_listing_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    let err = collect(&finder(&missing, true, &["pdf"])).unwrap_err();

    match err {
        UploadError::Listing { dir, source } => {
            assert_eq!(dir, missing);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected listing error, got {other:?}"),
    }
}

#[test]
fn test_finder_root_must_be_directory() {
    let dir = tempfile::tempdir().unwrap();
    create_test_files(dir.path(), &["plain.pdf"]);
    let file = dir.path().join("plain.pdf");

    let err = collect(&finder(&file, true, &["pdf"])).unwrap_err();

    assert!(matches!(err, UploadError::Listing { dir, .. } if dir == file));
}

#[test]
fn test_finder_closes_queue_on_error() {
    let dir = tempfile::tempdir().unwrap();
    let (tx, rx) = unbounded::<FoundFile>();

    let result = finder(&dir.path().join("nope"), true, &["pdf"]).run(&Scope::root(), tx);

    assert!(result.is_err());
    assert!(rx.recv().is_err(), "queue must be closed after the finder returns");
}

#[test]
fn test_finder_canceled_scope_queues_nothing() {
    let dir = tempfile::tempdir().unwrap();
    create_test_files(dir.path(), &["one.pdf", "two.pdf", "a/three.pdf"]);
    let scope = Scope::root();
    scope.cancel();
    let (tx, rx) = unbounded::<FoundFile>();

    finder(dir.path(), true, &["pdf"]).run(&scope, tx).unwrap();

    assert_eq!(rx.iter().count(), 0);
}

#[test]
fn test_finder_blocked_on_full_queue_wakes_on_cancel() {
    let dir = tempfile::tempdir().unwrap();
    create_test_files(dir.path(), &["one.pdf", "two.pdf", "three.pdf", "four.pdf"]);
    let scope = Scope::root();
    let (tx, rx) = bounded::<FoundFile>(1);
    let f = finder(dir.path(), true, &["pdf"]);

    let worker_scope = scope.clone();
    let handle = thread::spawn(move || f.run(&worker_scope, tx));

    // first id fills the queue; the finder then blocks on the second send
    thread::sleep(Duration::from_millis(100));
    assert!(!handle.is_finished());
    scope.cancel();

    handle.join().unwrap().unwrap();
    assert_eq!(rx.iter().count(), 1);
    assert!(matches!(
        rx.recv_timeout(Duration::from_millis(10)),
        Err(RecvTimeoutError::Disconnected)
    ));
}

#[cfg(unix)]
#[test]
fn test_finder_backslash_is_part_of_the_name() {
    let dir = tempfile::tempdir().unwrap();
    create_test_files(dir.path(), &["a/b.pdf", "a\\b.pdf"]);
    let (tx, rx) = unbounded();

    finder(dir.path(), true, &["pdf"]).run(&Scope::root(), tx).unwrap();

    let mut found: Vec<FoundFile> = rx.iter().collect();
    found.sort_by(|x, y| x.id.cmp(&y.id));
    assert_eq!(
        found,
        vec![
            FoundFile::new("a/b.pdf", dir.path().join("a").join("b.pdf")),
            FoundFile::new("a\\b.pdf", dir.path().join("a\\b.pdf")),
        ]
    );
}

// some unix filesystems (APFS) refuse non-UTF-8 names
#[cfg(target_os = "linux")]
#[test]
fn test_finder_non_utf8_name_matching_filter_is_error() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join(OsStr::from_bytes(b"bad\xff.pdf"));
    std::fs::write(&bad, b"bytes").unwrap();

    let err = collect(&finder(dir.path(), true, &["pdf"])).unwrap_err();

    match err {
        UploadError::NonUtf8Path { path } => assert_eq!(path, bad),
        other => panic!("expected non-utf8 path error, got {other:?}"),
    }
}

// some unix filesystems (APFS) refuse non-UTF-8 names
#[cfg(target_os = "linux")]
#[test]
fn test_finder_non_utf8_name_outside_filter_is_skipped() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(OsStr::from_bytes(b"bad\xff.txt")), b"bytes").unwrap();
    create_test_files(dir.path(), &["one.pdf"]);

    let ids = collect(&finder(dir.path(), true, &["pdf"])).unwrap();

    assert_eq!(ids, vec!["one.pdf"]);
}
