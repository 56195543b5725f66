use archive_uploader::engine::{
    extension_predicate, has_any_suffix, normalize_extensions, path_relative_to, path_to_file_id,
};
use archive_uploader::{UploadError, UploadOpts};
use std::path::PathBuf;

// --- path_relative_to ---

#[test]
fn test_path_relative_under_base() {
    let base = PathBuf::from("/foo/bar");
    let path = PathBuf::from("/foo/bar/baz/qux.pdf");
    assert_eq!(
        path_relative_to(&path, &base),
        Some(PathBuf::from("baz/qux.pdf"))
    );
}

#[test]
fn test_path_relative_not_under_base() {
    let base = PathBuf::from("/foo/bar");
    let path = PathBuf::from("/other/qux.pdf");
    assert_eq!(path_relative_to(&path, &base), None);
}

#[test]
fn test_path_relative_path_equals_base() {
    let base = PathBuf::from("/foo/bar");
    let path = PathBuf::from("/foo/bar");
    assert_eq!(path_relative_to(&path, &base), Some(PathBuf::new()));
}

// --- path_to_file_id (components joined with `/`) ---

#[test]
fn test_path_to_file_id_forward_slashes() {
    assert_eq!(
        path_to_file_id(&PathBuf::from("fold1/fold2/four.pdf")).as_deref(),
        Some("fold1/fold2/four.pdf")
    );
}

#[test]
fn test_path_to_file_id_built_from_components() {
    let rel: PathBuf = ["fold1", "fold2", "four.pdf"].iter().collect();
    assert_eq!(
        path_to_file_id(&rel).as_deref(),
        Some("fold1/fold2/four.pdf")
    );
}

#[cfg(unix)]
#[test]
fn test_path_to_file_id_keeps_backslash_in_unix_name() {
    assert_eq!(
        path_to_file_id(&PathBuf::from("fold1/a\\b.pdf")).as_deref(),
        Some("fold1/a\\b.pdf")
    );
}

#[cfg(windows)]
#[test]
fn test_path_to_file_id_maps_windows_separator() {
    assert_eq!(
        path_to_file_id(&PathBuf::from("fold1\\four.pdf")).as_deref(),
        Some("fold1/four.pdf")
    );
}

#[cfg(unix)]
#[test]
fn test_path_to_file_id_rejects_non_utf8() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let rel = PathBuf::from(OsStr::from_bytes(b"bad\xff.pdf"));
    assert_eq!(path_to_file_id(&rel), None);
}

// --- has_any_suffix / extension_predicate ---

#[test]
fn test_has_any_suffix_plain_suffix_match() {
    let exts = vec!["pdf".to_string(), ".csv".to_string()];
    assert!(has_any_suffix("one.pdf", &exts));
    assert!(has_any_suffix("a/b/two.csv", &exts));
    // no dot required before a dotless suffix
    assert!(has_any_suffix("reportpdf", &exts));
    assert!(!has_any_suffix("reportcsv", &exts));
}

#[test]
fn test_has_any_suffix_case_sensitive() {
    let exts = vec!["pdf".to_string()];
    assert!(!has_any_suffix("ONE.PDF", &exts));
    assert!(!has_any_suffix("one.pdf.bak", &exts));
}

#[test]
fn test_extension_predicate_empty_matches_nothing() {
    let include = extension_predicate(&[]);
    assert!(!include("one.pdf"));
    assert!(!include(""));
}

#[test]
fn test_extension_predicate_matches_any() {
    let include = extension_predicate(&["pdf".to_string(), "txt".to_string()]);
    assert!(include("one.pdf"));
    assert!(include("dir/notes.txt"));
    assert!(!include("image.png"));
}

// --- normalize_extensions ---

#[test]
fn test_normalize_extensions_splits_and_trims() {
    assert_eq!(
        normalize_extensions(["pdf, csv", " txt ", ",,"]),
        vec!["pdf", "csv", "txt"]
    );
}

#[test]
fn test_normalize_extensions_empty() {
    assert!(normalize_extensions(Vec::<String>::new()).is_empty());
    assert!(normalize_extensions([" ", ""]).is_empty());
}

// --- UploadOpts ---

#[test]
fn test_upload_opts_defaults() {
    let opts = UploadOpts::new("/data");
    assert_eq!(opts.root_dir, PathBuf::from("/data"));
    assert_eq!(opts.workers, 10);
    assert_eq!(opts.queue_capacity, 100);
    assert!(!opts.recursive);
    assert!(opts.include_extensions.is_empty());
    opts.validate().unwrap();
}

#[test]
fn test_upload_opts_validate_rejects_zero() {
    let mut opts = UploadOpts::new("/data");
    opts.workers = 0;
    assert!(matches!(opts.validate(), Err(UploadError::InvalidConfig(_))));

    let mut opts = UploadOpts::new("/data");
    opts.queue_capacity = 0;
    assert!(matches!(opts.validate(), Err(UploadError::InvalidConfig(_))));
}

// --- UploadError ---

#[test]
fn test_upload_error_subject_and_message() {
    let err = UploadError::Open {
        id: "one.pdf".to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
    };
    assert_eq!(err.subject().as_deref(), Some("one.pdf"));
    assert!(err.to_string().contains("one.pdf"));

    let err = UploadError::InvalidConfig("bad".into());
    assert_eq!(err.subject(), None);
}
