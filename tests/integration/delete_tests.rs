use dupecull::actions::{delete_ordinals, DeleteConfig, DeleteError};
use dupecull::duplicates::DuplicateFinder;
use dupecull::report::{NumberedList, Reporter, SortOrder};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Index, hash and number `root` the way a session does.
fn numbered_listing(root: &Path, order: SortOrder) -> NumberedList {
    let finder = DuplicateFinder::with_defaults();
    let index = finder.index(root).unwrap();
    let sets = finder.find_duplicates(&index).unwrap();

    let mut numbered = NumberedList::new();
    Reporter::new(false)
        .write_duplicate_listing(&mut Vec::new(), &sets, order, &mut numbered)
        .unwrap();
    numbered
}

#[test]
fn test_delete_by_ordinal_across_sizes() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("big1"), b"0123456789").unwrap();
    fs::write(dir.path().join("big2"), b"0123456789").unwrap();
    fs::write(dir.path().join("small1"), b"ab").unwrap();
    fs::write(dir.path().join("small2"), b"ab").unwrap();

    let numbered = numbered_listing(dir.path(), SortOrder::Descending);
    assert_eq!(numbered.len(), 4);

    let result = delete_ordinals(&numbered, &[2, 4], &DeleteConfig::default()).unwrap();

    assert_eq!(result.bytes_freed, 12);
    assert!(dir.path().join("big1").exists());
    assert!(!dir.path().join("big2").exists());
    assert!(dir.path().join("small1").exists());
    assert!(!dir.path().join("small2").exists());
}

#[test]
fn test_ordinals_follow_sort_order() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("big1"), b"0123456789").unwrap();
    fs::write(dir.path().join("big2"), b"0123456789").unwrap();
    fs::write(dir.path().join("small1"), b"ab").unwrap();
    fs::write(dir.path().join("small2"), b"ab").unwrap();

    let numbered = numbered_listing(dir.path(), SortOrder::Ascending);
    let result = delete_ordinals(&numbered, &[1], &DeleteConfig::default()).unwrap();

    assert_eq!(result.bytes_freed, 2);
    assert!(!dir.path().join("small1").exists());
}

#[test]
fn test_deleting_every_copy_is_allowed() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"dup").unwrap();
    fs::write(dir.path().join("b"), b"dup").unwrap();

    let numbered = numbered_listing(dir.path(), SortOrder::Descending);
    let result = delete_ordinals(&numbered, &[1, 2], &DeleteConfig::default()).unwrap();

    assert_eq!(result.success_count(), 2);
    assert_eq!(result.bytes_freed, 6);
}

#[test]
fn test_second_request_for_deleted_file_fails_softly() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"dup").unwrap();
    fs::write(dir.path().join("b"), b"dup").unwrap();

    let numbered = numbered_listing(dir.path(), SortOrder::Descending);
    delete_ordinals(&numbered, &[1], &DeleteConfig::default()).unwrap();
    let again = delete_ordinals(&numbered, &[1], &DeleteConfig::default()).unwrap();

    assert_eq!(again.bytes_freed, 0);
    assert_eq!(again.failure_count(), 1);

    let strict = DeleteConfig::default().with_continue_on_error(false);
    let err = delete_ordinals(&numbered, &[1], &strict).unwrap_err();
    assert!(matches!(err, DeleteError::NotFound(_)));
}

#[test]
#[cfg(unix)]
fn test_permission_denied_is_recorded_and_batch_continues() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("a"), b"dup").unwrap();
    fs::write(dir.path().join("b"), b"dup").unwrap();

    let numbered = numbered_listing(dir.path(), SortOrder::Descending);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    // Root ignores directory permissions, so only check when removal is refused
    let probe = fs::write(locked.join("probe"), b"");
    if probe.is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let ordinals: Vec<usize> = (1..=numbered.len()).collect();
    let result = delete_ordinals(&numbered, &ordinals, &DeleteConfig::default()).unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    assert_eq!(result.failure_count(), 1);
    assert_eq!(result.success_count(), 1);
    assert!(!dir.path().join("b").exists());
}
