use dupecull::duplicates::{
    build_duplicate_sets, group_by_digest, index_files, DuplicateFinder, FinderConfig,
    GrouperConfig,
};
use dupecull::scanner::{
    Digest, FileHasher, HashAlgorithm, HashError, Hasher, ScanError, WalkerConfig,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

/// Hasher that counts and records every file it reads.
#[derive(Default)]
struct CountingHasher {
    inner: Hasher,
    reads: AtomicUsize,
    paths: Mutex<Vec<PathBuf>>,
}

impl FileHasher for CountingHasher {
    fn digest(&self, path: &Path) -> Result<Digest, HashError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.paths.lock().unwrap().push(path.to_path_buf());
        self.inner.digest(path)
    }
}

/// Files A, B, C of 10 bytes (A and B identical) and D of 20 bytes.
fn abcd_tree() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("A"), b"xxxxxxxxxx").unwrap();
    fs::write(dir.path().join("B"), b"xxxxxxxxxx").unwrap();
    fs::write(dir.path().join("C"), b"yyyyyyyyyy").unwrap();
    fs::write(dir.path().join("D"), b"zzzzzzzzzzzzzzzzzzzz").unwrap();
    dir
}

#[test]
fn test_abcd_example() {
    let dir = abcd_tree();
    let index = index_files(dir.path(), &WalkerConfig::default(), None).unwrap();

    assert_eq!(index.get(10).unwrap().len(), 3);
    assert_eq!(index.get(20).unwrap().len(), 1);

    let hasher = CountingHasher::default();
    let (hashed, stats) = group_by_digest(&index, &hasher, &GrouperConfig::default()).unwrap();

    assert_eq!(hasher.reads.load(Ordering::SeqCst), 3);
    assert!(!hasher
        .paths
        .lock()
        .unwrap()
        .contains(&dir.path().join("D")));
    assert_eq!(stats.unique_size_files, 1);
    assert_eq!(hashed.get(10).unwrap().len(), 2);

    let sets = build_duplicate_sets(hashed);
    assert_eq!(sets.len(), 1);
    let groups = sets.get(10).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].paths(),
        vec![dir.path().join("A"), dir.path().join("B")]
    );
}

#[test]
fn test_index_respects_suffix_and_size() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("deep/er")).unwrap();
    fs::write(dir.path().join("one.jpg"), b"12345").unwrap();
    fs::write(dir.path().join("deep/two.jpg"), b"123").unwrap();
    fs::write(dir.path().join("deep/er/three.jpeg"), b"1").unwrap();
    fs::write(dir.path().join("deep/er/photojpg"), b"12").unwrap();

    let index = index_files(dir.path(), &WalkerConfig::with_extension("jpg"), None).unwrap();

    assert_eq!(index.total_files(), 3);
    for (size, files) in index.iter() {
        for file in files {
            assert!(file.path.to_string_lossy().ends_with("jpg"));
            assert_eq!(fs::metadata(&file.path).unwrap().len(), size);
        }
    }
    assert!(index.get(1).is_none());
}

#[test]
fn test_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let index = finder.index(dir.path()).unwrap();
    let sets = finder.find_duplicates(&index).unwrap();

    assert!(index.is_empty());
    assert!(sets.is_empty());
}

#[test]
fn test_empty_files_are_duplicates_of_each_other() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("e1"), b"").unwrap();
    fs::write(dir.path().join("e2"), b"").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let index = finder.index(dir.path()).unwrap();
    let sets = finder.find_duplicates(&index).unwrap();

    let groups = sets.get(0).unwrap();
    assert_eq!(groups[0].len(), 2);
    assert_eq!(
        groups[0].digest.to_hex(),
        "d41d8cd98f00b204e9800998ecf8427e"
    );
}

#[test]
fn test_blake3_groups_the_same_files_as_md5() {
    let dir = abcd_tree();
    let md5 = DuplicateFinder::new(FinderConfig::default());
    let blake3 = DuplicateFinder::new(FinderConfig::default().with_algorithm(HashAlgorithm::Blake3));

    let index = md5.index(dir.path()).unwrap();
    let a = md5.find_duplicates(&index).unwrap();
    let b = blake3.find_duplicates(&index).unwrap();

    assert_eq!(a.set_count(), b.set_count());
    assert_eq!(a.get(10).unwrap()[0].paths(), b.get(10).unwrap()[0].paths());
    assert_eq!(b.get(10).unwrap()[0].digest.as_bytes().len(), 32);
}

#[test]
fn test_repeated_runs_give_identical_grouping() {
    let dir = abcd_tree();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/A2"), b"xxxxxxxxxx").unwrap();
    fs::write(dir.path().join("sub/C2"), b"yyyyyyyyyy").unwrap();

    let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(3));
    let first = finder.find_duplicates(&finder.index(dir.path()).unwrap()).unwrap();
    let second = finder.find_duplicates(&finder.index(dir.path()).unwrap()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.set_count(), 2);
    assert_eq!(first.file_count(), 5);
}

#[test]
fn test_missing_root_is_a_scan_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("not-here");

    let err = index_files(&missing, &WalkerConfig::default(), None).unwrap_err();
    assert!(matches!(err, ScanError::NotFound(_)));
}

#[test]
#[cfg(unix)]
fn test_unreadable_entry_beneath_root_aborts_index() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"content").unwrap();
    let dangling = dir.path().join("dangling");
    std::os::unix::fs::symlink(dir.path().join("nowhere"), &dangling).unwrap();

    let follow = WalkerConfig::default().with_follow_symlinks(true);
    match index_files(dir.path(), &follow, None) {
        Err(ScanError::NotFound(path)) => assert_eq!(path, dangling),
        other => panic!("expected NotFound for {}, got {other:?}", dangling.display()),
    }

    let index = index_files(dir.path(), &WalkerConfig::default(), None).unwrap();
    assert_eq!(index.total_files(), 1);
}

#[test]
fn test_finder_with_custom_hasher_reads_only_candidates() {
    let dir = abcd_tree();
    let hasher = Arc::new(CountingHasher::default());
    let finder = DuplicateFinder::with_hasher(FinderConfig::default(), hasher.clone());

    let index = finder.index(dir.path()).unwrap();
    let sets = finder.find_duplicates(&index).unwrap();

    assert_eq!(hasher.reads.load(Ordering::SeqCst), 3);
    assert!(!hasher.paths.lock().unwrap().contains(&dir.path().join("D")));
    assert_eq!(sets.set_count(), 1);
    assert_eq!(sets.file_count(), 2);
}

#[test]
fn test_file_removed_before_hashing_aborts() {
    let dir = abcd_tree();
    let index = index_files(dir.path(), &WalkerConfig::default(), None).unwrap();
    fs::remove_file(dir.path().join("B")).unwrap();

    let hasher = Hasher::new(HashAlgorithm::Md5);
    let err = group_by_digest(&index, &hasher, &GrouperConfig::default()).unwrap_err();
    assert_eq!(err.path(), dir.path().join("B"));
}
