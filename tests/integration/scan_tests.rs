use lazydupe::duplicates::{DuplicateFinder, FinderConfig};
use lazydupe::output::{open_report, ReportFormat};
use lazydupe::scanner::WalkerConfig;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

fn finder(min_size: u64) -> DuplicateFinder {
    DuplicateFinder::new(FinderConfig::default().with_min_size(min_size))
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let (registry, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(registry.is_empty());
    assert_eq!(summary.files_seen, 0);
    assert_eq!(summary.duplicate_count, 0);
    assert_eq!(summary.wasted_bytes, 0);
}

#[test]
fn test_three_identical_files_pair_second_and_third() {
    let dir = tempdir().unwrap();
    let content = vec![b'x'; 100];
    write(&dir.path().join("a.txt"), &content);
    write(&dir.path().join("b.txt"), &content);
    write(&dir.path().join("c.txt"), &content);

    let (registry, summary) = finder(1).find_duplicates(dir.path()).unwrap();

    assert_eq!(registry.len(), 1);
    let record = &registry.records()[0];
    assert_eq!(record.original_path, dir.path().join("b.txt"));
    assert_eq!(record.duplicate_path, dir.path().join("c.txt"));
    assert_eq!(record.byte_size, 100);
    assert_eq!(record.extension, ".txt");
    assert_eq!(summary.wasted_bytes, 100);
}

#[test]
fn test_two_identical_files_are_not_reported() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.bin"), b"identical content");
    write(&dir.path().join("b.bin"), b"identical content");

    let (registry, summary) = finder(1).find_duplicates(dir.path()).unwrap();

    assert!(registry.is_empty());
    assert_eq!(summary.wasted_bytes, 0);
    assert_eq!(summary.files_hashed, 1);
}

#[test]
fn test_retro_hash_reports_two_identical_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.bin"), b"identical content");
    write(&dir.path().join("b.bin"), b"identical content");

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_min_size(1)
            .with_retro_hash(true),
    );
    let (registry, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.records()[0].original_path, dir.path().join("a.bin"));
    assert_eq!(registry.records()[0].duplicate_path, dir.path().join("b.bin"));
    assert_eq!(summary.wasted_bytes, 17);
}

#[test]
fn test_retro_hash_three_copies_pair_with_first() {
    let dir = tempdir().unwrap();
    for name in ["a", "b", "c"] {
        write(&dir.path().join(name), b"same");
    }

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_min_size(1)
            .with_retro_hash(true),
    );
    let (registry, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(registry.len(), 2);
    for record in &registry {
        assert_eq!(record.original_path, dir.path().join("a"));
    }
    assert_eq!(summary.wasted_bytes, 8);
}

#[test]
fn test_below_threshold_files_are_ignored() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("small.dat"), &[0u8; 50]);
    write(&dir.path().join("medium.dat"), &vec![0u8; 9999]);

    let (registry, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(registry.is_empty());
    assert_eq!(summary.files_seen, 2);
    assert_eq!(summary.files_skipped, 2);
    assert_eq!(summary.files_examined, 0);
    assert_eq!(summary.distinct_sizes, 0);
}

#[test]
fn test_threshold_is_inclusive() {
    let dir = tempdir().unwrap();
    for name in ["a", "b", "c"] {
        write(&dir.path().join(name), &[7u8; 64]);
    }

    let (registry, _) = finder(64).find_duplicates(dir.path()).unwrap();
    assert_eq!(registry.len(), 1);

    let (registry, _) = finder(65).find_duplicates(dir.path()).unwrap();
    assert!(registry.is_empty());
}

#[test]
fn test_distinct_sizes_never_hashed() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("one"), b"1");
    write(&dir.path().join("two"), b"22");
    write(&dir.path().join("three"), b"333");

    let (registry, summary) = finder(1).find_duplicates(dir.path()).unwrap();

    assert!(registry.is_empty());
    assert_eq!(summary.files_hashed, 0);
    assert_eq!(summary.distinct_sizes, 3);
}

#[test]
fn test_same_size_different_content() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"aaaa");
    write(&dir.path().join("b"), b"bbbb");
    write(&dir.path().join("c"), b"cccc");

    let (registry, summary) = finder(1).find_duplicates(dir.path()).unwrap();

    assert!(registry.is_empty());
    assert_eq!(summary.files_hashed, 2);
    assert_eq!(summary.cached_hashes, 2);
}

#[test]
fn test_scan_nested_directories_in_walk_order() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();

    write(&dir.path().join("a.txt"), b"dup");
    write(&sub.join("b.txt"), b"dup");
    write(&sub.join("c.txt"), b"dup");
    write(&dir.path().join("z.txt"), b"dup");

    let (registry, summary) = finder(1).find_duplicates(dir.path()).unwrap();

    // Walk order: a.txt, sub/b.txt, sub/c.txt, z.txt
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.records()[0].original_path, sub.join("b.txt"));
    assert_eq!(registry.records()[0].duplicate_path, sub.join("c.txt"));
    assert_eq!(registry.records()[1].original_path, sub.join("b.txt"));
    assert_eq!(registry.records()[1].duplicate_path, dir.path().join("z.txt"));
    assert_eq!(registry.records()[1].sequence_number, 2);
    assert_eq!(summary.wasted_bytes, 6);
}

#[test]
fn test_rescan_is_idempotent() {
    let dir = tempdir().unwrap();
    for (name, content) in [
        ("a", &b"xx"[..]),
        ("b", b"xx"),
        ("c", b"xx"),
        ("d", b"yyy"),
        ("e", b"yyy"),
        ("f", b"yyy"),
        ("g", b"yyy"),
    ] {
        write(&dir.path().join(name), content);
    }

    let finder = finder(1);
    let (first, first_summary) = finder.find_duplicates(dir.path()).unwrap();
    let (second, second_summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(first.records(), second.records());
    assert_eq!(first_summary.wasted_bytes, second_summary.wasted_bytes);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_skip_hidden_excludes_dot_entries() {
    let dir = tempdir().unwrap();
    let hidden = dir.path().join(".cache");
    fs::create_dir(&hidden).unwrap();
    write(&dir.path().join("a"), b"same");
    write(&hidden.join("b"), b"same");
    write(&dir.path().join(".c"), b"same");
    write(&dir.path().join("d"), b"same");

    let all = finder(1).find_duplicates(dir.path()).unwrap().0;
    assert_eq!(all.len(), 2);

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_min_size(1)
            .with_walker_config(WalkerConfig::new(true)),
    );
    let (visible, summary) = finder.find_duplicates(dir.path()).unwrap();
    assert!(visible.is_empty());
    assert_eq!(summary.files_seen, 2);
}

#[test]
fn test_empty_files_with_zero_threshold() {
    let dir = tempdir().unwrap();
    for name in ["a", "b", "c"] {
        File::create(dir.path().join(name)).unwrap();
    }

    let (registry, summary) = finder(0).find_duplicates(dir.path()).unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(summary.wasted_bytes, 0);
}

#[test]
fn test_report_inside_root_is_not_scanned() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.log"), b"");
    write(&dir.path().join("zz.log"), b"");

    let report_path = dir.path().join("DuplicateReport.csv");
    let mut report = open_report(&report_path, ReportFormat::Csv).unwrap();
    let finder = finder(0).excluding(report_path.canonicalize().unwrap());

    let (registry, summary) = finder
        .find_duplicates_with_report(dir.path(), report.as_mut())
        .unwrap();

    // Only a.log and zz.log are walked; two copies alone never pair.
    assert_eq!(summary.files_seen, 2);
    assert!(registry.is_empty());
}
