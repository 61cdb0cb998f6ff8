use lazydupe::duplicates::{DuplicateFinder, DuplicateRecord, FinderConfig, ScanSummary};
use lazydupe::output::{ReportError, ReportSink};
use lazydupe::scanner::ScanError;
use std::fs;
use tempfile::tempdir;

fn finder() -> DuplicateFinder {
    DuplicateFinder::new(FinderConfig::default().with_min_size(1))
}

/// True when running as root, where permission bits are not enforced.
#[cfg(unix)]
fn permissions_enforced(probe: &std::path::Path) -> bool {
    fs::File::open(probe).is_err()
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped_and_scan_continues() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    for name in ["a", "b", "c", "d"] {
        fs::write(dir.path().join(name), b"same bytes").unwrap();
    }
    let locked = dir.path().join("b");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if !permissions_enforced(&locked) {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        eprintln!("Skipping permission test: running with elevated privileges");
        return;
    }

    let (registry, summary) = finder().find_duplicates(dir.path()).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    // a: first of size, b: hash fails, c: reference, d: duplicate of c
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.records()[0].original_path, dir.path().join("c"));
    assert_eq!(registry.records()[0].duplicate_path, dir.path().join("d"));
    assert_eq!(summary.scan_errors.len(), 1);
    assert!(matches!(summary.scan_errors[0], ScanError::Hash(_)));
    assert!(summary.is_partial());
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_is_reported() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let sub = dir.path().join("locked");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("inner"), b"x").unwrap();
    for name in ["a", "b", "c"] {
        fs::write(dir.path().join(name), b"visible").unwrap();
    }
    fs::set_permissions(&sub, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read_dir(&sub).is_ok() {
        fs::set_permissions(&sub, fs::Permissions::from_mode(0o755)).unwrap();
        eprintln!("Skipping permission test: running with elevated privileges");
        return;
    }

    let result = finder().find_duplicates(dir.path());
    fs::set_permissions(&sub, fs::Permissions::from_mode(0o755)).unwrap();

    let (registry, summary) = result.unwrap();
    assert_eq!(registry.len(), 1);
    assert!(!summary.scan_errors.is_empty());
}

struct FailingSink {
    attempts: usize,
}

impl ReportSink for FailingSink {
    fn write_record(&mut self, _record: &DuplicateRecord) -> Result<(), ReportError> {
        self.attempts += 1;
        Err(ReportError::Io(std::io::Error::other("device full")))
    }

    fn finish(&mut self, _summary: &ScanSummary) -> Result<(), ReportError> {
        Ok(())
    }
}

#[test]
fn test_report_failure_does_not_stop_detection() {
    let dir = tempdir().unwrap();
    for name in ["a", "b", "c", "d", "e"] {
        fs::write(dir.path().join(name), b"content").unwrap();
    }

    let mut sink = FailingSink { attempts: 0 };
    let (registry, summary) = finder()
        .find_duplicates_with_report(dir.path(), &mut sink)
        .unwrap();

    assert_eq!(registry.len(), 3);
    assert_eq!(summary.duplicate_count, 3);
    assert!(summary.report_degraded);
    assert!(summary.is_partial());
    assert_eq!(sink.attempts, 1);
}
