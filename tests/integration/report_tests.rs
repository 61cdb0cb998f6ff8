use filetime::{set_file_mtime, FileTime};
use lazydupe::duplicates::{DuplicateFinder, FinderConfig};
use lazydupe::output::text::TEXT_HEADER;
use lazydupe::output::{format_mod_date, open_report, ReportFormat};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

const BIG: usize = 2 * 1_048_576 + 10;

/// Three identical 2 MB files with fixed modification times.
fn setup(dir: &Path) -> (SystemTime, SystemTime) {
    let content = vec![b'q'; BIG];
    for name in ["a.iso", "b.iso", "c.iso"] {
        fs::write(dir.join(name), &content).unwrap();
    }

    let b_time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_184_031_792);
    let c_time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_184_031_807);
    set_file_mtime(dir.join("b.iso"), FileTime::from_system_time(b_time)).unwrap();
    set_file_mtime(dir.join("c.iso"), FileTime::from_system_time(c_time)).unwrap();
    (b_time, c_time)
}

fn scan_to(root: &Path, report: &Path, format: ReportFormat) {
    let mut sink = open_report(report, format).unwrap();
    let finder = DuplicateFinder::new(FinderConfig::default());
    let (registry, summary) = finder
        .find_duplicates_with_report(root, sink.as_mut())
        .unwrap();
    assert_eq!(registry.len(), 1);
    assert!(!summary.report_degraded);
}

#[test]
fn test_text_report_matches_legacy_layout() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    let (b_time, c_time) = setup(data.path());
    let report = out.path().join("report.txt");

    scan_to(data.path(), &report, ReportFormat::Text);

    let text = fs::read_to_string(&report).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], TEXT_HEADER);
    assert_eq!(
        lines[1],
        format!(
            "Original, {}, 2 MB, {}",
            data.path().join("b.iso").display(),
            format_mod_date(b_time)
        )
    );
    assert_eq!(
        lines[2],
        format!(
            "Duplicate, {}, 2 MB, {}",
            data.path().join("c.iso").display(),
            format_mod_date(c_time)
        )
    );
}

#[test]
fn test_csv_report_rows() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    let (b_time, _) = setup(data.path());
    let report = out.path().join("report.csv");

    scan_to(data.path(), &report, ReportFormat::Csv);

    let mut reader = csv::Reader::from_path(&report).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["pair", "version", "path", "size_mb", "size", "modified"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][1], "Original");
    assert_eq!(&rows[0][2], data.path().join("b.iso").to_string_lossy());
    assert_eq!(&rows[0][3], "2");
    assert_eq!(&rows[0][4], BIG.to_string());
    assert_eq!(&rows[0][5], format_mod_date(b_time));
    assert_eq!(&rows[1][1], "Duplicate");
}

#[test]
fn test_json_report_document() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    setup(data.path());
    let report = out.path().join("report.json");

    scan_to(data.path(), &report, ReportFormat::Json);

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value["duplicates"].as_array().unwrap().len(), 1);
    assert_eq!(value["duplicates"][0]["size"], BIG as u64);
    assert_eq!(value["duplicates"][0]["hash"].as_str().unwrap().len(), 64);
    assert_eq!(value["summary"]["duplicates_found"], 1);
    assert_eq!(value["summary"]["wasted_mb"], 2);
    assert_eq!(value["summary"]["files_examined"], 3);
}

#[test]
fn test_empty_scan_still_creates_report() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    let report = out.path().join("report.txt");

    let mut sink = open_report(&report, ReportFormat::Text).unwrap();
    DuplicateFinder::with_defaults()
        .find_duplicates_with_report(data.path(), sink.as_mut())
        .unwrap();

    assert!(report.exists());
    assert!(fs::read_to_string(&report).unwrap().is_empty());
}
