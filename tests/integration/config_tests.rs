use clap::Parser;
use lazydupe::cli::{Cli, Commands};
use lazydupe::config::{Config, ConfigError};
use lazydupe::output::ReportFormat;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::tempdir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all LAZYDUPE_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("LAZYDUPE_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_config_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    fs::write(
        &config_path,
        r#"
min_size = "10KB"
report_path = "/var/tmp/dupes.csv"
report_format = "csv"
retro_hash = true
skip_hidden = true
"#,
    )
    .unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(config.min_size_bytes().unwrap(), 10_240);
    assert_eq!(config.report_path, Some(PathBuf::from("/var/tmp/dupes.csv")));
    assert_eq!(config.report_format, ReportFormat::Csv);
    assert!(config.retro_hash);
    assert!(config.skip_hidden);
}

#[test]
fn test_config_numeric_min_size_is_megabytes() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "min_size = 5").unwrap();

    let config = Config::load(Some(&config_path)).unwrap();
    assert_eq!(config.min_size_bytes().unwrap(), 5 * 1_048_576);
}

#[test]
fn test_config_missing_default_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();

    let config = Config::load_from_path(&temp_dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_invalid_size_is_fatal() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "min_size = \"huge\"").unwrap();

    let err = Config::load(Some(&config_path)).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidSize { .. }));
}

#[test]
fn test_config_malformed_toml_is_fatal() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "retro_hash = [not toml").unwrap();

    let err = Config::load(Some(&config_path)).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_config_hierarchy_file_env_cli() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    // 1. Config file overrides defaults
    fs::write(&config_path, "min_size = \"10KB\"\nreport_format = \"json\"").unwrap();

    // 2. Environment variables override config file
    std::env::set_var("LAZYDUPE_MIN_SIZE", "20KB");

    let mut config = Config::load(Some(&config_path)).unwrap();
    assert_eq!(config.min_size_bytes().unwrap(), 20_480);
    assert_eq!(config.report_format, ReportFormat::Json);

    // 3. CLI flags override environment variables
    let cli = Cli::try_parse_from(["lazydupe", "scan", ".", "--size", "30KB", "-f", "csv"]).unwrap();
    if let Commands::Scan(args) = &cli.command {
        config.merge_scan_args(args);
    }
    assert_eq!(config.min_size_bytes().unwrap(), 30_720);
    assert_eq!(config.report_format, ReportFormat::Csv);
    assert_eq!(config.resolved_report_path(), PathBuf::from("DuplicateReport.csv"));

    std::env::remove_var("LAZYDUPE_MIN_SIZE");
}

#[test]
fn test_cli_without_flags_keeps_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "retro_hash = true\nmin_size = \"1KB\"").unwrap();

    let mut config = Config::load(Some(&config_path)).unwrap();
    let cli = Cli::try_parse_from(["lazydupe", "scan", "."]).unwrap();
    if let Commands::Scan(args) = &cli.command {
        config.merge_scan_args(args);
    }

    assert!(config.retro_hash);
    assert_eq!(config.min_size_bytes().unwrap(), 1_024);
}
