//! acclog.toml 통합 설정 테스트
//!
//! - acclog.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use acclog_core::config::AcclogConfig;
use acclog_core::error::{AccessLogError, ConfigError};

// =============================================================================
// acclog.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../acclog.toml.example");
    let config = AcclogConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "warn");
    assert_eq!(config.general.log_format, "pretty");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../acclog.toml.example");
    let config = AcclogConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_code_defaults() {
    let content = include_str!("../../../acclog.toml.example");
    let from_file = AcclogConfig::parse(content).expect("should parse");
    let defaults = AcclogConfig::default();

    assert_eq!(from_file.report.slot_width_secs, defaults.report.slot_width_secs);
    assert_eq!(
        from_file.report.downtime_slot_secs,
        defaults.report.downtime_slot_secs
    );
    assert_eq!(from_file.report.limit, defaults.report.limit);
    assert_eq!(from_file.report.order, defaults.report.order);
    assert_eq!(from_file.report.field_sep, defaults.report.field_sep);
    assert_eq!(from_file.report.time_zone, defaults.report.time_zone);
    assert_eq!(from_file.scan.on_parse_error, defaults.scan.on_parse_error);
    assert_eq!(from_file.scan.on_io_error, defaults.scan.on_io_error);
}

// =============================================================================
// 부분 설정 테스트
// =============================================================================

#[test]
fn partial_config_scan_only() {
    let toml = r#"
[scan]
on_parse_error = "skip"
"#;
    let config = AcclogConfig::parse(toml).expect("should parse");
    assert_eq!(config.scan.on_parse_error, "skip");
    assert_eq!(config.scan.on_io_error, "abort");
    assert_eq!(config.report.downtime_slot_secs, 60);
}

#[test]
fn partial_config_two_sections() {
    let toml = r#"
[general]
log_level = "debug"

[report]
time_zone = "utc"
order = "peak"
"#;
    let config = AcclogConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");
    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.report.time_zone, "utc");
    assert_eq!(config.report.order, "peak");
    assert_eq!(config.report.limit, 0);
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[report]
limit = 10
"#;

    let original = std::env::var("ACCLOG_REPORT_LIMIT").ok();
    // SAFETY: 테스트는 serial로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("ACCLOG_REPORT_LIMIT", "50");
    }

    let mut config = AcclogConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    let result = config.report.limit;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("ACCLOG_REPORT_LIMIT", val),
            None => std::env::remove_var("ACCLOG_REPORT_LIMIT"),
        }
    }

    assert_eq!(result, 50);
}

#[test]
#[serial_test::serial]
fn env_override_string_field() {
    let original = std::env::var("ACCLOG_REPORT_TIME_ZONE").ok();
    // SAFETY: 테스트는 serial로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("ACCLOG_REPORT_TIME_ZONE", "utc");
    }

    let mut config = AcclogConfig::parse("").expect("should parse");
    config.apply_env_overrides();
    let result = config.report.time_zone.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("ACCLOG_REPORT_TIME_ZONE", val),
            None => std::env::remove_var("ACCLOG_REPORT_TIME_ZONE"),
        }
    }

    assert_eq!(result, "utc");
}

#[test]
#[serial_test::serial]
fn env_override_missing_var_keeps_toml_value() {
    let toml = r#"
[scan]
on_io_error = "skip"
"#;

    // SAFETY: 존재하지 않는 변수를 명시적으로 제거
    unsafe {
        std::env::remove_var("ACCLOG_SCAN_ON_IO_ERROR");
    }

    let mut config = AcclogConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();

    assert_eq!(config.scan.on_io_error, "skip");
}

// =============================================================================
// 에러 처리 테스트
// =============================================================================

#[test]
fn empty_string_parses_with_defaults() {
    let config = AcclogConfig::parse("").expect("empty string should parse");
    assert_eq!(config.report.order, "count");
}

#[test]
fn malformed_toml_returns_parse_error() {
    let err = AcclogConfig::parse("[report\nlimit = 3").unwrap_err();
    assert!(matches!(
        err,
        AccessLogError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[test]
fn wrong_type_for_numeric_field() {
    let toml = r#"
[report]
limit = "lots"
"#;
    assert!(AcclogConfig::parse(toml).is_err());
}

#[tokio::test]
async fn from_file_nonexistent_returns_file_not_found() {
    let err = AcclogConfig::from_file("/nonexistent/acclog.toml")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AccessLogError::Config(ConfigError::FileNotFound { .. })
    ));
}

#[tokio::test]
#[serial_test::serial]
async fn load_or_default_tolerates_missing_file() {
    let config = AcclogConfig::load_or_default("/nonexistent/acclog.toml")
        .await
        .expect("missing file should fall back to defaults");
    assert_eq!(config.report.downtime_slot_secs, 60);
}

#[tokio::test]
async fn load_or_default_rejects_broken_file() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("acclog.toml");
    std::fs::write(&path, "[report]\norder = \"sideways\"\n").expect("should write");

    let result = AcclogConfig::load_or_default(&path).await;
    assert!(result.is_err(), "invalid order must not fall back to defaults");
}

#[tokio::test]
#[serial_test::serial]
async fn load_example_config_from_disk() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("acclog.toml");
    std::fs::write(&path, include_str!("../../../acclog.toml.example")).expect("should write");

    let config = AcclogConfig::load(&path).await.expect("should load");
    assert_eq!(config.scan.on_parse_error, "abort");
}
