//! Table-driven tests for configuration loading and validation.

use std::time::Duration;

use reelstats::config::{load_config, load_config_from_str};
use reelstats::AggregationSettings;

/// Represents a single config loading test case.
struct ConfigTestCase {
    /// Test case name for identification.
    name: &'static str,
    /// The config JSON content to test.
    config_json: &'static str,
    /// Whether loading should succeed.
    should_succeed: bool,
    /// Expected error substring (if should_succeed is false).
    expected_error: Option<&'static str>,
}

const CONFIG_TESTS: &[ConfigTestCase] = &[
    ConfigTestCase {
        name: "valid_minimal",
        config_json: r#"{ "version": "1.0" }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "valid_full",
        config_json: r#"{
            "version": "1.0",
            "database_path": "/var/lib/reelstats/reelstats.db",
            "timezone": "Asia/Kolkata",
            "schedule": "0 5 0 * * *",
            "timeout_secs": 540,
            "active_window_days": 30,
            "modeling": {
                "watch_minutes_per_view": 45,
                "avg_watch_time": 45,
                "completion_rate": 60
            }
        }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "partial_modeling",
        config_json: r#"{ "version": "1.0", "modeling": { "completion_rate": 72.5 } }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "missing_version",
        config_json: r#"{ "timezone": "UTC" }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "unsupported_version",
        config_json: r#"{ "version": "2.0" }"#,
        should_succeed: false,
        expected_error: Some("Unsupported config version"),
    },
    ConfigTestCase {
        name: "unknown_field",
        config_json: r#"{ "version": "1.0", "worker_count": 4 }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "unknown_time_zone",
        config_json: r#"{ "version": "1.0", "timezone": "Mars/Olympus_Mons" }"#,
        should_succeed: false,
        expected_error: Some("Invalid time zone"),
    },
    ConfigTestCase {
        name: "bad_cron_expression",
        config_json: r#"{ "version": "1.0", "schedule": "every night" }"#,
        should_succeed: false,
        expected_error: Some("Invalid schedule"),
    },
    ConfigTestCase {
        name: "zero_timeout",
        config_json: r#"{ "version": "1.0", "timeout_secs": 0 }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "active_window_too_long",
        config_json: r#"{ "version": "1.0", "active_window_days": 400 }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "negative_modeling_constant",
        config_json: r#"{ "version": "1.0", "modeling": { "avg_watch_time": -1 } }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "invalid_json",
        config_json: r#"{ "version": "1.0", "#,
        should_succeed: false,
        expected_error: Some("Failed to parse config JSON"),
    },
];

#[test]
fn test_config_loading() {
    for case in CONFIG_TESTS {
        let result = load_config_from_str(case.config_json);

        if case.should_succeed {
            assert!(
                result.is_ok(),
                "Case '{}' should succeed but failed: {:?}",
                case.name,
                result.err()
            );
        } else {
            let err = match result {
                Ok(_) => panic!("Case '{}' should fail but succeeded", case.name),
                Err(e) => e.to_string(),
            };
            if let Some(expected) = case.expected_error {
                assert!(
                    err.contains(expected),
                    "Case '{}': expected error containing '{}', got '{}'",
                    case.name,
                    expected,
                    err
                );
            }
        }
    }
}

#[test]
fn test_defaults_applied() {
    let config = load_config_from_str(r#"{ "version": "1.0" }"#).unwrap();

    assert_eq!(config.timezone, "UTC");
    assert_eq!(config.schedule, "0 5 0 * * *");
    assert_eq!(config.timeout_secs, 540);
    assert_eq!(config.active_window_days, 30);
    assert_eq!(config.modeling.watch_minutes_per_view, 45.0);
    assert_eq!(config.modeling.avg_watch_time, 45.0);
    assert_eq!(config.modeling.completion_rate, 60.0);
    assert!(config.database_path.is_none());
}

#[test]
fn test_settings_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reelstats.json");
    std::fs::write(
        &path,
        r#"{
            "version": "1.0",
            "timezone": "Europe/Berlin",
            "timeout_secs": 120,
            "active_window_days": 7,
            "modeling": { "watch_minutes_per_view": 30 }
        }"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    let settings = AggregationSettings::from_config(&config).unwrap();

    assert_eq!(settings.timezone, chrono_tz::Europe::Berlin);
    assert_eq!(settings.timeout, Duration::from_secs(120));
    assert_eq!(settings.active_window_days, 7);
    assert_eq!(settings.model.watch_minutes_per_view, 30.0);
    assert_eq!(settings.model.avg_watch_time, 45.0);
}

#[test]
fn test_missing_file() {
    let err = load_config("/nonexistent/reelstats.json").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
