//! Tests for loading `.env` files through the loader.
//!
//! Invariants / Assumptions:
//! - Error messages must never contain secret values from `.env` files.

use std::error::Error as _;
use tempfile::TempDir;

use super::{AppConfig, write_file};
use crate::error::ConfigError;
use crate::loader::ConfigLoader;
use crate::sources::SourceError;

#[test]
fn test_valid_dotenv_is_bound() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(
        &temp_dir,
        ".env",
        "DB_HOST=localhost\nDB_PASS=\"s3cr3t value\"\nPORT=8080\n",
    );

    let config: AppConfig = ConfigLoader::new().with_dotenv(&path).load().unwrap();

    assert_eq!(config.db.host, "localhost");
    assert_eq!(config.db.pass, "s3cr3t value");
    assert_eq!(config.port, 8080);
}

#[test]
fn test_missing_optional_dotenv_is_ok() {
    let temp_dir = TempDir::new().unwrap();
    let defaults = crate::Tree::new().with_path("db.host", "fallback");

    let config: AppConfig = ConfigLoader::new()
        .with_defaults(defaults)
        .with_optional_dotenv(temp_dir.path().join(".env"))
        .load()
        .unwrap();

    assert_eq!(config.db.host, "fallback");
}

#[test]
fn test_missing_required_dotenv_is_source_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(".env");

    let err = ConfigLoader::new()
        .with_dotenv(&path)
        .load::<AppConfig>()
        .unwrap_err();

    match err {
        ConfigError::SourceLoad { source_name, cause } => {
            assert!(source_name.starts_with("dotenv("), "{source_name}");
            assert!(cause.is_not_found());
        }
        other => panic!("expected SourceLoad, got {other}"),
    }
}

#[test]
fn test_dotenv_parse_error_does_not_leak_secrets() {
    let temp_dir = TempDir::new().unwrap();
    let secret_value = "supersecret_token_12345";
    let path = write_file(
        &temp_dir,
        ".env",
        &format!("DB_PASS={secret_value}\nINVALID_LINE_WITHOUT_EQUALS"),
    );

    let err = ConfigLoader::new()
        .with_dotenv(&path)
        .load::<AppConfig>()
        .unwrap_err();

    let mut messages = vec![err.to_string()];
    let mut cause = err.source();
    while let Some(inner) = cause {
        messages.push(inner.to_string());
        cause = inner.source();
    }
    for message in &messages {
        assert!(
            !message.contains(secret_value),
            "Error message should NOT contain the secret value: {message}"
        );
    }
    assert!(matches!(
        err,
        ConfigError::SourceLoad {
            cause: SourceError::DotenvParse { .. },
            ..
        }
    ));
}
