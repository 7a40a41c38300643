//! Error types for loading, binding and rendering configuration.
//!
//! Responsibilities:
//! - Define one error enum covering every failure the engine can report.
//! - Carry enough context (field path, offending value, source identity) to
//!   diagnose a failure without re-running.
//!
//! Does NOT handle:
//! - Adapter-level I/O and parse failures (see `sources::SourceError`, which
//!   is wrapped by `ConfigError::SourceLoad`).
//!
//! Invariants:
//! - Values rendered into `TypeMismatch` and `Overflow` messages are replaced
//!   by the mask token when the failing field is secret.
//! - Merging has no error variant: it cannot fail.

use thiserror::Error;

use crate::sources::SourceError;

/// Errors that can occur while loading, binding or rendering configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A source adapter failed; the core never retries.
    #[error("failed to load configuration from {source_name}")]
    SourceLoad {
        source_name: String,
        #[source]
        cause: SourceError,
    },

    /// The bind target does not describe a usable record.
    #[error("invalid bind target {type_name}: {reason}")]
    InvalidTarget {
        type_name: &'static str,
        reason: String,
    },

    /// A value's shape disagrees with the field's kind and no coercion applies.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: String,
    },

    /// A numeric value parsed but does not fit the field's width.
    #[error("value {value} at {path} overflows {target}")]
    Overflow {
        path: String,
        value: String,
        target: &'static str,
    },

    /// A required path was absent from the merged tree.
    #[error("missing required field: {path}")]
    MissingRequiredField { path: String },

    /// The redacted tree could not be rendered.
    #[error("failed to render redacted configuration: {0}")]
    Render(#[from] serde_json::Error),
}

impl ConfigError {
    /// Dotted field path the error refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            ConfigError::TypeMismatch { path, .. }
            | ConfigError::Overflow { path, .. }
            | ConfigError::MissingRequiredField { path } => Some(path),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_include_path_and_value() {
        let err = ConfigError::Overflow {
            path: "db.port".to_string(),
            value: "70000".to_string(),
            target: "u16",
        };
        assert_eq!(err.to_string(), "value 70000 at db.port overflows u16");
        assert_eq!(err.path(), Some("db.port"));

        let err = ConfigError::MissingRequiredField {
            path: "db.host".to_string(),
        };
        assert_eq!(err.to_string(), "missing required field: db.host");
    }

    #[test]
    fn test_source_load_keeps_cause_chain() {
        use std::error::Error as _;

        let err = ConfigError::SourceLoad {
            source_name: "file(config.yaml)".to_string(),
            cause: SourceError::Io {
                path: "config.yaml".into(),
                kind: std::io::ErrorKind::NotFound,
            },
        };
        assert_eq!(
            err.to_string(),
            "failed to load configuration from file(config.yaml)"
        );
        assert!(err.source().is_some());
        assert_eq!(err.path(), None);
    }
}
