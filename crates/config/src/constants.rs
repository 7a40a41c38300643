//! Centralized constants for the strata workspace.
//!
//! This module contains the fixed tokens shared by the tree builder, the
//! binder and the sanitizer so that every component agrees on them.

// =============================================================================
// Paths
// =============================================================================

/// Separator between segments of a field path (`db.host`).
pub const PATH_SEPARATOR: char = '.';

/// Separator between segments of an environment-style key (`APP_DB_HOST`).
pub const ENV_SEPARATOR: char = '_';

// =============================================================================
// Redaction
// =============================================================================

/// Placeholder emitted in place of every secret value.
pub const MASK: &str = "***";

// =============================================================================
// Boolean coercion
// =============================================================================

/// Strings (compared case-insensitively) that coerce to `true`.
pub const TRUTHY: &[&str] = &["true", "1", "yes", "y"];

/// Strings (compared case-insensitively) that coerce to `false`.
pub const FALSY: &[&str] = &["false", "0", "no", "n"];
