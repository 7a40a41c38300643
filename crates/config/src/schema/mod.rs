//! Static schema descriptors for bindable structs.
//!
//! Responsibilities:
//! - Describe a struct's configurable fields as pure data ([`FieldSpec`]).
//! - Expose typed access to those fields ([`FieldRef`], [`FieldMut`]) so one
//!   generic traversal can bind and sanitize any schema.
//! - Validate hand-written descriptors before they are walked.
//!
//! Does NOT handle:
//! - Walking trees (see `bind`) or producing redacted output (see `sanitize`).
//! - Generating descriptors (see the `strata-derive` crate).
//!
//! Invariants:
//! - Only tagged fields appear in a descriptor; untagged fields are invisible.
//! - `field(i)`/`field_mut(i)` return the accessor for `descriptor()[i]`, and
//!   the accessor variant matches the declared [`FieldKind`].
//! - Paths are non-empty, dot-separated, lowercase segments.

pub mod coerce;
mod leaf;

pub use coerce::CoerceError;
pub use leaf::{Leaf, LeafType};

use crate::constants::PATH_SEPARATOR;
use crate::error::{ConfigError, Result};

/// A struct whose fields can be bound from a tree and sanitized.
///
/// Normally implemented with `#[derive(Schema)]`:
///
/// ```
/// use strata_config::Schema;
///
/// #[derive(Schema, Default)]
/// struct Database {
///     #[config(path = "host", required)]
///     host: String,
///     #[config(path = "pass", secret)]
///     pass: String,
/// }
///
/// #[derive(Schema, Default)]
/// struct AppConfig {
///     #[config(path = "db", nested)]
///     db: Database,
///     #[config(path = "port")]
///     port: u16,
///     // No attribute: never bound, never shown.
///     cache: Vec<String>,
/// }
///
/// let fields = AppConfig::fields();
/// assert_eq!(fields.len(), 2);
/// assert_eq!(fields[0].path, "db");
/// ```
pub trait Schema {
    /// The static descriptor of `Self`, usable without an instance.
    fn fields() -> &'static [FieldSpec]
    where
        Self: Sized;

    /// The static descriptor of this value's type.
    fn descriptor(&self) -> &'static [FieldSpec];

    /// Read access to the field described by `descriptor()[index]`.
    fn field(&self, index: usize) -> Option<FieldRef<'_>>;

    /// Write access to the field described by `descriptor()[index]`.
    fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>>;

    /// Type name used in diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Scalar categories a leaf field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    String,
    Integer,
    Float,
    Bool,
}

impl LeafKind {
    pub fn name(self) -> &'static str {
        match self {
            LeafKind::String => "string",
            LeafKind::Integer => "integer",
            LeafKind::Float => "float",
            LeafKind::Bool => "boolean",
        }
    }
}

/// Shape of a described field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single value; `nullable` fields are `Option<_>`.
    Scalar { kind: LeafKind, nullable: bool },
    /// A nested struct that is always present.
    Record,
    /// A nested struct behind `Option`, allocated on first bind.
    OptionalRecord,
}

impl FieldKind {
    /// Descriptor entry for the scalar type `L`.
    pub const fn scalar<L: LeafType>() -> Self {
        FieldKind::Scalar {
            kind: L::KIND,
            nullable: L::NULLABLE,
        }
    }

    pub fn is_record(self) -> bool {
        matches!(self, FieldKind::Record | FieldKind::OptionalRecord)
    }
}

/// Static description of one configurable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Rust field name, for diagnostics.
    pub name: &'static str,
    /// Dot-separated path relative to the enclosing record.
    pub path: &'static str,
    pub kind: FieldKind,
    /// Binding fails when the path cannot be found.
    pub required: bool,
    /// Redacted output shows the mask token instead of the value.
    pub secret: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str, path: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            path,
            kind,
            required: false,
            secret: false,
        }
    }

    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub const fn secret(mut self, secret: bool) -> Self {
        self.secret = secret;
        self
    }

    /// Path segments of this field.
    pub fn segments(&self) -> impl Iterator<Item = &'static str> {
        self.path.split(PATH_SEPARATOR)
    }

    /// Check that the path is well formed.
    pub(crate) fn validate(&self, type_name: &'static str) -> Result<()> {
        let reason = if self.path.is_empty() {
            Some(format!("field `{}` has an empty path", self.name))
        } else if self.segments().any(str::is_empty) {
            Some(format!(
                "field `{}` has an empty segment in path {:?}",
                self.name, self.path
            ))
        } else if self.path.chars().any(char::is_uppercase) {
            Some(format!(
                "field `{}` path {:?} must be lowercase",
                self.name, self.path
            ))
        } else {
            None
        };
        match reason {
            Some(reason) => Err(ConfigError::InvalidTarget { type_name, reason }),
            None => Ok(()),
        }
    }
}

/// Read access to one field.
pub enum FieldRef<'a> {
    Leaf(&'a dyn Leaf),
    Record(&'a dyn Schema),
    /// `None` when the optional record is absent.
    OptionalRecord(Option<&'a dyn Schema>),
}

/// Write access to one field.
pub enum FieldMut<'a> {
    Leaf(&'a mut dyn Leaf),
    Record(&'a mut dyn Schema),
    OptionalRecord(&'a mut dyn OptionalRecord),
}

/// A nested record that may be absent (`Option<T>`).
pub trait OptionalRecord {
    /// The record, if present.
    fn record(&self) -> Option<&dyn Schema>;

    /// The record, allocating `T::default()` first if absent.
    fn record_or_default(&mut self) -> &mut dyn Schema;
}

impl<T: Schema + Default> OptionalRecord for Option<T> {
    fn record(&self) -> Option<&dyn Schema> {
        self.as_ref().map(|record| record as &dyn Schema)
    }

    fn record_or_default(&mut self) -> &mut dyn Schema {
        self.get_or_insert_with(T::default)
    }
}
