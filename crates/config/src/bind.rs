//! Binding of a merged tree onto a schema instance.
//!
//! Responsibilities:
//! - Walk a schema's descriptor in declaration order and look up each path.
//! - Coerce found scalars into fields, recurse into nested records.
//! - Enforce `required` fields.
//!
//! Does NOT handle:
//! - Loading or merging sources (see `loader`, `tree::merge`).
//! - Coercion rules themselves (see `schema::coerce`).
//!
//! Invariants:
//! - A path that is not found leaves the field untouched, unless required.
//! - A lookup that hits a scalar before its last segment is "not found".
//! - The first failure aborts the call. Fields assigned before it keep their
//!   new values; nothing is rolled back.
//! - Error messages never contain the value of a secret field. Fields inside
//!   a `secret` nested record count as secret too.

use crate::constants::MASK;
use crate::error::{ConfigError, Result};
use crate::schema::{CoerceError, FieldKind, FieldMut, FieldSpec, Leaf, Schema};
use crate::tree::{Node, Tree, Value, join_path};

/// Bind `tree` onto `target`.
///
/// On error, `target` is partially populated: every field processed before
/// the failing one has already been written.
///
/// # Errors
///
/// - [`ConfigError::MissingRequiredField`] when a required path is absent.
/// - [`ConfigError::TypeMismatch`] / [`ConfigError::Overflow`] when a value
///   cannot be coerced into its field.
/// - [`ConfigError::InvalidTarget`] when the schema descriptor is malformed.
pub fn bind<T: Schema>(tree: &Tree, target: &mut T) -> Result<()> {
    bind_dyn(tree, target)
}

/// Object-safe form of [`bind`].
pub fn bind_dyn(tree: &Tree, target: &mut dyn Schema) -> Result<()> {
    tracing::debug!(target_type = target.type_name(), "binding configuration");
    bind_record(tree, target, "", false)
}

fn bind_record(
    tree: &Tree,
    target: &mut dyn Schema,
    prefix: &str,
    inherited_secret: bool,
) -> Result<()> {
    let type_name = target.type_name();
    for (index, spec) in target.descriptor().iter().enumerate() {
        spec.validate(type_name)?;
        let path = join_path(prefix, spec.path);
        let secret = inherited_secret || spec.secret;
        let found = tree.lookup(spec.segments());

        let Some(field) = target.field_mut(index) else {
            return Err(ConfigError::InvalidTarget {
                type_name,
                reason: format!("no accessor for field `{}`", spec.name),
            });
        };

        match (spec.kind, field) {
            (FieldKind::Scalar { .. }, FieldMut::Leaf(leaf)) => {
                bind_leaf(found, leaf, spec, &path, secret)?;
            }
            (FieldKind::Record, FieldMut::Record(record)) => match found {
                Some(Node::Tree(sub)) => bind_record(sub, record, &path, secret)?,
                None | Some(Node::Value(Value::Nil)) => {
                    if spec.required {
                        return Err(ConfigError::MissingRequiredField { path });
                    }
                    // Still descend so required fields inside are enforced.
                    bind_record(&Tree::new(), record, &path, secret)?;
                }
                Some(node) => return Err(record_mismatch(node, &path)),
            },
            (FieldKind::OptionalRecord, FieldMut::OptionalRecord(slot)) => match found {
                Some(Node::Tree(sub)) => {
                    bind_record(sub, slot.record_or_default(), &path, secret)?;
                }
                None | Some(Node::Value(Value::Nil)) => {
                    if spec.required {
                        return Err(ConfigError::MissingRequiredField { path });
                    }
                }
                Some(node) => return Err(record_mismatch(node, &path)),
            },
            (kind, _) => {
                return Err(ConfigError::InvalidTarget {
                    type_name,
                    reason: format!(
                        "accessor for field `{}` does not match its declared kind {kind:?}",
                        spec.name
                    ),
                });
            }
        }
    }
    Ok(())
}

fn bind_leaf(
    found: Option<&Node>,
    leaf: &mut dyn Leaf,
    spec: &FieldSpec,
    path: &str,
    secret: bool,
) -> Result<()> {
    let expected = match spec.kind {
        FieldKind::Scalar { kind, .. } => kind.name(),
        FieldKind::Record | FieldKind::OptionalRecord => "table",
    };
    let value = match found {
        None if spec.required => {
            return Err(ConfigError::MissingRequiredField {
                path: path.to_string(),
            });
        }
        None => return Ok(()),
        Some(Node::Tree(_)) => {
            return Err(ConfigError::TypeMismatch {
                path: path.to_string(),
                expected,
                found: "table".to_string(),
            });
        }
        Some(Node::Value(value)) => value,
    };

    let sensitive = secret || leaf.is_sensitive();
    leaf.assign(value).map_err(|err| match err {
        CoerceError::Mismatch { expected } => ConfigError::TypeMismatch {
            path: path.to_string(),
            expected,
            found: describe(value, sensitive),
        },
        CoerceError::Overflow { target } => ConfigError::Overflow {
            path: path.to_string(),
            value: render(value, sensitive),
            target,
        },
    })
}

fn record_mismatch(node: &Node, path: &str) -> ConfigError {
    ConfigError::TypeMismatch {
        path: path.to_string(),
        expected: "table",
        found: node.kind_name().to_string(),
    }
}

fn render(value: &Value, sensitive: bool) -> String {
    if sensitive && !value.is_nil() {
        MASK.to_string()
    } else {
        value.to_string()
    }
}

fn describe(value: &Value, sensitive: bool) -> String {
    match value {
        Value::Nil => "null".to_string(),
        _ => format!("{} {}", value.kind_name(), render(value, sensitive)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldRef;

    // Hand-written descriptors, to exercise the engine without the derive.
    #[derive(Default)]
    struct Flat {
        host: String,
        port: i64,
    }

    static FLAT_FIELDS: [FieldSpec; 2] = [
        FieldSpec::new("host", "host", FieldKind::scalar::<String>()).required(true),
        FieldSpec::new("port", "port", FieldKind::scalar::<i64>()),
    ];

    impl Schema for Flat {
        fn fields() -> &'static [FieldSpec] {
            &FLAT_FIELDS
        }

        fn descriptor(&self) -> &'static [FieldSpec] {
            &FLAT_FIELDS
        }

        fn field(&self, index: usize) -> Option<FieldRef<'_>> {
            match index {
                0 => Some(FieldRef::Leaf(&self.host)),
                1 => Some(FieldRef::Leaf(&self.port)),
                _ => None,
            }
        }

        fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>> {
            match index {
                0 => Some(FieldMut::Leaf(&mut self.host)),
                1 => Some(FieldMut::Leaf(&mut self.port)),
                _ => None,
            }
        }
    }

    /// Declares a record field but hands out a scalar accessor.
    #[derive(Default)]
    struct Mislabeled {
        host: String,
    }

    static MISLABELED_FIELDS: [FieldSpec; 1] = [FieldSpec::new("host", "host", FieldKind::Record)];

    impl Schema for Mislabeled {
        fn fields() -> &'static [FieldSpec] {
            &MISLABELED_FIELDS
        }

        fn descriptor(&self) -> &'static [FieldSpec] {
            &MISLABELED_FIELDS
        }

        fn field(&self, _index: usize) -> Option<FieldRef<'_>> {
            Some(FieldRef::Leaf(&self.host))
        }

        fn field_mut(&mut self, _index: usize) -> Option<FieldMut<'_>> {
            Some(FieldMut::Leaf(&mut self.host))
        }
    }

    #[test]
    fn test_bind_hand_written_schema() {
        let tree = Tree::new()
            .with_path("host", "localhost")
            .with_path("port", "5432");
        let mut target = Flat::default();

        bind(&tree, &mut target).unwrap();

        assert_eq!(target.host, "localhost");
        assert_eq!(target.port, 5432);
    }

    #[test]
    fn test_required_leaf_missing() {
        let mut target = Flat::default();
        let err = bind(&Tree::new().with_path("port", 1i64), &mut target).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequiredField { ref path } if path == "host"));
    }

    #[test]
    fn test_subtree_at_leaf_is_type_mismatch() {
        let tree = Tree::new().with_path("host", "h").with_path("port.number", 1i64);
        let err = bind(&tree, &mut Flat::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TypeMismatch { ref path, expected: "integer", ref found }
                if path == "port" && found == "table"
        ));
    }

    #[test]
    fn test_accessor_kind_mismatch_is_invalid_target() {
        let err = bind(&Tree::new(), &mut Mislabeled::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTarget { .. }), "{err}");
    }

    #[test]
    fn test_render_masks_sensitive_values() {
        assert_eq!(render(&Value::from("hunter2"), true), MASK);
        assert_eq!(describe(&Value::from("abc"), false), "string \"abc\"");
        assert_eq!(describe(&Value::from("abc"), true), "string ***");
        assert_eq!(describe(&Value::Nil, true), "null");
    }
}
