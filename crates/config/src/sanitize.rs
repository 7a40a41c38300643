//! Redacted view of a bound schema.
//!
//! Responsibilities:
//! - Mirror a schema's descriptor into a [`Tree`] of its current values.
//! - Replace secret values with the mask token.
//! - Render that tree as JSON for logs and diagnostics.
//!
//! Does NOT handle:
//! - Binding values in (see `bind`).
//!
//! Invariants:
//! - A secret-flagged leaf, or a leaf whose type is itself secret, always
//!   emits the mask, even when empty.
//! - A secret-flagged nested record emits the mask at its own path and is not
//!   visited.
//! - An absent optional record contributes nothing.

use crate::constants::MASK;
use crate::error::{ConfigError, Result};
use crate::schema::{FieldKind, FieldRef, Schema};
use crate::tree::{Tree, Value, join_path, split_path};

/// Build the redacted tree for `source`.
///
/// # Errors
///
/// [`ConfigError::InvalidTarget`] when the schema descriptor is malformed.
pub fn sanitize<T: Schema>(source: &T) -> Result<Tree> {
    sanitize_dyn(source)
}

/// Object-safe form of [`sanitize`].
pub fn sanitize_dyn(source: &dyn Schema) -> Result<Tree> {
    let mut out = Tree::new();
    sanitize_record(source, "", &mut out)?;
    Ok(out)
}

/// Redacted configuration as compact JSON.
///
/// ```
/// use strata_config::{Schema, masked_json};
///
/// #[derive(Schema, Default)]
/// struct Creds {
///     #[config(path = "user")]
///     user: String,
///     #[config(path = "pass", secret)]
///     pass: String,
/// }
///
/// let creds = Creds { user: "admin".into(), pass: "hunter2".into() };
/// assert_eq!(masked_json(&creds).unwrap(), r#"{"pass":"***","user":"admin"}"#);
/// ```
pub fn masked_json<T: Schema>(source: &T) -> Result<String> {
    Ok(serde_json::to_string(&sanitize(source)?)?)
}

/// Redacted configuration as indented JSON.
pub fn masked_json_pretty<T: Schema>(source: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(&sanitize(source)?)?)
}

fn sanitize_record(source: &dyn Schema, prefix: &str, out: &mut Tree) -> Result<()> {
    let type_name = source.type_name();
    for (index, spec) in source.descriptor().iter().enumerate() {
        spec.validate(type_name)?;
        let path = join_path(prefix, spec.path);

        let Some(field) = source.field(index) else {
            return Err(ConfigError::InvalidTarget {
                type_name,
                reason: format!("no accessor for field `{}`", spec.name),
            });
        };

        match (spec.kind, field) {
            (FieldKind::Scalar { .. }, FieldRef::Leaf(leaf)) => {
                let value = if spec.secret || leaf.is_sensitive() {
                    Value::String(MASK.to_string())
                } else {
                    leaf.to_value()
                };
                out.insert_path(split_path(&path), value);
            }
            (FieldKind::Record, FieldRef::Record(record))
            | (FieldKind::OptionalRecord, FieldRef::OptionalRecord(Some(record))) => {
                if spec.secret {
                    out.insert_path(split_path(&path), Value::String(MASK.to_string()));
                } else {
                    sanitize_record(record, &path, out)?;
                }
            }
            (FieldKind::OptionalRecord, FieldRef::OptionalRecord(None)) => {}
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldMut, FieldSpec};
    use crate::tree::Node;
    use secrecy::SecretString;

    struct Token {
        value: SecretString,
        scope: String,
    }

    static TOKEN_FIELDS: [FieldSpec; 2] = [
        FieldSpec::new("value", "value", FieldKind::scalar::<SecretString>()),
        FieldSpec::new("scope", "auth.scope", FieldKind::scalar::<String>()),
    ];

    impl Schema for Token {
        fn fields() -> &'static [FieldSpec] {
            &TOKEN_FIELDS
        }

        fn descriptor(&self) -> &'static [FieldSpec] {
            &TOKEN_FIELDS
        }

        fn field(&self, index: usize) -> Option<FieldRef<'_>> {
            match index {
                0 => Some(FieldRef::Leaf(&self.value)),
                1 => Some(FieldRef::Leaf(&self.scope)),
                _ => None,
            }
        }

        fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>> {
            match index {
                0 => Some(FieldMut::Leaf(&mut self.value)),
                1 => Some(FieldMut::Leaf(&mut self.scope)),
                _ => None,
            }
        }
    }

    #[test]
    fn test_secret_type_is_masked_without_flag() {
        let token = Token {
            value: SecretString::new("tok_live_123".into()),
            scope: "read".to_string(),
        };

        let tree = sanitize(&token).unwrap();

        assert_eq!(tree.get_path("value"), Some(&Node::from(MASK)));
        assert_eq!(tree.get_path("auth.scope"), Some(&Node::from("read")));
        assert!(!masked_json(&token).unwrap().contains("tok_live_123"));
    }

    #[test]
    fn test_pretty_json_is_indented() {
        let token = Token {
            value: SecretString::new(String::new().into()),
            scope: String::new(),
        };
        let json = masked_json_pretty(&token).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("\"***\""));
    }
}
