//! Key/value fields attached to a [`Context`](crate::Context) when it is created.
//!
//! Fields are only handed to [`Evaluator::on_new_context`](crate::Evaluator::on_new_context);
//! they are not stored in the context. Evaluators that need them later take an
//! [`OwnedFields`] snapshot and keep it in the context's extensions.

use std::borrow::Cow;
use std::fmt;

use crate::value::Value;

/// A borrowed list of fields, usually built with [`fields!`](crate::fields).
#[derive(Clone, Copy)]
pub struct Fields<'a> {
    fields: &'a [(&'a str, Value<'a>)],
}

impl<'a> Fields<'a> {
    /// Wraps a slice of `(key, value)` pairs.
    pub const fn new(fields: &'a [(&'a str, Value<'a>)]) -> Self {
        Self { fields }
    }

    /// Iterates over the fields in declaration order.
    pub fn pairs(&self) -> impl Iterator<Item = (&'a str, &'a Value<'a>)> + use<'a> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    /// Returns the first field named `key`.
    pub fn get(&self, key: &str) -> Option<&'a Value<'a>> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Number of fields, duplicates included.
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if there are no fields.
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copies the fields into an owned snapshot.
    #[must_use]
    pub fn to_owned_fields(&self) -> OwnedFields {
        OwnedFields {
            fields: self
                .pairs()
                .map(|(k, v)| (Cow::Owned(k.to_owned()), v.to_static()))
                .collect(),
        }
    }
}

impl fmt::Debug for Fields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.pairs()).finish()
    }
}

/// An owned copy of [`Fields`] that can outlive the `context!` call.
#[derive(Clone, Default, PartialEq)]
pub struct OwnedFields {
    fields: Vec<(Cow<'static, str>, Value<'static>)>,
}

impl OwnedFields {
    /// Iterates over the fields in declaration order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &Value<'static>)> {
        self.fields.iter().map(|(k, v)| (k.as_ref(), v))
    }

    /// Returns the first field named `key`.
    pub fn get(&self, key: &str) -> Option<&Value<'static>> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Number of fields, duplicates included.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the snapshot has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Fields<'_>> for OwnedFields {
    fn from(fields: Fields<'_>) -> Self {
        fields.to_owned_fields()
    }
}

impl fmt::Debug for OwnedFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.pairs()).finish()
    }
}

/// Builds a [`Fields`] list.
///
/// Entries are comma separated and take one of these forms:
///
/// * `key` uses a local variable of the same name,
/// * `key = expr`,
/// * `"key" = expr` for names that are not identifiers,
/// * `[expr] = expr` for a key computed at runtime.
///
/// Values go through [`ToValue`](crate::value::ToValue).
///
/// ```rust
/// let tenant = "acme";
/// let fields = featureflag::fields!(tenant, user_id = 42_u64, "x-region" = "eu").to_owned_fields();
///
/// assert_eq!(fields.get("tenant").and_then(|v| v.as_str()), Some("acme"));
/// assert_eq!(fields.get("user_id").and_then(|v| v.as_u64()), Some(42));
/// assert_eq!(fields.get("x-region").and_then(|v| v.as_str()), Some("eu"));
/// ```
#[macro_export]
macro_rules! fields {
    (@entry $key:ident) => {
        (stringify!($key), $crate::value::ToValue::to_value(&$key))
    };
    (@entry $key:ident = $value:expr) => {
        (stringify!($key), $crate::value::ToValue::to_value(&$value))
    };
    (@entry $key:literal = $value:expr) => {
        ($key, $crate::value::ToValue::to_value(&$value))
    };
    (@entry [$key:expr] = $value:expr) => {
        (&$key as &str, $crate::value::ToValue::to_value(&$value))
    };

    () => {
        $crate::fields::Fields::new(&[])
    };

    ($($key:tt $(= $value:expr)?),+ $(,)?) => {
        $crate::fields::Fields::new(&[
            $( $crate::fields!(@entry $key $(= $value)?), )+
        ])
    };
}

#[cfg(test)]
mod tests {
    use super::Fields;
    use crate::value::Value;

    fn bool_field(fields: Fields<'_>, key: &str) -> Option<bool> {
        fields.get(key).and_then(Value::as_bool)
    }

    #[test]
    fn first_matching_key_wins() {
        let first = |fields: Fields<'_>| (fields.len(), fields.get("a").and_then(Value::as_i64));
        assert_eq!(first(crate::fields!(a = 1_i32, a = 2_i32)), (2, Some(1)));
    }

    #[test]
    fn empty_fields() {
        let fields = crate::fields!();
        assert!(fields.is_empty());
        assert!(fields.get("anything").is_none());
    }

    #[test]
    fn computed_keys_and_trailing_comma() {
        let key = String::from("dynamic");
        assert_eq!(bool_field(crate::fields!([key] = true, enabled = false,), "dynamic"), Some(true));
        assert_eq!(bool_field(crate::fields!([key] = true, enabled = false,), "enabled"), Some(false));
    }

    #[test]
    fn owned_snapshot_preserves_order_and_values() {
        let user = String::from("alice");
        let owned = crate::fields!(user, plan = "pro").to_owned_fields();
        drop(user);

        let keys: Vec<_> = owned.pairs().map(|(k, _)| k).collect();
        assert_eq!(keys, ["user", "plan"]);
        assert_eq!(owned.get("user").and_then(Value::as_str), Some("alice"));
        assert_eq!(format!("{owned:?}"), r#"{"user": "alice", "plan": "pro"}"#);
    }
}
