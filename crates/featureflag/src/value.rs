//! Field values carried by a [`Context`](crate::Context).

use std::borrow::Cow;
use std::fmt;

/// A single field value passed to [`context!`](macro@crate::context).
#[derive(Clone, Default, PartialEq)]
pub enum Value<'a> {
    /// UTF-8 string.
    Str(Cow<'a, str>),
    /// Raw bytes.
    Bytes(Cow<'a, [u8]>),
    /// Boolean.
    Bool(bool),
    /// Signed integer; every signed primitive widens into this variant.
    I64(i64),
    /// Unsigned integer; every unsigned primitive widens into this variant.
    U64(u64),
    /// Floating point number.
    F64(f64),
    /// Absent value, e.g. from `None`.
    #[default]
    Null,
}

impl Value<'_> {
    /// Returns an owned copy that no longer borrows from the source.
    #[must_use]
    pub fn to_static(&self) -> Value<'static> {
        self.clone().into_static()
    }

    /// Converts into an owned value, reusing owned buffers where possible.
    #[must_use]
    pub fn into_static(self) -> Value<'static> {
        match self {
            Value::Str(s) => Value::Str(Cow::Owned(s.into_owned())),
            Value::Bytes(b) => Value::Bytes(Cow::Owned(b.into_owned())),
            Value::Bool(b) => Value::Bool(b),
            Value::I64(n) => Value::I64(n),
            Value::U64(n) => Value::U64(n),
            Value::F64(x) => Value::F64(x),
            Value::Null => Value::Null,
        }
    }

    /// Returns the string if this is [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the bytes if this is [`Value::Bytes`].
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the boolean if this is [`Value::Bool`].
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is [`Value::I64`].
    ///
    /// ```rust
    /// use featureflag::value::ToValue;
    ///
    /// assert_eq!((-3_i8).to_value().as_i64(), Some(-3));
    /// assert_eq!(3_u8.to_value().as_i64(), None);
    /// ```
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the integer if this is [`Value::U64`].
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U64(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number if this is [`Value::F64`].
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => fmt::Debug::fmt(s, f),
            Value::Bytes(b) => fmt::Debug::fmt(b, f),
            Value::Bool(b) => fmt::Debug::fmt(b, f),
            Value::I64(n) => fmt::Debug::fmt(n, f),
            Value::U64(n) => fmt::Debug::fmt(n, f),
            Value::F64(x) => fmt::Debug::fmt(x, f),
            Value::Null => f.write_str("null"),
        }
    }
}

/// Conversion into a borrowed [`Value`].
///
/// This is what the `key = expr` entries of [`fields!`](crate::fields) and
/// [`context!`](crate::context) go through.
pub trait ToValue {
    fn to_value(&self) -> Value<'_>;
}

impl ToValue for Value<'_> {
    fn to_value(&self) -> Value<'_> {
        match self {
            Value::Str(s) => Value::Str(Cow::Borrowed(s)),
            Value::Bytes(b) => Value::Bytes(Cow::Borrowed(b)),
            other => other.clone(),
        }
    }
}

impl<V: ToValue> ToValue for Option<V> {
    fn to_value(&self) -> Value<'_> {
        self.as_ref().map_or(Value::Null, ToValue::to_value)
    }
}

impl<V: ?Sized + ToValue> ToValue for &V {
    fn to_value(&self) -> Value<'_> {
        V::to_value(self)
    }
}

impl<V: ?Sized + ToValue + ToOwned> ToValue for Cow<'_, V> {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value<'_> {
        Value::Str(Cow::Borrowed(self))
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value<'_> {
        Value::Str(Cow::Borrowed(self))
    }
}

impl ToValue for [u8] {
    fn to_value(&self) -> Value<'_> {
        Value::Bytes(Cow::Borrowed(self))
    }
}

impl ToValue for Vec<u8> {
    fn to_value(&self) -> Value<'_> {
        Value::Bytes(Cow::Borrowed(self))
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

macro_rules! impl_to_value {
    ($variant:ident($target:ty): $($ty:ty),+) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value<'_> {
                    Value::$variant(<$target>::from(*self))
                }
            }
        )+
    };
}

impl_to_value!(I64(i64): i8, i16, i32, i64);
impl_to_value!(U64(u64): u8, u16, u32, u64);
impl_to_value!(F64(f64): f32, f64);
