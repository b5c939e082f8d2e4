//! Positional arguments accepted by the keyed logging methods
//!
//! A keyed call takes a slice of [`Arg`]s. Each element is either a ready
//! [`Field`], a trace carrier, or a bare [`Value`] that is read as a key or
//! as the value of the preceding key, depending on its position. The
//! [`kv!`](crate::kv) macro builds such a slice on the stack.

use super::field::{Field, FieldValue, ObjectMarshaler};
use super::trace::{TraceCarrier, TracingContext};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Untyped positional value.
#[derive(Clone)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(Cow<'a, str>),
    Bytes(Cow<'a, [u8]>),
    Duration(Duration),
    Json(serde_json::Value),
    Object(Arc<dyn ObjectMarshaler>),
}

impl<'a> Value<'a> {
    /// The key this value denotes, if it can be used as one.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Best-effort conversion to a field payload.
    pub fn into_field_value(self) -> FieldValue {
        match self {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::I64(i) => FieldValue::Int64(i),
            Value::U64(u) => FieldValue::Uint64(u),
            Value::F64(f) => FieldValue::Float64(f),
            Value::Str(s) => FieldValue::String(s.into_owned()),
            Value::Bytes(b) => FieldValue::Binary(b.into_owned()),
            Value::Duration(d) => FieldValue::Duration(d),
            Value::Json(v) => FieldValue::Reflected(v),
            Value::Object(o) => FieldValue::Object(o),
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::I64(i) => f.debug_tuple("I64").field(i).finish(),
            Value::U64(u) => f.debug_tuple("U64").field(u).finish(),
            Value::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::Bytes(b) => f.debug_tuple("Bytes").field(b).finish(),
            Value::Duration(d) => f.debug_tuple("Duration").field(d).finish(),
            Value::Json(v) => f.debug_tuple("Json").field(v).finish(),
            Value::Object(_) => f.write_str("Object(..)"),
        }
    }
}

macro_rules! value_from {
    ($variant:ident as $target:ty: $($t:ty),+) => {
        $(
            impl<'a> From<$t> for Value<'a> {
                fn from(v: $t) -> Self {
                    Value::$variant(v as $target)
                }
            }

            impl<'a> From<$t> for Arg<'a> {
                fn from(v: $t) -> Self {
                    Arg::Value(Value::from(v))
                }
            }
        )+
    };
}

value_from!(I64 as i64: i8, i16, i32, i64, isize);
value_from!(U64 as u64: u8, u16, u32, u64, usize);
value_from!(F64 as f64: f32, f64);

impl<'a> From<bool> for Value<'a> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Str(Cow::Borrowed(s))
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Value::Str(Cow::Borrowed(s.as_str()))
    }
}

impl<'a> From<String> for Value<'a> {
    fn from(s: String) -> Self {
        Value::Str(Cow::Owned(s))
    }
}

impl<'a> From<Cow<'a, str>> for Value<'a> {
    fn from(s: Cow<'a, str>) -> Self {
        Value::Str(s)
    }
}

impl<'a> From<char> for Value<'a> {
    fn from(c: char) -> Self {
        Value::Str(Cow::Owned(c.to_string()))
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(b: &'a [u8]) -> Self {
        Value::Bytes(Cow::Borrowed(b))
    }
}

impl<'a> From<Vec<u8>> for Value<'a> {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(Cow::Owned(b))
    }
}

impl<'a> From<Duration> for Value<'a> {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}

impl<'a> From<serde_json::Value> for Value<'a> {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl<'a> From<Arc<dyn ObjectMarshaler>> for Value<'a> {
    fn from(o: Arc<dyn ObjectMarshaler>) -> Self {
        Value::Object(o)
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// One positional slot of a keyed logging call.
pub enum Arg<'a> {
    /// A ready field, appended as-is.
    Field(Field),
    /// A trace carrier; contributes its trace id when it has one.
    Context(&'a dyn TraceCarrier),
    /// A key, or the value following a key.
    Value(Value<'a>),
}

impl<'a> Arg<'a> {
    pub fn context<C: TraceCarrier>(carrier: &'a C) -> Self {
        Arg::Context(carrier)
    }
}

impl fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Field(field) => f.debug_tuple("Field").field(field).finish(),
            Arg::Context(carrier) => f.debug_tuple("Context").field(&carrier.trace_id()).finish(),
            Arg::Value(v) => f.debug_tuple("Value").field(v).finish(),
        }
    }
}

impl<'a> From<Field> for Arg<'a> {
    fn from(field: Field) -> Self {
        Arg::Field(field)
    }
}

impl<'a> From<&'a dyn TraceCarrier> for Arg<'a> {
    fn from(carrier: &'a dyn TraceCarrier) -> Self {
        Arg::Context(carrier)
    }
}

impl<'a> From<&'a TracingContext> for Arg<'a> {
    fn from(ctx: &'a TracingContext) -> Self {
        Arg::Context(ctx)
    }
}

impl<'a> From<Value<'a>> for Arg<'a> {
    fn from(v: Value<'a>) -> Self {
        Arg::Value(v)
    }
}

macro_rules! arg_via_value {
    ($($t:ty),+) => {
        $(
            impl<'a> From<$t> for Arg<'a> {
                fn from(v: $t) -> Self {
                    Arg::Value(Value::from(v))
                }
            }
        )+
    };
}

arg_via_value!(bool, String, char, Vec<u8>, Duration, serde_json::Value, Arc<dyn ObjectMarshaler>);

impl<'a> From<&'a str> for Arg<'a> {
    fn from(s: &'a str) -> Self {
        Arg::Value(Value::from(s))
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(s: &'a String) -> Self {
        Arg::Value(Value::from(s))
    }
}

impl<'a> From<Cow<'a, str>> for Arg<'a> {
    fn from(s: Cow<'a, str>) -> Self {
        Arg::Value(Value::Str(s))
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(b: &'a [u8]) -> Self {
        Arg::Value(Value::from(b))
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Arg<'a> {
    fn from(v: Option<T>) -> Self {
        Arg::Value(Value::from(v))
    }
}
