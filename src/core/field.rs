//! Typed key/value fields attached to log records
//!
//! A [`Field`] is built once by one of its constructors and never changes
//! afterwards. Object and array payloads are marshaled lazily, when the core
//! encodes the record, so building them for a disabled level costs nothing
//! beyond the `Arc`.

use super::args::Value;
use super::error::Result;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Placeholder rendered for an absent error.
pub const NIL_ERROR: &str = "<nil>";

/// Self-describing value that adds its own key/value pairs to an encoder.
pub trait ObjectMarshaler: Send + Sync {
    fn marshal_log_object(&self, enc: &mut dyn ObjectEncoder) -> Result<()>;
}

/// Self-describing sequence that appends its elements to an encoder.
pub trait ArrayMarshaler: Send + Sync {
    fn marshal_log_array(&self, enc: &mut dyn ArrayEncoder) -> Result<()>;
}

/// Encoder for map-like values.
pub trait ObjectEncoder {
    fn add_value(&mut self, key: &str, value: &FieldValue) -> Result<()>;

    fn add_field(&mut self, field: &Field) -> Result<()> {
        self.add_value(field.key(), field.value())
    }

    fn add_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.add_value(key, &FieldValue::Bool(value))
    }

    fn add_i64(&mut self, key: &str, value: i64) -> Result<()> {
        self.add_value(key, &FieldValue::Int64(value))
    }

    fn add_u64(&mut self, key: &str, value: u64) -> Result<()> {
        self.add_value(key, &FieldValue::Uint64(value))
    }

    fn add_f64(&mut self, key: &str, value: f64) -> Result<()> {
        self.add_value(key, &FieldValue::Float64(value))
    }

    fn add_str(&mut self, key: &str, value: &str) -> Result<()> {
        self.add_value(key, &FieldValue::String(value.to_string()))
    }
}

/// Encoder for sequence values.
pub trait ArrayEncoder {
    fn append_value(&mut self, value: &FieldValue) -> Result<()>;
    fn append_object(&mut self, object: &dyn ObjectMarshaler) -> Result<()>;
}

/// Discriminant of a [`FieldValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Null,
    Bool,
    Int64,
    Uint64,
    Float64,
    String,
    Binary,
    ByteString,
    Duration,
    Time,
    ObjectMarshaler,
    ArrayMarshaler,
    Namespace,
    Reflected,
}

/// Payload of a field.
#[derive(Clone)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int64(i64),
    Uint64(u64),
    Float64(f64),
    String(String),
    /// Opaque bytes, base64 encoded on output.
    Binary(Vec<u8>),
    /// UTF-8 text carried as bytes.
    ByteString(Vec<u8>),
    Duration(Duration),
    Time(DateTime<Utc>),
    Object(Arc<dyn ObjectMarshaler>),
    Array(Arc<dyn ArrayMarshaler>),
    /// Opens a nested scope; every following field lands inside it.
    Namespace,
    /// Structural fallback for values without a dedicated kind.
    Reflected(serde_json::Value),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Null => FieldKind::Null,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Int64(_) => FieldKind::Int64,
            FieldValue::Uint64(_) => FieldKind::Uint64,
            FieldValue::Float64(_) => FieldKind::Float64,
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Binary(_) => FieldKind::Binary,
            FieldValue::ByteString(_) => FieldKind::ByteString,
            FieldValue::Duration(_) => FieldKind::Duration,
            FieldValue::Time(_) => FieldKind::Time,
            FieldValue::Object(_) => FieldKind::ObjectMarshaler,
            FieldValue::Array(_) => FieldKind::ArrayMarshaler,
            FieldValue::Namespace => FieldKind::Namespace,
            FieldValue::Reflected(_) => FieldKind::Reflected,
        }
    }

    /// The string payload, if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("Null"),
            FieldValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            FieldValue::Int64(i) => f.debug_tuple("Int64").field(i).finish(),
            FieldValue::Uint64(u) => f.debug_tuple("Uint64").field(u).finish(),
            FieldValue::Float64(v) => f.debug_tuple("Float64").field(v).finish(),
            FieldValue::String(s) => f.debug_tuple("String").field(s).finish(),
            FieldValue::Binary(b) => f.debug_tuple("Binary").field(b).finish(),
            FieldValue::ByteString(b) => f
                .debug_tuple("ByteString")
                .field(&String::from_utf8_lossy(b))
                .finish(),
            FieldValue::Duration(d) => f.debug_tuple("Duration").field(d).finish(),
            FieldValue::Time(t) => f.debug_tuple("Time").field(t).finish(),
            FieldValue::Object(_) => f.write_str("Object(..)"),
            FieldValue::Array(_) => f.write_str("Array(..)"),
            FieldValue::Namespace => f.write_str("Namespace"),
            FieldValue::Reflected(v) => f.debug_tuple("Reflected").field(v).finish(),
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => true,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Int64(a), FieldValue::Int64(b)) => a == b,
            (FieldValue::Uint64(a), FieldValue::Uint64(b)) => a == b,
            (FieldValue::Float64(a), FieldValue::Float64(b)) => a.to_bits() == b.to_bits(),
            (FieldValue::String(a), FieldValue::String(b)) => a == b,
            (FieldValue::Binary(a), FieldValue::Binary(b)) => a == b,
            (FieldValue::ByteString(a), FieldValue::ByteString(b)) => a == b,
            (FieldValue::Duration(a), FieldValue::Duration(b)) => a == b,
            (FieldValue::Time(a), FieldValue::Time(b)) => a == b,
            // Marshalers compare by identity.
            (FieldValue::Object(a), FieldValue::Object(b)) => Arc::ptr_eq(a, b),
            (FieldValue::Array(a), FieldValue::Array(b)) => Arc::ptr_eq(a, b),
            (FieldValue::Namespace, FieldValue::Namespace) => true,
            (FieldValue::Reflected(a), FieldValue::Reflected(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int64(i) => write!(f, "{}", i),
            FieldValue::Uint64(u) => write!(f, "{}", u),
            FieldValue::Float64(v) => write!(f, "{}", v),
            FieldValue::String(s) => f.write_str(s),
            FieldValue::Binary(b) => {
                f.write_str(&base64::engine::general_purpose::STANDARD.encode(b))
            }
            FieldValue::ByteString(b) => f.write_str(&String::from_utf8_lossy(b)),
            FieldValue::Duration(d) => write!(f, "{:?}", d),
            FieldValue::Time(t) => f.write_str(&t.to_rfc3339()),
            FieldValue::Object(_) => f.write_str("<object>"),
            FieldValue::Array(_) => f.write_str("<array>"),
            FieldValue::Namespace => Ok(()),
            FieldValue::Reflected(v) => write!(f, "{}", v),
        }
    }
}

/// A key/value pair attached to one log record.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: String,
    value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<String>, value: FieldValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn kind(&self) -> FieldKind {
        self.value.kind()
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, FieldValue::Bool(value))
    }

    pub fn int64(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, FieldValue::Int64(value))
    }

    pub fn uint64(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, FieldValue::Uint64(value))
    }

    pub fn float64(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, FieldValue::Float64(value))
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, FieldValue::String(value.into()))
    }

    /// Opaque binary blob. Use [`Field::byte_string`] for UTF-8 text held as bytes.
    pub fn binary(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self::new(key, FieldValue::Binary(value.into()))
    }

    /// UTF-8 text carried as bytes. Use [`Field::binary`] for opaque blobs.
    pub fn byte_string(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self::new(key, FieldValue::ByteString(value.into()))
    }

    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, FieldValue::Duration(value))
    }

    pub fn time(key: impl Into<String>, value: DateTime<Utc>) -> Self {
        Self::new(key, FieldValue::Time(value))
    }

    /// Map-like value marshaled lazily through its [`ObjectMarshaler`] impl.
    pub fn object<M: ObjectMarshaler + 'static>(key: impl Into<String>, value: M) -> Self {
        Self::new(key, FieldValue::Object(Arc::new(value)))
    }

    /// Sequence marshaled lazily through its [`ArrayMarshaler`] impl.
    pub fn array<M: ArrayMarshaler + 'static>(key: impl Into<String>, value: M) -> Self {
        Self::new(key, FieldValue::Array(Arc::new(value)))
    }

    /// Named, isolated scope: every field after this one is nested under `key`.
    ///
    /// Useful to avoid key collisions when handing a logger to a sub-component.
    pub fn namespace(key: impl Into<String>) -> Self {
        Self::new(key, FieldValue::Namespace)
    }

    /// Picks the best representation for an untyped value.
    ///
    /// Scalars, strings, bytes and durations get their dedicated kinds; `[u8]`
    /// is always treated as a binary blob. Anything else falls back to the
    /// structural representation.
    pub fn any<'a>(key: impl Into<String>, value: impl Into<Value<'a>>) -> Self {
        Self::new(key, value.into().into_field_value())
    }

    /// Structural representation of any serializable value.
    ///
    /// A value that fails to serialize is recorded as its error text.
    pub fn reflect<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Self {
        let value = match serde_json::to_value(value) {
            Ok(json) => FieldValue::Reflected(json),
            Err(e) => FieldValue::String(e.to_string()),
        };
        Self::new(key, value)
    }

    /// Error rendered through its `Display` impl.
    pub fn named_error<E: fmt::Display + ?Sized>(key: impl Into<String>, err: &E) -> Self {
        Self::string(key, err.to_string())
    }

    /// Error under the conventional `error` key.
    pub fn error<E: fmt::Display + ?Sized>(err: &E) -> Self {
        Self::named_error("error", err)
    }

    /// Like [`Field::named_error`], rendering [`NIL_ERROR`] when there is no error.
    pub fn optional_error<E: fmt::Display + ?Sized>(
        key: impl Into<String>,
        err: Option<&E>,
    ) -> Self {
        match err {
            Some(err) => Self::named_error(key, err),
            None => Self::string(key, NIL_ERROR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct User {
        id: u64,
        name: &'static str,
    }

    impl ObjectMarshaler for User {
        fn marshal_log_object(&self, enc: &mut dyn ObjectEncoder) -> Result<()> {
            enc.add_u64("id", self.id)?;
            enc.add_str("name", self.name)
        }
    }

    #[test]
    fn test_typed_constructors() {
        assert_eq!(Field::bool("ok", true).kind(), FieldKind::Bool);
        assert_eq!(Field::int64("n", -3).value(), &FieldValue::Int64(-3));
        assert_eq!(Field::uint64("n", 3).value(), &FieldValue::Uint64(3));
        assert_eq!(Field::binary("blob", vec![0u8, 1]).kind(), FieldKind::Binary);
        assert_eq!(Field::byte_string("text", "hé").kind(), FieldKind::ByteString);
        assert_eq!(Field::namespace("http").kind(), FieldKind::Namespace);
    }

    #[test]
    fn test_any_dispatch() {
        assert_eq!(Field::any("b", true).value(), &FieldValue::Bool(true));
        assert_eq!(Field::any("i", 42).value(), &FieldValue::Int64(42));
        assert_eq!(Field::any("u", 42u64).value(), &FieldValue::Uint64(42));
        assert_eq!(
            Field::any("s", "text").value(),
            &FieldValue::String("text".to_string())
        );
        assert_eq!(Field::any("bytes", &b"raw"[..]).kind(), FieldKind::Binary);
        assert_eq!(
            Field::any("d", Duration::from_millis(5)).kind(),
            FieldKind::Duration
        );
    }

    #[test]
    fn test_reflect_fallback() {
        #[derive(Serialize)]
        struct Point {
            x: i32,
            y: i32,
        }

        let field = Field::reflect("point", &Point { x: 1, y: 2 });
        assert_eq!(
            field.value(),
            &FieldValue::Reflected(serde_json::json!({"x": 1, "y": 2}))
        );
    }

    #[test]
    fn test_optional_error_placeholder() {
        let missing: Option<&std::io::Error> = None;
        let field = Field::optional_error("error", missing);
        assert_eq!(field.value().as_str(), Some(NIL_ERROR));

        let io_err = std::io::Error::other("disk full");
        let field = Field::optional_error("error", Some(&io_err));
        assert_eq!(field.value().as_str(), Some("disk full"));
    }

    #[test]
    fn test_object_is_lazy_and_shared_on_clone() {
        let field = Field::object("user", User { id: 7, name: "ann" });
        let copy = field.clone();
        assert_eq!(field, copy);
        assert_eq!(field.kind(), FieldKind::ObjectMarshaler);

        let other = Field::object("user", User { id: 7, name: "ann" });
        assert_ne!(field, other);
    }

    #[test]
    fn test_display() {
        assert_eq!(Field::binary("b", vec![1u8, 2, 3]).value().to_string(), "AQID");
        assert_eq!(Field::byte_string("t", "abc").value().to_string(), "abc");
        assert_eq!(FieldValue::Null.to_string(), "null");
    }
}
