//! Record encoders
//!
//! Two line encodings are provided: [`JsonEncoder`] writes one JSON object
//! per record, [`ConsoleEncoder`] writes tab-separated metadata followed by
//! the fields as a JSON object. Both read their keys and value layouts from
//! an [`EncoderConfig`]; an empty key omits that element.
//!
//! A top-level field whose key matches a record element is written under
//! `fields.<key>` so it cannot replace the record's own metadata.

use super::entry::{Caller, Entry};
use super::error::{LoggerError, Result};
use super::field::{ArrayEncoder, Field, FieldValue, ObjectEncoder, ObjectMarshaler};
use super::level::Level;
use super::timestamp::TimestampFormat;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;
use std::time::Duration;

/// Prefix for top-level field keys that collide with a record element.
pub const SHADOWED_FIELD_PREFIX: &str = "fields.";

/// Line encoding of a core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Json,
    Console,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelEncoding {
    /// `info`
    #[default]
    Lowercase,
    /// `INFO`
    Capital,
    /// `info`, coloured when the `console` feature is on.
    LowercaseColor,
    /// `INFO`, coloured when the `console` feature is on.
    CapitalColor,
}

impl LevelEncoding {
    pub fn encode(&self, level: Level) -> String {
        match self {
            LevelEncoding::Lowercase => level.to_lowercase_str().to_string(),
            LevelEncoding::Capital => level.to_str().to_string(),
            LevelEncoding::LowercaseColor => colorize(level.to_lowercase_str(), level),
            LevelEncoding::CapitalColor => colorize(level.to_str(), level),
        }
    }
}

#[cfg(feature = "console")]
fn colorize(text: &str, level: Level) -> String {
    use colored::Colorize;
    text.color(level.color_code()).to_string()
}

#[cfg(not(feature = "console"))]
fn colorize(text: &str, _level: Level) -> String {
    text.to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationEncoding {
    /// Floating-point seconds.
    #[default]
    Seconds,
    /// Floating-point milliseconds.
    Millis,
    /// Integer nanoseconds.
    Nanos,
    /// Human-readable, e.g. `1.5s`.
    String,
}

impl DurationEncoding {
    pub fn encode(&self, d: &Duration) -> JsonValue {
        match self {
            DurationEncoding::Seconds => float_json(d.as_secs_f64()),
            DurationEncoding::Millis => float_json(d.as_secs_f64() * 1_000.0),
            DurationEncoding::Nanos => u64::try_from(d.as_nanos()).unwrap_or(u64::MAX).into(),
            DurationEncoding::String => JsonValue::String(format!("{:?}", d)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallerEncoding {
    /// Last directory and file name.
    #[default]
    Short,
    /// Path as recorded by the compiler.
    Full,
}

impl CallerEncoding {
    pub fn encode(&self, caller: &Caller) -> String {
        match self {
            CallerEncoding::Short => caller.short(),
            CallerEncoding::Full => caller.full(),
        }
    }
}

/// Keys and value layouts used by the encoders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub time_key: String,
    pub level_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub message_key: String,
    pub stacktrace_key: String,
    pub line_ending: String,
    /// Separator between console elements.
    pub console_separator: String,
    pub level_encoding: LevelEncoding,
    pub time_format: TimestampFormat,
    pub duration_encoding: DurationEncoding,
    pub caller_encoding: CallerEncoding,
}

impl EncoderConfig {
    /// Machine-oriented preset: long keys, lowercase levels, ISO-8601 time,
    /// durations in seconds.
    pub fn production() -> Self {
        Self {
            time_key: "time".to_string(),
            level_key: "level".to_string(),
            name_key: "logger".to_string(),
            caller_key: "caller".to_string(),
            message_key: "message".to_string(),
            stacktrace_key: "stacktrace".to_string(),
            line_ending: "\n".to_string(),
            console_separator: "\t".to_string(),
            level_encoding: LevelEncoding::Lowercase,
            time_format: TimestampFormat::Iso8601,
            duration_encoding: DurationEncoding::Seconds,
            caller_encoding: CallerEncoding::Short,
        }
    }

    /// Human-oriented preset: one-letter keys, capital levels, a plain
    /// date-time layout and readable durations.
    pub fn development() -> Self {
        Self {
            time_key: "T".to_string(),
            level_key: "L".to_string(),
            name_key: "N".to_string(),
            caller_key: "C".to_string(),
            message_key: "M".to_string(),
            stacktrace_key: "S".to_string(),
            line_ending: "\n".to_string(),
            console_separator: "\t".to_string(),
            level_encoding: LevelEncoding::Capital,
            time_format: TimestampFormat::Custom("%Y-%m-%d %H:%M:%S".to_string()),
            duration_encoding: DurationEncoding::String,
            caller_encoding: CallerEncoding::Short,
        }
    }

    /// Whether `key` names one of the record elements this config writes.
    pub fn is_record_key(&self, key: &str) -> bool {
        !key.is_empty()
            && [
                &self.time_key,
                &self.level_key,
                &self.name_key,
                &self.caller_key,
                &self.message_key,
                &self.stacktrace_key,
            ]
            .iter()
            .any(|k| k.as_str() == key)
    }

    pub fn validate(&self) -> Result<()> {
        if self.message_key.is_empty() {
            return Err(LoggerError::config(
                "EncoderConfig",
                "message key must not be empty",
            ));
        }

        let keys = [
            &self.time_key,
            &self.level_key,
            &self.name_key,
            &self.caller_key,
            &self.message_key,
            &self.stacktrace_key,
        ];
        for (i, key) in keys.iter().enumerate() {
            if !key.is_empty() && keys[i + 1..].contains(key) {
                return Err(LoggerError::config(
                    "EncoderConfig",
                    format!("key '{}' is used for more than one record element", key),
                ));
            }
        }

        if let Some(layout) = self.time_format.invalid_layout() {
            return Err(LoggerError::config(
                "EncoderConfig",
                format!("time layout '{}' has an unknown specifier", layout),
            ));
        }
        Ok(())
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::production()
    }
}

/// Turns a record and its fields into the bytes of one output line.
pub trait Encoder: Send + Sync {
    /// `context` holds the fields accumulated through `with`, `fields` the
    /// fields of this call. Context fields are encoded first.
    fn encode(&self, entry: &Entry, context: &[Field], fields: &[Field]) -> Result<Vec<u8>>;

    fn config(&self) -> &EncoderConfig;
}

pub fn new_encoder(encoding: Encoding, config: EncoderConfig) -> Arc<dyn Encoder> {
    match encoding {
        Encoding::Json => Arc::new(JsonEncoder::new(config)),
        Encoding::Console => Arc::new(ConsoleEncoder::new(config)),
    }
}

#[derive(Debug, Clone, Default)]
pub struct JsonEncoder {
    config: EncoderConfig,
}

impl JsonEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, entry: &Entry, context: &[Field], fields: &[Field]) -> Result<Vec<u8>> {
        let c = &self.config;
        let mut record = Map::new();

        insert_keyed(&mut record, &c.time_key, c.time_format.to_json(&entry.time));
        insert_keyed(
            &mut record,
            &c.level_key,
            JsonValue::String(c.level_encoding.encode(entry.level)),
        );
        if let Some(name) = &entry.logger_name {
            insert_keyed(&mut record, &c.name_key, JsonValue::String(name.clone()));
        }
        if let Some(caller) = &entry.caller {
            insert_keyed(
                &mut record,
                &c.caller_key,
                JsonValue::String(c.caller_encoding.encode(caller)),
            );
        }
        insert_keyed(&mut record, &c.message_key, JsonValue::String(entry.message.clone()));

        for (key, value) in encode_field_map(context.iter().chain(fields), c) {
            if c.is_record_key(&key) {
                record.insert(format!("{}{}", SHADOWED_FIELD_PREFIX, key), value);
            } else {
                record.insert(key, value);
            }
        }

        if let Some(stack) = &entry.stack {
            insert_keyed(&mut record, &c.stacktrace_key, JsonValue::String(stack.clone()));
        }

        let mut line = serde_json::to_vec(&JsonValue::Object(record))?;
        line.extend_from_slice(c.line_ending.as_bytes());
        Ok(line)
    }

    fn config(&self) -> &EncoderConfig {
        &self.config
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConsoleEncoder {
    config: EncoderConfig,
}

impl ConsoleEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }
}

impl Encoder for ConsoleEncoder {
    fn encode(&self, entry: &Entry, context: &[Field], fields: &[Field]) -> Result<Vec<u8>> {
        let c = &self.config;
        let mut parts: Vec<String> = Vec::with_capacity(6);

        if !c.time_key.is_empty() {
            parts.push(c.time_format.format(&entry.time));
        }
        if !c.level_key.is_empty() {
            parts.push(c.level_encoding.encode(entry.level));
        }
        if let Some(name) = entry.logger_name.as_ref().filter(|_| !c.name_key.is_empty()) {
            parts.push(name.clone());
        }
        if let Some(caller) = entry.caller.as_ref().filter(|_| !c.caller_key.is_empty()) {
            parts.push(c.caller_encoding.encode(caller));
        }
        if !c.message_key.is_empty() {
            parts.push(entry.message.clone());
        }

        let encoded = encode_field_map(context.iter().chain(fields), c);
        if !encoded.is_empty() {
            parts.push(serde_json::to_string(&JsonValue::Object(encoded))?);
        }

        let mut line = parts.join(&c.console_separator);
        if let Some(stack) = entry.stack.as_ref().filter(|_| !c.stacktrace_key.is_empty()) {
            line.push('\n');
            line.push_str(stack);
        }
        line.push_str(&c.line_ending);
        Ok(line.into_bytes())
    }

    fn config(&self) -> &EncoderConfig {
        &self.config
    }
}

/// Encode `fields` into a JSON map, honouring namespaces.
pub fn encode_fields(fields: &[Field], config: &EncoderConfig) -> Map<String, JsonValue> {
    encode_field_map(fields.iter(), config)
}

fn encode_field_map<'f>(
    fields: impl Iterator<Item = &'f Field>,
    config: &EncoderConfig,
) -> Map<String, JsonValue> {
    let mut builder = FieldMapBuilder::new(config);
    for field in fields {
        builder.add(field.key(), field.value());
    }
    builder.finish()
}

fn insert_keyed(record: &mut Map<String, JsonValue>, key: &str, value: JsonValue) {
    if !key.is_empty() {
        record.insert(key.to_string(), value);
    }
}

/// Builds a JSON map from fields. A namespace field opens a nested map that
/// receives every later field until [`FieldMapBuilder::finish`].
struct FieldMapBuilder<'c> {
    config: &'c EncoderConfig,
    open: Vec<(String, Map<String, JsonValue>)>,
    current: Map<String, JsonValue>,
}

impl<'c> FieldMapBuilder<'c> {
    fn new(config: &'c EncoderConfig) -> Self {
        Self {
            config,
            open: Vec::new(),
            current: Map::new(),
        }
    }

    fn add(&mut self, key: &str, value: &FieldValue) {
        if let FieldValue::Namespace = value {
            let outer = std::mem::take(&mut self.current);
            self.open.push((key.to_string(), outer));
            return;
        }

        match encode_value(value, self.config) {
            Ok(json) => {
                self.current.insert(key.to_string(), json);
            }
            Err(e) => {
                self.current
                    .insert(format!("{}Error", key), JsonValue::String(e.to_string()));
            }
        }
    }

    fn finish(mut self) -> Map<String, JsonValue> {
        while let Some((key, mut outer)) = self.open.pop() {
            outer.insert(key, JsonValue::Object(self.current));
            self.current = outer;
        }
        self.current
    }
}

impl ObjectEncoder for FieldMapBuilder<'_> {
    fn add_value(&mut self, key: &str, value: &FieldValue) -> Result<()> {
        self.add(key, value);
        Ok(())
    }
}

struct JsonArrayBuilder<'c> {
    config: &'c EncoderConfig,
    items: Vec<JsonValue>,
}

impl ArrayEncoder for JsonArrayBuilder<'_> {
    fn append_value(&mut self, value: &FieldValue) -> Result<()> {
        self.items.push(encode_value(value, self.config)?);
        Ok(())
    }

    fn append_object(&mut self, object: &dyn ObjectMarshaler) -> Result<()> {
        let mut nested = FieldMapBuilder::new(self.config);
        object.marshal_log_object(&mut nested)?;
        self.items.push(JsonValue::Object(nested.finish()));
        Ok(())
    }
}

/// JSON form of a single payload. Fails only when a marshaler fails.
fn encode_value(value: &FieldValue, config: &EncoderConfig) -> Result<JsonValue> {
    let json = match value {
        FieldValue::Null => JsonValue::Null,
        FieldValue::Bool(b) => JsonValue::Bool(*b),
        FieldValue::Int64(i) => (*i).into(),
        FieldValue::Uint64(u) => (*u).into(),
        FieldValue::Float64(f) => float_json(*f),
        FieldValue::String(s) => JsonValue::String(s.clone()),
        FieldValue::Binary(b) => {
            JsonValue::String(base64::engine::general_purpose::STANDARD.encode(b))
        }
        FieldValue::ByteString(b) => JsonValue::String(String::from_utf8_lossy(b).into_owned()),
        FieldValue::Duration(d) => config.duration_encoding.encode(d),
        FieldValue::Time(t) => config.time_format.to_json(t),
        FieldValue::Object(obj) => {
            let mut nested = FieldMapBuilder::new(config);
            obj.marshal_log_object(&mut nested)?;
            JsonValue::Object(nested.finish())
        }
        FieldValue::Array(arr) => {
            let mut nested = JsonArrayBuilder {
                config,
                items: Vec::new(),
            };
            arr.marshal_log_array(&mut nested)?;
            JsonValue::Array(nested.items)
        }
        FieldValue::Namespace => JsonValue::Object(Map::new()),
        FieldValue::Reflected(v) => v.clone(),
    };
    Ok(json)
}

fn float_json(f: f64) -> JsonValue {
    match serde_json::Number::from_f64(f) {
        Some(n) => JsonValue::Number(n),
        None if f.is_nan() => JsonValue::String("NaN".to_string()),
        None if f > 0.0 => JsonValue::String("+Inf".to_string()),
        None => JsonValue::String("-Inf".to_string()),
    }
}
