//! Normalisation of keyed-call arguments into fields
//!
//! The scan is a three-state machine over the [`Arg`] slice:
//!
//! ```text
//! ExpectSlot ──Field──────────────▶ ExpectSlot            (append)
//! ExpectSlot ──Context────────────▶ ExpectSlot            (append trace id unless unknown)
//! ExpectSlot ──Value, not last────▶ HaveKeyAwaitingValue
//! ExpectSlot ──Value, last────────▶ Done                  (dangling key)
//! HaveKeyAwaitingValue ──any──────▶ ExpectSlot            (pair or invalid pair)
//! ```
//!
//! Malformed input never fails the scan. It is reported through
//! [`Normalized::dangling`] and [`Normalized::invalid`], and the logger turns
//! those into diagnostic records next to the record itself.

use super::args::{Arg, Value};
use super::error::Result;
use super::field::{ArrayEncoder, ArrayMarshaler, Field, FieldValue, ObjectEncoder, ObjectMarshaler};
use super::trace::{is_unknown_trace, trace_id};

/// Message of the diagnostic emitted for a trailing key without a value.
pub const DANGLING_KEY_MSG: &str = "Ignored key without a value.";

/// Message of the diagnostic emitted for pairs whose key is not a string.
pub const NON_STRING_KEY_MSG: &str = "Ignored key-value pairs with non-string keys.";

/// Key of the dangling-key diagnostic field.
pub const DANGLING_KEY_FIELD: &str = "ignored";

/// Key of the invalid-pairs diagnostic field.
pub const INVALID_PAIRS_FIELD: &str = "invalid";

/// A key/value pair rejected because its key is not a string.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidPair {
    /// Index of the key in the argument slice.
    pub position: usize,
    pub key: FieldValue,
    pub value: FieldValue,
}

impl ObjectMarshaler for InvalidPair {
    fn marshal_log_object(&self, enc: &mut dyn ObjectEncoder) -> Result<()> {
        enc.add_i64("position", self.position as i64)?;
        enc.add_value("key", &self.key)?;
        enc.add_value("value", &self.value)
    }
}

/// Invalid pairs of one call, in scan order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvalidPairs(Vec<InvalidPair>);

impl InvalidPairs {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[InvalidPair] {
        &self.0
    }
}

impl ArrayMarshaler for InvalidPairs {
    fn marshal_log_array(&self, enc: &mut dyn ArrayEncoder) -> Result<()> {
        // Keep appending after a failure so one bad pair doesn't hide the rest.
        let mut first_err = None;
        for pair in &self.0 {
            if let Err(e) = enc.append_object(pair) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// Outcome of one scan.
#[derive(Debug, Default)]
pub struct Normalized {
    /// Well-formed fields, in argument order.
    pub fields: Vec<Field>,
    /// The trailing key that had no value, if any.
    pub dangling: Option<FieldValue>,
    pub invalid: InvalidPairs,
}

impl Normalized {
    pub fn has_diagnostics(&self) -> bool {
        self.dangling.is_some() || !self.invalid.is_empty()
    }

    fn accept_pair(&mut self, position: usize, key: &Value<'_>, value: &Arg<'_>) {
        let value = pair_value(value);
        match key.as_key() {
            Some(key) => self.fields.push(Field::new(key, value)),
            None => self.invalid.0.push(InvalidPair {
                position,
                key: key.clone().into_field_value(),
                value,
            }),
        }
    }
}

enum ScanState<'s, 'a> {
    ExpectSlot,
    HaveKeyAwaitingValue { position: usize, key: &'s Value<'a> },
    Done,
}

/// Convert a keyed-call argument slice into fields plus diagnostics.
///
/// Runs in one pass without backtracking. A slice made only of fields comes
/// back unchanged and in order.
pub fn normalize(args: &[Arg<'_>]) -> Normalized {
    let mut out = Normalized {
        fields: Vec::with_capacity(args.len()),
        ..Normalized::default()
    };
    let last = args.len().saturating_sub(1);
    let mut state = ScanState::ExpectSlot;

    for (position, arg) in args.iter().enumerate() {
        state = match state {
            ScanState::Done => break,
            ScanState::ExpectSlot => match arg {
                Arg::Field(field) => {
                    out.fields.push(field.clone());
                    ScanState::ExpectSlot
                }
                Arg::Context(carrier) => {
                    let field = trace_id(*carrier);
                    if !is_unknown_trace(&field) {
                        out.fields.push(field);
                    }
                    ScanState::ExpectSlot
                }
                Arg::Value(value) if position == last => {
                    out.dangling = Some(value.clone().into_field_value());
                    ScanState::Done
                }
                Arg::Value(key) => ScanState::HaveKeyAwaitingValue { position, key },
            },
            ScanState::HaveKeyAwaitingValue { position: key_position, key } => {
                out.accept_pair(key_position, key, arg);
                ScanState::ExpectSlot
            }
        };
    }

    out
}

/// Payload contributed by whatever sits in value position.
fn pair_value(arg: &Arg<'_>) -> FieldValue {
    match arg {
        Arg::Value(value) => value.clone().into_field_value(),
        Arg::Field(field) => field.value().clone(),
        Arg::Context(carrier) => trace_id(*carrier).value().clone(),
    }
}
