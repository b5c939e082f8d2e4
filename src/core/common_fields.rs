//! Fixed-key field constructors for keys that recur across services
//!
//! Using these instead of ad-hoc keys keeps dashboards and queries stable.

use super::field::Field;
use std::fmt;

pub const ERROR_KEY: &str = "error";

/// `error`: the error's `Display` form.
pub fn error<E: fmt::Display + ?Sized>(err: &E) -> Field {
    Field::named_error(ERROR_KEY, err)
}

/// `error`, or the `<nil>` placeholder when there is none.
pub fn optional_error<E: fmt::Display + ?Sized>(err: Option<&E>) -> Field {
    Field::optional_error(ERROR_KEY, err)
}

pub fn count(n: i64) -> Field {
    Field::int64("count", n)
}

pub fn query(q: impl Into<String>) -> Field {
    Field::string("query", q)
}

pub fn file(path: impl Into<String>) -> Field {
    Field::string("file", path)
}

/// Message-broker topic.
pub fn topic(name: impl Into<String>) -> Field {
    Field::string("topic", name)
}

pub fn partition(p: i32) -> Field {
    Field::int64("partition", i64::from(p))
}

pub fn offset(o: i64) -> Field {
    Field::int64("offset", o)
}

pub fn product_id(id: u64) -> Field {
    Field::uint64("product_id", id)
}

/// RPC or HTTP method name.
pub fn method(name: impl Into<String>) -> Field {
    Field::string("method", name)
}

pub fn action(name: impl Into<String>) -> Field {
    Field::string("action", name)
}
