//! Dotted-path access into a JSON subject
//!
//! A path such as `address.city` is resolved one segment at a time. Every
//! parent segment must resolve to an object before the leaf is read:
//!
//! - a missing or `null` parent makes the leaf unset;
//! - a parent of any other kind is a structural mismatch and an error.

use serde_json::Value;

use crate::error::SubjectError;
use crate::rule::PATH_SEPARATOR;

/// Path reported when the subject itself is not an object.
pub const ROOT_PATH: &str = "$";

/// Resolves `path` against `subject`.
///
/// Returns `Ok(None)` when the leaf or any parent is missing or `null`.
pub fn resolve<'v>(subject: &'v Value, path: &str) -> Result<Option<&'v Value>, SubjectError> {
    let Value::Object(root) = subject else {
        return Err(SubjectError::NotAnObject {
            path: ROOT_PATH.to_owned(),
            found: kind_name(subject),
        });
    };

    let mut current = root;
    let mut segments = path.split(PATH_SEPARATOR).peekable();
    let mut consumed = 0;

    while let Some(segment) = segments.next() {
        consumed += segment.len();
        let value = match current.get(segment) {
            None | Some(Value::Null) => return Ok(None),
            Some(value) => value,
        };

        if segments.peek().is_none() {
            return Ok(Some(value));
        }

        match value {
            Value::Object(next) => current = next,
            other => {
                return Err(SubjectError::NotAnObject {
                    path: path[..consumed].to_owned(),
                    found: kind_name(other),
                });
            }
        }
        consumed += PATH_SEPARATOR.len_utf8();
    }

    Ok(None)
}

/// Human readable kind of a JSON value, used in error messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_f64() => "a floating-point number",
        Value::Number(n) if n.is_u64() && !n.is_i64() => {
            "an integer outside the signed 64-bit range"
        }
        Value::Number(_) => "an integer",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Builds a [`SubjectError::TypeMismatch`] for the value found at `path`.
pub(crate) fn mismatch(path: &str, expected: &'static str, found: &Value) -> SubjectError {
    SubjectError::TypeMismatch {
        path: path.to_owned(),
        expected,
        found: kind_name(found),
    }
}
