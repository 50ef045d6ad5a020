//! The default conversion policy: raw transport values to typed values.
//!
//! A single exhaustive dispatch over [`TypeCategory`]. Sources may override
//! the whole policy per field via
//! [`Source::cast`](crate::decode::Source::cast); this module is only the
//! fallback.

use thiserror::Error;

use crate::field::{ElementCategory, TypeCategory};
use crate::value::{RawValue, Value};

/// A field's raw value could not be converted to its target type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// The text does not parse as the expected literal kind.
    #[error("malformed {expected} literal: {input:?}")]
    Malformed {
        /// What the text was expected to be.
        expected: &'static str,
        /// The offending input.
        input: String,
    },

    /// The value parsed but does not fit the target field's width.
    #[error("value {input} is out of range for the target field")]
    OutOfRange {
        /// The offending value, rendered.
        input: String,
    },

    /// A custom field type's own parser failed; its message is surfaced
    /// unchanged.
    #[error("{0}")]
    Parse(String),

    /// The raw value's representation does not satisfy the target category.
    #[error("expected {expected}, got {actual}")]
    Mismatch {
        /// The expected representation.
        expected: &'static str,
        /// The actual representation.
        actual: &'static str,
    },

    /// The record has no field at the given index.
    #[error("record has no field at index {0}")]
    UnknownField(usize),
}

impl ConvertError {
    pub(crate) fn malformed(expected: &'static str, input: &str) -> Self {
        ConvertError::Malformed {
            expected,
            input: input.to_string(),
        }
    }

    /// An out-of-range narrowing failure.
    pub fn out_of_range(input: impl std::fmt::Display) -> Self {
        ConvertError::OutOfRange {
            input: input.to_string(),
        }
    }

    /// Wrap a custom parser's error, surfacing its message unchanged.
    pub fn parse_failure(error: impl std::fmt::Display) -> Self {
        ConvertError::Parse(error.to_string())
    }

    pub(crate) const fn mismatch(expected: &'static str, actual: &'static str) -> Self {
        ConvertError::Mismatch { expected, actual }
    }
}

/// Convert a raw value to a typed value according to the default policy.
///
/// - `Str`: identity on text.
/// - `Int`/`UInt`/`Float`: standard numeric-literal parsing at the widest
///   width; narrower field widths are range-checked by the record accessor.
/// - `Bool`: exactly `"true"` or `"false"`.
/// - `List(_)`: the text splits on `','` with no escaping; the empty string
///   yields an empty list; each substring converts independently.
/// - `Blob`: the raw value must already be a file part.
/// - `Parse`: the text passes through for the field type's own `FromStr`,
///   invoked by the record accessor.
///
/// # Errors
///
/// Returns a [`ConvertError`] describing the first failing conversion.
pub fn convert(raw: RawValue<'_>, category: TypeCategory) -> Result<Value, ConvertError> {
    match category {
        TypeCategory::Blob => match raw {
            RawValue::Blob(part) => Ok(Value::Blob(part)),
            RawValue::Text(_) => Err(ConvertError::mismatch("file part", "text")),
        },
        TypeCategory::Str => Ok(Value::Str(text_of(raw, "text")?.into_owned())),
        TypeCategory::Int => convert_element(&text_of(raw, "integer")?, ElementCategory::Int),
        TypeCategory::UInt => {
            convert_element(&text_of(raw, "unsigned integer")?, ElementCategory::UInt)
        },
        TypeCategory::Float => convert_element(&text_of(raw, "float")?, ElementCategory::Float),
        TypeCategory::Bool => convert_element(&text_of(raw, "boolean")?, ElementCategory::Bool),
        TypeCategory::Parse => Ok(Value::Str(text_of(raw, "text")?.into_owned())),
        TypeCategory::List(element) => {
            let text = text_of(raw, "list")?;
            if text.is_empty() {
                return Ok(Value::List(Vec::new()));
            }
            let mut items = Vec::new();
            for part in text.split(',') {
                items.push(convert_element(part, element)?);
            }
            Ok(Value::List(items))
        },
    }
}

fn text_of<'a>(
    raw: RawValue<'a>,
    expected: &'static str,
) -> Result<std::borrow::Cow<'a, str>, ConvertError> {
    match raw {
        RawValue::Text(text) => Ok(text),
        RawValue::Blob(_) => Err(ConvertError::mismatch(expected, "file part")),
    }
}

fn convert_element(text: &str, element: ElementCategory) -> Result<Value, ConvertError> {
    match element {
        ElementCategory::Str | ElementCategory::Parse => Ok(Value::Str(text.to_string())),
        ElementCategory::Int => text
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ConvertError::malformed("integer", text)),
        ElementCategory::UInt => text
            .parse::<u64>()
            .map(Value::UInt)
            .map_err(|_| ConvertError::malformed("unsigned integer", text)),
        ElementCategory::Float => text
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ConvertError::malformed("float", text)),
        ElementCategory::Bool => match text {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            other => Err(ConvertError::malformed("boolean", other)),
        },
    }
}
