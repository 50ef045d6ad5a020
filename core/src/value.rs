//! Raw and typed value representations used by the transcoding engine.
//!
//! Two value layers exist on the decode path:
//!
//! - [`RawValue`] is what a [`Source`](crate::decode::Source) yields: text
//!   borrowed from the underlying transport, or an opaque file part. Raw
//!   values are ephemeral and owned by the adapter.
//! - [`Value`] is the typed intermediate the conversion policy produces and
//!   the generated record accessors consume. Numeric variants carry the
//!   widest width; narrowing to the actual field type is range-checked in
//!   [`FromValue`].
//!
//! On the encode path the generated accessors produce a [`Value`] per field,
//! and sinks render it to canonical, locale-independent text.

use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;

use crate::convert::ConvertError;

/// An opaque multipart file part.
///
/// The payload is a [`Bytes`] buffer, so cloning a `FilePart` is cheap and
/// does not copy the file contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilePart {
    /// The part name the file was submitted under.
    pub name: String,

    /// The original client-side file name, if the transport carried one.
    pub file_name: Option<String>,

    /// The declared media type, if the transport carried one.
    pub content_type: Option<String>,

    /// The file contents.
    pub data: Bytes,
}

impl FilePart {
    /// Create a file part from a name and its contents.
    #[must_use]
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            content_type: None,
            data: data.into(),
        }
    }

    /// Attach the client-side file name.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Attach the declared media type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Size of the file contents in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the file contents are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Display for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FilePart {{ name: {}, size: {} bytes }}", self.name, self.data.len())
    }
}

/// A value as retrieved from a source, before any conversion.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue<'a> {
    /// Textual data, possibly borrowed from the adapter.
    Text(Cow<'a, str>),

    /// An opaque file part, passed through without textual conversion.
    Blob(FilePart),
}

impl<'a> RawValue<'a> {
    /// Wrap borrowed text.
    #[must_use]
    pub const fn text(text: &'a str) -> Self {
        RawValue::Text(Cow::Borrowed(text))
    }

    /// Wrap owned text.
    #[must_use]
    pub const fn owned_text(text: String) -> Self {
        RawValue::Text(Cow::Owned(text))
    }

    /// The textual content, if this raw value is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(text) => Some(text),
            RawValue::Blob(_) => None,
        }
    }
}

impl<'a> From<&'a str> for RawValue<'a> {
    fn from(text: &'a str) -> Self {
        RawValue::text(text)
    }
}

impl From<String> for RawValue<'_> {
    fn from(text: String) -> Self {
        RawValue::owned_text(text)
    }
}

/// A typed value produced by the conversion policy and consumed by record
/// accessors.
///
/// This is the closed tagged representation the engine dispatches over: one
/// variant per [`TypeCategory`](crate::field::TypeCategory), with numeric
/// variants at their widest width.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Text.
    Str(String),

    /// Signed integer, widest width.
    Int(i64),

    /// Unsigned integer, widest width.
    UInt(u64),

    /// Floating point, widest width.
    Float(f64),

    /// Boolean.
    Bool(bool),

    /// Opaque file part.
    Blob(FilePart),

    /// Ordered sequence of element values.
    List(Vec<Value>),
}

impl Value {
    /// Render this value as canonical, locale-independent text.
    ///
    /// Lists re-join their rendered elements with `','`; this is lossy for
    /// elements that themselves contain commas, which the comma-delimited
    /// wire format cannot represent. Returns `None` for file parts, which
    /// have no textual representation.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        match self {
            Value::Str(text) => Some(text.clone()),
            Value::Int(n) => Some(n.to_string()),
            Value::UInt(n) => Some(n.to_string()),
            Value::Float(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Blob(_) => None,
            Value::List(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    parts.push(item.render()?);
                }
                Some(parts.join(","))
            },
        }
    }

    /// A short name for the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "text",
            Value::Int(_) => "integer",
            Value::UInt(_) => "unsigned integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Blob(_) => "file part",
            Value::List(_) => "list",
        }
    }

    /// Extract text.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Mismatch`] if this value is not text.
    pub fn into_text(self) -> Result<String, ConvertError> {
        match self {
            Value::Str(text) => Ok(text),
            other => Err(ConvertError::mismatch("text", other.kind())),
        }
    }

    /// Extract a signed integer, accepting unsigned values in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Mismatch`] for non-integer values and
    /// [`ConvertError::OutOfRange`] for unsigned values above `i64::MAX`.
    pub fn into_int(self) -> Result<i64, ConvertError> {
        match self {
            Value::Int(n) => Ok(n),
            Value::UInt(n) => i64::try_from(n).map_err(|_| ConvertError::out_of_range(n)),
            other => Err(ConvertError::mismatch("integer", other.kind())),
        }
    }

    /// Extract an unsigned integer, accepting non-negative signed values.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Mismatch`] for non-integer values and
    /// [`ConvertError::OutOfRange`] for negative signed values.
    pub fn into_uint(self) -> Result<u64, ConvertError> {
        match self {
            Value::UInt(n) => Ok(n),
            Value::Int(n) => u64::try_from(n).map_err(|_| ConvertError::out_of_range(n)),
            other => Err(ConvertError::mismatch("unsigned integer", other.kind())),
        }
    }

    /// Extract a float, accepting integer values.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Mismatch`] for non-numeric values.
    #[allow(clippy::cast_precision_loss)]
    pub fn into_float(self) -> Result<f64, ConvertError> {
        match self {
            Value::Float(n) => Ok(n),
            Value::Int(n) => Ok(n as f64),
            Value::UInt(n) => Ok(n as f64),
            other => Err(ConvertError::mismatch("float", other.kind())),
        }
    }

    /// Extract a boolean.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Mismatch`] if this value is not a boolean.
    pub fn into_bool(self) -> Result<bool, ConvertError> {
        match self {
            Value::Bool(b) => Ok(b),
            other => Err(ConvertError::mismatch("boolean", other.kind())),
        }
    }

    /// Extract a file part.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Mismatch`] if this value is not a file part.
    pub fn into_blob(self) -> Result<FilePart, ConvertError> {
        match self {
            Value::Blob(part) => Ok(part),
            other => Err(ConvertError::mismatch("file part", other.kind())),
        }
    }

    /// Extract a list of element values.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Mismatch`] if this value is not a list.
    pub fn into_list(self) -> Result<Vec<Value>, ConvertError> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(ConvertError::mismatch("list", other.kind())),
        }
    }
}

/// Conversion from the typed intermediate into a concrete field type.
///
/// Implemented for every field type the engine supports natively. Types that
/// participate through their own string parsing (`FromStr`) do not implement
/// this trait; the derive macro emits the parse call directly instead.
pub trait FromValue: Sized {
    /// Convert a [`Value`] into `Self`, range-checking where narrowing.
    ///
    /// # Errors
    ///
    /// Returns a [`ConvertError`] on representation mismatch or when the
    /// value does not fit the target width.
    fn from_value(value: Value) -> Result<Self, ConvertError>;
}

/// Conversion from a concrete field type into the typed intermediate.
///
/// The inverse of [`FromValue`], used by the generated `read_field`
/// accessors on the encode path.
pub trait IntoValue {
    /// Convert `self` into a [`Value`].
    fn into_value(self) -> Value;
}

macro_rules! impl_signed {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ConvertError> {
                    let wide = value.into_int()?;
                    <$ty>::try_from(wide).map_err(|_| ConvertError::out_of_range(wide))
                }
            }

            impl IntoValue for $ty {
                #[allow(clippy::cast_possible_wrap, clippy::cast_lossless, clippy::unnecessary_cast)]
                fn into_value(self) -> Value {
                    Value::Int(self as i64)
                }
            }
        )*
    };
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ConvertError> {
                    let wide = value.into_uint()?;
                    <$ty>::try_from(wide).map_err(|_| ConvertError::out_of_range(wide))
                }
            }

            impl IntoValue for $ty {
                #[allow(clippy::cast_lossless, clippy::unnecessary_cast)]
                fn into_value(self) -> Value {
                    Value::UInt(self as u64)
                }
            }
        )*
    };
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        value.into_float()
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl FromValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        Ok(value.into_float()? as f32)
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        value.into_bool()
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        value.into_text()
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl FromValue for FilePart {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        value.into_blob()
    }
}

impl IntoValue for FilePart {
    fn into_value(self) -> Value {
        Value::Blob(self)
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        let items = value.into_list()?;
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            out.push(T::from_value(item)?);
        }
        Ok(out)
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_scalars_canonically() {
        assert_eq!(Value::Str("en".to_string()).render().as_deref(), Some("en"));
        assert_eq!(Value::Int(-7).render().as_deref(), Some("-7"));
        assert_eq!(Value::UInt(42).render().as_deref(), Some("42"));
        assert_eq!(Value::Bool(true).render().as_deref(), Some("true"));
        assert_eq!(Value::Float(1.5).render().as_deref(), Some("1.5"));
    }

    #[test]
    fn render_joins_lists_with_commas() {
        let list = Value::List(vec![
            Value::Str("a".to_string()),
            Value::Str("b".to_string()),
            Value::Str("c".to_string()),
        ]);
        assert_eq!(list.render().as_deref(), Some("a,b,c"));
    }

    #[test]
    fn render_empty_list_is_empty_string() {
        assert_eq!(Value::List(Vec::new()).render().as_deref(), Some(""));
    }

    #[test]
    fn blobs_have_no_textual_representation() {
        let blob = Value::Blob(FilePart::new("avatar", &b"\x89PNG"[..]));
        assert!(blob.render().is_none());
    }

    #[test]
    fn narrowing_is_range_checked() {
        assert_eq!(u8::from_value(Value::UInt(200)), Ok(200));
        assert!(u8::from_value(Value::UInt(300)).is_err());
        assert!(u64::from_value(Value::Int(-1)).is_err());
        assert_eq!(i32::from_value(Value::UInt(7)), Ok(7));
    }

    #[test]
    fn vec_from_value_converts_each_element() {
        let value = Value::List(vec![Value::UInt(1), Value::UInt(2)]);
        assert_eq!(Vec::<u16>::from_value(value), Ok(vec![1, 2]));
    }

    #[test]
    fn mismatch_is_an_error() {
        assert!(String::from_value(Value::Bool(true)).is_err());
        assert!(bool::from_value(Value::Str("yes".to_string())).is_err());
    }

    #[test]
    fn file_part_clone_is_cheap_and_equal() {
        let part = FilePart::new("doc", &b"contents"[..])
            .with_file_name("doc.txt")
            .with_content_type("text/plain");
        let clone = part.clone();
        assert_eq!(part, clone);
        assert_eq!(clone.len(), 8);
        assert!(!clone.is_empty());
    }
}
