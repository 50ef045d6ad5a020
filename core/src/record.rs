//! The `Record` capability implemented by transcodable types.
//!
//! `#[derive(Record)]` from `recast-macros` implements this trait by
//! classifying every field's declared type into a
//! [`TypeCategory`](crate::field::TypeCategory) and emitting a static field
//! table plus index-addressed accessors. Hand-written implementations are
//! possible but rarely needed; the plan builder validates their specs at
//! build time.

use crate::convert::ConvertError;
use crate::field::FieldSpec;
use crate::value::Value;

/// A strongly-typed composite value that can be populated from, or read
/// into, key-addressable external transports.
///
/// The engine never inspects a record's shape directly: everything it needs
/// is in the static [`FieldSpec`] table, and field access goes through the
/// positional `write_field`/`read_field` accessors.
///
/// # Example
///
/// ```ignore
/// use recast_macros::Record;
///
/// #[derive(Record, Default)]
/// struct Login {
///     #[recast(query = "email", form = "email")]
///     email: String,
///
///     #[recast(cookie = "token", cookie_path = "/", cookie_secure)]
///     token: String,
///
///     #[recast(query = "tags")]
///     tags: Vec<String>,
/// }
/// ```
pub trait Record {
    /// The static per-field metadata table for this type.
    ///
    /// The table depends only on the type, never on instance data, and its
    /// order defines plan order.
    fn field_specs() -> &'static [FieldSpec]
    where
        Self: Sized;

    /// Assign a converted value into the field at `index`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConvertError`] when the value does not fit the field's
    /// type (representation mismatch, out-of-range narrowing, or a failing
    /// `FromStr` for custom field types), or when `index` does not name a
    /// field.
    fn write_field(&mut self, index: usize, value: Value) -> Result<(), ConvertError>;

    /// Read the field at `index` as a typed value.
    ///
    /// Returns `None` when `index` does not name a field.
    fn read_field(&self, index: usize) -> Option<Value>;
}
