//! The decode driver: populate a record's fields from a source.
//!
//! Decoding is a synchronous traversal of a field plan. For every descriptor
//! in plan order the driver resolves a raw value from the source, converts
//! it (via the source's [`Source::cast`] override when present, else the
//! default policy), and assigns it into the record. Absent keys leave fields
//! untouched; the first conversion failure stops the traversal.

use thiserror::Error;

use crate::convert::{convert, ConvertError};
use crate::field::{FieldDescriptor, Namespace, TypeCategory};
use crate::plan::{plan_for, FieldPlan, PlanError};
use crate::record::Record;
use crate::value::{RawValue, Value};

/// A source adapter's own data-retrieval mechanism failed.
///
/// Raised by adapter constructors (malformed query string, undecodable
/// form body), never by the engine itself, and propagated unchanged.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The underlying transport data could not be parsed.
    #[error("malformed {what}: {detail}")]
    Malformed {
        /// What was being parsed.
        what: &'static str,
        /// Adapter-specific detail.
        detail: String,
    },
}

impl SourceError {
    /// A malformed-transport-data error.
    pub fn malformed(what: &'static str, detail: impl Into<String>) -> Self {
        SourceError::Malformed {
            what,
            detail: detail.into(),
        }
    }
}

/// The decode-side capability a transport adapter exposes to the engine.
pub trait Source {
    /// Resolve the raw value for `key`, or `None` if the source has no
    /// entry for it. Absence is not an error.
    fn get(&self, key: &str) -> Option<RawValue<'_>>;

    /// Optional per-source conversion override.
    ///
    /// When this returns `Some`, the outcome fully replaces the default
    /// conversion policy for that field — including its failure. The
    /// default implementation declines.
    fn cast(
        &self,
        raw: &RawValue<'_>,
        category: TypeCategory,
    ) -> Option<Result<Value, ConvertError>> {
        let _ = (raw, category);
        None
    }
}

/// Decoding failed.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The record type's field table could not be planned.
    #[error("failed to build field plan: {0}")]
    Plan(#[from] PlanError),

    /// A field's raw value could not be converted; fields written before
    /// this one remain set.
    #[error("field {field:?} (key {key:?}): {source}")]
    Field {
        /// The failing field's name.
        field: &'static str,
        /// The source key the value was resolved under.
        key: &'static str,
        /// The underlying conversion failure.
        #[source]
        source: ConvertError,
    },
}

impl DecodeError {
    fn field(descriptor: &FieldDescriptor, source: ConvertError) -> Self {
        DecodeError::Field {
            field: descriptor.name,
            key: descriptor.key,
            source,
        }
    }
}

/// Decode `namespace`-tagged fields of `record` from `source`, using the
/// cached plan for `T`.
///
/// Fail-fast and non-transactional: on error, fields already assigned stay
/// assigned. Callers needing atomicity decode into a fresh `Default` record
/// and discard it on error.
///
/// # Errors
///
/// Returns a [`DecodeError`] naming the first failing field, or the plan
/// failure for malformed hand-written field tables.
pub fn decode<S, T>(source: &S, record: &mut T, namespace: Namespace) -> Result<(), DecodeError>
where
    S: Source + ?Sized,
    T: Record + 'static,
{
    let plan = plan_for::<T>(namespace)?;
    decode_with_plan(source, record, &plan)
}

/// Decode against an explicit plan, for callers that hold one.
///
/// # Errors
///
/// Returns a [`DecodeError`] naming the first failing field.
pub fn decode_with_plan<S, T>(
    source: &S,
    record: &mut T,
    plan: &FieldPlan,
) -> Result<(), DecodeError>
where
    S: Source + ?Sized,
    T: Record,
{
    for descriptor in plan.fields() {
        let Some(raw) = source.get(descriptor.key) else {
            continue;
        };
        let value = match source.cast(&raw, descriptor.category) {
            Some(outcome) => outcome,
            None => convert(raw, descriptor.category),
        }
        .map_err(|cause| DecodeError::field(descriptor, cause))?;
        record
            .write_field(descriptor.index, value)
            .map_err(|cause| DecodeError::field(descriptor, cause))?;
    }
    Ok(())
}
