//! The encode driver: deliver a record's fields to a sink.
//!
//! Encoding mirrors decoding: a synchronous traversal of the field plan,
//! reading each field as a typed value and delivering it to the sink. Sinks
//! that expose the field-aware extension receive the full descriptor per
//! field (enabling attribute-rich output such as cookie metadata); the
//! driver probes for that capability once per encode call, not per field.

use thiserror::Error;

use crate::field::{FieldDescriptor, Namespace, TypeCategory};
use crate::plan::{plan_for, FieldPlan, PlanError};
use crate::record::Record;
use crate::value::Value;

/// A sink adapter's own delivery mechanism failed.
///
/// Raised by adapters, propagated unchanged by the driver.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The value has no textual representation the sink can deliver.
    #[error("value for key {key:?} has no textual representation")]
    Unrenderable {
        /// The key being delivered.
        key: String,
    },

    /// The key or value cannot be represented by the underlying transport.
    #[error("cannot deliver key {key:?}: {reason}")]
    Invalid {
        /// The key being delivered.
        key: String,
        /// Adapter-specific detail.
        reason: String,
    },
}

impl SinkError {
    /// The value has no textual representation.
    pub fn unrenderable(key: impl Into<String>) -> Self {
        SinkError::Unrenderable { key: key.into() }
    }

    /// The key or value cannot be represented by the transport.
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        SinkError::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// The encode-side capability a transport adapter exposes to the engine.
pub trait Sink {
    /// Deliver a value under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] if the underlying transport cannot represent
    /// or accept the pair.
    fn set(&mut self, key: &str, value: &Value) -> Result<(), SinkError>;

    /// Whether this sink wants the field-aware [`Sink::set_field`] entry
    /// point. Probed once per encode call.
    fn field_aware(&self) -> bool {
        false
    }

    /// Deliver a value together with its full field descriptor.
    ///
    /// Preferred over [`Sink::set`] when [`Sink::field_aware`] reports
    /// true; the descriptor carries the secondary attributes an
    /// attribute-rich sink needs. The default implementation ignores the
    /// descriptor.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] if the underlying transport cannot represent
    /// or accept the pair.
    fn set_field(
        &mut self,
        key: &str,
        value: &Value,
        descriptor: &FieldDescriptor,
    ) -> Result<(), SinkError> {
        let _ = descriptor;
        self.set(key, value)
    }
}

/// Encoding failed.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The record type's field table could not be planned.
    #[error("failed to build field plan: {0}")]
    Plan(#[from] PlanError),

    /// File-part fields have no textual representation and cannot be
    /// encoded.
    #[error("field {field:?} cannot be encoded: file parts have no textual representation")]
    Unencodable {
        /// The offending field's name.
        field: &'static str,
    },

    /// The record's accessor did not produce a value for a planned field;
    /// only hand-written `Record` implementations can get here.
    #[error("record produced no value for field {field:?} (index {index})")]
    MissingField {
        /// The field's name.
        field: &'static str,
        /// The accessor index that came up empty.
        index: usize,
    },

    /// The sink rejected a delivery; deliveries already performed are not
    /// undone.
    #[error("field {field:?} (key {key:?}): {source}")]
    Sink {
        /// The failing field's name.
        field: &'static str,
        /// The sink key the value was delivered under.
        key: &'static str,
        /// The underlying delivery failure.
        #[source]
        source: SinkError,
    },
}

/// Encode `namespace`-tagged fields of `record` into `sink`, using the
/// cached plan for `T`.
///
/// # Errors
///
/// Returns an [`EncodeError`] for the first failing field; deliveries
/// already performed are not undone.
pub fn encode<K, T>(sink: &mut K, record: &T, namespace: Namespace) -> Result<(), EncodeError>
where
    K: Sink + ?Sized,
    T: Record + 'static,
{
    let plan = plan_for::<T>(namespace)?;
    encode_with_plan(sink, record, &plan)
}

/// Encode against an explicit plan, for callers that hold one.
///
/// # Errors
///
/// Returns an [`EncodeError`] for the first failing field.
pub fn encode_with_plan<K, T>(
    sink: &mut K,
    record: &T,
    plan: &FieldPlan,
) -> Result<(), EncodeError>
where
    K: Sink + ?Sized,
    T: Record,
{
    let field_aware = sink.field_aware();
    for descriptor in plan.fields() {
        if descriptor.category == TypeCategory::Blob {
            return Err(EncodeError::Unencodable {
                field: descriptor.name,
            });
        }
        let value = record
            .read_field(descriptor.index)
            .ok_or(EncodeError::MissingField {
                field: descriptor.name,
                index: descriptor.index,
            })?;
        let delivery = if field_aware {
            sink.set_field(descriptor.key, &value, descriptor)
        } else {
            sink.set(descriptor.key, &value)
        };
        delivery.map_err(|source| EncodeError::Sink {
            field: descriptor.name,
            key: descriptor.key,
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ConvertError;
    use crate::field::{ElementCategory, FieldSpec};

    #[derive(Default)]
    struct Outgoing {
        language: String,
        limits: Vec<u32>,
    }

    impl Record for Outgoing {
        fn field_specs() -> &'static [FieldSpec] {
            &[
                FieldSpec {
                    name: "language",
                    index: 0,
                    category: TypeCategory::Str,
                    keys: &[(Namespace::Header, "accept-language")],
                    attributes: &[],
                },
                FieldSpec {
                    name: "limits",
                    index: 1,
                    category: TypeCategory::List(ElementCategory::UInt),
                    keys: &[(Namespace::Header, "x-limits")],
                    attributes: &[],
                },
            ]
        }

        fn write_field(&mut self, index: usize, value: Value) -> Result<(), ConvertError> {
            match index {
                0 => {
                    self.language = value.into_text()?;
                    Ok(())
                },
                1 => {
                    let mut limits = Vec::new();
                    for item in value.into_list()? {
                        let wide = item.into_uint()?;
                        limits.push(
                            u32::try_from(wide).map_err(|_| ConvertError::out_of_range(wide))?,
                        );
                    }
                    self.limits = limits;
                    Ok(())
                },
                other => Err(ConvertError::UnknownField(other)),
            }
        }

        fn read_field(&self, index: usize) -> Option<Value> {
            match index {
                0 => Some(Value::Str(self.language.clone())),
                1 => Some(Value::List(
                    self.limits
                        .iter()
                        .map(|limit| Value::UInt(u64::from(*limit)))
                        .collect(),
                )),
                _ => None,
            }
        }
    }

    #[derive(Default)]
    struct Plain {
        calls: Vec<(String, String)>,
    }

    impl Sink for Plain {
        fn set(&mut self, key: &str, value: &Value) -> Result<(), SinkError> {
            let text = value.render().ok_or_else(|| SinkError::unrenderable(key))?;
            self.calls.push((key.to_string(), text));
            Ok(())
        }
    }

    #[derive(Default)]
    struct Aware {
        plain_calls: usize,
        described: Vec<(String, String, &'static str)>,
    }

    impl Sink for Aware {
        fn set(&mut self, _key: &str, _value: &Value) -> Result<(), SinkError> {
            self.plain_calls += 1;
            Ok(())
        }

        fn field_aware(&self) -> bool {
            true
        }

        fn set_field(
            &mut self,
            key: &str,
            value: &Value,
            descriptor: &FieldDescriptor,
        ) -> Result<(), SinkError> {
            let text = value.render().ok_or_else(|| SinkError::unrenderable(key))?;
            self.described.push((key.to_string(), text, descriptor.name));
            Ok(())
        }
    }

    #[test]
    #[allow(clippy::expect_used)] // Panics: Test will fail if encoding fails
    fn fields_are_delivered_in_plan_order() {
        let record = Outgoing {
            language: "en".to_string(),
            limits: vec![10, 20],
        };
        let mut sink = Plain::default();
        encode(&mut sink, &record, Namespace::Header).expect("encode should succeed");
        assert_eq!(
            sink.calls,
            vec![
                ("accept-language".to_string(), "en".to_string()),
                ("x-limits".to_string(), "10,20".to_string()),
            ]
        );
    }

    #[test]
    #[allow(clippy::expect_used)] // Panics: Test will fail if encoding fails
    fn field_aware_sinks_receive_descriptors() {
        let record = Outgoing {
            language: "fr".to_string(),
            limits: Vec::new(),
        };
        let mut sink = Aware::default();
        encode(&mut sink, &record, Namespace::Header).expect("encode should succeed");
        assert_eq!(sink.plain_calls, 0);
        assert_eq!(sink.described.len(), 2);
        assert_eq!(
            sink.described[0],
            ("accept-language".to_string(), "fr".to_string(), "language")
        );
    }

    #[test]
    fn empty_plan_never_touches_the_sink() {
        let record = Outgoing::default();
        let mut sink = Plain::default();
        // No field of Outgoing carries a cookie key.
        assert!(encode(&mut sink, &record, Namespace::Cookie).is_ok());
        assert!(sink.calls.is_empty());
    }
}
