//! Mock implementations of the engine's capability contracts.

use std::collections::HashMap;

use recast_core::{
    ConvertError, FieldDescriptor, FilePart, RawValue, Sink, SinkError, Source, TypeCategory,
    Value,
};

/// A map-backed source for tests.
///
/// Text entries are returned as borrowed raw values; file entries as cheap
/// clones, matching how real multipart adapters behave.
///
/// # Example
///
/// ```
/// use recast_testing::mocks::MapSource;
/// use recast_core::Source;
///
/// let source = MapSource::new().with("q", "rust");
/// assert!(source.get("q").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    texts: HashMap<String, String>,
    files: HashMap<String, FilePart>,
}

impl MapSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text entry, builder-style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.texts.insert(key.into(), value.into());
        self
    }

    /// Add a file entry, builder-style.
    #[must_use]
    pub fn with_file(mut self, key: impl Into<String>, part: FilePart) -> Self {
        self.files.insert(key.into(), part);
        self
    }

    /// Add a text entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.texts.insert(key.into(), value.into());
    }
}

impl Source for MapSource {
    fn get(&self, key: &str) -> Option<RawValue<'_>> {
        if let Some(text) = self.texts.get(key) {
            return Some(RawValue::text(text));
        }
        self.files.get(key).cloned().map(RawValue::Blob)
    }
}

/// The conversion override hook used by [`OverrideSource`].
pub type CastFn =
    dyn Fn(&RawValue<'_>, TypeCategory) -> Option<Result<Value, ConvertError>> + Send + Sync;

/// A [`MapSource`] with a custom `cast` hook, for testing the per-source
/// conversion override path.
pub struct OverrideSource {
    inner: MapSource,
    cast: Box<CastFn>,
}

impl OverrideSource {
    /// Wrap a map source with a conversion override.
    #[must_use]
    pub fn new(
        inner: MapSource,
        cast: impl Fn(&RawValue<'_>, TypeCategory) -> Option<Result<Value, ConvertError>>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            inner,
            cast: Box::new(cast),
        }
    }
}

impl Source for OverrideSource {
    fn get(&self, key: &str) -> Option<RawValue<'_>> {
        self.inner.get(key)
    }

    fn cast(
        &self,
        raw: &RawValue<'_>,
        category: TypeCategory,
    ) -> Option<Result<Value, ConvertError>> {
        (self.cast)(raw, category)
    }
}

/// One delivery captured by a [`RecordingSink`].
#[derive(Debug, Clone)]
pub struct SinkCall {
    /// The key the value was delivered under.
    pub key: String,
    /// The delivered value.
    pub value: Value,
    /// The descriptor, when delivery went through the field-aware entry
    /// point.
    pub descriptor: Option<FieldDescriptor>,
}

/// A sink that records every delivery, optionally advertising the
/// field-aware capability.
#[derive(Debug, Default)]
pub struct RecordingSink {
    field_aware: bool,
    /// The captured deliveries, in order.
    pub calls: Vec<SinkCall>,
}

impl RecordingSink {
    /// A sink exposing only the minimal `set` contract.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink advertising the field-aware `set_field` extension.
    #[must_use]
    pub fn aware() -> Self {
        Self {
            field_aware: true,
            calls: Vec::new(),
        }
    }

    /// The rendered text of each captured delivery, keyed.
    #[must_use]
    pub fn rendered(&self) -> Vec<(String, String)> {
        self.calls
            .iter()
            .filter_map(|call| {
                call.value
                    .render()
                    .map(|text| (call.key.clone(), text))
            })
            .collect()
    }
}

impl Sink for RecordingSink {
    fn set(&mut self, key: &str, value: &Value) -> Result<(), SinkError> {
        self.calls.push(SinkCall {
            key: key.to_string(),
            value: value.clone(),
            descriptor: None,
        });
        Ok(())
    }

    fn field_aware(&self) -> bool {
        self.field_aware
    }

    fn set_field(
        &mut self,
        key: &str,
        value: &Value,
        descriptor: &FieldDescriptor,
    ) -> Result<(), SinkError> {
        self.calls.push(SinkCall {
            key: key.to_string(),
            value: value.clone(),
            descriptor: Some(descriptor.clone()),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_source_serves_text_and_files() {
        let source = MapSource::new()
            .with("q", "rust")
            .with_file("avatar", FilePart::new("avatar", &b"png"[..]));
        assert_eq!(source.get("q"), Some(RawValue::text("rust")));
        assert!(matches!(source.get("avatar"), Some(RawValue::Blob(_))));
        assert!(source.get("missing").is_none());
    }

    #[test]
    fn override_source_delegates_lookup() {
        let source = OverrideSource::new(MapSource::new().with("n", "1"), |_, _| {
            Some(Ok(Value::UInt(99)))
        });
        assert!(source.get("n").is_some());
        let cast = source.cast(&RawValue::text("1"), TypeCategory::UInt);
        assert_eq!(cast, Some(Ok(Value::UInt(99))));
    }

    #[test]
    fn recording_sink_captures_in_order() {
        let mut sink = RecordingSink::new();
        assert!(!sink.field_aware());
        sink.set("a", &Value::UInt(1)).ok();
        sink.set("b", &Value::Str("x".to_string())).ok();
        assert_eq!(
            sink.rendered(),
            vec![("a".to_string(), "1".to_string()), ("b".to_string(), "x".to_string())]
        );
    }
}
