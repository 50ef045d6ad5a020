//! Field metadata: namespaces, type categories, and field descriptors.
//!
//! A record type's transcoding behavior is driven entirely by per-field
//! metadata. The `#[derive(Record)]` macro emits one static [`FieldSpec`]
//! per field; the plan builder filters those specs per [`Namespace`] into
//! runtime [`FieldDescriptor`]s.

use std::fmt;

/// A named transcoding context selecting which key on a field applies.
///
/// A field may carry keys for several namespaces simultaneously and will
/// then appear in each namespace's plan under its own key. The body-document
/// namespace is not listed here: body payloads are delegated entirely to
/// `serde` and never reach the plan builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// HTTP header fields.
    Header,
    /// URL query parameters.
    Query,
    /// Cookies.
    Cookie,
    /// URL-encoded form fields.
    Form,
    /// Path parameters.
    Path,
    /// Multipart file parts.
    Multipart,
}

impl Namespace {
    /// All namespaces recognized by the plan builder.
    pub const ALL: [Namespace; 6] = [
        Namespace::Header,
        Namespace::Query,
        Namespace::Cookie,
        Namespace::Form,
        Namespace::Path,
        Namespace::Multipart,
    ];

    /// The tag identifier for this namespace, as written in field attributes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Namespace::Header => "header",
            Namespace::Query => "query",
            Namespace::Cookie => "cookie",
            Namespace::Form => "form",
            Namespace::Path => "path",
            Namespace::Multipart => "multipart",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The category of a sequence element.
///
/// Sequences of sequences and sequences of file parts are not transcodable;
/// that restriction is carried in the type, not checked at run time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementCategory {
    /// Text element.
    Str,
    /// Signed integer element.
    Int,
    /// Unsigned integer element.
    UInt,
    /// Float element.
    Float,
    /// Boolean element.
    Bool,
    /// Element parsed via the element type's own `FromStr`.
    Parse,
}

/// The closed set of target type categories a field can have.
///
/// Computed once per type when the derive expands, never re-evaluated per
/// value. The conversion policy dispatches over this enum exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeCategory {
    /// Text field (`String`).
    Str,
    /// Signed integer field of any width.
    Int,
    /// Unsigned integer field of any width.
    UInt,
    /// Floating point field.
    Float,
    /// Boolean field.
    Bool,
    /// Opaque passthrough field (`FilePart`).
    Blob,
    /// Field parsed via the field type's own `FromStr`.
    Parse,
    /// Sequence field (`Vec<T>`).
    List(ElementCategory),
}

/// The key used when a field carries no key for a namespace, and the
/// explicit marker excluding a field from a namespace's plan.
pub const SKIP_KEY: &str = "-";

/// Static per-field metadata, one per eligible field of a record type.
///
/// Emitted by `#[derive(Record)]` as a `'static` table; hand-written
/// [`Record`](crate::record::Record) implementations construct these
/// directly.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    /// Field identifier within the record, for error messages.
    pub name: &'static str,

    /// Positional index understood by the record's accessors.
    pub index: usize,

    /// Target type category.
    pub category: TypeCategory,

    /// Source keys per namespace. A missing namespace entry or the
    /// [`SKIP_KEY`] sentinel excludes the field from that namespace.
    pub keys: &'static [(Namespace, &'static str)],

    /// Secondary attribute keys per namespace, collected from the
    /// `<namespace>_<attribute>` prefix convention. Consulted only by
    /// attribute-aware sinks.
    pub attributes: &'static [(Namespace, &'static str, &'static str)],
}

impl FieldSpec {
    /// The source key for `namespace`, if the field participates in it.
    #[must_use]
    pub fn key(&self, namespace: Namespace) -> Option<&'static str> {
        self.keys
            .iter()
            .find(|(ns, _)| *ns == namespace)
            .map(|(_, key)| *key)
            .filter(|key| *key != SKIP_KEY)
    }
}

/// One entry of a namespace's field plan.
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    /// Field identifier within the record.
    pub name: &'static str,

    /// Positional index understood by the record's accessors.
    pub index: usize,

    /// The lookup key against the source or sink.
    pub key: &'static str,

    /// Target type category.
    pub category: TypeCategory,

    /// The namespace this descriptor was built for.
    pub namespace: Namespace,

    attributes: &'static [(Namespace, &'static str, &'static str)],
}

impl FieldDescriptor {
    pub(crate) const fn new(
        spec: &FieldSpec,
        namespace: Namespace,
        key: &'static str,
    ) -> Self {
        Self {
            name: spec.name,
            index: spec.index,
            key,
            category: spec.category,
            namespace,
            attributes: spec.attributes,
        }
    }

    /// Look up a secondary attribute of this field within its namespace.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&'static str> {
        self.attributes
            .iter()
            .find(|(ns, attr, _)| *ns == self.namespace && *attr == name)
            .map(|(_, _, value)| *value)
    }

    /// All secondary attributes of this field within its namespace.
    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.attributes
            .iter()
            .filter(|(ns, _, _)| *ns == self.namespace)
            .map(|(_, attr, value)| (*attr, *value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: FieldSpec = FieldSpec {
        name: "token",
        index: 1,
        category: TypeCategory::Str,
        keys: &[(Namespace::Cookie, "token"), (Namespace::Query, "-")],
        attributes: &[
            (Namespace::Cookie, "path", "/"),
            (Namespace::Cookie, "secure", "true"),
        ],
    };

    #[test]
    fn key_lookup_respects_skip_sentinel() {
        assert_eq!(SPEC.key(Namespace::Cookie), Some("token"));
        assert_eq!(SPEC.key(Namespace::Query), None);
        assert_eq!(SPEC.key(Namespace::Header), None);
    }

    #[test]
    fn descriptor_attribute_lookup_is_scoped_to_namespace() {
        let descriptor = FieldDescriptor::new(&SPEC, Namespace::Cookie, "token");
        assert_eq!(descriptor.attribute("path"), Some("/"));
        assert_eq!(descriptor.attribute("secure"), Some("true"));
        assert_eq!(descriptor.attribute("expires"), None);

        let elsewhere = FieldDescriptor::new(&SPEC, Namespace::Query, "token");
        assert_eq!(elsewhere.attribute("path"), None);
    }

    #[test]
    fn namespace_tags_are_stable() {
        for namespace in Namespace::ALL {
            assert_eq!(namespace.to_string(), namespace.as_str());
        }
    }
}
