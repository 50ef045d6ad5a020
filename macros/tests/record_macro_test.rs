//! Tests for the #[derive(Record)] macro

#![allow(clippy::expect_used)] // Panics: tests fail loudly on engine errors

use std::str::FromStr;

use recast_core::{
    decode, encode, ElementCategory, Namespace, Record, TypeCategory, Value,
};
use recast_macros::Record;
use recast_testing::mocks::{MapSource, RecordingSink};

/// A custom field type participating via its own string parsing.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
struct Role(String);

impl FromStr for Role {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.is_empty() {
            return Err("role must not be empty".to_string());
        }
        Ok(Role(input.to_string()))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Record, Default, Debug, PartialEq)]
struct Session {
    #[recast(query = "user", form = "user")]
    user: String,

    #[recast(query = "page")]
    page: u32,

    #[recast(query = "role")]
    role: Role,

    #[recast(query = "roles")]
    roles: Vec<Role>,

    #[recast(query = "tags", header = "x-tags")]
    tags: Vec<String>,

    #[recast(cookie = "token", cookie_path = "/", cookie_secure, cookie_same_site = "strict")]
    token: String,

    // Participates in no namespace.
    internal: bool,
}

#[test]
fn field_specs_classify_types() {
    let specs = Session::field_specs();
    assert_eq!(specs.len(), 7);

    assert_eq!(specs[0].name, "user");
    assert_eq!(specs[0].category, TypeCategory::Str);
    assert_eq!(specs[0].key(Namespace::Query), Some("user"));
    assert_eq!(specs[0].key(Namespace::Form), Some("user"));
    assert_eq!(specs[0].key(Namespace::Header), None);

    assert_eq!(specs[1].category, TypeCategory::UInt);
    assert_eq!(specs[2].category, TypeCategory::Parse);
    assert_eq!(specs[3].category, TypeCategory::List(ElementCategory::Parse));
    assert_eq!(specs[4].category, TypeCategory::List(ElementCategory::Str));
    assert_eq!(specs[5].category, TypeCategory::Str);

    // Untagged fields carry no keys at all.
    assert_eq!(specs[6].name, "internal");
    assert!(specs[6].keys.is_empty());
}

#[test]
fn cookie_attributes_are_collected() {
    let specs = Session::field_specs();
    let token = &specs[5];
    assert_eq!(
        token.attributes,
        &[
            (Namespace::Cookie, "path", "/"),
            (Namespace::Cookie, "secure", "true"),
            (Namespace::Cookie, "same_site", "strict"),
        ]
    );
}

#[test]
fn decode_populates_tagged_fields() {
    let source = MapSource::new()
        .with("user", "ada")
        .with("page", "2")
        .with("role", "admin")
        .with("roles", "admin,user")
        .with("tags", "a,b,c");

    let mut session = Session::default();
    decode(&source, &mut session, Namespace::Query).expect("decode should succeed");

    assert_eq!(session.user, "ada");
    assert_eq!(session.page, 2);
    assert_eq!(session.role, Role("admin".to_string()));
    assert_eq!(
        session.roles,
        vec![Role("admin".to_string()), Role("user".to_string())]
    );
    assert_eq!(session.tags, vec!["a", "b", "c"]);
    // Cookie-tagged and untagged fields stay at their zero values.
    assert_eq!(session.token, "");
    assert!(!session.internal);
}

#[test]
fn decode_surfaces_custom_parser_errors() {
    let source = MapSource::new().with("role", "");
    let mut session = Session::default();
    let error = decode(&source, &mut session, Namespace::Query)
        .expect_err("empty role must fail");
    assert!(error.to_string().contains("role must not be empty"));
}

#[test]
fn decode_rejects_out_of_range_narrowing() {
    let source = MapSource::new().with("page", "4294967296");
    let mut session = Session::default();
    assert!(decode(&source, &mut session, Namespace::Query).is_err());
    assert_eq!(session.page, 0);
}

#[test]
fn encode_renders_fields_in_declaration_order() {
    let session = Session {
        user: "ada".to_string(),
        page: 3,
        role: Role("admin".to_string()),
        roles: vec![Role("admin".to_string()), Role("user".to_string())],
        tags: vec!["a".to_string(), "b".to_string()],
        token: "secret".to_string(),
        internal: true,
    };

    let mut sink = RecordingSink::new();
    encode(&mut sink, &session, Namespace::Query).expect("encode should succeed");
    assert_eq!(
        sink.rendered(),
        vec![
            ("user".to_string(), "ada".to_string()),
            ("page".to_string(), "3".to_string()),
            ("role".to_string(), "admin".to_string()),
            ("roles".to_string(), "admin,user".to_string()),
            ("tags".to_string(), "a,b".to_string()),
        ]
    );
}

#[test]
fn field_aware_sinks_see_cookie_attributes() {
    let session = Session {
        token: "secret".to_string(),
        ..Session::default()
    };

    let mut sink = RecordingSink::aware();
    encode(&mut sink, &session, Namespace::Cookie).expect("encode should succeed");
    assert_eq!(sink.calls.len(), 1);
    let call = &sink.calls[0];
    assert_eq!(call.key, "token");
    let descriptor = call.descriptor.as_ref().expect("field-aware delivery");
    assert_eq!(descriptor.attribute("path"), Some("/"));
    assert_eq!(descriptor.attribute("secure"), Some("true"));
    assert_eq!(descriptor.attribute("same_site"), Some("strict"));
    assert_eq!(descriptor.attribute("expires"), None);
}

#[test]
fn sequence_roundtrip_through_derived_accessors() {
    let source = MapSource::new().with("tags", "a,b,c");
    let mut session = Session::default();
    decode(&source, &mut session, Namespace::Query).expect("decode should succeed");

    let value = session.read_field(4).expect("tags field");
    assert_eq!(value.render().as_deref(), Some("a,b,c"));
}

#[test]
fn empty_sequence_decodes_to_empty_vec() {
    let source = MapSource::new().with("tags", "");
    let mut session = Session {
        tags: vec!["stale".to_string()],
        ..Session::default()
    };
    decode(&source, &mut session, Namespace::Query).expect("decode should succeed");
    assert_eq!(session.tags, Vec::<String>::new());
}

#[test]
fn skip_sentinel_excludes_a_field() {
    #[derive(Record, Default)]
    struct Partial {
        #[recast(query = "-", form = "kept")]
        kept: String,
    }

    let specs = Partial::field_specs();
    assert_eq!(specs[0].key(Namespace::Query), None);
    assert_eq!(specs[0].key(Namespace::Form), Some("kept"));
}

#[test]
fn unknown_write_index_is_an_error() {
    let mut session = Session::default();
    let error = session.write_field(99, Value::Bool(true));
    assert!(error.is_err());
    assert!(session.read_field(99).is_none());
}
