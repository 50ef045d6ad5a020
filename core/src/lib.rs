//! # Recast Core
//!
//! A bidirectional transcoding engine that maps between loosely-typed,
//! key-addressable transports (HTTP headers, cookies, query parameters,
//! form fields, path parameters, multipart file parts) and strongly-typed
//! records, driven entirely by per-field metadata on the record type.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │        Transport adapters (recast-http)  │  ← headers, cookies, query,
//! │  - Scanners (Source impls)               │    form, path, multipart
//! │  - Printers (Sink impls)                 │  ← Set-Cookie attributes,
//! ├──────────────────────────────────────────┤    status finalization
//! │        Engine (this crate)               │
//! │  - Field plans (built once, cached)      │  ← per (type, namespace)
//! │  - Default conversion policy             │  ← one exhaustive dispatch
//! │  - Decode / encode drivers               │  ← fail-fast traversals
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Core Concepts
//!
//! - **Record**: a strongly-typed composite value; `#[derive(Record)]`
//!   classifies each field into a closed [`TypeCategory`] and emits a
//!   static field table plus positional accessors.
//! - **Field Plan**: the immutable, ordered descriptor list for one
//!   `(record type, namespace)` pair, built once and cached process-wide.
//! - **Namespace**: a transcoding context (`header`, `query`, `cookie`,
//!   `form`, `path`, `multipart`) selecting which key on a field applies.
//! - **Source / Sink**: the two small capability contracts transport
//!   adapters implement; sources may override the conversion policy,
//!   sinks may opt into field-aware delivery.
//!
//! ## Example
//!
//! ```ignore
//! use recast_core::{decode, Namespace};
//! use recast_macros::Record;
//!
//! #[derive(Record, Default)]
//! struct Search {
//!     #[recast(query = "q")]
//!     term: String,
//!
//!     #[recast(query = "page")]
//!     page: u32,
//!
//!     #[recast(query = "tags")]
//!     tags: Vec<String>,
//! }
//!
//! let mut search = Search::default();
//! decode(&source, &mut search, Namespace::Query)?;
//! ```
//!
//! Decoding and encoding are synchronous, single-threaded traversals with
//! no suspension points; the cached plans are the only state shared across
//! concurrent operations.

pub mod convert;
pub mod decode;
pub mod encode;
pub mod field;
pub mod plan;
pub mod record;
pub mod value;

pub use convert::{convert, ConvertError};
pub use decode::{decode, decode_with_plan, DecodeError, Source, SourceError};
pub use encode::{encode, encode_with_plan, EncodeError, Sink, SinkError};
pub use field::{ElementCategory, FieldDescriptor, FieldSpec, Namespace, TypeCategory, SKIP_KEY};
pub use plan::{plan_for, FieldPlan, PlanError};
pub use record::Record;
pub use value::{FilePart, FromValue, IntoValue, RawValue, Value};
