//! HTTP transport adapters for the Recast transcoding engine.
//!
//! The engine in `recast-core` only speaks its two capability contracts;
//! this crate supplies the concrete adapters for HTTP exchanges:
//!
//! - **Scanners** (decode side): header, query, cookie, form, path and
//!   multipart sources, plus a JSON body scanner that delegates to
//!   `serde_json`.
//! - **Printers** (encode side): JSON body, header and cookie stages
//!   delivering into an [`HttpResponse`] under construction.
//! - **Pipes**: [`scan_pipe`] and [`print_pipe`] run several stages against
//!   one record, short-circuiting on the first failure.
//!
//! # Example
//!
//! ```ignore
//! use recast_http::{scan_pipe, print_pipe, HeaderScanner, QueryScanner,
//!     HttpResponse, JsonPrinter, HeaderPrinter, CookiePrinter};
//!
//! // Decode: headers first, then the query string.
//! let mut request = SearchRequest::default();
//! let mut headers = HeaderScanner::new(parts.headers());
//! let mut query = QueryScanner::parse(parts.uri.query().unwrap_or(""))?;
//! scan_pipe(&mut request, &mut [&mut headers, &mut query])?;
//!
//! // Encode: body document, then headers, then cookies.
//! let mut response = HttpResponse::new();
//! print_pipe(
//!     &reply,
//!     &mut response,
//!     &mut [&mut JsonPrinter, &mut HeaderPrinter, &mut CookiePrinter],
//! )?;
//! let response = response.into_response();
//! ```
//!
//! Scanners and printers are per-request values; nothing in this crate is
//! shared across exchanges.

pub mod error;
pub mod multipart;
pub mod print;
pub mod query;
pub mod response;
pub mod scan;

pub use error::PayloadError;
pub use multipart::MultipartValues;
pub use print::{
    print_pipe, CookiePrinter, HeaderPrinter, JsonPrinter, Print, SameSite,
};
pub use query::ValueMap;
pub use response::HttpResponse;
pub use scan::{
    scan_pipe, CookieScanner, FormScanner, HeaderScanner, JsonScanner, MultipartScanner,
    PathScanner, QueryScanner, Scan,
};
