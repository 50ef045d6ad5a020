//! Encode-side adapters: printers delivering a record into a response.
//!
//! Printers are stateless stages; the response under construction is
//! threaded through the pipe, so stage order is delivery order. The cookie
//! printer is the attribute-aware sink: it asks the engine for full field
//! descriptors and turns the cookie attributes into `Set-Cookie` metadata.

use std::fmt::Write as _;

use http::header::SET_COOKIE;
use recast_core::{
    encode, FieldDescriptor, Namespace, Record, Sink, SinkError, Value,
};
use serde::Serialize;

use crate::error::PayloadError;
use crate::response::HttpResponse;

/// An encode stage: deliver `record` into the response.
pub trait Print<T> {
    /// Run this stage.
    ///
    /// # Errors
    ///
    /// Returns a [`PayloadError`] when the record or the response rejects
    /// the payload. Deliveries already performed are not undone.
    fn print(&mut self, record: &T, response: &mut HttpResponse) -> Result<(), PayloadError>;
}

/// Run several print stages against one record and response, stopping at
/// the first failure.
///
/// # Errors
///
/// Returns the first failing stage's error; later stages do not run.
pub fn print_pipe<T>(
    record: &T,
    response: &mut HttpResponse,
    stages: &mut [&mut dyn Print<T>],
) -> Result<(), PayloadError> {
    for stage in stages.iter_mut() {
        stage.print(record, response)?;
    }
    Ok(())
}

/// Serializes the whole record as a JSON document into the response body,
/// followed by a newline. Delegates entirely to `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPrinter;

impl<T: Serialize> Print<T> for JsonPrinter {
    fn print(&mut self, record: &T, response: &mut HttpResponse) -> Result<(), PayloadError> {
        serde_json::to_writer(&mut *response.body_mut(), record)?;
        response.body_mut().push(b'\n');
        Ok(())
    }
}

/// Delivers header-tagged fields as response headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderPrinter;

impl<T: Record + 'static> Print<T> for HeaderPrinter {
    fn print(&mut self, record: &T, response: &mut HttpResponse) -> Result<(), PayloadError> {
        let mut sink = HeaderSink { response };
        encode(&mut sink, record, Namespace::Header)?;
        Ok(())
    }
}

struct HeaderSink<'r> {
    response: &'r mut HttpResponse,
}

impl Sink for HeaderSink<'_> {
    fn set(&mut self, key: &str, value: &Value) -> Result<(), SinkError> {
        let text = value.render().ok_or_else(|| SinkError::unrenderable(key))?;
        self.response.insert_header(key, &text)
    }
}

/// Delivers cookie-tagged fields as `Set-Cookie` headers.
///
/// This is the attribute-aware sink: each delivery receives the field's
/// descriptor and honors the `cookie_*` attributes — `path` (default `/`),
/// `secure`, `same_site` (lax/strict/none; anything else omits the
/// directive), and an `expires` string passed through uninterpreted.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookiePrinter;

impl<T: Record + 'static> Print<T> for CookiePrinter {
    fn print(&mut self, record: &T, response: &mut HttpResponse) -> Result<(), PayloadError> {
        let mut sink = CookieSink { response };
        encode(&mut sink, record, Namespace::Cookie)?;
        Ok(())
    }
}

struct CookieSink<'r> {
    response: &'r mut HttpResponse,
}

impl Sink for CookieSink<'_> {
    fn set(&mut self, key: &str, value: &Value) -> Result<(), SinkError> {
        let text = value.render().ok_or_else(|| SinkError::unrenderable(key))?;
        let cookie = format!("{key}={text}; Path=/");
        self.response.append_header(SET_COOKIE.as_str(), &cookie)
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
        let cookie = format_set_cookie(key, &text, descriptor);
        self.response.append_header(SET_COOKIE.as_str(), &cookie)
    }
}

/// The `SameSite` directive of an outgoing cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    /// `SameSite=Lax`.
    Lax,
    /// `SameSite=Strict`.
    Strict,
    /// `SameSite=None`.
    None,
}

impl SameSite {
    /// Parse the attribute spelling; unknown spellings mean the transport
    /// default, i.e. no directive at all.
    #[must_use]
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "lax" => Some(SameSite::Lax),
            "strict" => Some(SameSite::Strict),
            "none" => Some(SameSite::None),
            _ => None,
        }
    }

    const fn directive(self) -> &'static str {
        match self {
            SameSite::Lax => "Lax",
            SameSite::Strict => "Strict",
            SameSite::None => "None",
        }
    }
}

fn format_set_cookie(name: &str, value: &str, descriptor: &FieldDescriptor) -> String {
    let path = descriptor.attribute("path").unwrap_or("/");
    let mut cookie = format!("{name}={value}; Path={path}");
    if let Some(expires) = descriptor.attribute("expires") {
        let _ = write!(cookie, "; Expires={expires}");
    }
    if descriptor.attribute("secure") == Some("true") {
        cookie.push_str("; Secure");
    }
    if let Some(same_site) = descriptor
        .attribute("same_site")
        .and_then(SameSite::from_attribute)
    {
        let _ = write!(cookie, "; SameSite={}", same_site.directive());
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_site_spellings() {
        assert_eq!(SameSite::from_attribute("lax"), Some(SameSite::Lax));
        assert_eq!(SameSite::from_attribute("strict"), Some(SameSite::Strict));
        assert_eq!(SameSite::from_attribute("none"), Some(SameSite::None));
        assert_eq!(SameSite::from_attribute("default"), None);
        assert_eq!(SameSite::from_attribute("Lax"), None);
    }
}
