//! Decode-side adapters: one scanner per transport.
//!
//! Every scanner is a thin [`Source`] implementation plus a [`Scan`] impl
//! binding it to its namespace. Scanners own (or borrow) data already
//! extracted from the request; none of them performs I/O except
//! [`JsonScanner`], which reads the body it was handed.

use std::collections::HashMap;
use std::io;

use http::header::{HeaderMap, COOKIE};
use recast_core::{decode, Namespace, RawValue, Record, Source, SourceError};
use serde::de::DeserializeOwned;

use crate::error::PayloadError;
use crate::multipart::MultipartValues;
use crate::query::ValueMap;

/// A decode stage: populate `record` from this adapter's transport data.
pub trait Scan<T> {
    /// Run this stage.
    ///
    /// # Errors
    ///
    /// Returns a [`PayloadError`] when the stage's source data or the
    /// record's fields reject the payload.
    fn scan(&mut self, record: &mut T) -> Result<(), PayloadError>;
}

/// Run several scan stages against one record, stopping at the first
/// failure.
///
/// # Errors
///
/// Returns the first failing stage's error; later stages do not run.
pub fn scan_pipe<T>(
    record: &mut T,
    stages: &mut [&mut dyn Scan<T>],
) -> Result<(), PayloadError> {
    for stage in stages.iter_mut() {
        stage.scan(record)?;
    }
    Ok(())
}

/// Scans header-tagged fields from an `http::HeaderMap`.
///
/// Header values that are not valid UTF-8 are treated as absent.
#[derive(Debug)]
pub struct HeaderScanner<'h> {
    headers: &'h HeaderMap,
}

impl<'h> HeaderScanner<'h> {
    /// Borrow the request's headers.
    #[must_use]
    pub const fn new(headers: &'h HeaderMap) -> Self {
        Self { headers }
    }
}

impl Source for HeaderScanner<'_> {
    fn get(&self, key: &str) -> Option<RawValue<'_>> {
        self.headers
            .get(key)
            .and_then(|value| value.to_str().ok())
            .map(RawValue::text)
    }
}

impl<T: Record + 'static> Scan<T> for HeaderScanner<'_> {
    fn scan(&mut self, record: &mut T) -> Result<(), PayloadError> {
        decode(&*self, record, Namespace::Header)?;
        Ok(())
    }
}

/// Scans query-tagged fields from a parsed query string.
#[derive(Debug, Clone)]
pub struct QueryScanner {
    values: ValueMap,
}

impl QueryScanner {
    /// Parse a raw query string (without the leading `?`).
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the query string does not decode.
    pub fn parse(query: &str) -> Result<Self, SourceError> {
        Ok(Self {
            values: ValueMap::parse(query)?,
        })
    }

    /// Wrap an already-parsed multimap.
    #[must_use]
    pub const fn new(values: ValueMap) -> Self {
        Self { values }
    }
}

impl Source for QueryScanner {
    fn get(&self, key: &str) -> Option<RawValue<'_>> {
        self.values.get(key).map(RawValue::text)
    }
}

impl<T: Record + 'static> Scan<T> for QueryScanner {
    fn scan(&mut self, record: &mut T) -> Result<(), PayloadError> {
        decode(&*self, record, Namespace::Query)?;
        Ok(())
    }
}

/// Scans cookie-tagged fields from the request's `Cookie` headers.
#[derive(Debug, Clone)]
pub struct CookieScanner {
    cookies: Vec<(String, String)>,
}

impl CookieScanner {
    /// Parse every `Cookie` header in the map.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut cookies = Vec::new();
        for header in headers.get_all(COOKIE) {
            let Ok(text) = header.to_str() else {
                continue;
            };
            for pair in text.split(';') {
                if let Some((name, value)) = pair.trim().split_once('=') {
                    cookies.push((name.to_string(), value.to_string()));
                }
            }
        }
        Self { cookies }
    }

    /// Wrap already-parsed cookie pairs.
    #[must_use]
    pub fn new(cookies: Vec<(String, String)>) -> Self {
        Self { cookies }
    }
}

impl Source for CookieScanner {
    fn get(&self, key: &str) -> Option<RawValue<'_>> {
        self.cookies
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| RawValue::text(value))
    }
}

impl<T: Record + 'static> Scan<T> for CookieScanner {
    fn scan(&mut self, record: &mut T) -> Result<(), PayloadError> {
        decode(&*self, record, Namespace::Cookie)?;
        Ok(())
    }
}

/// Scans form-tagged fields from a urlencoded request body.
#[derive(Debug, Clone)]
pub struct FormScanner {
    values: ValueMap,
}

impl FormScanner {
    /// Parse a urlencoded body.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the body is not UTF-8 or does not
    /// decode.
    pub fn from_bytes(body: &[u8]) -> Result<Self, SourceError> {
        let text = std::str::from_utf8(body)
            .map_err(|error| SourceError::malformed("form body", error.to_string()))?;
        Ok(Self {
            values: ValueMap::parse(text)?,
        })
    }

    /// Wrap an already-parsed multimap.
    #[must_use]
    pub const fn new(values: ValueMap) -> Self {
        Self { values }
    }
}

impl Source for FormScanner {
    fn get(&self, key: &str) -> Option<RawValue<'_>> {
        self.values.get(key).map(RawValue::text)
    }
}

impl<T: Record + 'static> Scan<T> for FormScanner {
    fn scan(&mut self, record: &mut T) -> Result<(), PayloadError> {
        decode(&*self, record, Namespace::Form)?;
        Ok(())
    }
}

/// Scans path-tagged fields from the router's path parameters.
#[derive(Debug, Clone, Default)]
pub struct PathScanner {
    params: HashMap<String, String>,
}

impl PathScanner {
    /// Collect the matched path parameters.
    pub fn new<K, V>(params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: params
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl Source for PathScanner {
    fn get(&self, key: &str) -> Option<RawValue<'_>> {
        self.params.get(key).map(|value| RawValue::text(value))
    }
}

impl<T: Record + 'static> Scan<T> for PathScanner {
    fn scan(&mut self, record: &mut T) -> Result<(), PayloadError> {
        decode(&*self, record, Namespace::Path)?;
        Ok(())
    }
}

/// Scans multipart-tagged fields from extracted file parts.
#[derive(Debug, Clone, Default)]
pub struct MultipartScanner {
    values: MultipartValues,
}

impl MultipartScanner {
    /// Wrap the request's extracted file parts.
    #[must_use]
    pub const fn new(values: MultipartValues) -> Self {
        Self { values }
    }
}

impl Source for MultipartScanner {
    fn get(&self, key: &str) -> Option<RawValue<'_>> {
        self.values.get(key).cloned().map(RawValue::Blob)
    }
}

impl<T: Record + 'static> Scan<T> for MultipartScanner {
    fn scan(&mut self, record: &mut T) -> Result<(), PayloadError> {
        decode(&*self, record, Namespace::Multipart)?;
        Ok(())
    }
}

/// Scans a JSON body document onto the record, delegating entirely to
/// `serde_json`. No field plan is involved.
#[derive(Debug)]
pub struct JsonScanner<R> {
    reader: R,
}

impl<R: io::Read> JsonScanner<R> {
    /// Read the body from `reader` on scan.
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<'b> JsonScanner<&'b [u8]> {
    /// Read the body from an in-memory buffer.
    #[must_use]
    pub const fn from_slice(body: &'b [u8]) -> Self {
        Self { reader: body }
    }
}

impl<T: DeserializeOwned, R: io::Read> Scan<T> for JsonScanner<R> {
    fn scan(&mut self, record: &mut T) -> Result<(), PayloadError> {
        *record = serde_json::from_reader(&mut self.reader)?;
        Ok(())
    }
}
