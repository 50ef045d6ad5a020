//! The outgoing-response collaborator printers deliver into.

use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use recast_core::SinkError;
use tracing::warn;

/// A response under construction: status line, headers, and body buffer.
///
/// One instance exists per response and is not reused. Status finalization
/// is a distinct, explicit operation rather than a reserved header key:
/// after [`finalize_status`](HttpResponse::finalize_status) runs, the
/// header map is frozen and later header writes are ignored, modeling the
/// transport contract that nothing written after the status line goes out
/// on the wire. Callers interleaving status and header output must
/// therefore finalize last, or order their print stages accordingly.
#[derive(Debug)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    finalized: bool,
}

impl HttpResponse {
    /// An empty 200 response.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
            finalized: false,
        }
    }

    /// Finalize the status line and freeze the header map.
    ///
    /// The first call wins; later calls (and later header writes) are
    /// ignored and logged at `warn`.
    pub fn finalize_status(&mut self, status: StatusCode) {
        if self.finalized {
            warn!(%status, "status already finalized, ignoring");
            return;
        }
        self.status = status;
        self.finalized = true;
    }

    /// Whether the status line has been finalized.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Insert a header, replacing any previous value under the name.
    ///
    /// Writes after status finalization are not observable; they are
    /// dropped and logged at `warn`.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] if the name or value is not a legal HTTP
    /// header.
    pub fn insert_header(&mut self, key: &str, value: &str) -> Result<(), SinkError> {
        let (name, value) = self.checked_pair(key, value)?;
        if self.frozen(key) {
            return Ok(());
        }
        self.headers.insert(name, value);
        Ok(())
    }

    /// Append a header, keeping previous values under the name.
    ///
    /// Same finalization semantics as [`insert_header`](Self::insert_header).
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] if the name or value is not a legal HTTP
    /// header.
    pub fn append_header(&mut self, key: &str, value: &str) -> Result<(), SinkError> {
        let (name, value) = self.checked_pair(key, value)?;
        if self.frozen(key) {
            return Ok(());
        }
        self.headers.append(name, value);
        Ok(())
    }

    fn checked_pair(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(HeaderName, HeaderValue), SinkError> {
        let name = HeaderName::try_from(key)
            .map_err(|error| SinkError::invalid(key, error.to_string()))?;
        let value = HeaderValue::try_from(value)
            .map_err(|error| SinkError::invalid(key, error.to_string()))?;
        Ok((name, value))
    }

    fn frozen(&self, key: &str) -> bool {
        if self.finalized {
            warn!(key, "header write after status finalization is not observable");
        }
        self.finalized
    }

    /// The current status line.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// The headers written so far.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The body written so far.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Mutable access to the body buffer, for body printers.
    pub fn body_mut(&mut self) -> &mut Vec<u8> {
        &mut self.body
    }

    /// Convert into an `http::Response`.
    #[must_use]
    pub fn into_response(self) -> http::Response<Vec<u8>> {
        let mut response = http::Response::new(self.body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::expect_used)] // Panics: Test will fail if header writes fail
    fn header_writes_after_finalization_are_dropped() {
        let mut response = HttpResponse::new();
        response
            .insert_header("x-before", "1")
            .expect("header should insert");
        response.finalize_status(StatusCode::ACCEPTED);
        response
            .insert_header("x-after", "2")
            .expect("dropped write is not an error");

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert!(response.headers().contains_key("x-before"));
        assert!(!response.headers().contains_key("x-after"));
    }

    #[test]
    fn second_finalization_is_ignored() {
        let mut response = HttpResponse::new();
        response.finalize_status(StatusCode::NOT_FOUND);
        response.finalize_status(StatusCode::OK);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn illegal_header_names_are_sink_errors() {
        let mut response = HttpResponse::new();
        assert!(response.insert_header("bad header", "x").is_err());
        assert!(response.insert_header("x-ok", "bad\nvalue").is_err());
    }

    #[test]
    #[allow(clippy::expect_used)] // Panics: Test will fail if header writes fail
    fn into_response_carries_everything_over() {
        let mut response = HttpResponse::new();
        response
            .append_header("set-cookie", "a=1")
            .expect("header should append");
        response
            .append_header("set-cookie", "b=2")
            .expect("header should append");
        response.body_mut().extend_from_slice(b"hello");
        response.finalize_status(StatusCode::CREATED);

        let response = response.into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers().get_all("set-cookie").iter().count(), 2);
        assert_eq!(response.body(), b"hello");
    }
}
