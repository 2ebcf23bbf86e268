//! Per-request response state.
//!
//! [`ResponseWriter`] models the output side of one HTTP exchange: a header
//! map that can be edited until the status line is written, a status line
//! written at most once, and a body that only grows. It mirrors the contract
//! of a streaming server response so that helpers written against it behave
//! the same way when bytes go straight to a socket:
//!
//! - Headers are frozen by [`write_header`](ResponseWriter::write_header);
//!   [`headers_mut`](ResponseWriter::headers_mut) returns `None` afterwards.
//! - Writing body bytes before a status sends an implicit `200 OK`, sniffing
//!   a `Content-Type` from the first chunk if none was set.
//! - A second status write is ignored and logged.

use std::io;

use bytes::{BufMut, Bytes, BytesMut};
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Response, StatusCode};
use http_body_util::Full;
use tracing::warn;

use crate::sniff::detect_content_type;

/// Output side of a single request.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The status written so far, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Returns true once the status line has been written.
    pub fn headers_sent(&self) -> bool {
        self.status.is_some()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable headers, or `None` once the status line has been written.
    pub fn headers_mut(&mut self) -> Option<&mut HeaderMap> {
        if self.headers_sent() {
            None
        } else {
            Some(&mut self.headers)
        }
    }

    /// Sets a header if the status line has not been written yet.
    ///
    /// Returns false if the headers are already frozen.
    pub fn set_header(&mut self, name: http::header::HeaderName, value: HeaderValue) -> bool {
        match self.headers_mut() {
            Some(headers) => {
                headers.insert(name, value);
                true
            }
            None => false,
        }
    }

    /// Sets `Content-Type` unless one is present or headers are frozen.
    pub(crate) fn default_content_type(&mut self, content_type: &'static str) {
        if let Some(headers) = self.headers_mut() {
            headers
                .entry(CONTENT_TYPE)
                .or_insert(HeaderValue::from_static(content_type));
        }
    }

    /// Writes the status line, freezing the headers.
    ///
    /// Only the first call has an effect.
    pub fn write_header(&mut self, status: StatusCode) {
        if let Some(sent) = self.status {
            warn!(%sent, ignored = %status, "superfluous write_header call");
            return;
        }
        self.status = Some(status);
    }

    /// Appends body bytes, sending an implicit `200 OK` first if needed.
    pub fn write_body(&mut self, data: &[u8]) {
        if !self.headers_sent() {
            self.default_content_type(detect_content_type(data));
            self.write_header(StatusCode::OK);
        }
        self.body.put_slice(data);
    }

    /// Body bytes written so far.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Converts into an HTTP response; an unwritten status means `200 OK`.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

impl io::Write for ResponseWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_body(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
