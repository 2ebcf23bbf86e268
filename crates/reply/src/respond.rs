//! Response helpers.
//!
//! Each helper frames one kind of payload into a [`Context`]'s response:
//!
//! | Helper | Content-Type | Body |
//! |--------|--------------|------|
//! | [`write_status`] | `text/plain; charset=utf-8` | reason phrase and newline |
//! | [`write_string`] | sniffed | the string |
//! | [`write_bytes`] | sniffed | the bytes |
//! | [`write_json`] | `application/json` | JSON, compact or indented by [`Mode`](crate::Mode) |
//! | [`write_template`] | `text/html; charset=utf-8` | the rendered template |
//!
//! Headers are always set before the status line; after the status line
//! they are frozen (see [`ResponseWriter`](crate::ResponseWriter)).

use http::header::{HeaderValue, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use http::StatusCode;
use reply_render::{RenderInput, Templates};
use serde::Serialize;
use tracing::error;

use crate::context::Context;
use crate::error::Error;
use crate::mode::detect_mode;
use crate::sniff::{detect_content_type, TEXT_HTML_UTF8, TEXT_PLAIN_UTF8};

const APPLICATION_JSON: &str = "application/json";

/// Responds with `code` and its reason phrase as a plain-text body.
///
/// For `403` the body is `"Forbidden\n"`. Codes without a reason phrase get
/// a bare newline.
pub fn write_status(ctx: &mut Context, code: StatusCode) {
    let w = ctx.response_mut();
    if let Some(headers) = w.headers_mut() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN_UTF8));
        headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    }
    w.write_header(code);
    w.write_body(code.canonical_reason().unwrap_or_default().as_bytes());
    w.write_body(b"\n");
}

/// Responds with `code` and `s` as the body.
///
/// The content type is sniffed from `s` unless the handler already set one.
pub fn write_string(ctx: &mut Context, code: StatusCode, s: &str) {
    write_bytes(ctx, code, s.as_bytes());
}

/// Responds with `code` and `b` as the body.
///
/// The content type is sniffed from `b` unless the handler already set one.
pub fn write_bytes(ctx: &mut Context, code: StatusCode, b: &[u8]) {
    let w = ctx.response_mut();
    w.default_content_type(detect_content_type(b));
    w.write_header(code);
    w.write_body(b);
}

/// Responds with `code` and `value` encoded as JSON.
///
/// In production mode the encoding is compact (`{"id":1}`); otherwise it is
/// indented with tabs. The value is encoded into a buffer first, so a failed
/// encoding leaves the response untouched.
///
/// # Errors
///
/// [`Error::Json`] if `value` cannot be encoded.
pub fn write_json<T: Serialize + ?Sized>(
    ctx: &mut Context,
    code: StatusCode,
    value: &T,
) -> Result<(), Error> {
    let body = encode_json(value, detect_mode().is_production())?;

    let w = ctx.response_mut();
    if let Some(headers) = w.headers_mut() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    }
    w.write_header(code);
    w.write_body(&body);
    Ok(())
}

fn encode_json<T: Serialize + ?Sized>(
    value: &T,
    compact: bool,
) -> Result<Vec<u8>, serde_json::Error> {
    if compact {
        return serde_json::to_vec(value);
    }
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Renders the template `name` with `data` and responds with `code`.
///
/// The template sees the request context as `c` (see
/// [`Context::template_value`]) and every other name from `data`. A `c`
/// entry in `data` is shadowed by the context.
///
/// The template is looked up before anything is written. Execution streams
/// into the response body, so if a render fails part way through, the status
/// line and the output produced so far have already been written when the
/// error is returned.
///
/// # Errors
///
/// - [`RenderError::NoTemplateDirectory`](reply_render::RenderError::NoTemplateDirectory)
///   if the template directory did not exist at startup
/// - [`RenderError::TemplateNotFound`](reply_render::RenderError::TemplateNotFound)
///   if no template has this name; nothing is written
/// - [`RenderError::Render`](reply_render::RenderError::Render) if execution fails
pub fn write_template<T: Serialize + ?Sized>(
    ctx: &mut Context,
    templates: &Templates,
    code: StatusCode,
    name: &str,
    data: Option<&T>,
) -> Result<(), Error> {
    let template = templates.get(name)?;
    let input = RenderInput::from_serialize(ctx.template_value(), data);

    let w = ctx.response_mut();
    if let Some(headers) = w.headers_mut() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_HTML_UTF8));
    }
    w.write_header(code);
    template.render_to_write(input, w)?;
    Ok(())
}

/// Reports a failed helper call to the client.
///
/// If the status line has not been written yet, responds with the error's
/// status as in [`write_status`]. The error is logged either way.
pub fn write_error(ctx: &mut Context, err: &Error) {
    let request = ctx.request();
    error!(
        method = %request.method(),
        path = %request.uri().path(),
        error = %err,
        "response failed"
    );
    if ctx.response().headers_sent() {
        return;
    }
    write_status(ctx, err.status_code());
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::Request;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn ctx() -> Context {
        Context::new(Request::get("/").body(Bytes::new()).unwrap())
    }

    #[test]
    fn test_write_status_body() {
        let mut ctx = ctx();
        write_status(&mut ctx, StatusCode::FORBIDDEN);

        let w = ctx.response();
        assert_eq!(w.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(w.headers()[CONTENT_TYPE], TEXT_PLAIN_UTF8);
        assert_eq!(w.headers()[X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(w.body(), b"Forbidden\n");
    }

    #[test]
    fn test_write_string_sniffs_html() {
        let mut ctx = ctx();
        write_string(&mut ctx, StatusCode::OK, "<html><p>hi</p></html>");
        assert_eq!(ctx.response().headers()[CONTENT_TYPE], TEXT_HTML_UTF8);
    }

    #[test]
    fn test_write_bytes_sniffs_binary() {
        let mut ctx = ctx();
        write_bytes(&mut ctx, StatusCode::CREATED, b"\x00\x01\x02");
        let w = ctx.response();
        assert_eq!(w.status(), Some(StatusCode::CREATED));
        assert_eq!(w.headers()[CONTENT_TYPE], "application/octet-stream");
        assert_eq!(w.body(), b"\x00\x01\x02");
    }

    #[test]
    fn test_encode_json_modes() {
        let value = json!({"id": 1});
        assert_eq!(encode_json(&value, true).unwrap(), br#"{"id":1}"#);
        assert_eq!(encode_json(&value, false).unwrap(), b"{\n\t\"id\": 1\n}");
    }

    #[test]
    fn test_encode_json_failure() {
        // Non-string map keys cannot be encoded.
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], 1);
        assert!(encode_json(&map, true).is_err());
    }

    #[test]
    fn test_write_error_after_headers_sent_only_logs() {
        let mut ctx = ctx();
        write_string(&mut ctx, StatusCode::OK, "partial");
        let err = Error::from(reply_render::RenderError::TemplateNotFound("x".into()));
        write_error(&mut ctx, &err);
        assert_eq!(ctx.response().status(), Some(StatusCode::OK));
        assert_eq!(ctx.response().body(), b"partial");
    }
}
