//! Request context.
//!
//! A [`Context`] bundles what a handler needs to answer one request: the
//! incoming request, route parameters extracted by the host framework, and
//! the [`ResponseWriter`] the response helpers write into.
//!
//! Templates see the request through [`Context::template_value`], a
//! read-only snapshot exposed under the name `c`:
//!
//! | Attribute | Value |
//! |-----------|-------|
//! | `c.method` | request method, e.g. `GET` |
//! | `c.path` | URI path |
//! | `c.query` | raw query string, empty if none |
//! | `c.uri` | full request URI |
//! | `c.headers` | map of lower-case header names to the first value |
//! | `c.params` | route parameters |

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use minijinja::value::{Enumerator, Object, Value};

use crate::writer::ResponseWriter;

/// Per-request state shared by the response helpers.
#[derive(Debug)]
pub struct Context {
    request: Request<Bytes>,
    params: BTreeMap<String, String>,
    response: ResponseWriter,
}

impl Context {
    /// Wraps a request whose body has already been collected.
    pub fn new(request: Request<Bytes>) -> Self {
        Self {
            request,
            params: BTreeMap::new(),
            response: ResponseWriter::new(),
        }
    }

    pub fn request(&self) -> &Request<Bytes> {
        &self.request
    }

    /// Adds a route parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_param(name, value);
        self
    }

    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), value.into());
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn response(&self) -> &ResponseWriter {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut ResponseWriter {
        &mut self.response
    }

    /// Finishes the exchange, producing the response to send.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        self.response.into_response()
    }

    /// Snapshot of the request for template rendering.
    pub fn template_value(&self) -> Value {
        Value::from_object(RequestView::from_context(self))
    }
}

/// Template-facing view of a request.
#[derive(Debug)]
struct RequestView {
    method: String,
    path: String,
    query: String,
    uri: String,
    headers: BTreeMap<String, String>,
    params: BTreeMap<String, String>,
}

impl RequestView {
    const FIELDS: &'static [&'static str] =
        &["method", "path", "query", "uri", "headers", "params"];

    fn from_context(ctx: &Context) -> Self {
        let request = &ctx.request;
        let mut headers = BTreeMap::new();
        for (name, value) in request.headers() {
            if let Ok(value) = value.to_str() {
                headers
                    .entry(name.as_str().to_string())
                    .or_insert_with(|| value.to_string());
            }
        }
        Self {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            query: request.uri().query().unwrap_or_default().to_string(),
            uri: request.uri().to_string(),
            headers,
            params: ctx.params.clone(),
        }
    }
}

impl Object for RequestView {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        match key.as_str()? {
            "method" => Some(Value::from(self.method.as_str())),
            "path" => Some(Value::from(self.path.as_str())),
            "query" => Some(Value::from(self.query.as_str())),
            "uri" => Some(Value::from(self.uri.as_str())),
            "headers" => Some(Value::from_serialize(&self.headers)),
            "params" => Some(Value::from_serialize(&self.params)),
            _ => None,
        }
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Str(Self::FIELDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn ctx() -> Context {
        let request = Request::builder()
            .method(Method::POST)
            .uri("http://example.com/cars/7?color=red")
            .header("X-Trace", "abc")
            .header("x-trace", "def")
            .body(Bytes::from_static(b"payload"))
            .unwrap();
        Context::new(request).with_param("id", "7")
    }

    fn render(template: &str, ctx: &Context) -> String {
        minijinja::Environment::new()
            .render_str(template, minijinja::context! { c => ctx.template_value() })
            .unwrap()
    }

    #[test]
    fn test_template_view_fields() {
        let ctx = ctx();
        assert_eq!(
            render("{{ c.method }} {{ c.path }}?{{ c.query }}", &ctx),
            "POST /cars/7?color=red"
        );
        assert_eq!(render("{{ c.params.id }}", &ctx), "7");
        assert_eq!(render("{{ c.headers['x-trace'] }}", &ctx), "abc");
        assert_eq!(render("{{ c.uri }}", &ctx), "http://example.com/cars/7?color=red");
    }

    #[test]
    fn test_params_accessors() {
        let mut ctx = ctx();
        ctx.set_param("slug", "gt");
        assert_eq!(ctx.param("slug"), Some("gt"));
        assert_eq!(ctx.param("missing"), None);
        assert_eq!(ctx.params().len(), 2);
        assert_eq!(ctx.request().body().as_ref(), b"payload");
    }
}
