//! # Reply - HTTP Response Helpers
//!
//! `reply` turns a handler's payload into a framed HTTP response: status
//! line, content type, and body. It covers five payload kinds:
//!
//! - a bare status code ([`write_status`])
//! - a string or byte slice with a sniffed content type ([`write_string`], [`write_bytes`])
//! - a JSON value, indented in development and compact in production ([`write_json`])
//! - a named template from a directory loaded at startup ([`write_template`])
//!
//! ## Startup
//!
//! Templates are loaded once, before the server accepts connections.
//! Functions must be registered before loading; [`TemplateLoader::load`]
//! consumes the loader so later registration does not compile.
//!
//! ```rust,no_run
//! use reply::{Config, FuncMap};
//!
//! fn main() -> Result<(), reply::RenderError> {
//!     let config = Config::from_env();
//!     config.install_mode();
//!
//!     let mut loader = config.template_loader();
//!     if loader.is_present() {
//!         loader.register_functions(
//!             FuncMap::new()
//!                 .add("to_upper", |s: String| s.to_uppercase())
//!                 .add("to_lower", |s: String| s.to_lowercase()),
//!         )?;
//!     }
//!     let templates = loader.load()?;
//!     // hand `templates` to the request handlers
//!     # drop(templates);
//!     Ok(())
//! }
//! ```
//!
//! ## Request Time
//!
//! ```rust
//! use bytes::Bytes;
//! use http::{Request, StatusCode};
//! use reply::{write_json, write_string, Context};
//!
//! let mut ctx = Context::new(Request::get("/hello").body(Bytes::new()).unwrap());
//! write_string(&mut ctx, StatusCode::OK, "Hello, World!");
//! let response = ctx.into_response();
//! assert_eq!(response.headers()["content-type"], "text/plain; charset=utf-8");
//! ```
//!
//! Failed JSON or template writes return an [`Error`]; pass it to
//! [`write_error`] to answer with a plain `500 Internal Server Error`.

mod config;
mod context;
mod error;
mod mode;
mod respond;
mod sniff;
mod writer;

pub use config::{Config, TEMPLATE_DIR_ENV_VAR};
pub use context::Context;
pub use error::Error;
pub use mode::{detect_mode, reset_mode_detector, set_mode_detector, Mode, MODE_ENV_VAR};
pub use respond::{
    write_bytes, write_error, write_json, write_status, write_string, write_template,
};
pub use sniff::{detect_content_type, OCTET_STREAM, SNIFF_LEN, TEXT_HTML_UTF8, TEXT_PLAIN_UTF8};
pub use writer::ResponseWriter;

// Template registry re-exports
pub use reply_render::{
    minijinja, FuncMap, RenderError, RenderInput, TemplateLoader, Templates, CONTEXT_KEY,
    DEFAULT_TEMPLATE_DIR,
};
