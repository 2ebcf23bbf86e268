//! # Reply Render - Template Registry for HTTP Responses
//!
//! `reply-render` loads a directory of MiniJinja templates once at startup
//! and renders them by name with the request context injected. It is the
//! template half of the `reply` response helpers, and can be used on its own.
//!
//! ## Quick Start
//!
//! ```rust
//! use reply_render::{FuncMap, RenderInput, TemplateLoader};
//! use reply_render::minijinja::{context, Value};
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::write(dir.path().join("hello.html"), "Hi {{ shout(name) }} ({{ c }})").unwrap();
//!
//! let mut loader = TemplateLoader::new(dir.path());
//! loader
//!     .register_functions(FuncMap::new().add("shout", |s: String| s.to_uppercase()))
//!     .unwrap();
//! let templates = loader.load().unwrap();
//!
//! let input = RenderInput::new(Value::from("GET /"), context! { name => "ann" });
//! assert_eq!(templates.render("hello.html", input).unwrap(), "Hi ANN (GET /)");
//! ```
//!
//! ## Core Types
//!
//! - [`TemplateLoader`]: probes the directory, collects functions, loads once
//! - [`Templates`]: the read-only, shareable template set
//! - [`FuncMap`]: caller-defined template functions
//! - [`RenderInput`]: request context plus caller data
//! - [`RenderError`]: every failure, including the "no template directory" condition

mod error;
pub mod template;

pub use error::RenderError;

pub use template::{
    builtins, new_environment, walk_template_dir, FuncMap, RenderInput, TemplateFile,
    TemplateLoader, TemplateRef, Templates, CONTEXT_KEY, DEFAULT_TEMPLATE_DIR,
};

// Re-exported so callers can build context values without a direct dependency.
pub use minijinja;
