//! Directory-loaded template set.
//!
//! Templates are loaded once at startup and rendered by name at request time.
//!
//! ## Loading
//!
//! ```rust,ignore
//! use reply_render::{FuncMap, TemplateLoader};
//!
//! let mut loader = TemplateLoader::new("views");
//! loader.register_functions(FuncMap::new().add("to_upper", |s: String| s.to_uppercase()))?;
//! let templates = loader.load()?;
//! ```
//!
//! Every regular file under the directory is compiled, whatever its
//! extension, and registered under its base file name. See [`loader`] for
//! the traversal order and collision rule.
//!
//! ## Rendering
//!
//! A render takes a [`RenderInput`]: the request context, exposed to the
//! template as `c`, and the caller's data. `c` always refers to the context.
//!
//! ## Functions
//!
//! `html` and `nl2br` are installed in every set (see [`builtins`]).
//! Caller functions registered through [`FuncMap`] are installed after them
//! and replace builtins of the same name.
//!
//! Function names are resolved when a template executes, not when it is
//! compiled. A call to an unregistered function compiles fine and fails the
//! render that reaches it.

pub mod builtins;
mod engine;
mod functions;
mod input;
pub mod loader;
mod registry;

pub use engine::new_environment;
pub use functions::FuncMap;
pub use input::{RenderInput, CONTEXT_KEY};
pub use loader::{walk_template_dir, TemplateFile, TemplateLoader, DEFAULT_TEMPLATE_DIR};
pub use registry::{TemplateRef, Templates};
