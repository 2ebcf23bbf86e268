//! Caller-defined template functions.
//!
//! A [`FuncMap`] maps names to callables usable inside template expressions.
//! Any function or closure MiniJinja accepts works: return a plain value for
//! the single-result form, or `Result<T, minijinja::Error>` when the call can
//! fail. A returned error aborts the render that made the call.
//!
//! ```rust
//! use reply_render::FuncMap;
//!
//! let funcs = FuncMap::new()
//!     .add("to_upper", |s: String| s.to_uppercase())
//!     .add("to_lower", |s: String| s.to_lowercase());
//! assert_eq!(funcs.len(), 2);
//! ```
//!
//! Maps are merged into the template namespace by
//! [`TemplateLoader::register_functions`](crate::TemplateLoader::register_functions),
//! which must happen before the templates are loaded.

use std::collections::BTreeMap;
use std::fmt;

use minijinja::value::{FunctionArgs, FunctionResult};
use minijinja::{Environment, Value};

/// Mapping from function name to callable.
#[derive(Clone, Default)]
pub struct FuncMap {
    funcs: BTreeMap<String, Value>,
}

impl FuncMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a function, replacing any earlier entry with the same name.
    pub fn add<N, F, Rv, Args>(mut self, name: N, f: F) -> Self
    where
        N: Into<String>,
        F: minijinja::functions::Function<Rv, Args>,
        Rv: FunctionResult,
        Args: for<'a> FunctionArgs<'a>,
    {
        self.insert(name, f);
        self
    }

    /// Inserts a function in place.
    pub fn insert<N, F, Rv, Args>(&mut self, name: N, f: F)
    where
        N: Into<String>,
        F: minijinja::functions::Function<Rv, Args>,
        Rv: FunctionResult,
        Args: for<'a> FunctionArgs<'a>,
    {
        self.funcs.insert(name.into(), Value::from_function(f));
    }

    /// Merges `other` into this map; entries from `other` win.
    pub fn extend(&mut self, other: FuncMap) {
        self.funcs.extend(other.funcs);
    }

    /// Returns true if a function with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    /// Iterates over the registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.funcs.keys().map(String::as_str)
    }

    /// Installs every function as a global of the environment.
    pub(crate) fn install(self, env: &mut Environment<'static>) {
        for (name, func) in self.funcs {
            env.add_global(name, func);
        }
    }
}

impl fmt::Debug for FuncMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
