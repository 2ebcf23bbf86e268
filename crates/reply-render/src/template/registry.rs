//! The loaded template set.
//!
//! [`Templates`] is produced once by [`TemplateLoader::load`](super::TemplateLoader::load)
//! and is read-only afterwards. Cloning is cheap (the compiled environment
//! sits behind an `Arc`), and the set can be shared across any number of
//! concurrent requests without locking.
//!
//! A set is either *absent* (the template directory did not exist) or
//! *loaded*. Every operation on an absent set returns
//! [`RenderError::NoTemplateDirectory`].

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use minijinja::{Environment, Template};

use super::input::RenderInput;
use crate::error::RenderError;

/// Process-lifetime collection of compiled templates.
#[derive(Clone)]
pub struct Templates {
    root: PathBuf,
    env: Option<Arc<Environment<'static>>>,
}

impl Templates {
    /// A set with no template directory behind it.
    pub fn absent(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            env: None,
        }
    }

    pub(crate) fn loaded(root: PathBuf, env: Environment<'static>) -> Self {
        Self {
            root,
            env: Some(Arc::new(env)),
        }
    }

    /// The directory the set was loaded from (or was expected at).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns true if the template directory existed at startup.
    pub fn is_loaded(&self) -> bool {
        self.env.is_some()
    }

    fn env(&self) -> Result<&Environment<'static>, RenderError> {
        self.env
            .as_deref()
            .ok_or_else(|| RenderError::NoTemplateDirectory {
                path: self.root.clone(),
            })
    }

    /// Looks up a template by name.
    ///
    /// # Errors
    ///
    /// [`RenderError::NoTemplateDirectory`] for an absent set,
    /// [`RenderError::TemplateNotFound`] for an unknown name.
    pub fn get(&self, name: &str) -> Result<TemplateRef<'_>, RenderError> {
        let env = self.env()?;
        let template = env
            .get_template(name)
            .map_err(|_| RenderError::TemplateNotFound(name.to_string()))?;
        Ok(TemplateRef { template })
    }

    /// Returns true if a template with this name is loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Sorted names of every loaded template.
    ///
    /// # Errors
    ///
    /// [`RenderError::NoTemplateDirectory`] for an absent set.
    pub fn names(&self) -> Result<Vec<String>, RenderError> {
        let mut names: Vec<String> = self
            .env()?
            .templates()
            .map(|(name, _)| name.to_string())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Number of loaded templates; zero for an absent set.
    pub fn len(&self) -> usize {
        self.env
            .as_deref()
            .map(|env| env.templates().count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Renders the named template to a string.
    pub fn render(&self, name: &str, input: RenderInput) -> Result<String, RenderError> {
        self.get(name)?.render(input)
    }

    /// Renders the named template into `w`.
    ///
    /// The template is looked up before anything is written, so an unknown
    /// name leaves `w` untouched.
    pub fn render_to_write<W: io::Write>(
        &self,
        name: &str,
        input: RenderInput,
        w: W,
    ) -> Result<(), RenderError> {
        self.get(name)?.render_to_write(input, w)
    }
}

impl fmt::Debug for Templates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Templates")
            .field("root", &self.root)
            .field("loaded", &self.is_loaded())
            .field("len", &self.len())
            .finish()
    }
}

/// A template resolved from a [`Templates`] set, ready to execute.
#[derive(Debug)]
pub struct TemplateRef<'a> {
    template: Template<'a, 'a>,
}

impl TemplateRef<'_> {
    pub fn name(&self) -> &str {
        self.template.name()
    }

    /// Executes the template to a string.
    pub fn render(&self, input: RenderInput) -> Result<String, RenderError> {
        Ok(self.template.render(input.into_value())?)
    }

    /// Executes the template, streaming output into `w`.
    ///
    /// Output produced before a failing expression has already been written
    /// when the error is returned.
    pub fn render_to_write<W: io::Write>(
        &self,
        input: RenderInput,
        w: W,
    ) -> Result<(), RenderError> {
        self.template.render_captured_to(input.into_value(), w)?;
        Ok(())
    }
}
