//! Error types for template loading and rendering.
//!
//! [`RenderError`] covers both phases of the registry's life: the one-time
//! startup walk ([`Walk`](RenderError::Walk), [`Parse`](RenderError::Parse))
//! and per-request rendering ([`TemplateNotFound`](RenderError::TemplateNotFound),
//! [`Render`](RenderError::Render)). [`NoTemplateDirectory`](RenderError::NoTemplateDirectory)
//! is reported by every template operation when the template directory was
//! missing at startup.

use std::io;
use std::path::PathBuf;

/// Error type for template registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The template directory did not exist when the loader was created.
    #[error("templates can't be used without a template directory ({})", path.display())]
    NoTemplateDirectory {
        /// The directory that was probed.
        path: PathBuf,
    },

    /// The directory walk failed to read a directory or file.
    #[error("failed to read {}: {source}", path.display())]
    Walk {
        /// Path that could not be read.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A template file failed to compile.
    #[error("failed to parse template {name:?} ({}): {source}", path.display())]
    Parse {
        /// Template name (the file's base name).
        name: String,
        /// Path of the offending file.
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },

    /// No template is registered under the requested name.
    #[error("template not found: {0:?}")]
    TemplateNotFound(String),

    /// Template execution failed (missing include, failing function call, ...).
    #[error("render error: {0}")]
    Render(#[source] minijinja::Error),

    /// Writing rendered output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RenderError {
    /// Returns true for the "no template directory" condition.
    pub fn is_no_template_directory(&self) -> bool {
        matches!(self, RenderError::NoTemplateDirectory { .. })
    }
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        // A missing include surfaces here as a render failure; only the
        // top-level lookup reports TemplateNotFound.
        match err.kind() {
            minijinja::ErrorKind::WriteFailure => {
                RenderError::Io(io::Error::other(err.to_string()))
            }
            _ => RenderError::Render(err),
        }
    }
}
