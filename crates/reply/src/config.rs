//! Startup configuration.
//!
//! [`Config`] holds the two settings the helpers depend on: where templates
//! live and, optionally, a fixed operating mode. Values come from code or
//! from the environment:
//!
//! | Variable | Setting | Default |
//! |----------|---------|---------|
//! | `REPLY_TEMPLATE_DIR` | [`Config::template_dir`] | `views` |
//! | `REPLY_ENV` | [`Config::mode`] | unset: the mode detector decides |

use std::path::{Path, PathBuf};

use reply_render::{TemplateLoader, DEFAULT_TEMPLATE_DIR};

use crate::mode::{set_mode_detector, Mode, MODE_ENV_VAR};

/// Environment variable naming the template directory.
pub const TEMPLATE_DIR_ENV_VAR: &str = "REPLY_TEMPLATE_DIR";

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    template_dir: PathBuf,
    mode: Option<Mode>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            mode: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Reads settings through `var`, for tests and custom sources.
    ///
    /// Empty values are treated as unset. An unrecognized `REPLY_ENV` leaves
    /// the mode unset.
    pub fn from_env_with<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        if let Some(dir) = get(TEMPLATE_DIR_ENV_VAR) {
            config.template_dir = PathBuf::from(dir);
        }
        config.mode = get(MODE_ENV_VAR).and_then(|v| v.parse().ok());
        config
    }

    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = dir.into();
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Creates the template loader for the configured directory.
    pub fn template_loader(&self) -> TemplateLoader {
        TemplateLoader::new(&self.template_dir)
    }

    /// Installs a fixed mode detector if a mode is configured.
    ///
    /// Without a configured mode the current detector is left in place.
    pub fn install_mode(&self) {
        match self.mode {
            Some(Mode::Production) => set_mode_detector(|| Mode::Production),
            Some(Mode::Development) => set_mode_detector(|| Mode::Development),
            None => {}
        }
    }
}
