//! Process-wide operating mode.
//!
//! The mode only affects JSON formatting: compact in [`Mode::Production`],
//! tab-indented in [`Mode::Development`]. The hosting process owns the flag;
//! this module only reads it through a replaceable detector.
//!
//! The default detector reads the `REPLY_ENV` environment variable:
//! `production` or `prod` (any case) selects production, anything else
//! (including unset) selects development. Override it with
//! [`set_mode_detector`]:
//!
//! ```rust
//! use reply::{detect_mode, set_mode_detector, Mode};
//!
//! set_mode_detector(|| Mode::Production);
//! assert_eq!(detect_mode(), Mode::Production);
//! ```

use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use once_cell::sync::Lazy;

/// Environment variable read by the default detector.
pub const MODE_ENV_VAR: &str = "REPLY_ENV";

/// Operating mode of the hosting process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    pub fn is_production(self) -> bool {
        self == Mode::Production
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Mode::Production),
            "development" | "dev" => Ok(Mode::Development),
            other => Err(format!("unknown mode {other:?}")),
        }
    }
}

type ModeDetector = fn() -> Mode;

static MODE_DETECTOR: Lazy<Mutex<ModeDetector>> = Lazy::new(|| Mutex::new(default_mode_detector));

/// Replaces the detector used by [`detect_mode`].
pub fn set_mode_detector(detector: ModeDetector) {
    let mut guard = MODE_DETECTOR.lock().unwrap_or_else(PoisonError::into_inner);
    *guard = detector;
}

/// Restores the environment-based detector.
pub fn reset_mode_detector() {
    set_mode_detector(default_mode_detector);
}

/// Returns the current operating mode.
pub fn detect_mode() -> Mode {
    let detector = *MODE_DETECTOR.lock().unwrap_or_else(PoisonError::into_inner);
    detector()
}

fn default_mode_detector() -> Mode {
    mode_from_env_value(std::env::var(MODE_ENV_VAR).ok().as_deref())
}

/// Interprets a raw `REPLY_ENV` value; unknown values mean development.
pub(crate) fn mode_from_env_value(value: Option<&str>) -> Mode {
    value
        .and_then(|v| v.parse().ok())
        .unwrap_or(Mode::Development)
}
