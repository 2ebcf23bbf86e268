//! Error type for the response helpers.

use http::StatusCode;
use reply_render::RenderError;

/// Errors returned by [`write_json`](crate::write_json) and
/// [`write_template`](crate::write_template).
///
/// All of them are internal errors from the client's point of view; see
/// [`Error::status_code`]. The host decides what to send, typically by
/// calling [`write_error`](crate::write_error).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Template lookup or execution failed, or no template directory exists.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The value could not be encoded as JSON.
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Status the client should see for this error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Returns true for the "no template directory" condition.
    pub fn is_no_template_directory(&self) -> bool {
        matches!(self, Error::Render(err) if err.is_no_template_directory())
    }
}
