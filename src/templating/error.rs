//! Per-request render errors.
//!
//! These never terminate the process. [`crate::templating::Renderer::render`] maps
//! them onto a response status, and
//! [`crate::templating::Renderer::try_render`] hands them to the caller.

use thiserror::Error;

use super::response::Status;

/// Why a render call did not produce a page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The page key is not in the cache
    #[error("Template not found: '{page}'")]
    PageNotFound {
        /// Requested page key
        page: String,
        /// Close matches among the cached page keys
        suggestions: Vec<String>,
    },

    /// The page's document has no template or block with the requested name
    #[error("Page '{page}' has no template or block named '{entry}'")]
    UndefinedEntry {
        /// Page key
        page: String,
        /// Requested sub-template name
        entry: String,
    },

    /// The render data could not be serialized
    #[error("Render data for page '{page}' could not be serialized: {reason}")]
    InvalidData {
        /// Page key
        page: String,
        /// Serialization failure
        reason: String,
    },

    /// Tera failed while executing the template
    #[error("Failed to render '{entry}' for page '{page}': {message}")]
    Execution {
        /// Page key
        page: String,
        /// Requested sub-template name
        entry: String,
        /// Flattened Tera error chain
        message: String,
    },
}

impl RenderError {
    /// The response status this error is reported with.
    pub fn status(&self) -> Status {
        match self {
            Self::PageNotFound {
                ..
            } => Status::NotFound,
            Self::UndefinedEntry {
                ..
            }
            | Self::InvalidData {
                ..
            }
            | Self::Execution {
                ..
            } => Status::InternalServerError,
        }
    }
}

/// Flatten a Tera error and its sources into one message.
///
/// Tera wraps the useful message (e.g. "Variable `title` not found") in one or more
/// "Failed to render 'x'" layers; this keeps every distinct layer, outermost first.
pub fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut messages: Vec<String> = Vec::new();
    let mut current: Option<&dyn Error> = Some(error);
    while let Some(err) = current {
        let msg = err.to_string().trim().to_string();
        if !msg.is_empty() && !messages.contains(&msg) {
            messages.push(msg);
        }
        current = err.source();
    }

    if messages.is_empty() {
        "unknown template error".to_string()
    } else {
        messages.join(" → ")
    }
}
