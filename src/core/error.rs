//! Error handling for prism
//!
//! This module provides the startup error type and user-friendly error reporting for
//! the renderer and its CLI. The error system follows two principles:
//! 1. **Strongly-typed errors** for precise handling in code and tests
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`PrismError`] - Every failure that can happen while loading configuration or
//!   building the template cache
//! - [`ErrorContext`] - Wrapper that adds details and suggestions for display
//!
//! Per-request failures are not startup errors; they live in
//! [`crate::templating::RenderError`] and are turned into HTTP-style responses.
//!
//! # Examples
//!
//! ```rust,no_run
//! use prism_render::core::{PrismError, user_friendly_error};
//!
//! fn build() -> Result<(), PrismError> {
//!     Err(PrismError::DuplicatePageKey {
//!         key: "index.html".to_string(),
//!         first: "pages/index.html".to_string(),
//!         second: "pages/blog/index.html".to_string(),
//!     })
//! }
//!
//! if let Err(e) = build() {
//!     user_friendly_error(anyhow::Error::from(e)).display();
//! }
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Which of the three configured file sets a pattern belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// Shared outer page structure
    Layout,
    /// One template per view, keyed by base file name
    Page,
    /// Shared fragments included across pages
    Partial,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Layout => "layout",
            Self::Page => "page",
            Self::Partial => "partial",
        };
        f.write_str(name)
    }
}

/// The main error type for building a renderer.
///
/// All variants describe startup or configuration problems. A renderer is either
/// constructed completely or not at all; there is no partially-built cache.
///
/// # Error Categories
///
/// ## Pattern Resolution
/// - [`InvalidPattern`] - Malformed glob syntax
/// - [`PatternWalk`] - A path could not be read while expanding a pattern
///
/// ## Template Sources
/// - [`TemplateRead`] - A matched file could not be read
/// - [`TemplateParse`] - Tera rejected a page's combined template set
/// - [`DuplicatePageKey`] - Two pages share a base file name
/// - [`DuplicateTemplateName`] - Two sources inside one document share a name
///
/// ## Configuration
/// - [`ConfigNotFound`] - An explicitly requested config file is missing
/// - [`ConfigParse`] - Invalid TOML in the config file
///
/// [`InvalidPattern`]: PrismError::InvalidPattern
/// [`PatternWalk`]: PrismError::PatternWalk
/// [`TemplateRead`]: PrismError::TemplateRead
/// [`TemplateParse`]: PrismError::TemplateParse
/// [`DuplicatePageKey`]: PrismError::DuplicatePageKey
/// [`DuplicateTemplateName`]: PrismError::DuplicateTemplateName
/// [`ConfigNotFound`]: PrismError::ConfigNotFound
/// [`ConfigParse`]: PrismError::ConfigParse
#[derive(Error, Debug, Clone)]
pub enum PrismError {
    /// The glob pattern for a file set has invalid syntax
    #[error("Invalid {kind} pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// File set the pattern was configured for
        kind: PatternKind,
        /// The pattern as configured
        pattern: String,
        /// Parser message from the glob engine
        reason: String,
    },

    /// A directory entry could not be read while expanding a pattern
    #[error("Failed to expand {kind} pattern '{pattern}' at {path}: {reason}")]
    PatternWalk {
        /// File set the pattern was configured for
        kind: PatternKind,
        /// The pattern as configured
        pattern: String,
        /// Path that could not be read
        path: String,
        /// Underlying I/O error
        reason: String,
    },

    /// A template source file could not be read
    #[error("Failed to read template {path}: {reason}")]
    TemplateRead {
        /// Path of the source file
        path: String,
        /// Underlying I/O error
        reason: String,
    },

    /// Tera could not parse or link the template set for a page
    #[error("Failed to compile templates for page '{page}': {reason}")]
    TemplateParse {
        /// Page key whose document failed
        page: String,
        /// Flattened Tera error chain
        reason: String,
    },

    /// Two page files resolve to the same page key
    #[error("Page key '{key}' is produced by both {first} and {second}")]
    DuplicatePageKey {
        /// The colliding base file name
        key: String,
        /// Path that claimed the key first
        first: String,
        /// Path that collided with it
        second: String,
    },

    /// Two source files inside one document share a template name
    #[error("Template name '{name}' in page '{page}' is used by both {first} and {second}")]
    DuplicateTemplateName {
        /// Page key of the document being assembled
        page: String,
        /// The colliding base file name
        name: String,
        /// Path registered first
        first: String,
        /// Path that collided with it
        second: String,
    },

    /// An explicitly requested configuration file does not exist
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was requested
        path: String,
    },

    /// The configuration file is not valid TOML for [`crate::config::RendererConfig`]
    #[error("Invalid configuration file {path}: {reason}")]
    ConfigParse {
        /// Path of the configuration file
        path: String,
        /// Parser message
        reason: String,
    },

    /// Any other I/O failure
    #[error("I/O error during {operation}: {reason}")]
    Io {
        /// What was being attempted
        operation: String,
        /// Underlying I/O error
        reason: String,
    },
}

/// An error with optional details and an actionable suggestion.
///
/// Used by the CLI to print errors as:
///
/// ```text
/// error: Invalid page pattern 'pages/[*.html': Pattern syntax error near position 6
/// details: glob patterns support *, ?, [..] and ** ...
/// suggestion: Check the `pages` entry in prism.toml
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error, already rendered as text
    pub error: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no details or suggestion.
    #[must_use]
    pub fn new(error: impl fmt::Display) -> Self {
        Self {
            error: error.to_string(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] with suggestions where one is known.
///
/// Walks the `anyhow` chain looking for a [`PrismError`], so errors wrapped with
/// `.context(..)` still get their tailored suggestion.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(prism_error) = cause.downcast_ref::<PrismError>() {
            return create_error_context(prism_error);
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::NotFound {
            return ErrorContext::new(&error)
                .with_suggestion("Check that the file or directory exists and the path is correct");
        }
    }

    // Keep the full chain for anything unrecognised
    ErrorContext::new(format!("{error:#}"))
}

fn create_error_context(error: &PrismError) -> ErrorContext {
    match error {
        PrismError::InvalidPattern {
            kind,
            ..
        } => ErrorContext::new(error)
            .with_details("Glob patterns support *, ?, [...] character classes and ** for recursion")
            .with_suggestion(format!("Check the `{}` entry in prism.toml", config_key(*kind))),
        PrismError::PatternWalk {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check directory permissions for the template tree"),
        PrismError::TemplateRead {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check that the file is readable and valid UTF-8"),
        PrismError::TemplateParse {
            ..
        } => ErrorContext::new(error)
            .with_details(
                "Each page is compiled together with every layout and partial, so the \
                 failing file may be a shared one",
            )
            .with_suggestion(
                "Look for unclosed {{ }} or {% %} delimiters and `extends`/`include` targets \
                 that are not matched by any pattern",
            ),
        PrismError::DuplicatePageKey {
            ..
        } => ErrorContext::new(error)
            .with_details("Pages are keyed by base file name, which must be unique")
            .with_suggestion("Rename one of the pages or narrow the `pages` pattern"),
        PrismError::DuplicateTemplateName {
            ..
        } => ErrorContext::new(error)
            .with_details("Layouts, the page, and partials share one template namespace per page")
            .with_suggestion("Give layouts, pages, and partials distinct file names"),
        PrismError::ConfigNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Pass an existing file with --config or unset PRISM_CONFIG"),
        PrismError::ConfigParse {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Expected a [templates] table with `layouts`, `pages`, and `partials` strings",
        ),
        PrismError::Io {
            ..
        } => ErrorContext::new(error),
    }
}

const fn config_key(kind: PatternKind) -> &'static str {
    match kind {
        PatternKind::Layout => "layouts",
        PatternKind::Page => "pages",
        PatternKind::Partial => "partials",
    }
}
