//! Response sinks the renderer writes into.
//!
//! The renderer does not know about any particular HTTP framework. It writes a
//! status, a content type, and a complete body into a [`ResponseSink`]; adapters for
//! a web framework implement the trait on top of their response type.

use std::fmt;
use std::io;

/// The statuses a render call can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// 200: the page rendered
    Ok,
    /// 404: the page key is not in the cache
    NotFound,
    /// 500: the page exists but executing it failed
    InternalServerError,
}

impl Status {
    /// Numeric HTTP status code.
    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NotFound => 404,
            Self::InternalServerError => 500,
        }
    }

    /// Canonical HTTP reason phrase.
    pub const fn reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NotFound => "Not Found",
            Self::InternalServerError => "Internal Server Error",
        }
    }

    /// Whether this is a success status.
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

/// Destination for a rendered response.
///
/// `respond` is called exactly once per render with the complete body, so an
/// implementation never sees a success body followed by an error.
pub trait ResponseSink {
    /// Write the status, content type, and body of the response.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying destination.
    fn respond(&mut self, status: Status, content_type: &str, body: &[u8]) -> io::Result<()>;
}

impl<S: ResponseSink + ?Sized> ResponseSink for &mut S {
    fn respond(&mut self, status: Status, content_type: &str, body: &[u8]) -> io::Result<()> {
        (**self).respond(status, content_type, body)
    }
}

/// In-memory response, used by the CLI and tests.
///
/// A later `respond` call replaces the previous response entirely.
///
/// # Examples
///
/// ```rust
/// use prism_render::templating::{BufferedResponse, ResponseSink, Status};
///
/// let mut response = BufferedResponse::new();
/// response.respond(Status::NotFound, "text/plain", b"Template not found").unwrap();
/// assert_eq!(response.status(), Some(Status::NotFound));
/// assert_eq!(response.body_text(), "Template not found");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferedResponse {
    status: Option<Status>,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl BufferedResponse {
    /// Create an empty response with no status yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Status written by the last `respond` call, if any.
    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// Content type written by the last `respond` call, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Consume the response and return the body.
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

impl ResponseSink for BufferedResponse {
    fn respond(&mut self, status: Status, content_type: &str, body: &[u8]) -> io::Result<()> {
        self.status = Some(status);
        self.content_type = Some(content_type.to_string());
        self.body.clear();
        self.body.extend_from_slice(body);
        Ok(())
    }
}
