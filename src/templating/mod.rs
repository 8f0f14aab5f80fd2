//! Layout/page/partial template compilation and rendering.
//!
//! This module builds an in-memory cache of compiled pages and renders them on
//! demand with injected data. Template syntax, escaping, and expression evaluation
//! are provided by [Tera](https://keats.github.io/tera/); this module decides which
//! files are compiled together and how a render request is dispatched.
//!
//! # Template Tree
//!
//! Three glob patterns (see [`crate::config::RendererConfig`]) select the files:
//!
//! - **Layouts**: outer page structure with named blocks
//! - **Pages**: one file per view; its base file name is the page key
//! - **Partials**: shared fragments such as headers and footers
//!
//! Every page is compiled together with all layouts and all partials into one
//! [`TemplateDocument`]. Templates refer to each other by base file name:
//!
//! ```text
//! templates/layouts/base.html
//!     <html>{% block layout %}{% include "header.html" %}{% block content %}{% endblock content %}{% endblock layout %}</html>
//!
//! templates/pages/home.html
//!     {% extends "base.html" %}
//!     {% block content %}<h1>{{ Title }}</h1>{% endblock content %}
//!
//! templates/partials/header.html
//!     <header>{{ site_name }}</header>
//! ```
//!
//! # Rendering
//!
//! [`Renderer::render`] takes a page key, an entry name (a template or block inside
//! the page's document), and any `serde::Serialize` value. A map's fields become
//! template variables; any other value is bound as `data`. It always writes
//! exactly one response into the [`ResponseSink`]:
//!
//! | Outcome              | Status | Body                       |
//! |----------------------|--------|----------------------------|
//! | Rendered             | 200    | the HTML                   |
//! | Unknown page key     | 404    | `Template not found`       |
//! | Rendering failed     | 500    | `Error rendering template` |
//!
//! [`Renderer::try_render`] returns the same outcomes as a [`RenderError`] instead.

pub mod cache;
pub mod document;
pub mod error;
pub mod renderer;
pub mod response;


pub use cache::TemplateCache;
pub use document::{TemplateDocument, TemplateSource};
pub use error::{RenderError, format_tera_error};
pub use renderer::Renderer;
pub use response::{BufferedResponse, ResponseSink, Status};
