//! Prism - precompiled HTML view rendering
//!
//! Prism compiles a tree of HTML templates once at startup and renders pages by
//! name with injected data. Templates come in three kinds, each selected by a
//! glob pattern:
//!
//! - **Layouts** define the outer structure of a page with named blocks
//! - **Pages** fill a layout's blocks; each page file's base name is its key
//! - **Partials** are shared fragments included by layouts and pages
//!
//! Every page is compiled into its own template set together with all layouts
//! and all partials, so blocks defined by one page never leak into another.
//!
//! # Core Modules
//!
//! - [`templating`] - template cache, renderer, and response sink
//! - [`config`] - pattern configuration and `prism.toml` loading
//! - [`pattern`] - glob resolution for template files
//! - [`core`] - startup error types and user-facing error display
//! - [`cli`] - the `prism` command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use prism_render::config::RendererConfig;
//! use prism_render::templating::{BufferedResponse, Renderer};
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let renderer = Renderer::new(RendererConfig::new(
//!     "templates/layouts/*.html",
//!     "templates/pages/*.html",
//!     "templates/partials/*.html",
//! ))?;
//!
//! let mut response = BufferedResponse::new();
//! renderer.render(&mut response, "home.html", "layout", &json!({ "Title": "Home" }));
//! println!("{}", response.body_text());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod pattern;
pub mod templating;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
