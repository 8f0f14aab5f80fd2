//! Integration test suite for prism
//!
//! End-to-end tests that build real template trees on disk and exercise the
//! public renderer API and the `prism` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **renderer**: cache construction and render dispatch through the library API
//! - **config**: `prism.toml` discovery and pattern anchoring
//! - **cli**: the `prism list`, `check`, and `render` commands

mod cli;
mod config;
mod renderer;
