//! Argument groups and helpers shared by every subcommand.

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

use crate::config::RendererConfig;
use crate::templating::Renderer;

/// Per-invocation overrides for the three template patterns.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternArgs {
    /// Glob pattern for layouts (overrides the configuration file)
    #[arg(long, value_name = "GLOB")]
    pub layouts: Option<String>,

    /// Glob pattern for pages (overrides the configuration file)
    #[arg(long, value_name = "GLOB")]
    pub pages: Option<String>,

    /// Glob pattern for partials (overrides the configuration file)
    #[arg(long, value_name = "GLOB")]
    pub partials: Option<String>,
}

impl PatternArgs {
    /// Discover the configuration and apply these overrides.
    pub fn resolve_config(&self, config_path: Option<&Path>) -> Result<RendererConfig> {
        let config = RendererConfig::discover(config_path)?;
        Ok(config.with_overrides(self.layouts.clone(), self.pages.clone(), self.partials.clone()))
    }

    /// Build a renderer from the resolved configuration.
    pub fn load_renderer(&self, config_path: Option<&Path>) -> Result<Renderer> {
        let config = self.resolve_config(config_path)?;
        tracing::debug!(
            "Patterns: layouts={} pages={} partials={}",
            config.layouts,
            config.pages,
            config.partials
        );
        let renderer = Renderer::new(config).context("Failed to build template cache")?;
        Ok(renderer)
    }
}
