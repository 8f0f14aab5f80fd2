//! `prism list`: show the compiled template cache.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::Path;

use super::common::PatternArgs;
use crate::templating::TemplateCache;

/// Output format for `list`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One `[key]\t=\ttemplates` line per page
    #[default]
    Text,
    /// A JSON array of `{ "page", "templates" }` objects
    Json,
}

/// List page keys and the templates compiled into each page.
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Output format: text or json
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub patterns: PatternArgs,
}

#[derive(Serialize)]
struct PageListing<'a> {
    page: &'a str,
    templates: Vec<&'a str>,
}

impl ListCommand {
    /// Build the cache and print it to stdout.
    pub fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let renderer = self.patterns.load_renderer(config_path)?;
        println!("{}", format_cache(renderer.cache(), self.format)?);
        Ok(())
    }
}

/// Render the cache listing in `format`.
pub(crate) fn format_cache(cache: &TemplateCache, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(cache.describe().join("\n")),
        OutputFormat::Json => {
            let listing: Vec<PageListing<'_>> = cache
                .iter()
                .map(|(page, doc)| PageListing {
                    page,
                    templates: doc.template_names().collect(),
                })
                .collect();
            serde_json::to_string_pretty(&listing).context("Failed to serialize page listing")
        }
    }
}
