//! `prism check`: compile every page and report the result.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

use super::common::PatternArgs;

/// Compile every page and report problems.
///
/// Exits non-zero on the first pattern, read, parse, or collision error.
#[derive(Args, Debug)]
pub struct CheckCommand {
    #[command(flatten)]
    pub patterns: PatternArgs,
}

impl CheckCommand {
    pub fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let renderer = self.patterns.load_renderer(config_path)?;
        let count = renderer.cache().len();

        if count == 0 {
            println!("{} No pages matched '{}'", "⚠".yellow(), renderer.config().pages);
        } else {
            println!("{} {} page(s) compiled", "✓".green(), count);
        }
        Ok(())
    }
}
