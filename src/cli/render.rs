//! `prism render`: render one page entry to stdout.

use anyhow::{Context, Result, bail};
use clap::Args;
use serde_json::Value;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::common::PatternArgs;
use crate::templating::{BufferedResponse, Status};

/// Render a page entry with JSON data.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Page key, e.g. `home.html`
    #[arg(value_name = "PAGE")]
    pub page: String,

    /// Template or block to render (defaults to the page itself)
    #[arg(short, long, value_name = "NAME")]
    pub entry: Option<String>,

    /// JSON file with template data, or `-` for stdin
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    #[command(flatten)]
    pub patterns: PatternArgs,
}

impl RenderCommand {
    pub fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let renderer = self.patterns.load_renderer(config_path)?;
        let data = read_data(self.data.as_deref())?;
        let entry = self.entry.as_deref().unwrap_or(&self.page);

        let mut response = BufferedResponse::new();
        let status = renderer.render(&mut response, &self.page, entry, &data);

        if status != Status::Ok {
            bail!("{}: {}", status, response.body_text());
        }

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(response.body()).context("Failed to write rendered page")?;
        stdout.flush().context("Failed to flush stdout")?;
        Ok(())
    }
}

/// Load template data from a file, stdin (`-`), or default to `{}`.
fn read_data(source: Option<&Path>) -> Result<Value> {
    let content = match source {
        None => return Ok(Value::Object(serde_json::Map::new())),
        Some(path) if path == Path::new("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("Failed to read data from stdin")?;
            buf
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read data file {}", path.display()))?,
    };

    serde_json::from_str(&content).context("Template data is not valid JSON")
}
