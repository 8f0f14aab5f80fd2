//! Template tree fixtures.
//!
//! [`TemplateTree`] lays out `layouts/`, `pages/`, and `partials/` in a temporary
//! directory and hands back a matching [`RendererConfig`].

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::RendererConfig;
use crate::pattern::anchor_pattern;

/// A temporary template tree, removed when dropped.
pub struct TemplateTree {
    temp_dir: TempDir,
}

impl TemplateTree {
    /// Create an empty tree with `layouts/`, `pages/`, and `partials/` directories.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temp dir")?;
        for dir in ["layouts", "pages", "partials"] {
            fs::create_dir_all(temp_dir.path().join(dir))
                .with_context(|| format!("Failed to create {dir}/"))?;
        }
        Ok(Self {
            temp_dir,
        })
    }

    /// A small site: `base.html` layout, `home.html` and `about.html` pages,
    /// `header.html` and `footer.html` partials.
    pub fn with_basic_site() -> Result<Self> {
        let tree = Self::new()?;
        tree.layout(
            "base.html",
            r#"<!doctype html>
<html>
<head><title>{% block title %}{{ Title }}{% endblock title %}</title></head>
<body>
{% block layout %}{% include "header.html" %}
{% block content %}{% endblock content %}
{% include "footer.html" %}{% endblock layout %}
</body>
</html>
"#,
        )?;
        tree.page(
            "home.html",
            r#"{% extends "base.html" %}
{% block content %}<main class="home">Welcome, {{ Title }}</main>{% endblock content %}"#,
        )?;
        tree.page(
            "about.html",
            r#"{% extends "base.html" %}
{% block title %}About{% endblock title %}
{% block content %}<main class="about">About this site</main>{% endblock content %}"#,
        )?;
        tree.partial("header.html", r#"<header>{{ site | default(value="prism") }}</header>"#)?;
        tree.partial("footer.html", "<footer>&copy; prism</footer>")?;
        Ok(tree)
    }

    /// Root directory of the tree.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a layout under `layouts/`.
    pub fn layout(&self, name: &str, content: &str) -> Result<PathBuf> {
        self.write(&format!("layouts/{name}"), content)
    }

    /// Write a page under `pages/`.
    pub fn page(&self, name: &str, content: &str) -> Result<PathBuf> {
        self.write(&format!("pages/{name}"), content)
    }

    /// Write a partial under `partials/`.
    pub fn partial(&self, name: &str, content: &str) -> Result<PathBuf> {
        self.write(&format!("partials/{name}"), content)
    }

    /// Write any file relative to the root, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Patterns matching `*.html` in the three directories of this tree.
    pub fn config(&self) -> RendererConfig {
        RendererConfig::new(
            anchor_pattern(self.root(), "layouts/*.html"),
            anchor_pattern(self.root(), "pages/*.html"),
            anchor_pattern(self.root(), "partials/*.html"),
        )
    }

    /// Write a `prism.toml` with relative patterns for this tree and return its path.
    pub fn write_config_file(&self) -> Result<PathBuf> {
        self.write(
            "prism.toml",
            r#"[templates]
layouts = "layouts/*.html"
pages = "pages/*.html"
partials = "partials/*.html"
"#,
        )
    }
}
