//! Renderer configuration.
//!
//! A renderer is configured with three glob patterns, one per template file set.
//! They can be given directly in code or loaded from a `prism.toml` file:
//!
//! ```toml
//! [templates]
//! layouts = "templates/layouts/*.html"
//! pages = "templates/pages/*.html"
//! partials = "templates/partials/*.html"
//! ```
//!
//! Any key left out falls back to the conventional pattern shown above.
//!
//! # Relative Patterns
//!
//! Patterns loaded from a file are anchored at the file's directory, so a config
//! file works no matter which directory the process is started from. Patterns built
//! in code are used as given (relative to the working directory) unless
//! [`RendererConfig::anchored_at`] is called.
//!
//! # Discovery
//!
//! [`RendererConfig::discover`] picks the configuration in this order:
//!
//! 1. An explicit path (e.g. `prism --config site.toml`)
//! 2. The path in the `PRISM_CONFIG` environment variable
//! 3. `prism.toml` in the working directory, if present
//! 4. The default patterns

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{
    CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_LAYOUT_PATTERN, DEFAULT_PAGE_PATTERN,
    DEFAULT_PARTIAL_PATTERN,
};
use crate::core::PrismError;
use crate::pattern::anchor_pattern;

/// The three file-set patterns a renderer is built from.
///
/// Supplied once at construction; the renderer never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Pattern for layouts, e.g. `templates/layouts/*.html`
    pub layouts: String,
    /// Pattern for pages, e.g. `templates/pages/*.html`
    pub pages: String,
    /// Pattern for partials, e.g. `templates/partials/*.html`
    pub partials: String,
}

/// On-disk shape of `prism.toml`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    templates: RendererConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            layouts: DEFAULT_LAYOUT_PATTERN.to_string(),
            pages: DEFAULT_PAGE_PATTERN.to_string(),
            partials: DEFAULT_PARTIAL_PATTERN.to_string(),
        }
    }
}

impl RendererConfig {
    /// Create a configuration from explicit patterns.
    pub fn new(
        layouts: impl Into<String>,
        pages: impl Into<String>,
        partials: impl Into<String>,
    ) -> Self {
        Self {
            layouts: layouts.into(),
            pages: pages.into(),
            partials: partials.into(),
        }
    }

    /// Default patterns anchored at `root`.
    ///
    /// `RendererConfig::from_root("site")` looks for `site/templates/layouts/*.html`
    /// and so on.
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        Self::default().anchored_at(root.as_ref())
    }

    /// Anchor every relative pattern at `dir`.
    #[must_use]
    pub fn anchored_at(self, dir: &Path) -> Self {
        Self {
            layouts: anchor_pattern(dir, &self.layouts),
            pages: anchor_pattern(dir, &self.pages),
            partials: anchor_pattern(dir, &self.partials),
        }
    }

    /// Load a configuration file, anchoring relative patterns at its directory.
    ///
    /// # Errors
    ///
    /// - [`PrismError::ConfigNotFound`] if the file does not exist
    /// - [`PrismError::Io`] if it cannot be read
    /// - [`PrismError::ConfigParse`] if it is not valid TOML for this schema
    pub fn load_from(path: &Path) -> Result<Self, PrismError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                PrismError::ConfigNotFound {
                    path: path.display().to_string(),
                }
            } else {
                PrismError::Io {
                    operation: format!("reading {}", path.display()),
                    reason: e.to_string(),
                }
            }
        })?;

        let file: ConfigFile = toml::from_str(&content).map_err(|e| PrismError::ConfigParse {
            path: path.display().to_string(),
            reason: e.message().to_string(),
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        debug!("Loaded configuration from {}", path.display());
        Ok(file.templates.anchored_at(base_dir))
    }

    /// Find and load the configuration for this process.
    ///
    /// See the [module documentation](self) for the lookup order.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit or environment-provided file is missing or
    /// invalid, or if `prism.toml` exists in the working directory but is invalid.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, PrismError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
            debug!("Using configuration from {}", CONFIG_ENV_VAR);
            return Self::load_from(&PathBuf::from(path));
        }

        let local = Path::new(CONFIG_FILE_NAME);
        if local.is_file() {
            return Self::load_from(local);
        }

        debug!("No configuration file found, using default patterns");
        Ok(Self::default())
    }

    /// Replace individual patterns, keeping the others.
    #[must_use]
    pub fn with_overrides(
        mut self,
        layouts: Option<String>,
        pages: Option<String>,
        partials: Option<String>,
    ) -> Self {
        if let Some(layouts) = layouts {
            self.layouts = layouts;
        }
        if let Some(pages) = pages {
            self.pages = pages;
        }
        if let Some(partials) = partials {
            self.partials = partials;
        }
        self
    }
}
