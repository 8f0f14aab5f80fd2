//! Glob pattern resolution for template file sets.
//!
//! Each of the three configured file sets (layouts, pages, partials) is described by
//! a glob pattern such as `templates/pages/*.html`. This module turns a pattern into
//! a concrete, ordered list of files.
//!
//! # Pattern Syntax
//!
//! Standard glob syntax from the [`glob`] crate:
//!
//! - `*` matches any sequence of characters within a single path component
//! - `**` matches any sequence of path components (recursive matching)
//! - `?` matches any single character
//! - `[abc]` / `[a-z]` match one character from a set or range
//!
//! # Resolution Rules
//!
//! - Matches are returned in lexical path order, so cache construction is
//!   deterministic across platforms.
//! - Directories that happen to match are skipped; only regular files are template
//!   sources.
//! - A pattern matching nothing resolves to an empty list, which is not an error.
//! - Malformed syntax is reported as [`PrismError::InvalidPattern`] and unreadable
//!   directory entries as [`PrismError::PatternWalk`].

use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::core::{PatternKind, PrismError};

/// A validated glob pattern for one of the configured file sets.
///
/// # Examples
///
/// ```rust,no_run
/// use prism_render::core::PatternKind;
/// use prism_render::pattern::PatternMatcher;
///
/// # fn example() -> Result<(), prism_render::core::PrismError> {
/// let matcher = PatternMatcher::new(PatternKind::Page, "templates/pages/*.html")?;
/// for page in matcher.resolve()? {
///     println!("page: {}", page.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    kind: PatternKind,
    pattern: Pattern,
    original_pattern: String,
}

impl PatternMatcher {
    /// Compile a pattern for the given file set.
    ///
    /// # Errors
    ///
    /// Returns [`PrismError::InvalidPattern`] if the glob syntax is invalid.
    pub fn new(kind: PatternKind, pattern_str: &str) -> Result<Self, PrismError> {
        let pattern = Pattern::new(pattern_str).map_err(|e| PrismError::InvalidPattern {
            kind,
            pattern: pattern_str.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            kind,
            pattern,
            original_pattern: pattern_str.to_string(),
        })
    }

    /// The file set this pattern was configured for.
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// The pattern string as configured.
    pub fn as_str(&self) -> &str {
        &self.original_pattern
    }

    /// Expand the pattern against the filesystem.
    ///
    /// Returns matching regular files in lexical order.
    ///
    /// # Errors
    ///
    /// - [`PrismError::InvalidPattern`] if the pattern cannot be expanded
    /// - [`PrismError::PatternWalk`] if a matched directory entry cannot be read
    pub fn resolve(&self) -> Result<Vec<PathBuf>, PrismError> {
        debug!("Resolving {} pattern '{}'", self.kind, self.original_pattern);

        let paths = glob::glob(&self.original_pattern).map_err(|e| PrismError::InvalidPattern {
            kind: self.kind,
            pattern: self.original_pattern.clone(),
            reason: e.to_string(),
        })?;

        let mut matches = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| PrismError::PatternWalk {
                kind: self.kind,
                pattern: self.original_pattern.clone(),
                path: e.path().display().to_string(),
                reason: e.error().to_string(),
            })?;

            if !path.is_file() {
                trace!("Skipping non-file match: {}", path.display());
                continue;
            }

            trace!("Found match: {}", path.display());
            matches.push(path);
        }

        matches.sort();
        matches.dedup();

        debug!(
            "Found {} {} file(s) for pattern '{}'",
            matches.len(),
            self.kind,
            self.original_pattern
        );
        Ok(matches)
    }

    /// Check whether a path matches the pattern without touching the filesystem.
    pub fn matches(&self, path: &Path) -> bool {
        self.pattern.matches_path(path)
    }
}

/// Anchor a relative pattern at `base_dir`.
///
/// Absolute patterns are returned unchanged. The base directory is escaped so
/// that directory names containing glob metacharacters (`[`, `*`, `?`) are matched
/// literally.
///
/// # Examples
///
/// ```rust
/// use prism_render::pattern::anchor_pattern;
/// use std::path::Path;
///
/// let anchored = anchor_pattern(Path::new("/srv/site"), "pages/*.html");
/// assert_eq!(anchored, "/srv/site/pages/*.html");
/// ```
pub fn anchor_pattern(base_dir: &Path, pattern: &str) -> String {
    if Path::new(pattern).is_absolute() || base_dir.as_os_str().is_empty() {
        return pattern.to_string();
    }

    let base = Pattern::escape(&base_dir.to_string_lossy());
    let base = base.trim_end_matches(['/', '\\']);
    format!("{base}/{pattern}")
}

/// Base file name of a path, used as page key and template name.
///
/// Falls back to the full lossy path when the path has no final component.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
