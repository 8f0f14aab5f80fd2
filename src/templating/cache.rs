//! Template cache construction.
//!
//! The cache maps each page key (the page's base file name) to a
//! [`TemplateDocument`] compiled from every layout, the page, and every partial.
//! It is built once and is read-only afterwards; there is no insert or remove API.
//! A changed template tree requires building a new cache.
//!
//! # Build Steps
//!
//! 1. Resolve the layout, page, and partial patterns (all three, even if no pages
//!    match, so a malformed pattern is always reported)
//! 2. Read every matched file once; layouts and partials are shared between
//!    documents through [`Arc`]
//! 3. Compile one document per page
//!
//! Any failure aborts the whole build; a partially-built cache is never returned.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use super::document::{TemplateDocument, TemplateSource};
use crate::config::RendererConfig;
use crate::core::{PatternKind, PrismError};
use crate::pattern::PatternMatcher;

/// Page key → compiled document.
#[derive(Debug, Default)]
pub struct TemplateCache {
    documents: HashMap<String, TemplateDocument>,
}

impl TemplateCache {
    /// Build the cache from the three configured patterns.
    ///
    /// A page pattern matching no files yields an empty cache.
    ///
    /// # Errors
    ///
    /// - [`PrismError::InvalidPattern`] / [`PrismError::PatternWalk`] from pattern
    ///   resolution
    /// - [`PrismError::TemplateRead`] if a matched file cannot be read
    /// - [`PrismError::DuplicatePageKey`] if two pages share a base file name
    /// - [`PrismError::DuplicateTemplateName`] / [`PrismError::TemplateParse`] from
    ///   compiling a page's document
    pub fn build(config: &RendererConfig) -> Result<Self, PrismError> {
        let layout_files = PatternMatcher::new(PatternKind::Layout, &config.layouts)?.resolve()?;
        let page_files = PatternMatcher::new(PatternKind::Page, &config.pages)?.resolve()?;
        let partial_files =
            PatternMatcher::new(PatternKind::Partial, &config.partials)?.resolve()?;

        debug!(
            "Building template cache: {} layout(s), {} page(s), {} partial(s)",
            layout_files.len(),
            page_files.len(),
            partial_files.len()
        );

        let layouts = read_sources(&layout_files, PatternKind::Layout)?;
        let partials = read_sources(&partial_files, PatternKind::Partial)?;

        let mut documents = HashMap::with_capacity(page_files.len());
        let mut origins: HashMap<String, PathBuf> = HashMap::with_capacity(page_files.len());

        for page_file in &page_files {
            let page = Arc::new(TemplateSource::read(page_file, PatternKind::Page)?);
            let key = page.name().to_string();

            if let Some(first) = origins.get(&key) {
                return Err(PrismError::DuplicatePageKey {
                    key,
                    first: first.display().to_string(),
                    second: page_file.display().to_string(),
                });
            }

            let document = TemplateDocument::compile(page, &layouts, &partials)?;
            origins.insert(key.clone(), page_file.clone());
            documents.insert(key, document);
        }

        Ok(Self {
            documents,
        })
    }

    /// Look up the document for a page key.
    pub fn get(&self, key: &str) -> Option<&TemplateDocument> {
        self.documents.get(key)
    }

    /// Whether a page key is cached.
    pub fn contains(&self, key: &str) -> bool {
        self.documents.contains_key(key)
    }

    /// Number of cached pages.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the cache has no pages.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Page keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.documents.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Documents in page key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TemplateDocument)> {
        self.keys().into_iter().filter_map(move |key| self.get(key).map(|doc| (key, doc)))
    }

    /// One `[key]\t=\ttemplates` line per page, in key order.
    pub fn describe(&self) -> Vec<String> {
        self.iter()
            .map(|(key, doc)| {
                format!("[{}]\t=\t{}", key, doc.template_names().collect::<Vec<_>>().join(", "))
            })
            .collect()
    }

    /// Log every cache entry at debug level.
    pub fn log_entries(&self) {
        for line in self.describe() {
            debug!("{}", line);
        }
    }
}

fn read_sources(
    files: &[PathBuf],
    kind: PatternKind,
) -> Result<Vec<Arc<TemplateSource>>, PrismError> {
    files.iter().map(|path| TemplateSource::read(path, kind).map(Arc::new)).collect()
}
