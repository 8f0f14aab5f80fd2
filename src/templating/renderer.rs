//! Render dispatch over a prebuilt template cache.
//!
//! [`Renderer`] owns its configuration and its [`TemplateCache`]. The cache is built
//! eagerly in [`Renderer::new`] and never changes afterwards, so a renderer can be
//! shared across request threads (e.g. behind an `Arc`) without locking.
//!
//! Rendering happens into a buffer; the response sink only receives a body once the
//! outcome is known. A failing template therefore never leaves half a page followed
//! by an error in the sink.

use serde::Serialize;
use serde_json::Value;
use strsim::levenshtein;
use tera::Context as TeraContext;
use tracing::{debug, error, warn};

use super::cache::TemplateCache;
use super::error::RenderError;
use super::response::{ResponseSink, Status};
use crate::config::RendererConfig;
use crate::constants::{
    DATA_VARIABLE, HTML_CONTENT_TYPE, MAX_PAGE_SUGGESTIONS, NOT_FOUND_BODY, RENDER_ERROR_BODY,
    SIMILARITY_THRESHOLD_PERCENT, TEXT_CONTENT_TYPE,
};
use crate::core::PrismError;

/// HTML view renderer over precompiled layouts, pages, and partials.
///
/// # Examples
///
/// ```rust,no_run
/// use prism_render::config::RendererConfig;
/// use prism_render::templating::{BufferedResponse, Renderer, Status};
/// use serde_json::json;
///
/// # fn example() -> anyhow::Result<()> {
/// let renderer = Renderer::new(RendererConfig::from_root("site"))?;
///
/// let mut response = BufferedResponse::new();
/// let status = renderer.render(&mut response, "home.html", "layout", &json!({ "title": "Hi" }));
/// assert_eq!(status, Status::Ok);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Renderer {
    config: RendererConfig,
    cache: TemplateCache,
}

impl Renderer {
    /// Build the template cache for `config` and return a ready renderer.
    ///
    /// # Errors
    ///
    /// Any [`PrismError`] from [`TemplateCache::build`]. No renderer is returned
    /// for a partially valid template tree.
    pub fn new(config: RendererConfig) -> Result<Self, PrismError> {
        let cache = TemplateCache::build(&config)?;
        debug!("Template cache ready with {} page(s)", cache.len());
        cache.log_entries();

        Ok(Self {
            config,
            cache,
        })
    }

    /// The configuration the cache was built from.
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// The compiled template cache.
    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    /// Cached page keys, sorted.
    pub fn page_keys(&self) -> Vec<&str> {
        self.cache.keys()
    }

    /// Whether `page_key` can be rendered.
    pub fn contains(&self, page_key: &str) -> bool {
        self.cache.contains(page_key)
    }

    /// Render `entry` of `page_key` with `data` and return the HTML.
    ///
    /// This is the transport-neutral form of [`render`](Self::render): every failure
    /// is returned to the caller, who decides how to surface it.
    ///
    /// A `data` value that serializes to a map provides one template variable per
    /// key. Any other value (string, number, array, null) is bound as `data`.
    ///
    /// # Errors
    ///
    /// - [`RenderError::PageNotFound`] if the page key is not cached
    /// - [`RenderError::InvalidData`] if `data` cannot be serialized
    /// - [`RenderError::UndefinedEntry`] if `entry` names nothing in the document
    /// - [`RenderError::Execution`] if Tera fails while rendering
    pub fn try_render<T>(&self, page_key: &str, entry: &str, data: &T) -> Result<String, RenderError>
    where
        T: Serialize + ?Sized,
    {
        let Some(document) = self.cache.get(page_key) else {
            return Err(RenderError::PageNotFound {
                page: page_key.to_string(),
                suggestions: self.suggest_pages(page_key),
            });
        };

        let context = build_context(page_key, data)?;
        document.render(entry, &context)
    }

    /// Render `entry` of `page_key` with `data` into `sink`.
    ///
    /// Writes exactly one response:
    ///
    /// - `200 OK` with the rendered HTML
    /// - `404 Not Found` with body `Template not found` for an unknown page key
    /// - `500 Internal Server Error` with body `Error rendering template` when the
    ///   page exists but rendering fails
    ///
    /// Failures are logged and reported through the sink, never returned or
    /// panicked on. A sink that fails to accept the response is logged at `warn`.
    ///
    /// Returns the status that was written.
    pub fn render<S, T>(&self, sink: &mut S, page_key: &str, entry: &str, data: &T) -> Status
    where
        S: ResponseSink + ?Sized,
        T: Serialize + ?Sized,
    {
        let (status, content_type, body) = match self.try_render(page_key, entry, data) {
            Ok(html) => (Status::Ok, HTML_CONTENT_TYPE, html.into_bytes()),
            Err(err) => {
                match &err {
                    RenderError::PageNotFound {
                        suggestions,
                        ..
                    } if !suggestions.is_empty() => {
                        warn!("{} (did you mean: {})", err, suggestions.join(", "));
                    }
                    RenderError::PageNotFound {
                        ..
                    } => warn!("{}", err),
                    _ => error!("{}", err),
                }

                let status = err.status();
                let body = if status == Status::NotFound {
                    NOT_FOUND_BODY
                } else {
                    RENDER_ERROR_BODY
                };
                (status, TEXT_CONTENT_TYPE, body.as_bytes().to_vec())
            }
        };

        if let Err(e) = sink.respond(status, content_type, &body) {
            warn!("Failed to write {} response for '{}': {}", status, page_key, e);
        }
        status
    }

    /// Cached page keys close to `requested`, closest first.
    fn suggest_pages(&self, requested: &str) -> Vec<String> {
        let max_distance = requested.len() * SIMILARITY_THRESHOLD_PERCENT / 100;

        let mut scored: Vec<(&str, usize)> = self
            .cache
            .keys()
            .into_iter()
            .map(|key| (key, levenshtein(requested, key)))
            .filter(|(_, distance)| *distance <= max_distance)
            .collect();
        scored.sort_by_key(|(_, distance)| *distance);

        scored.into_iter().take(MAX_PAGE_SUGGESTIONS).map(|(key, _)| key.to_string()).collect()
    }
}

/// Turn render data into a Tera context.
fn build_context<T>(page_key: &str, data: &T) -> Result<TeraContext, RenderError>
where
    T: Serialize + ?Sized,
{
    let invalid = |reason: String| RenderError::InvalidData {
        page: page_key.to_string(),
        reason,
    };

    match serde_json::to_value(data).map_err(|e| invalid(e.to_string()))? {
        value @ Value::Object(_) => TeraContext::from_value(value).map_err(|e| invalid(e.to_string())),
        value => {
            let mut context = TeraContext::new();
            context.insert(DATA_VARIABLE, &value);
            Ok(context)
        }
    }
}
