//! Compiled template documents.
//!
//! A [`TemplateDocument`] is one page compiled together with every layout and
//! partial into a single Tera instance. Templates inside the document are named by
//! their base file name, so pages write `{% extends "base.html" %}` and
//! `{% include "header.html" %}`.
//!
//! # Entry Resolution
//!
//! A render call names an *entry* inside the document. It resolves as follows:
//!
//! 1. An exact template name (`base.html`, `header.html`, `home.html`)
//! 2. A file stem (`base`, `header`, `home`)
//! 3. A `{% block NAME %}` declared by any template in the document
//!
//! A template entry on the page's inheritance chain renders the whole page, so the
//! page's block overrides apply. Any other template (a partial, an unrelated
//! layout) is rendered on its own.
//!
//! A block entry renders only that block's body. Blocks declared on the page's
//! chain use the page's overrides, including nested blocks and `super()`. Blocks
//! declared elsewhere use the last template in compile order that declares them.
//!
//! Block entries are backed by generated templates named
//! `__prism_block__/<block>/<template>`: the declaring ancestor's block text
//! becomes the root, and each descendant on the chain is re-pointed at it.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tera::{Context as TeraContext, Tera};
use tracing::{debug, trace, warn};

use super::error::{RenderError, format_tera_error};
use crate::core::{PatternKind, PrismError};
use crate::pattern::base_name;

/// Namespace for generated block templates; base file names never contain `/`.
const BLOCK_TEMPLATE_PREFIX: &str = "__prism_block__";

/// A `{% block %} .. {% endblock %}` region of a source, tags included.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BlockSpan {
    name: String,
    range: Range<usize>,
}

/// One template source file, read once and shared between documents.
#[derive(Debug, Clone)]
pub struct TemplateSource {
    name: String,
    path: PathBuf,
    kind: PatternKind,
    content: String,
    parent: Option<String>,
    extends_tag: Option<Range<usize>>,
    imports: Vec<Range<usize>>,
    blocks: Vec<BlockSpan>,
}

impl TemplateSource {
    /// Read a source file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`PrismError::TemplateRead`] if the file cannot be read as UTF-8.
    pub fn read(path: &Path, kind: PatternKind) -> Result<Self, PrismError> {
        let content = std::fs::read_to_string(path).map_err(|e| PrismError::TemplateRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_content(path, kind, content))
    }

    /// Build a source from already-loaded content.
    ///
    /// Tags inside `{# .. #}` comments and `{% raw %}` sections are ignored.
    pub fn from_content(path: &Path, kind: PatternKind, content: impl Into<String>) -> Self {
        let content = content.into();
        let masked = mask_inert(&content);

        let (parent, extends_tag) = match scan_extends(&masked) {
            Some((name, range)) => (Some(name), Some(range)),
            None => (None, None),
        };
        let imports = scan_imports(&masked);
        let blocks = scan_blocks(&masked);
        trace!(
            "Scanned {} {}: extends={:?} blocks={:?}",
            kind,
            path.display(),
            parent,
            blocks.iter().map(|b| b.name.as_str()).collect::<Vec<_>>()
        );

        Self {
            name: base_name(path),
            path: path.to_path_buf(),
            kind,
            content,
            parent,
            extends_tag,
            imports,
            blocks,
        }
    }

    /// Template name inside a document (the base file name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path the source was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Which file set the source came from.
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// Name of the template this one extends, if any.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Blocks declared in this source, in order of appearance.
    pub fn blocks(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.name.as_str())
    }

    /// Whether this source declares `block`.
    pub fn declares(&self, block: &str) -> bool {
        self.blocks.iter().any(|b| b.name == block)
    }

    /// File name without its final extension.
    fn stem(&self) -> &str {
        self.name.rsplit_once('.').map_or(self.name.as_str(), |(stem, _)| stem)
    }

    /// The block's text with this source's imports in front.
    fn block_root(&self, block: &str) -> Option<String> {
        let span = self.blocks.iter().find(|b| b.name == block)?;
        let mut text = String::new();
        for import in &self.imports {
            text.push_str(&self.content[import.clone()]);
        }
        text.push_str(&self.content[span.range.clone()]);
        Some(text)
    }

    /// This source with its `extends` target replaced by `parent`.
    fn reparented(&self, parent: &str) -> Option<String> {
        let tag = self.extends_tag.as_ref()?;
        Some(format!(
            "{}{{% extends \"{}\" %}}{}",
            &self.content[..tag.start],
            parent,
            &self.content[tag.end..]
        ))
    }
}

fn extends_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\{%-?\s*extends\s+["']([^"']+)["']\s*-?%\}"#).ok()).as_ref()
}

fn import_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{%-?\s*import\s[^%]*-?%\}").ok()).as_ref()
}

fn block_tag_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{%-?\s*(block|endblock)(?:\s+([A-Za-z_][A-Za-z0-9_]*))?\s*-?%\}").ok()
    })
    .as_ref()
}

fn inert_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)\{#.*?#\}|\{%-?\s*raw\s*-?%\}.*?\{%-?\s*endraw\s*-?%\}").ok()
    })
    .as_ref()
}

/// Blank out comments and raw sections, keeping byte offsets intact.
fn mask_inert(content: &str) -> String {
    let Some(re) = inert_regex() else {
        return content.to_string();
    };

    let mut masked = String::with_capacity(content.len());
    let mut last = 0;
    for m in re.find_iter(content) {
        masked.push_str(&content[last..m.start()]);
        masked.extend(std::iter::repeat_n(' ', m.len()));
        last = m.end();
    }
    masked.push_str(&content[last..]);
    masked
}

fn scan_extends(masked: &str) -> Option<(String, Range<usize>)> {
    let caps = extends_regex()?.captures(masked)?;
    let tag = caps.get(0)?;
    let name = caps.get(1)?;
    Some((name.as_str().to_string(), tag.range()))
}

fn scan_imports(masked: &str) -> Vec<Range<usize>> {
    import_regex().map(|re| re.find_iter(masked).map(|m| m.range()).collect()).unwrap_or_default()
}

fn scan_blocks(masked: &str) -> Vec<BlockSpan> {
    let Some(re) = block_tag_regex() else {
        return Vec::new();
    };

    let mut open: Vec<(String, usize)> = Vec::new();
    let mut spans: Vec<BlockSpan> = Vec::new();
    for caps in re.captures_iter(masked) {
        let (Some(tag), Some(keyword)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if keyword.as_str() == "block" {
            if let Some(name) = caps.get(2) {
                open.push((name.as_str().to_string(), tag.start()));
            }
        } else if let Some((name, start)) = open.pop() {
            // Tera rejects duplicate block names itself; keep the first span
            if !spans.iter().any(|s| s.name == name) {
                spans.push(BlockSpan {
                    name,
                    range: start..tag.end(),
                });
            }
        }
    }

    spans.sort_by_key(|s| s.range.start);
    spans
}

/// `source` followed by every template it extends, nearest first.
fn lineage_of<'a>(sources: &'a [Arc<TemplateSource>], start: &str) -> Vec<&'a TemplateSource> {
    let find = |name: &str| sources.iter().find(|s| s.name() == name).map(Arc::as_ref);

    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    let mut current = find(start);
    while let Some(source) = current {
        if !visited.insert(source.name()) {
            break;
        }
        chain.push(source);
        current = source.parent().and_then(find);
    }
    chain
}

fn block_template_name(block: &str, template: &str) -> String {
    format!("{BLOCK_TEMPLATE_PREFIX}/{block}/{template}")
}

/// Generated templates that render only `block` as seen from `chain[0]`.
///
/// Returns the entry template name and the `(name, content)` pairs to add.
fn block_templates(block: &str, chain: &[&TemplateSource]) -> Option<(String, Vec<(String, String)>)> {
    let top = chain.iter().rposition(|s| s.declares(block))?;

    let mut templates = Vec::with_capacity(top + 1);
    templates.push((block_template_name(block, chain[top].name()), chain[top].block_root(block)?));
    for i in (0..top).rev() {
        let parent = block_template_name(block, chain[i + 1].name());
        templates.push((block_template_name(block, chain[i].name()), chain[i].reparented(&parent)?));
    }

    Some((block_template_name(block, chain[0].name()), templates))
}

/// A page compiled together with all layouts and partials.
///
/// Immutable once built; owned by the [`super::TemplateCache`].
pub struct TemplateDocument {
    page: String,
    tera: Tera,
    sources: Vec<Arc<TemplateSource>>,
    block_entries: HashMap<String, String>,
}

impl fmt::Debug for TemplateDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateDocument")
            .field("page", &self.page)
            .field("templates", &self.template_names().collect::<Vec<_>>())
            .field("blocks", &self.blocks())
            .finish()
    }
}

impl TemplateDocument {
    /// Compile `[layouts] + [page] + [partials]` into one document.
    ///
    /// # Errors
    ///
    /// - [`PrismError::DuplicateTemplateName`] if two sources share a base name
    /// - [`PrismError::TemplateParse`] if Tera rejects any source or an `extends`
    ///   target is missing
    pub fn compile(
        page: Arc<TemplateSource>,
        layouts: &[Arc<TemplateSource>],
        partials: &[Arc<TemplateSource>],
    ) -> Result<Self, PrismError> {
        let page_name = page.name().to_string();

        let mut sources: Vec<Arc<TemplateSource>> =
            Vec::with_capacity(layouts.len() + partials.len() + 1);
        sources.extend(layouts.iter().cloned());
        sources.push(page);
        sources.extend(partials.iter().cloned());

        let mut seen: HashMap<&str, &Path> = HashMap::with_capacity(sources.len());
        for source in &sources {
            if let Some(first) = seen.insert(source.name(), source.path()) {
                return Err(PrismError::DuplicateTemplateName {
                    page: page_name,
                    name: source.name().to_string(),
                    first: first.display().to_string(),
                    second: source.path().display().to_string(),
                });
            }
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(sources.iter().map(|s| (s.name(), s.content.as_str())))
            .map_err(|e| PrismError::TemplateParse {
                page: page_name.clone(),
                reason: format_tera_error(&e),
            })?;

        let (block_entries, generated) = plan_block_templates(&sources, &page_name);
        let block_entries = if generated.is_empty() {
            block_entries
        } else {
            let mut with_blocks = tera.clone();
            match with_blocks
                .add_raw_templates(generated.iter().map(|(n, c)| (n.as_str(), c.as_str())))
            {
                Ok(()) => {
                    tera = with_blocks;
                    block_entries
                }
                Err(e) => {
                    warn!(
                        "Block entries disabled for page '{}': {}",
                        page_name,
                        format_tera_error(&e)
                    );
                    HashMap::new()
                }
            }
        };

        debug!(
            "Compiled page '{}' with {} template(s) and {} block entr(ies)",
            page_name,
            sources.len(),
            block_entries.len()
        );

        Ok(Self {
            page: page_name,
            tera,
            sources,
            block_entries,
        })
    }

    /// The page key this document was built for.
    pub fn page(&self) -> &str {
        &self.page
    }

    /// Names of every template in the document: layouts, the page, then partials.
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.name())
    }

    /// Source files of the document, in compile order.
    pub fn sources(&self) -> &[Arc<TemplateSource>] {
        &self.sources
    }

    /// Block names that can be rendered as entries, sorted.
    pub fn blocks(&self) -> Vec<&str> {
        let mut blocks: Vec<&str> = self.block_entries.keys().map(String::as_str).collect();
        blocks.sort_unstable();
        blocks
    }

    /// Resolve an entry name to the template that should be rendered.
    ///
    /// Returns `None` if nothing in the document answers to `entry`.
    pub fn resolve_entry(&self, entry: &str) -> Option<&str> {
        let named = self
            .sources
            .iter()
            .find(|s| s.name() == entry)
            .or_else(|| self.sources.iter().find(|s| s.stem() == entry));

        if let Some(source) = named {
            let on_chain =
                lineage_of(&self.sources, &self.page).iter().any(|s| s.name() == source.name());
            return Some(if on_chain { self.page.as_str() } else { source.name() });
        }

        self.block_entries.get(entry).map(String::as_str)
    }

    /// Render `entry` with `context` into a string.
    ///
    /// # Errors
    ///
    /// - [`RenderError::UndefinedEntry`] if `entry` does not resolve
    /// - [`RenderError::Execution`] if Tera fails while rendering
    pub fn render(&self, entry: &str, context: &TeraContext) -> Result<String, RenderError> {
        let target = self.resolve_entry(entry).ok_or_else(|| RenderError::UndefinedEntry {
            page: self.page.clone(),
            entry: entry.to_string(),
        })?;

        debug!("Rendering page '{}' entry '{}' via template '{}'", self.page, entry, target);

        self.tera.render(target, context).map_err(|e| RenderError::Execution {
            page: self.page.clone(),
            entry: entry.to_string(),
            message: format_tera_error(&e),
        })
    }
}

/// Decide, for every declared block, which chain renders it.
///
/// Blocks on the page's chain are seen through the page; any other block through
/// the last source in compile order that declares it.
fn plan_block_templates(
    sources: &[Arc<TemplateSource>],
    page: &str,
) -> (HashMap<String, String>, Vec<(String, String)>) {
    let page_chain = lineage_of(sources, page);

    let mut names: Vec<&str> = Vec::new();
    for source in sources {
        for block in source.blocks() {
            if !names.contains(&block) {
                names.push(block);
            }
        }
    }

    let mut entries = HashMap::with_capacity(names.len());
    let mut generated = Vec::new();
    for block in names {
        let chain = if page_chain.iter().any(|s| s.declares(block)) {
            page_chain.clone()
        } else {
            match sources.iter().rev().find(|s| s.declares(block)) {
                Some(owner) => lineage_of(sources, owner.name()),
                None => continue,
            }
        };

        if let Some((entry, templates)) = block_templates(block, &chain) {
            entries.insert(block.to_string(), entry);
            generated.extend(templates);
        }
    }

    (entries, generated)
}
