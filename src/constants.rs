//! Constants shared across the renderer, configuration, and CLI.

/// File name looked up in the working directory when no config path is given.
pub const CONFIG_FILE_NAME: &str = "prism.toml";

/// Environment variable naming a config file to load.
pub const CONFIG_ENV_VAR: &str = "PRISM_CONFIG";

/// Default pattern for layout templates.
pub const DEFAULT_LAYOUT_PATTERN: &str = "templates/layouts/*.html";

/// Default pattern for page templates.
pub const DEFAULT_PAGE_PATTERN: &str = "templates/pages/*.html";

/// Default pattern for partial templates.
pub const DEFAULT_PARTIAL_PATTERN: &str = "templates/partials/*.html";

/// Body written when the requested page key is not in the cache.
pub const NOT_FOUND_BODY: &str = "Template not found";

/// Body written when executing a template fails.
pub const RENDER_ERROR_BODY: &str = "Error rendering template";

/// Content type of successfully rendered pages.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Content type of error responses.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Maximum number of "did you mean" suggestions for an unknown page key.
pub const MAX_PAGE_SUGGESTIONS: usize = 3;

/// Maximum Levenshtein distance, as a percentage of the requested key length,
/// for a page key to be suggested.
pub const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Template variable holding render data that is not a map (a string, number,
/// array, or null).
pub const DATA_VARIABLE: &str = "data";
