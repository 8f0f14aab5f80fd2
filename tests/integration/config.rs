//! Configuration file discovery and pattern anchoring.

use anyhow::Result;
use prism_render::config::RendererConfig;
use prism_render::constants::CONFIG_ENV_VAR;
use prism_render::core::PrismError;
use prism_render::templating::Renderer;
use prism_render::test_utils::TemplateTree;
use serde_json::json;
use serial_test::serial;

#[test]
fn test_renderer_from_config_file() -> Result<()> {
    let tree = TemplateTree::with_basic_site()?;
    let config_file = tree.write_config_file()?;

    let config = RendererConfig::load_from(&config_file)?;
    let renderer = Renderer::new(config)?;

    assert_eq!(renderer.page_keys(), vec!["about.html", "home.html"]);
    let html = renderer.try_render("about.html", "content", &json!({ "Title": "x" }))?;
    assert!(html.contains("About this site"));
    Ok(())
}

#[test]
fn test_missing_keys_use_conventional_layout() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.write("templates/pages/index.html", "index page")?;
    let config_file = tree.write("prism.toml", "[templates]\n")?;

    let renderer = Renderer::new(RendererConfig::load_from(&config_file)?)?;
    assert_eq!(renderer.page_keys(), vec!["index.html"]);
    assert_eq!(renderer.try_render("index.html", "index.html", &json!({}))?, "index page");
    Ok(())
}

#[test]
fn test_invalid_config_file_is_reported() -> Result<()> {
    let tree = TemplateTree::new()?;
    let config_file = tree.write("prism.toml", "[templates]\npages = 42\n")?;

    let err = RendererConfig::load_from(&config_file).unwrap_err();
    assert!(matches!(err, PrismError::ConfigParse { .. }), "got {err:?}");
    Ok(())
}

#[test]
#[serial]
fn test_discover_prefers_explicit_path_over_env() -> Result<()> {
    let tree = TemplateTree::with_basic_site()?;
    let explicit = tree.write_config_file()?;
    let other = tree.write("other/prism.toml", "[templates]\npages = \"views/*.html\"\n")?;

    // SAFETY: serialized with every other test touching the environment
    unsafe {
        std::env::set_var(CONFIG_ENV_VAR, &other);
    }

    let from_env = RendererConfig::discover(None);
    let from_explicit = RendererConfig::discover(Some(&explicit));

    unsafe {
        std::env::remove_var(CONFIG_ENV_VAR);
    }

    assert!(from_env?.pages.ends_with("other/views/*.html"));
    assert!(from_explicit?.pages.ends_with("pages/*.html"));
    Ok(())
}
