//! Renderer behaviour over real template trees.

use anyhow::Result;
use prism_render::config::RendererConfig;
use prism_render::core::PrismError;
use prism_render::pattern::anchor_pattern;
use prism_render::templating::{BufferedResponse, RenderError, Renderer, Status};
use prism_render::test_utils::{TemplateTree, init_test_logging};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Serialize)]
struct Page {
    #[serde(rename = "Title")]
    title: &'static str,
}

fn basic_renderer() -> Result<(TemplateTree, Renderer)> {
    init_test_logging(None);
    let tree = TemplateTree::with_basic_site()?;
    let renderer = Renderer::new(tree.config())?;
    Ok((tree, renderer))
}

#[test]
fn test_home_layout_scenario() -> Result<()> {
    let (_tree, renderer) = basic_renderer()?;

    let mut response = BufferedResponse::new();
    let status = renderer.render(
        &mut response,
        "home.html",
        "layout",
        &Page {
            title: "Hi",
        },
    );

    assert_eq!(status, Status::Ok);
    let body = response.body_text();
    assert!(body.contains("<header>prism</header>"), "{body}");
    assert!(body.contains(r#"<main class="home">Welcome, Hi</main>"#), "{body}");
    assert!(body.contains("<footer>&copy; prism</footer>"), "{body}");
    Ok(())
}

#[test]
fn test_every_page_file_is_cached() -> Result<()> {
    let (tree, renderer) = basic_renderer()?;
    tree.page("contact.html", "contact")?;

    // The renderer only sees files present at construction
    assert_eq!(renderer.page_keys(), vec!["about.html", "home.html"]);

    let rebuilt = Renderer::new(tree.config())?;
    assert_eq!(rebuilt.page_keys(), vec!["about.html", "contact.html", "home.html"]);
    Ok(())
}

#[test]
fn test_every_document_contains_all_layouts_and_partials() -> Result<()> {
    let (_tree, renderer) = basic_renderer()?;
    let data = Page {
        title: "t",
    };

    for key in renderer.page_keys() {
        let names: Vec<&str> =
            renderer.cache().get(key).map(|doc| doc.template_names().collect()).unwrap_or_default();
        assert_eq!(names.len(), 4, "{key}: {names:?}");
        assert!(names.contains(&key));

        for shared in ["base.html", "header.html", "footer.html"] {
            assert!(names.contains(&shared), "{key} is missing {shared}");
            renderer.try_render(key, shared, &data)?;
        }
    }
    Ok(())
}

#[test]
fn test_page_blocks_do_not_leak_between_pages() -> Result<()> {
    let (_tree, renderer) = basic_renderer()?;
    let data = Page {
        title: "Hi",
    };

    let home = renderer.try_render("home.html", "layout", &data)?;
    let about = renderer.try_render("about.html", "layout", &data)?;

    assert!(home.contains("Welcome, Hi"));
    assert!(!home.contains("About this site"));
    assert!(about.contains("About this site"));
    assert!(!about.contains("Welcome"));

    assert_eq!(renderer.try_render("about.html", "title", &data)?, "About");
    assert_eq!(renderer.try_render("home.html", "title", &data)?, "Hi");
    assert_eq!(
        renderer.try_render("home.html", "content", &data)?,
        r#"<main class="home">Welcome, Hi</main>"#
    );
    Ok(())
}

#[test]
fn test_every_declared_block_renders_from_every_page() -> Result<()> {
    let (tree, _) = basic_renderer()?;
    tree.layout(
        "widgets.html",
        r#"{% block sidebar %}<aside>{% include "footer.html" %}</aside>{% endblock sidebar %}"#,
    )?;
    let renderer = Renderer::new(tree.config())?;
    let data = Page {
        title: "t",
    };

    for key in renderer.page_keys() {
        let blocks = renderer.cache().get(key).map(|doc| doc.blocks()).unwrap_or_default();
        assert_eq!(blocks, vec!["content", "layout", "sidebar", "title"], "{key}");
        for block in blocks {
            renderer.try_render(key, block, &data)?;
        }
        assert_eq!(
            renderer.try_render(key, "sidebar", &data)?,
            "<aside><footer>&copy; prism</footer></aside>"
        );
    }
    Ok(())
}

#[test]
fn test_scalar_data_renders() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.page("count.html", "{{ data }} items")?;
    let renderer = Renderer::new(tree.config())?;

    let mut response = BufferedResponse::new();
    assert_eq!(renderer.render(&mut response, "count.html", "count", &3), Status::Ok);
    assert_eq!(response.body_text(), "3 items");
    Ok(())
}

#[test]
fn test_unknown_page_writes_404_only() -> Result<()> {
    let (_tree, renderer) = basic_renderer()?;

    let mut response = BufferedResponse::new();
    let status = renderer.render(&mut response, "nonexistent.html", "any", &json!({}));

    assert_eq!(status, Status::NotFound);
    assert_eq!(response.status(), Some(Status::NotFound));
    assert_eq!(response.body_text(), "Template not found");
    Ok(())
}

#[test]
fn test_repeated_renders_are_identical() -> Result<()> {
    let (_tree, renderer) = basic_renderer()?;
    let data = json!({ "Title": "Again", "site": "docs" });

    let outputs: Vec<String> =
        (0..5).map(|_| renderer.try_render("about.html", "about.html", &data)).collect::<Result<_, _>>()?;
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
    assert!(outputs[0].contains("<header>docs</header>"));
    Ok(())
}

#[test]
fn test_concurrent_renders_share_one_renderer() -> Result<()> {
    let (_tree, renderer) = basic_renderer()?;
    let renderer = Arc::new(renderer);
    let expected = renderer.try_render("home.html", "layout", &json!({ "Title": "T" }))?;

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let renderer = Arc::clone(&renderer);
            let expected = expected.as_str();
            scope.spawn(move || {
                for _ in 0..20 {
                    let mut response = BufferedResponse::new();
                    let status =
                        renderer.render(&mut response, "home.html", "layout", &json!({ "Title": "T" }));
                    assert_eq!(status, Status::Ok);
                    assert_eq!(response.body_text(), expected);
                }
            });
        }
    });
    Ok(())
}

#[test]
fn test_missing_data_yields_500_without_partial_html() -> Result<()> {
    let (_tree, renderer) = basic_renderer()?;

    let mut response = BufferedResponse::new();
    let status = renderer.render(&mut response, "home.html", "layout", &json!({}));

    assert_eq!(status, Status::InternalServerError);
    assert_eq!(response.body_text(), "Error rendering template");
    assert!(!response.body_text().contains("<header>"));

    let err = renderer.try_render("home.html", "layout", &json!({})).unwrap_err();
    assert!(matches!(err, RenderError::Execution { .. }), "got {err:?}");
    Ok(())
}

#[test]
fn test_empty_page_pattern_builds_empty_cache() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.layout("base.html", "{% block body %}{% endblock body %}")?;

    let renderer = Renderer::new(tree.config())?;
    assert!(renderer.cache().is_empty());

    let mut response = BufferedResponse::new();
    assert_eq!(renderer.render(&mut response, "home.html", "body", &json!({})), Status::NotFound);
    Ok(())
}

#[test]
fn test_page_without_layouts_or_partials() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.page("plain.html", "<p>{{ message }}</p>")?;

    let renderer = Renderer::new(tree.config())?;
    let html = renderer.try_render("plain.html", "plain", &json!({ "message": "<b>hi</b>" }))?;
    assert_eq!(html, "<p>&lt;b&gt;hi&lt;&#x2F;b&gt;</p>");
    Ok(())
}

#[test]
fn test_duplicate_page_keys_fail_construction() -> Result<()> {
    let tree = TemplateTree::new()?;
    tree.page("index.html", "root")?;
    tree.page("blog/index.html", "blog")?;

    let config = RendererConfig::new(
        anchor_pattern(tree.root(), "layouts/*.html"),
        anchor_pattern(tree.root(), "pages/**/*.html"),
        anchor_pattern(tree.root(), "partials/*.html"),
    );

    let err = Renderer::new(config).unwrap_err();
    assert!(
        matches!(&err, PrismError::DuplicatePageKey { key, .. } if key == "index.html"),
        "got {err:?}"
    );
    Ok(())
}

#[test]
fn test_parse_error_in_shared_partial_fails_construction() -> Result<()> {
    let tree = TemplateTree::with_basic_site()?;
    tree.partial("broken.html", "{{ unclosed")?;

    let err = Renderer::new(tree.config()).unwrap_err();
    assert!(matches!(err, PrismError::TemplateParse { .. }), "got {err:?}");
    Ok(())
}

#[test]
fn test_malformed_pattern_fails_construction() -> Result<()> {
    let tree = TemplateTree::with_basic_site()?;
    let mut config = tree.config();
    config.partials = anchor_pattern(tree.root(), "partials/[*.html");

    let err = Renderer::new(config).unwrap_err();
    assert!(matches!(err, PrismError::InvalidPattern { .. }), "got {err:?}");
    Ok(())
}
