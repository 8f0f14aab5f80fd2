//! End-to-end tests for the `prism` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use prism_render::test_utils::TemplateTree;

fn prism(tree: &TemplateTree) -> Command {
    let mut cmd = Command::cargo_bin("prism").unwrap();
    cmd.current_dir(tree.root()).env_remove("PRISM_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn site() -> TemplateTree {
    let tree = TemplateTree::with_basic_site().unwrap();
    tree.write_config_file().unwrap();
    tree
}

#[test]
fn test_list_prints_cache_entries() {
    let tree = site();

    prism(&tree).arg("list").assert().success().stdout(predicate::eq(
        "[about.html]\t=\tbase.html, about.html, footer.html, header.html\n\
         [home.html]\t=\tbase.html, home.html, footer.html, header.html\n",
    ));
}

#[test]
fn test_list_json() {
    let tree = site();

    let output = prism(&tree).args(["list", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(2));
    assert_eq!(value[1]["page"], "home.html");
}

#[test]
fn test_check_reports_page_count() {
    let tree = site();

    prism(&tree).arg("check").assert().success().stdout(predicate::str::contains("2 page(s) compiled"));
}

#[test]
fn test_check_fails_on_parse_error() {
    let tree = site();
    tree.partial("broken.html", "{% if %}").unwrap();

    prism(&tree)
        .arg("check")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("home.html").or(predicate::str::contains("about.html")));
}

#[test]
fn test_render_with_data_from_stdin() {
    let tree = site();

    prism(&tree)
        .args(["render", "home.html", "--entry", "layout", "--data", "-"])
        .write_stdin(r#"{"Title": "Hello", "site": "docs"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("<header>docs</header>"))
        .stdout(predicate::str::contains("Welcome, Hello"));
}

#[test]
fn test_render_with_data_file_and_default_entry() {
    let tree = site();
    let data = tree.write("data.json", r#"{"Title": "Filed"}"#).unwrap();

    prism(&tree)
        .args(["render", "home.html", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!doctype html>"))
        .stdout(predicate::str::contains("<title>Filed</title>"));
}

#[test]
fn test_render_unknown_page_exits_non_zero() {
    let tree = site();

    prism(&tree)
        .args(["render", "missing.html"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("404 Not Found"))
        .stderr(predicate::str::contains("Template not found"));
}

#[test]
fn test_render_failure_prints_nothing_to_stdout() {
    let tree = site();

    prism(&tree)
        .args(["--quiet", "render", "home.html", "--entry", "layout"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("500 Internal Server Error"));
}

#[test]
fn test_pattern_override_flag() {
    let tree = site();
    tree.write("views/solo.html", "solo view").unwrap();

    prism(&tree)
        .args(["render", "solo.html", "--pages", "views/*.html"])
        .assert()
        .success()
        .stdout(predicate::eq("solo view"));
}

#[test]
fn test_explicit_config_flag() {
    let tree = site();
    let nested = tree.write("nested/prism.toml", "[templates]\npages = \"pages/*.html\"\n").unwrap();
    tree.write("nested/pages/inner.html", "inner").unwrap();

    prism(&tree)
        .args(["list", "--config"])
        .arg(&nested)
        .assert()
        .success()
        .stdout(predicate::str::contains("[inner.html]"));
}

#[test]
fn test_invalid_pattern_shows_suggestion() {
    let tree = site();

    prism(&tree)
        .args(["check", "--layouts", "layouts/[*.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("layout"))
        .stderr(predicate::str::contains("suggestion"));
}

#[test]
fn test_missing_config_file() {
    let tree = site();

    prism(&tree)
        .args(["check", "--config", "does-not-exist.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.toml"));
}
