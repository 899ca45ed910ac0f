//! The documentation page rendered from the shipped README.
#![cfg(feature = "http")]

use fortuna_mcp::core::config::DocsConfig;
use fortuna_mcp::core::transport::docs::{load_favicon, load_page};

fn shipped() -> DocsConfig {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    DocsConfig {
        source_path: root.join("README.md"),
        favicon_path: root.join("static/favicon.ico"),
    }
}

#[test]
fn test_readme_renders_tool_table() {
    let page = tokio_test::block_on(load_page(&shipped(), "FortunaMCP", "0.1.2")).unwrap();
    assert!(page.contains("<title>FortunaMCP v0.1.2</title>"));
    assert!(page.contains("<table>"));
    assert!(page.contains("<code>student_t_variate</code>"));
}

#[test]
fn test_shipped_favicon_is_an_icon() {
    let icon = tokio_test::block_on(load_favicon(&shipped())).unwrap();
    assert_eq!(&icon[..4], &[0, 0, 1, 0]);
}
