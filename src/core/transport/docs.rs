//! Documentation page and favicon for the HTTP transport.
//!
//! `GET /` renders the configured markdown document into a fixed page
//! template carrying the running server's version. `GET /favicon.ico` serves
//! the configured icon file. Both routes are composed in front of the
//! protocol routes whenever the HTTP router is built.

use std::path::{Path, PathBuf};

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use bytes::Bytes;
use http::{Method, StatusCode, header};
use pulldown_cmark::{Options, Parser, html};
use thiserror::Error;
use tracing::{error, warn};

use super::http::{AppState, RouteEntry};
use crate::core::config::DocsConfig;

/// Path of the documentation page.
pub const DOCS_PATH: &str = "/";

/// Path of the favicon.
pub const FAVICON_PATH: &str = "/favicon.ico";

/// Errors raised while serving the documentation surface.
#[derive(Debug, Error)]
pub enum DocsError {
    /// The markdown source could not be read.
    #[error("Documentation unavailable at {path:?}: {source}")]
    DocumentationUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The favicon file could not be read.
    #[error("Favicon missing at {path:?}: {source}")]
    FaviconMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocsError {
    /// Status code the error is served with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::DocumentationUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::FaviconMissing { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for DocsError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::DocumentationUnavailable { .. } => {
                error!("Failed to render documentation: {}", self);
                (status, "Documentation unavailable").into_response()
            }
            Self::FaviconMissing { .. } => {
                warn!("{}", self);
                (status, "Not Found").into_response()
            }
        }
    }
}

/// Routes of the documentation surface, in the order they must be mounted.
pub fn documentation_routes() -> Vec<RouteEntry> {
    vec![
        RouteEntry::new(DOCS_PATH, Method::GET, get(docs_handler)),
        RouteEntry::new(FAVICON_PATH, Method::GET, get(favicon_handler)),
    ]
}

/// Render markdown to HTML with tables and fenced code blocks.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Wrap rendered documentation in the page template.
pub fn render_page(body: &str, name: &str, version: &str) -> String {
    let (name, version) = (escape(name), escape(version));
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{name} v{version}</title>
<link rel="icon" href="{favicon}">
<style>
body {{ font-family: system-ui, sans-serif; max-width: 56rem; margin: 2rem auto; padding: 0 1rem; line-height: 1.5; }}
pre {{ background: #f4f4f4; padding: 1rem; overflow-x: auto; }}
table {{ border-collapse: collapse; }}
th, td {{ border: 1px solid #ccc; padding: 0.25rem 0.5rem; }}
footer {{ margin-top: 3rem; color: #666; font-size: 0.9rem; }}
</style>
</head>
<body>
<main>
{body}
</main>
<footer>{name} v{version}</footer>
</body>
</html>
"#,
        favicon = FAVICON_PATH,
    )
}

/// Read and render the documentation page.
pub async fn load_page(config: &DocsConfig, name: &str, version: &str) -> Result<String, DocsError> {
    let markdown = read_to_string(&config.source_path).await?;
    Ok(render_page(&render_markdown(&markdown), name, version))
}

async fn read_to_string(path: &Path) -> Result<String, DocsError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DocsError::DocumentationUnavailable {
            path: path.to_path_buf(),
            source,
        })
}

/// Read the favicon bytes.
pub async fn load_favicon(config: &DocsConfig) -> Result<Bytes, DocsError> {
    tokio::fs::read(&config.favicon_path)
        .await
        .map(Bytes::from)
        .map_err(|source| DocsError::FaviconMissing {
            path: config.favicon_path.clone(),
            source,
        })
}

/// Documentation page handler.
async fn docs_handler(State(state): State<AppState>) -> Result<Html<String>, DocsError> {
    let server = &state.server;
    let page = load_page(&server.config().docs, server.name(), server.version()).await?;
    Ok(Html(page))
}

/// Favicon handler.
async fn favicon_handler(State(state): State<AppState>) -> Result<Response, DocsError> {
    let bytes = load_favicon(&state.server.config().docs).await?;
    Ok(([(header::CONTENT_TYPE, "image/x-icon")], bytes).into_response())
}
