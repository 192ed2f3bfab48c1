//! Content server
//!
//! A thin axum layer over the core: it threads the request path into the
//! resolvers as an explicit parameter and turns their results into
//! responses. Content reads are synchronous, so every store call runs under
//! `spawn_blocking`.

use anyhow::Result;
use axum::{
    extract::{Path as RoutePath, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::content::ContentError;
use crate::helpers::escape_xml;
use crate::{PageView, Site};

/// Start the content server
pub async fn start(site: Site, ip: &str, port: u16) -> Result<()> {
    let site = Arc::new(site);

    let app = Router::new()
        .route("/feed/rss.xml", get(feed_handler))
        .route("/assets/favicons/:image", get(favicon_handler))
        .route("/media/*path", get(media_handler))
        .fallback(page_handler)
        .with_state(site)
        .layer(TraceLayer::new_for_http());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Resolve and render a content page.
async fn page_handler(State(site): State<Arc<Site>>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    if path.contains("..") {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    let shared = site.clone();
    let result =
        tokio::task::spawn_blocking(move || shared.page(&path).map(|view| (shared.clone(), view)))
            .await;

    match result {
        Ok(Ok((site, view))) => Html(render_document(&site, &view)).into_response(),
        Ok(Err(err)) => error_response(err),
        Err(err) => {
            tracing::error!("page task failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// Serve the assembled RSS feed.
async fn feed_handler(State(site): State<Arc<Site>>) -> Response {
    let result = tokio::task::spawn_blocking(move || site.feed()).await;

    match result {
        Ok(Ok(xml)) => (
            [(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")],
            xml,
        )
            .into_response(),
        Ok(Err(err)) => error_response(err),
        Err(err) => {
            tracing::error!("feed task failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// Serve a favicon from the `.assets/favicons` convention directory.
async fn favicon_handler(
    State(site): State<Arc<Site>>,
    RoutePath(image): RoutePath<String>,
) -> Response {
    if image.contains("..") || image.contains('/') {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    let extension = image.rsplit('.').next().unwrap_or("").to_string();
    let content_type = if extension == "ico" {
        "image/x-icon".to_string()
    } else {
        format!("image/{}", extension)
    };

    let rel = site
        .store
        .assets_location()
        .join("favicons")
        .rel()
        .join(&image);
    serve_bytes(site, rel, content_type).await
}

/// Serve a file from the `.media` convention directory.
async fn media_handler(
    State(site): State<Arc<Site>>,
    RoutePath(path): RoutePath<String>,
) -> Response {
    if path.contains("..") {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    let mut rel = site.store.media_location().rel().to_path_buf();
    for part in path.split('/').filter(|part| !part.is_empty()) {
        rel.push(part);
    }

    let extension = path.rsplit('.').next().unwrap_or("");
    let content_type = media_content_type(extension).to_string();
    serve_bytes(site, rel, content_type).await
}

async fn serve_bytes(site: Arc<Site>, rel: PathBuf, content_type: String) -> Response {
    let result = tokio::task::spawn_blocking(move || site.store.read_file(&rel)).await;

    match result {
        Ok(Ok(bytes)) => ([(header::CONTENT_TYPE, content_type)], bytes).into_response(),
        Ok(Err(err)) => error_response(err),
        Err(err) => {
            tracing::error!("asset task failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

fn media_content_type(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Wrap a resolved page in a complete HTML document.
fn render_document(site: &Site, view: &PageView) -> String {
    let mut head = String::new();
    head.push_str(r#"<meta charset="utf-8">"#);
    head.push_str(r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#);
    head.push_str(&format!("<title>{}</title>", escape_xml(&view.title)));

    if !view.description.is_empty() {
        head.push_str(&format!(
            r#"<meta name="description" content="{}">"#,
            escape_xml(&view.description)
        ));
        head.push_str(&format!(
            r#"<meta property="og:description" content="{}">"#,
            escape_xml(&view.description)
        ));
    }
    head.push_str(&format!(
        r#"<meta property="og:title" content="{}">"#,
        escape_xml(&view.title)
    ));
    if !view.social_image.is_empty() {
        head.push_str(&format!(
            r#"<meta property="og:image" content="{}">"#,
            escape_xml(&view.social_image)
        ));
    }

    head.push_str(r#"<link rel="icon" type="image/x-icon" href="/assets/favicons/favicon.ico">"#);
    head.push_str(
        r#"<link rel="apple-touch-icon" sizes="180x180" href="/assets/favicons/apple-touch-icon.png">"#,
    );
    head.push_str(
        r#"<link rel="icon" type="image/png" sizes="32x32" href="/assets/favicons/favicon-32x32.png">"#,
    );
    head.push_str(
        r#"<link rel="icon" type="image/png" sizes="16x16" href="/assets/favicons/favicon-16x16.png">"#,
    );
    head.push_str(r#"<link rel="alternate" type="application/rss+xml" href="/feed/rss.xml">"#);

    format!(
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>{}</head>\n<body>\n{}\n</body>\n</html>\n",
        site.config.language, head, view.html
    )
}

/// Map a content error onto a response, logging at the right level.
fn error_response(err: ContentError) -> Response {
    match &err {
        ContentError::ContentUnavailable { .. } => {
            tracing::debug!("{}", err);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
        ContentError::DocumentMalformed { .. } => {
            tracing::error!("{}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Rendering error").into_response()
        }
        ContentError::ConfigurationIncomplete { .. } => {
            tracing::error!("{}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}
