//! HTTP front end: staged assets plus the live reload stream.
//!
//! Every request outside the fixed routes is answered from the in-memory
//! store. HTML pages get the reload client injected before `</body>`.

use crate::dev::AppState;
use crate::error::{CliError, Result, ResultExt};
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use fob_reload::event_stream_response;
use percent_encoding::percent_decode_str;
use std::future::Future;
use std::path::Path;
use std::time::SystemTime;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Route of the browser reload client.
pub const RELOAD_SCRIPT_PATH: &str = "/__fob_reload__.js";

const RELOAD_SCRIPT: &str = include_str!("../../assets/reload-client.js");
const STREAM_PATH_PLACEHOLDER: &str = "__FOB_STREAM_PATH__";

pub struct DevServer {
    listener: TcpListener,
    state: AppState,
}

impl DevServer {
    /// Bind `addr` without serving yet.
    pub async fn bind(addr: &str, state: AppState) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .context(format!("Failed to bind to {}", addr))
            .with_hint("Another process may own this port; pick a free one with --port")?;

        Ok(Self { listener, state })
    }

    /// `http://host:port/` of the bound socket.
    pub fn url(&self) -> Result<String> {
        let addr = self.listener.local_addr()?;
        Ok(format!("http://{}/", addr))
    }

    /// Serve until `shutdown` resolves.
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        let app = router(self.state);

        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| CliError::Server(format!("Server error: {}", e)))
    }
}

pub fn router(state: AppState) -> Router {
    let stream_path = state.stream_path.clone();

    Router::new()
        .route(&stream_path, get(handle_stream))
        .route(RELOAD_SCRIPT_PATH, get(handle_reload_script))
        .route("/favicon.ico", get(handle_favicon))
        .fallback(handle_asset)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn handle_stream(State(state): State<AppState>) -> Response {
    event_stream_response(&state.hub, state.stream).into_response()
}

async fn handle_reload_script(State(state): State<AppState>) -> Response {
    let script = RELOAD_SCRIPT.replace(STREAM_PATH_PLACEHOLDER, &state.stream_path);

    (
        [
            (header::CONTENT_TYPE, "application/javascript"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        script,
    )
        .into_response()
}

/// Staged `favicon.ico` if the build produced one, otherwise 204.
async fn handle_favicon(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !state.store.contains("favicon.ico") {
        return StatusCode::NO_CONTENT.into_response();
    }

    serve_file(&state, "favicon.ico", &headers).into_response()
}

async fn handle_asset(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, Response> {
    if method != Method::GET && method != Method::HEAD {
        return Err((
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, HEAD")],
        )
            .into_response());
    }

    let Some(key) = request_key(uri.path()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            [(header::CONTENT_TYPE, "text/plain")],
            "400 - Request path is not valid UTF-8",
        )
            .into_response());
    };

    serve_file(&state, &key, &headers)
}

/// Store key for a raw request path, or `None` if it does not decode to UTF-8.
fn request_key(raw: &str) -> Option<String> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    Some(asset_key(&decoded))
}

fn serve_file(state: &AppState, key: &str, headers: &HeaderMap) -> Result<Response, Response> {
    let handle = state.store.open(key).map_err(|err| {
        if err.is_not_found() {
            not_found(key)
        } else {
            internal_error(key, &err)
        }
    })?;

    let modified = handle
        .metadata()
        .map_err(|err| internal_error(key, &err))?
        .modified();

    if not_modified_since(headers, modified) {
        return Ok((
            StatusCode::NOT_MODIFIED,
            [(header::LAST_MODIFIED, http_date(modified))],
        )
            .into_response());
    }

    let content_type = determine_content_type(key);
    let mut body = handle.into_bytes().map_err(|err| internal_error(key, &err))?;
    if content_type.starts_with("text/html") {
        body = inject_reload_script(&body);
    }

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_LENGTH, body.len().to_string()),
            (header::LAST_MODIFIED, http_date(modified)),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        Body::from(body),
    )
        .into_response())
}

/// Store key for a request path. Directory paths map to their `index.html`.
fn asset_key(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() || trimmed.ends_with('/') {
        format!("{}index.html", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Whether the client copy, dated by `If-Modified-Since`, is still current.
///
/// HTTP dates have second precision, so the comparison drops sub-seconds.
fn not_modified_since(headers: &HeaderMap, modified: SystemTime) -> bool {
    let Some(since) = headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| DateTime::parse_from_rfc2822(value).ok())
    else {
        return false;
    };

    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Add the reload client before the closing `</body>`, or at the end.
fn inject_reload_script(content: &[u8]) -> Bytes {
    let html = String::from_utf8_lossy(content);
    let script_tag = format!(r#"<script src="{}"></script>"#, RELOAD_SCRIPT_PATH);

    let mut result = String::with_capacity(html.len() + script_tag.len() + 4);
    match html.rfind("</body>") {
        Some(pos) => {
            result.push_str(&html[..pos]);
            result.push_str(&script_tag);
            result.push('\n');
            result.push_str(&html[pos..]);
        }
        None => {
            result.push_str(&html);
            result.push('\n');
            result.push_str(&script_tag);
        }
    }

    Bytes::from(result)
}

fn determine_content_type(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    match extension {
        "html" | "htm" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript",
        "css" => "text/css",
        "json" | "map" => "application/json",
        "wasm" => "application/wasm",
        "txt" => "text/plain; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        _ => "application/octet-stream",
    }
}

fn not_found(key: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain")],
        format!("404 - Not Found: /{}", key),
    )
        .into_response()
}

fn internal_error(key: &str, err: &fob_memfs::StoreError) -> Response {
    tracing::error!(path = key, "failed to serve asset: {}", err);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain")],
        "500 - Internal Server Error",
    )
        .into_response()
}
