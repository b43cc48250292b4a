//! Development server implementation.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use aiui_manifest::{ConfigError, LoadError, DOCS_NAV, ROUTE_MANIFEST, UI_CONFIG};
use aiui_runtime::{ContentSelection, SlotRegistry, TemplateMatch};
use aiui_static::assets::AssetPipeline;
use aiui_static::{read_document, CompileError, TemplateEngine};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tokio::sync::RwLock;
use tower_http::services::ServeFile;

use crate::site::{normalize_path, DevSite};
use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{hmr_client_script, HmrHub, HmrMessage, HMR_SCRIPT_PATH, HMR_SOCKET_PATH};

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Site config file
    pub config_path: PathBuf,

    /// Where compiled manifests are written
    pub work_dir: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("aiui.yaml"),
            work_dir: PathBuf::from(".aiui"),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Shared server state.
struct ServerState {
    config: DevServerConfig,
    registry: SlotRegistry,
    hmr: HmrHub,
    /// The last load, or why it failed.
    site: Result<DevSite, String>,
    /// Guards content pushes against out-of-order renders.
    selection: ContentSelection<String, String>,
    errors: TemplateEngine,
}

type SharedState = Arc<RwLock<ServerState>>;

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
    registry: SlotRegistry,
}

impl DevServer {
    pub fn new(config: DevServerConfig) -> Self {
        Self {
            config,
            registry: SlotRegistry::new(),
        }
    }

    /// Use a registry with custom widget renderers.
    pub fn with_registry(mut self, registry: SlotRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Start the development server.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let site = load_site(&self.config, &self.registry).await;
        let mut watch_paths = vec![self.config.config_path.clone()];
        if let Ok(site) = &site {
            watch_paths.extend(site.docs_dir().map(Path::to_path_buf));
        }

        let state = Arc::new(RwLock::new(ServerState {
            config: self.config.clone(),
            registry: self.registry,
            hmr: HmrHub::new(),
            site,
            selection: ContentSelection::new(),
            errors: TemplateEngine::new(),
        }));

        let (watcher, mut rx) = FileWatcher::new(&watch_paths, &self.config.config_path)
            .map_err(|e| ServerError::WatchError(e.to_string()))?;

        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&state_clone, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = router(state, &self.config.work_dir);

        tracing::info!("Starting dev server at http://{}", addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

fn router(state: SharedState, work_dir: &Path) -> Router {
    Router::new()
        .route(HMR_SOCKET_PATH, get(ws_handler))
        .route(HMR_SCRIPT_PATH, get(hmr_script_handler))
        .route("/__resolve", get(resolve_handler))
        .route("/assets/main.css", get(css_handler))
        .route("/assets/main.js", get(js_handler))
        .route_service(
            &format!("/{}", UI_CONFIG),
            ServeFile::new(work_dir.join(UI_CONFIG)),
        )
        .route_service(
            &format!("/{}", DOCS_NAV),
            ServeFile::new(work_dir.join(DOCS_NAV)),
        )
        .route_service(
            &format!("/{}", ROUTE_MANIFEST),
            ServeFile::new(work_dir.join(ROUTE_MANIFEST)),
        )
        .fallback(page_handler)
        .with_state(state)
}

async fn load_site(config: &DevServerConfig, registry: &SlotRegistry) -> Result<DevSite, String> {
    DevSite::load(&config.config_path, &config.work_dir, registry.clone())
        .await
        .map_err(|e| {
            tracing::error!("Failed to load site: {}", e);
            e.to_string()
        })
}

/// Handle file watch events.
async fn handle_watch_event(state: &SharedState, event: WatchEvent) {
    match event {
        WatchEvent::DocModified(path) => {
            tracing::info!("Doc modified: {}", path.display());
            tokio::spawn(update_content(Arc::clone(state), path));
        }
        WatchEvent::Modified(path) => {
            tracing::debug!("Modified: {}", path.display());
            state.read().await.hmr.send(HmrMessage::Reload);
        }
        structural => {
            tracing::info!("Recompiling after {:?}", structural);
            reload_site(state).await;
        }
    }
}

/// Recompile and tell every client to reload.
async fn reload_site(state: &SharedState) {
    let (config, registry) = {
        let state = state.read().await;
        (state.config.clone(), state.registry.clone())
    };

    let site = load_site(&config, &registry).await;

    let mut guard = state.write().await;
    let state = &mut *guard;
    state.site = site;
    state.selection.clear();
    state.hmr.send(HmrMessage::Reload);
}

/// Re-render one page's content and push it, unless a newer change to
/// any page started while this one was rendering.
async fn update_content(state: SharedState, source: PathBuf) {
    let ticket = {
        let mut guard = state.write().await;
        let state = &mut *guard;

        let page = match &state.site {
            Ok(site) => site.page_for_source(&source).map(str::to_string),
            Err(_) => None,
        };

        match page {
            Some(page) => state.selection.select(page),
            None => {
                state.hmr.send(HmrMessage::Reload);
                return;
            }
        }
    };

    let rendered = tokio::task::spawn_blocking(move || read_document(&source)).await;
    let html = match rendered {
        Ok(Ok(document)) => document.html,
        Ok(Err(e)) => {
            tracing::warn!("Failed to re-render {}: {}", ticket.key(), e);
            return;
        }
        Err(e) => {
            tracing::warn!("Render task for {} failed: {}", ticket.key(), e);
            return;
        }
    };

    let mut guard = state.write().await;
    let state = &mut *guard;

    if !state.selection.complete(&ticket, html) {
        tracing::debug!("Discarding stale render of {}", ticket.key());
        return;
    }

    if let Some((path, html)) = state.selection.current() {
        state.hmr.send(HmrMessage::UpdateContent {
            path: path.clone(),
            html: html.clone(),
        });
    }
}

/// Render any other path as a page.
async fn page_handler(State(state): State<SharedState>, uri: Uri) -> Response {
    let state = state.read().await;
    let path = normalize_path(uri.path());

    match &state.site {
        Ok(site) => match site.render(&path) {
            Ok(html) => Html(html).into_response(),
            Err(e) => error_page(&state, &e.to_string(), StatusCode::INTERNAL_SERVER_ERROR),
        },
        Err(message) => error_page(&state, message, StatusCode::SERVICE_UNAVAILABLE),
    }
}

fn error_page(state: &ServerState, message: &str, status: StatusCode) -> Response {
    match state.errors.render_error(message, Some(HMR_SCRIPT_PATH)) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            (status, "Failed to load").into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResolveQuery {
    path: String,
}

/// The template a path resolves to, or `null`.
async fn resolve_handler(
    State(state): State<SharedState>,
    Query(query): Query<ResolveQuery>,
) -> Json<Option<TemplateMatch>> {
    let state = state.read().await;
    let path = normalize_path(&query.path);

    Json(state.site.as_ref().ok().and_then(|site| site.resolve(&path)))
}

async fn css_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css")],
        AssetPipeline::stylesheet(false),
    )
}

async fn js_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        AssetPipeline::generate_js(),
    )
}

/// Handler for the HMR WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Forward HMR messages to one client.
async fn handle_ws(mut socket: WebSocket, state: SharedState) {
    let mut rx = state.read().await.hmr.subscribe();

    if send_message(&mut socket, &HmrMessage::Connected).await.is_err() {
        return;
    }

    while let Ok(msg) = rx.recv().await {
        if send_message(&mut socket, &msg).await.is_err() {
            break;
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &HmrMessage) -> Result<(), ()> {
    let json = serde_json::to_string(msg).map_err(|e| {
        tracing::warn!("Failed to encode HMR message: {}", e);
    })?;
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

async fn hmr_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        hmr_client_script(HMR_SOCKET_PATH),
    )
}
