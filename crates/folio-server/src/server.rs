//! Development server implementation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::sync::broadcast::error::RecvError;
use tower_http::services::{ServeDir, ServeFile};

use folio_config::{ConfigError, SiteConfig, CONFIG_FILENAME};
use folio_static::{BuildConfig, BuildError, BuildResult, StaticBuilder};

use crate::watcher::FileWatcher;
use crate::websocket::{
    reload_client_script, ReloadHub, ReloadMessage, RELOAD_SCRIPT_PATH, RELOAD_SOCKET_PATH,
};

/// Quiet period before a rebuild, so one save triggers one build.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Site descriptor to build
    pub config_path: PathBuf,

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
            config_path: PathBuf::from(CONFIG_FILENAME),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Directory not found: {0}")]
    MissingDir(PathBuf),

    #[error("Failed to bind to {addr}: {message}")]
    Bind { addr: String, message: String },

    #[error("File watch error: {0}")]
    Watch(String),
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Build, serve and rebuild on change until the process is stopped.
    pub async fn start(self) -> Result<(), ServerError> {
        let config_path = self.config.config_path.clone();

        // Paths and base stay fixed for the lifetime of the server
        let loaded = SiteConfig::load(&config_path)?;
        let docs_dir = loaded.docs_dir();
        let output_dir = loaded.output_dir();
        let base = loaded.config.site.base.clone();

        match rebuild(&config_path, &output_dir).await {
            Ok(result) => log_build(&result),
            Err(e) => tracing::error!("Build failed: {}", e),
        }

        let hub = ReloadHub::new();

        let (watcher, mut rx) = FileWatcher::new(
            std::slice::from_ref(&docs_dir),
            std::slice::from_ref(&config_path),
            std::slice::from_ref(&output_dir),
        )
        .map_err(|e| ServerError::Watch(e.to_string()))?;

        // Spawn file watch handler
        let rebuild_hub = hub.clone();
        let rebuild_output = output_dir.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                tracing::info!("Changed: {}", event.path().display());

                tokio::time::sleep(DEBOUNCE).await;
                while rx.try_recv().is_ok() {}

                match rebuild(&config_path, &rebuild_output).await {
                    Ok(result) => {
                        log_build(&result);
                        rebuild_hub.send(ReloadMessage::Reload);
                    }
                    Err(e) => {
                        tracing::error!("Rebuild failed, serving previous build: {}", e);
                        rebuild_hub.send(ReloadMessage::Error {
                            message: e.to_string(),
                        });
                    }
                }
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = Router::new()
            .route(RELOAD_SOCKET_PATH, get(ws_handler))
            .route(RELOAD_SCRIPT_PATH, get(reload_script_handler))
            .with_state(hub);
        let app = mount_site(app, &output_dir, &base);

        serve(app, &self.config.host, self.config.port, &base, self.config.open).await
    }
}

/// Serve an already built site without watching it.
pub async fn preview(
    dir: &Path,
    base: &str,
    host: &str,
    port: u16,
    open: bool,
) -> Result<(), ServerError> {
    if !dir.is_dir() {
        return Err(ServerError::MissingDir(dir.to_path_buf()));
    }

    let app = mount_site(Router::new(), dir, base);
    serve(app, host, port, base, open).await
}

/// Build with the live reload script injected.
async fn rebuild(config_path: &Path, output_dir: &Path) -> Result<BuildResult, BuildError> {
    let loaded = SiteConfig::load(config_path)?;

    let mut config = BuildConfig::from_loaded(&loaded);
    config.output_dir = output_dir.to_path_buf();
    config.live_reload = Some(RELOAD_SCRIPT_PATH.to_string());

    StaticBuilder::new(config).build().await
}

fn log_build(result: &BuildResult) {
    tracing::info!(
        "Built {} pages in {}ms",
        result.pages,
        result.duration_ms
    );
}

/// Serve the output directory under the site base, with the 404 page as fallback.
fn mount_site(app: Router, dir: &Path, base: &str) -> Router {
    let site = ServeDir::new(dir).not_found_service(ServeFile::new(dir.join("404.html")));

    let prefix = base.trim_end_matches('/');
    if prefix.is_empty() {
        app.fallback_service(site)
    } else {
        app.nest_service(prefix, site)
    }
}

async fn serve(
    app: Router,
    host: &str,
    port: u16,
    base: &str,
    open: bool,
) -> Result<(), ServerError> {
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .map_err(|e| ServerError::Bind {
            addr: addr.clone(),
            message: e.to_string(),
        })?;

    let url = format!("http://{}{}", addr, base);
    tracing::info!("Serving at {}", url);

    // Open browser if configured
    if open {
        if let Err(e) = open::that(&url) {
            tracing::debug!("Could not open browser: {}", e);
        }
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Bind {
            addr,
            message: e.to_string(),
        })
}

/// Handler for the reload WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(hub): State<ReloadHub>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, hub))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, hub: ReloadHub) {
    let mut rx = hub.subscribe();

    if !send(&mut socket, &ReloadMessage::Connected).await {
        return;
    }

    // Forward reload messages to the client
    loop {
        match rx.recv().await {
            Ok(msg) => {
                if !send(&mut socket, &msg).await {
                    break;
                }
            }
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        }
    }
}

async fn send(socket: &mut WebSocket, msg: &ReloadMessage) -> bool {
    let Ok(json) = serde_json::to_string(msg) else {
        return false;
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

/// Handler for the reload client script.
async fn reload_script_handler() -> impl IntoResponse {
    (
        [("content-type", "application/javascript")],
        reload_client_script(RELOAD_SOCKET_PATH),
    )
}
