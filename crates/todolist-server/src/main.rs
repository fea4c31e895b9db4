//! Todolist Server
//!
//! REST service for todo lists and the todos they own. Backed either by an
//! embedded SQLite database or by a process-local in-memory store.

mod error;
mod extractors;
mod handlers;
mod settings;
mod storage;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use todolist_core::TodoStore;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use settings::{Config, StorageConfig};
use storage::{Database, MemoryStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Todolist Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    // A missing .env file is fine; the environment alone may be enough
    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Ignoring unreadable .env file: {}", e),
    }

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, storage={:?}",
        config.bind_address, config.storage
    );

    let store = open_store(&config.storage).await?;
    info!("Using {} storage backend", store.backend());

    let app = app(AppState {
        store: store.clone(),
    });

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    store.close().await;
    info!("Server stopped");
    Ok(())
}

async fn open_store(storage: &StorageConfig) -> Result<Arc<dyn TodoStore>> {
    let store: Arc<dyn TodoStore> = match storage {
        StorageConfig::Memory => Arc::new(MemoryStore::new()),
        StorageConfig::Sqlite { database_path } => Arc::new(
            Database::new(database_path)
                .await
                .context("Failed to initialize database")?,
        ),
    };
    Ok(store)
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(api_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    use handlers::{lists, todos};

    Router::new()
        .route("/todolists", get(lists::list).post(lists::create))
        .route(
            "/todolists/:id",
            get(lists::get).put(lists::update).delete(lists::delete),
        )
        .route("/todolists/:id/todos", get(todos::list).post(todos::create))
        .route(
            "/todolists/:id/todos/:todo_id",
            get(todos::get).put(todos::update).delete(todos::delete),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutting down server...");
}
