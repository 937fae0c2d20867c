//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all dispatcher
//! - Wire up middleware (request ID, tracing, CORS, override capture, rewrite)
//! - Bind server to listener
//! - Dispatch requests through the route table to the handlers
//!
//! # Request Pipeline
//! ```text
//! request ID → trace span → CORS (OPTIONS ends here) → client override
//!     → path rewrite → route table → handler
//! ```

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    middleware,
    response::Response,
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::client::{ClientResolver, HostMapping};
use crate::config::ServerConfig;
use crate::http::handlers;
use crate::http::middleware::{capture_client_override, cors_middleware, rewrite_middleware};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::response::text_error;
use crate::lifecycle::shutdown_signal;
use crate::observability::{metrics, tracing::http_trace_layer};
use crate::proxy::UpstreamProxy;
use crate::routing::{RouteMatch, RouteTable};
use crate::stylesheet::{ImportInliner, StylesheetCompiler, StylesheetService};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub routes: Arc<RouteTable>,
    pub clients: ClientResolver,
    pub proxy: Arc<UpstreamProxy>,
    pub stylesheets: Arc<StylesheetService>,
}

impl AppState {
    pub fn new(config: ServerConfig, compiler: Arc<dyn StylesheetCompiler>) -> Self {
        let routes = Arc::new(RouteTable::from_config(&config));
        let clients = ClientResolver::new(HostMapping::new(&config.host_mapping));
        let proxy = Arc::new(UpstreamProxy::new(config.upstreams.clone()));
        let stylesheets = Arc::new(StylesheetService::new(config.stylesheets.clone(), compiler));

        Self {
            config: Arc::new(config),
            routes,
            clients,
            proxy,
            stylesheets,
        }
    }
}

/// The development HTTP server.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server that compiles stylesheets with the bundled [`ImportInliner`].
    pub fn new(config: ServerConfig) -> Self {
        Self::with_compiler(config, Arc::new(ImportInliner))
    }

    /// Create a server with a custom stylesheet compiler.
    pub fn with_compiler(config: ServerConfig, compiler: Arc<dyn StylesheetCompiler>) -> Self {
        let state = AppState::new(config, compiler);
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers wrap outward, so the last one added sees the request first.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .layer(middleware::from_fn(rewrite_middleware))
            .layer(middleware::from_fn_with_state(state.clone(), capture_client_override))
            .layer(middleware::from_fn(cors_middleware))
            .layer(propagate_request_id_layer())
            .layer(http_trace_layer())
            .layer(set_request_id_layer())
            .with_state(state)
    }

    /// The router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.state.config
    }

    /// Serve on `listener` until Ctrl-C or `stop` fires.
    pub async fn run(self, listener: TcpListener, stop: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown_signal(stop))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Route a request through the table and run its handler.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let path = request.uri().path().to_string();

    if request.method() != Method::GET && request.method() != Method::HEAD {
        let response = text_error(
            StatusCode::NOT_FOUND,
            format!("Cannot {} {}", request.method(), path),
        );
        metrics::record_request("none", StatusCode::NOT_FOUND.as_u16(), start);
        return response;
    }

    let route = state.routes.match_path(&path);
    let route_name = route.name();
    tracing::debug!(route = route_name, path = %path, "Dispatching");

    let response = match route {
        RouteMatch::Stylesheet => handlers::stylesheet(&state, &path).await,
        RouteMatch::Favicon => handlers::favicon(&state, &request),
        RouteMatch::ConfigRedirect => handlers::config_redirect(&state, &request),
        RouteMatch::Proxy { upstream, suffix } => {
            let head = request.map(|_| ());
            handlers::proxy(&state, upstream, &suffix, &head).await
        }
        RouteMatch::Static { file, config_cache } => {
            handlers::serve_file(&state, file, config_cache, request).await
        }
        RouteMatch::Forbidden { config_cache } => handlers::forbidden(&state, config_cache),
        RouteMatch::Index { config_cache } => {
            let index = state.config.index.clone();
            handlers::serve_file(&state, index, config_cache, request).await
        }
    };

    metrics::record_request(route_name, response.status().as_u16(), start);
    response
}
