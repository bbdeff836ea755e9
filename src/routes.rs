use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(auth_public_routes())
        // Protected API
        .merge(protected_routes(state.clone()))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(public::signup_post))
        .route("/auth/login", post(public::login_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::workspaces::{files, notes, workspace};

    let upload_limit = state.config.upload_body_limit();

    Router::new()
        .route("/api/auth/whoami", get(protected::auth::session_whoami))
        .route("/api/workspaces", get(workspace::list).post(workspace::create))
        .route("/api/workspaces/join", post(workspace::join))
        .route(
            "/api/workspaces/:id",
            get(workspace::show).delete(workspace::delete),
        )
        .route("/api/workspaces/:id/notes", get(notes::list).post(notes::create))
        .route(
            "/api/workspaces/:id/notes/:note_id",
            put(notes::update).delete(notes::delete),
        )
        .route(
            "/api/workspaces/:id/files",
            get(files::list)
                .post(files::upload)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/workspaces/:id/files/:file_id",
            get(files::download).delete(files::delete),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
