use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::config::AppConfig;
use crate::openapi::ApiDoc;
use crate::store::DocumentStore;
use crate::{auth, resources};

/// Everything a handler needs, built once at start-up and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub store: DocumentStore,
    pub app_config: AppConfig,
}

/// Binds the configured address and serves until Ctrl-C or SIGTERM, letting
/// in-flight requests finish.
pub async fn run_server(app_state: AppState) -> std::io::Result<()> {
    let addr = format!(
        "{}:{}",
        app_state.app_config.web.addr, app_state.app_config.web.port
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("jLearn is running on http://{}", listener.local_addr()?);

    let app = create_router(app_state);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
}

pub fn create_router(app_state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/register", post(auth::register))
        .route("/singIn", post(auth::sign_in))
        .route("/lessons", get(resources::list_lessons))
        .route("/users", get(resources::list_users))
        .route("/vocabularies", get(resources::list_vocabularies))
        .route("/api-docs/openapi.json", get(openapi_json));

    let mut mutation_routes = Router::new()
        .route("/lesson", post(resources::create_lesson))
        .route("/lesson-del/{id}", delete(resources::delete_lesson))
        .route("/lesson-update/{id}", patch(resources::update_lesson))
        .route("/user-del/{id}", delete(resources::delete_user))
        .route("/user-role/{id}", patch(resources::update_user_role))
        .route("/vocabulary", post(resources::create_vocabulary))
        .route("/vocabulary-del/{id}", delete(resources::delete_vocabulary))
        .route("/vocabulary-update/{id}", patch(resources::update_vocabulary));

    if app_state.app_config.auth.protect_mutations {
        mutation_routes = mutation_routes.route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::auth_middleware,
        ));
    }

    let cors = cors_layer(&app_state.app_config.web.cors_origin);

    Router::new()
        .merge(public_routes)
        .merge(mutation_routes)
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(app_state) // Provide state to all routes
}

fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }

    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(e) => {
            tracing::warn!("Invalid CORS origin {:?} ({}), allowing any origin", origin, e);
            CorsLayer::permissive()
        }
    }
}

async fn root() -> &'static str {
    "JLearn server is running"
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
