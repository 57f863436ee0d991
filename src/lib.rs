use axum::{
    Router,
    extract::FromRef,
    http::{HeaderName, HeaderValue},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Session core: state holder, guards, landing resolver.
pub mod guard;
pub mod landing;
pub mod session;

// Boundary collaborators and shared types.
pub mod auth;
pub mod auth_api;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod storage;

// Module for routing segregation (Public, Authenticated, Owner, Admin).
pub mod routes;
use routes::{admin, authenticated, owner, public};

// --- Public Re-exports ---

pub use auth_api::{AuthService, AuthServiceState, HttpAuthService, MockAuthService};
pub use config::AppConfig;
pub use error::ApiError;
pub use session::{Session, SessionHandle, SessionState};
pub use storage::{FileStorage, MemoryStorage, StorageState};

/// ApiDoc
///
/// OpenAPI document for the session endpoints, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::session_status, handlers::login, handlers::register,
        handlers::logout, handlers::me
    ),
    components(
        schemas(
            models::User, models::LoginCredentials, models::RegisterRequest,
            models::SessionStatus, models::LoginOutcome, models::ViewPage,
            error::ErrorBody,
        )
    ),
    tags(
        (name = "hostel-gate", description = "Hostel marketplace session and navigation gateway")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single container shared by every route: the client session and the loaded
/// configuration. Cheap to clone; the session itself sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The one session of this client process.
    pub session: SessionHandle,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(session: SessionHandle, config: AppConfig) -> Self {
        Self { session, config }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for SessionHandle {
    fn from_ref(app_state: &AppState) -> SessionHandle {
        app_state.session.clone()
    }
}

/// create_router
///
/// Assembles every guarded view group and the session endpoints, then applies the
/// observability and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes(&state))
        .merge(authenticated::authenticated_routes(&state))
        .merge(owner::owner_routes(&state))
        .merge(admin::admin_routes(&state))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// cors_layer
///
/// Any origin locally; in production only the configured client origin. An origin that
/// is not a valid header value allows no cross-origin access at all.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match config.client_origin.as_deref() {
        None => cors.allow_origin(Any),
        Some(origin) => match HeaderValue::from_str(origin) {
            Ok(origin) => cors.allow_origin(origin),
            Err(_) => {
                tracing::warn!(origin, "Ignoring invalid CLIENT_ORIGIN; cross-origin access disabled");
                cors
            }
        },
    }
}

/// trace_span_logger
///
/// Builds the per-request tracing span, tagged with the `x-request-id` header so every
/// log line of one navigation can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
