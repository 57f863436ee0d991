use crate::{
    AppState,
    guard::{Guard, GuardGate, enforce},
    handlers::{self, view},
};
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Public Router Module
///
/// Views any visitor may open, signed in or not, and the unguarded session endpoints.
/// Three guard configurations live here:
/// - the guest home turns admins and owners back to their dashboards;
/// - entry views (login, registration, password recovery) send signed-in users to
///   their landing route;
/// - browsing views only wait for the session to finish loading.
pub fn public_routes(state: &AppState) -> Router<AppState> {
    // GET /
    // The default guest view. Guests and customers stay; admins and owners do not.
    let guest_landing = Router::new()
        .route("/", view("guest.home"))
        .route_layer(middleware::from_fn_with_state(
            GuardGate::new(state.session.clone(), Guard::guest_landing()),
            enforce,
        ));

    // Entry views: pointless once signed in.
    let entry = Router::new()
        .route("/login", view("auth.login"))
        .route("/register", view("auth.register"))
        .route("/forgot-password", view("auth.forgot_password"))
        .route("/reset-password", view("auth.reset_password"))
        .route_layer(middleware::from_fn_with_state(
            GuardGate::new(state.session.clone(), Guard::entry_page()),
            enforce,
        ));

    // Room browsing: open to all.
    let browse = Router::new()
        .route("/rooms", view("rooms.list"))
        .route("/rooms/{id}", view("rooms.detail"))
        .route_layer(middleware::from_fn_with_state(
            GuardGate::new(state.session.clone(), Guard::public()),
            enforce,
        ));

    let session_api = Router::new()
        // GET /health
        // Liveness probe; answers even while the session is loading.
        .route("/health", get(|| async { "ok" }))
        .route("/auth/session", get(handlers::session_status))
        // POST /auth/login?from=...
        .route("/auth/login", post(handlers::login))
        .route("/auth/register", post(handlers::register));

    Router::new()
        .merge(guest_landing)
        .merge(entry)
        .merge(browse)
        .merge(session_api)
}
