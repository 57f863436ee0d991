use crate::{
    AppState,
    guard::{AllowedRoles, Guard, GuardGate, enforce},
    handlers::{self, view},
    models::Role,
};
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Views that need a signed-in user. Visitors who are not signed in are sent to the login
/// view with the requested location as return-state; signed-in users with the wrong role
/// are sent to their own landing route.
pub fn authenticated_routes(state: &AppState) -> Router<AppState> {
    // GET /profile
    // Every role has a profile.
    let any_role = Router::new()
        .route("/profile", view("account.profile"))
        .route_layer(middleware::from_fn_with_state(
            GuardGate::new(state.session.clone(), Guard::authenticated()),
            enforce,
        ));

    // Booking and payment flows belong to renters only.
    let renters = Router::new()
        .route("/bookings", view("guest.bookings"))
        .route("/payment", view("guest.payment"))
        .route_layer(middleware::from_fn_with_state(
            GuardGate::new(
                state.session.clone(),
                Guard::protected(AllowedRoles::only([Role::Guest, Role::Customer])),
            ),
            enforce,
        ));

    let session_api = Router::new()
        // POST /auth/logout
        // Unguarded on purpose: logging out twice is harmless.
        .route("/auth/logout", post(handlers::logout))
        // GET /auth/me
        // Rejected with 401 by the `AuthUser` extractor when nobody is signed in.
        .route("/auth/me", get(handlers::me));

    Router::new()
        .merge(any_role)
        .merge(renters)
        .merge(session_api)
}
