use crate::{
    AppState,
    guard::{Guard, GuardGate, enforce},
    handlers::view,
};
use axum::{Router, middleware};

/// Admin Router Module
///
/// Moderation views for users, reviews, and listings. Only administrators get through;
/// everyone else signed in lands on their own dashboard instead of an error page.
pub fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard", view("admin.dashboard"))
        .route("/admin/users", view("admin.users"))
        .route("/admin/reviews", view("admin.reviews"))
        .route("/admin/hostels", view("admin.hostels"))
        .route_layer(middleware::from_fn_with_state(
            GuardGate::new(state.session.clone(), Guard::AdminOnly),
            enforce,
        ))
}
