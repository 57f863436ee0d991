use crate::{
    AppState,
    guard::{Guard, GuardGate, enforce},
    handlers::view,
};
use axum::{Router, middleware};

/// Owner Router Module
///
/// Property management views, restricted to hostel owners (either wire spelling of the
/// role, which is normalized before it ever reaches the guard).
pub fn owner_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/owner/dashboard", view("owner.dashboard"))
        // --- Hostels ---
        .route("/owner/hostels", view("owner.hostels"))
        .route("/owner/hostels/new", view("owner.hostels.create"))
        .route("/owner/hostels/{id}/edit", view("owner.hostels.edit"))
        // --- Rooms ---
        .route("/owner/rooms", view("owner.rooms"))
        .route("/owner/rooms/new", view("owner.rooms.create"))
        .route("/owner/rooms/{id}/edit", view("owner.rooms.edit"))
        .route_layer(middleware::from_fn_with_state(
            GuardGate::new(state.session.clone(), Guard::OwnerOnly),
            enforce,
        ))
}
