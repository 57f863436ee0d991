use crate::models::Role;

// --- Well-known views ---

pub const GUEST_HOME: &str = "/";
pub const LOGIN: &str = "/login";
pub const REGISTER: &str = "/register";
pub const ADMIN_DASHBOARD: &str = "/admin/dashboard";
pub const OWNER_DASHBOARD: &str = "/owner/dashboard";

/// landing_route
///
/// The one role-to-landing table. Used after login and by every guard that turns away a
/// signed-in user with the wrong role; nothing else may encode this mapping.
pub fn landing_route(role: &Role) -> &'static str {
    match role {
        Role::Admin => ADMIN_DASHBOARD,
        Role::HostelOwner => OWNER_DASHBOARD,
        Role::Guest | Role::Customer | Role::Other(_) => GUEST_HOME,
    }
}

/// post_login_redirect
///
/// Where to send a user who just logged in: back to the view they were bounced from when
/// that return-state is a safe local path, otherwise to their role's landing route.
/// Guards on the returned view still apply, so a return-state the role cannot open ends
/// on the landing route anyway.
pub fn post_login_redirect(role: &Role, return_to: Option<&str>) -> String {
    return_to
        .filter(|path| is_safe_return_path(path))
        .map(str::to_string)
        .unwrap_or_else(|| landing_route(role).to_string())
}

/// Only same-origin absolute paths, and never the entry views themselves. Control
/// characters are refused outright: URL parsers drop tab, CR and LF, which would turn
/// `/\t/host` into `//host`.
fn is_safe_return_path(path: &str) -> bool {
    if path.chars().any(char::is_control) {
        return false;
    }
    if !path.starts_with('/') || path.starts_with("//") || path.contains('\\') {
        return false;
    }
    let bare = path.split(['?', '#']).next().unwrap_or(path);
    bare != LOGIN && bare != REGISTER
}
