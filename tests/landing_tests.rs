use hostel_gate::{
    guard::{AllowedRoles, Guard, GuardOutcome},
    landing::{
        ADMIN_DASHBOARD, GUEST_HOME, OWNER_DASHBOARD, landing_route, post_login_redirect,
    },
    models::{Role, User},
    session::SessionState,
};

fn roles_under_test() -> Vec<Role> {
    let mut roles: Vec<Role> = Role::wire_values().iter().map(|v| Role::from_wire(v)).collect();
    roles.push(Role::from_wire("SUPERVISOR"));
    roles.push(Role::from_wire(""));
    roles
}

#[test]
fn test_resolver_is_total() {
    for role in roles_under_test() {
        let route = landing_route(&role);
        assert!(
            [ADMIN_DASHBOARD, OWNER_DASHBOARD, GUEST_HOME].contains(&route),
            "{:?} resolved to {}",
            role,
            route
        );
    }
}

#[test]
fn test_resolver_table() {
    assert_eq!(landing_route(&Role::from_wire("ADMIN")), ADMIN_DASHBOARD);
    assert_eq!(landing_route(&Role::from_wire("HOSTEL_OWNER")), OWNER_DASHBOARD);
    assert_eq!(landing_route(&Role::from_wire("HOSTELOWNER")), OWNER_DASHBOARD);
    assert_eq!(landing_route(&Role::from_wire("GUEST")), GUEST_HOME);
    assert_eq!(landing_route(&Role::from_wire("CUSTOMER")), GUEST_HOME);
    assert_eq!(landing_route(&Role::from_wire("SUPERVISOR")), GUEST_HOME);
}

/// Post-login navigation and the in-guard "wrong role" redirect must agree for every role.
#[test]
fn test_post_login_and_guard_redirect_use_the_same_table() {
    // A set no real role belongs to, so every signed-in role is turned away.
    let nobody = Guard::protected(AllowedRoles::only(Vec::<Role>::new()));

    for role in roles_under_test() {
        let user = User {
            id: "1".to_string(),
            username: "u".to_string(),
            role: role.clone(),
            ..User::default()
        };
        let guard_target = match nobody.decide(&SessionState::signed_in(user), "/x") {
            GuardOutcome::Redirect(redirect) => redirect.to,
            other => panic!("expected redirect for {:?}, got {:?}", role, other),
        };

        assert_eq!(post_login_redirect(&role, None), guard_target);
    }
}

#[test]
fn test_post_login_prefers_safe_return_state() {
    assert_eq!(
        post_login_redirect(&Role::Customer, Some("/payment?room=12")),
        "/payment?room=12"
    );
    assert_eq!(
        post_login_redirect(&Role::HostelOwner, Some("/owner/rooms")),
        "/owner/rooms"
    );
}

#[test]
fn test_post_login_rejects_unsafe_return_state() {
    let unsafe_targets = [
        "https://evil.example/phish",
        "//evil.example",
        "owner/rooms",
        "/\\evil.example",
        "/login",
        "/login?from=%2Fadmin",
        "/register",
        "",
        "/\t/evil.example",
        "/\r/evil.example",
        "/\n/evil.example",
        "/rooms\u{0}",
    ];
    for target in unsafe_targets {
        assert_eq!(
            post_login_redirect(&Role::Admin, Some(target)),
            ADMIN_DASHBOARD,
            "{} must not be followed",
            target
        );
    }
}
