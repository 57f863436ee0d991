use hostel_gate::{
    ApiError,
    models::{LoginCredentials, RegisterRequest, Role, User},
};

// --- Role normalization ---

#[test]
fn test_owner_spellings_collapse_to_one_role() {
    assert_eq!(Role::from_wire("HOSTEL_OWNER"), Role::HostelOwner);
    assert_eq!(Role::from_wire("HOSTELOWNER"), Role::HostelOwner);
    assert_eq!(Role::from_wire("hostelOwner"), Role::HostelOwner);
}

#[test]
fn test_unknown_role_is_kept_verbatim() {
    let role = Role::from_wire("Landlord");
    assert_eq!(role, Role::Other("Landlord".to_string()));
    assert_eq!(role.to_string(), "Landlord");
}

#[test]
fn test_role_serializes_canonical_spelling() {
    let json = serde_json::to_string(&Role::from_wire("HOSTELOWNER")).unwrap();
    assert_eq!(json, r#""HOSTEL_OWNER""#);

    let parsed: Role = serde_json::from_str(r#""customer""#).unwrap();
    assert_eq!(parsed, Role::Customer);
}

// --- User record ---

#[test]
fn test_user_uses_camel_case_and_skips_missing_fields() {
    let user = User {
        id: "3".to_string(),
        username: "minh".to_string(),
        role: Role::Customer,
        full_name: Some("Tran Minh".to_string()),
        ..User::default()
    };

    let value = serde_json::to_value(&user).unwrap();

    assert_eq!(value["fullName"], "Tran Minh");
    assert_eq!(value["role"], "CUSTOMER");
    assert!(value.get("email").is_none());
    assert!(value.get("balance").is_none());
    assert!(value.get("isActive").is_none());
}

#[test]
fn test_user_is_active_defaults_to_true() {
    let user: User = serde_json::from_str(r#"{"id":"1","username":"a","role":"GUEST"}"#).unwrap();
    assert!(user.is_active());

    let disabled: User =
        serde_json::from_str(r#"{"id":"1","username":"a","role":"GUEST","isActive":false}"#)
            .unwrap();
    assert!(!disabled.is_active());
}

// --- Request validation ---

#[test]
fn test_login_credentials_validation() {
    let ok = LoginCredentials {
        email: "a@b.vn".to_string(),
        password: "pw".to_string(),
    };
    assert!(ok.validate().is_ok());

    let no_email = LoginCredentials {
        email: " ".to_string(),
        password: "pw".to_string(),
    };
    assert!(matches!(no_email.validate(), Err(ApiError::Validation(_))));

    let no_password = LoginCredentials {
        email: "a@b.vn".to_string(),
        password: String::new(),
    };
    assert!(matches!(no_password.validate(), Err(ApiError::Validation(_))));
}

fn register_request(role: Role) -> RegisterRequest {
    RegisterRequest {
        username: "tenant".to_string(),
        password: "pw".to_string(),
        email: None,
        full_name: None,
        phone_number: None,
        role,
    }
}

#[test]
fn test_register_request_validation() {
    assert!(register_request(Role::Guest).validate().is_ok());
    assert!(register_request(Role::HostelOwner).validate().is_ok());
    assert_eq!(
        register_request(Role::Admin).validate(),
        Err(ApiError::validation("Cannot register as an administrator"))
    );

    let mut blank = register_request(Role::Guest);
    blank.username = "   ".to_string();
    assert!(blank.validate().is_err());
}

#[test]
fn test_register_request_role_defaults_to_guest() {
    let request: RegisterRequest =
        serde_json::from_str(r#"{"username":"u","password":"p"}"#).unwrap();
    assert_eq!(request.role, Role::Guest);
}

#[test]
fn test_login_identifier_prefers_email() {
    let mut request = register_request(Role::Guest);
    assert_eq!(request.login_identifier(), "tenant");

    request.email = Some(String::new());
    assert_eq!(request.login_identifier(), "tenant");

    request.email = Some("tenant@mail.vn".to_string());
    assert_eq!(request.login_identifier(), "tenant@mail.vn");
}
