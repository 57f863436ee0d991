use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;

// --- Identity Schemas ---

/// Role
///
/// The closed set of principals the marketplace knows about. The backend still emits the
/// legacy `HOSTELOWNER` spelling for some accounts; both spellings deserialize into
/// `Role::HostelOwner`, so no access decision ever has to compare against two values.
/// Unknown wire values are kept verbatim in `Role::Other` and treated like a guest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Admin,
    HostelOwner,
    #[default]
    Guest,
    Customer,
    Other(String),
}

impl Role {
    /// Every spelling the backend is known to send, legacy alias included.
    pub fn wire_values() -> [&'static str; 5] {
        ["ADMIN", "HOSTEL_OWNER", "HOSTELOWNER", "GUEST", "CUSTOMER"]
    }

    /// Normalizes a wire value. This is the only place the owner alias is resolved.
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Role::Admin,
            "HOSTEL_OWNER" | "HOSTELOWNER" => Role::HostelOwner,
            "GUEST" => Role::Guest,
            "CUSTOMER" => Role::Customer,
            _ => Role::Other(value.to_string()),
        }
    }

    /// Canonical wire spelling.
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "ADMIN",
            Role::HostelOwner => "HOSTEL_OWNER",
            Role::Guest => "GUEST",
            Role::Customer => "CUSTOMER",
            Role::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::from_wire(&raw))
    }
}

/// User
///
/// The authenticated principal, exactly as the client persists it under the `user`
/// storage key. Field names follow the client's camelCase JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque backend identifier (the backend sends numbers, the client keeps strings).
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[ts(type = "string")]
    #[schema(value_type = String, example = "HOSTEL_OWNER")]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl User {
    /// Accounts without an explicit flag are active.
    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }
}

// --- Request Payloads (Input Schemas) ---

/// LoginCredentials
///
/// Input payload for `POST /auth/login`. Forwarded verbatim to the backend.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginCredentials {
    #[schema(example = "owner@hostel.vn")]
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.email.trim().is_empty() {
            return Err(ApiError::validation("Email is required"));
        }
        if self.password.is_empty() {
            return Err(ApiError::validation("Password is required"));
        }
        Ok(())
    }
}

/// LoginResponse
///
/// What the authentication collaborator hands back on success: a bearer token and the
/// already-normalized user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// RegisterRequest
///
/// Input payload for `POST /auth/register`. Registration is followed by an automatic login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    #[ts(type = "string")]
    #[schema(value_type = String, example = "GUEST")]
    pub role: Role,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.username.trim().is_empty() {
            return Err(ApiError::validation("Username is required"));
        }
        if self.password.is_empty() {
            return Err(ApiError::validation("Password is required"));
        }
        // Self-service sign-up never grants moderation rights.
        if self.role == Role::Admin {
            return Err(ApiError::validation("Cannot register as an administrator"));
        }
        Ok(())
    }

    /// The identifier used for the automatic login after sign-up.
    pub fn login_identifier(&self) -> &str {
        self.email
            .as_deref()
            .filter(|email| !email.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// ReturnState
///
/// Query parameters carried through an unauthenticated redirect (`/login?from=/owner/rooms`).
#[derive(Debug, Clone, Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReturnState {
    /// The originally requested location.
    pub from: Option<String>,
}

// --- Output Schemas ---

/// SessionStatus
///
/// The read accessors of the session holder as one consistent snapshot (GET /auth/session).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub is_loading: bool,
    pub is_authenticated: bool,
    pub current_user: Option<User>,
}

/// LoginOutcome
///
/// Returned by login and registration: the user plus where the client should navigate next.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub user: User,
    pub redirect_to: String,
}

/// ViewPage
///
/// The descriptor returned for every navigable view once its guard lets it render.
/// The client maps `view` onto its page component.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ViewPage {
    #[schema(example = "owner.dashboard")]
    pub view: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: Option<User>,
}
