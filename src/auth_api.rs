use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use crate::{
    error::ApiError,
    models::{LoginCredentials, LoginResponse, RegisterRequest, Role, User},
};

/// AuthService Trait
///
/// The consumed contract of the backend's authentication endpoints. The session holder
/// only ever talks to this trait, so tests swap in `MockAuthService` without a network.
/// Every failure is already an `ApiError` when it leaves an implementation.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchanges credentials for a token and a normalized user record.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError>;

    /// Invalidates the token server-side. Callers treat this as fire-and-forget.
    async fn logout(&self, token: Option<&str>) -> Result<(), ApiError>;

    /// Creates the account. Does not log in.
    async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError>;
}

/// AuthServiceState
///
/// The shared handle to the authentication collaborator.
pub type AuthServiceState = Arc<dyn AuthService>;

// --- Backend wire shapes ---

/// The backend's user record. Ids arrive as numbers or strings and `username` may be
/// missing for accounts created by e-mail only.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackendUser {
    id: serde_json::Value,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Role,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    balance: Option<f64>,
    #[serde(default)]
    is_active: Option<bool>,
}

impl From<BackendUser> for User {
    fn from(raw: BackendUser) -> Self {
        let id = match raw.id {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        let username = raw
            .username
            .filter(|u| !u.is_empty())
            .or_else(|| raw.email.clone())
            .unwrap_or_default();

        User {
            id,
            username,
            email: raw.email,
            role: raw.role,
            full_name: raw.full_name,
            balance: raw.balance,
            is_active: raw.is_active,
        }
    }
}

#[derive(Deserialize)]
struct BackendLoginResponse {
    token: String,
    user: BackendUser,
}

#[derive(Deserialize)]
struct BackendMessage {
    message: Option<String>,
}

/// HttpAuthService
///
/// The concrete implementation, calling the REST backend with reqwest.
#[derive(Clone)]
pub struct HttpAuthService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthService {
    /// new
    ///
    /// Builds the HTTP client. `base_url` is the backend's API root, e.g.
    /// `http://localhost:8080/api`; a trailing slash is tolerated.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::unknown(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turns a non-success response into an `ApiError`, keeping the backend's message.
    async fn error_from(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .json::<BackendMessage>()
            .await
            .ok()
            .and_then(|body| body.message);
        ApiError::from_status(status, message)
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError> {
        // The servlet authenticates by `username`; the client has always sent `email`.
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({
                "email": credentials.email,
                "username": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body = response
            .json::<BackendLoginResponse>()
            .await
            .map_err(|e| ApiError::unknown(format!("Unexpected login response: {}", e)))?;

        Ok(LoginResponse {
            token: body.token,
            user: body.user.into(),
        })
    }

    async fn logout(&self, token: Option<&str>) -> Result<(), ApiError> {
        let mut request = self.client.post(self.url("/auth/logout"));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(&serde_json::json!({
                "fullName": request.full_name.clone().unwrap_or_else(|| request.username.clone()),
                "email": request.login_identifier(),
                "phoneNumber": request.phone_number.clone().unwrap_or_default(),
                "password": request.password,
                "role": request.role,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let user = response
            .json::<BackendUser>()
            .await
            .map_err(|e| ApiError::unknown(format!("Unexpected register response: {}", e)))?;

        Ok(user.into())
    }
}

/// MockAuthService
///
/// In-memory accounts keyed by e-mail, used by tests in place of the REST backend.
#[derive(Default)]
pub struct MockAuthService {
    accounts: Mutex<HashMap<String, (String, User)>>,
    /// When true, every call fails as if the backend were unreachable.
    pub offline: bool,
    logout_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl MockAuthService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    /// Registers an account the mock will accept.
    pub fn with_account(self, email: &str, password: &str, user: User) -> Self {
        self.accounts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(email.to_string(), (password.to_string(), user));
        self
    }

    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), ApiError> {
        if self.offline {
            return Err(ApiError::network("Mock backend is offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthService for MockAuthService {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError> {
        self.check_online()?;
        let accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
        match accounts.get(&credentials.email) {
            Some((password, user)) if *password == credentials.password => Ok(LoginResponse {
                token: format!("mock-token-{}", user.id),
                user: user.clone(),
            }),
            _ => Err(ApiError::auth("Invalid username or password")),
        }
    }

    async fn logout(&self, _token: Option<&str>) -> Result<(), ApiError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()
    }

    async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        self.check_online()?;
        let email = request.login_identifier().to_string();
        let mut accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
        if accounts.contains_key(&email) {
            return Err(ApiError::validation("Email already registered"));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1000;
        let user = User {
            id: id.to_string(),
            username: request.username.clone(),
            email: Some(email.clone()),
            role: request.role.clone(),
            full_name: request.full_name.clone(),
            balance: Some(0.0),
            is_active: Some(true),
        };
        accounts.insert(email, (request.password.clone(), user.clone()));
        Ok(user)
    }
}
