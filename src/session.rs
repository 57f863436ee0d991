use std::sync::Arc;
use tokio::sync::watch;

use crate::{
    auth_api::AuthServiceState,
    error::ApiError,
    models::{LoginCredentials, LoginResponse, RegisterRequest, SessionStatus, User},
    storage::{StorageError, StorageState, TOKEN_KEY, USER_KEY},
};

/// SessionState
///
/// One immutable snapshot of the session. `current_user` and `is_loading` are always
/// published together, so no reader ever sees half of an update. Authentication is
/// derived from the user and cannot be set on its own.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    current_user: Option<User>,
    is_loading: bool,
}

impl SessionState {
    /// The state every session starts in.
    pub fn loading() -> Self {
        Self {
            current_user: None,
            is_loading: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            current_user: None,
            is_loading: false,
        }
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            current_user: Some(user),
            is_loading: false,
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }
}

impl From<SessionState> for SessionStatus {
    fn from(state: SessionState) -> Self {
        SessionStatus {
            is_loading: state.is_loading,
            is_authenticated: state.is_authenticated(),
            current_user: state.current_user,
        }
    }
}

/// Session
///
/// The single source of truth for who is logged in. Owned by the application state and
/// handed to handlers and guards through `SessionHandle`; it is the only writer of its
/// own state and of the `token`/`user` storage keys.
pub struct Session {
    state: watch::Sender<SessionState>,
    storage: StorageState,
    auth: AuthServiceState,
}

/// SessionHandle
///
/// The shared handle injected into the application state.
pub type SessionHandle = Arc<Session>;

impl Session {
    pub fn new(storage: StorageState, auth: AuthServiceState) -> Self {
        let (state, _) = watch::channel(SessionState::loading());
        Self {
            state,
            storage,
            auth,
        }
    }

    /// initialize
    ///
    /// Restores a persisted session, if any, and ends the loading phase. Trusts the stored
    /// user record as-is: the token is not re-validated and no network call is made.
    /// Never fails; a missing or corrupt record simply means nobody is logged in.
    pub fn initialize(&self) {
        let restored = self.restore();

        match &restored {
            Some(user) => tracing::info!(
                user_id = %user.id,
                role = %user.role,
                "Restored persisted session"
            ),
            None => tracing::debug!("No persisted session to restore"),
        }

        self.state.send_replace(SessionState {
            current_user: restored,
            is_loading: false,
        });
    }

    fn restore(&self) -> Option<User> {
        self.storage.get(TOKEN_KEY).filter(|token| !token.is_empty())?;
        let raw = self.storage.get(USER_KEY)?;

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unparseable persisted user record");
                None
            }
        }
    }

    /// login
    ///
    /// Delegates to the authentication collaborator and, on success, writes the token and
    /// user record through to storage before publishing the user. Collaborator errors are
    /// returned untouched; there is no retry. A storage failure leaves the previous
    /// session in place.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, ApiError> {
        let LoginResponse { token, user } = self.auth.login(credentials).await?;

        self.persist(&token, &user)?;
        self.state.send_replace(SessionState::signed_in(user.clone()));

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(user)
    }

    /// Writes both keys or neither. On a failed write the previous entries are put back,
    /// so storage keeps matching the published state. If even that fails, the session is
    /// cleared in both places.
    fn persist(&self, token: &str, user: &User) -> Result<(), ApiError> {
        let record = serde_json::to_string(user)
            .map_err(|e| ApiError::unknown(format!("Failed to serialize user record: {}", e)))?;

        let previous = [
            (TOKEN_KEY, self.storage.get(TOKEN_KEY)),
            (USER_KEY, self.storage.get(USER_KEY)),
        ];

        let written = self
            .storage
            .set(TOKEN_KEY, token)
            .and_then(|_| self.storage.set(USER_KEY, &record));

        if let Err(e) = written {
            tracing::error!(error = %e, "Failed to persist session");

            if let Err(rollback) = self.write_entries(&previous) {
                tracing::error!(error = %rollback, "Failed to restore previous session entries; signing out");
                self.clear_entries();
                self.state.send_replace(SessionState::anonymous());
            }
            return Err(ApiError::unknown(format!("Failed to persist session: {}", e)));
        }
        Ok(())
    }

    fn write_entries(&self, entries: &[(&str, Option<String>)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            if self.storage.get(key) == *value {
                continue;
            }
            match value {
                Some(value) => self.storage.set(key, value)?,
                None => self.storage.remove(key)?,
            }
        }
        Ok(())
    }

    fn clear_entries(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::error!(key, error = %e, "Failed to clear persisted session key");
            }
        }
    }

    /// logout
    ///
    /// Clears storage and memory first, then tells the backend. A failing backend call is
    /// logged and otherwise ignored.
    pub async fn logout(&self) {
        let token = self.storage.get(TOKEN_KEY);

        self.clear_entries();
        let previous = self.state.send_replace(SessionState {
            current_user: None,
            is_loading: false,
        });

        if let Some(user) = previous.current_user {
            tracing::info!(user_id = %user.id, "User logged out");
        }

        if let Err(e) = self.auth.logout(token.as_deref()).await {
            tracing::warn!(error = %e, "Backend logout failed; local session already cleared");
        }
    }

    /// register
    ///
    /// Creates the account, then logs in with it exactly like `login` would.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        let created = self.auth.register(request).await?;
        tracing::info!(user_id = %created.id, role = %created.role, "Account registered");

        let credentials = LoginCredentials {
            email: created
                .email
                .clone()
                .unwrap_or_else(|| request.login_identifier().to_string()),
            password: request.password.clone(),
        };
        self.login(&credentials).await
    }

    // --- Read accessors ---

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().current_user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// A consistent copy of the whole state, for decisions that read more than one field.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.snapshot().into()
    }

    /// Receives every published state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Resolves once initialization has finished.
    pub async fn ready(&self) {
        let mut updates = self.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = updates.wait_for(|state| !state.is_loading).await;
    }
}
