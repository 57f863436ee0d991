use crate::{
    AppState,
    auth::{AuthUser, CurrentSession},
    error::{ApiError, ErrorBody},
    landing::post_login_redirect,
    models::{
        LoginCredentials, LoginOutcome, RegisterRequest, ReturnState, SessionStatus, User,
        ViewPage,
    },
    session::SessionHandle,
};
use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, Uri},
    routing::{MethodRouter, get},
};

// --- Views ---

/// view
///
/// A GET route rendering the descriptor of the named view. Guards are applied by the
/// router around groups of these; the view itself only reports what it is and who is
/// looking at it.
pub fn view(name: &'static str) -> MethodRouter<AppState> {
    get(move |CurrentSession(state): CurrentSession, uri: Uri| async move {
        Json(ViewPage {
            view: name.to_string(),
            path: uri.path().to_string(),
            message: None,
            user: state.current_user().cloned(),
        })
    })
}

// --- Session Endpoints ---

/// session_status
///
/// [Public Route] The session's read accessors as one snapshot. The client polls this
/// while `isLoading` is true.
#[utoipa::path(
    get,
    path = "/auth/session",
    responses((status = 200, description = "Current session", body = SessionStatus))
)]
pub async fn session_status(State(session): State<SessionHandle>) -> Json<SessionStatus> {
    Json(session.status())
}

/// login
///
/// [Public Route] Logs in through the backend and answers with the user and the next
/// navigation target: the `from` return-state when it is a safe local path, otherwise
/// the role's landing route.
#[utoipa::path(
    post,
    path = "/auth/login",
    params(ReturnState),
    request_body = LoginCredentials,
    responses(
        (status = 200, description = "Logged in", body = LoginOutcome),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 401, description = "Bad credentials", body = ErrorBody),
        (status = 502, description = "Backend unreachable", body = ErrorBody)
    )
)]
pub async fn login(
    State(session): State<SessionHandle>,
    Query(return_state): Query<ReturnState>,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Json<LoginOutcome>, ApiError> {
    credentials.validate()?;

    let user = session
        .login(&credentials)
        .await
        .inspect_err(|e| tracing::warn!(kind = e.kind(), error = %e, "Login failed"))?;

    let redirect_to = post_login_redirect(&user.role, return_state.from.as_deref());
    Ok(Json(LoginOutcome { user, redirect_to }))
}

/// register
///
/// [Public Route] Creates an account and logs straight into it.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered and logged in", body = LoginOutcome),
        (status = 400, description = "Rejected", body = ErrorBody),
        (status = 502, description = "Backend unreachable", body = ErrorBody)
    )
)]
pub async fn register(
    State(session): State<SessionHandle>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<LoginOutcome>, ApiError> {
    request.validate()?;

    let user = session
        .register(&request)
        .await
        .inspect_err(|e| tracing::warn!(kind = e.kind(), error = %e, "Registration failed"))?;

    let redirect_to = post_login_redirect(&user.role, None);
    Ok(Json(LoginOutcome { user, redirect_to }))
}

/// logout
///
/// [Authenticated Route] Ends the session. Always succeeds; calling it while signed out
/// is a no-op apart from the backend notification.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Logged out"))
)]
pub async fn logout(State(session): State<SessionHandle>) -> StatusCode {
    session.logout().await;
    StatusCode::NO_CONTENT
}

/// me
///
/// [Authenticated Route] The signed-in user's record.
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Profile", body = User),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}
