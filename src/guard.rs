use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderName, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::{
    landing::{LOGIN, landing_route},
    models::{Role, ViewPage},
    session::{SessionHandle, SessionState},
};

/// Tells the client to replace the current history entry instead of pushing a new one.
pub const HISTORY_HEADER: &str = "x-history";
/// Query parameter carrying the return-state through the login view.
pub const RETURN_PARAM: &str = "from";
pub const LOADING_MESSAGE: &str = "Checking access permissions...";

// Base for resolving local targets so `Url` can do the query encoding; never emitted.
const LOCAL_ORIGIN: &str = "http://gate.local";

/// AllowedRoles
///
/// The roles a guarded view admits. `AnyAuthenticated` is the "any signed-in user"
/// sentinel and admits roles the resolver does not know about as well.
#[derive(Debug, Clone, PartialEq)]
pub enum AllowedRoles {
    AnyAuthenticated,
    Only(Vec<Role>),
}

impl AllowedRoles {
    pub fn only(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::Only(roles.into_iter().collect())
    }

    pub fn admits(&self, role: &Role) -> bool {
        match self {
            Self::AnyAuthenticated => true,
            Self::Only(roles) => roles.contains(role),
        }
    }
}

/// Where a public view sends a visitor who is already signed in.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthenticatedRedirect {
    /// The visitor's own landing route.
    Dashboard,
    To(String),
}

/// PublicOptions
///
/// The two independent toggles of a public view. When both apply,
/// `redirect_if_authenticated` wins.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PublicOptions {
    pub redirect_if_authenticated: Option<AuthenticatedRedirect>,
    /// Keeps admins and owners out of guest-only views; guests and customers pass.
    pub block_admin_and_owner: bool,
}

/// Guard
///
/// Wraps a view and decides, per navigation, whether it renders. All variants share the
/// same procedure: loading first, then authentication, then role membership.
#[derive(Debug, Clone, PartialEq)]
pub enum Guard {
    AdminOnly,
    OwnerOnly,
    Protected {
        allowed: AllowedRoles,
        /// Target for visitors who are not signed in.
        redirect_to: String,
    },
    Public(PublicOptions),
}

impl Guard {
    pub fn protected(allowed: AllowedRoles) -> Self {
        Self::Protected {
            allowed,
            redirect_to: LOGIN.to_string(),
        }
    }

    /// Any signed-in role.
    pub fn authenticated() -> Self {
        Self::protected(AllowedRoles::AnyAuthenticated)
    }

    /// Open to everyone, signed in or not.
    pub fn public() -> Self {
        Self::Public(PublicOptions::default())
    }

    /// Login/registration style views: signed-in visitors go to their dashboard.
    pub fn entry_page() -> Self {
        Self::Public(PublicOptions {
            redirect_if_authenticated: Some(AuthenticatedRedirect::Dashboard),
            block_admin_and_owner: false,
        })
    }

    /// The default guest view: admins and owners are sent to their dashboards.
    pub fn guest_landing() -> Self {
        Self::Public(PublicOptions {
            redirect_if_authenticated: None,
            block_admin_and_owner: true,
        })
    }

    /// Overrides where unauthenticated visitors of a `Protected` guard are sent.
    /// Other variants are returned unchanged.
    pub fn redirect_unauthenticated_to(self, target: impl Into<String>) -> Self {
        match self {
            Self::Protected { allowed, .. } => Self::Protected {
                allowed,
                redirect_to: target.into(),
            },
            other => other,
        }
    }

    /// decide
    ///
    /// The guard decision for one navigation attempt to `requested`. Total: every session
    /// state yields exactly one outcome and nothing here can fail.
    pub fn decide(&self, state: &SessionState, requested: &str) -> GuardOutcome {
        // Never decide on a session that has not been restored yet.
        if state.is_loading() {
            return GuardOutcome::Loading;
        }

        match self {
            Self::AdminOnly => {
                decide_protected(state, requested, &AllowedRoles::only([Role::Admin]), LOGIN)
            }
            Self::OwnerOnly => decide_protected(
                state,
                requested,
                &AllowedRoles::only([Role::HostelOwner]),
                LOGIN,
            ),
            Self::Protected {
                allowed,
                redirect_to,
            } => decide_protected(state, requested, allowed, redirect_to),
            Self::Public(options) => decide_public(state, options),
        }
    }
}

fn decide_protected(
    state: &SessionState,
    requested: &str,
    allowed: &AllowedRoles,
    redirect_to: &str,
) -> GuardOutcome {
    let Some(user) = state.current_user() else {
        return GuardOutcome::Redirect(Redirect::with_return_state(redirect_to, requested));
    };

    if allowed.admits(&user.role) {
        GuardOutcome::Render
    } else {
        GuardOutcome::Redirect(Redirect::replace(landing_route(&user.role)))
    }
}

fn decide_public(state: &SessionState, options: &PublicOptions) -> GuardOutcome {
    let Some(user) = state.current_user() else {
        return GuardOutcome::Render;
    };

    if let Some(target) = &options.redirect_if_authenticated {
        let to = match target {
            AuthenticatedRedirect::Dashboard => landing_route(&user.role),
            AuthenticatedRedirect::To(path) => path.as_str(),
        };
        return GuardOutcome::Redirect(Redirect::replace(to));
    }

    if options.block_admin_and_owner && matches!(user.role, Role::Admin | Role::HostelOwner) {
        return GuardOutcome::Redirect(Redirect::replace(landing_route(&user.role)));
    }

    GuardOutcome::Render
}

/// GuardOutcome
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    /// The session is still being restored: show the placeholder, decide nothing.
    Loading,
    Render,
    Redirect(Redirect),
}

/// Redirect
///
/// A navigation the client must perform instead of rendering the requested view.
#[derive(Debug, Clone, PartialEq)]
pub struct Redirect {
    pub to: String,
    /// The originally requested location, only set for unauthenticated redirects.
    pub return_to: Option<String>,
    /// Replace the history entry (no back-button trap).
    pub replace: bool,
}

impl Redirect {
    pub fn replace(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            return_to: None,
            replace: true,
        }
    }

    pub fn with_return_state(to: impl Into<String>, return_to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            return_to: Some(return_to.into()),
            replace: true,
        }
    }

    /// The `Location` value: the target plus the encoded return-state, if any. Local
    /// targets stay relative; an absolute target (an external login page) keeps its
    /// scheme and host.
    pub fn location(&self) -> String {
        let Some(return_to) = &self.return_to else {
            return self.to.clone();
        };

        let (mut url, local) = match reqwest::Url::parse(&self.to) {
            Ok(url) => (url, false),
            Err(_) => {
                let Ok(url) =
                    reqwest::Url::parse(LOCAL_ORIGIN).and_then(|base| base.join(&self.to))
                else {
                    return self.to.clone();
                };
                (url, true)
            }
        };
        url.query_pairs_mut().append_pair(RETURN_PARAM, return_to);

        if !local {
            return url.to_string();
        }
        match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        }
    }
}

impl IntoResponse for Redirect {
    fn into_response(self) -> Response {
        let location = self.location();
        let mut response = axum::response::Redirect::to(&location).into_response();
        if self.replace {
            response.headers_mut().insert(
                HeaderName::from_static(HISTORY_HEADER),
                HeaderValue::from_static("replace"),
            );
        }
        response
    }
}

/// The placeholder served while the session is loading. Never cached.
pub fn loading_placeholder(requested: &str) -> Response {
    let page = ViewPage {
        view: "loading".to_string(),
        path: requested.to_string(),
        message: Some(LOADING_MESSAGE.to_string()),
        user: None,
    };
    (
        StatusCode::OK,
        [(header::CACHE_CONTROL, "no-store")],
        Json(page),
    )
        .into_response()
}

// --- Router integration ---

/// GuardGate
///
/// Middleware state for one guarded route group: the shared session plus the guard
/// configured for that group.
#[derive(Clone)]
pub struct GuardGate {
    session: SessionHandle,
    guard: Arc<Guard>,
}

impl GuardGate {
    pub fn new(session: SessionHandle, guard: Guard) -> Self {
        Self {
            session,
            guard: Arc::new(guard),
        }
    }
}

/// enforce
///
/// Route-layer middleware applying a `GuardGate`. The session is read once, as a single
/// snapshot, before the decision is made.
pub async fn enforce(State(gate): State<GuardGate>, request: Request, next: Next) -> Response {
    let requested = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let state = gate.session.snapshot();

    match gate.guard.decide(&state, &requested) {
        GuardOutcome::Render => next.run(request).await,
        GuardOutcome::Loading => {
            tracing::debug!(path = %requested, "Session loading; serving placeholder");
            loading_placeholder(&requested)
        }
        GuardOutcome::Redirect(redirect) => {
            tracing::debug!(
                path = %requested,
                to = %redirect.to,
                authenticated = state.is_authenticated(),
                "Guard redirected navigation"
            );
            redirect.into_response()
        }
    }
}
