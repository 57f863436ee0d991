use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
};
use std::convert::Infallible;

use crate::{
    models::User,
    session::{SessionHandle, SessionState},
};

/// CurrentSession Extractor
///
/// A snapshot of the session taken when the handler runs. Never rejects: signed out and
/// still-loading sessions are valid states for a view to read.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionState);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
    SessionHandle: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionHandle::from_ref(state);
        Ok(CurrentSession(session.snapshot()))
    }
}

/// AuthUser Extractor
///
/// The signed-in user, for session endpoints that only make sense with one.
/// Views never use this: they sit behind a guard, which redirects instead of failing.
///
/// Rejection: `StatusCode::UNAUTHORIZED` when nobody is signed in (or the session is
/// still loading).
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    SessionHandle: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionHandle::from_ref(state);
        session
            .current_user()
            .map(AuthUser)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
