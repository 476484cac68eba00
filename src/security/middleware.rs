use crate::AppState;
use crate::error::{AppError, SessionExpired};
use crate::session::{Session, session_cookie, session_id};
use crate::ui::query_value;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{Method, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

/// Attaches the visitor's [`Session`] to the request. A new visitor's
/// session is stored, and its cookie issued, only once it holds a sign-in or
/// a pending toast. A response flagged [`SessionExpired`] signs the session out.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_name = &state.config.session.cookie_name;
    let (session, created) = state
        .sessions
        .get_or_create(session_id(&jar, cookie_name).as_deref());
    request.extensions_mut().insert(session.clone());

    let response = next.run(request).await;

    if response.extensions().get::<SessionExpired>().is_some() && session.is_authenticated() {
        tracing::info!(name: "session.auth_expired", session_id = %session.id(), "Backend rejected token; signing out");
        session.sign_out();
    }

    if created && session.needs_persisting() {
        state.sessions.insert(&session);
        (jar.add(session_cookie(cookie_name, session.id())), response).into_response()
    } else {
        response
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("session middleware is not installed")))
    }
}

/// Dashboard guard: anonymous visitors go to `/login`, customers get 403.
pub async fn require_back_office(session: Session, request: Request, next: Next) -> Response {
    match session.role() {
        None => Redirect::to("/login").into_response(),
        Some(role) if role.is_back_office() => next.run(request).await,
        Some(_) => AppError::Forbidden.into_response(),
    }
}

/// Admin-only pages.
pub async fn require_admin(session: Session, request: Request, next: Next) -> Response {
    match session.role() {
        None => Redirect::to("/login").into_response(),
        Some(crate::domain::Role::Admin) => next.run(request).await,
        Some(_) => AppError::Forbidden.into_response(),
    }
}

/// Pages that only need a signed-in visitor. The login page sends them back
/// afterwards through `?redirect=`.
pub async fn require_login(session: Session, request: Request, next: Next) -> Response {
    if session.is_authenticated() {
        return next.run(request).await;
    }
    session.info("Please log in to continue");
    let back = if request.method() == Method::GET {
        request.uri().path().to_string()
    } else {
        login_return_path(request.uri().path())
    };
    Redirect::to(&format!("/login?redirect={}", query_value(&back))).into_response()
}

/// Form posts return to the page the form lives on.
fn login_return_path(post_path: &str) -> String {
    if let Some(product) = post_path
        .strip_prefix("/products/")
        .and_then(|rest| rest.strip_suffix("/reviews"))
    {
        return format!("/products/{product}");
    }
    if post_path.starts_with("/profile") || post_path == "/bookings" {
        return "/profile".to_string();
    }
    post_path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posts_return_to_their_page() {
        assert_eq!(login_return_path("/products/gate/reviews"), "/products/gate");
        assert_eq!(login_return_path("/profile/addresses/3/delete"), "/profile");
        assert_eq!(login_return_path("/bookings"), "/profile");
        assert_eq!(login_return_path("/portfolio/gate/quote"), "/portfolio/gate/quote");
    }
}
