//! Page handlers.
//!
//! Every screen follows the same shape: load the slices it needs into the
//! visitor's store, render from the store, and answer form posts with
//! POST/redirect/GET plus a toast. [`Visit`] carries the per-request pieces
//! (state, session, backend view) and the helpers for that pattern.

mod auth;
mod dashboard;
mod profile;
mod public;

use axum::{
    Router,
    extract::{FromRequestParts, Multipart},
    http::request::Parts,
    middleware,
    response::{Html, Redirect},
    routing::{get, post},
};

use crate::AppState;
use crate::api::{ApiError, Backend};
use crate::error::{AppError, AppResult};
use crate::forms::FormPayload;
use crate::security;
use crate::session::Session;
use crate::ui::{Chrome, layout};

/// All page routes. Dashboard routes sit behind the role guards.
pub fn router() -> Router<AppState> {
    let public = Router::new()
        .route("/", get(public::home))
        .route("/about", get(public::about))
        .route("/services", get(public::services))
        .route("/products", get(public::products))
        .route("/products/{slug}", get(public::product_detail))
        .route("/portfolio", get(public::portfolio))
        .route("/portfolio/{slug}", get(public::portfolio_detail))
        .route("/getquote", get(public::quote_form).post(public::submit_quote))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/register", get(auth::register_form).post(auth::register));

    let members = Router::new()
        .route("/products/{slug}/reviews", post(public::submit_review))
        .route(
            "/portfolio/{slug}/quote",
            get(public::custom_quote_form).post(public::submit_custom_quote),
        )
        .route("/profile", get(profile::show).post(profile::update))
        .route("/profile/addresses", post(profile::add_address))
        .route("/profile/addresses/{id}", post(profile::update_address))
        .route("/profile/addresses/{id}/delete", post(profile::delete_address))
        .route("/bookings", post(profile::create_booking))
        .route_layer(middleware::from_fn(security::require_login));

    public
        .merge(members)
        .nest("/dashboard", dashboard::router())
}

/// Per-request handler context.
#[derive(Debug)]
pub struct Visit {
    pub state: AppState,
    pub session: Session,
    token: Option<String>,
}

impl FromRequestParts<AppState> for Visit {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        let token = session.access_token();
        Ok(Self {
            state: state.clone(),
            session,
            token,
        })
    }
}

impl Visit {
    /// Backend view carrying the visitor's token, if signed in.
    pub fn backend(&self) -> Backend<'_> {
        self.state.backend.for_token(self.token.as_deref())
    }

    /// Absolute URL for a backend media path.
    pub fn media(&self, path: Option<&str>) -> Option<String> {
        self.state.backend.media_url(path)
    }

    /// Shell data; drains pending toasts.
    pub fn chrome(&self) -> Chrome<'_> {
        Chrome {
            site: &self.state.config.site,
            user: self.session.user(),
            toasts: self.session.take_toasts(),
        }
    }

    pub fn public(&self, title: &str, body: &str) -> Html<String> {
        Html(layout::public_page(&self.chrome(), title, body))
    }

    pub fn dashboard(&self, title: &str, active: &str, body: &str) -> Html<String> {
        Html(layout::dashboard_page(&self.chrome(), title, active, body))
    }

    /// Turns a write result into a toast. An expired token escalates to the
    /// login redirect; any other failure shows the backend's message.
    pub fn flash<T>(&self, result: Result<T, ApiError>, success: &str) -> AppResult<Option<T>> {
        match result {
            Ok(value) => {
                self.session.success(success);
                Ok(Some(value))
            }
            Err(err) if err.is_unauthorized() => Err(err.into()),
            Err(err) => {
                self.session.error(err.user_message());
                Ok(None)
            }
        }
    }
}

/// Collapses the reads of one page. Failures already sit in their slices
/// for inline rendering; only an expired token fails the page.
pub fn settle<I>(results: I) -> AppResult<()>
where
    I: IntoIterator<Item = Result<(), ApiError>>,
{
    for result in results {
        if let Err(err) = result {
            if err.is_unauthorized() {
                return Err(err.into());
            }
        }
    }
    Ok(())
}

/// Value or default for reads rendered without a slice; logs the failure.
pub fn degrade<T: Default>(result: Result<T, ApiError>) -> AppResult<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if err.is_unauthorized() => Err(err.into()),
        Err(err) => {
            tracing::warn!(name: "page.read_failed", error = %err, "Rendering without data");
            Ok(T::default())
        }
    }
}

pub fn see_other(to: &str) -> Redirect {
    Redirect::to(to)
}

/// Reads a multipart submission.
pub async fn read_form(multipart: Multipart) -> AppResult<FormPayload> {
    FormPayload::from_multipart(multipart)
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form submission: {e}")))
}

/// Lenient numeric query value: blank or malformed reads as `None`.
pub fn number<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.map(str::trim).filter(|s| !s.is_empty())?.parse().ok()
}

/// Non-blank query/form text.
pub fn text(raw: Option<&String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Same-site redirect target; anything else falls back to `default`.
pub fn local_path<'a>(raw: Option<&'a str>, default: &'a str) -> &'a str {
    match raw {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => path,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_targets_stay_on_site() {
        assert_eq!(local_path(Some("/portfolio/a/quote"), "/"), "/portfolio/a/quote");
        assert_eq!(local_path(Some("//evil.example"), "/"), "/");
        assert_eq!(local_path(Some("https://evil.example"), "/dashboard"), "/dashboard");
        assert_eq!(local_path(None, "/portfolio"), "/portfolio");
    }

    #[test]
    fn settle_escalates_only_expired_tokens() {
        let failed = Err(ApiError::Api {
            status: 500,
            message: "boom".into(),
        });
        assert!(settle([Ok(()), failed]).is_ok());
        let expired = Err(ApiError::Unauthorized("expired".into()));
        assert!(matches!(
            settle([Ok(()), expired]),
            Err(AppError::Api(ApiError::Unauthorized(_)))
        ));
    }

    #[test]
    fn numbers_are_lenient() {
        assert_eq!(number::<u32>(Some("")), None);
        assert_eq!(number::<u32>(Some(" 3 ")), Some(3));
        assert_eq!(number::<u32>(Some("x")), None);
    }
}
