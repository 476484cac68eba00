//! Handler-level errors and their HTML rendering.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use thiserror::Error;

use crate::api::ApiError;
use crate::ui::{escape, layout};

/// Where an expired backend session sends the visitor.
pub const SESSION_EXPIRED_REDIRECT: &str = "/login?sessionExpired=true";

/// Response marker for the session middleware: the backend rejected the
/// visitor's token, so their auth must be cleared.
#[derive(Debug, Clone, Copy)]
pub struct SessionExpired;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Access Denied")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Api(ApiError::Unauthorized(_)) => StatusCode::SEE_OTHER,
            Self::Api(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            Self::Api(ApiError::Api { status, .. }) if *status < 500 => StatusCode::BAD_REQUEST,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn title(&self) -> &'static str {
        match self.status() {
            StatusCode::FORBIDDEN => "Access Denied",
            StatusCode::NOT_FOUND => "Not Found",
            StatusCode::BAD_REQUEST => "Bad Request",
            _ => "Something went wrong",
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            Self::Forbidden => "You do not have permission to view this page.".into(),
            Self::NotFound(message) | Self::BadRequest(message) => message.clone(),
            Self::Internal(_) => "An unexpected error occurred. Please try again.".into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Api(ApiError::Unauthorized(_)) = &self {
            let mut response = Redirect::to(SESSION_EXPIRED_REDIRECT).into_response();
            response.extensions_mut().insert(SessionExpired);
            return response;
        }

        let status = self.status();
        if status.is_server_error() {
            tracing::error!(name: "handler.error", error = %self, "Request failed");
        } else {
            tracing::debug!(name: "handler.rejected", status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = format!(
            r#"<section class="error-page">
    <p class="error-code">{code}</p>
    <h1>{title}</h1>
    <p>{detail}</p>
    <a class="btn btn-primary" href="/">Go to home page</a>
</section>"#,
            code = status.as_u16(),
            title = self.title(),
            detail = escape(&self.detail()),
        );
        (status, Html(layout::bare(self.title(), &body))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_redirects_with_marker() {
        let response = AppError::Api(ApiError::Unauthorized("expired".into())).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()["location"],
            "/login?sessionExpired=true"
        );
        assert!(response.extensions().get::<SessionExpired>().is_some());
    }

    #[test]
    fn statuses() {
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        let missing = AppError::Api(ApiError::Api {
            status: 404,
            message: "Not found.".into(),
        });
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        let down = AppError::Api(ApiError::Api {
            status: 503,
            message: "down".into(),
        });
        assert_eq!(down.status(), StatusCode::BAD_GATEWAY);
    }
}
