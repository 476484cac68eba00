//! Login, registration and logout.

use std::collections::HashMap;

use axum::extract::{Form, Query};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use super::{Visit, local_path, see_other};
use crate::domain::{AuthResponse, LoginPayload, RegisterPayload, Role};
use crate::session::AuthSession;
use crate::ui::components::input::{self, Input};
use crate::ui::components::{card, page_header};
use crate::ui::{escape, query_value};

/// Back-office roles land on the dashboard, customers on the portfolio.
fn home_for(role: Role) -> &'static str {
    if role.is_back_office() {
        "/dashboard"
    } else {
        "/portfolio"
    }
}

/// Explicit `redirect` target when it stays on site, else the role's home.
fn after_login(redirect: Option<&str>, role: Role) -> String {
    local_path(redirect.filter(|r| !r.is_empty()), home_for(role)).to_string()
}

fn redirect_field(redirect: &str) -> String {
    if redirect.is_empty() {
        String::new()
    } else {
        format!(r#"<input type="hidden" name="redirect" value="{}">"#, escape(redirect))
    }
}

fn sign_in(visit: &Visit, response: AuthResponse) -> Role {
    let role = response.user.role;
    tracing::info!(
        name: "auth.signed_in",
        session_id = %visit.session.id(),
        username = %response.user.username,
        role = %role,
        "Visitor signed in"
    );
    visit.session.sign_in(AuthSession {
        user: response.user,
        access: response.tokens.access,
        refresh: response.tokens.refresh,
    });
    role
}

/// GET /login
pub async fn login_form(visit: Visit, Query(query): Query<HashMap<String, String>>) -> Response {
    let redirect = query.get("redirect").map(String::as_str).unwrap_or_default();
    if let Some(role) = visit.session.role() {
        return Redirect::to(&after_login(Some(redirect), role)).into_response();
    }
    let notice = if query.get("sessionExpired").is_some_and(|v| v == "true") {
        r#"<div class="alert alert-info" role="status">Your session has expired. Please log in again.</div>"#
    } else {
        ""
    };

    let fields = [
        redirect_field(redirect),
        Input::text("username", "Username", "").required().render(),
        Input::text("password", "Password", "").kind("password").required().render(),
    ];
    let register_href = if redirect.is_empty() {
        "/register".to_string()
    } else {
        format!("/register?redirect={}", query_value(redirect))
    };
    let body = format!(
        r#"<div class="auth-page">{header}{notice}{form}<p class="muted">New here? <a href="{register}">Create an account</a></p></div>"#,
        header = page_header("Welcome Back", "Sign in to continue", ""),
        form = card(None, &input::form("/login", false, &fields, "Sign In")),
        register = escape(&register_href),
    );
    visit.public("Login", &body).into_response()
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    redirect: Option<String>,
}

/// POST /login
pub async fn login(visit: Visit, Form(form): Form<LoginForm>) -> Redirect {
    let redirect = form.redirect.as_deref().unwrap_or_default();
    let retry = if redirect.is_empty() {
        "/login".to_string()
    } else {
        format!("/login?redirect={}", query_value(redirect))
    };
    let payload = LoginPayload {
        username: form.username.trim().to_string(),
        password: form.password,
    };
    if payload.username.is_empty() || payload.password.is_empty() {
        visit.session.error("Username and password are required");
        return see_other(&retry);
    }

    // A 401 here means bad credentials, not an expired session.
    match visit.state.backend.anonymous().accounts().login(&payload).await {
        Ok(response) => {
            let role = sign_in(&visit, response);
            visit.session.success("Login successful");
            see_other(&after_login(Some(redirect), role))
        }
        Err(err) => {
            tracing::info!(name: "auth.login_failed", username = %payload.username, error = %err, "Login rejected");
            visit.session.error(err.user_message());
            see_other(&retry)
        }
    }
}

/// POST /logout
pub async fn logout(visit: Visit) -> Redirect {
    if visit.session.is_authenticated() {
        tracing::info!(name: "auth.signed_out", session_id = %visit.session.id(), "Visitor signed out");
        visit.session.sign_out();
        visit.session.info("You have been logged out");
    }
    see_other("/")
}

/// GET /register
pub async fn register_form(visit: Visit, Query(query): Query<HashMap<String, String>>) -> Response {
    let redirect = query.get("redirect").map(String::as_str).unwrap_or_default();
    if let Some(role) = visit.session.role() {
        return Redirect::to(&after_login(Some(redirect), role)).into_response();
    }
    let fields = [
        redirect_field(redirect),
        Input::text("first_name", "First name", "").render(),
        Input::text("last_name", "Last name", "").render(),
        Input::text("username", "Username", "").required().render(),
        Input::text("email", "Email", "").kind("email").required().render(),
        Input::text("phone_number", "Phone", "").kind("tel").render(),
        Input::text("password", "Password", "").kind("password").required().render(),
        Input::text("password2", "Confirm password", "").kind("password").required().render(),
    ];
    let body = format!(
        r#"<div class="auth-page">{}{}<p class="muted">Already registered? <a href="/login">Sign in</a></p></div>"#,
        page_header("Create Account", "Fill in your details below", ""),
        card(None, &input::form("/register", false, &fields, "Create Account")),
    );
    visit.public("Register", &body).into_response()
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(flatten)]
    account: RegisterPayload,
    #[serde(default)]
    redirect: Option<String>,
}

/// POST /register - Creates the account and signs the visitor in.
pub async fn register(visit: Visit, Form(form): Form<RegisterForm>) -> Redirect {
    let RegisterForm { account, redirect } = form;
    if account.password != account.password2 {
        visit.session.error("Passwords do not match");
        return see_other("/register");
    }
    match visit.state.backend.anonymous().accounts().register(&account).await {
        Ok(response) => {
            let role = sign_in(&visit, response);
            visit.session.success("Account created");
            see_other(&after_login(redirect.as_deref(), role))
        }
        Err(err) => {
            visit.session.error(err.user_message());
            see_other("/register")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_after_login() {
        assert_eq!(after_login(None, Role::Admin), "/dashboard");
        assert_eq!(after_login(Some(""), Role::Staff), "/dashboard");
        assert_eq!(after_login(None, Role::User), "/portfolio");
        assert_eq!(
            after_login(Some("/portfolio/gate/quote"), Role::User),
            "/portfolio/gate/quote"
        );
        assert_eq!(after_login(Some("https://evil.example"), Role::User), "/portfolio");
    }

    #[tokio::test]
    async fn register_form_decodes_flattened() {
        use axum::extract::FromRequest;

        let request = axum::http::Request::builder()
            .method("POST")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(axum::body::Body::from(
                "username=sita&email=s%40example.com&password=pw&password2=pw&redirect=%2Fprofile",
            ))
            .unwrap();
        let Form(form) = Form::<RegisterForm>::from_request(request, &()).await.unwrap();
        assert_eq!(form.account.username, "sita");
        assert!(form.account.first_name.is_empty());
        assert_eq!(form.redirect.as_deref(), Some("/profile"));
    }
}
