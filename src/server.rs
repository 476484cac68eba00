use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    http::StatusCode,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
};
use std::sync::Arc;
use std::time::Duration;

use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::security::{rate_limit_middleware, session_middleware};
use crate::sitemap;

/// Product images and quotation attachments ride in multipart bodies.
const BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Full application router with every layer applied.
pub fn build_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    let pages = crate::routes::router()
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware));

    // Timeouts can be turned off for debugging; a year-long deadline keeps
    // the layer stack the same type either way.
    let timeout_duration = if config.resilience.timeout_disabled {
        Duration::from_secs(365 * 24 * 60 * 60)
    } else {
        Duration::from_secs(config.resilience.timeout_secs)
    };

    Router::new()
        .route("/healthz", get(healthz))
        .route("/sitemap.xml", get(sitemap::sitemap_xml))
        .nest_service("/static", ServeDir::new(&config.server.static_dir))
        .merge(pages)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(middleware::from_fn(
            move |req: Request, next: Next| {
                let duration = timeout_duration;
                async move {
                    match tokio::time::timeout(duration, next.run(req)).await {
                        Ok(res) => res,
                        Err(_) => {
                            tracing::warn!(name: "http.timeout", seconds = duration.as_secs(), "Request timed out");
                            (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response()
                        }
                    }
                }
            },
        ))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn not_found() -> AppError {
    AppError::NotFound("The page you are looking for does not exist.".into())
}

/// Drops idle sessions on a fixed interval.
fn spawn_session_purge(state: &AppState) {
    let sessions = state.sessions.clone();
    let ttl = state.config.session.ttl();
    let every = Duration::from_secs(state.config.session.purge_interval_secs.max(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            sessions.purge_expired(ttl);
        }
    });
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let state = AppState::new(Arc::clone(&config))?;

    info!(
        name: "backend.config.loaded",
        api_base_url = %state.backend.api_base(),
        timeout_secs = config.backend.request_timeout_secs,
        "Backend client ready"
    );

    spawn_session_purge(&state);
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!(name: "server.stopped", "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(name: "server.signal_failed", error = %err, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request as HttpRequest, header};
    use tower::ServiceExt;

    fn app() -> Router {
        let config = AppConfig::load_from_args(["metalworks-web"]).unwrap();
        build_router(AppState::new(Arc::new(config)).unwrap())
    }

    fn get(uri: &str) -> HttpRequest<Body> {
        HttpRequest::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn healthz_answers_ok() {
        let response = app().oneshot(get("/healthz")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn anonymous_dashboard_visit_redirects_without_session() {
        let response = app().oneshot(get("/dashboard")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn pending_toast_issues_session_cookie() {
        let response = app().oneshot(get("/profile")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("/login?redirect="));
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("mw_session="));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn public_pages_do_not_store_sessions() {
        let config = AppConfig::load_from_args(["metalworks-web"]).unwrap();
        let state = AppState::new(Arc::new(config)).unwrap();
        let sessions = state.sessions.clone();
        let response = build_router(state).oneshot(get("/login")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn static_assets_are_served() {
        let response = app().oneshot(get("/static/app.css")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_paths_render_not_found() {
        let response = app().oneshot(get("/definitely/not/here")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("Not Found"));
    }
}
