//! End-to-end flows against a fake REST backend on loopback.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use metalworks_web::{AppState, config::AppConfig, server};
use reqwest::redirect::Policy;
use serde_json::{Value, json};

#[derive(Debug, Default)]
struct Recorded {
    /// `(part name, file name)` of the last category upload.
    category_parts: Vec<(String, Option<String>)>,
    categories: Vec<Value>,
    quotations: Vec<Value>,
}

#[derive(Debug, Clone, Default)]
struct Fake {
    recorded: Arc<Mutex<Recorded>>,
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn expired() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Given token not valid for any token type", "code": "token_not_valid" })),
    )
        .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    let (role, access) = match username {
        "admin" => ("admin", "tok-admin"),
        "staff" => ("staff", "tok-staff"),
        "customer" => ("user", "tok-customer"),
        "stale" => ("admin", "expired"),
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "detail": "No active account found with the given credentials" })),
            )
                .into_response();
        }
    };
    Json(json!({
        "status": "success",
        "data": {
            "user": { "id": 1, "username": username, "email": format!("{username}@example.com"), "role": role },
            "tokens": { "access": access, "refresh": "refresh" }
        }
    }))
    .into_response()
}

async fn overview(State(fake): State<Fake>, headers: HeaderMap) -> Response {
    if bearer(&headers) == Some("expired") {
        return expired();
    }
    let recent = fake.recorded.lock().unwrap().quotations.clone();
    Json(json!({
        "status": "success",
        "data": {
            "stats": { "total_products": 12, "pending_quotations": 3 },
            "recent_quotations": recent
        }
    }))
    .into_response()
}

async fn list_quotations(State(fake): State<Fake>) -> Json<Value> {
    let quotations = fake.recorded.lock().unwrap().quotations.clone();
    Json(json!({ "status": "success", "data": quotations }))
}

fn quotation(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "project_title": title,
        "description": "Powder coated",
        "guest_name": "Ram",
        "status": "pending",
        "created_at": "2026-05-01T08:30:00Z"
    })
}

async fn list_categories(State(fake): State<Fake>, headers: HeaderMap) -> Response {
    if bearer(&headers) == Some("expired") {
        return expired();
    }
    let categories = fake.recorded.lock().unwrap().categories.clone();
    Json(json!({ "status": "success", "data": categories })).into_response()
}

async fn create_category(State(fake): State<Fake>, mut multipart: Multipart) -> Response {
    let mut parts = Vec::new();
    let mut name = String::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let part = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(ToString::to_string);
        let text = field.text().await.unwrap_or_default();
        if part == "name" {
            name = text;
        }
        parts.push((part, file_name));
    }
    let created = json!({ "id": 9, "name": name, "slug": name.to_lowercase() });
    let mut recorded = fake.recorded.lock().unwrap();
    recorded.category_parts = parts;
    recorded.categories.push(created.clone());
    (StatusCode::CREATED, Json(json!({ "status": "success", "data": created }))).into_response()
}

async fn products() -> Json<Value> {
    Json(json!({
        "count": 2,
        "results": [
            { "id": 1, "name": "Sliding Gate", "slug": "sliding-gate" },
            { "id": 2, "name": "Spiral Stair", "slug": "spiral-stair" }
        ]
    }))
}

fn fake_backend(fake: Fake) -> Router {
    Router::new()
        .route("/api/accounts/login/", post(login))
        .route("/api/products/overview/", get(overview))
        .route("/api/products/categories/", get(list_categories).post(create_category))
        .route("/api/products/quotations/", get(list_quotations))
        .route("/api/products/", get(products))
        .with_state(fake)
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn start_site(api_base_url: &str) -> String {
    let config = AppConfig::load_from_args([
        "metalworks-web",
        "--api-base-url",
        api_base_url,
        "--rate-limit-enabled",
        "false",
    ])
    .unwrap();
    let state = AppState::new(Arc::new(config)).unwrap();
    let addr = serve(server::build_router(state)).await;
    format!("http://{addr}")
}

/// Site backed by a fresh fake backend.
async fn setup() -> (String, Fake) {
    let fake = Fake::default();
    let backend = serve(fake_backend(fake.clone())).await;
    let site = start_site(&format!("http://{backend}/api/")).await;
    (site, fake)
}

fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .unwrap()
}

fn location(response: &reqwest::Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

async fn sign_in(client: &reqwest::Client, site: &str, username: &str) -> reqwest::Response {
    client
        .post(format!("{site}/login"))
        .form(&[("username", username), ("password", "secret")])
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn admin_login_lands_on_dashboard() {
    let (site, _) = setup().await;
    let client = browser();

    let response = sign_in(&client, &site, "admin").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    let page = client.get(format!("{site}/dashboard")).send().await.unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let html = page.text().await.unwrap();
    assert!(html.contains("Login successful"));
    assert!(html.contains("Total Products"));
}

#[tokio::test]
async fn bad_credentials_toast_and_stay_on_login() {
    let (site, _) = setup().await;
    let client = browser();

    let response = sign_in(&client, &site, "nobody").await;
    assert_eq!(location(&response), "/login");

    let html = client.get(format!("{site}/login")).send().await.unwrap().text().await.unwrap();
    assert!(html.contains("No active account found with the given credentials"));
}

#[tokio::test]
async fn dashboard_guards_by_role() {
    let (site, _) = setup().await;

    let anonymous = browser();
    let response = anonymous.get(format!("{site}/dashboard")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let customer = browser();
    sign_in(&customer, &site, "customer").await;
    let response = customer.get(format!("{site}/dashboard")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let staff = browser();
    sign_in(&staff, &site, "staff").await;
    let response = staff.get(format!("{site}/dashboard")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = staff.get(format!("{site}/dashboard/users")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn category_without_image_sends_no_file_part() {
    let (site, fake) = setup().await;
    let client = browser();
    sign_in(&client, &site, "admin").await;

    let form = reqwest::multipart::Form::new()
        .text("name", "Gates")
        .text("description", "")
        .part(
            "image",
            reqwest::multipart::Part::bytes(Vec::new())
                .file_name("")
                .mime_str("application/octet-stream")
                .unwrap(),
        );
    let response = client
        .post(format!("{site}/dashboard/categories"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard/categories");

    let parts = fake.recorded.lock().unwrap().category_parts.clone();
    assert_eq!(parts, vec![("name".to_string(), None)]);

    let html = client
        .get(format!("{site}/dashboard/categories"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Category created successfully"));
    assert!(html.contains("Gates"));
}

#[tokio::test]
async fn quotation_detail_refetches_after_new_request() {
    let (site, fake) = setup().await;
    fake.recorded.lock().unwrap().quotations.push(quotation(1, "Boundary Gate"));
    let client = browser();
    sign_in(&client, &site, "admin").await;

    let list = client.get(format!("{site}/dashboard/quotations")).send().await.unwrap();
    assert_eq!(list.status(), StatusCode::OK);
    assert!(list.text().await.unwrap().contains("Boundary Gate"));

    // A request arrives after the list was cached.
    fake.recorded.lock().unwrap().quotations.push(quotation(2, "Roof Truss"));
    let overview = client.get(format!("{site}/dashboard")).send().await.unwrap().text().await.unwrap();
    assert!(overview.contains("/dashboard/quotations/2"));

    let detail = client.get(format!("{site}/dashboard/quotations/2")).send().await.unwrap();
    assert_eq!(detail.status(), StatusCode::OK);
    assert!(detail.text().await.unwrap().contains("Roof Truss"));

    let missing = client.get(format!("{site}/dashboard/quotations/99")).send().await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expired_token_signs_out() {
    let (site, _) = setup().await;
    let client = browser();
    sign_in(&client, &site, "stale").await;

    let response = client.get(format!("{site}/dashboard/categories")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?sessionExpired=true");

    let response = client.get(format!("{site}/dashboard")).send().await.unwrap();
    assert_eq!(location(&response), "/login");

    let html = client
        .get(format!("{site}/login?sessionExpired=true"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Your session has expired"));
}

#[tokio::test]
async fn sitemap_lists_products() {
    let (site, _) = setup().await;
    let response = reqwest::get(format!("{site}/sitemap.xml")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("application/xml")
    );
    let xml = response.text().await.unwrap();
    assert!(xml.contains("<loc>https://bhattaraimetalworks.com</loc>"));
    assert!(xml.contains("<loc>https://bhattaraimetalworks.com/products/spiral-stair</loc>"));
}

#[tokio::test]
async fn sitemap_falls_back_to_static_routes() {
    // Nothing listens on a port that was bound and released.
    let dead = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let site = start_site(&format!("http://{dead}/api/")).await;

    let xml = reqwest::get(format!("{site}/sitemap.xml"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(xml.contains("<loc>https://bhattaraimetalworks.com/getquote</loc>"));
    assert!(!xml.contains("/products/"));
    assert_eq!(xml.matches("<url>").count(), 7);
}

#[tokio::test]
async fn health_and_unknown_pages() {
    let (site, _) = setup().await;
    let health = reqwest::get(format!("{site}/healthz")).await.unwrap();
    assert_eq!(health.text().await.unwrap(), "ok");

    let missing = reqwest::get(format!("{site}/no-such-page")).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
