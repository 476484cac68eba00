//! `/sitemap.xml`.
//!
//! Static pages plus one entry per product, from a single product-list fetch.
//! When the backend is unreachable the sitemap still lists the static pages.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::AppState;
use crate::domain::{ProductFilter, ProductListItem};
use crate::ui::escape;

const STATIC_ROUTES: [&str; 7] = [
    "",
    "/about",
    "/services",
    "/products",
    "/portfolio",
    "/getquote",
    "/login",
];

/// Upper bound on product entries taken from the list endpoint.
const PRODUCT_LIMIT: u32 = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: DateTime<Utc>,
    pub changefreq: &'static str,
    pub priority: f32,
}

fn join(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}

pub fn static_entries(base: &str, now: DateTime<Utc>) -> Vec<SitemapEntry> {
    STATIC_ROUTES
        .iter()
        .map(|route| SitemapEntry {
            loc: join(base, route),
            lastmod: now,
            changefreq: "weekly",
            priority: if route.is_empty() { 1.0 } else { 0.8 },
        })
        .collect()
}

pub fn product_entries(base: &str, products: &[ProductListItem], now: DateTime<Utc>) -> Vec<SitemapEntry> {
    products
        .iter()
        .filter(|p| !p.slug.trim().is_empty())
        .map(|p| SitemapEntry {
            loc: join(base, &format!("/products/{}", p.slug)),
            lastmod: now,
            changefreq: "daily",
            priority: 0.7,
        })
        .collect()
}

pub fn render(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            escape(&entry.loc),
            entry.lastmod.to_rfc3339_opts(SecondsFormat::Secs, true),
            entry.changefreq,
            entry.priority,
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Builds every entry, falling back to the static pages on a backend error.
pub async fn entries(state: &AppState) -> Vec<SitemapEntry> {
    let base = &state.config.site.base_url;
    let now = Utc::now();
    let mut entries = static_entries(base, now);

    let filter = ProductFilter {
        page_size: Some(PRODUCT_LIMIT),
        ..ProductFilter::default()
    };
    match state.backend.anonymous().catalog().products(&filter).await {
        Ok((products, _)) => entries.extend(product_entries(base, &products, now)),
        Err(err) => {
            tracing::warn!(name: "sitemap.products_failed", error = %err, "Sitemap without product routes");
        }
    }
    entries
}

/// GET /sitemap.xml
pub async fn sitemap_xml(State(state): State<AppState>) -> impl IntoResponse {
    let xml = render(&entries(&state).await);
    ([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 8, 30, 0).unwrap()
    }

    #[test]
    fn root_has_top_priority() {
        let entries = static_entries("https://example.com/", now());
        assert_eq!(entries.len(), STATIC_ROUTES.len());
        assert_eq!(entries[0].loc, "https://example.com");
        assert_eq!(entries[0].priority, 1.0);
        assert_eq!(entries[1].loc, "https://example.com/about");
        assert_eq!(entries[1].priority, 0.8);
    }

    #[test]
    fn products_are_daily() {
        let products: Vec<ProductListItem> = serde_json::from_value(json!([
            { "id": 1, "name": "Sliding Gate", "slug": "sliding-gate" },
            { "id": 2, "name": "Draft", "slug": "" }
        ]))
        .unwrap();
        let entries = product_entries("https://example.com", &products, now());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].loc, "https://example.com/products/sliding-gate");
        assert_eq!(entries[0].changefreq, "daily");
    }

    #[test]
    fn renders_sitemaps_xml() {
        let xml = render(&static_entries("https://example.com", now())[..1]);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<loc>https://example.com</loc>"));
        assert!(xml.contains("<lastmod>2026-05-01T08:30:00Z</lastmod>"));
        assert!(xml.contains("<priority>1.0</priority>"));
    }
}
