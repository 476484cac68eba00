//! Landing page and analytics.

use axum::response::Html;

use crate::domain::{AnalyticsData, DashboardOverview, SeoIssue};
use crate::error::AppResult;
use crate::routes::{Visit, settle};
use crate::ui::components::badge::{self, BadgeVariant};
use crate::ui::components::{
    ButtonSize, ButtonVariant, button, data_table, error_banner, page_header, section, stat_card,
};
use crate::ui::{escape, format};

fn severity(issue: &SeoIssue) -> String {
    match issue.severity.as_deref() {
        Some("high") => badge::badge(BadgeVariant::Error, "High"),
        Some(other) => badge::badge(BadgeVariant::Warning, &format::status_label(other)),
        None => badge::badge(BadgeVariant::Secondary, "Review"),
    }
}

fn fix_link(issue: &SeoIssue) -> String {
    button::link(
        &format!("/dashboard/products/{}", issue.slug),
        "Fix",
        ButtonVariant::Outline,
        ButtonSize::Sm,
    )
}

/// GET /dashboard
pub async fn index(visit: Visit) -> AppResult<Html<String>> {
    let management = visit.backend().management();
    settle([visit.session.load_one(|s| &mut s.overview, management.overview()).await])?;

    let body = visit.session.with_store(|store| {
        let fallback = DashboardOverview::default();
        let overview = store.overview.value.as_ref().unwrap_or(&fallback);
        let stats = &overview.stats;

        let tiles = format!(
            r#"<div class="stats-grid">{}{}{}{}</div>"#,
            stat_card("Total Products", stats.total_products, None),
            stat_card("Services", stats.total_services, None),
            stat_card("Pending Quotations", stats.pending_quotations, Some("Awaiting review")),
            stat_card("Staff Members", stats.staff_count, None),
        );

        let quotes: Vec<Vec<String>> = overview
            .recent_quotations
            .iter()
            .map(|q| {
                vec![
                    escape(&q.project_title),
                    escape(format::or_na(q.customer_name())),
                    badge::quotation_status(&q.status),
                    format::date(q.created_at.as_deref()),
                    button::link(
                        &format!("/dashboard/quotations/{}", q.id),
                        "View",
                        ButtonVariant::Ghost,
                        ButtonSize::Sm,
                    ),
                ]
            })
            .collect();

        let alerts: Vec<Vec<String>> = overview
            .seo_alerts
            .iter()
            .map(|issue| {
                vec![
                    escape(&issue.name),
                    escape(&issue.missing.join(", ")),
                    severity(issue),
                    fix_link(issue),
                ]
            })
            .collect();

        format!(
            "{}{}{}{}{}",
            page_header("Dashboard", "Business at a glance", ""),
            error_banner(store.overview.error.as_deref()),
            tiles,
            section(
                "Recent Quotations",
                &button::link("/dashboard/quotations", "View all", ButtonVariant::Link, ButtonSize::Sm),
                &data_table(
                    &["Project", "Customer", "Status", "Date", ""],
                    &quotes,
                    "No quotation requests yet"
                )
            ),
            section(
                "SEO Alerts",
                "",
                &data_table(&["Product", "Missing", "Severity", ""], &alerts, "All products are SEO ready")
            ),
        )
    });
    Ok(visit.dashboard("Dashboard", "/dashboard", &body))
}

/// GET /dashboard/analytics
pub async fn analytics(visit: Visit) -> AppResult<Html<String>> {
    let management = visit.backend().management();
    settle([visit.session.load_one(|s| &mut s.analytics, management.analytics()).await])?;

    let body = visit.session.with_store(|store| {
        let fallback = AnalyticsData::default();
        let data = store.analytics.value.as_ref().unwrap_or(&fallback);

        let tiles = format!(
            r#"<div class="stats-grid">{}{}{}</div>"#,
            stat_card("Products", data.summary.total_products, None),
            stat_card("Services", data.summary.total_services, None),
            stat_card("Search Queries", data.summary.total_queries, Some("All time")),
        );

        let searches: Vec<Vec<String>> = data
            .top_searches
            .iter()
            .map(|term| vec![escape(&term.query), term.search_count.to_string()])
            .collect();

        let views: String = data
            .top_views
            .iter()
            .map(|row| {
                format!(
                    r#"<div class="bar-row"><span class="bar-label">{name}</span><div class="bar"><span style="width:{share}%"></span></div><span class="bar-value">{count}</span></div>"#,
                    name = escape(&row.product_name),
                    share = data.view_share(row.view_count),
                    count = row.view_count,
                )
            })
            .collect();
        let views = if views.is_empty() {
            r#"<p class="muted">No product views recorded yet</p>"#.to_string()
        } else {
            format!(r#"<div class="bars">{views}</div>"#)
        };

        let suggestions: Vec<Vec<String>> = data
            .seo_suggestions
            .iter()
            .map(|issue| {
                vec![
                    escape(&issue.name),
                    escape(&issue.missing.join(", ")),
                    escape(format::or_dash(issue.suggestion.as_deref())),
                    fix_link(issue),
                ]
            })
            .collect();

        format!(
            "{}{}{}{}{}{}",
            page_header("Analytics", "Search demand, product interest and SEO health", ""),
            error_banner(store.analytics.error.as_deref()),
            tiles,
            section(
                "Top Searches",
                "",
                &data_table(&["Query", "Searches"], &searches, "No search data yet")
            ),
            section("Most Viewed Products", "", &views),
            section(
                "SEO Suggestions",
                "",
                &data_table(
                    &["Product", "Missing", "Suggestion", ""],
                    &suggestions,
                    "No SEO issues found"
                )
            ),
        )
    });
    Ok(visit.dashboard("Analytics", "/dashboard/analytics", &body))
}
