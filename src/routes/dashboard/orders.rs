//! Quotation requests and service bookings.

use std::collections::HashMap;

use axum::extract::{Form, Path, Query};
use axum::response::{Html, Redirect};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::status_tabs;
use crate::domain::{BookingStatus, QuotationRequest, QuotationStatus, ServiceBooking};
use crate::error::{AppError, AppResult};
use crate::routes::{Visit, local_path, number, see_other, settle, text};
use crate::store::count_by_status;
use crate::ui::components::input::{self, Input};
use crate::ui::components::{
    ButtonSize, ButtonVariant, badge, breadcrumb, button, card, data_table, error_banner,
    page_header, section,
};
use crate::ui::{escape, format};

/// One-click status change: a POST form carrying the target status.
fn status_button(action: &str, status: &str, redirect: &str) -> String {
    let variant = match status {
        "rejected" | "cancelled" | "expired" => ButtonVariant::Destructive,
        "accepted" | "confirmed" | "completed" => ButtonVariant::Primary,
        _ => ButtonVariant::Secondary,
    };
    format!(
        r#"<form method="post" action="{action}" class="inline-form"><input type="hidden" name="status" value="{status}"><input type="hidden" name="redirect" value="{redirect}"><button type="submit" class="{classes} btn-sm">{label}</button></form>"#,
        action = escape(action),
        redirect = escape(redirect),
        classes = variant.classes(),
        label = escape(&status_action_label(status)),
    )
}

fn status_action_label(status: &str) -> String {
    match status {
        "reviewing" => "Start Review".to_string(),
        "quoted" => "Mark Quoted".to_string(),
        "accepted" => "Accept".to_string(),
        "rejected" => "Reject".to_string(),
        "completed" => "Complete".to_string(),
        "expired" => "Expire".to_string(),
        "confirmed" => "Confirm".to_string(),
        "in_progress" => "Start Work".to_string(),
        "cancelled" => "Cancel".to_string(),
        other => format::status_label(other),
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    status: String,
    #[serde(default)]
    redirect: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Quotations
// ─────────────────────────────────────────────────────────────────────────────

fn quotation_tabs(items: &[QuotationRequest], current: &str) -> String {
    let counts = count_by_status(items, |q| q.status.clone());
    let mut tabs = vec![(String::new(), "All".to_string(), items.len())];
    tabs.extend(QuotationStatus::ALL.iter().map(|status| {
        (
            status.as_str().to_string(),
            format::status_label(status.as_str()),
            counts.get(status).copied().unwrap_or(0),
        )
    }));
    status_tabs("/dashboard/quotations", current, &tabs)
}

/// GET /dashboard/quotations
pub async fn quotations(
    visit: Visit,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Html<String>> {
    let filter = text(query.get("status")).map(|s| QuotationStatus::parse(&s));
    let orders = visit.backend().orders();
    settle([visit.session.load_list(|s| &mut s.quotations, orders.quotations()).await])?;

    let body = visit.session.with_store(|store| {
        let items = &store.quotations.items;
        let current = filter.as_ref().map_or("", QuotationStatus::as_str);
        let rows: Vec<Vec<String>> = items
            .iter()
            .filter(|q| filter.as_ref().is_none_or(|f| &q.status == f))
            .map(|q| {
                let detail = format!("/dashboard/quotations/{}", q.id);
                vec![
                    format!(r#"<a href="{}">{}</a>"#, escape(&detail), escape(&q.project_title)),
                    escape(format::or_na(q.customer_name())),
                    escape(&format::status_label(&q.quote_type)),
                    escape(format::or_dash(q.product_name.as_deref())),
                    badge::quotation_status(&q.status),
                    format::date(q.created_at.as_deref()),
                    format!(
                        r#"<div class="row-actions">{}{}</div>"#,
                        button::link(&detail, "View", ButtonVariant::Outline, ButtonSize::Sm),
                        button::delete_action(&format!("/dashboard/quotations/{}/delete", q.id), "quotation"),
                    ),
                ]
            })
            .collect();
        format!(
            "{}{}{}{}",
            page_header("Quotations", "Quote requests from customers and guests", ""),
            error_banner(store.quotations.error.as_deref()),
            quotation_tabs(items, current),
            data_table(
                &["Project", "Customer", "Type", "Product", "Status", "Date", ""],
                &rows,
                "No quotation requests found"
            ),
        )
    });
    Ok(visit.dashboard("Quotations", "/dashboard/quotations", &body))
}

fn detail_rows(rows: &[(&str, String)]) -> String {
    let items: String = rows
        .iter()
        .map(|(label, value)| format!("<dt>{}</dt><dd>{}</dd>", escape(label), escape(value)))
        .collect();
    format!(r#"<dl class="details">{items}</dl>"#)
}

fn budget(quote: &QuotationRequest) -> String {
    match (quote.budget_range_min.as_deref(), quote.budget_range_max.as_deref()) {
        (None, None) => format::NOT_AVAILABLE.to_string(),
        (min, max) => format!("{} - {}", format::money(min), format::money(max)),
    }
}

fn quotation_body(visit: &Visit, quote: &QuotationRequest) -> String {
    let action = format!("/dashboard/quotations/{}/status", quote.id);
    let back = format!("/dashboard/quotations/{}", quote.id);
    let actions: String = quote
        .status
        .next_actions()
        .iter()
        .map(|next| status_button(&action, next.as_str(), &back))
        .collect();

    let customer = detail_rows(&[
        ("Name", format::or_na(quote.customer_name()).to_string()),
        ("Email", format::or_na(quote.guest_email.as_deref()).to_string()),
        ("Phone", format::or_na(quote.guest_phone.as_deref()).to_string()),
        ("Account", if quote.user_name.is_some() { "Registered".into() } else { "Guest".into() }),
    ]);
    let project = detail_rows(&[
        ("Type", format::status_label(&quote.quote_type)),
        ("Service", format::or_na(quote.service_type.as_deref()).to_string()),
        ("Product", format::or_na(quote.product_name.as_deref()).to_string()),
        ("Quantity", quote.quantity.map_or_else(|| format::NOT_AVAILABLE.to_string(), |q| q.to_string())),
        ("Urgency", format::status_label(quote.urgency.as_deref().unwrap_or("medium"))),
        ("Dimensions", format::or_na(quote.custom_dimensions.as_deref()).to_string()),
        ("Materials", format::or_na(quote.preferred_materials.as_deref()).to_string()),
        ("Budget", budget(quote)),
        ("Required by", format::date(quote.required_by.as_deref())),
        ("Submitted", format::date(quote.created_at.as_deref())),
    ]);
    let requirements = quote
        .additional_requirements
        .as_deref()
        .map(|extra| format!(r#"<h4>Additional requirements</h4><p class="prewrap">{}</p>"#, escape(extra)))
        .unwrap_or_default();
    let attachments: String = quote
        .attachments
        .iter()
        .filter_map(|file| {
            visit.media(Some(file.file.as_str())).map(|href| {
                format!(
                    r#"<li><a href="{}" target="_blank" rel="noopener">{}</a></li>"#,
                    escape(&href),
                    escape(&file.file_name)
                )
            })
        })
        .collect();
    let attachments = if attachments.is_empty() {
        r#"<p class="muted">No attachments</p>"#.to_string()
    } else {
        format!(r#"<ul class="attachments">{attachments}</ul>"#)
    };

    let response = input::form(
        &format!("/dashboard/quotations/{}", quote.id),
        false,
        &[
            Input::text("quoted_price", "Quoted price (Rs.)", quote.quoted_price.as_deref().unwrap_or_default())
                .kind("number")
                .render(),
            Input::text(
                "quoted_delivery_time",
                "Delivery time",
                quote.quoted_delivery_time.as_deref().unwrap_or_default(),
            )
            .placeholder("e.g. 2 weeks")
            .render(),
            Input::text(
                "quote_valid_until",
                "Valid until",
                quote.quote_valid_until.as_deref().unwrap_or_default(),
            )
            .kind("date")
            .render(),
            input::textarea("admin_notes", "Admin notes", quote.admin_notes.as_deref().unwrap_or_default(), 3, false),
        ],
        "Save Quote",
    );

    format!(
        r#"{crumbs}{header}<div class="split"><div>{request}{description}{attachments}</div><aside>{status}{customer}{response}</aside></div>"#,
        crumbs = breadcrumb(&[
            ("Dashboard", Some("/dashboard")),
            ("Quotations", Some("/dashboard/quotations")),
            (quote.project_title.as_str(), None),
        ]),
        header = page_header(&quote.project_title, &format!("Quotation #{}", quote.id), ""),
        request = section("Request", "", &project),
        description = section(
            "Description",
            "",
            &format!(r#"<p class="prewrap">{}</p>{requirements}"#, escape(&quote.description))
        ),
        attachments = section("Attachments", "", &attachments),
        status = card(
            Some("Status"),
            &format!(
                r#"<p>{}</p><div class="row-actions">{}</div>"#,
                badge::quotation_status(&quote.status),
                actions
            )
        ),
        customer = card(Some("Customer"), &customer),
        response = card(Some("Quote Response"), &response),
    )
}

/// GET /dashboard/quotations/{id} - served from the cached list. The list is
/// refetched when it was never loaded or does not hold `id` yet.
pub async fn quotation(visit: Visit, Path(id): Path<i64>) -> AppResult<Html<String>> {
    let cached = visit
        .session
        .with_store(|s| s.quotations.loaded && s.quotations.find(&id).is_some());
    if !cached {
        let orders = visit.backend().orders();
        settle([visit.session.load_list(|s| &mut s.quotations, orders.quotations()).await])?;
    }
    let found = visit.session.with_store(|store| {
        store
            .quotations
            .find(&id)
            .map(|quote| (quote.project_title.clone(), quotation_body(&visit, quote)))
            .ok_or_else(|| store.quotations.error.clone())
    });
    match found {
        Ok((title, body)) => Ok(visit.dashboard(&title, "/dashboard/quotations", &body)),
        Err(None) => Err(AppError::NotFound("Quotation not found".into())),
        Err(Some(message)) => Ok(visit.dashboard(
            "Quotation",
            "/dashboard/quotations",
            &error_banner(Some(message.as_str())),
        )),
    }
}

/// Refetches the quotation list after a write.
async fn refresh_quotations(visit: &Visit) -> AppResult<()> {
    let orders = visit.backend().orders();
    settle([visit.session.load_list(|s| &mut s.quotations, orders.quotations()).await])
}

/// POST /dashboard/quotations/{id}/status
pub async fn quotation_status(
    visit: Visit,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> AppResult<Redirect> {
    let fallback = format!("/dashboard/quotations/{id}");
    let back = local_path(form.redirect.as_deref(), &fallback).to_string();
    let status = QuotationStatus::parse(&form.status);
    if matches!(status, QuotationStatus::Other(_)) {
        visit.session.error(format!("Unknown status: {}", form.status));
        return Ok(see_other(&back));
    }
    let result = visit.backend().orders().set_quotation_status(id, &status).await;
    let message = format!("Quotation {} successfully", status.as_str());
    if visit.flash(result, &message)?.is_some() {
        tracing::info!(name: "dashboard.quotation_status", id, status = %status, "Quotation status changed");
        refresh_quotations(&visit).await?;
    }
    Ok(see_other(&back))
}

/// Quote response fields as a PATCH body. Blank numbers and dates are
/// omitted; blank text clears the field.
fn quote_response(form: &HashMap<String, String>) -> Value {
    let mut changes = Map::new();
    for field in ["quoted_price", "quote_valid_until"] {
        if let Some(value) = text(form.get(field)) {
            changes.insert(field.to_string(), Value::String(value));
        }
    }
    for field in ["quoted_delivery_time", "admin_notes"] {
        if let Some(value) = form.get(field) {
            changes.insert(field.to_string(), Value::String(value.trim().to_string()));
        }
    }
    Value::Object(changes)
}

/// POST /dashboard/quotations/{id}
pub async fn update_quotation(
    visit: Visit,
    Path(id): Path<i64>,
    Form(form): Form<HashMap<String, String>>,
) -> AppResult<Redirect> {
    let back = format!("/dashboard/quotations/{id}");
    if let Some(price) = form.get("quoted_price").filter(|p| !p.trim().is_empty()) {
        if number::<f64>(Some(price.as_str())).is_none_or(|p| p < 0.0) {
            visit.session.error("Quoted price must be a positive number");
            return Ok(see_other(&back));
        }
    }
    let result = visit.backend().orders().patch_quotation(id, &quote_response(&form)).await;
    if visit.flash(result, "Quotation updated successfully")?.is_some() {
        refresh_quotations(&visit).await?;
    }
    Ok(see_other(&back))
}

/// POST /dashboard/quotations/{id}/delete
pub async fn delete_quotation(visit: Visit, Path(id): Path<i64>) -> AppResult<Redirect> {
    let result = visit.backend().orders().delete_quotation(id).await;
    if visit.flash(result, "Quotation deleted successfully")?.is_some() {
        tracing::info!(name: "dashboard.quotation_deleted", id, "Quotation deleted");
        visit.session.update_store(|s| s.quotations.removed(&id));
    }
    Ok(see_other("/dashboard/quotations"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Bookings
// ─────────────────────────────────────────────────────────────────────────────

fn booking_details(booking: &ServiceBooking, back: &str) -> String {
    let action = format!("/dashboard/bookings/{}/status", booking.id);
    let actions: String = booking
        .status
        .next_actions()
        .iter()
        .map(|next| status_button(&action, next.as_str(), back))
        .collect();
    let rows = detail_rows(&[
        ("Customer", format::or_na(booking.user_name.as_deref()).to_string()),
        ("Product", format::or_na(booking.product_name.as_deref()).to_string()),
        ("Service", booking.service_type.clone()),
        ("Preferred date", format::date(Some(booking.preferred_date.as_str()))),
        ("Preferred time", format::or_na(booking.preferred_time.as_deref()).to_string()),
        ("Confirmed date", format::date(booking.confirmed_date.as_deref())),
        (
            "Address",
            booking
                .service_address_details
                .as_ref()
                .map_or_else(|| format::NOT_AVAILABLE.to_string(), ToString::to_string),
        ),
        ("Notes", format::or_dash(booking.admin_notes.as_deref()).to_string()),
    ]);
    card(
        Some(format!("Booking #{}", booking.id).as_str()),
        &format!(
            r#"<p>{}</p>{rows}<h4>Description</h4><p class="prewrap">{}</p><div class="row-actions">{actions}</div>"#,
            badge::booking_status(&booking.status),
            escape(&booking.description),
        ),
    )
}

/// GET /dashboard/bookings - `?status=` filters, `?booking={id}` opens the
/// detail panel.
pub async fn bookings(
    visit: Visit,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Html<String>> {
    let filter = text(query.get("status")).map(|s| BookingStatus::parse(&s));
    let selected: Option<i64> = number(query.get("booking").map(String::as_str));
    let orders = visit.backend().orders();
    settle([visit.session.load_list(|s| &mut s.bookings, orders.bookings()).await])?;

    let body = visit.session.with_store(|store| {
        let items = &store.bookings.items;
        let current = filter.as_ref().map_or("", BookingStatus::as_str);
        let back = if current.is_empty() {
            "/dashboard/bookings".to_string()
        } else {
            format!("/dashboard/bookings?status={current}")
        };

        let counts = count_by_status(items, |b| b.status.clone());
        let mut tabs = vec![(String::new(), "All".to_string(), items.len())];
        tabs.extend(BookingStatus::ALL.iter().map(|status| {
            (
                status.as_str().to_string(),
                format::status_label(status.as_str()),
                counts.get(status).copied().unwrap_or(0),
            )
        }));

        let rows: Vec<Vec<String>> = items
            .iter()
            .filter(|b| filter.as_ref().is_none_or(|f| &b.status == f))
            .map(|b| {
                let view = if back.contains('?') {
                    format!("{back}&booking={}", b.id)
                } else {
                    format!("{back}?booking={}", b.id)
                };
                let action = format!("/dashboard/bookings/{}/status", b.id);
                let quick: String = b
                    .status
                    .next_actions()
                    .iter()
                    .map(|next| status_button(&action, next.as_str(), &back))
                    .collect();
                vec![
                    escape(format::or_na(b.user_name.as_deref())),
                    escape(format::or_dash(b.product_name.as_deref())),
                    escape(&b.service_type),
                    format!(
                        "{} {}",
                        format::date(Some(b.preferred_date.as_str())),
                        escape(b.preferred_time.as_deref().unwrap_or_default())
                    ),
                    badge::booking_status(&b.status),
                    format!(
                        r#"<div class="row-actions">{}{quick}{}</div>"#,
                        button::link(&view, "Details", ButtonVariant::Outline, ButtonSize::Sm),
                        button::delete_action(&format!("/dashboard/bookings/{}/delete", b.id), "booking"),
                    ),
                ]
            })
            .collect();

        let panel = selected
            .and_then(|id| store.bookings.find(&id))
            .map(|booking| booking_details(booking, &back))
            .unwrap_or_default();

        format!(
            "{}{}{}{}{}",
            page_header("Bookings", "Installation, maintenance and site visits", ""),
            error_banner(store.bookings.error.as_deref()),
            status_tabs("/dashboard/bookings", current, &tabs),
            panel,
            data_table(
                &["Customer", "Product", "Service", "Preferred", "Status", ""],
                &rows,
                "No bookings found"
            ),
        )
    });
    Ok(visit.dashboard("Bookings", "/dashboard/bookings", &body))
}

/// POST /dashboard/bookings/{id}/status
pub async fn booking_status(
    visit: Visit,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> AppResult<Redirect> {
    let back = local_path(form.redirect.as_deref(), "/dashboard/bookings").to_string();
    let status = BookingStatus::parse(&form.status);
    if matches!(status, BookingStatus::Other(_)) {
        visit.session.error(format!("Unknown status: {}", form.status));
        return Ok(see_other(&back));
    }
    let result = visit.backend().orders().set_booking_status(id, &status).await;
    let message = format!("Booking {} successfully", status.as_str());
    if let Some(echoed) = visit.flash(result, &message)? {
        tracing::info!(name: "dashboard.booking_status", id, status = %status, "Booking status changed");
        visit.session.update_store(|s| match echoed {
            Some(booking) => {
                s.bookings.updated(booking);
            }
            None => {
                if let Some(booking) = s.bookings.items.iter_mut().find(|b| b.id == id) {
                    booking.status = status;
                }
            }
        });
    }
    Ok(see_other(&back))
}

/// POST /dashboard/bookings/{id}/delete
pub async fn delete_booking(visit: Visit, Path(id): Path<i64>) -> AppResult<Redirect> {
    let result = visit.backend().orders().delete_booking(id).await;
    if visit.flash(result, "Booking deleted successfully")?.is_some() {
        visit.session.update_store(|s| s.bookings.removed(&id));
    }
    Ok(see_other("/dashboard/bookings"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_patch_skips_blank_numbers() {
        let form: HashMap<String, String> = [
            ("quoted_price", "85000"),
            ("quote_valid_until", ""),
            ("quoted_delivery_time", " 3 weeks "),
            ("admin_notes", ""),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(
            quote_response(&form),
            json!({ "quoted_price": "85000", "quoted_delivery_time": "3 weeks", "admin_notes": "" })
        );
    }

    #[test]
    fn status_buttons_post_target_and_return_path() {
        let html = status_button("/dashboard/quotations/4/status", "accepted", "/dashboard/quotations/4");
        assert!(html.contains(r#"name="status" value="accepted""#));
        assert!(html.contains(r#"name="redirect" value="/dashboard/quotations/4""#));
        assert!(html.contains(">Accept<"));
        assert!(status_button("/x", "rejected", "/").contains("btn-danger"));
    }

    #[test]
    fn tabs_count_each_status() {
        let items: Vec<QuotationRequest> = serde_json::from_value(json!([
            { "id": 1, "project_title": "Gate", "status": "pending" },
            { "id": 2, "project_title": "Rail", "status": "approved" },
            { "id": 3, "project_title": "Shed", "status": "pending" }
        ]))
        .unwrap();
        let html = quotation_tabs(&items, "pending");
        assert!(html.contains(r#"All <span class="count">3</span>"#));
        assert!(html.contains(r#"PENDING <span class="count">2</span>"#));
        assert!(html.contains(r#"ACCEPTED <span class="count">1</span>"#));
    }
}
