//! Back-office dashboard.
//!
//! Every route here requires an admin or staff session; user management
//! additionally requires an admin.

mod catalog;
mod hr;
mod orders;
mod overview;
mod portfolio;
mod projects;
mod services;
mod users;

use axum::{
    Router, middleware,
    response::Html,
    routing::{get, post},
};

use super::Visit;
use crate::AppState;
use crate::forms::FormPayload;
use crate::security;
use crate::ui::components::{ButtonSize, ButtonVariant, button, card, page_header};
use crate::ui::{escape, flag};

pub fn router() -> Router<AppState> {
    let admin = Router::new()
        .route("/users", get(users::index))
        .route("/users/bulk", post(users::bulk))
        .route("/users/{id}/role", post(users::change_role))
        .route("/users/{id}/delete", post(users::delete))
        .route_layer(middleware::from_fn(security::require_admin));

    Router::new()
        .route("/", get(overview::index))
        .route("/analytics", get(overview::analytics))
        .route("/products", get(catalog::products).post(catalog::create_product))
        .route("/products/new", get(catalog::new_product))
        .route("/products/{slug}", get(catalog::edit_product).post(catalog::update_product))
        .route("/products/{slug}/delete", post(catalog::delete_product))
        .route("/categories", get(catalog::categories).post(catalog::create_category))
        .route("/categories/{id}", get(catalog::edit_category).post(catalog::update_category))
        .route("/categories/{id}/delete", post(catalog::delete_category))
        .route("/materials", get(catalog::materials).post(catalog::create_material))
        .route("/materials/{id}", post(catalog::update_material))
        .route("/materials/{id}/delete", post(catalog::delete_material))
        .route("/services", get(services::index).post(services::create))
        .route("/services/new", get(services::new_form))
        .route("/services/{id}", get(services::edit).post(services::update))
        .route("/services/{id}/delete", post(services::delete))
        .route("/quotations", get(orders::quotations))
        .route("/quotations/{id}", get(orders::quotation).post(orders::update_quotation))
        .route("/quotations/{id}/status", post(orders::quotation_status))
        .route("/quotations/{id}/delete", post(orders::delete_quotation))
        .route("/bookings", get(orders::bookings))
        .route("/bookings/{id}/status", post(orders::booking_status))
        .route("/bookings/{id}/delete", post(orders::delete_booking))
        .route("/portfolio", get(portfolio::index).post(portfolio::create))
        .route("/portfolio/new", get(portfolio::new_form))
        .route("/portfolio/categories", post(portfolio::create_category))
        .route("/portfolio/{slug}", get(portfolio::edit).post(portfolio::update))
        .route("/portfolio/{slug}/delete", post(portfolio::delete))
        .route("/hr", get(hr::index).post(hr::create))
        .route("/hr/new", get(hr::new_form))
        .route("/hr/{id}", get(hr::edit).post(hr::update))
        .route("/hr/{id}/delete", post(hr::delete))
        .route("/projects", get(projects::index).post(projects::create))
        .route("/projects/new", get(projects::new_form))
        .route("/projects/{id}", get(projects::edit).post(projects::update))
        .merge(admin)
        .route_layer(middleware::from_fn(security::require_back_office))
}

/// Unticked checkboxes are absent from a submission; the backend gets an
/// explicit `false` for each listed flag instead.
fn with_flags(mut form: FormPayload, names: &[&str]) -> FormPayload {
    for name in names {
        if form.get(name).is_none() {
            form.push_text(*name, "false");
        }
    }
    form
}

/// Drops the listed fields when left blank. Numeric and date inputs cannot
/// be sent empty; text fields are kept so they can be cleared.
fn drop_blank(mut form: FormPayload, names: &[&str]) -> FormPayload {
    for name in names {
        for value in form.take(name) {
            if !value.trim().is_empty() {
                form.push_text(*name, value);
            }
        }
    }
    form
}

/// Toast message for the first required field left blank.
fn missing(form: &FormPayload, required: &[(&str, &str)]) -> Option<String> {
    required
        .iter()
        .find(|(name, _)| form.value(name).is_none())
        .map(|(_, label)| format!("{label} is required"))
}

/// Numeric ids posted under a repeated field name.
fn ids(values: &[&str]) -> Vec<i64> {
    values.iter().filter_map(|v| v.trim().parse().ok()).collect()
}

/// Edit and delete controls for a table row.
fn row_actions(edit: &str, delete: &str, what: &str) -> String {
    format!(
        r#"<div class="row-actions">{}{}</div>"#,
        button::link(edit, "Edit", ButtonVariant::Outline, ButtonSize::Sm),
        button::delete_action(delete, what)
    )
}

/// Filter tabs with counts: `(value, label, count)`; an empty value means all.
fn status_tabs(path: &str, current: &str, tabs: &[(String, String, usize)]) -> String {
    let links: String = tabs
        .iter()
        .map(|(value, label, count)| {
            let href = if value.is_empty() {
                path.to_string()
            } else {
                format!("{path}?status={value}")
            };
            format!(
                r#"<a href="{}" class="tab {}">{} <span class="count">{count}</span></a>"#,
                escape(&href),
                flag("active", value == current),
                escape(label),
            )
        })
        .collect();
    format!(r#"<nav class="tabs">{links}</nav>"#)
}

/// Existing gallery images, each with a "remove" checkbox posting its id.
fn removable_images(visit: &Visit, images: &[(i64, &str)]) -> String {
    if images.is_empty() {
        return String::new();
    }
    let items: String = images
        .iter()
        .map(|(id, path)| {
            format!(
                r#"<label class="thumb"><img src="{src}" alt=""><span><input type="checkbox" name="remove_images" value="{id}"> Remove</span></label>"#,
                src = escape(&visit.media(Some(*path)).unwrap_or_default()),
            )
        })
        .collect();
    format!(r#"<div class="field"><span>Current images</span><div class="thumbs">{items}</div></div>"#)
}

/// Create/edit screen: header with a back link and the form in a card.
fn form_page(visit: &Visit, title: &str, active: &str, back: &str, form: &str) -> Html<String> {
    let body = format!(
        "{}{}",
        page_header(
            title,
            "",
            &button::link(back, "Back", ButtonVariant::Ghost, ButtonSize::Sm)
        ),
        card(None, form)
    );
    visit.dashboard(title, active, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unticked_flags_post_false() {
        let form = FormPayload::new().text("is_featured", "true");
        let form = with_flags(form, &["is_featured", "is_active"]);
        assert_eq!(form.get("is_featured"), Some("true"));
        assert_eq!(form.get("is_active"), Some("false"));
    }

    #[test]
    fn blank_numbers_are_dropped() {
        let form = FormPayload::new()
            .text("weight", "")
            .text("description", "")
            .text("length", "120");
        let form = drop_blank(form, &["weight", "length"]);
        assert_eq!(form.get("weight"), None);
        assert_eq!(form.get("description"), Some(""));
        assert_eq!(form.get("length"), Some("120"));
    }

    #[test]
    fn first_missing_field_is_reported() {
        let form = FormPayload::new().text("name", "Gate").text("base_price", " ");
        let required = [("name", "Name"), ("base_price", "Base price"), ("category", "Category")];
        assert_eq!(missing(&form, &required).as_deref(), Some("Base price is required"));
        assert_eq!(missing(&form, &required[..1]), None);
    }

    #[test]
    fn ids_skip_garbage() {
        assert_eq!(ids(&["3", " 7 ", "x", ""]), vec![3, 7]);
    }

    #[test]
    fn tabs_mark_current_status() {
        let tabs = [
            (String::new(), "All".to_string(), 3),
            ("pending".to_string(), "Pending".to_string(), 2),
        ];
        let html = status_tabs("/dashboard/quotations", "pending", &tabs);
        assert!(html.contains(r#"href="/dashboard/quotations?status=pending" class="tab active""#));
        assert!(html.contains(r#"href="/dashboard/quotations" class="tab ""#));
    }
}
