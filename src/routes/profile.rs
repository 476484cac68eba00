//! The signed-in visitor's account: profile, addresses, quotations, bookings.

use std::collections::HashMap;

use axum::extract::{Form, Multipart, Path, Query};
use axum::response::{Html, Redirect};
use serde::Deserialize;

use super::{Visit, local_path, number, read_form, see_other, settle};
use crate::domain::{Address, BookingPayload, User};
use crate::error::AppResult;
use crate::ui::components::input::{self, Input};
use crate::ui::components::{
    badge, button, card, data_table, error_banner, page_header, section, ButtonSize,
    ButtonVariant,
};
use crate::ui::{escape, format};

const TABS: [(&str, &str); 3] = [
    ("profile", "Profile"),
    ("addresses", "Addresses"),
    ("activity", "Quotes & Bookings"),
];

fn tabs(active: &str) -> String {
    let links: String = TABS
        .iter()
        .map(|(key, label)| {
            format!(
                r#"<a href="/profile?tab={key}" class="tab{}">{label}</a>"#,
                if *key == active { " active" } else { "" }
            )
        })
        .collect();
    format!(r#"<nav class="tabs">{links}</nav>"#)
}

fn profile_tab(visit: &Visit, user: &User) -> String {
    let fields = [
        Input::text("first_name", "First name", user.first_name.as_deref().unwrap_or_default()).render(),
        Input::text("last_name", "Last name", user.last_name.as_deref().unwrap_or_default()).render(),
        Input::text("email", "Email", &user.email).kind("email").required().render(),
        Input::text("phone_number", "Phone", user.phone_number.as_deref().unwrap_or_default())
            .kind("tel")
            .render(),
        input::file("profile_picture", "Profile picture", false, "image/*"),
    ];
    let avatar = card::image(
        visit.media(user.profile_picture.as_deref()).as_deref(),
        &user.display_name(),
        "avatar-lg",
    );
    format!(
        r#"<div class="profile-summary">{avatar}<div><h2>{name}</h2><p class="muted">@{username} {role}</p></div></div>{form}"#,
        name = escape(&user.display_name()),
        username = escape(&user.username),
        role = badge::role(user.role),
        form = card(Some("Edit profile"), &input::form("/profile", true, &fields, "Save Changes")),
    )
}

fn address_fields(address: &Address) -> Vec<String> {
    vec![
        Input::text("street_address", "Street address", &address.street_address).required().render(),
        Input::text(
            "apartment_address",
            "Apartment / floor",
            address.apartment_address.as_deref().unwrap_or_default(),
        )
        .render(),
        Input::text("city", "City", &address.city).required().render(),
        Input::text("state", "State / province", &address.state).required().render(),
        Input::text("zip_code", "Postal code", &address.zip_code).render(),
        Input::text("country", "Country", &address.country).required().render(),
        input::checkbox("is_default_shipping", "Default shipping address", address.is_default_shipping),
        input::checkbox("is_default_billing", "Default billing address", address.is_default_billing),
    ]
}

fn addresses_tab(addresses: &[Address], error: Option<&str>, editing: Option<i64>) -> String {
    let rows: Vec<Vec<String>> = addresses
        .iter()
        .map(|a| {
            let mut flags = Vec::new();
            if a.is_default_shipping {
                flags.push(badge::badge(badge::BadgeVariant::Info, "Shipping"));
            }
            if a.is_default_billing {
                flags.push(badge::badge(badge::BadgeVariant::Info, "Billing"));
            }
            vec![
                escape(&a.to_string()),
                flags.concat(),
                format!(
                    "{}{}",
                    button::link(
                        &format!("/profile?tab=addresses&edit={}", a.id),
                        "Edit",
                        ButtonVariant::Ghost,
                        ButtonSize::Sm
                    ),
                    button::delete_action(&format!("/profile/addresses/{}/delete", a.id), "address"),
                ),
            ]
        })
        .collect();

    let edited = editing.and_then(|id| addresses.iter().find(|a| a.id == id));
    let form = match edited {
        Some(address) => card(
            Some("Edit address"),
            &input::form(
                &format!("/profile/addresses/{}", address.id),
                false,
                &address_fields(address),
                "Update Address",
            ),
        ),
        None => card(
            Some("Add address"),
            &input::form(
                "/profile/addresses",
                false,
                &address_fields(&Address::default()),
                "Add Address",
            ),
        ),
    };
    format!(
        "{}{}{}",
        error_banner(error),
        data_table(&["Address", "", ""], &rows, "No saved addresses"),
        form
    )
}

fn activity_tab(visit: &Visit) -> String {
    visit.session.with_store(|store| {
        let quotations: Vec<Vec<String>> = store
            .quotations
            .items
            .iter()
            .map(|q| {
                vec![
                    escape(&q.project_title),
                    escape(format::or_na(q.product_name.as_deref())),
                    badge::quotation_status(&q.status),
                    escape(&format::money(q.quoted_price.as_deref())),
                    format::date(q.created_at.as_deref()),
                ]
            })
            .collect();
        let bookings: Vec<Vec<String>> = store
            .bookings
            .items
            .iter()
            .map(|b| {
                vec![
                    escape(&b.service_type),
                    escape(format::or_na(b.product_name.as_deref())),
                    escape(&b.preferred_date),
                    badge::booking_status(&b.status),
                ]
            })
            .collect();
        format!(
            "{}{}",
            section(
                "My Quotations",
                &button::link("/getquote", "New Request", ButtonVariant::Primary, ButtonSize::Sm),
                &format!(
                    "{}{}",
                    error_banner(store.quotations.error.as_deref()),
                    data_table(
                        &["Project", "Product", "Status", "Quoted", "Requested"],
                        &quotations,
                        "You have not requested any quotations yet"
                    )
                )
            ),
            section(
                "My Bookings",
                "",
                &format!(
                    "{}{}",
                    error_banner(store.bookings.error.as_deref()),
                    data_table(
                        &["Service", "Product", "Preferred date", "Status"],
                        &bookings,
                        "No bookings yet"
                    )
                )
            ),
        )
    })
}

/// The profile endpoint omits `id`; keep the one from login.
fn merge_profile(current: Option<User>, mut fresh: User) -> User {
    if fresh.id == 0 {
        if let Some(current) = current {
            fresh.id = current.id;
        }
    }
    fresh
}

/// GET /profile
pub async fn show(
    visit: Visit,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Html<String>> {
    let tab = query
        .get("tab")
        .map(String::as_str)
        .filter(|t| TABS.iter().any(|(key, _)| key == t))
        .unwrap_or("profile");
    let editing = number::<i64>(query.get("edit").map(String::as_str));

    let backend = visit.backend();
    let accounts = backend.accounts();
    let orders = backend.orders();
    let (profile, addresses, quotations, bookings) = futures::join!(
        accounts.profile(),
        visit.session.load_list(|s| &mut s.addresses, accounts.addresses()),
        visit.session.load_list(|s| &mut s.quotations, orders.quotations()),
        visit.session.load_list(|s| &mut s.bookings, orders.bookings()),
    );
    match profile {
        Ok(user) => visit.session.set_user(merge_profile(visit.session.user(), user)),
        Err(err) if err.is_unauthorized() => return Err(err.into()),
        Err(err) => visit.session.error(err.user_message()),
    }
    settle([addresses, quotations, bookings])?;

    let user = visit.session.user().unwrap_or_default();
    let content = match tab {
        "addresses" => visit.session.with_store(|store| {
            addresses_tab(&store.addresses.items, store.addresses.error.as_deref(), editing)
        }),
        "activity" => activity_tab(&visit),
        _ => profile_tab(&visit, &user),
    };
    let body = format!(
        "{}{}{}",
        page_header("My Account", &format!("Signed in as {}", user.username), ""),
        tabs(tab),
        content
    );
    Ok(visit.public("My Account", &body))
}

/// POST /profile - Multipart so a new picture can be uploaded.
pub async fn update(visit: Visit, multipart: Multipart) -> AppResult<Redirect> {
    let form = read_form(multipart).await?;
    if form.value("email").is_none() {
        visit.session.error("Email is required");
        return Ok(see_other("/profile"));
    }
    let result = visit.backend().accounts().update_profile(form).await;
    if let Some(user) = visit.flash(result, "Profile updated successfully")? {
        visit.session.set_user(merge_profile(visit.session.user(), user));
    }
    Ok(see_other("/profile"))
}

/// POST /profile/addresses
pub async fn add_address(visit: Visit, Form(address): Form<Address>) -> AppResult<Redirect> {
    let result = visit.backend().accounts().create_address(&address).await;
    if let Some(created) = visit.flash(result, "Address added successfully")? {
        visit.session.update_store(|s| s.addresses.inserted(created));
    }
    Ok(see_other("/profile?tab=addresses"))
}

/// POST /profile/addresses/{id}
pub async fn update_address(
    visit: Visit,
    Path(id): Path<i64>,
    Form(address): Form<Address>,
) -> AppResult<Redirect> {
    let result = visit.backend().accounts().update_address(id, &address).await;
    if let Some(updated) = visit.flash(result, "Address updated successfully")? {
        visit.session.update_store(|s| s.addresses.updated(updated));
    }
    Ok(see_other("/profile?tab=addresses"))
}

/// POST /profile/addresses/{id}/delete
pub async fn delete_address(visit: Visit, Path(id): Path<i64>) -> AppResult<Redirect> {
    let result = visit.backend().accounts().delete_address(id).await;
    if visit.flash(result, "Address deleted successfully")?.is_some() {
        visit.session.update_store(|s| s.addresses.removed(&id));
    }
    Ok(see_other("/profile?tab=addresses"))
}

#[derive(Debug, Deserialize)]
pub struct BookingForm {
    product: i64,
    service_type: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    preferred_date: String,
    #[serde(default)]
    preferred_time: String,
    #[serde(default)]
    service_address: Option<String>,
    #[serde(default)]
    return_to: Option<String>,
}

/// Chosen address, else the default shipping one, else the first saved.
fn booking_address(chosen: Option<i64>, addresses: &[Address]) -> Option<i64> {
    chosen
        .or_else(|| addresses.iter().find(|a| a.is_default_shipping).map(|a| a.id))
        .or_else(|| addresses.first().map(|a| a.id))
}

/// POST /bookings - Installation or service visit for a product.
pub async fn create_booking(visit: Visit, Form(form): Form<BookingForm>) -> AppResult<Redirect> {
    let back = local_path(form.return_to.as_deref(), "/profile?tab=activity").to_string();
    if form.description.trim().is_empty()
        || form.preferred_date.trim().is_empty()
        || form.preferred_time.trim().is_empty()
    {
        visit.session.error("Please describe the job and choose a date and time");
        return Ok(see_other(&back));
    }

    let saved = visit.session.user().map(|u| u.addresses).unwrap_or_default();
    let Some(address) = booking_address(number(form.service_address.as_deref()), &saved) else {
        visit.session.error("Add a service address to your profile first");
        return Ok(see_other("/profile?tab=addresses"));
    };

    let payload = BookingPayload {
        product: form.product,
        service_type: form.service_type,
        description: form.description.trim().to_string(),
        preferred_date: form.preferred_date,
        preferred_time: form.preferred_time,
        service_address: Some(address),
    };
    let result = visit.backend().orders().create_booking(&payload).await;
    if let Some(booking) = visit.flash(result, "Booking request submitted")? {
        visit.session.update_store(|s| s.bookings.prepended(booking));
        return Ok(see_other("/profile?tab=activity"));
    }
    Ok(see_other(&back))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(id: i64, shipping: bool) -> Address {
        Address {
            id,
            street_address: format!("{id} Ring Road"),
            city: "Kathmandu".into(),
            is_default_shipping: shipping,
            ..Address::default()
        }
    }

    #[test]
    fn booking_address_prefers_choice_then_default() {
        let saved = vec![address(1, false), address(2, true)];
        assert_eq!(booking_address(Some(7), &saved), Some(7));
        assert_eq!(booking_address(None, &saved), Some(2));
        assert_eq!(booking_address(None, &saved[..1]), Some(1));
        assert_eq!(booking_address(None, &[]), None);
    }

    #[test]
    fn profile_refresh_keeps_login_id() {
        let current = User {
            id: 42,
            username: "sita".into(),
            ..User::default()
        };
        let fresh = User {
            username: "sita".into(),
            email: "new@example.com".into(),
            ..User::default()
        };
        let merged = merge_profile(Some(current), fresh);
        assert_eq!(merged.id, 42);
        assert_eq!(merged.email, "new@example.com");
    }

    #[test]
    fn address_tab_switches_to_edit_form() {
        let saved = vec![address(3, false)];
        let html = addresses_tab(&saved, None, Some(3));
        assert!(html.contains(r#"action="/profile/addresses/3""#));
        let html = addresses_tab(&saved, None, None);
        assert!(html.contains(r#"action="/profile/addresses""#));
    }
}
