//! Advertised services.

use axum::extract::{Multipart, Path};
use axum::response::{Html, Redirect};

use super::{drop_blank, form_page, missing, removable_images, row_actions, with_flags};
use crate::domain::StoreService;
use crate::error::{AppError, AppResult};
use crate::forms::FormPayload;
use crate::routes::{Visit, read_form, see_other, settle};
use crate::ui::components::badge;
use crate::ui::components::input::{self, Input};
use crate::ui::components::{
    ButtonSize, ButtonVariant, button, card, data_table, error_banner, page_header,
};
use crate::ui::{escape, format};

const REQUIRED: [(&str, &str); 2] = [("title", "Service title"), ("category", "Category")];

/// GET /dashboard/services
pub async fn index(visit: Visit) -> AppResult<Html<String>> {
    let services = visit.backend().services();
    settle([visit.session.load_list(|s| &mut s.services, services.list()).await])?;

    let body = visit.session.with_store(|store| {
        let mut items: Vec<&StoreService> = store.services.items.iter().collect();
        items.sort_by_key(|s| s.order);
        let rows: Vec<Vec<String>> = items
            .iter()
            .map(|s| {
                vec![
                    card::image(visit.media(s.cover()).as_deref(), &s.title, "thumb-sm"),
                    escape(&s.title),
                    escape(&s.category),
                    escape(&format::excerpt(&s.description, 80)),
                    badge::active(s.is_active),
                    row_actions(
                        &format!("/dashboard/services/{}", s.id),
                        &format!("/dashboard/services/{}/delete", s.id),
                        "service",
                    ),
                ]
            })
            .collect();
        format!(
            "{}{}{}",
            page_header(
                "Services",
                "What the company offers",
                &button::link("/dashboard/services/new", "Add Service", ButtonVariant::Primary, ButtonSize::Md),
            ),
            error_banner(store.services.error.as_deref()),
            data_table(
                &["Image", "Title", "Category", "Description", "Status", ""],
                &rows,
                "No services yet"
            ),
        )
    });
    Ok(visit.dashboard("Services", "/dashboard/services", &body))
}

fn service_form(visit: &Visit, service: Option<&StoreService>) -> String {
    let text = |get: fn(&StoreService) -> &str| service.map_or("", get);
    let order = service.map(|s| s.order.to_string()).unwrap_or_default();
    let images: Vec<(i64, &str)> = service
        .map(|s| s.images.iter().map(|img| (img.id, img.image.as_str())).collect())
        .unwrap_or_default();
    let fields = [
        Input::text("title", "Title", text(|s| s.title.as_str()))
            .required()
            .placeholder("e.g. Gates & Shutters")
            .render(),
        Input::text("category", "Category", text(|s| s.category.as_str()))
            .required()
            .placeholder("e.g. Fabrication")
            .render(),
        input::textarea("description", "Description", text(|s| s.description.as_str()), 4, false),
        Input::text("order", "Display order", &order).kind("number").render(),
        input::checkbox("is_active", "Active", service.is_none_or(|s| s.is_active)),
        removable_images(visit, &images),
        input::file("upload_images", "Upload images", true, "image/*"),
        Input::text("meta_title", "Meta title", text(|s| s.meta_title.as_str())).render(),
        input::textarea("meta_description", "Meta description", text(|s| s.meta_description.as_str()), 2, false),
        Input::text("meta_keywords", "Meta keywords", text(|s| s.meta_keywords.as_str())).render(),
        Input::text("focus_keyword", "Focus keyword", text(|s| s.focus_keyword.as_str())).render(),
    ];
    match service {
        Some(s) => input::form(&format!("/dashboard/services/{}", s.id), true, &fields, "Save Changes"),
        None => input::form("/dashboard/services", true, &fields, "Create Service"),
    }
}

fn service_payload(form: FormPayload) -> FormPayload {
    drop_blank(with_flags(form, &["is_active"]), &["order"])
}

/// GET /dashboard/services/new
pub async fn new_form(visit: Visit) -> Html<String> {
    let form = service_form(&visit, None);
    form_page(&visit, "Add Service", "/dashboard/services", "/dashboard/services", &form)
}

/// POST /dashboard/services
pub async fn create(visit: Visit, multipart: Multipart) -> AppResult<Redirect> {
    let form = service_payload(read_form(multipart).await?);
    if let Some(message) = missing(&form, &REQUIRED) {
        visit.session.error(message);
        return Ok(see_other("/dashboard/services/new"));
    }
    let result = visit.backend().services().create(form).await;
    if let Some(service) = visit.flash(result, "Service created successfully")? {
        tracing::info!(name: "dashboard.service_created", id = service.id, "Service created");
        visit.session.update_store(|s| s.services.inserted(service));
        return Ok(see_other("/dashboard/services"));
    }
    Ok(see_other("/dashboard/services/new"))
}

/// GET /dashboard/services/{id}
pub async fn edit(visit: Visit, Path(id): Path<i64>) -> AppResult<Html<String>> {
    let services = visit.backend().services();
    settle([visit.session.load_list(|s| &mut s.services, services.list()).await])?;

    let found = visit.session.with_store(|store| {
        store
            .services
            .find(&id)
            .map(|service| (service.title.clone(), service_form(&visit, Some(service))))
            .ok_or_else(|| store.services.error.clone())
    });
    match found {
        Ok((title, form)) => Ok(form_page(
            &visit,
            &format!("Edit {title}"),
            "/dashboard/services",
            "/dashboard/services",
            &form,
        )),
        Err(None) => Err(AppError::NotFound("Service not found".into())),
        Err(Some(message)) => Ok(visit.dashboard("Services", "/dashboard/services", &error_banner(Some(message.as_str())))),
    }
}

/// POST /dashboard/services/{id}
pub async fn update(visit: Visit, Path(id): Path<i64>, multipart: Multipart) -> AppResult<Redirect> {
    let back = format!("/dashboard/services/{id}");
    let form = service_payload(read_form(multipart).await?);
    if let Some(message) = missing(&form, &REQUIRED) {
        visit.session.error(message);
        return Ok(see_other(&back));
    }
    let result = visit.backend().services().update(id, form).await;
    if let Some(service) = visit.flash(result, "Service updated successfully")? {
        visit.session.update_store(|s| s.services.updated(service));
    }
    Ok(see_other(&back))
}

/// POST /dashboard/services/{id}/delete
pub async fn delete(visit: Visit, Path(id): Path<i64>) -> AppResult<Redirect> {
    let result = visit.backend().services().delete(id).await;
    if visit.flash(result, "Service deleted successfully")?.is_some() {
        tracing::info!(name: "dashboard.service_deleted", id, "Service deleted");
        visit.session.update_store(|s| s.services.removed(&id));
    }
    Ok(see_other("/dashboard/services"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_service_posts_false() {
        let form = service_payload(
            FormPayload::new()
                .text("title", "Welding")
                .text("order", "")
                .text("remove_images", "4"),
        );
        assert_eq!(form.get("is_active"), Some("false"));
        assert_eq!(form.get("order"), None);
        assert_eq!(form.get_all("remove_images"), vec!["4"]);
    }
}
