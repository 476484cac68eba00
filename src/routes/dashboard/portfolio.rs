//! Showcase projects and their categories.

use std::collections::HashMap;

use axum::extract::{Form, Multipart, Path};
use axum::response::{Html, Redirect};

use super::{drop_blank, form_page, missing, removable_images, row_actions, with_flags};
use crate::domain::{PortfolioCategory, PortfolioFilter, PortfolioProject};
use crate::error::{AppError, AppResult};
use crate::forms::FormPayload;
use crate::routes::{Visit, read_form, see_other, settle, text};
use crate::ui::components::badge::{self, BadgeVariant};
use crate::ui::components::input::{self, Input};
use crate::ui::components::{
    ButtonSize, ButtonVariant, button, card, data_table, error_banner, page_header,
};
use crate::ui::{escape, format};

const REQUIRED: [(&str, &str); 2] = [("title", "Project title"), ("description", "Description")];

/// GET /dashboard/portfolio
pub async fn index(visit: Visit) -> AppResult<Html<String>> {
    let portfolio = visit.backend().portfolio();
    let filter = PortfolioFilter::default();
    let (projects, categories) = futures::join!(
        visit.session.load(|s| &mut s.portfolio, portfolio.projects(&filter)),
        visit.session.load_list(|s| &mut s.portfolio_categories, portfolio.categories()),
    );
    settle([projects, categories])?;

    let body = visit.session.with_store(|store| {
        let rows: Vec<Vec<String>> = store
            .portfolio
            .items
            .iter()
            .map(|p| {
                vec![
                    card::image(visit.media(p.cover()).as_deref(), &p.title, "thumb-sm"),
                    escape(&p.title),
                    escape(format::or_na(p.category_name())),
                    escape(format::or_dash(Some(p.client_name.as_str()))),
                    escape(format::or_dash(Some(p.location.as_str()))),
                    if p.is_featured {
                        badge::badge(BadgeVariant::Info, "Featured")
                    } else {
                        String::new()
                    },
                    row_actions(
                        &format!("/dashboard/portfolio/{}", p.slug),
                        &format!("/dashboard/portfolio/{}/delete", p.slug),
                        "portfolio project",
                    ),
                ]
            })
            .collect();

        let categories: String = store
            .portfolio_categories
            .items
            .iter()
            .map(|c| format!("<li>{} <span class=\"muted\">({})</span></li>", escape(&c.name), c.project_count))
            .collect();
        let category_form = input::form(
            "/dashboard/portfolio/categories",
            false,
            &[
                Input::text("name", "Name", "").required().render(),
                input::textarea("description", "Description", "", 2, false),
            ],
            "Add Category",
        );

        format!(
            r#"{}{}<div class="split"><div>{}</div><aside>{}</aside></div>"#,
            page_header(
                "Portfolio",
                &format!("{} showcase projects", store.portfolio.total),
                &button::link("/dashboard/portfolio/new", "Add Project", ButtonVariant::Primary, ButtonSize::Md),
            ),
            error_banner(store.portfolio.error.as_deref()),
            data_table(
                &["Cover", "Title", "Category", "Client", "Location", "", ""],
                &rows,
                "No showcase projects yet"
            ),
            card(
                Some("Categories"),
                &format!(r#"<ul class="plain-list">{categories}</ul>{category_form}"#)
            ),
        )
    });
    Ok(visit.dashboard("Portfolio", "/dashboard/portfolio", &body))
}

/// POST /dashboard/portfolio/categories
pub async fn create_category(
    visit: Visit,
    Form(form): Form<HashMap<String, String>>,
) -> AppResult<Redirect> {
    let Some(name) = text(form.get("name")) else {
        visit.session.error("Category name is required");
        return Ok(see_other("/dashboard/portfolio"));
    };
    let payload = FormPayload::new()
        .text("name", name)
        .text("description", text(form.get("description")).unwrap_or_default());
    let result = visit.backend().portfolio().create_category(payload).await;
    if let Some(category) = visit.flash(result, "Category created successfully")? {
        visit.session.update_store(|s| s.portfolio_categories.inserted(category));
    }
    Ok(see_other("/dashboard/portfolio"))
}

fn project_form(visit: &Visit, project: Option<&PortfolioProject>, categories: &[PortfolioCategory]) -> String {
    let text = |get: fn(&PortfolioProject) -> &str| project.map_or("", get);
    let mut category_options = vec![(String::new(), "Uncategorized".to_string())];
    category_options.extend(categories.iter().map(|c| (c.id.to_string(), c.name.clone())));
    let category = project
        .and_then(|p| p.category)
        .map(|id| id.to_string())
        .unwrap_or_default();
    let images: Vec<(i64, &str)> = project
        .map(|p| p.images.iter().map(|img| (img.id, img.image.as_str())).collect())
        .unwrap_or_default();
    let logo = project
        .and_then(|p| visit.media(p.client_logo.as_deref()))
        .map(|src| {
            format!(
                r#"<div class="field"><span>Current logo</span>{}</div>"#,
                card::image(Some(src.as_str()), "Client logo", "thumb-sm")
            )
        })
        .unwrap_or_default();

    let fields = [
        Input::text("title", "Title", text(|p| p.title.as_str()))
            .required()
            .render(),
        input::select("category", "Category", &category_options, &category),
        input::textarea("description", "Description", text(|p| p.description.as_str()), 5, true),
        Input::text("client_name", "Client", text(|p| p.client_name.as_str())).render(),
        logo,
        input::file("client_logo", "Client logo", false, "image/*"),
        Input::text("location", "Location", text(|p| p.location.as_str())).render(),
        Input::text(
            "completion_date",
            "Completion date",
            project.and_then(|p| p.completion_date.as_deref()).unwrap_or_default(),
        )
        .kind("date")
        .render(),
        input::checkbox("is_featured", "Featured on the home page", project.is_some_and(|p| p.is_featured)),
        removable_images(visit, &images),
        input::file("upload_images", "Upload images", true, "image/*"),
        Input::text("meta_title", "Meta title", text(|p| p.meta_title.as_str())).render(),
        input::textarea("meta_description", "Meta description", text(|p| p.meta_description.as_str()), 2, false),
        Input::text("meta_keywords", "Meta keywords", text(|p| p.meta_keywords.as_str())).render(),
    ];
    match project {
        Some(p) => input::form(&format!("/dashboard/portfolio/{}", p.slug), true, &fields, "Save Changes"),
        None => input::form("/dashboard/portfolio", true, &fields, "Add to Showcase"),
    }
}

fn project_payload(form: FormPayload) -> FormPayload {
    drop_blank(with_flags(form, &["is_featured"]), &["category", "completion_date"])
}

/// GET /dashboard/portfolio/new
pub async fn new_form(visit: Visit) -> AppResult<Html<String>> {
    let portfolio = visit.backend().portfolio();
    settle([visit
        .session
        .load_list(|s| &mut s.portfolio_categories, portfolio.categories())
        .await])?;
    let form = visit
        .session
        .with_store(|store| project_form(&visit, None, &store.portfolio_categories.items));
    Ok(form_page(&visit, "Add Showcase Project", "/dashboard/portfolio", "/dashboard/portfolio", &form))
}

/// POST /dashboard/portfolio
pub async fn create(visit: Visit, multipart: Multipart) -> AppResult<Redirect> {
    let form = project_payload(read_form(multipart).await?);
    if let Some(message) = missing(&form, &REQUIRED) {
        visit.session.error(message);
        return Ok(see_other("/dashboard/portfolio/new"));
    }
    let result = visit.backend().portfolio().create_project(form).await;
    if let Some(project) = visit.flash(result, "Project added to showcase")? {
        tracing::info!(name: "dashboard.portfolio_created", slug = %project.slug, "Showcase project created");
        visit.session.update_store(|s| s.portfolio.prepended(project));
        return Ok(see_other("/dashboard/portfolio"));
    }
    Ok(see_other("/dashboard/portfolio/new"))
}

/// GET /dashboard/portfolio/{slug}
pub async fn edit(visit: Visit, Path(slug): Path<String>) -> AppResult<Html<String>> {
    let portfolio = visit.backend().portfolio();
    let (project, categories) = futures::join!(
        portfolio.project(&slug),
        visit.session.load_list(|s| &mut s.portfolio_categories, portfolio.categories()),
    );
    let project = match project {
        Ok(project) => project,
        Err(err) if err.is_not_found() => return Err(AppError::NotFound("Project not found".into())),
        Err(err) => return Err(err.into()),
    };
    settle([categories])?;
    let form = visit
        .session
        .with_store(|store| project_form(&visit, Some(&project), &store.portfolio_categories.items));
    Ok(form_page(
        &visit,
        &format!("Edit {}", project.title),
        "/dashboard/portfolio",
        "/dashboard/portfolio",
        &form,
    ))
}

/// POST /dashboard/portfolio/{slug}
pub async fn update(visit: Visit, Path(slug): Path<String>, multipart: Multipart) -> AppResult<Redirect> {
    let back = format!("/dashboard/portfolio/{slug}");
    let form = project_payload(read_form(multipart).await?);
    if let Some(message) = missing(&form, &REQUIRED) {
        visit.session.error(message);
        return Ok(see_other(&back));
    }
    let result = visit.backend().portfolio().update_project(&slug, form).await;
    if let Some(project) = visit.flash(result, "Showcase project updated")? {
        let back = format!("/dashboard/portfolio/{}", project.slug);
        visit.session.update_store(|s| s.portfolio.updated(project));
        return Ok(see_other(&back));
    }
    Ok(see_other(&back))
}

/// POST /dashboard/portfolio/{slug}/delete
pub async fn delete(visit: Visit, Path(slug): Path<String>) -> AppResult<Redirect> {
    let result = visit.backend().portfolio().delete_project(&slug).await;
    if visit.flash(result, "Project deleted successfully")?.is_some() {
        tracing::info!(name: "dashboard.portfolio_deleted", slug = %slug, "Showcase project deleted");
        visit.session.update_store(|s| s.portfolio.removed(&slug));
    }
    Ok(see_other("/dashboard/portfolio"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncategorized_projects_send_no_category() {
        let form = project_payload(
            FormPayload::new()
                .text("title", "Factory Shed")
                .text("category", "")
                .text("completion_date", "")
                .text("client_name", ""),
        );
        assert_eq!(form.get("category"), None);
        assert_eq!(form.get("completion_date"), None);
        assert_eq!(form.get("client_name"), Some(""));
        assert_eq!(form.get("is_featured"), Some("false"));
    }
}
