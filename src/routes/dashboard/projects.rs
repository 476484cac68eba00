//! Internal fabrication jobs.

use std::collections::HashMap;

use axum::extract::{Form, Path};
use axum::response::{Html, Redirect};
use serde_json::{Map, Value, json};

use super::{form_page, row_actions};
use crate::domain::{Project, ProjectStatus};
use crate::error::{AppError, AppResult};
use crate::routes::{Visit, number, see_other, settle, text};
use crate::ui::components::badge;
use crate::ui::components::input::{self, Input};
use crate::ui::components::{
    ButtonSize, ButtonVariant, button, data_table, error_banner, page_header,
};
use crate::ui::{escape, format};

/// GET /dashboard/projects
pub async fn index(visit: Visit) -> AppResult<Html<String>> {
    let management = visit.backend().management();
    settle([visit.session.load_list(|s| &mut s.projects, management.projects()).await])?;

    let body = visit.session.with_store(|store| {
        let rows: Vec<Vec<String>> = store
            .projects
            .items
            .iter()
            .map(|p| {
                vec![
                    escape(&p.title),
                    escape(format::or_na(p.client_name.as_deref())),
                    badge::project_status(&p.status),
                    format::date(p.start_date.as_deref()),
                    format::date(p.deadline.as_deref()),
                    format::money(p.total_budget.as_deref()),
                    button::link(
                        &format!("/dashboard/projects/{}", p.id),
                        "Edit",
                        ButtonVariant::Ghost,
                        ButtonSize::Sm,
                    ),
                ]
            })
            .collect();
        let running = store
            .projects
            .items
            .iter()
            .filter(|p| p.status == ProjectStatus::Active)
            .count();
        format!(
            "{}{}{}",
            page_header(
                "Projects",
                &format!("{} projects, {running} active", store.projects.items.len()),
                &button::link("/dashboard/projects/new", "New Project", ButtonVariant::Primary, ButtonSize::Md),
            ),
            error_banner(store.projects.error.as_deref()),
            data_table(
                &["Title", "Client", "Status", "Start", "Deadline", "Budget", ""],
                &rows,
                "No projects yet"
            ),
        )
    });
    Ok(visit.dashboard("Projects", "/dashboard/projects", &body))
}

fn project_form(project: Option<&Project>) -> String {
    let opt = |get: fn(&Project) -> Option<&str>| project.and_then(get).unwrap_or_default();
    let statuses: Vec<(String, String)> = ProjectStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), format::status_label(s.as_str())))
        .collect();
    let fields = [
        Input::text("title", "Title", project.map_or("", |p| p.title.as_str()))
            .required()
            .render(),
        Input::text("client_name", "Client", opt(|p| p.client_name.as_deref())).render(),
        input::select(
            "status",
            "Status",
            &statuses,
            project.map_or(ProjectStatus::Planning.as_str(), |p| p.status.as_str()),
        ),
        Input::text("start_date", "Start date", opt(|p| p.start_date.as_deref()))
            .kind("date")
            .render(),
        Input::text("deadline", "Deadline", opt(|p| p.deadline.as_deref()))
            .kind("date")
            .render(),
        Input::text("total_budget", "Budget (Rs.)", opt(|p| p.total_budget.as_deref()))
            .kind("number")
            .render(),
        input::textarea("description", "Description", opt(|p| p.description.as_deref()), 4, false),
        input::checkbox("is_private", "Private", project.is_some_and(|p| p.is_private)),
    ];
    match project {
        Some(p) => input::form(&format!("/dashboard/projects/{}", p.id), false, &fields, "Save Changes"),
        None => input::form("/dashboard/projects", false, &fields, "Create Project"),
    }
}

/// JSON body for a project write. Blank dates and budget are sent as null;
/// an unknown status is rejected.
fn project_body(form: &HashMap<String, String>) -> Result<Value, String> {
    let title = text(form.get("title")).ok_or("Project title is required")?;
    let status = ProjectStatus::parse(form.get("status").map_or("", String::as_str));
    if let ProjectStatus::Other(raw) = &status {
        return Err(format!("Unknown project status: {raw}"));
    }
    let budget = match text(form.get("total_budget")) {
        Some(raw) => match number::<f64>(Some(raw.as_str())) {
            Some(amount) if amount >= 0.0 => Value::String(raw),
            _ => return Err("Budget must be a positive number".to_string()),
        },
        None => Value::Null,
    };

    let mut body = Map::new();
    body.insert("title".into(), json!(title));
    body.insert("status".into(), json!(status.as_str()));
    for name in ["client_name", "description"] {
        body.insert(name.into(), json!(text(form.get(name)).unwrap_or_default()));
    }
    for name in ["start_date", "deadline"] {
        body.insert(name.into(), text(form.get(name)).map_or(Value::Null, Value::String));
    }
    body.insert("total_budget".into(), budget);
    body.insert("is_private".into(), json!(form.contains_key("is_private")));
    Ok(Value::Object(body))
}

/// GET /dashboard/projects/new
pub async fn new_form(visit: Visit) -> Html<String> {
    form_page(&visit, "New Project", "/dashboard/projects", "/dashboard/projects", &project_form(None))
}

/// POST /dashboard/projects
pub async fn create(visit: Visit, Form(form): Form<HashMap<String, String>>) -> AppResult<Redirect> {
    let body = match project_body(&form) {
        Ok(body) => body,
        Err(message) => {
            visit.session.error(message);
            return Ok(see_other("/dashboard/projects/new"));
        }
    };
    let result = visit.backend().management().create_project(&body).await;
    if let Some(project) = visit.flash(result, "Project created successfully")? {
        tracing::info!(name: "dashboard.project_created", id = project.id, "Project created");
        visit.session.update_store(|s| s.projects.prepended(project));
        return Ok(see_other("/dashboard/projects"));
    }
    Ok(see_other("/dashboard/projects/new"))
}

/// GET /dashboard/projects/{id}
pub async fn edit(visit: Visit, Path(id): Path<i64>) -> AppResult<Html<String>> {
    let management = visit.backend().management();
    settle([visit.session.load_list(|s| &mut s.projects, management.projects()).await])?;

    let found = visit.session.with_store(|store| {
        store
            .projects
            .find(&id)
            .map(|p| (p.title.clone(), project_form(Some(p))))
            .ok_or_else(|| store.projects.error.clone())
    });
    match found {
        Ok((title, form)) => Ok(form_page(
            &visit,
            &format!("Edit {title}"),
            "/dashboard/projects",
            "/dashboard/projects",
            &form,
        )),
        Err(None) => Err(AppError::NotFound("Project not found".into())),
        Err(Some(message)) => Ok(visit.dashboard("Projects", "/dashboard/projects", &error_banner(Some(message.as_str())))),
    }
}

/// POST /dashboard/projects/{id}
pub async fn update(
    visit: Visit,
    Path(id): Path<i64>,
    Form(form): Form<HashMap<String, String>>,
) -> AppResult<Redirect> {
    let back = format!("/dashboard/projects/{id}");
    let body = match project_body(&form) {
        Ok(body) => body,
        Err(message) => {
            visit.session.error(message);
            return Ok(see_other(&back));
        }
    };
    let result = visit.backend().management().update_project(id, &body).await;
    if let Some(project) = visit.flash(result, "Project updated successfully")? {
        visit.session.update_store(|s| s.projects.updated(project));
        return Ok(see_other("/dashboard/projects"));
    }
    Ok(see_other(&back))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn blank_dates_become_null() {
        let body = project_body(&form(&[
            ("title", " Warehouse frame "),
            ("status", "on_hold"),
            ("deadline", ""),
            ("total_budget", "250000"),
        ]))
        .unwrap();
        assert_eq!(body["title"], "Warehouse frame");
        assert_eq!(body["status"], "on_hold");
        assert_eq!(body["deadline"], Value::Null);
        assert_eq!(body["total_budget"], "250000");
        assert_eq!(body["is_private"], false);
    }

    #[test]
    fn rejects_missing_title_and_bad_budget() {
        assert_eq!(
            project_body(&form(&[("title", "  ")])).unwrap_err(),
            "Project title is required"
        );
        assert!(project_body(&form(&[("title", "Shed"), ("total_budget", "-5")])).is_err());
        assert!(project_body(&form(&[("title", "Shed"), ("status", "paused")])).is_err());
    }
}
