//! Admin-only user management.

use std::collections::HashMap;

use axum::extract::{Form, Path, Query, RawForm};
use axum::response::{Html, Redirect};
use url::form_urlencoded;

use super::ids;
use crate::domain::{AdminUser, BulkAction, Role, UserFilter};
use crate::error::AppResult;
use crate::routes::{Visit, number, see_other, settle, text};
use crate::ui::components::badge;
use crate::ui::components::button::{self, ButtonVariant};
use crate::ui::components::{data_table, error_banner, page_header, pagination, stat_card};
use crate::ui::{escape, format};

const PAGE_SIZE: u32 = 20;

fn filter_from(query: &HashMap<String, String>) -> UserFilter {
    UserFilter {
        search: text(query.get("search")),
        status: text(query.get("status")),
        role: text(query.get("role")),
        ordering: text(query.get("ordering")),
        page: number::<u32>(query.get("page").map(String::as_str)).filter(|p| *p > 0),
        page_size: Some(PAGE_SIZE),
    }
}

fn filter_bar(filter: &UserFilter) -> String {
    let selected = |value: &Option<String>, option: &str| {
        if value.as_deref() == Some(option) { " selected" } else { "" }
    };
    let roles: String = Role::ALL
        .iter()
        .map(|r| {
            format!(
                r#"<option value="{v}"{s}>{label}</option>"#,
                v = r.as_str(),
                s = selected(&filter.role, r.as_str()),
                label = format::status_label(r.as_str()),
            )
        })
        .collect();
    format!(
        r#"<form class="filters" method="get" action="/dashboard/users">
<input type="search" name="search" value="{search}" placeholder="Search name, username or email">
<select name="status"><option value="">All statuses</option><option value="active"{active}>Active</option><option value="inactive"{inactive}>Inactive</option></select>
<select name="role"><option value="">All roles</option>{roles}</select>
{submit}</form>"#,
        search = escape(filter.search.as_deref().unwrap_or_default()),
        active = selected(&filter.status, "active"),
        inactive = selected(&filter.status, "inactive"),
        submit = button::submit("Filter", ButtonVariant::Secondary),
    )
}

fn role_form(user: &AdminUser) -> String {
    let choices: String = Role::ALL
        .iter()
        .map(|r| {
            format!(
                r#"<option value="{v}"{s}>{label}</option>"#,
                v = r.as_str(),
                s = if *r == user.role { " selected" } else { "" },
                label = format::status_label(r.as_str()),
            )
        })
        .collect();
    format!(
        r#"<form class="inline" method="post" action="/dashboard/users/{id}/role"><select name="role" aria-label="Role">{choices}</select>{submit}</form>"#,
        id = user.id,
        submit = button::submit("Set", ButtonVariant::Outline),
    )
}

fn user_rows(users: &[AdminUser], current: Option<i64>) -> Vec<Vec<String>> {
    users
        .iter()
        .map(|u| {
            let own = current == Some(u.id);
            vec![
                if own {
                    String::new()
                } else {
                    format!(r#"<input type="checkbox" name="user_ids" value="{}" form="bulk">"#, u.id)
                },
                format!(
                    r#"{}<div class="muted">@{}</div>"#,
                    escape(&u.display_name()),
                    escape(&u.username)
                ),
                escape(&u.email),
                badge::role(u.role),
                badge::active(u.is_active),
                format::date(u.date_joined.as_deref()),
                format::date(u.last_login.as_deref()),
                if own {
                    r#"<span class="muted">You</span>"#.to_string()
                } else {
                    format!(
                        "{}{}",
                        role_form(u),
                        button::delete_action(&format!("/dashboard/users/{}/delete", u.id), "user")
                    )
                },
            ]
        })
        .collect()
}

/// GET /dashboard/users
pub async fn index(visit: Visit, Query(query): Query<HashMap<String, String>>) -> AppResult<Html<String>> {
    let filter = filter_from(&query);
    let accounts = visit.backend().accounts();
    let (users, stats) = futures::join!(
        visit.session.load(|s| &mut s.users, accounts.users(&filter)),
        visit.session.load_one(|s| &mut s.user_stats, accounts.user_stats()),
    );
    settle([users, stats])?;

    let current = visit.session.user().map(|u| u.id);
    let body = visit.session.with_store(|store| {
        let stats = store
            .user_stats
            .value
            .as_ref()
            .map(|s| {
                format!(
                    r#"<div class="stats">{}{}{}{}</div>"#,
                    stat_card("Total users", s.total_users, Some(format!("{} new in 30 days", s.new_users_last_30_days).as_str())),
                    stat_card("Active", s.active_users, Some(format!("{} inactive", s.inactive_users).as_str())),
                    stat_card("Admins", s.admins, None),
                    stat_card("Staff", s.staff_members, Some(format!("{} customers", s.regular_users).as_str())),
                )
            })
            .unwrap_or_default();
        let bulk = format!(
            r#"<form id="bulk" class="bulk-actions" method="post" action="/dashboard/users/bulk"><select name="action" aria-label="Bulk action">{}</select>{}</form>"#,
            [BulkAction::Activate, BulkAction::Deactivate, BulkAction::Delete]
                .iter()
                .map(|a| format!(r#"<option value="{0}">{1}</option>"#, a.as_str(), format::status_label(a.as_str())))
                .collect::<String>(),
            button::submit("Apply to selected", ButtonVariant::Secondary),
        );
        let params = [
            ("search", filter.search.clone().unwrap_or_default()),
            ("status", filter.status.clone().unwrap_or_default()),
            ("role", filter.role.clone().unwrap_or_default()),
        ];
        format!(
            "{}{}{}{}{}{}{}",
            page_header("Users", &format!("{} accounts", store.users.total), ""),
            stats,
            error_banner(store.user_stats.error.as_deref()),
            filter_bar(&filter),
            bulk,
            if store.users.error.is_some() {
                error_banner(store.users.error.as_deref())
            } else {
                data_table(
                    &["", "Name", "Email", "Role", "Status", "Joined", "Last login", ""],
                    &user_rows(&store.users.items, current),
                    "No users match these filters",
                )
            },
            pagination("/dashboard/users", &params, filter.page.unwrap_or(1), PAGE_SIZE, store.users.total),
        )
    });
    Ok(visit.dashboard("Users", "/dashboard/users", &body))
}

/// `user_ids` repeats once per ticked row. The signed-in admin's own id is
/// never part of a bulk action.
fn bulk_request(raw: &[u8], me: Option<i64>) -> Result<(Vec<i64>, BulkAction), &'static str> {
    let mut selected = Vec::new();
    let mut action = None;
    for (key, value) in form_urlencoded::parse(raw) {
        match key.as_ref() {
            "user_ids" => selected.push(value.into_owned()),
            "action" => {
                action = match value.as_ref() {
                    "activate" => Some(BulkAction::Activate),
                    "deactivate" => Some(BulkAction::Deactivate),
                    "delete" => Some(BulkAction::Delete),
                    _ => None,
                }
            }
            _ => {}
        }
    }
    let mut selected = ids(&selected.iter().map(String::as_str).collect::<Vec<_>>());
    if let Some(me) = me {
        selected.retain(|id| *id != me);
    }
    if selected.is_empty() {
        return Err("Please select at least one user");
    }
    let action = action.ok_or("Please choose an action")?;
    Ok((selected, action))
}

/// POST /dashboard/users/bulk
pub async fn bulk(visit: Visit, RawForm(raw): RawForm) -> AppResult<Redirect> {
    let me = visit.session.user().map(|user| user.id);
    let (selected, action) = match bulk_request(&raw, me) {
        Ok(request) => request,
        Err(message) => {
            visit.session.error(message);
            return Ok(see_other("/dashboard/users"));
        }
    };
    let result = visit.backend().accounts().bulk_action(&selected, action).await;
    let verb = action.as_str();
    match result {
        Ok(count) => {
            tracing::info!(name: "dashboard.users_bulk", action = verb, count, "Bulk user action applied");
            visit.session.success(format!("{count} user(s) {verb}d successfully"));
        }
        Err(err) if err.is_unauthorized() => return Err(err.into()),
        Err(err) => visit.session.error(err.user_message()),
    }
    Ok(see_other("/dashboard/users"))
}

/// POST /dashboard/users/{id}/role
pub async fn change_role(
    visit: Visit,
    Path(id): Path<i64>,
    Form(form): Form<HashMap<String, String>>,
) -> AppResult<Redirect> {
    if visit.session.user().is_some_and(|me| me.id == id) {
        visit.session.error("You cannot change your own role");
        return Ok(see_other("/dashboard/users"));
    }
    let role = Role::parse(form.get("role").map_or("", String::as_str));
    let result = visit.backend().accounts().change_role(id, role).await;
    if visit.flash(result, &format!("User role changed to {role}"))?.is_some() {
        tracing::info!(name: "dashboard.role_changed", id, role = role.as_str(), "User role changed");
        visit.session.update_store(|s| {
            if let Some(user) = s.users.items.iter_mut().find(|u| u.id == id) {
                user.role = role;
            }
        });
    }
    Ok(see_other("/dashboard/users"))
}

/// POST /dashboard/users/{id}/delete
pub async fn delete(visit: Visit, Path(id): Path<i64>) -> AppResult<Redirect> {
    if visit.session.user().is_some_and(|me| me.id == id) {
        visit.session.error("You cannot delete your own account");
        return Ok(see_other("/dashboard/users"));
    }
    let result = visit.backend().accounts().delete_user(id).await;
    if visit.flash(result, "User deleted successfully")?.is_some() {
        tracing::info!(name: "dashboard.user_deleted", id, "User deleted");
        visit.session.update_store(|s| s.users.removed(&id));
    }
    Ok(see_other("/dashboard/users"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bulk_reads_repeated_ids() {
        let (selected, action) =
            bulk_request(b"user_ids=3&user_ids=9&user_ids=x&action=deactivate", None).unwrap();
        assert_eq!(selected, vec![3, 9]);
        assert_eq!(action, BulkAction::Deactivate);
    }

    #[test]
    fn bulk_requires_a_selection() {
        assert_eq!(
            bulk_request(b"action=activate", None).unwrap_err(),
            "Please select at least one user"
        );
        assert_eq!(bulk_request(b"user_ids=1", None).unwrap_err(), "Please choose an action");
    }

    #[test]
    fn bulk_skips_own_account() {
        let (selected, _) = bulk_request(b"user_ids=1&user_ids=4&action=delete", Some(1)).unwrap();
        assert_eq!(selected, vec![4]);
        assert_eq!(
            bulk_request(b"user_ids=1&action=delete", Some(1)).unwrap_err(),
            "Please select at least one user"
        );
    }

    #[test]
    fn filter_clamps_page_and_drops_blanks() {
        let query: HashMap<String, String> = [("search", " "), ("role", "staff"), ("page", "0")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let filter = filter_from(&query);
        assert_eq!(filter.search, None);
        assert_eq!(filter.role.as_deref(), Some("staff"));
        assert_eq!(filter.page, None);
        assert_eq!(filter.page_size, Some(PAGE_SIZE));
    }

    #[test]
    fn own_row_has_no_controls() {
        let users: Vec<AdminUser> = serde_json::from_value(json!([
            { "id": 1, "username": "admin", "role": "admin" },
            { "id": 2, "username": "sita", "role": "user", "is_active": false }
        ]))
        .unwrap();
        let rows = user_rows(&users, Some(1));
        assert!(rows[0][0].is_empty());
        assert!(rows[0][7].contains("You"));
        assert!(rows[1][0].contains(r#"value="2""#));
        assert!(rows[1][7].contains("/dashboard/users/2/role"));
    }
}
