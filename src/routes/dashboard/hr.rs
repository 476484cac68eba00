//! Staff records and attendance.
//!
//! A staff record owns a user account; the account fields travel as
//! `user_data.*` parts of the same multipart submission.

use axum::extract::{Multipart, Path};
use axum::response::{Html, Redirect};

use super::{drop_blank, form_page, missing, row_actions, with_flags};
use crate::domain::{Attendance, StaffProfile, StaffUser};
use crate::error::{AppError, AppResult};
use crate::forms::FormPayload;
use crate::routes::{Visit, degrade, read_form, see_other, settle};
use crate::ui::components::badge;
use crate::ui::components::input::{self, Input};
use crate::ui::components::{
    ButtonSize, ButtonVariant, button, card, data_table, error_banner, page_header, section,
};
use crate::ui::{escape, format};

const STAFF_TYPES: [(&str, &str); 2] = [("full_time", "Full Time"), ("freelancer", "Freelancer")];

const STAFF_FILES: [(&str, &str); 4] = [
    ("profile_picture", "Profile picture"),
    ("citizenship_front", "Citizenship (front)"),
    ("citizenship_back", "Citizenship (back)"),
    ("contract_doc", "Contract document"),
];

const REQUIRED: [(&str, &str); 3] = [
    ("user_data.username", "Username"),
    ("user_data.email", "Email"),
    ("designation", "Designation"),
];

/// Shown when an attendance row has no clock time.
const NO_TIME: &str = "--:--";

fn attendance_rows(records: &[Attendance]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|a| {
            vec![
                escape(format::or_na(a.staff_name.as_deref())),
                format::date(Some(a.date.as_str())),
                escape(a.clock_in.as_deref().unwrap_or(NO_TIME)),
                escape(a.clock_out.as_deref().unwrap_or(NO_TIME)),
                escape(&format::status_label(&a.status)),
            ]
        })
        .collect()
}

/// GET /dashboard/hr
pub async fn index(visit: Visit) -> AppResult<Html<String>> {
    let management = visit.backend().management();
    let (staff, attendance) = futures::join!(
        visit.session.load_list(|s| &mut s.staff, management.staff()),
        management.attendance(),
    );
    settle([staff])?;
    let attendance = degrade(attendance)?;

    let body = visit.session.with_store(|store| {
        let rows: Vec<Vec<String>> = store
            .staff
            .items
            .iter()
            .map(|member| {
                vec![
                    card::image(
                        visit.media(member.profile_picture.as_deref()).as_deref(),
                        &member.display_name(),
                        "avatar",
                    ),
                    escape(&member.display_name()),
                    escape(&member.designation),
                    member.type_label().to_string(),
                    escape(format::or_na(member.phone_number.as_deref())),
                    format::date(member.joining_date.as_deref()),
                    badge::active(member.is_active),
                    row_actions(
                        &format!("/dashboard/hr/{}", member.id),
                        &format!("/dashboard/hr/{}/delete", member.id),
                        "staff member",
                    ),
                ]
            })
            .collect();
        let active = store.staff.items.iter().filter(|m| m.is_active).count();
        format!(
            "{}{}{}{}",
            page_header(
                "HR & Staff",
                &format!("{} staff, {active} active", store.staff.items.len()),
                &button::link("/dashboard/hr/new", "Add Staff", ButtonVariant::Primary, ButtonSize::Md),
            ),
            error_banner(store.staff.error.as_deref()),
            data_table(
                &["", "Name", "Designation", "Type", "Phone", "Joined", "Status", ""],
                &rows,
                "No staff records yet"
            ),
            section(
                "Attendance",
                "",
                &data_table(
                    &["Staff", "Date", "Clock in", "Clock out", "Status"],
                    &attendance_rows(&attendance),
                    "No attendance recorded"
                )
            ),
        )
    });
    Ok(visit.dashboard("HR & Staff", "/dashboard/hr", &body))
}

fn staff_form(visit: &Visit, member: Option<&StaffProfile>) -> String {
    let fallback = StaffUser::default();
    let user = member.and_then(|m| m.user_details.as_ref()).unwrap_or(&fallback);
    let opt = |get: fn(&StaffProfile) -> Option<&str>| member.and_then(get).unwrap_or_default();
    let salary = member
        .and_then(|m| m.base_salary.as_deref())
        .unwrap_or_default();
    let picture = member
        .and_then(|m| visit.media(m.profile_picture.as_deref()))
        .map(|src| card::image(Some(src.as_str()), "Profile picture", "avatar-lg"))
        .unwrap_or_default();

    let mut fields = vec![
        picture,
        format!(
            r#"<div class="field-row">{}{}</div>"#,
            Input::text("user_data.first_name", "First name", &user.first_name).render(),
            Input::text("user_data.last_name", "Last name", &user.last_name).render(),
        ),
        Input::text("user_data.username", "Username", &user.username)
            .required()
            .render(),
        Input::text("user_data.email", "Email", &user.email)
            .kind("email")
            .required()
            .render(),
        if member.is_some() {
            Input::text("user_data.password", "New password", "")
                .kind("password")
                .placeholder("Leave blank to keep the current password")
                .render()
        } else {
            Input::text("user_data.password", "Password", "")
                .kind("password")
                .required()
                .render()
        },
        input::select(
            "staff_type",
            "Staff type",
            &STAFF_TYPES
                .iter()
                .map(|(v, l)| ((*v).to_string(), (*l).to_string()))
                .collect::<Vec<_>>(),
            member.map_or("full_time", |m| m.staff_type.as_str()),
        ),
        Input::text("designation", "Designation", member.map_or("", |m| m.designation.as_str()))
            .required()
            .placeholder("e.g. Welder")
            .render(),
        Input::text("joining_date", "Joining date", opt(|m| m.joining_date.as_deref()))
            .kind("date")
            .render(),
        Input::text("phone_number", "Phone", opt(|m| m.phone_number.as_deref()))
            .kind("tel")
            .render(),
        Input::text("emergency_contact", "Emergency contact", opt(|m| m.emergency_contact.as_deref()))
            .render(),
        Input::text("citizenship_number", "Citizenship number", opt(|m| m.citizenship_number.as_deref()))
            .render(),
        Input::text("pan_number", "PAN number", opt(|m| m.pan_number.as_deref())).render(),
        Input::text("base_salary", "Base salary (Rs.)", salary)
            .kind("number")
            .render(),
        input::checkbox("is_active", "Active", member.is_none_or(|m| m.is_active)),
    ];
    fields.extend(
        STAFF_FILES
            .iter()
            .map(|(name, label)| input::file(name, label, false, "image/*,application/pdf")),
    );
    match member {
        Some(m) => input::form(&format!("/dashboard/hr/{}", m.id), true, &fields, "Save Changes"),
        None => input::form("/dashboard/hr", true, &fields, "Add Staff"),
    }
}

/// Blank password on an edit keeps the current one.
fn staff_payload(form: FormPayload) -> FormPayload {
    drop_blank(
        with_flags(form, &["is_active"]),
        &["user_data.password", "joining_date", "base_salary"],
    )
}

/// GET /dashboard/hr/new
pub async fn new_form(visit: Visit) -> Html<String> {
    let form = staff_form(&visit, None);
    form_page(&visit, "Add Staff", "/dashboard/hr", "/dashboard/hr", &form)
}

/// POST /dashboard/hr
pub async fn create(visit: Visit, multipart: Multipart) -> AppResult<Redirect> {
    let form = staff_payload(read_form(multipart).await?);
    let problem = missing(&form, &REQUIRED)
        .or_else(|| missing(&form, &[("user_data.password", "Password")]));
    if let Some(message) = problem {
        visit.session.error(message);
        return Ok(see_other("/dashboard/hr/new"));
    }
    let result = visit.backend().management().create_staff(form).await;
    if let Some(member) = visit.flash(result, "Staff member added successfully")? {
        tracing::info!(name: "dashboard.staff_created", id = member.id, "Staff member created");
        visit.session.update_store(|s| s.staff.inserted(member));
        return Ok(see_other("/dashboard/hr"));
    }
    Ok(see_other("/dashboard/hr/new"))
}

/// GET /dashboard/hr/{id}
pub async fn edit(visit: Visit, Path(id): Path<i64>) -> AppResult<Html<String>> {
    let management = visit.backend().management();
    settle([visit.session.load_list(|s| &mut s.staff, management.staff()).await])?;

    let found = visit.session.with_store(|store| {
        store
            .staff
            .find(&id)
            .map(|member| (member.display_name(), staff_form(&visit, Some(member))))
            .ok_or_else(|| store.staff.error.clone())
    });
    match found {
        Ok((name, form)) => Ok(form_page(&visit, &format!("Edit {name}"), "/dashboard/hr", "/dashboard/hr", &form)),
        Err(None) => Err(AppError::NotFound("Staff member not found".into())),
        Err(Some(message)) => Ok(visit.dashboard("HR & Staff", "/dashboard/hr", &error_banner(Some(message.as_str())))),
    }
}

/// POST /dashboard/hr/{id}
pub async fn update(visit: Visit, Path(id): Path<i64>, multipart: Multipart) -> AppResult<Redirect> {
    let back = format!("/dashboard/hr/{id}");
    let form = staff_payload(read_form(multipart).await?);
    if let Some(message) = missing(&form, &REQUIRED) {
        visit.session.error(message);
        return Ok(see_other(&back));
    }
    let result = visit.backend().management().update_staff(id, form).await;
    if let Some(member) = visit.flash(result, "Staff member updated successfully")? {
        visit.session.update_store(|s| s.staff.updated(member));
        return Ok(see_other("/dashboard/hr"));
    }
    Ok(see_other(&back))
}

/// POST /dashboard/hr/{id}/delete
pub async fn delete(visit: Visit, Path(id): Path<i64>) -> AppResult<Redirect> {
    let result = visit.backend().management().delete_staff(id).await;
    if visit.flash(result, "Staff member removed")?.is_some() {
        tracing::info!(name: "dashboard.staff_deleted", id, "Staff member deleted");
        visit.session.update_store(|s| s.staff.removed(&id));
    }
    Ok(see_other("/dashboard/hr"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_password_keeps_current() {
        let form = staff_payload(
            FormPayload::new()
                .text("user_data.username", "hari")
                .text("user_data.password", "")
                .text("is_active", "true"),
        );
        assert_eq!(form.get("user_data.password"), None);
        assert_eq!(form.get("is_active"), Some("true"));
    }

    #[test]
    fn missing_clock_times_render_placeholder() {
        let records: Vec<Attendance> = serde_json::from_value(json!([
            { "id": 1, "staff_name": "Hari KC", "date": "2026-03-02T00:00:00Z", "clock_in": "09:02", "status": "present" }
        ]))
        .unwrap();
        let rows = attendance_rows(&records);
        assert_eq!(rows[0][1], "2026-03-02");
        assert_eq!(rows[0][3], NO_TIME);
        assert_eq!(rows[0][4], "PRESENT");
    }
}
