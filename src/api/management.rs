//! Back-office endpoints: analytics, overview, HR and internal projects.

use reqwest::Method;
use serde_json::Value;

use super::client::Backend;
use super::envelope::{decode_data, decode_list};
use super::error::Result;
use crate::domain::{AnalyticsData, Attendance, DashboardOverview, Project, StaffProfile};
use crate::forms::FormPayload;

/// Management API client.
#[derive(Debug)]
pub struct ManagementApi<'a> {
    pub(super) backend: Backend<'a>,
}

impl ManagementApi<'_> {
    pub async fn analytics(&self) -> Result<AnalyticsData> {
        let value = self
            .backend
            .get("products/analytics/dashboard/", &[], "Failed to fetch analytics")
            .await?;
        decode_data(value)
    }

    pub async fn overview(&self) -> Result<DashboardOverview> {
        let value = self
            .backend
            .get("products/overview/", &[], "Failed to fetch overview")
            .await?;
        decode_data(value)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // HR
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn staff(&self) -> Result<Vec<StaffProfile>> {
        let value = self
            .backend
            .get("hr/staff/", &[], "Failed to fetch staff")
            .await?;
        decode_list(value)
    }

    /// Account fields travel as `user_data.username`, `user_data.email`, ...
    pub async fn create_staff(&self, form: FormPayload) -> Result<StaffProfile> {
        let value = self
            .backend
            .send_form(Method::POST, "hr/staff/", form, "Failed to create staff")
            .await?;
        decode_data(value)
    }

    pub async fn update_staff(&self, id: i64, form: FormPayload) -> Result<StaffProfile> {
        let value = self
            .backend
            .send_form(
                Method::PUT,
                &format!("hr/staff/{id}/"),
                form,
                "Failed to update staff",
            )
            .await?;
        decode_data(value)
    }

    pub async fn delete_staff(&self, id: i64) -> Result<()> {
        self.backend
            .delete(&format!("hr/staff/{id}/"), "Failed to delete staff")
            .await
    }

    pub async fn attendance(&self) -> Result<Vec<Attendance>> {
        let value = self
            .backend
            .get("hr/attendance/", &[], "Failed to fetch attendance")
            .await?;
        decode_list(value)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Projects
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn projects(&self) -> Result<Vec<Project>> {
        let value = self
            .backend
            .get("projects/list/", &[], "Failed to fetch projects")
            .await?;
        decode_list(value)
    }

    pub async fn create_project(&self, project: &Value) -> Result<Project> {
        let value = self
            .backend
            .send_json(Method::POST, "projects/", project, "Failed to create project")
            .await?;
        decode_data(value)
    }

    pub async fn update_project(&self, id: i64, project: &Value) -> Result<Project> {
        let value = self
            .backend
            .send_json(
                Method::PUT,
                &format!("projects/{id}/"),
                project,
                "Failed to update project",
            )
            .await?;
        decode_data(value)
    }
}
