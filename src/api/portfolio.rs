//! `portfolio/` endpoints. Projects are addressed by slug.

use reqwest::Method;

use super::client::Backend;
use super::envelope::{decode_data, decode_list, decode_page};
use super::error::Result;
use crate::domain::{PortfolioCategory, PortfolioFilter, PortfolioProject};
use crate::forms::FormPayload;

/// Portfolio API client.
#[derive(Debug)]
pub struct PortfolioApi<'a> {
    pub(super) backend: Backend<'a>,
}

impl PortfolioApi<'_> {
    pub async fn projects(&self, filter: &PortfolioFilter) -> Result<(Vec<PortfolioProject>, u64)> {
        let value = self
            .backend
            .get(
                "portfolio/projects/",
                &filter.to_query(),
                "Failed to fetch portfolio projects",
            )
            .await?;
        decode_page(value)
    }

    pub async fn project(&self, slug: &str) -> Result<PortfolioProject> {
        let value = self
            .backend
            .get(&format!("portfolio/projects/{slug}/"), &[], "Failed to fetch project")
            .await?;
        decode_data(value)
    }

    /// New gallery files go in repeated `upload_images` parts.
    pub async fn create_project(&self, form: FormPayload) -> Result<PortfolioProject> {
        let value = self
            .backend
            .send_form(Method::POST, "portfolio/projects/", form, "Failed to create project")
            .await?;
        decode_data(value)
    }

    /// PATCH; `remove_images` ids are deleted, `upload_images` appended.
    pub async fn update_project(&self, slug: &str, form: FormPayload) -> Result<PortfolioProject> {
        let value = self
            .backend
            .send_form(
                Method::PATCH,
                &format!("portfolio/projects/{slug}/"),
                form,
                "Failed to update project",
            )
            .await?;
        decode_data(value)
    }

    pub async fn delete_project(&self, slug: &str) -> Result<()> {
        self.backend
            .delete(&format!("portfolio/projects/{slug}/"), "Failed to delete project")
            .await
    }

    pub async fn categories(&self) -> Result<Vec<PortfolioCategory>> {
        let value = self
            .backend
            .get("portfolio/categories/", &[], "Failed to fetch portfolio categories")
            .await?;
        decode_list(value)
    }

    pub async fn create_category(&self, form: FormPayload) -> Result<PortfolioCategory> {
        let value = self
            .backend
            .send_form(Method::POST, "portfolio/categories/", form, "Failed to create category")
            .await?;
        decode_data(value)
    }
}
