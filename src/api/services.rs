//! `products/store-services/` endpoints.

use reqwest::Method;

use super::client::Backend;
use super::envelope::{decode_data, decode_list};
use super::error::Result;
use crate::domain::StoreService;
use crate::forms::FormPayload;

/// Store services API client.
#[derive(Debug)]
pub struct ServicesApi<'a> {
    pub(super) backend: Backend<'a>,
}

impl ServicesApi<'_> {
    pub async fn list(&self) -> Result<Vec<StoreService>> {
        let value = self
            .backend
            .get("products/store-services/", &[], "Failed to fetch services")
            .await?;
        decode_list(value)
    }

    pub async fn create(&self, form: FormPayload) -> Result<StoreService> {
        let value = self
            .backend
            .send_form(Method::POST, "products/store-services/", form, "Failed to create service")
            .await?;
        decode_data(value)
    }

    pub async fn update(&self, id: i64, form: FormPayload) -> Result<StoreService> {
        let value = self
            .backend
            .send_form(
                Method::PUT,
                &format!("products/store-services/{id}/"),
                form,
                "Failed to update service",
            )
            .await?;
        decode_data(value)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.backend
            .delete(&format!("products/store-services/{id}/"), "Failed to delete service")
            .await
    }
}
