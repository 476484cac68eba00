//! `products/` catalog endpoints: categories, materials, products, reviews.

use reqwest::Method;

use super::client::Backend;
use super::envelope::{decode_data, decode_list, decode_page, unwrap_data};
use super::error::Result;
use crate::domain::{
    Category, Material, ProductDetail, ProductFilter, ProductListItem, Review, ReviewPayload,
};
use crate::forms::FormPayload;

/// Catalog API client.
#[derive(Debug)]
pub struct CatalogApi<'a> {
    pub(super) backend: Backend<'a>,
}

impl CatalogApi<'_> {
    // ─────────────────────────────────────────────────────────────────────────
    // Categories
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn categories(&self) -> Result<Vec<Category>> {
        let value = self
            .backend
            .get("products/categories/", &[], "Failed to fetch categories")
            .await?;
        decode_list(value)
    }

    pub async fn category(&self, id: i64) -> Result<Category> {
        let value = self
            .backend
            .get(&format!("products/categories/{id}/"), &[], "Failed to fetch category")
            .await?;
        decode_data(value)
    }

    /// Multipart; the `image` part is only sent when a file was chosen.
    pub async fn create_category(&self, form: FormPayload) -> Result<Category> {
        let value = self
            .backend
            .send_form(Method::POST, "products/categories/", form, "Failed to create category")
            .await?;
        decode_data(value)
    }

    pub async fn update_category(&self, id: i64, form: FormPayload) -> Result<Category> {
        let value = self
            .backend
            .send_form(
                Method::PUT,
                &format!("products/categories/{id}/"),
                form,
                "Failed to update category",
            )
            .await?;
        decode_data(value)
    }

    pub async fn delete_category(&self, id: i64) -> Result<()> {
        self.backend
            .delete(&format!("products/categories/{id}/"), "Failed to delete category")
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Materials
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn materials(&self) -> Result<Vec<Material>> {
        let value = self
            .backend
            .get("products/materials/", &[], "Failed to fetch materials")
            .await?;
        decode_list(value)
    }

    pub async fn create_material(&self, form: FormPayload) -> Result<Material> {
        let value = self
            .backend
            .send_form(Method::POST, "products/materials/", form, "Failed to create material")
            .await?;
        decode_data(value)
    }

    pub async fn update_material(&self, id: i64, form: FormPayload) -> Result<Material> {
        let value = self
            .backend
            .send_form(
                Method::PUT,
                &format!("products/materials/{id}/"),
                form,
                "Failed to update material",
            )
            .await?;
        decode_data(value)
    }

    pub async fn delete_material(&self, id: i64) -> Result<()> {
        self.backend
            .delete(&format!("products/materials/{id}/"), "Failed to delete material")
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Products
    // ─────────────────────────────────────────────────────────────────────────

    /// Product rows and total count for a filter.
    pub async fn products(&self, filter: &ProductFilter) -> Result<(Vec<ProductListItem>, u64)> {
        let value = self
            .backend
            .get("products/", &filter.to_query(), "Failed to fetch products")
            .await?;
        decode_page(value)
    }

    pub async fn featured_products(&self) -> Result<Vec<ProductListItem>> {
        let value = self
            .backend
            .get("products/featured/", &[], "Failed to fetch featured products")
            .await?;
        decode_list(value)
    }

    pub async fn product(&self, slug: &str) -> Result<ProductDetail> {
        let value = self
            .backend
            .get(&format!("products/{slug}/"), &[], "Failed to fetch product")
            .await?;
        decode_data(value)
    }

    /// Full-text search; the backend requires at least two characters.
    pub async fn search(&self, query: &str) -> Result<Vec<ProductListItem>> {
        let value = self
            .backend
            .get(
                "products/search/",
                &[("q", query.to_string())],
                "Search failed",
            )
            .await?;
        decode_list(value)
    }

    pub async fn create_product(&self, form: FormPayload) -> Result<ProductListItem> {
        let value = self
            .backend
            .send_form(Method::POST, "products/", form, "Failed to create product")
            .await?;
        decode_data(value)
    }

    pub async fn update_product(&self, slug: &str, form: FormPayload) -> Result<ProductListItem> {
        let value = self
            .backend
            .send_form(
                Method::PUT,
                &format!("products/{slug}/"),
                form,
                "Failed to update product",
            )
            .await?;
        decode_data(value)
    }

    pub async fn delete_product(&self, slug: &str) -> Result<()> {
        self.backend
            .delete(&format!("products/{slug}/"), "Failed to delete product")
            .await
    }

    pub async fn create_review(&self, slug: &str, review: &ReviewPayload) -> Result<Option<Review>> {
        let value = self
            .backend
            .send_json(
                Method::POST,
                &format!("products/{slug}/reviews/"),
                review,
                "Failed to submit review",
            )
            .await?;
        Ok(serde_json::from_value(unwrap_data(value)).ok())
    }
}
