//! Quotation requests and service bookings.

use reqwest::Method;
use serde_json::{Value, json};

use super::client::Backend;
use super::envelope::{decode_data, decode_list};
use super::error::Result;
use crate::domain::{
    BookingPayload, BookingStatus, QuotationRequest, QuotationStatus, ServiceBooking,
};
use crate::forms::FormPayload;

/// Orders API client.
#[derive(Debug)]
pub struct OrdersApi<'a> {
    pub(super) backend: Backend<'a>,
}

impl OrdersApi<'_> {
    // ─────────────────────────────────────────────────────────────────────────
    // Quotations
    // ─────────────────────────────────────────────────────────────────────────

    /// Staff see every request; customers only their own.
    pub async fn quotations(&self) -> Result<Vec<QuotationRequest>> {
        let value = self
            .backend
            .get("products/quotations/", &[], "Failed to fetch quotations")
            .await?;
        decode_list(value)
    }

    /// Multipart so `attachments` files can be included. Guests send
    /// `guest_name` / `guest_email` / `guest_phone` instead of a token.
    pub async fn create_quotation(&self, form: FormPayload) -> Result<QuotationRequest> {
        let value = self
            .backend
            .send_form(Method::POST, "products/quotations/", form, "Failed to create quotation")
            .await?;
        decode_data(value)
    }

    pub async fn update_quotation(&self, id: i64, form: FormPayload) -> Result<QuotationRequest> {
        let value = self
            .backend
            .send_form(
                Method::PUT,
                &format!("products/quotations/{id}/"),
                form,
                "Failed to update quotation",
            )
            .await?;
        decode_data(value)
    }

    /// Partial update; returns the record when the backend echoes one.
    pub async fn patch_quotation(
        &self,
        id: i64,
        changes: &Value,
    ) -> Result<Option<QuotationRequest>> {
        let value = self
            .backend
            .send_json(
                Method::PATCH,
                &format!("products/quotations/{id}/"),
                changes,
                "Failed to update status",
            )
            .await?;
        Ok(decode_data(value).ok())
    }

    pub async fn set_quotation_status(
        &self,
        id: i64,
        status: &QuotationStatus,
    ) -> Result<Option<QuotationRequest>> {
        self.patch_quotation(id, &json!({ "status": status.as_str() })).await
    }

    pub async fn delete_quotation(&self, id: i64) -> Result<()> {
        self.backend
            .delete(&format!("products/quotations/{id}/"), "Failed to delete quotation")
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Bookings
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn bookings(&self) -> Result<Vec<ServiceBooking>> {
        let value = self
            .backend
            .get("products/bookings/", &[], "Failed to fetch bookings")
            .await?;
        decode_list(value)
    }

    pub async fn create_booking(&self, booking: &BookingPayload) -> Result<ServiceBooking> {
        let value = self
            .backend
            .send_json(Method::POST, "products/bookings/", booking, "Failed to create booking")
            .await?;
        decode_data(value)
    }

    pub async fn update_booking(&self, id: i64, changes: &Value) -> Result<ServiceBooking> {
        let value = self
            .backend
            .send_json(
                Method::PUT,
                &format!("products/bookings/{id}/"),
                changes,
                "Failed to update booking",
            )
            .await?;
        decode_data(value)
    }

    pub async fn set_booking_status(
        &self,
        id: i64,
        status: &BookingStatus,
    ) -> Result<Option<ServiceBooking>> {
        let value = self
            .backend
            .send_json(
                Method::PATCH,
                &format!("products/bookings/{id}/"),
                &json!({ "status": status.as_str() }),
                "Failed to update status",
            )
            .await?;
        Ok(decode_data(value).ok())
    }

    pub async fn delete_booking(&self, id: i64) -> Result<()> {
        self.backend
            .delete(&format!("products/bookings/{id}/"), "Failed to delete booking")
            .await
    }
}
