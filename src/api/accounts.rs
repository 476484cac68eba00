//! `accounts/` endpoints.

use reqwest::Method;
use serde_json::{Value, json};

use super::client::Backend;
use super::envelope::{decode_data, decode_list, decode_page};
use super::error::Result;
use crate::domain::{
    Address, AdminUser, AuthResponse, BulkAction, LoginPayload, RegisterPayload, Role, User,
    UserFilter, UserStats,
};
use crate::forms::FormPayload;

/// Accounts API client.
#[derive(Debug)]
pub struct AccountsApi<'a> {
    pub(super) backend: Backend<'a>,
}

impl AccountsApi<'_> {
    /// Exchange credentials for a user record and JWT pair.
    pub async fn login(&self, payload: &LoginPayload) -> Result<AuthResponse> {
        let value = self
            .backend
            .send_json(Method::POST, "accounts/login/", payload, "Login failed")
            .await?;
        decode_data(value)
    }

    pub async fn register(&self, payload: &RegisterPayload) -> Result<AuthResponse> {
        let value = self
            .backend
            .send_json(Method::POST, "accounts/register/", payload, "Registration failed")
            .await?;
        decode_data(value)
    }

    pub async fn profile(&self) -> Result<User> {
        let value = self
            .backend
            .get("accounts/profile/", &[], "Failed to fetch profile")
            .await?;
        decode_data(value)
    }

    /// Multipart so a new `profile_picture` can ride along.
    pub async fn update_profile(&self, form: FormPayload) -> Result<User> {
        let value = self
            .backend
            .send_form(Method::PUT, "accounts/profile/", form, "Failed to update profile")
            .await?;
        decode_data(value)
    }

    pub async fn addresses(&self) -> Result<Vec<Address>> {
        let value = self
            .backend
            .get("accounts/addresses/", &[], "Failed to fetch addresses")
            .await?;
        decode_list(value)
    }

    pub async fn create_address(&self, address: &Address) -> Result<Address> {
        let value = self
            .backend
            .send_json(Method::POST, "accounts/addresses/", address, "Failed to add address")
            .await?;
        decode_data(value)
    }

    pub async fn update_address(&self, id: i64, address: &Address) -> Result<Address> {
        let value = self
            .backend
            .send_json(
                Method::PUT,
                &format!("accounts/addresses/{id}/"),
                address,
                "Failed to update address",
            )
            .await?;
        decode_data(value)
    }

    pub async fn delete_address(&self, id: i64) -> Result<()> {
        self.backend
            .delete(&format!("accounts/addresses/{id}/"), "Failed to delete address")
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Admin
    // ─────────────────────────────────────────────────────────────────────────

    /// One page of users and the total count.
    pub async fn users(&self, filter: &UserFilter) -> Result<(Vec<AdminUser>, u64)> {
        let value = self
            .backend
            .get("accounts/users/", &filter.to_query(), "Failed to fetch users")
            .await?;
        decode_page(value)
    }

    pub async fn user(&self, id: i64) -> Result<AdminUser> {
        let value = self
            .backend
            .get(&format!("accounts/users/{id}/"), &[], "Failed to fetch user")
            .await?;
        decode_data(value)
    }

    pub async fn update_user(&self, id: i64, changes: &Value) -> Result<AdminUser> {
        let value = self
            .backend
            .send_json(
                Method::PATCH,
                &format!("accounts/users/{id}/"),
                changes,
                "Failed to update user",
            )
            .await?;
        decode_data(value)
    }

    /// The backend deactivates rather than deleting.
    pub async fn delete_user(&self, id: i64) -> Result<()> {
        self.backend
            .delete(&format!("accounts/users/{id}/"), "Failed to delete user")
            .await
    }

    pub async fn change_role(&self, id: i64, role: Role) -> Result<()> {
        self.backend
            .send_json(
                Method::POST,
                &format!("accounts/users/{id}/change-role/"),
                &json!({ "role": role.as_str() }),
                "Failed to change role",
            )
            .await?;
        Ok(())
    }

    /// Returns the number of users affected.
    pub async fn bulk_action(&self, user_ids: &[i64], action: BulkAction) -> Result<u64> {
        let value = self
            .backend
            .send_json(
                Method::POST,
                "accounts/users/bulk-action/",
                &json!({ "user_ids": user_ids, "action": action.as_str() }),
                "Bulk action failed",
            )
            .await?;
        let data: Value = decode_data(value)?;
        Ok(data
            .get("updated_count")
            .and_then(Value::as_u64)
            .unwrap_or(user_ids.len() as u64))
    }

    pub async fn user_stats(&self) -> Result<UserStats> {
        let value = self
            .backend
            .get("accounts/users/stats/", &[], "Failed to fetch user statistics")
            .await?;
        decode_data(value)
    }
}
