//! Users, addresses and authentication payloads.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::de;

/// Coarse permission level derived by the backend from `is_superuser` / `is_staff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Admin,
    Staff,
    #[default]
    User,
}

impl Role {
    pub const ALL: [Self; 3] = [Self::Admin, Self::Staff, Self::User];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "staff" => Self::Staff,
            _ => Self::User,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::User => "user",
        }
    }

    /// Admins and staff may enter the dashboard.
    pub fn is_back_office(self) -> bool {
        matches!(self, Self::Admin | Self::Staff)
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::parse).unwrap_or_default())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Address {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub street_address: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub apartment_address: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub is_default_shipping: bool,
    #[serde(default)]
    pub is_default_billing: bool,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [
            self.street_address.as_str(),
            self.apartment_address.as_deref().unwrap_or_default(),
            self.city.as_str(),
            self.state.as_str(),
            self.zip_code.as_str(),
            self.country.as_str(),
        ]
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect();
        f.write_str(&parts.join(", "))
    }
}

/// The signed-in user as returned by login and `accounts/profile/`.
///
/// The profile endpoint omits `id`, so it defaults to zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub addresses: Vec<Address>,
}

impl User {
    /// "First Last", falling back to the username.
    pub fn display_name(&self) -> String {
        full_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            &self.username,
        )
    }
}

/// Row of the admin user list (`accounts/users/`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub phone_number: Option<String>,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub date_joined: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
    #[serde(default)]
    pub addresses_count: Option<u32>,
}

impl AdminUser {
    pub fn display_name(&self) -> String {
        full_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            &self.username,
        )
    }
}

fn full_name(first: Option<&str>, last: Option<&str>, fallback: &str) -> String {
    let name = [first, last]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        fallback.to_string()
    } else {
        name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthTokens {
    pub access: String,
    #[serde(default)]
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

/// Body of `accounts/login/` and `accounts/register/` responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub user: User,
    pub tokens: AuthTokens,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone_number: String,
}

/// `accounts/users/stats/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserStats {
    pub total_users: u32,
    pub active_users: u32,
    pub inactive_users: u32,
    pub admins: u32,
    pub staff_members: u32,
    pub regular_users: u32,
    pub new_users_last_30_days: u32,
    pub active_last_7_days: u32,
}

/// Query of the admin user list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserFilter {
    #[serde(default)]
    pub search: Option<String>,
    /// `active` or `inactive`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub ordering: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl UserFilter {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        let fields = [
            ("search", &self.search),
            ("status", &self.status),
            ("role", &self.role),
            ("ordering", &self.ordering),
        ];
        for (key, value) in fields {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                query.push((key, v.to_string()));
            }
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(size) = self.page_size {
            query.push(("page_size", size.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Activate,
    Deactivate,
    Delete,
}

impl BulkAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
            Self::Delete => "delete",
        }
    }
}

fn active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_without_id_decodes() {
        let user: User = serde_json::from_value(json!({
            "username": "ram", "email": "ram@example.com",
            "first_name": "", "role": "staff", "addresses": null
        }))
        .unwrap();

        assert_eq!(user.id, 0);
        assert_eq!(user.role, Role::Staff);
        assert!(user.role.is_back_office());
        assert_eq!(user.display_name(), "ram");
    }

    #[test]
    fn unknown_role_is_user() {
        assert_eq!(Role::parse("superuser"), Role::User);
        let user: User = serde_json::from_value(json!({ "username": "x", "role": null })).unwrap();
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn user_filter_skips_blanks() {
        let filter = UserFilter {
            search: Some(String::new()),
            role: Some("staff".into()),
            page: Some(1),
            ..UserFilter::default()
        };
        assert_eq!(
            filter.to_query(),
            vec![("role", "staff".to_string()), ("page", "1".to_string())]
        );
    }

    #[test]
    fn bulk_action_wire_names() {
        assert_eq!(
            serde_json::to_value(BulkAction::Deactivate).unwrap(),
            json!("deactivate")
        );
    }
}
