//! Quotation requests and service bookings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::de;

/// Lifecycle of a quotation request.
///
/// The backend's vocabulary is `pending → reviewing → quoted → accepted |
/// rejected → completed`, plus `expired`. Older dashboards wrote `approved`
/// for `accepted`; both decode to [`QuotationStatus::Accepted`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum QuotationStatus {
    #[default]
    Pending,
    Reviewing,
    Quoted,
    Accepted,
    Rejected,
    Completed,
    Expired,
    Other(String),
}

impl QuotationStatus {
    pub const ALL: [Self; 7] = [
        Self::Pending,
        Self::Reviewing,
        Self::Quoted,
        Self::Accepted,
        Self::Rejected,
        Self::Completed,
        Self::Expired,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "pending" => Self::Pending,
            "reviewing" => Self::Reviewing,
            "quoted" => Self::Quoted,
            "accepted" | "approved" => Self::Accepted,
            "rejected" => Self::Rejected,
            "completed" => Self::Completed,
            "expired" => Self::Expired,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Reviewing => "reviewing",
            Self::Quoted => "quoted",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
            Self::Expired => "expired",
            Self::Other(raw) => raw,
        }
    }

    /// Transitions offered as dashboard actions from this status.
    pub fn next_actions(&self) -> Vec<QuotationStatus> {
        match self {
            Self::Pending => vec![Self::Reviewing, Self::Accepted, Self::Rejected],
            Self::Reviewing => vec![Self::Quoted, Self::Accepted, Self::Rejected],
            Self::Quoted => vec![Self::Accepted, Self::Rejected, Self::Expired],
            Self::Accepted => vec![Self::Completed],
            _ => Vec::new(),
        }
    }
}

/// Lifecycle of a service booking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    Other(String),
}

impl BookingStatus {
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            "cancelled" | "canceled" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Other(raw) => raw,
        }
    }

    /// Pending bookings can be confirmed, confirmed ones started or completed;
    /// both can still be cancelled.
    pub fn next_actions(&self) -> Vec<BookingStatus> {
        match self {
            Self::Pending => vec![Self::Confirmed, Self::Cancelled],
            Self::Confirmed => vec![Self::InProgress, Self::Completed, Self::Cancelled],
            Self::InProgress => vec![Self::Completed],
            _ => Vec::new(),
        }
    }
}

macro_rules! string_enum_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = Option::<String>::deserialize(deserializer)?;
                Ok(Self::parse(raw.as_deref().unwrap_or_default()))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum_serde!(QuotationStatus);
string_enum_serde!(BookingStatus);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuotationAttachment {
    pub id: i64,
    pub file: String,
    #[serde(default)]
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuotationRequest {
    pub id: i64,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub user_name: Option<String>,
    #[serde(default)]
    pub product: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub product_name: Option<String>,
    #[serde(default = "instant")]
    pub quote_type: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub guest_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub guest_email: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub guest_phone: Option<String>,
    #[serde(default)]
    pub project_title: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub service_type: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub urgency: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub custom_dimensions: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub preferred_materials: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub additional_requirements: Option<String>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub budget_range_min: Option<String>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub budget_range_max: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub required_by: Option<String>,
    #[serde(default)]
    pub status: QuotationStatus,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub quoted_price: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub quoted_delivery_time: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub admin_notes: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub quote_valid_until: Option<String>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub attachments: Vec<QuotationAttachment>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl QuotationRequest {
    /// Registered user's name, else the guest name.
    pub fn customer_name(&self) -> Option<&str> {
        self.user_name.as_deref().or(self.guest_name.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceAddress {
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub zip_code: String,
}

impl fmt::Display for ServiceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [
            self.street_address.as_str(),
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

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceBooking {
    pub id: i64,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub user_name: Option<String>,
    #[serde(default)]
    pub product: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub product_name: Option<String>,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub preferred_date: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub preferred_time: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub confirmed_date: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub confirmed_time: Option<String>,
    #[serde(default)]
    pub service_address_details: Option<ServiceAddress>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST products/bookings/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingPayload {
    pub product: i64,
    pub service_type: String,
    pub description: String,
    pub preferred_date: String,
    pub preferred_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_address: Option<i64>,
}

fn instant() -> String {
    "instant".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn approved_is_accepted() {
        assert_eq!(QuotationStatus::parse("approved"), QuotationStatus::Accepted);
        assert_eq!(QuotationStatus::parse("ACCEPTED"), QuotationStatus::Accepted);
        assert_eq!(
            QuotationStatus::parse("on_hold"),
            QuotationStatus::Other("on_hold".into())
        );
    }

    #[test]
    fn missing_status_is_pending() {
        let booking: ServiceBooking = serde_json::from_value(json!({
            "id": 5, "service_type": "Installation", "status": null
        }))
        .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(serde_json::to_value(&booking.status).unwrap(), json!("pending"));
    }

    #[test]
    fn customer_name_prefers_registered_user() {
        let quote: QuotationRequest = serde_json::from_value(json!({
            "id": 1, "project_title": "Railing", "guest_name": "Walk-in", "user_name": ""
        }))
        .unwrap();
        assert_eq!(quote.customer_name(), Some("Walk-in"));
    }

    #[test]
    fn address_skips_blank_parts() {
        let address = ServiceAddress {
            street_address: "Ring Road".into(),
            city: "Kathmandu".into(),
            state: String::new(),
            country: "Nepal".into(),
            zip_code: String::new(),
        };
        assert_eq!(address.to_string(), "Ring Road, Kathmandu, Nepal");
    }
}
