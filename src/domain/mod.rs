//! Typed views of the backend's resources.
//!
//! The backend owns these records; the front end only decodes them for
//! display. Every optional or blank-able field decodes leniently so a missing
//! key, a `null`, or a number-encoded decimal never fails a page.
//!
//! # Modules
//!
//! - [`accounts`]: users, addresses, login tokens, admin statistics
//! - [`catalog`]: categories, materials, products, reviews
//! - [`orders`]: quotation requests and service bookings
//! - [`services`]: store services shown on the marketing pages
//! - [`portfolio`]: completed-work showcase
//! - [`management`]: analytics, dashboard overview, staff and projects

pub mod accounts;
pub mod catalog;
pub mod management;
pub mod orders;
pub mod portfolio;
pub mod services;

pub use accounts::{
    Address, AdminUser, AuthResponse, AuthTokens, BulkAction, LoginPayload, RegisterPayload, Role,
    User, UserFilter, UserStats,
};
pub use catalog::{
    Category, CategoryRef, Material, ProductDetail, ProductFilter, ProductImage, ProductListItem,
    Review, ReviewPayload, Specification,
};
pub use management::{
    AnalyticsData, Attendance, DashboardOverview, Project, ProjectStatus, SeoIssue, StaffProfile,
    StaffUser,
};
pub use orders::{
    BookingPayload, BookingStatus, QuotationRequest, QuotationStatus, ServiceAddress,
    ServiceBooking,
};
pub use portfolio::{PortfolioCategory, PortfolioFilter, PortfolioImage, PortfolioProject};
pub use services::StoreService;

/// Lenient field decoders shared by the resource types.
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Decimal fields arrive as strings (`"12.50"`) or numbers; blanks become `None`.
    pub fn opt_decimal<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    /// Like [`opt_decimal`] with `"0"` for a missing value.
    pub fn decimal<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_decimal(deserializer)?.unwrap_or_else(|| "0".to_string()))
    }

    /// Treats an explicit `null` the same as a missing key.
    pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// Blank strings from the backend (`""`) collapse to `None`.
    pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::catalog::ProductListItem;
    use serde_json::json;

    #[test]
    fn decimals_accept_strings_and_numbers() {
        let from_string: ProductListItem = serde_json::from_value(json!({
            "id": 1, "name": "Gate", "slug": "gate", "base_price": "1200.50"
        }))
        .unwrap();
        let from_number: ProductListItem = serde_json::from_value(json!({
            "id": 2, "name": "Rail", "slug": "rail", "base_price": 99
        }))
        .unwrap();

        assert_eq!(from_string.base_price, "1200.50");
        assert_eq!(from_number.base_price, "99");
    }

    #[test]
    fn nulls_and_blanks_fall_back() {
        let item: ProductListItem = serde_json::from_value(json!({
            "id": 3, "name": "Shed", "slug": "shed",
            "base_price": null, "description": "", "primary_image": null,
            "average_rating": null
        }))
        .unwrap();

        assert_eq!(item.base_price, "0");
        assert!(item.description.is_none());
        assert!(item.primary_image.is_none());
        assert!(item.average_rating.abs() < f64::EPSILON);
    }
}
