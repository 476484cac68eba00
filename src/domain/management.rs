//! Back-office records: analytics, the dashboard overview, staff and projects.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::de;
use super::orders::QuotationRequest;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchTerm {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub search_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductViews {
    #[serde(default, rename = "product__name")]
    pub product_name: String,
    #[serde(default)]
    pub view_count: u32,
}

/// Product whose SEO fields are incomplete.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SeoIssue {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub missing: Vec<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub suggestion: Option<String>,
    /// `high` or `medium` on overview alerts.
    #[serde(default, deserialize_with = "de::opt_text")]
    pub severity: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnalyticsSummary {
    pub total_products: u32,
    pub total_services: u32,
    pub total_queries: u32,
}

/// `products/analytics/dashboard/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsData {
    #[serde(default, deserialize_with = "de::null_default")]
    pub top_searches: Vec<SearchTerm>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub top_views: Vec<ProductViews>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub seo_suggestions: Vec<SeoIssue>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub summary: AnalyticsSummary,
}

impl AnalyticsData {
    /// Bar width for a view count, relative to the most viewed product.
    pub fn view_share(&self, views: u32) -> u32 {
        let top = self
            .top_views
            .iter()
            .map(|v| v.view_count)
            .max()
            .unwrap_or(0)
            .max(1);
        (u64::from(views) * 100 / u64::from(top)).min(100) as u32
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OverviewStats {
    pub total_products: u32,
    pub total_services: u32,
    pub pending_quotations: u32,
    pub staff_count: u32,
}

/// `products/overview/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardOverview {
    #[serde(default, deserialize_with = "de::null_default")]
    pub recent_quotations: Vec<QuotationRequest>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub seo_alerts: Vec<SeoIssue>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub stats: OverviewStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StaffUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// HR record attached to a user account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffProfile {
    pub id: i64,
    #[serde(default)]
    pub user: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_details: Option<StaffUser>,
    /// `full_time` or `freelancer`.
    #[serde(default = "full_time")]
    pub staff_type: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub emergency_contact: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub citizenship_number: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub pan_number: Option<String>,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub base_salary: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub joining_date: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub profile_picture: Option<String>,
}

impl StaffProfile {
    pub fn display_name(&self) -> String {
        if let Some(details) = &self.user_details {
            let name = format!("{} {}", details.first_name, details.last_name);
            let name = name.trim();
            if !name.is_empty() {
                return name.to_string();
            }
            if !details.username.is_empty() {
                return details.username.clone();
            }
        }
        self.user_name
            .clone()
            .unwrap_or_else(|| format!("Staff #{}", self.id))
    }

    pub fn type_label(&self) -> &'static str {
        if self.staff_type == "freelancer" {
            "Freelancer"
        } else {
            "Full Time"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
    Other(String),
}

impl ProjectStatus {
    pub const ALL: [Self; 5] = [
        Self::Planning,
        Self::Active,
        Self::OnHold,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "planning" => Self::Planning,
            "active" => Self::Active,
            "on_hold" => Self::OnHold,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Planning => "planning",
            Self::Active => "active",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Other(raw) => raw,
        }
    }
}

impl Serialize for ProjectStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProjectStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::parse(raw.as_deref().unwrap_or_default()))
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internal fabrication job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: i64,
    pub title: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub client_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub deadline: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub total_budget: Option<String>,
    #[serde(default)]
    pub is_private: bool,
}

/// `hr/attendance/` row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attendance {
    pub id: i64,
    #[serde(default)]
    pub staff: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub staff_name: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub clock_in: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub clock_out: Option<String>,
    #[serde(default)]
    pub status: String,
}

fn active() -> bool {
    true
}

fn full_time() -> String {
    "full_time".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overview_tolerates_nulls() {
        let overview: DashboardOverview = serde_json::from_value(json!({
            "recent_quotations": null,
            "seo_alerts": [{ "id": 1, "name": "Gate", "slug": "gate", "missing": ["meta_title"], "severity": "high" }],
            "stats": { "total_products": 12, "pending_quotations": 3 }
        }))
        .unwrap();

        assert!(overview.recent_quotations.is_empty());
        assert_eq!(overview.seo_alerts[0].missing, vec!["meta_title"]);
        assert_eq!(overview.stats.pending_quotations, 3);
        assert_eq!(overview.stats.staff_count, 0);
    }

    #[test]
    fn view_share_is_relative_to_top() {
        let analytics: AnalyticsData = serde_json::from_value(json!({
            "top_views": [
                { "product__name": "Gate", "view_count": 40 },
                { "product__name": "Rail", "view_count": 10 }
            ]
        }))
        .unwrap();

        assert_eq!(analytics.top_views[0].product_name, "Gate");
        assert_eq!(analytics.view_share(10), 25);
        assert_eq!(AnalyticsData::default().view_share(0), 0);
    }

    #[test]
    fn staff_name_prefers_user_details() {
        let staff: StaffProfile = serde_json::from_value(json!({
            "id": 7, "staff_type": "freelancer",
            "user_details": { "username": "hari", "first_name": "Hari", "last_name": "KC" }
        }))
        .unwrap();

        assert_eq!(staff.display_name(), "Hari KC");
        assert_eq!(staff.type_label(), "Freelancer");
    }

    #[test]
    fn project_status_round_trips_on_hold() {
        assert_eq!(ProjectStatus::parse("on_hold"), ProjectStatus::OnHold);
        assert_eq!(ProjectStatus::OnHold.to_string(), "on_hold");
    }
}
