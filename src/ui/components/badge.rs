//! Badge component for status indicators and tags.

use crate::domain::{BookingStatus, ProjectStatus, QuotationStatus, Role};
use crate::ui::{escape, format};

/// Badge visual variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BadgeVariant {
    /// Default badge style.
    #[default]
    Default,
    /// Success/positive badge.
    Success,
    /// Warning badge.
    Warning,
    /// Error/destructive badge.
    Error,
    /// Informational badge.
    Info,
    /// Secondary badge.
    Secondary,
}

impl BadgeVariant {
    /// Get CSS classes for this variant.
    #[must_use]
    pub fn classes(self) -> &'static str {
        match self {
            Self::Default => "badge badge-default",
            Self::Success => "badge badge-success",
            Self::Warning => "badge badge-warning",
            Self::Error => "badge badge-error",
            Self::Info => "badge badge-info",
            Self::Secondary => "badge badge-secondary",
        }
    }
}

pub fn badge(variant: BadgeVariant, text: &str) -> String {
    format!(
        r#"<span class="{}">{}</span>"#,
        variant.classes(),
        escape(text)
    )
}

pub fn quotation_status(status: &QuotationStatus) -> String {
    let variant = match status {
        QuotationStatus::Pending => BadgeVariant::Warning,
        QuotationStatus::Reviewing | QuotationStatus::Quoted => BadgeVariant::Info,
        QuotationStatus::Accepted | QuotationStatus::Completed => BadgeVariant::Success,
        QuotationStatus::Rejected => BadgeVariant::Error,
        QuotationStatus::Expired | QuotationStatus::Other(_) => BadgeVariant::Secondary,
    };
    badge(variant, &format::status_label(status.as_str()))
}

pub fn booking_status(status: &BookingStatus) -> String {
    let variant = match status {
        BookingStatus::Pending => BadgeVariant::Warning,
        BookingStatus::Confirmed | BookingStatus::InProgress => BadgeVariant::Info,
        BookingStatus::Completed => BadgeVariant::Success,
        BookingStatus::Cancelled => BadgeVariant::Error,
        BookingStatus::Other(_) => BadgeVariant::Secondary,
    };
    badge(variant, &format::status_label(status.as_str()))
}

pub fn project_status(status: &ProjectStatus) -> String {
    let variant = match status {
        ProjectStatus::Planning => BadgeVariant::Secondary,
        ProjectStatus::Active => BadgeVariant::Info,
        ProjectStatus::OnHold => BadgeVariant::Warning,
        ProjectStatus::Completed => BadgeVariant::Success,
        ProjectStatus::Cancelled => BadgeVariant::Error,
        ProjectStatus::Other(_) => BadgeVariant::Default,
    };
    badge(variant, &format::status_label(status.as_str()))
}

pub fn role(role: Role) -> String {
    let variant = match role {
        Role::Admin => BadgeVariant::Error,
        Role::Staff => BadgeVariant::Info,
        Role::User => BadgeVariant::Secondary,
    };
    badge(variant, &format::status_label(role.as_str()))
}

pub fn active(is_active: bool) -> String {
    if is_active {
        badge(BadgeVariant::Success, "Active")
    } else {
        badge(BadgeVariant::Secondary, "Inactive")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_badges() {
        let html = booking_status(&BookingStatus::InProgress);
        assert_eq!(html, r#"<span class="badge badge-info">IN PROGRESS</span>"#);
        assert!(quotation_status(&QuotationStatus::Rejected).contains("badge-error"));
        assert!(quotation_status(&QuotationStatus::Other("odd".into())).contains("ODD"));
    }
}
