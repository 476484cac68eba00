//! Buttons and button-styled links.

use crate::ui::escape;

/// Button visual variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    /// Primary action button.
    #[default]
    Primary,
    /// Secondary action button.
    Secondary,
    /// Subtle ghost button.
    Ghost,
    /// Destructive action button.
    Destructive,
    /// Outline button.
    Outline,
    /// Link-style button.
    Link,
}

impl ButtonVariant {
    /// Get CSS classes for this variant.
    #[must_use]
    pub fn classes(self) -> &'static str {
        match self {
            Self::Primary => "btn btn-primary",
            Self::Secondary => "btn btn-secondary",
            Self::Ghost => "btn btn-ghost",
            Self::Destructive => "btn btn-danger",
            Self::Outline => "btn btn-outline",
            Self::Link => "btn btn-link",
        }
    }
}

/// Button size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonSize {
    /// Small button.
    Sm,
    /// Medium button (default).
    #[default]
    Md,
    /// Large button.
    Lg,
}

impl ButtonSize {
    /// Get CSS classes for this size.
    #[must_use]
    pub fn classes(self) -> &'static str {
        match self {
            Self::Sm => "btn-sm",
            Self::Md => "",
            Self::Lg => "btn-lg",
        }
    }
}

/// `<button type="submit">`.
pub fn submit(label: &str, variant: ButtonVariant) -> String {
    format!(
        r#"<button type="submit" class="{}">{}</button>"#,
        variant.classes(),
        escape(label)
    )
}

/// An anchor styled as a button.
pub fn link(href: &str, label: &str, variant: ButtonVariant, size: ButtonSize) -> String {
    format!(
        r#"<a href="{}" class="{} {}">{}</a>"#,
        escape(href),
        variant.classes(),
        size.classes(),
        escape(label)
    )
}

/// Single-button POST form, confirmed in the browser before submitting.
///
/// Used for deletes and other one-click state changes.
pub fn post_action(action: &str, label: &str, variant: ButtonVariant, confirm: Option<&str>) -> String {
    let confirm = confirm
        .map(|message| format!(r#" hx-confirm="{}""#, escape(message)))
        .unwrap_or_default();
    format!(
        r#"<form method="post" action="{action}" class="inline-form"{confirm}><button type="submit" class="{classes} btn-sm">{label}</button></form>"#,
        action = escape(action),
        classes = variant.classes(),
        label = escape(label),
    )
}

/// Delete button with the standard confirmation prompt.
pub fn delete_action(action: &str, what: &str) -> String {
    post_action(
        action,
        "Delete",
        ButtonVariant::Destructive,
        Some(&format!("Are you sure you want to delete this {what}?")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_forms_confirm() {
        let html = delete_action("/dashboard/categories/4/delete", "category");
        assert!(html.contains(r#"action="/dashboard/categories/4/delete""#));
        assert!(html.contains("hx-confirm=\"Are you sure you want to delete this category?\""));
        assert!(html.contains("btn-danger"));
    }
}
