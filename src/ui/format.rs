//! Display formatting for backend values.

use crate::domain::ProductListItem;

pub const NOT_AVAILABLE: &str = "N/A";
pub const DASH: &str = "\u{2014}";

/// "Price on request" when hidden or unset, else `Rs. {price}`.
pub fn price(product: &ProductListItem) -> String {
    let amount = product.base_price.trim();
    if !product.is_price_visible || amount.is_empty() || amount.parse::<f64>().is_ok_and(|p| p <= 0.0) {
        return "Price on request".to_string();
    }
    format!("Rs. {amount}")
}

/// `Rs. {amount}` for optional decimals.
pub fn money(amount: Option<&str>) -> String {
    match amount.map(str::trim).filter(|a| !a.is_empty()) {
        Some(amount) => format!("Rs. {amount}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Five-star rating rounded to the nearest whole star.
pub fn stars(rating: f64) -> String {
    let filled = rating.clamp(0.0, 5.0).round() as usize;
    format!("{}{}", "\u{2605}".repeat(filled), "\u{2606}".repeat(5 - filled))
}

/// Date part of an ISO timestamp.
pub fn date(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => d.get(..10).unwrap_or(d).to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(NOT_AVAILABLE)
}

/// Free text falls back to an em dash.
pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(DASH)
}

/// `in_progress` → `IN PROGRESS`; blank → `PENDING`.
pub fn status_label(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "PENDING".to_string();
    }
    raw.replace('_', " ").to_uppercase()
}

/// Truncates on a char boundary, appending an ellipsis.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}\u{2026}", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(price: serde_json::Value, visible: bool) -> ProductListItem {
        serde_json::from_value(json!({
            "id": 1, "name": "Gate", "slug": "gate",
            "base_price": price, "is_price_visible": visible
        }))
        .unwrap()
    }

    #[test]
    fn hidden_prices() {
        assert_eq!(price(&product(json!("15000.00"), true)), "Rs. 15000.00");
        assert_eq!(price(&product(json!("15000.00"), false)), "Price on request");
        assert_eq!(price(&product(json!(null), true)), "Price on request");
    }

    #[test]
    fn display_defaults() {
        assert_eq!(date(Some("2024-03-01T10:00:00Z")), "2024-03-01");
        assert_eq!(date(None), "N/A");
        assert_eq!(or_na(Some(" ")), "N/A");
        assert_eq!(or_dash(None), "\u{2014}");
        assert_eq!(status_label("in_progress"), "IN PROGRESS");
        assert_eq!(status_label(""), "PENDING");
        assert_eq!(money(Some("2500")), "Rs. 2500");
    }

    #[test]
    fn stars_round() {
        assert_eq!(stars(4.4), "\u{2605}\u{2605}\u{2605}\u{2605}\u{2606}");
        assert_eq!(stars(9.0).chars().count(), 5);
    }

    #[test]
    fn excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("नमस्ते संसार", 3).chars().count(), 4);
    }
}
