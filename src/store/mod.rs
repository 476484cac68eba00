//! Per-session state container.
//!
//! Each visitor session owns one [`Store`]: the lists and records fetched for
//! the screens they have opened, with loading and error flags. Handlers load a
//! slice on entry, render from it, and patch it after a successful write
//! instead of refetching where the backend echoes the record.

mod keys;
mod slice;

use std::collections::HashMap;
use std::hash::Hash;

pub use slice::{Keyed, Resource, Slice};

use crate::domain::{
    Address, AdminUser, AnalyticsData, Category, DashboardOverview, Material, PortfolioCategory,
    PortfolioProject, ProductDetail, ProductListItem, Project, QuotationRequest, ServiceBooking,
    StaffProfile, StoreService, UserStats,
};

#[derive(Debug, Clone, Default)]
pub struct Store {
    pub categories: Slice<Category>,
    pub materials: Slice<Material>,
    pub products: Slice<ProductListItem>,
    pub current_product: Resource<ProductDetail>,
    pub services: Slice<StoreService>,
    pub quotations: Slice<QuotationRequest>,
    pub bookings: Slice<ServiceBooking>,
    pub portfolio: Slice<PortfolioProject>,
    pub portfolio_categories: Slice<PortfolioCategory>,
    pub staff: Slice<StaffProfile>,
    pub projects: Slice<Project>,
    pub users: Slice<AdminUser>,
    pub addresses: Slice<Address>,
    pub analytics: Resource<AnalyticsData>,
    pub overview: Resource<DashboardOverview>,
    pub user_stats: Resource<UserStats>,
}

/// Items where any of `fields` contains `query`, ignoring case. A blank query
/// matches everything.
pub fn filter_by_text<'a, T, F>(items: &'a [T], query: &str, fields: F) -> Vec<&'a T>
where
    F: Fn(&T) -> Vec<&str>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| {
            fields(item)
                .into_iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Number of items per status.
pub fn count_by_status<T, S, F>(items: &[T], status: F) -> HashMap<S, usize>
where
    S: Eq + Hash,
    F: Fn(&T) -> S,
{
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(status(item)).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QuotationStatus;
    use serde_json::json;

    fn categories() -> Vec<Category> {
        serde_json::from_value(json!([
            { "id": 1, "name": "Steel Gates", "slug": "steel-gates", "description": "Sliding and swing" },
            { "id": 2, "name": "Railings", "slug": "railings" }
        ]))
        .unwrap()
    }

    #[test]
    fn text_filter_is_case_insensitive() {
        let items = categories();
        let by_name = filter_by_text(&items, "GATE", |c| vec![c.name.as_str()]);
        assert_eq!(by_name.len(), 1);

        let by_description = filter_by_text(&items, "swing", |c| {
            vec![c.name.as_str(), c.description.as_deref().unwrap_or_default()]
        });
        assert_eq!(by_description[0].id, 1);

        assert_eq!(filter_by_text(&items, "  ", |c| vec![c.name.as_str()]).len(), 2);
    }

    #[test]
    fn counts_group_statuses() {
        let quotes: Vec<QuotationRequest> = serde_json::from_value(json!([
            { "id": 1, "status": "pending" },
            { "id": 2, "status": "approved" },
            { "id": 3, "status": "pending" }
        ]))
        .unwrap();

        let counts = count_by_status(&quotes, |q| q.status.clone());
        assert_eq!(counts.get(&QuotationStatus::Pending), Some(&2));
        assert_eq!(counts.get(&QuotationStatus::Accepted), Some(&1));
        assert_eq!(counts.get(&QuotationStatus::Rejected), None);
    }

    #[test]
    fn products_patch_by_slug() {
        let mut store = Store::default();
        let products: Vec<ProductListItem> = serde_json::from_value(json!([
            { "id": 1, "name": "Gate", "slug": "gate" },
            { "id": 2, "name": "Rail", "slug": "rail" }
        ]))
        .unwrap();
        store.products.fulfilled(products, 2);

        store.products.removed(&"gate".to_string());
        assert_eq!(store.products.items.len(), 1);
        assert_eq!(store.products.items[0].slug, "rail");
    }
}
