//! Product catalog: categories, materials, products and reviews.

use serde::{Deserialize, Serialize};

use super::de;

/// Product category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub image: Option<String>,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de::null_default")]
    pub product_count: u32,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Raw material a product can be made from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Material {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub image: Option<String>,
    #[serde(default = "active")]
    pub is_active: bool,
}

/// The list endpoint sends the category name, the detail endpoint the full
/// object, and write responses the bare id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CategoryRef {
    Detail(Box<Category>),
    Name(String),
    Id(i64),
}

impl CategoryRef {
    /// Human label, `None` for a bare id.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Detail(category) => Some(&category.name),
            Self::Name(name) => Some(name),
            Self::Id(_) => None,
        }
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Detail(category) => Some(category.id),
            Self::Id(id) => Some(*id),
            Self::Name(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductImage {
    pub id: i64,
    pub image: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Specification {
    pub id: i64,
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: i64,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub user_avatar: Option<String>,
    pub rating: u8,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub title: Option<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub is_verified_purchase: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Row of the product list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductListItem {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub description: Option<String>,
    #[serde(default = "standard_type")]
    pub product_type: String,
    #[serde(default, deserialize_with = "de::decimal")]
    pub base_price: String,
    #[serde(default = "active")]
    pub is_price_visible: bool,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub primary_image: Option<String>,
    #[serde(default)]
    pub is_customizable: bool,
    #[serde(default = "active")]
    pub is_in_stock: bool,
    #[serde(default)]
    pub is_low_stock: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "de::null_default")]
    pub average_rating: f64,
    #[serde(default, deserialize_with = "de::null_default")]
    pub review_count: u32,
}

/// Full product record from `GET products/{slug}/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub summary: ProductListItem,
    #[serde(default, deserialize_with = "de::null_default")]
    pub images: Vec<ProductImage>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub materials: Vec<Material>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub specifications: Vec<Specification>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub reviews: Vec<Review>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub length: Option<String>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub width: Option<String>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub height: Option<String>,
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub weight: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub customization_note: Option<String>,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub low_stock_threshold: Option<i64>,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "de::null_default")]
    pub meta_description: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub meta_keywords: String,
}

impl ProductDetail {
    /// Primary image first, then by explicit order.
    pub fn gallery(&self) -> Vec<&ProductImage> {
        let mut images: Vec<&ProductImage> = self.images.iter().collect();
        images.sort_by_key(|img| (!img.is_primary, img.order));
        images
    }
}

/// Query parameters accepted by `GET products/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl ProductFilter {
    /// Query pairs with blank text filters dropped.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        let text = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
        };
        if let Some(v) = text(&self.category) {
            query.push(("category", v));
        }
        if let Some(v) = self.is_featured {
            query.push(("is_featured", v.to_string()));
        }
        if let Some(v) = text(&self.product_type) {
            query.push(("product_type", v));
        }
        if let Some(v) = self.min_price {
            query.push(("min_price", v.to_string()));
        }
        if let Some(v) = self.max_price {
            query.push(("max_price", v.to_string()));
        }
        if let Some(v) = self.in_stock {
            query.push(("in_stock", v.to_string()));
        }
        if let Some(v) = text(&self.search) {
            query.push(("search", v));
        }
        if let Some(v) = text(&self.ordering) {
            query.push(("ordering", v));
        }
        if let Some(v) = self.page {
            query.push(("page", v.to_string()));
        }
        if let Some(v) = self.page_size {
            query.push(("page_size", v.to_string()));
        }
        query
    }
}

/// Body of `POST products/{slug}/reviews/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewPayload {
    pub rating: u8,
    #[serde(default)]
    pub title: String,
    pub comment: String,
}

fn active() -> bool {
    true
}

fn standard_type() -> String {
    "standard".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_ref_accepts_all_shapes() {
        let list: ProductListItem = serde_json::from_value(json!({
            "id": 1, "name": "Gate", "slug": "gate", "category": "Gates"
        }))
        .unwrap();
        let detail: ProductListItem = serde_json::from_value(json!({
            "id": 1, "name": "Gate", "slug": "gate",
            "category": { "id": 4, "name": "Gates", "slug": "gates" }
        }))
        .unwrap();
        let bare: ProductListItem = serde_json::from_value(json!({
            "id": 1, "name": "Gate", "slug": "gate", "category": 4
        }))
        .unwrap();

        assert_eq!(list.category.unwrap().label(), Some("Gates"));
        assert_eq!(detail.category.as_ref().and_then(CategoryRef::id), Some(4));
        assert_eq!(bare.category.unwrap().label(), None);
    }

    #[test]
    fn gallery_puts_primary_first() {
        let detail: ProductDetail = serde_json::from_value(json!({
            "id": 1, "name": "Gate", "slug": "gate",
            "images": [
                { "id": 10, "image": "/media/a.jpg", "order": 0 },
                { "id": 11, "image": "/media/b.jpg", "order": 1, "is_primary": true }
            ]
        }))
        .unwrap();

        let ids: Vec<i64> = detail.gallery().iter().map(|img| img.id).collect();
        assert_eq!(ids, vec![11, 10]);
    }

    #[test]
    fn filter_drops_blank_text() {
        let filter = ProductFilter {
            search: Some("  ".into()),
            category: Some("gates".into()),
            page: Some(2),
            ..ProductFilter::default()
        };
        assert_eq!(
            filter.to_query(),
            vec![("category", "gates".to_string()), ("page", "2".to_string())]
        );
    }
}
