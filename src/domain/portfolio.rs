//! Completed-work showcase.

use serde::{Deserialize, Serialize};

use super::de;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioImage {
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
pub struct PortfolioCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub project_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioProject {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default)]
    pub category_detail: Option<PortfolioCategory>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub client_logo: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub completion_date: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub order: i32,
    #[serde(default, deserialize_with = "de::null_default")]
    pub images: Vec<PortfolioImage>,
    #[serde(default)]
    pub primary_image: Option<PortfolioImage>,
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub meta_keywords: String,
}

impl PortfolioProject {
    /// Cover image path: the flagged primary, else the first image.
    pub fn cover(&self) -> Option<&str> {
        self.primary_image
            .as_ref()
            .or_else(|| self.images.iter().find(|img| img.is_primary))
            .or_else(|| self.images.first())
            .map(|img| img.image.as_str())
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category_detail.as_ref().map(|c| c.name.as_str())
    }
}

/// Query of `portfolio/projects/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PortfolioFilter {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub ordering: Option<String>,
}

impl PortfolioFilter {
    pub fn featured() -> Self {
        Self {
            is_featured: Some(true),
            ..Self::default()
        }
    }

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
            query.push(("category__slug", v));
        }
        if let Some(v) = self.is_featured {
            query.push(("is_featured", v.to_string()));
        }
        if let Some(v) = text(&self.search) {
            query.push(("search", v));
        }
        if let Some(v) = text(&self.ordering) {
            query.push(("ordering", v));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cover_falls_back_to_first_image() {
        let project: PortfolioProject = serde_json::from_value(json!({
            "id": 1, "title": "Factory Shed", "slug": "factory-shed",
            "images": [{ "id": 3, "image": "/media/portfolio/a.jpg" }],
            "primary_image": null
        }))
        .unwrap();
        assert_eq!(project.cover(), Some("/media/portfolio/a.jpg"));
    }

    #[test]
    fn category_filter_uses_slug_lookup() {
        let filter = PortfolioFilter {
            category: Some("industrial".into()),
            ..PortfolioFilter::featured()
        };
        assert_eq!(
            filter.to_query(),
            vec![
                ("category__slug", "industrial".to_string()),
                ("is_featured", "true".to_string())
            ]
        );
    }
}
