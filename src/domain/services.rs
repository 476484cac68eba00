//! Services the company advertises (fabrication, construction, furniture).

use serde::{Deserialize, Serialize};

use super::de;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceImage {
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
pub struct StoreService {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub icon_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub images: Vec<ServiceImage>,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub meta_keywords: String,
    #[serde(default)]
    pub focus_keyword: String,
}

impl StoreService {
    /// First gallery image, else the single cover image.
    pub fn cover(&self) -> Option<&str> {
        self.images
            .first()
            .map(|img| img.image.as_str())
            .or(self.image.as_deref())
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
    fn cover_prefers_gallery() {
        let service: StoreService = serde_json::from_value(json!({
            "id": 1, "title": "Welding", "image": "/media/services/w.jpg",
            "images": [{ "id": 9, "image": "/media/services/gallery/w1.jpg" }]
        }))
        .unwrap();
        assert_eq!(service.cover(), Some("/media/services/gallery/w1.jpg"));
        assert!(service.is_active);
    }
}
