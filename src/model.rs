use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported content languages. `En` is the default base language; a detected
/// language outside this set never falls back to `Ja`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "EN")]
    En,
    #[serde(rename = "JA")]
    Ja,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ja];

    /// Lowercase ISO code used by the translation APIs.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ja => "ja",
        }
    }

    /// Uppercase tag used in the entity records.
    pub fn tag(self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Ja => "JA",
        }
    }

    pub fn parse(s: &str) -> Option<Language> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "ja" => Some(Language::Ja),
            _ => None,
        }
    }

    /// Base language for a detected language code: itself if supported,
    /// otherwise `En`.
    pub fn base_for(detected: &str) -> Language {
        Language::parse(detected).unwrap_or(Language::En)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    #[serde(rename = "ARTICLE")]
    Article,
    #[serde(rename = "SPOT")]
    Spot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentStatus {
    #[serde(rename = "PRIVATED")]
    Privated,
    #[serde(rename = "SUSPENDED")]
    Suspended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhotoKind {
    #[serde(rename = "PHOTO")]
    Photo,
    #[serde(rename = "THUMBNAIL")]
    Thumbnail,
}

/// Canonical record for one ingested source page. Exactly one per distinct
/// source URL; the URL is the dedup key even though `id` is the storage key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub id: String,
    pub content_url: String,
    pub base_language: Language,
    pub actual_language: String,
    pub status: ContentStatus,
    pub lat: f64,
    pub lng: f64,
}

/// One language rendition (title + description) of a Content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBody {
    pub id: String,
    pub title: String,
    pub description: String,
    pub language: Language,
    pub content_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentCategoryMapping {
    pub content_id: String,
    pub content_category_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPhoto {
    pub id: String,
    pub photo_url: String,
    #[serde(rename = "type")]
    pub kind: PhotoKind,
    pub order: usize,
    pub content_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentType {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub content_id: String,
}

/// Kind-specific detail row (`articles` / `spot_informations`). Carries no
/// fields of its own yet beyond the linkage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDetail {
    pub id: String,
    pub content_type_id: String,
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Fixed category vocabulary the summarizer picks from. Ids are the slugs.
pub const CONTENT_CATEGORIES: [&str; 17] = [
    "attractions",
    "castles",
    "cultural_sites",
    "historical_sites",
    "scenic_spots",
    "temples_and_shrines",
    "nature_and_outdoors",
    "experiences",
    "events",
    "lodging",
    "hot_springs",
    "food_and_drink",
    "transportation",
    "technology",
    "sports",
    "artisans",
    "anime",
];

/// Map a summarizer category name to its id; unknown names are dropped.
pub fn category_id(name: &str) -> Option<&'static str> {
    CONTENT_CATEGORIES.iter().find(|c| **c == name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_language_defaults_to_en_for_unsupported() {
        assert_eq!(Language::base_for("fr"), Language::En);
        assert_eq!(Language::base_for("FR"), Language::En);
        assert_eq!(Language::base_for("ja"), Language::Ja);
        assert_eq!(Language::base_for("JA"), Language::Ja);
        assert_eq!(Language::base_for("en"), Language::En);
    }

    #[test]
    fn content_serializes_with_upstream_field_names() {
        let content = Content {
            id: "c1".into(),
            content_url: "https://example.com/spot/1".into(),
            base_language: Language::Ja,
            actual_language: "JA".into(),
            status: ContentStatus::Privated,
            lat: 35.0,
            lng: 135.0,
        };
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["base_language"], "JA");
        assert_eq!(json["status"], "PRIVATED");
        assert_eq!(json["content_url"], "https://example.com/spot/1");
    }

    #[test]
    fn photo_and_type_use_type_field_name() {
        let photo = ContentPhoto {
            id: "p".into(),
            photo_url: "https://cdn/x.webp".into(),
            kind: PhotoKind::Thumbnail,
            order: 0,
            content_id: "c".into(),
        };
        assert_eq!(serde_json::to_value(&photo).unwrap()["type"], "THUMBNAIL");

        let ct = ContentType {
            id: "t".into(),
            kind: ContentKind::Spot,
            content_id: "c".into(),
        };
        assert_eq!(serde_json::to_value(&ct).unwrap()["type"], "SPOT");
    }

    #[test]
    fn category_lookup() {
        assert_eq!(category_id("temples_and_shrines"), Some("temples_and_shrines"));
        assert_eq!(category_id("nonsense"), None);
    }
}
