use std::time::Duration;

use scraper::Html;

use crate::geo::{GeoPoint, LocationHint};
use crate::model::ContentKind;
use crate::site::{attr_values, non_empty, resolve_urls, SiteAdapter};

const BASE: &str = "https://en.japantravel.com/";
const LIST_PAGES: usize = 1159;

/// en.japantravel.com article search pages. Coordinates are embedded as a
/// `data-center` attribute on the map element.
pub struct JapanTravel;

impl SiteAdapter for JapanTravel {
    fn name(&self) -> &'static str {
        "japantravel"
    }

    fn output_dir(&self) -> &'static str {
        "japantravel/article"
    }

    fn content_kind(&self) -> ContentKind {
        ContentKind::Article
    }

    fn seed_urls(&self) -> Vec<String> {
        (1..=LIST_PAGES)
            .map(|i| format!("{BASE}search?sort=relevance&type=article&p={i}"))
            .collect()
    }

    fn detail_urls(&self, doc: &Html) -> Vec<String> {
        resolve_urls(BASE, attr_values(doc, ".article-list > a", &["href"]))
    }

    fn photo_urls(&self, doc: &Html) -> Option<Vec<String>> {
        non_empty(attr_values(
            doc,
            ".article > :not(.article-user) img",
            &["src", "data-src"],
        ))
    }

    fn location(&self, doc: &Html) -> LocationHint {
        let Some(center) = attr_values(doc, "[data-center]", &["data-center"])
            .into_iter()
            .next()
        else {
            return LocationHint::Unknown;
        };

        let Some((lat, lng)) = center.split_once(',') else {
            return LocationHint::Unknown;
        };
        match (lat.trim().parse(), lng.trim().parse()) {
            (Ok(lat), Ok(lng)) => LocationHint::Coordinates(GeoPoint { lat, lng }),
            _ => LocationHint::Unknown,
        }
    }

    /// Titles look like "Some Article - Japan Travel"; keep the first part.
    fn convert_title(&self, title: &str) -> String {
        match title.split('-').next().map(str::trim) {
            Some(head) if !head.is_empty() => head.to_string(),
            _ => title.to_string(),
        }
    }

    fn item_delay(&self) -> Duration {
        Duration::from_millis(6000)
    }
}
