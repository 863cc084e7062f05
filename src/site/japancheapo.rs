use scraper::Html;

use crate::geo::{GeoPoint, LocationHint};
use crate::model::ContentKind;
use crate::site::{attr_values, non_empty, SiteAdapter};

const LIST_PAGES: usize = 48;

/// japancheapo.com place pages. Coordinates come from the info-box map link's
/// `center` query parameter.
pub struct JapanCheapo;

impl SiteAdapter for JapanCheapo {
    fn name(&self) -> &'static str {
        "japancheapo"
    }

    fn output_dir(&self) -> &'static str {
        "japancheapo/place"
    }

    fn content_kind(&self) -> ContentKind {
        ContentKind::Spot
    }

    fn seed_urls(&self) -> Vec<String> {
        (1..=LIST_PAGES)
            .map(|i| format!("https://japancheapo.com/place/page/{i}"))
            .collect()
    }

    fn detail_urls(&self, doc: &Html) -> Vec<String> {
        attr_values(doc, ".grid .article a", &["href"])
    }

    fn photo_urls(&self, doc: &Html) -> Option<Vec<String>> {
        non_empty(attr_values(doc, "#hero-img", &["src"]))
    }

    fn location(&self, doc: &Html) -> LocationHint {
        let Some(href) = attr_values(doc, ".section--info-box__map-link a", &["href"])
            .into_iter()
            .next()
        else {
            return LocationHint::Unknown;
        };
        let Ok(url) = url::Url::parse(&href) else {
            return LocationHint::Unknown;
        };

        let center = url
            .query_pairs()
            .find(|(k, _)| k == "center")
            .map(|(_, v)| v.into_owned());
        match center.and_then(|c| parse_center(&c)) {
            Some(point) => LocationHint::Coordinates(point),
            None => LocationHint::Unknown,
        }
    }
}

fn parse_center(center: &str) -> Option<GeoPoint> {
    let (lat, lng) = center.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;
    // keep the original truthiness check: a 0 coordinate is treated as absent
    if lat == 0.0 || lng == 0.0 {
        return None;
    }
    Some(GeoPoint { lat, lng })
}
