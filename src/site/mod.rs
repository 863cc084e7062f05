mod gaijinpot;
mod japan_travel;
mod japancheapo;
mod japantravel;
mod tohokukanko;

use std::time::Duration;

use scraper::{ElementRef, Html, Selector};

use crate::geo::LocationHint;
use crate::model::{ContentKind, Language};

/// Source-specific behavior for one content site. Selected once at run start,
/// never mixed within a run.
pub trait SiteAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Run directory relative to the output root, e.g. `japancheapo/place`.
    fn output_dir(&self) -> &'static str;

    fn content_kind(&self) -> ContentKind;

    /// List (index) pages to crawl, in order.
    fn seed_urls(&self) -> Vec<String>;

    /// Detail-page links found on a list page.
    fn detail_urls(&self, doc: &Html) -> Vec<String>;

    /// Candidate photo URLs on a detail page. `None` or empty classifies the
    /// item as INVALID_PHOTO.
    fn photo_urls(&self, doc: &Html) -> Option<Vec<String>>;

    /// Page-embedded coordinate or address, if the site exposes one.
    fn location(&self, doc: &Html) -> LocationHint {
        let _ = doc;
        LocationHint::Unknown
    }

    /// Per-site title cleanup. Identity by default.
    fn convert_title(&self, title: &str) -> String {
        title.to_string()
    }

    /// Set when the source site is known to be monolingual; skips detection.
    fn pinned_language(&self) -> Option<Language> {
        None
    }

    /// Soft per-item latency floor.
    fn item_delay(&self) -> Duration {
        Duration::from_millis(1000)
    }
}

pub fn by_name(name: &str) -> Option<Box<dyn SiteAdapter>> {
    match name {
        "japancheapo" => Some(Box::new(japancheapo::JapanCheapo)),
        "japantravel" => Some(Box::new(japantravel::JapanTravel)),
        "gaijinpot" => Some(Box::new(gaijinpot::GaijinPot)),
        "tohokukanko" => Some(Box::new(tohokukanko::TohokuKanko)),
        "japan-travel" => Some(Box::new(japan_travel::LocalTreasures)),
        _ => None,
    }
}

pub fn names() -> [&'static str; 5] {
    [
        "japancheapo",
        "japantravel",
        "gaijinpot",
        "tohokukanko",
        "japan-travel",
    ]
}

/// First non-empty of the given attributes for every element matching the
/// selector.
pub(crate) fn attr_values(doc: &Html, selector: &str, attrs: &[&str]) -> Vec<String> {
    let sel = Selector::parse(selector).unwrap();
    doc.select(&sel)
        .filter_map(|el| first_attr(&el, attrs))
        .collect()
}

pub(crate) fn first_attr(el: &ElementRef, attrs: &[&str]) -> Option<String> {
    attrs
        .iter()
        .filter_map(|a| el.value().attr(a))
        .map(str::to_string)
        .find(|v| !v.is_empty())
}

/// Resolve hrefs against a base URL, dropping ones that cannot resolve.
pub(crate) fn resolve_urls(base: &str, hrefs: Vec<String>) -> Vec<String> {
    let Ok(base) = url::Url::parse(base) else {
        return hrefs;
    };
    hrefs
        .into_iter()
        .filter_map(|href| base.join(&href).ok())
        .map(String::from)
        .collect()
}

pub(crate) fn non_empty(urls: Vec<String>) -> Option<Vec<String>> {
    if urls.is_empty() {
        None
    } else {
        Some(urls)
    }
}
