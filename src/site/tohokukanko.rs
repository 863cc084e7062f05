use std::time::Duration;

use scraper::{ElementRef, Html, Selector};

use crate::geo::LocationHint;
use crate::model::{ContentKind, Language};
use crate::site::{attr_values, non_empty, resolve_urls, SiteAdapter};
use crate::text;

const BASE: &str = "https://www.tohokukanko.jp/en/attractions/";
const SITE_ROOT: &str = "https://www.tohokukanko.jp";
const LIST_PAGES: usize = 76;

/// tohokukanko.jp attraction pages (English site, so the language is pinned).
/// No embedded coordinate; the address sits in a dt/dd definition list and is
/// geocoded by the orchestrator.
pub struct TohokuKanko;

impl SiteAdapter for TohokuKanko {
    fn name(&self) -> &'static str {
        "tohokukanko"
    }

    fn output_dir(&self) -> &'static str {
        "tohokukanko/attractions"
    }

    fn content_kind(&self) -> ContentKind {
        ContentKind::Spot
    }

    fn seed_urls(&self) -> Vec<String> {
        (1..=LIST_PAGES)
            .map(|i| format!("{BASE}index_{i}_2______0___.html"))
            .collect()
    }

    fn detail_urls(&self, doc: &Html) -> Vec<String> {
        resolve_urls(BASE, attr_values(doc, "#itemList a", &["href"]))
    }

    fn photo_urls(&self, doc: &Html) -> Option<Vec<String>> {
        non_empty(resolve_urls(
            SITE_ROOT,
            attr_values(doc, "#detailImage img", &["src", "data-src"]),
        ))
    }

    fn location(&self, doc: &Html) -> LocationHint {
        match address_from_definition_list(doc) {
            Some(address) => LocationHint::Address(address),
            None => LocationHint::Unknown,
        }
    }

    /// Titles look like "Spot Name｜Tohoku Tourism"; keep the first part.
    fn convert_title(&self, title: &str) -> String {
        match title.split('｜').next().map(str::trim) {
            Some(head) if !head.is_empty() => head.to_string(),
            _ => title.to_string(),
        }
    }

    fn pinned_language(&self) -> Option<Language> {
        Some(Language::En)
    }

    fn item_delay(&self) -> Duration {
        Duration::from_millis(0)
    }
}

/// Find the `<dd>` following the `<dt>` labelled "Address".
fn address_from_definition_list(doc: &Html) -> Option<String> {
    let dt_sel = Selector::parse("dt").unwrap();
    for dt in doc.select(&dt_sel) {
        let label = text::normalize(&dt.text().collect::<String>());
        if !label.contains("Address") {
            continue;
        }
        let dd = dt
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "dd")?;
        let address = text::normalize(&dd.text().collect::<String>());
        if !address.is_empty() {
            return Some(address);
        }
    }
    None
}
