use scraper::{Html, Selector};

use crate::geo;
use crate::model::ContentKind;
use crate::site::{attr_values, resolve_urls, SiteAdapter};

const SITE_ROOT: &str = "https://www.japan.travel";

/// japan.travel "Japan's Local Treasures": a single list page, one poster
/// photo per spot taken from the slider's background image.
pub struct LocalTreasures;

impl SiteAdapter for LocalTreasures {
    fn name(&self) -> &'static str {
        "japan-travel"
    }

    fn output_dir(&self) -> &'static str {
        "japan.travel"
    }

    fn content_kind(&self) -> ContentKind {
        ContentKind::Spot
    }

    fn seed_urls(&self) -> Vec<String> {
        vec![format!("{SITE_ROOT}/en/japans-local-treasures/all/")]
    }

    fn detail_urls(&self, doc: &Html) -> Vec<String> {
        resolve_urls(SITE_ROOT, attr_values(doc, "related-articles a", &["href"]))
    }

    fn photo_urls(&self, doc: &Html) -> Option<Vec<String>> {
        let sel = Selector::parse(".mod-slider-video__poster").unwrap();
        let style = doc.select(&sel).next()?.value().attr("style")?;
        geo::background_image_url(style).map(|url| vec![url])
    }
}
