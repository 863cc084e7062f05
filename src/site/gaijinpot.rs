use scraper::{Html, Selector};

use crate::geo::{self, LocationHint};
use crate::model::ContentKind;
use crate::site::{attr_values, SiteAdapter};

const LIST_PAGES: usize = 57;

/// travel.gaijinpot.com traditional-category articles. The coordinate hides
/// in a Google Maps embed iframe; the single photo is the hero block's
/// background image.
pub struct GaijinPot;

impl SiteAdapter for GaijinPot {
    fn name(&self) -> &'static str {
        "gaijinpot"
    }

    fn output_dir(&self) -> &'static str {
        "travel.gaijinpot"
    }

    fn content_kind(&self) -> ContentKind {
        ContentKind::Article
    }

    fn seed_urls(&self) -> Vec<String> {
        (1..=LIST_PAGES)
            .map(|i| format!("https://travel.gaijinpot.com/category/traditional/page/{i}/"))
            .collect()
    }

    fn detail_urls(&self, doc: &Html) -> Vec<String> {
        attr_values(doc, ".content row a", &["href"])
    }

    fn photo_urls(&self, doc: &Html) -> Option<Vec<String>> {
        let sel = Selector::parse(".hero").unwrap();
        let style = doc.select(&sel).next()?.value().attr("style")?;
        geo::background_image_url(style).map(|url| vec![url])
    }

    fn location(&self, doc: &Html) -> LocationHint {
        let Some(src) = attr_values(doc, "embed-responsive iframe", &["src"])
            .into_iter()
            .next()
        else {
            return LocationHint::Unknown;
        };
        match geo::extract_latlng(&src) {
            Some(point) => LocationHint::Coordinates(point),
            None => LocationHint::Unknown,
        }
    }
}
