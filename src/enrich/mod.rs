pub mod google;
pub mod openai;

use anyhow::Result;
use async_trait::async_trait;

use crate::geo::GeoPoint;
use crate::model::Language;

/// Output of the summarize-and-categorize call: the rewritten description,
/// zero or more category names from the fixed vocabulary, and a best-guess
/// place name used for geocoding fallback.
#[derive(Debug, Clone)]
pub struct Summary {
    pub description: String,
    pub categories: Vec<String>,
    pub place_guess: String,
}

/// Detects the authored language of a page from its title and a snippet of
/// the description. `None` means no detectable language (INVALID_LANG).
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    async fn detect(&self, title: &str, snippet: &str) -> Result<Option<String>>;
}

/// LLM-backed summarizer/categorizer. Errors here are fatal to the run; the
/// implementation owns any retry/backoff it wants.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        title: &str,
        snippet: &str,
        length_instruction: &str,
    ) -> Result<Summary>;
}

/// Resolves a free-form place name to coordinates. `None` when nothing is
/// found (INVALID_LOCATION once all sources are exhausted).
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, place: &str) -> Result<Option<GeoPoint>>;
}

/// Machine translation between the supported languages. On service failure
/// implementations return the original texts rather than erroring.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, texts: &[String], from: Language, to: Language)
        -> Result<Vec<String>>;
}

/// Language-specific summary length instruction: ~400 chars for Japanese,
/// ~200 words for everything else.
pub fn length_instruction(detected_code: &str) -> &'static str {
    if detected_code.eq_ignore_ascii_case("ja") {
        "日本語で400文字程度で要約してください。"
    } else {
        "英語で200語程度で要約してください。"
    }
}
