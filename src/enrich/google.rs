use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::enrich::{Geocoder, LanguageDetector, Translator};
use crate::geo::GeoPoint;
use crate::model::Language;

const TRANSLATE_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";
const GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Google Translate v2 client covering both language detection and
/// translation.
pub struct GoogleTranslate {
    client: reqwest::Client,
    api_key: String,
}

impl GoogleTranslate {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct DetectResponse {
    data: DetectData,
}

#[derive(Deserialize)]
struct DetectData {
    detections: Vec<Vec<Detection>>,
}

#[derive(Deserialize)]
struct Detection {
    language: String,
    #[serde(default)]
    confidence: f64,
}

#[async_trait]
impl LanguageDetector for GoogleTranslate {
    /// Detect on title and snippet separately and keep the
    /// higher-confidence result.
    async fn detect(&self, title: &str, snippet: &str) -> Result<Option<String>> {
        let res: DetectResponse = self
            .client
            .post(format!("{TRANSLATE_ENDPOINT}/detect"))
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({ "q": [title, snippet] }))
            .send()
            .await
            .context("language detect request")?
            .error_for_status()
            .context("language detect request")?
            .json()
            .await
            .context("parse language detect response")?;

        let mut per_input = res.data.detections.into_iter();
        let title_result = per_input.next().and_then(|d| d.into_iter().next());
        let snippet_result = per_input.next().and_then(|d| d.into_iter().next());

        let (title_result, snippet_result) = match (title_result, snippet_result) {
            (Some(t), Some(s)) => (t, s),
            _ => return Ok(None),
        };

        let best = if title_result.confidence > snippet_result.confidence {
            title_result
        } else {
            snippet_result
        };
        Ok(Some(best.language))
    }
}

#[derive(Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct Translation {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[async_trait]
impl Translator for GoogleTranslate {
    /// Translation failures degrade to the original inputs; the caller drops
    /// the language only when the service returns empty strings.
    async fn translate(
        &self,
        texts: &[String],
        from: Language,
        to: Language,
    ) -> Result<Vec<String>> {
        let request = self
            .client
            .post(TRANSLATE_ENDPOINT)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "q": texts,
                "source": from.code(),
                "target": to.code(),
                "format": "text",
            }));

        let translated = async {
            let res: TranslateResponse = request
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            Ok::<_, reqwest::Error>(res)
        }
        .await;

        match translated {
            Ok(res) => Ok(res
                .data
                .translations
                .into_iter()
                .map(|t| t.translated_text)
                .collect()),
            Err(e) => {
                warn!("translate {} -> {} failed: {}", from.code(), to.code(), e);
                Ok(texts.to_vec())
            }
        }
    }
}

/// Google Maps Geocoding, biased to Japan.
pub struct GoogleGeocoder {
    client: reqwest::Client,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, place: &str) -> Result<Option<GeoPoint>> {
        if place.trim().is_empty() {
            return Ok(None);
        }

        let res: GeocodeResponse = self
            .client
            .get(GEOCODE_ENDPOINT)
            .query(&[
                ("address", place),
                ("region", "jp"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("geocode request")?
            .error_for_status()
            .context("geocode request")?
            .json()
            .await
            .context("parse geocode response")?;

        Ok(res
            .results
            .first()
            .map(|r| GeoPoint {
                lat: r.geometry.location.lat,
                lng: r.geometry.location.lng,
            }))
    }
}
