use std::time::{Duration, Instant};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use scraper::Html;
use tracing::{error, info, warn};

use crate::enrich::{length_instruction, Geocoder, LanguageDetector, Summarizer, Translator};
use crate::failure::FailureKind;
use crate::fetch::{fetch_images, PageFetcher};
use crate::geo::{GeoPoint, LocationHint};
use crate::model::{
    category_id, new_id, Content, ContentBody, ContentCategoryMapping, ContentKind, ContentStatus,
    ContentType, Language, TypeDetail,
};
use crate::output::RunOutput;
use crate::photo;
use crate::site::SiteAdapter;
use crate::state::DoneLog;
use crate::storage::PhotoStorage;
use crate::text;

/// Storage namespace photos are filed under.
const STORAGE_NAMESPACE: &str = "mapzamurai";

/// Snippet sizes handed to the enrichment services.
const DETECT_SNIPPET_CHARS: usize = 200;
const SUMMARY_SNIPPET_CHARS: usize = 2000;

/// Run-level knobs. Everything falls back to the adapter's own defaults.
pub struct CrawlPolicy {
    /// Per-item latency floor; overrides the adapter's delay.
    pub interval: Option<Duration>,
    /// Pin the run to one language, skipping detection; overrides the adapter.
    pub pinned_language: Option<Language>,
    /// Keep items whose photo set came back incomplete (the default).
    pub accept_partial_photos: bool,
    /// Max detail items to process this run.
    pub limit: Option<usize>,
}

impl Default for CrawlPolicy {
    fn default() -> Self {
        Self {
            interval: None,
            pinned_language: None,
            accept_partial_photos: true,
            limit: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct CrawlStats {
    pub lists: usize,
    pub items: usize,
    pub completed: usize,
    pub skipped: usize,
}

enum ItemOutcome {
    Completed,
    Skipped(FailureKind),
}

/// The ingestion orchestrator: drives one page at a time through extraction,
/// enrichment, photo handling and durable output, strictly sequentially so
/// the done-log and report order stay deterministic and the shared fetching
/// session is rate-limit friendly.
pub struct Crawler {
    pub adapter: Box<dyn SiteAdapter>,
    pub fetcher: Box<dyn PageFetcher>,
    pub detector: Box<dyn LanguageDetector>,
    pub summarizer: Box<dyn Summarizer>,
    pub geocoder: Box<dyn Geocoder>,
    pub translator: Box<dyn Translator>,
    pub storage: Box<dyn PhotoStorage>,
    pub output: RunOutput,
    pub done: DoneLog,
    pub policy: CrawlPolicy,
}

impl Crawler {
    pub async fn run(&mut self) -> Result<CrawlStats> {
        let mut stats = CrawlStats::default();
        let seeds = self.adapter.seed_urls();
        info!(
            "crawling {} ({} list pages, {} keys already done)",
            self.adapter.name(),
            seeds.len(),
            self.done.len()
        );

        'run: for (i, list_url) in seeds.iter().enumerate() {
            if self.done.is_done(list_url) {
                continue;
            }
            info!("list {}/{}: {}", i + 1, seeds.len(), list_url);

            let html = self.fetcher.get_html(list_url).await?;
            let detail_urls = {
                let doc = Html::parse_document(&html);
                self.adapter.detail_urls(&doc)
            };
            stats.lists += 1;

            let pb = ProgressBar::new(detail_urls.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40} {pos}/{len}")?
                    .progress_chars("=> "),
            );

            for url in &detail_urls {
                if self.done.is_done(url) {
                    pb.inc(1);
                    continue;
                }
                if let Some(limit) = self.policy.limit {
                    if stats.items >= limit {
                        pb.finish_and_clear();
                        info!("item limit {} reached", limit);
                        break 'run;
                    }
                }

                info!("start: {}", url);
                let start = Instant::now();
                stats.items += 1;

                match self.process_detail(url).await? {
                    ItemOutcome::Completed => {
                        // The mark is the commit record; it must be the last
                        // write for this key.
                        self.done.mark_done(url)?;
                        stats.completed += 1;

                        let elapsed = start.elapsed();
                        info!("done: {} ({:.1}s)", url, elapsed.as_secs_f64());
                        if let Some(pause) = self.item_delay().checked_sub(elapsed) {
                            if !pause.is_zero() {
                                tokio::time::sleep(pause).await;
                            }
                        }
                    }
                    ItemOutcome::Skipped(kind) => {
                        stats.skipped += 1;
                        warn!("skipped {} ({})", url, kind);
                    }
                }
                pb.inc(1);
            }

            pb.finish_and_clear();
            self.done.mark_done(list_url)?;
        }

        let exported = self.output.export_csv()?;
        info!(
            "run finished: {} items ({} completed, {} skipped), {} csv exports",
            stats.items,
            stats.completed,
            stats.skipped,
            exported.len()
        );
        Ok(stats)
    }

    /// The per-item state machine. `Skipped` aborts only this item; `Err`
    /// aborts the run (no retry policy at this level).
    async fn process_detail(&self, url: &str) -> Result<ItemOutcome> {
        let html = self.fetcher.get_html(url).await?;
        let (info, photo_candidates, location_hint) = {
            let doc = Html::parse_document(&html);
            (
                text::extract_text_info(&doc),
                self.adapter.photo_urls(&doc),
                self.adapter.location(&doc),
            )
        };

        let Some(info) = info else {
            return self.skip(FailureKind::InvalidUrl, url);
        };
        let title = self.adapter.convert_title(&info.title);

        let Some(candidates) = photo_candidates.filter(|c| !c.is_empty()) else {
            return self.skip(FailureKind::InvalidPhoto, url);
        };

        let blobs = fetch_images(self.fetcher.as_ref(), &candidates).await;
        if blobs.len() < candidates.len() {
            warn!(
                "{}: {}/{} photo candidates failed",
                url,
                candidates.len() - blobs.len(),
                candidates.len()
            );
            self.output.append_report(FailureKind::InvalidFetchPhoto, url)?;
            if !self.policy.accept_partial_photos {
                return Ok(ItemOutcome::Skipped(FailureKind::InvalidFetchPhoto));
            }
        }

        let lang = match self.pinned_language() {
            Some(lang) => lang.code().to_string(),
            None => {
                let snippet = text::char_prefix(&info.description, DETECT_SNIPPET_CHARS);
                match self.detector.detect(&title, &snippet).await? {
                    Some(lang) => lang,
                    None => return self.skip(FailureKind::InvalidLang, url),
                }
            }
        };

        let summary = self
            .summarizer
            .summarize(
                &title,
                &text::char_prefix(&info.description, SUMMARY_SNIPPET_CHARS),
                length_instruction(&lang),
            )
            .await?;

        let Some(point) = self.resolve_location(&location_hint, &summary.place_guess).await? else {
            return self.skip(FailureKind::InvalidLocation, url);
        };

        let actual_language = lang.to_uppercase();
        let base_language = Language::base_for(&lang);
        let content_id = new_id();

        let bodies = self
            .expand_bodies(url, &title, &summary.description, base_language, &content_id)
            .await?;

        let photo_rows = match photo::upload_content_photos(
            self.storage.as_ref(),
            &blobs,
            STORAGE_NAMESPACE,
            &content_id,
        )
        .await
        {
            Ok(rows) => rows,
            Err(e) => {
                error!("photo upload failed for {}: {}", url, e);
                return self.skip(FailureKind::UploadError, url);
            }
        };

        let content = Content {
            id: content_id.clone(),
            content_url: url.to_string(),
            base_language,
            actual_language,
            status: ContentStatus::Privated,
            lat: point.lat,
            lng: point.lng,
        };

        let mappings: Vec<ContentCategoryMapping> = summary
            .categories
            .iter()
            .filter_map(|name| category_id(name))
            .map(|id| ContentCategoryMapping {
                content_id: content_id.clone(),
                content_category_id: id.to_string(),
            })
            .collect();

        let content_type = ContentType {
            id: new_id(),
            kind: self.adapter.content_kind(),
            content_id: content_id.clone(),
        };
        let type_detail = TypeDetail {
            id: new_id(),
            content_type_id: content_type.id.clone(),
        };

        // Entity writes happen in a fixed order, and only after every step up
        // to and including photo upload has succeeded.
        self.output.append_one("contents", &content)?;
        self.output.append_many("content_bodies", &bodies)?;
        self.output.append_many("content_category_mappings", &mappings)?;
        self.output.append_many("content_photos", &photo_rows)?;
        self.output.append_one("content_types", &content_type)?;
        let detail_log = match self.adapter.content_kind() {
            ContentKind::Article => "articles",
            ContentKind::Spot => "spot_informations",
        };
        self.output.append_one(detail_log, &type_detail)?;

        Ok(ItemOutcome::Completed)
    }

    /// One body in the base language plus one machine translation per
    /// remaining supported language. A translation that fails to produce
    /// non-empty output is dropped, not repaired.
    async fn expand_bodies(
        &self,
        url: &str,
        title: &str,
        description: &str,
        base_language: Language,
        content_id: &str,
    ) -> Result<Vec<ContentBody>> {
        let description = text::truncate_description(description);

        let mut bodies = vec![ContentBody {
            id: new_id(),
            title: title.to_string(),
            description: description.clone(),
            language: base_language,
            content_id: content_id.to_string(),
        }];

        for target in Language::ALL.into_iter().filter(|l| *l != base_language) {
            let texts = [title.to_string(), description.clone()];
            let translated = self.translator.translate(&texts, base_language, target).await?;
            match (translated.first(), translated.get(1)) {
                (Some(t), Some(d)) if !t.is_empty() && !d.is_empty() => {
                    bodies.push(ContentBody {
                        id: new_id(),
                        title: t.clone(),
                        description: d.clone(),
                        language: target,
                        content_id: content_id.to_string(),
                    });
                }
                _ => warn!("dropping empty {} translation for {}", target.tag(), url),
            }
        }

        Ok(bodies)
    }

    /// Page-embedded coordinate first, then geocoding (adapter address, then
    /// the summarizer's place guess).
    async fn resolve_location(
        &self,
        hint: &LocationHint,
        place_guess: &str,
    ) -> Result<Option<GeoPoint>> {
        match hint {
            LocationHint::Coordinates(point) => Ok(Some(*point)),
            LocationHint::Address(address) => {
                if let Some(point) = self.geocoder.geocode(address).await? {
                    return Ok(Some(point));
                }
                self.geocoder.geocode(place_guess).await
            }
            LocationHint::Unknown => self.geocoder.geocode(place_guess).await,
        }
    }

    fn skip(&self, kind: FailureKind, url: &str) -> Result<ItemOutcome> {
        self.output.append_report(kind, url)?;
        Ok(ItemOutcome::Skipped(kind))
    }

    fn pinned_language(&self) -> Option<Language> {
        self.policy.pinned_language.or_else(|| self.adapter.pinned_language())
    }

    fn item_delay(&self) -> Duration {
        self.policy.interval.unwrap_or_else(|| self.adapter.item_delay())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::Summary;
    use crate::fetch::ImageBlob;
    use crate::storage::{StorageError, UploadedObject};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::path::Path;

    const LIST_URL: &str = "https://travel.example.com/list";
    const DETAIL_URL: &str = "https://travel.example.com/spots/sample-temple";

    struct TestSite;

    impl SiteAdapter for TestSite {
        fn name(&self) -> &'static str {
            "test-site"
        }
        fn output_dir(&self) -> &'static str {
            "test-site"
        }
        fn content_kind(&self) -> ContentKind {
            ContentKind::Spot
        }
        fn seed_urls(&self) -> Vec<String> {
            vec![LIST_URL.to_string()]
        }
        fn detail_urls(&self, doc: &Html) -> Vec<String> {
            crate::site::attr_values(doc, "a.detail", &["href"])
        }
        fn photo_urls(&self, doc: &Html) -> Option<Vec<String>> {
            let urls = crate::site::attr_values(doc, "img.photo", &["src"]);
            if urls.is_empty() {
                None
            } else {
                Some(urls)
            }
        }
    }

    struct StubFetcher {
        pages: HashMap<String, String>,
        images: HashMap<String, ImageBlob>,
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn get_html(&self, url: &str) -> Result<String> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no fixture page for {url}"))
        }
        async fn fetch_image(&self, url: &str) -> Option<ImageBlob> {
            self.images.get(url).cloned()
        }
    }

    struct StubDetector(Option<String>);

    #[async_trait]
    impl LanguageDetector for StubDetector {
        async fn detect(&self, _title: &str, _snippet: &str) -> Result<Option<String>> {
            Ok(self.0.clone())
        }
    }

    struct StubSummarizer;

    #[async_trait]
    impl Summarizer for StubSummarizer {
        async fn summarize(
            &self,
            _title: &str,
            _snippet: &str,
            _length_instruction: &str,
        ) -> Result<Summary> {
            Ok(Summary {
                description: "A calm temple. ".repeat(40).trim_end().to_string(),
                categories: vec!["attractions".into(), "not_a_category".into()],
                place_guess: "Sample Temple".into(),
            })
        }
    }

    struct StubGeocoder(Option<GeoPoint>);

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn geocode(&self, _place: &str) -> Result<Option<GeoPoint>> {
            Ok(self.0)
        }
    }

    struct StubTranslator;

    #[async_trait]
    impl Translator for StubTranslator {
        async fn translate(
            &self,
            texts: &[String],
            _from: Language,
            to: Language,
        ) -> Result<Vec<String>> {
            Ok(texts
                .iter()
                .map(|t| format!("{}:{}", to.code(), t))
                .collect())
        }
    }

    struct MemoryStorage;

    #[async_trait]
    impl PhotoStorage for MemoryStorage {
        async fn upload(
            &self,
            path: &str,
            _bytes: Vec<u8>,
            _content_type: &str,
        ) -> Result<UploadedObject, StorageError> {
            Ok(UploadedObject {
                id: new_id(),
                public_url: format!("mem://{path}"),
            })
        }
    }

    struct FailingStorage;

    #[async_trait]
    impl PhotoStorage for FailingStorage {
        async fn upload(
            &self,
            path: &str,
            _bytes: Vec<u8>,
            _content_type: &str,
        ) -> Result<UploadedObject, StorageError> {
            Err(StorageError::Rejected {
                path: path.to_string(),
                message: "quota exceeded".into(),
            })
        }
    }

    fn png_blob(name: &str) -> ImageBlob {
        let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([1, 2, 3, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        ImageBlob {
            name: name.to_string(),
            content_type: "image/png".to_string(),
            bytes,
        }
    }

    fn list_page() -> String {
        format!(r#"<html><body><a class="detail" href="{DETAIL_URL}">spot</a></body></html>"#)
    }

    fn detail_page(photo_urls: &[&str]) -> String {
        let imgs: String = photo_urls
            .iter()
            .map(|u| format!(r#"<img class="photo" src="{u}">"#))
            .collect();
        let body = "Long temple description. ".repeat(60);
        format!(
            "<html><head><title>Sample Temple - Region</title></head>\
             <body><article><p>{body}</p></article>{imgs}</body></html>"
        )
    }

    fn fixture_fetcher(photo_urls: &[&str], missing: &[&str]) -> StubFetcher {
        let mut pages = HashMap::new();
        pages.insert(LIST_URL.to_string(), list_page());
        pages.insert(DETAIL_URL.to_string(), detail_page(photo_urls));

        let mut images = HashMap::new();
        for url in photo_urls {
            if !missing.contains(url) {
                images.insert(url.to_string(), png_blob("p.png"));
            }
        }
        StubFetcher { pages, images }
    }

    fn crawler(dir: &Path, fetcher: StubFetcher, storage: Box<dyn PhotoStorage>) -> Crawler {
        let output = RunOutput::create(dir).unwrap();
        let done = DoneLog::open(&output.done_path()).unwrap();
        Crawler {
            adapter: Box::new(TestSite),
            fetcher: Box::new(fetcher),
            detector: Box::new(StubDetector(Some("en".into()))),
            summarizer: Box::new(StubSummarizer),
            geocoder: Box::new(StubGeocoder(Some(GeoPoint { lat: 35.0, lng: 135.0 }))),
            translator: Box::new(StubTranslator),
            storage,
            output,
            done,
            policy: CrawlPolicy {
                interval: Some(Duration::ZERO),
                pinned_language: Some(Language::En),
                ..CrawlPolicy::default()
            },
        }
    }

    fn line_count(path: &Path) -> usize {
        match std::fs::read_to_string(path) {
            Ok(text) => text.lines().filter(|l| !l.trim().is_empty()).count(),
            Err(_) => 0,
        }
    }

    #[tokio::test]
    async fn end_to_end_run_writes_every_entity_once() {
        let dir = tempfile::tempdir().unwrap();
        let photos = ["https://cdn.example.com/a.png", "https://cdn.example.com/b.png"];
        let mut crawler = crawler(dir.path(), fixture_fetcher(&photos, &[]), Box::new(MemoryStorage));

        let stats = crawler.run().await.unwrap();
        assert_eq!(stats.items, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.skipped, 0);

        assert_eq!(line_count(&dir.path().join("contents.jsonl")), 1);
        assert_eq!(line_count(&dir.path().join("content_bodies.jsonl")), 2);
        assert_eq!(line_count(&dir.path().join("content_category_mappings.jsonl")), 1);
        assert_eq!(line_count(&dir.path().join("content_photos.jsonl")), 4);
        assert_eq!(line_count(&dir.path().join("content_types.jsonl")), 1);
        assert_eq!(line_count(&dir.path().join("spot_informations.jsonl")), 1);
        assert!(!dir.path().join("articles.jsonl").exists());

        let done = std::fs::read_to_string(dir.path().join("done.txt")).unwrap();
        assert_eq!(done, format!("{DETAIL_URL}\n{LIST_URL}\n"));

        // bodies: base en plus the machine-translated ja
        let bodies = std::fs::read_to_string(dir.path().join("content_bodies.jsonl")).unwrap();
        let rows: Vec<serde_json::Value> = bodies
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(rows[0]["language"], "EN");
        assert_eq!(rows[0]["title"], "Sample Temple - Region");
        assert_eq!(rows[1]["language"], "JA");
        assert!(rows[1]["title"].as_str().unwrap().starts_with("ja:"));

        // unknown category names from the summarizer are dropped
        let mappings =
            std::fs::read_to_string(dir.path().join("content_category_mappings.jsonl")).unwrap();
        assert!(mappings.contains("attractions"));
        assert!(!mappings.contains("not_a_category"));

        assert!(dir.path().join("contents.csv").exists());
        assert!(!dir.path().join("articles.csv").exists());
    }

    #[tokio::test]
    async fn second_run_processes_zero_completed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let photos = ["https://cdn.example.com/a.png"];

        let mut first = crawler(dir.path(), fixture_fetcher(&photos, &[]), Box::new(MemoryStorage));
        first.run().await.unwrap();
        drop(first);

        let mut second = crawler(dir.path(), fixture_fetcher(&photos, &[]), Box::new(MemoryStorage));
        let stats = second.run().await.unwrap();
        assert_eq!(stats.items, 0);
        assert_eq!(stats.lists, 0);

        // nothing appended twice
        assert_eq!(line_count(&dir.path().join("contents.jsonl")), 1);
        assert_eq!(line_count(&dir.path().join("done.txt")), 2);
    }

    #[tokio::test]
    async fn partial_photo_failure_still_completes_the_item() {
        let dir = tempfile::tempdir().unwrap();
        let photos = [
            "https://cdn.example.com/a.png",
            "https://cdn.example.com/b.png",
            "https://cdn.example.com/c.png",
            "https://cdn.example.com/d.png",
        ];
        let fetcher = fixture_fetcher(&photos, &["https://cdn.example.com/c.png"]);
        let mut crawler = crawler(dir.path(), fetcher, Box::new(MemoryStorage));

        let stats = crawler.run().await.unwrap();
        assert_eq!(stats.completed, 1);

        assert_eq!(
            line_count(&dir.path().join("report").join("INVALID_FETCH_PHOTO.jsonl")),
            1
        );
        // 3 photos survived: 6 rows with paired orders
        assert_eq!(line_count(&dir.path().join("content_photos.jsonl")), 6);
    }

    #[tokio::test]
    async fn partial_photo_failure_is_terminal_when_disallowed() {
        let dir = tempfile::tempdir().unwrap();
        let photos = ["https://cdn.example.com/a.png", "https://cdn.example.com/b.png"];
        let fetcher = fixture_fetcher(&photos, &["https://cdn.example.com/b.png"]);
        let mut crawler = crawler(dir.path(), fetcher, Box::new(MemoryStorage));
        crawler.policy.accept_partial_photos = false;

        let stats = crawler.run().await.unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.completed, 0);
        assert!(!dir.path().join("contents.jsonl").exists());
        // the detail key is not marked done; only the list key is
        let done = std::fs::read_to_string(dir.path().join("done.txt")).unwrap();
        assert_eq!(done, format!("{LIST_URL}\n"));
    }

    #[tokio::test]
    async fn missing_photos_classify_invalid_photo() {
        let dir = tempfile::tempdir().unwrap();
        let mut pages = HashMap::new();
        pages.insert(LIST_URL.to_string(), list_page());
        pages.insert(DETAIL_URL.to_string(), detail_page(&[]));
        let fetcher = StubFetcher { pages, images: HashMap::new() };
        let mut crawler = crawler(dir.path(), fetcher, Box::new(MemoryStorage));

        let stats = crawler.run().await.unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(
            line_count(&dir.path().join("report").join("INVALID_PHOTO.jsonl")),
            1
        );
        assert!(!dir.path().join("contents.jsonl").exists());
    }

    #[tokio::test]
    async fn undetectable_language_classifies_invalid_lang() {
        let dir = tempfile::tempdir().unwrap();
        let photos = ["https://cdn.example.com/a.png"];
        let mut crawler = crawler(dir.path(), fixture_fetcher(&photos, &[]), Box::new(MemoryStorage));
        crawler.policy.pinned_language = None;
        crawler.detector = Box::new(StubDetector(None));

        let stats = crawler.run().await.unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(
            line_count(&dir.path().join("report").join("INVALID_LANG.jsonl")),
            1
        );
    }

    #[tokio::test]
    async fn unresolvable_location_classifies_invalid_location() {
        let dir = tempfile::tempdir().unwrap();
        let photos = ["https://cdn.example.com/a.png"];
        let mut crawler = crawler(dir.path(), fixture_fetcher(&photos, &[]), Box::new(MemoryStorage));
        crawler.geocoder = Box::new(StubGeocoder(None));

        let stats = crawler.run().await.unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(
            line_count(&dir.path().join("report").join("INVALID_LOCATION.jsonl")),
            1
        );
    }

    #[tokio::test]
    async fn upload_failure_persists_no_entities() {
        let dir = tempfile::tempdir().unwrap();
        let photos = ["https://cdn.example.com/a.png"];
        let mut crawler = crawler(dir.path(), fixture_fetcher(&photos, &[]), Box::new(FailingStorage));

        let stats = crawler.run().await.unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(
            line_count(&dir.path().join("report").join("UPLOAD_ERROR.jsonl")),
            1
        );
        assert!(!dir.path().join("contents.jsonl").exists());
        assert!(!dir.path().join("content_photos.jsonl").exists());
    }

    #[tokio::test]
    async fn detected_japanese_pins_base_language_to_ja() {
        let dir = tempfile::tempdir().unwrap();
        let photos = ["https://cdn.example.com/a.png"];
        let mut crawler = crawler(dir.path(), fixture_fetcher(&photos, &[]), Box::new(MemoryStorage));
        crawler.policy.pinned_language = None;
        crawler.detector = Box::new(StubDetector(Some("ja".into())));

        crawler.run().await.unwrap();

        let contents = std::fs::read_to_string(dir.path().join("contents.jsonl")).unwrap();
        let row: serde_json::Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
        assert_eq!(row["base_language"], "JA");
        assert_eq!(row["actual_language"], "JA");
    }

    #[tokio::test]
    async fn unsupported_detected_language_falls_back_to_en() {
        let dir = tempfile::tempdir().unwrap();
        let photos = ["https://cdn.example.com/a.png"];
        let mut crawler = crawler(dir.path(), fixture_fetcher(&photos, &[]), Box::new(MemoryStorage));
        crawler.policy.pinned_language = None;
        crawler.detector = Box::new(StubDetector(Some("fr".into())));

        crawler.run().await.unwrap();

        let contents = std::fs::read_to_string(dir.path().join("contents.jsonl")).unwrap();
        let row: serde_json::Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
        assert_eq!(row["base_language"], "EN");
        assert_eq!(row["actual_language"], "FR");
    }
}
