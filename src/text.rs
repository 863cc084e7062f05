use scraper::{Html, Selector};
use unicode_segmentation::UnicodeSegmentation;

/// Title and main text pulled out of a detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextInfo {
    pub title: String,
    pub description: String,
}

/// Collapse tabs/newlines and runs of whitespace into single spaces.
pub fn normalize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract `{title, description}` from raw HTML: the `<title>` text plus the
/// readable main text (`<article>`, else `<main>`, else all paragraphs).
/// Returns `None` when the page yields neither, which classifies the item as
/// INVALID_URL upstream.
pub fn extract_text_info(doc: &Html) -> Option<TextInfo> {
    let title_sel = Selector::parse("title").unwrap();
    let title = doc
        .select(&title_sel)
        .next()
        .map(|t| normalize(&t.text().collect::<String>()))
        .unwrap_or_default();

    let description = main_text(doc);

    if title.is_empty() && description.is_empty() {
        return None;
    }
    Some(TextInfo { title, description })
}

fn main_text(doc: &Html) -> String {
    for sel in ["article", "main"] {
        let selector = Selector::parse(sel).unwrap();
        if let Some(el) = doc.select(&selector).next() {
            let text = normalize(&el.text().collect::<String>());
            if !text.is_empty() {
                return text;
            }
        }
    }

    let p = Selector::parse("body p").unwrap();
    let joined = doc
        .select(&p)
        .map(|el| el.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ");
    normalize(&joined)
}

/// First `n` characters, used for the snippets handed to the enrichment
/// services.
pub fn char_prefix(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

pub fn grapheme_count(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Take the first `n` extended grapheme clusters.
pub fn take_graphemes(s: &str, n: usize) -> String {
    s.graphemes(true).take(n).collect()
}

/// Descriptions longer than 1000 grapheme clusters are cut to 996 clusters
/// with a `...` marker appended. Counting clusters rather than code units
/// keeps multi-byte scripts from being cut mid-character.
pub fn truncate_description(s: &str) -> String {
    const LIMIT: usize = 1000;
    const KEEP: usize = 996;

    if grapheme_count(s) > LIMIT {
        format!("{} ...", take_graphemes(s, KEEP))
    } else {
        s.to_string()
    }
}
