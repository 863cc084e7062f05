use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::enrich::{Summarizer, Summary};
use crate::model::CONTENT_CATEGORIES;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-4o-mini";

/// OpenAI-backed summarizer/categorizer. One chat completion per item,
/// temperature 0, JSON response format.
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiSummarizer {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct GuessedInfo {
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: Vec<String>,
    #[serde(default)]
    address: String,
}

fn build_prompt(title: &str, snippet: &str, length_instruction: &str) -> String {
    let categories = CONTENT_CATEGORIES
        .iter()
        .map(|c| format!("  - {c}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"次のテキストを参照し、後述のタスクを実行してください。
```text
title: {title}
description: {snippet}
```

- {length_instruction}コンテンツの内容が少ない場合は、無理に増やさなくて大丈夫です。読んだ人が訪れたくなるような文章にしてください。推論は書かないでください。
- 当てはまるカテゴリを以下から複数選択してください。
{categories}
- テキストからGoogle Mapの検索にヒットしそうな地名を推定してください。ない場合も、必ず日本のどこかの地名を返してください。

出力は必ずJSON形式で行ってください。
例：
{{
    "description": "要約",
    "category": ["attractions", "events"],
    "address": "名古屋城"
}}"#
    )
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(
        &self,
        title: &str,
        snippet: &str,
        length_instruction: &str,
    ) -> Result<Summary> {
        let prompt = build_prompt(title, snippet, length_instruction);
        info!("summarize input: {} chars", prompt.len());

        let res: ChatResponse = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": MODEL,
                "messages": [{ "role": "user", "content": prompt }],
                "temperature": 0,
                "response_format": { "type": "json_object" },
            }))
            .send()
            .await
            .context("summarize request")?
            .error_for_status()
            .context("summarize request")?
            .json()
            .await
            .context("parse summarize response")?;

        let content = res
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_else(|| "{}".to_string());
        info!("summarize output: {} chars", content.len());

        let guessed: GuessedInfo =
            serde_json::from_str(&content).context("summarizer returned non-JSON content")?;

        Ok(Summary {
            description: guessed.description,
            categories: guessed.category,
            place_guess: guessed.address,
        })
    }
}
