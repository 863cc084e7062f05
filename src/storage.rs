use async_trait::async_trait;
use serde::Deserialize;

/// Errors from the photo storage collaborator. Upload failures are terminal
/// for the item (UPLOAD_ERROR), never for the run.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("storage rejected upload of {path}: {message}")]
    Rejected { path: String, message: String },
    #[error("photo batch failed: {0}")]
    Batch(String),
}

#[derive(Debug, Clone)]
pub struct UploadedObject {
    pub id: String,
    pub public_url: String,
}

/// Object storage for photo artifacts.
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadedObject, StorageError>;
}

/// Supabase Storage over its REST API. Uploads are upserts so a crash-rerun
/// of an item overwrites rather than conflicts.
pub struct SupabaseStorage {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    api_key: String,
}

#[derive(Deserialize)]
struct SupabaseUploadResponse {
    #[serde(rename = "Id", default)]
    id: Option<String>,
}

impl SupabaseStorage {
    pub fn new(base_url: &str, api_key: &str, bucket: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }
}

#[async_trait]
impl PhotoStorage for SupabaseStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadedObject, StorageError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path);
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("apikey", self.api_key.clone())
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let message = res.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                path: path.to_string(),
                message: format!("{status}: {message}"),
            });
        }

        let parsed: SupabaseUploadResponse = res.json().await.unwrap_or(SupabaseUploadResponse {
            id: None,
        });

        Ok(UploadedObject {
            id: parsed.id.unwrap_or_else(crate::model::new_id),
            public_url: self.public_url(path),
        })
    }
}
