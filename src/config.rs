use anyhow::{bail, Result};

/// API credentials for the external services, read from the environment
/// (a local `.env` is loaded first). Missing variables are reported all at
/// once so one run of the binary surfaces the complete list.
pub struct Credentials {
    pub openai_api_key: String,
    pub google_translation_api_key: String,
    pub google_map_api_key: String,
    pub supabase_url: String,
    pub supabase_api_key: String,
    pub supabase_bucket: String,
}

const DEFAULT_BUCKET: &str = "kmap-bucket";

impl Credentials {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut missing = Vec::new();
        let mut var = |name: &'static str| match std::env::var(name) {
            Ok(v) if !v.is_empty() => v,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let creds = Self {
            openai_api_key: var("OPENAI_API_KEY"),
            google_translation_api_key: var("GOOGLE_TRANSLATION_API_KEY"),
            google_map_api_key: var("GOOGLE_MAP_API_KEY"),
            supabase_url: var("SUPABASE_URL"),
            supabase_api_key: var("SUPABASE_API_KEY"),
            supabase_bucket: std::env::var("SUPABASE_BUCKET")
                .unwrap_or_else(|_| DEFAULT_BUCKET.to_string()),
        };

        if !missing.is_empty() {
            bail!("missing environment variables: {}", missing.join(", "));
        }
        Ok(creds)
    }
}
