use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::OracleSettings;
use crate::core::compatibility::{CompatibilityOracle, OracleError};

/// Chat-completion backed compatibility oracle
///
/// Sends both bios and the shared interests to a `/chat/completions`
/// endpoint and returns the raw answer text. Parsing and fallback are the
/// scorer's job.
pub struct HttpOracle {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: Client,
}

impl HttpOracle {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
    ) -> Result<Self, OracleError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            model,
            client,
        })
    }

    pub fn from_settings(settings: &OracleSettings) -> Result<Self, OracleError> {
        Self::new(
            settings.endpoint.clone(),
            settings.api_key.clone(),
            settings.model.clone(),
            Duration::from_millis(settings.timeout_ms),
        )
    }

    fn prompt(bio_a: &str, bio_b: &str, common_interests: &[String]) -> String {
        format!(
            "Rate the compatibility of two dating profiles from their bios and shared interests.\n\n\
             Profile 1 bio: {}\n\
             Profile 2 bio: {}\n\
             Shared interests: {}\n\n\
             Answer with a single number from 0 to 100.",
            bio_a,
            bio_b,
            common_interests.join(", ")
        )
    }
}

#[async_trait]
impl CompatibilityOracle for HttpOracle {
    async fn assess(
        &self,
        bio_a: &str,
        bio_b: &str,
        common_interests: &[String],
    ) -> Result<String, OracleError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let body = json!({
            "model": self.model,
            "max_tokens": 10,
            "messages": [
                { "role": "user", "content": Self::prompt(bio_a, bio_b, common_interests) }
            ],
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(OracleError::Status(response.status().as_u16()));
        }

        let json: Value = response.json().await?;

        json.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| OracleError::InvalidResponse("Missing choices[0].message.content".into()))
    }
}
