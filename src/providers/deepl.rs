use std::fmt;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use log::{debug, error};

use crate::app_config::{TargetVariant, TranslationConfig};
use crate::errors::ProviderError;
use super::Translator;

/// DeepL client for the v2 `translate` endpoint
pub struct DeepL {
    /// HTTP client for API requests
    client: Client,
    /// API key sent as `auth_key`
    api_key: String,
    /// Fully resolved endpoint URL
    endpoint: String,
}

/// DeepL translate response
#[derive(Debug, Deserialize)]
pub struct DeepLResponse {
    /// One entry per submitted text, in submission order
    pub translations: Vec<DeepLTranslation>,
}

/// Individual translation in a DeepL response
#[derive(Debug, Deserialize)]
pub struct DeepLTranslation {
    /// Language DeepL detected (informational)
    #[serde(default)]
    pub detected_source_language: Option<String>,

    /// The translated text
    #[serde(default)]
    pub text: String,
}

impl fmt::Debug for DeepL {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepL")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl DeepL {
    /// Create a new DeepL client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Create a client from the translation section of the config
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self::new(
            config.deepl.api_key.clone(),
            config.deepl.resolve_endpoint(),
            config.timeout_secs,
        )
    }

    /// Endpoint this client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the form body: auth and options first, then one `text` field per entry
    pub fn form_fields(&self, texts: &[String], source_language: &str, target: TargetVariant) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("auth_key", self.api_key.clone()),
            ("source_lang", source_language.to_string()),
            ("target_lang", target.deepl_code().to_string()),
            ("preserve_formatting", "1".to_string()),
        ];
        fields.extend(texts.iter().map(|text| ("text", text.clone())));
        fields
    }

    /// Parse a response body into ordered texts
    pub fn parse_response(body: &str) -> Result<Vec<String>, ProviderError> {
        let response: DeepLResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("{} (body: {})", e, truncate(body, 200))))?;

        Ok(response.translations.into_iter().map(|t| t.text).collect())
    }
}

#[async_trait]
impl Translator for DeepL {
    fn name(&self) -> &str {
        "DeepL"
    }

    async fn translate(
        &self,
        texts: &[String],
        source_language: &str,
        target: TargetVariant,
    ) -> Result<Vec<String>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("DeepL request: {} texts, {} -> {}", texts.len(), source_language, target);

        let response = self.client.post(&self.endpoint)
            .form(&self.form_fields(texts, source_language, target))
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to reach DeepL at {}: {}", self.endpoint, e)))?;

        let status = response.status();
        let body = response.text().await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to read DeepL response: {}", e)))?;

        if !status.is_success() {
            error!("DeepL API error ({}): {}", status, body);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: body,
            });
        }

        Self::parse_response(&body)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
