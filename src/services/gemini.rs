//! Gemini `generateContent` oracle client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use url::Url;

use crate::config::{ConfigError, OracleConfig};
use crate::pipeline::error::OracleError;
use crate::pipeline::oracle::{OracleClient, OraclePool};
use crate::pipeline::request::DecisionRequest;

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// One Gemini credential. The model is discovered lazily when not configured
/// and cached for the lifetime of the client.
pub struct GeminiClient {
    client: Client,
    base_url: Url,
    api_key: String,
    model: OnceCell<String>,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|_| ConfigError::Invalid {
                name: "ORACLE_TIMEOUT_SECS",
                value: format!("{:?}", timeout),
            })?;
        Self::with_client(base_url, api_key, model, client)
    }

    pub fn with_client(
        base_url: &str,
        api_key: impl Into<String>,
        model: Option<String>,
        client: Client,
    ) -> Result<Self, ConfigError> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|_| ConfigError::Invalid {
            name: "GEMINI_BASE_URL",
            value: base_url.to_string(),
        })?;

        let cell = OnceCell::new();
        if let Some(model) = model {
            let _ = cell.set(model);
        }

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
            model: cell,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, OracleError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| OracleError::Malformed(format!("bad endpoint {}: {}", path, e)))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    /// Model used for this credential, discovering it on first use.
    pub async fn model(&self) -> Result<String, OracleError> {
        self.model
            .get_or_try_init(|| self.discover_model())
            .await
            .cloned()
    }

    /// Prefer a `flash` model, then a `pro` model, then whatever is listed
    /// first among those supporting `generateContent`.
    async fn discover_model(&self) -> Result<String, OracleError> {
        let response = self.client.get(self.endpoint("v1beta/models")?).send().await?;
        let response = check_status(response).await?;
        let list: ModelList = response
            .json()
            .await
            .map_err(|e| OracleError::Malformed(format!("model list: {}", e)))?;

        let usable: Vec<&str> = list
            .models
            .iter()
            .filter(|m| m.supported_generation_methods.iter().any(|g| g == "generateContent"))
            .map(|m| m.name.as_str())
            .collect();

        let chosen = usable
            .iter()
            .find(|m| m.contains("flash"))
            .or_else(|| usable.iter().find(|m| m.contains("pro")))
            .or_else(|| usable.first())
            .ok_or(OracleError::NoModel)?;

        let model = chosen.trim_start_matches("models/").to_string();
        info!(credential = %self.name(), model = %model, "GeminiClient: discovered model");
        Ok(model)
    }
}

#[async_trait]
impl OracleClient for GeminiClient {
    fn name(&self) -> String {
        let prefix: String = self.api_key.chars().take(4).collect();
        format!("gemini:{}…", prefix)
    }

    async fn ask(&self, request: &DecisionRequest) -> Result<String, OracleError> {
        let model = self.model().await?;
        let prompt = request.render_prompt()?;
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        debug!(credential = %self.name(), model = %model, "GeminiClient: generateContent");
        let url = self.endpoint(&format!("v1beta/models/{}:generateContent", model))?;
        let response = self.client.post(url).json(&body).send().await?;
        let response = check_status(response).await?;

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Malformed(format!("generateContent body: {}", e)))?;

        parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .ok_or_else(|| OracleError::Malformed("reply has no text part".to_string()))
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, OracleError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(OracleError::Unauthorized(status.as_u16()));
    }
    let body = response.text().await.unwrap_or_default();
    Err(OracleError::Status {
        status: status.as_u16(),
        body: body.chars().take(200).collect(),
    })
}

/// One client per configured key, in configuration order.
pub fn build_pool(config: &OracleConfig) -> Result<OraclePool, ConfigError> {
    let mut clients: Vec<Arc<dyn OracleClient>> = Vec::with_capacity(config.api_keys.len());
    for key in &config.api_keys {
        clients.push(Arc::new(GeminiClient::new(
            &config.base_url,
            key.clone(),
            config.model.clone(),
            config.timeout,
        )?));
    }
    Ok(OraclePool::new(clients))
}
