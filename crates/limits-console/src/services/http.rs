use async_trait::async_trait;
use limits_types::{ApiLimitsConfig, LimitsError, LimitsResult};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use super::LimitsService;

const ADMIN_SECRET_HEADER: &str = "x-hasura-admin-secret";

pub fn export_metadata_body() -> Value {
    json!({ "type": "export_metadata", "args": {} })
}

pub fn set_limits_body(config: &ApiLimitsConfig) -> LimitsResult<Value> {
    let args = serde_json::to_value(config)
        .map_err(|e| LimitsError::Serialization(format!("Failed to encode limits: {}", e)))?;
    Ok(json!({ "type": "set_api_limits", "args": args }))
}

pub fn remove_limits_body() -> Value {
    json!({ "type": "remove_api_limits", "args": {} })
}

/// Request that drops `role` from `current`. Once nothing is left the whole
/// record is removed instead of being replaced by an empty one.
pub fn remove_body(mut current: ApiLimitsConfig, role: &str) -> LimitsResult<Value> {
    current.strip_role(role);
    if current.is_empty() {
        Ok(remove_limits_body())
    } else {
        set_limits_body(&current)
    }
}

/// Client for a metadata endpoint exposing `set_api_limits` and friends.
pub struct HttpLimitsService {
    client: Client,
    endpoint: String,
    admin_secret: Option<String>,
}

impl HttpLimitsService {
    pub fn new(
        endpoint: impl Into<String>,
        admin_secret: Option<String>,
        timeout: Duration,
    ) -> LimitsResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LimitsError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            admin_secret,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn query(&self, body: &Value) -> LimitsResult<Value> {
        debug!("HTTP POST {}: {}", self.endpoint, body["type"]);

        let mut request = self.client.post(&self.endpoint).json(body);
        if let Some(secret) = &self.admin_secret {
            request = request.header(ADMIN_SECRET_HEADER, secret);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LimitsError::Network(format!("HTTP POST failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LimitsError::Service(format!("{}: {}", status, text)));
        }

        response
            .json()
            .await
            .map_err(|e| LimitsError::Serialization(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl LimitsService for HttpLimitsService {
    async fn fetch(&self) -> LimitsResult<ApiLimitsConfig> {
        let metadata = self.query(&export_metadata_body()).await?;
        match metadata.get("api_limits") {
            Some(limits) => serde_json::from_value(limits.clone())
                .map_err(|e| LimitsError::Serialization(format!("Invalid api_limits: {}", e))),
            None => Ok(ApiLimitsConfig::default()),
        }
    }

    async fn submit(&self, config: &ApiLimitsConfig, role: &str) -> LimitsResult<()> {
        self.query(&set_limits_body(config)?).await?;
        info!("API limits saved for role {}", role);
        Ok(())
    }

    async fn remove(&self, role: &str) -> LimitsResult<()> {
        let current = self.fetch().await?;
        self.query(&remove_body(current, role)?).await?;

        info!("API limits removed for role {}", role);
        Ok(())
    }
}
