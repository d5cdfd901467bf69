use bot_relay_api::{BotIdentity, Envelope, WebhookRegistration, is_json_content_type};
use reqwest::{Client, RequestBuilder, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::Error;

/// Forwards calls to `{base_url}/bot{token}{path}`.
///
/// Cloning is cheap, the underlying `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct RelayClient {
    base_url: String,
    token: String,
    http_client: Client,
}

impl RelayClient {
    pub fn new(base_url: &str, token: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.strip_suffix('/').unwrap_or(base_url).to_string(),
            token: token.to_string(),
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full upstream URL for `path`. Contains the bot token, keep it out of logs.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/bot{}{}", self.base_url, self.token, path)
    }

    /// Sends a GET when `body` is `None`, otherwise POSTs it as JSON, then
    /// decodes the envelope's result into `T`.
    pub async fn relay<T>(&self, path: &str, body: Option<&Value>) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        match body {
            Some(body) => self.post(path, body).await,
            None => self.get(path).await,
        }
    }

    pub async fn get<T>(&self, path: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        tracing::info!("➡️ upstream GET {path}");
        self.send(self.http_client.get(self.endpoint(path))).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        tracing::info!("➡️ upstream POST {path}");
        self.send(self.http_client.post(self.endpoint(path)).json(body))
            .await
    }

    pub async fn get_me(&self) -> Result<BotIdentity, Error> {
        self.get("/getMe").await
    }

    pub async fn set_webhook(&self, registration: &WebhookRegistration) -> Result<bool, Error> {
        self.post("/setWebHook", registration).await
    }

    async fn send<T>(&self, request: RequestBuilder) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let res = request.send().await.map_err(transport)?;

        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !is_json_content_type(&content_type) {
            tracing::warn!(
                "upstream answered {} with content type {content_type:?}",
                res.status()
            );
            return Err(Error::UnsupportedContentType(content_type));
        }

        let body = res.bytes().await.map_err(transport)?;
        let envelope: Envelope = serde_json::from_slice(&body).map_err(Error::InvalidEnvelope)?;

        let result = envelope.into_result().map_err(|rejection| {
            tracing::debug!(
                "upstream rejection parameters: {:?}",
                rejection.parameters
            );
            Error::UpstreamRejected {
                description: rejection.description,
                error_code: rejection.error_code,
            }
        })?;

        serde_json::from_value(result).map_err(|source| Error::ResultDecode {
            target: std::any::type_name::<T>(),
            source,
        })
    }
}

/// reqwest errors carry the request URL, which embeds the bot token.
fn transport(err: reqwest::Error) -> Error {
    Error::Transport(err.without_url())
}
