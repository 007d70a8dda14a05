use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Metadata tag attached to an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store refused the request for lack of funds.
    #[error("insufficient balance: {message}")]
    InsufficientBalance { message: String },
    #[error("no signing credential configured")]
    MissingCredential,
    #[error("store rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("store unreachable: {0}")]
    Network(String),
    #[error("unexpected store response: {0}")]
    InvalidResponse(String),
}

impl StoreError {
    pub fn is_insufficient_balance(&self) -> bool {
        matches!(self, StoreError::InsufficientBalance { .. })
    }
}

/// Content-addressed storage network.
///
/// One instance carries the credential/session for a whole run and is only
/// read after construction.
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    async fn balance(&self) -> Result<u128, StoreError>;
    /// Estimated cost of storing `byte_len` bytes.
    async fn price(&self, byte_len: u64) -> Result<u128, StoreError>;
    /// Stores `data` and returns its content id.
    async fn submit(&self, data: Vec<u8>, tags: &[Tag]) -> Result<String, StoreError>;
}

#[derive(Debug, Clone)]
pub struct HttpStoreSettings {
    pub node_url: String,
    pub credential: Option<String>,
    pub request_timeout: Duration,
}

impl HttpStoreSettings {
    pub fn new(node_url: impl Into<String>, credential: Option<String>) -> Self {
        Self {
            node_url: node_url.into(),
            credential,
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Header carrying the JSON-encoded tag list on `POST /tx`.
pub const TAGS_HEADER: &str = "x-tags";

#[derive(Debug, Deserialize)]
struct BalanceBody {
    balance: String,
}

#[derive(Debug, Deserialize)]
struct SubmitBody {
    id: String,
}

/// [`ContentStore`] speaking to a bundler-style node over HTTP.
#[derive(Debug, Clone)]
pub struct HttpContentStore {
    base: String,
    credential: Option<String>,
    client: reqwest::Client,
}

impl HttpContentStore {
    pub fn new(settings: HttpStoreSettings) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| StoreError::Network(err.to_string()))?;
        let credential = settings
            .credential
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Ok(Self {
            base: settings.node_url.trim_end_matches('/').to_string(),
            credential,
            client,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    fn credential(&self) -> Result<&str, StoreError> {
        self.credential
            .as_deref()
            .ok_or(StoreError::MissingCredential)
    }

    async fn read_body(response: reqwest::Response) -> Result<String, StoreError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| StoreError::Network(err.to_string()))?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(classify_failure(status.as_u16(), body))
        }
    }
}

#[async_trait::async_trait]
impl ContentStore for HttpContentStore {
    async fn balance(&self) -> Result<u128, StoreError> {
        let response = self
            .client
            .get(format!("{}/account/balance", self.base))
            .bearer_auth(self.credential()?)
            .send()
            .await
            .map_err(|err| StoreError::Network(err.to_string()))?;
        let body = Self::read_body(response).await?;
        let parsed: BalanceBody = serde_json::from_str(&body)
            .map_err(|err| StoreError::InvalidResponse(err.to_string()))?;
        parse_amount(&parsed.balance)
    }

    async fn price(&self, byte_len: u64) -> Result<u128, StoreError> {
        let response = self
            .client
            .get(format!("{}/price/{byte_len}", self.base))
            .send()
            .await
            .map_err(|err| StoreError::Network(err.to_string()))?;
        let body = Self::read_body(response).await?;
        parse_amount(&body)
    }

    async fn submit(&self, data: Vec<u8>, tags: &[Tag]) -> Result<String, StoreError> {
        let credential = self.credential()?;
        let encoded_tags = serde_json::to_string(tags)
            .map_err(|err| StoreError::InvalidResponse(err.to_string()))?;
        let response = self
            .client
            .post(format!("{}/tx", self.base))
            .bearer_auth(credential)
            .header(TAGS_HEADER, encoded_tags)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .send()
            .await
            .map_err(|err| StoreError::Network(err.to_string()))?;
        let body = Self::read_body(response).await?;
        let parsed: SubmitBody = serde_json::from_str(&body)
            .map_err(|err| StoreError::InvalidResponse(err.to_string()))?;
        if parsed.id.is_empty() {
            return Err(StoreError::InvalidResponse("empty content id".into()));
        }
        Ok(parsed.id)
    }
}

fn parse_amount(raw: &str) -> Result<u128, StoreError> {
    raw.trim()
        .trim_matches('"')
        .parse::<u128>()
        .map_err(|err| StoreError::InvalidResponse(format!("bad amount {raw:?}: {err}")))
}

/// 402, or any error body mentioning "insufficient", is a funding problem.
fn classify_failure(status: u16, body: String) -> StoreError {
    if status == 402 || body.to_ascii_lowercase().contains("insufficient") {
        return StoreError::InsufficientBalance { message: body };
    }
    StoreError::Rejected {
        status,
        message: body,
    }
}
