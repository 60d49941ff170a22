use crate::domain::model::{Entity, PayloadShape, ReorderPayload};
use crate::domain::ports::{ConfigProvider, OrderBackend, SessionStore};
use crate::domain::session::{SessionContext, SessionHandle};
use crate::utils::error::{ReorderError, Result};
use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use url::Url;

/// REST collection endpoint (offers, products, ...) with a `/reorder` action.
#[derive(Debug, Clone)]
pub struct RestCollection {
    client: Client,
    endpoint: Url,
    reorder_url: Url,
    list_field: Option<String>,
    id_field: String,
    shape: PayloadShape,
    session: Option<SessionHandle>,
}

impl RestCollection {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let endpoint = parse_url(config.collection_endpoint())?;
        let reorder_url = join_path(&endpoint, config.reorder_path())?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint,
            reorder_url,
            list_field: config.list_field().map(str::to_string),
            id_field: config.entity_id_field().to_string(),
            shape: config.payload_shape(),
            session: None,
        })
    }

    /// Token is read on every request, so later sign-in / sign-out on
    /// `session` apply to this client too.
    pub fn with_session<S: SessionStore>(mut self, session: &SessionContext<S>) -> Self {
        self.session = Some(session.handle());
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn reorder_url(&self) -> &Url {
        &self.reorder_url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.as_ref().and_then(SessionHandle::token) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// 從回應中取出實體陣列，可選擇包在 `list_field` 之下
    fn decode_list(&self, body: Value) -> Result<Vec<Entity>> {
        let items = match (body, self.list_field.as_deref()) {
            (Value::Array(items), _) => items,
            (Value::Object(mut obj), Some(field)) => match obj.remove(field) {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(ReorderError::DecodeError {
                        message: format!("response has no '{}' array", field),
                    })
                }
            },
            _ => {
                return Err(ReorderError::DecodeError {
                    message: "expected a JSON array of entities".to_string(),
                })
            }
        };

        items
            .into_iter()
            .map(|item| Entity::from_json(item, &self.id_field))
            .collect()
    }

    /// Sends a multipart create/update form to a path under the collection.
    pub async fn post_form(&self, relative_path: &str, form: Form) -> Result<()> {
        let url = join_path(&self.endpoint, relative_path)?;
        tracing::debug!("Posting form to: {}", url);
        let response = self
            .authorize(self.client.post(url))
            .multipart(form)
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }
}

#[async_trait]
impl OrderBackend for RestCollection {
    async fn fetch(&self) -> Result<Vec<Entity>> {
        tracing::debug!("Fetching collection from: {}", self.endpoint);
        let response = self
            .authorize(self.client.get(self.endpoint.clone()))
            .send()
            .await?;
        tracing::debug!("Collection response status: {}", response.status());

        let response = ensure_success(response).await?;
        let body: Value = response.json().await?;
        let entities = self.decode_list(body)?;
        tracing::debug!("Fetched {} entities", entities.len());
        Ok(entities)
    }

    async fn commit(&self, payload: &ReorderPayload) -> Result<()> {
        tracing::debug!(
            "Posting {} ranks to: {}",
            payload.len(),
            self.reorder_url
        );
        let response = self
            .authorize(self.client.post(self.reorder_url.clone()))
            .json(&payload.to_json(&self.shape))
            .send()
            .await?;
        tracing::debug!("Reorder response status: {}", response.status());

        ensure_success(response).await.map(|_| ())
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| ReorderError::ConfigError {
        message: format!("invalid collection endpoint '{}': {}", raw, e),
    })
}

fn join_path(base: &Url, path: &str) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    parse_url(&joined)
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    Err(ReorderError::ServerRejection {
        status: status.as_u16(),
        message,
    })
}

fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}
