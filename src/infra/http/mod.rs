//! reqwest adapter for the posts collection endpoint.

mod response;

use async_trait::async_trait;
use metrics::counter;
use reqwest::{Client, Method, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::api::PostsApi;
use crate::application::error::ClientError;
use crate::config::ApiSettings;
use crate::domain::posts::{Post, PostFields, PostId};
use crate::infra::telemetry::HTTP_REQUESTS_TOTAL;

pub use response::{decode_post, decode_posts, normalize, read_response};

#[derive(Clone, Debug)]
pub struct HttpPostsClient {
    client: Client,
    base: Url,
}

impl HttpPostsClient {
    /// `base_url` is the collection itself, e.g. `https://host/api/posts`.
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client, base })
    }

    pub fn from_settings(settings: &ApiSettings) -> Result<Self, ClientError> {
        Self::new(settings.base_url.as_str(), &settings.user_agent)
    }

    /// `{base}/{id}`, with the id as a single encoded segment.
    pub(crate) fn item_url(&self, id: &PostId) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&PostFields>,
    ) -> Result<Option<Value>, ClientError> {
        let mut req = self.client.request(method.clone(), url.clone());
        if let Some(fields) = body {
            req = req.json(fields);
        }

        debug!(%method, %url, "sending request");
        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(err) => {
                record(&method, "transport_error");
                warn!(%method, %url, error = %err, "request did not complete");
                return Err(err.into());
            }
        };

        let status = resp.status();
        debug!(%method, %url, status = status.as_u16(), "response received");
        let result = read_response(resp).await;
        match &result {
            Ok(_) => record(&method, "success"),
            Err(ClientError::Api(api)) => {
                record(&method, "api_error");
                warn!(%method, %url, status = api.status, message = %api.message, "server rejected request");
            }
            Err(err) => {
                record(&method, "invalid_response");
                warn!(%method, %url, error = %err, "unreadable response");
            }
        }
        result
    }
}

fn record(method: &Method, outcome: &'static str) {
    counter!(HTTP_REQUESTS_TOTAL, "method" => method.to_string(), "outcome" => outcome)
        .increment(1);
}

#[async_trait]
impl PostsApi for HttpPostsClient {
    async fn list(&self) -> Result<Vec<Post>, ClientError> {
        let data = self.send(Method::GET, self.base.clone(), None).await?;
        decode_posts(data)
    }

    async fn get(&self, id: &PostId) -> Result<Post, ClientError> {
        let url = self.item_url(id)?;
        let data = self.send(Method::GET, url, None).await?;
        decode_post(data)
    }

    async fn create(&self, fields: &PostFields) -> Result<Post, ClientError> {
        let data = self
            .send(Method::POST, self.base.clone(), Some(fields))
            .await?;
        decode_post(data)
    }

    async fn replace(&self, id: &PostId, fields: &PostFields) -> Result<Post, ClientError> {
        let url = self.item_url(id)?;
        let data = self.send(Method::PUT, url, Some(fields)).await?;
        decode_post(data)
    }

    async fn partial_update(&self, id: &PostId, fields: &PostFields) -> Result<Post, ClientError> {
        let url = self.item_url(id)?;
        let data = self.send(Method::PATCH, url, Some(fields)).await?;
        decode_post(data)
    }

    async fn remove(&self, id: &PostId) -> Result<(), ClientError> {
        let url = self.item_url(id)?;
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }
}
