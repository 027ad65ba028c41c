use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use taskdeck_core::{ApiError, ApiMessage};

/// Client for one API server. Cheap to clone; the underlying connection pool
/// is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    /// `base` is the API root, e.g. `http://localhost:8000/api/v1`. A missing
    /// trailing slash is added so endpoint paths join under it instead of
    /// replacing its last segment.
    pub fn new(mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Self {
            http: reqwest::Client::new(),
            base,
            token: None,
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_token<T: Into<String>>(mut self, token: T) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::Transport(format!("invalid endpoint {}: {}", path, err)))
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "api request");
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send the request and decode the success body as `T`. Non-success
    /// responses are decoded as the server's `{"detail"}` envelope when
    /// possible, with the raw body as fallback.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiMessage>(&body)
                .map(|message| message.detail)
                .unwrap_or(body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }
}

/// Query pairs for a paginated list request. `search` is omitted entirely
/// when unset; the server treats a present-but-empty term as a filter.
pub(crate) fn list_query(skip: u32, limit: u32, search: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query = vec![("skip", skip.to_string()), ("limit", limit.to_string())];
    if let Some(term) = search {
        query.push(("search", term.to_string()));
    }
    query
}
