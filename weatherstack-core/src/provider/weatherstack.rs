use async_trait::async_trait;
use reqwest::{Client, Method, redirect};
use tracing::debug;

use crate::{
    error::ApiError,
    model::{Credentials, DateSpec, Endpoint, Query, WeatherPayload},
};

use super::WeatherProvider;

/// Request executor for the Weatherstack HTTP API.
///
/// Holds no connection state: every call opens its own client and releases it
/// before returning.
#[derive(Debug, Clone)]
pub struct WeatherstackProvider {
    base_url: String,
}

impl WeatherstackProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    pub async fn fetch_current(
        &self,
        query: &Query,
        credentials: &Credentials,
    ) -> Result<WeatherPayload, ApiError> {
        let url = self.endpoint_url(Endpoint::Current);
        let params = [("access_key", credentials.expose()), ("query", query.as_str())];

        safe_request(Method::GET, &url, &params).await
    }

    pub async fn fetch_historical(
        &self,
        query: &Query,
        dates: &DateSpec,
        credentials: &Credentials,
    ) -> Result<WeatherPayload, ApiError> {
        let url = self.endpoint_url(Endpoint::Historical);
        let params = [
            ("access_key", credentials.expose()),
            ("query", query.as_str()),
            ("historical_date", dates.as_str()),
        ];

        safe_request(Method::GET, &url, &params).await
    }
}

#[async_trait]
impl WeatherProvider for WeatherstackProvider {
    async fn current(
        &self,
        query: &Query,
        credentials: &Credentials,
    ) -> Result<WeatherPayload, ApiError> {
        self.fetch_current(query, credentials).await
    }

    async fn historical(
        &self,
        query: &Query,
        dates: &DateSpec,
        credentials: &Credentials,
    ) -> Result<WeatherPayload, ApiError> {
        self.fetch_historical(query, dates, credentials).await
    }
}

/// Perform one request against `url` and classify any failure.
///
/// `params` go on the query string for both GET and POST.
pub(crate) async fn safe_request(
    method: Method,
    url: &str,
    params: &[(&str, &str)],
) -> Result<WeatherPayload, ApiError> {
    if method != Method::GET && method != Method::POST {
        return Err(ApiError::unexpected(url, format_args!("Unsupported method: {method}")));
    }

    let client = open_client().map_err(|e| ApiError::transport(url, e))?;

    debug!(%method, url, "sending Weatherstack request");
    let outcome = execute(&client, method, url, params).await;
    drop(client);

    match &outcome {
        Ok(_) => debug!(url, "Weatherstack request succeeded"),
        Err(err) => debug!(url, category = err.category(), "Weatherstack request failed"),
    }

    outcome
}

fn open_client() -> Result<Client, reqwest::Error> {
    // Idle connections are not kept past the call; redirects surface as status failures.
    Client::builder().pool_max_idle_per_host(0).redirect(redirect::Policy::none()).build()
}

async fn execute(
    client: &Client,
    method: Method,
    url: &str,
    params: &[(&str, &str)],
) -> Result<WeatherPayload, ApiError> {
    let res = client
        .request(method, url)
        .query(params)
        .send()
        .await
        .map_err(|e| ApiError::transport(url, e))?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(ApiError::status(status.as_u16(), url, body));
    }

    let body = res.bytes().await.map_err(|e| ApiError::transport(url, e))?;

    serde_json::from_slice(&body).map_err(|e| ApiError::unexpected(url, e))
}
