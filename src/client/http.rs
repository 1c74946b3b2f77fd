use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use super::{ClientError, ClientResult, TraceClient};
use crate::domain::*;

const REQUEST_ID_HEADER: &str = "X-Request-Id";

pub struct HttpTraceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTraceClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        // Url::join drops the last path segment unless it ends with '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| ClientError::ConfigError(format!("invalid base url {}: {}", base_url, e)))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bomtrace/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::ConfigError(format!("failed to build http client: {}", e)))?;

        tracing::info!("Using PLM backend at {}", base_url);

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn events_url(&self, item: ItemRef) -> ClientResult<Url> {
        self.endpoint(&format!("api/traceability/{}/{}/", item.app, item.id))
    }

    pub fn stock_url(&self, item: ItemRef) -> ClientResult<Url> {
        self.endpoint(&format!("api/stock/{}/{}/", item.app, item.id))
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::ConfigError(format!("invalid endpoint {}: {}", path, e)))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(%url, %request_id, ?query, "GET");

        let mut request = self.http.get(url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, %request_id, %status, "request rejected");
            return Err(status_error(status, &url));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::ParseError(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl TraceClient for HttpTraceClient {
    async fn list_events(
        &self,
        item: ItemRef,
        page: u32,
        page_size: u32,
    ) -> ClientResult<RawPage> {
        let url = self.events_url(item)?;
        let query = [("page", page.to_string()), ("page_size", page_size.to_string())];
        self.get_json(url, &query).await
    }

    async fn stock_series(&self, item: ItemRef) -> ClientResult<StockSeries> {
        let url = self.stock_url(item)?;
        self.get_json(url, &[]).await
    }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else if err.is_connect() {
        ClientError::ConnectionError(err.to_string())
    } else if err.is_decode() {
        ClientError::ParseError(err.to_string())
    } else {
        ClientError::RequestFailed(err.to_string())
    }
}

fn status_error(status: StatusCode, url: &Url) -> ClientError {
    match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(url.to_string()),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ClientError::Timeout,
        _ => ClientError::RequestFailed(format!("{}: {}", status, url)),
    }
}
