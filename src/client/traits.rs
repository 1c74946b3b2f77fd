use async_trait::async_trait;
use thiserror::Error;

use crate::domain::*;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("connection error: {0}")]
    ConnectionError(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("config error: {0}")]
    ConfigError(String),
    #[error("timeout")]
    Timeout,
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Read-only access to the PLM backend.
#[async_trait]
pub trait TraceClient: Send + Sync {
    /// One page of the item's traceability log, newest first.
    async fn list_events(
        &self,
        item: ItemRef,
        page: u32,
        page_size: u32,
    ) -> ClientResult<RawPage>;

    async fn stock_series(&self, item: ItemRef) -> ClientResult<StockSeries>;
}
