use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{ClientError, ClientResult, TraceClient};
use crate::domain::*;

/// In-memory backend for tests.
#[derive(Default)]
pub struct FakeClient {
    pub pages: HashMap<u32, RawPage>,
    pub stock: StockSeries,
    pub fail_with: Option<fn() -> ClientError>,
    pub delays: HashMap<u32, Duration>,
    pub requests: Mutex<Vec<(ItemRef, u32, u32)>>,
}

impl FakeClient {
    pub fn with_page(mut self, page: u32, raw: RawPage) -> Self {
        self.pages.insert(page, raw);
        self
    }

    pub fn failing(mut self, err: fn() -> ClientError) -> Self {
        self.fail_with = Some(err);
        self
    }

    pub fn delayed(mut self, page: u32, delay: Duration) -> Self {
        self.delays.insert(page, delay);
        self
    }

    pub fn request_log(&self) -> Vec<(ItemRef, u32, u32)> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TraceClient for FakeClient {
    async fn list_events(
        &self,
        item: ItemRef,
        page: u32,
        page_size: u32,
    ) -> ClientResult<RawPage> {
        if let Ok(mut log) = self.requests.lock() {
            log.push((item, page, page_size));
        }
        if let Some(delay) = self.delays.get(&page) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(err) = self.fail_with {
            return Err(err());
        }
        self.pages
            .get(&page)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("page {}", page)))
    }

    async fn stock_series(&self, _item: ItemRef) -> ClientResult<StockSeries> {
        if let Some(err) = self.fail_with {
            return Err(err());
        }
        Ok(self.stock.clone())
    }
}

pub fn raw_event(id: i64, event_type: &str, timestamp: &str, json_extra: &str) -> RawTraceEvent {
    let json = format!(
        r#"{{"id": {id}, "event_type": "{event_type}", "timestamp": "{timestamp}"{json_extra}}}"#
    );
    serde_json::from_str(&json).unwrap_or_else(|e| panic!("bad fixture {json}: {e}"))
}
