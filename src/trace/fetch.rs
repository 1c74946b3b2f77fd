use crate::client::{ClientError, ClientResult, TraceClient};
use crate::domain::{aggregate_stock, ItemRef, StockPoint, TraceEvent};

use super::grouping::{group_events, GroupedEvent};

/// Events requested per page; the backend pages the log in these units.
pub const PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracePage {
    pub item: ItemRef,
    pub page: u32,
    pub events: Vec<GroupedEvent>,
    pub total_count: u64,
}

impl TracePage {
    pub fn empty(item: ItemRef, page: u32) -> Self {
        Self {
            item,
            page,
            events: Vec::new(),
            total_count: 0,
        }
    }

    /// Number of pages the backend holds; at least one.
    pub fn page_count(&self) -> u32 {
        page_count(self.total_count)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// The empty stand-in for a page the backend no longer has. It says
    /// nothing about the size of the log.
    pub fn is_past_end(&self) -> bool {
        self.page > 1 && self.total_count == 0 && self.events.is_empty()
    }
}

pub fn page_count(total_count: u64) -> u32 {
    let pages = total_count.div_ceil(u64::from(PAGE_SIZE)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Fetches one page of the item's log and groups it for display.
///
/// A missing page past the first is an empty page, not an error.
pub async fn fetch_trace_page(
    client: &dyn TraceClient,
    item: ItemRef,
    page: u32,
) -> ClientResult<TracePage> {
    let raw = match client.list_events(item, page, PAGE_SIZE).await {
        Ok(raw) => raw,
        Err(ClientError::NotFound(what)) if page > 1 => {
            tracing::debug!(%item, page, %what, "page out of range");
            return Ok(TracePage::empty(item, page));
        }
        Err(e) => return Err(e),
    };

    let events: Vec<TraceEvent> = raw.results.into_iter().map(TraceEvent::from).collect();
    let fetched = events.len();
    let events = group_events(events, item.app.designator_label());
    tracing::debug!(%item, page, fetched, groups = events.len(), total = raw.count, "trace page loaded");

    Ok(TracePage {
        item,
        page,
        events,
        total_count: raw.count,
    })
}

pub async fn fetch_stock(client: &dyn TraceClient, item: ItemRef) -> ClientResult<Vec<StockPoint>> {
    let series = client.stock_series(item).await?;
    Ok(aggregate_stock(&series))
}
