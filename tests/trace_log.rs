use std::collections::HashMap;

use async_trait::async_trait;

use bomtrace::client::{ClientError, ClientResult, TraceClient};
use bomtrace::domain::{ItemApp, ItemRef, RawPage, StockSeries, StockSource};
use bomtrace::report::render_page;
use bomtrace::trace::{
    detail_view, fetch_stock, fetch_trace_page, flatten, table_cell, DetailView,
};

/// Serves canned JSON pages keyed by page number.
struct JsonBackend {
    pages: HashMap<u32, &'static str>,
    stock: &'static str,
}

#[async_trait]
impl TraceClient for JsonBackend {
    async fn list_events(
        &self,
        _item: ItemRef,
        page: u32,
        _page_size: u32,
    ) -> ClientResult<RawPage> {
        let body = self
            .pages
            .get(&page)
            .ok_or_else(|| ClientError::NotFound(format!("page {}", page)))?;
        serde_json::from_str(body).map_err(|e| ClientError::ParseError(e.to_string()))
    }

    async fn stock_series(&self, _item: ItemRef) -> ClientResult<StockSeries> {
        serde_json::from_str(self.stock).map_err(|e| ClientError::ParseError(e.to_string()))
    }
}

const PCBA_PAGE: &str = r#"{
  "count": 5,
  "results": [
    {"id": 5, "event_type": "bom_cleared", "timestamp": "2024-03-01T09:30:12.900Z",
     "user": {"id": 7, "first_name": "Ada", "last_name": "Lovelace"},
     "field_name": "clear bom", "old_value": "R1 → RES-10K"},
    {"id": 4, "event_type": "bom_cleared", "timestamp": "2024-03-01T09:30:12.100Z",
     "user": {"id": 7, "first_name": "Ada", "last_name": "Lovelace"},
     "field_name": "clear bom", "old_value": "C3 → CAP-1U"},
    {"id": 3, "eventType": "bom_edited", "timestamp": "2024-02-28T16:00:00Z",
     "actor": {"id": 9, "firstName": "Grace", "lastName": "Hopper"},
     "fieldName": "refdes", "oldValue": "U1 → MCU-A", "newValue": "U2 → MCU-A",
     "details": "refdes U1 → U2"},
    {"id": 2, "event_type": "revision_created", "timestamp": "2024-02-20T08:00:00Z",
     "details": "Revision B created"},
    {"id": 1, "event_type": "created", "timestamp": "2024-02-01T08:00:00Z"}
  ]
}"#;

fn pcba() -> ItemRef {
    ItemRef::new(ItemApp::Pcbas, 42)
}

fn backend() -> JsonBackend {
    JsonBackend {
        pages: HashMap::from([(1, PCBA_PAGE)]),
        stock: r#"{
          "history": [{"date": "2024-01-01", "quantity": 10}],
          "purchaseOrders": [{"date": "2024-01-05", "quantity": 5}],
          "forecast": [{"date": "2024-01-05", "quantity": -3}]
        }"#,
    }
}

#[tokio::test]
async fn clear_bom_rows_collapse_into_one_row() {
    let page = fetch_trace_page(&backend(), pcba(), 1).await.expect("page");

    assert_eq!(page.total_count, 5);
    assert_eq!(page.events.len(), 4);
    assert_eq!(flatten(&page.events).len(), 5);

    let batch = &page.events[0];
    assert!(batch.is_clear_batch());
    assert_eq!(
        table_cell(batch, "Ref.Des.").text,
        "Removed Ref.Des.: R1, C3"
    );
    match detail_view(batch, "Ref.Des.") {
        DetailView::ClearedRows(rows) => {
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[1].designator, "C3");
            assert_eq!(rows[1].part, "CAP-1U");
        }
        other => panic!("expected cleared rows, got {other:?}"),
    }
}

#[tokio::test]
async fn bom_diff_uses_app_terminology() {
    let page = fetch_trace_page(&backend(), pcba(), 1).await.expect("page");
    let edit = &page.events[1];

    assert_eq!(
        table_cell(edit, "Ref.Des.").text,
        "Ref.Des. U1 (Ref.Des.) → U2"
    );
    assert_eq!(
        detail_view(edit, "Ref.Des."),
        DetailView::Comparison {
            field_label: "Ref.Des.".to_string(),
            previous: "U1 (Ref.Des.) → MCU-A".to_string(),
            current: "U2 (Ref.Des.) → MCU-A".to_string(),
        }
    );

    // Non-BOM events keep their text and fall back when empty
    assert_eq!(table_cell(&page.events[2], "Ref.Des.").text, "Revision B created");
    assert_eq!(
        detail_view(&page.events[3], "Ref.Des."),
        DetailView::Text("No details available.".to_string())
    );
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
    let page = fetch_trace_page(&backend(), pcba(), 2).await.expect("page");
    assert!(page.events.is_empty());
    assert!(!page.has_next());
    assert!(page.has_prev());
}

#[tokio::test]
async fn stock_series_runs_as_one_total() {
    let points = fetch_stock(&backend(), pcba()).await.expect("stock");
    let totals: Vec<(f64, StockSource)> = points.iter().map(|p| (p.quantity, p.source)).collect();
    assert_eq!(
        totals,
        vec![
            (10.0, StockSource::History),
            (15.0, StockSource::PurchaseOrder),
            (12.0, StockSource::Forecast),
        ]
    );
}

#[tokio::test]
async fn print_report_lists_every_row() {
    let page = fetch_trace_page(&backend(), pcba(), 1).await.expect("page");
    let text = render_page(&page);

    assert!(text.starts_with("PCBA pcbas/42  page 1/1  (5 events)"));
    assert!(text.contains("Ada Lovelace"));
    assert!(text.contains("Grace Hopper"));
    assert!(text.contains("Unknown"));
    assert!(text.contains("Removed Ref.Des.: R1, C3"));
}
