pub mod fetch;
pub mod format;
pub mod grouping;

pub use fetch::{fetch_stock, fetch_trace_page, page_count, TracePage, PAGE_SIZE};
pub use format::{apply_designator_label, detail_view, table_cell, ClearedRow, DetailView, TableCell};
pub use grouping::{flatten, group_events, GroupedEvent};
