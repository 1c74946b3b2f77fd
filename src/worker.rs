use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::action::Action;
use crate::client::TraceClient;
use crate::domain::ItemRef;
use crate::trace::{fetch_stock, fetch_trace_page};

#[derive(Debug)]
pub enum CliRequest {
    LoadTrace { seq: u64, item: ItemRef, page: u32 },
    LoadStock { seq: u64, item: ItemRef },
}

#[derive(Clone)]
pub struct CliHandle {
    tx: mpsc::UnboundedSender<CliRequest>,
}

impl CliHandle {
    pub fn send(&self, request: CliRequest) {
        let _ = self.tx.send(request);
    }
}

/// Runs backend requests off the UI loop and answers with actions.
///
/// A newer request of the same kind aborts the one still in flight.
pub struct CliWorker {
    client: Arc<dyn TraceClient>,
    rx: mpsc::UnboundedReceiver<CliRequest>,
    action_tx: mpsc::UnboundedSender<Action>,
    trace_task: Option<JoinHandle<()>>,
    stock_task: Option<JoinHandle<()>>,
}

impl CliWorker {
    pub fn new(
        client: Arc<dyn TraceClient>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> (Self, CliHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = CliHandle { tx };
        let worker = Self {
            client,
            rx,
            action_tx,
            trace_task: None,
            stock_task: None,
        };
        (worker, handle)
    }

    pub async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            if self.action_tx.is_closed() {
                break;
            }
            match request {
                CliRequest::LoadTrace { seq, item, page } => {
                    supersede(&mut self.trace_task, seq);
                    let client = Arc::clone(&self.client);
                    let tx = self.action_tx.clone();
                    self.trace_task = Some(tokio::spawn(async move {
                        let action = load_trace(client.as_ref(), seq, item, page).await;
                        let _ = tx.send(action);
                    }));
                }
                CliRequest::LoadStock { seq, item } => {
                    supersede(&mut self.stock_task, seq);
                    let client = Arc::clone(&self.client);
                    let tx = self.action_tx.clone();
                    self.stock_task = Some(tokio::spawn(async move {
                        let action = load_stock(client.as_ref(), seq, item).await;
                        let _ = tx.send(action);
                    }));
                }
            }
        }

        for task in [self.trace_task.take(), self.stock_task.take()].into_iter().flatten() {
            task.abort();
        }
    }
}

fn supersede(task: &mut Option<JoinHandle<()>>, seq: u64) {
    if let Some(previous) = task.take() {
        if !previous.is_finished() {
            tracing::debug!(seq, "aborting superseded request");
            previous.abort();
        }
    }
}

async fn load_trace(client: &dyn TraceClient, seq: u64, item: ItemRef, page: u32) -> Action {
    match fetch_trace_page(client, item, page).await {
        Ok(page) => Action::TraceLoaded {
            seq,
            page: Box::new(page),
        },
        Err(e) => Action::TraceFailed {
            seq,
            message: format!("failed to load trace for {}: {}", item, e),
        },
    }
}

async fn load_stock(client: &dyn TraceClient, seq: u64, item: ItemRef) -> Action {
    match fetch_stock(client, item).await {
        Ok(points) => Action::StockLoaded { seq, points },
        Err(e) => Action::StockFailed {
            seq,
            message: format!("failed to load stock for {}: {}", item, e),
        },
    }
}
