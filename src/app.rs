use std::time::{Duration, Instant};

use ratatui::widgets::TableState;

use crate::action::{Action, ViewType};
use crate::domain::*;
use crate::input::commands::resolve_command;
use crate::trace::{page_count, GroupedEvent, TracePage};

/// How long an error toast stays on screen.
const ERROR_TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Trace,
    Stock,
}

impl From<ViewType> for View {
    fn from(view: ViewType) -> Self {
        match view {
            ViewType::Trace => Self::Trace,
            ViewType::Stock => Self::Stock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
    PendingG,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    /// Detail modal for the group at this index of the current page.
    EventDetail(usize),
}

#[derive(Debug, Clone)]
pub enum LoadState<T> {
    NotLoaded,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadTrace { seq: u64, item: ItemRef, page: u32 },
    LoadStock { seq: u64, item: ItemRef },
    Quit,
}

pub struct App {
    // View state
    pub view: View,
    pub input_mode: InputMode,
    pub overlay: Overlay,

    // Backend
    pub backend: String,
    pub connection_status: ConnectionStatus,

    // Item and its log
    pub item: ItemRef,
    pub page: u32,
    pub total_count: Option<u64>,
    pub trace: LoadState<TracePage>,
    pub trace_table_state: TableState,

    // Stock
    pub stock: LoadState<Vec<StockPoint>>,

    // Detail scroll
    pub detail_scroll: u16,

    // Input
    pub input_buffer: String,

    // Request sequencing; responses for anything but the pending seq are dropped
    pub request_seq: u64,
    pub trace_pending: Option<u64>,
    pub stock_pending: Option<u64>,

    // App
    pub should_quit: bool,
    pub last_error: Option<(String, Instant)>,
}

impl App {
    pub fn new(item: ItemRef, backend: String) -> Self {
        Self {
            view: View::Trace,
            input_mode: InputMode::Normal,
            overlay: Overlay::None,

            backend,
            connection_status: ConnectionStatus::Connecting,

            item,
            page: 1,
            total_count: None,
            trace: LoadState::NotLoaded,
            trace_table_state: TableState::default(),

            stock: LoadState::NotLoaded,

            detail_scroll: 0,

            input_buffer: String::new(),

            request_seq: 0,
            trace_pending: None,
            stock_pending: None,

            should_quit: false,
            last_error: None,
        }
    }

    /// Effects to run once at startup.
    pub fn init(&mut self, page: u32) -> Vec<Effect> {
        self.page = page.max(1);
        vec![self.load_trace()]
    }

    pub fn designator_label(&self) -> &'static str {
        self.item.app.designator_label()
    }

    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        self.expire_error();

        match action {
            // Navigation
            Action::NavigateUp => {
                if self.is_detail_open() {
                    self.detail_scroll = self.detail_scroll.saturating_sub(1);
                } else {
                    self.navigate_up();
                }
                vec![]
            }
            Action::NavigateDown => {
                if self.is_detail_open() {
                    self.detail_scroll = self.detail_scroll.saturating_add(1);
                } else {
                    self.navigate_down();
                }
                vec![]
            }
            Action::NavigateTop => {
                self.input_mode = InputMode::Normal;
                if self.is_detail_open() {
                    self.detail_scroll = 0;
                } else if self.view == View::Trace {
                    self.trace_table_state.select_first();
                }
                vec![]
            }
            Action::NavigateBottom => {
                if self.is_detail_open() {
                    self.detail_scroll = u16::MAX;
                } else if self.view == View::Trace {
                    self.select_last();
                }
                vec![]
            }
            Action::PageUp => {
                if self.is_detail_open() {
                    self.detail_scroll =
                        self.detail_scroll.saturating_sub(self.page_height() as u16);
                } else {
                    for _ in 0..self.page_height() {
                        self.navigate_up();
                    }
                }
                vec![]
            }
            Action::PageDown => {
                if self.is_detail_open() {
                    self.detail_scroll =
                        self.detail_scroll.saturating_add(self.page_height() as u16);
                } else {
                    for _ in 0..self.page_height() {
                        self.navigate_down();
                    }
                }
                vec![]
            }
            Action::Select => self.handle_select(),
            Action::Back => {
                self.input_mode = InputMode::Normal;
                self.overlay = Overlay::None;
                vec![]
            }

            // Pagination
            Action::NextPage => {
                if self.view != View::Trace || self.page >= self.known_page_count() {
                    return vec![];
                }
                self.goto_page(self.page + 1)
            }
            Action::PrevPage => {
                if self.view != View::Trace || self.page <= 1 {
                    return vec![];
                }
                self.goto_page(self.page - 1)
            }

            // View switching
            Action::SwitchView(view_type) => self.switch_view(view_type.into()),
            Action::NextTab | Action::PrevTab => {
                let next = match self.view {
                    View::Trace => View::Stock,
                    View::Stock => View::Trace,
                };
                self.switch_view(next)
            }

            // Vim chord
            Action::EnterPendingG => {
                self.input_mode = InputMode::PendingG;
                vec![]
            }

            // UI
            Action::OpenCommandInput => {
                self.input_mode = InputMode::Command;
                self.input_buffer.clear();
                vec![]
            }
            Action::CloseOverlay => {
                if self.overlay != Overlay::None {
                    self.overlay = Overlay::None;
                } else if self.input_mode != InputMode::Normal {
                    self.input_mode = InputMode::Normal;
                    self.input_buffer.clear();
                }
                vec![]
            }
            Action::SubmitCommandInput(cmd) => {
                self.input_mode = InputMode::Normal;
                let effects = self.execute_command(&cmd);
                self.input_buffer.clear();
                effects
            }
            Action::UpdateInputBuffer(buf) => {
                self.input_buffer = buf;
                vec![]
            }
            Action::ToggleHelp => {
                self.overlay = if self.overlay == Overlay::Help {
                    Overlay::None
                } else {
                    Overlay::Help
                };
                vec![]
            }

            // Data responses
            Action::TraceLoaded { seq, page } => {
                if self.trace_pending != Some(seq) {
                    tracing::debug!(seq, pending = ?self.trace_pending, "dropping stale trace page");
                    return vec![];
                }
                self.trace_pending = None;
                self.connection_status = ConnectionStatus::Connected;
                if !page.is_past_end() {
                    self.total_count = Some(page.total_count);
                }
                let len = page.events.len();
                self.trace = LoadState::Loaded(*page);
                self.clamp_selection(len);
                vec![]
            }
            Action::TraceFailed { seq, message } => {
                if self.trace_pending != Some(seq) {
                    tracing::debug!(seq, "dropping stale trace failure");
                    return vec![];
                }
                self.trace_pending = None;
                tracing::warn!(item = %self.item, page = self.page, "{}", message);
                self.trace = LoadState::Loaded(TracePage::empty(self.item, self.page));
                self.trace_table_state = TableState::default();
                self.report_error(message);
                vec![]
            }
            Action::StockLoaded { seq, points } => {
                if self.stock_pending != Some(seq) {
                    tracing::debug!(seq, "dropping stale stock series");
                    return vec![];
                }
                self.stock_pending = None;
                self.connection_status = ConnectionStatus::Connected;
                self.stock = LoadState::Loaded(points);
                vec![]
            }
            Action::StockFailed { seq, message } => {
                if self.stock_pending != Some(seq) {
                    return vec![];
                }
                self.stock_pending = None;
                tracing::warn!(item = %self.item, "{}", message);
                self.stock = LoadState::Error(message.clone());
                self.report_error(message);
                vec![]
            }

            // App control
            Action::Refresh => self.refresh_current_view(),
            Action::Quit => {
                self.should_quit = true;
                vec![Effect::Quit]
            }
            Action::Tick => vec![],
            Action::Error(msg) => {
                self.report_error(msg);
                vec![]
            }
            Action::ClearError => {
                self.last_error = None;
                vec![]
            }
        }
    }

    /// Groups of the loaded page, if any.
    pub fn groups(&self) -> &[GroupedEvent] {
        self.trace
            .data()
            .map(|p| p.events.as_slice())
            .unwrap_or_default()
    }

    pub fn selected_group(&self) -> Option<&GroupedEvent> {
        let idx = self.trace_table_state.selected()?;
        self.groups().get(idx)
    }

    pub fn detail_group(&self) -> Option<&GroupedEvent> {
        match self.overlay {
            Overlay::EventDetail(idx) => self.groups().get(idx),
            _ => None,
        }
    }

    pub fn known_page_count(&self) -> u32 {
        self.total_count.map(page_count).unwrap_or(1)
    }

    /// Switches to another item, dropping every response still in flight for
    /// the previous one.
    pub fn open_item(&mut self, item: ItemRef) -> Vec<Effect> {
        self.item = item;
        self.page = 1;
        self.total_count = None;
        self.overlay = Overlay::None;
        self.trace = LoadState::NotLoaded;
        self.trace_table_state = TableState::default();
        self.stock = LoadState::NotLoaded;
        self.trace_pending = None;
        self.stock_pending = None;
        self.refresh_current_view()
    }

    fn goto_page(&mut self, page: u32) -> Vec<Effect> {
        self.page = page;
        self.overlay = Overlay::None;
        self.trace_table_state = TableState::default();
        vec![self.load_trace()]
    }

    fn switch_view(&mut self, view: View) -> Vec<Effect> {
        if self.view != view {
            self.abandon_pending(self.view);
        }
        self.view = view;
        self.overlay = Overlay::None;
        match view {
            View::Trace if self.trace.data().is_none() && self.trace_pending.is_none() => {
                vec![self.load_trace()]
            }
            View::Stock if self.stock.data().is_none() && self.stock_pending.is_none() => {
                vec![self.load_stock()]
            }
            _ => vec![],
        }
    }

    /// Forgets the request in flight for `view`; its response will be dropped
    /// and the view reloads when it is shown again.
    fn abandon_pending(&mut self, view: View) {
        match view {
            View::Trace => {
                if self.trace_pending.take().is_some() {
                    self.trace = LoadState::NotLoaded;
                }
            }
            View::Stock => {
                if self.stock_pending.take().is_some() {
                    self.stock = LoadState::NotLoaded;
                }
            }
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.request_seq += 1;
        self.request_seq
    }

    fn load_trace(&mut self) -> Effect {
        let seq = self.next_seq();
        self.trace_pending = Some(seq);
        self.trace = LoadState::Loading;
        Effect::LoadTrace {
            seq,
            item: self.item,
            page: self.page,
        }
    }

    fn load_stock(&mut self) -> Effect {
        let seq = self.next_seq();
        self.stock_pending = Some(seq);
        self.stock = LoadState::Loading;
        Effect::LoadStock {
            seq,
            item: self.item,
        }
    }

    fn refresh_current_view(&mut self) -> Vec<Effect> {
        match self.view {
            View::Trace => vec![self.load_trace()],
            View::Stock => vec![self.load_stock()],
        }
    }

    fn handle_select(&mut self) -> Vec<Effect> {
        if self.view != View::Trace || self.is_detail_open() {
            return vec![];
        }
        if let Some(idx) = self.trace_table_state.selected() {
            if idx < self.groups().len() {
                self.overlay = Overlay::EventDetail(idx);
                self.detail_scroll = 0;
            }
        }
        vec![]
    }

    fn execute_command(&mut self, cmd: &str) -> Vec<Effect> {
        let mut parts = cmd.trim().splitn(2, ' ');
        let command = parts.next().unwrap_or("").to_lowercase();
        let args = parts.next().map(str::trim).filter(|s| !s.is_empty());

        let Some(def) = resolve_command(&command) else {
            self.report_error(format!("unknown command: {}", command));
            return vec![];
        };

        match def.name {
            "item" => match args.map(ItemRef::parse) {
                Some(Ok(item)) => self.open_item(item),
                Some(Err(err)) => {
                    self.report_error(err.to_string());
                    vec![]
                }
                None => {
                    self.report_error("usage: :item <app>/<id>".to_string());
                    vec![]
                }
            },
            "page" => match args.and_then(|a| a.parse::<u32>().ok()) {
                Some(page) if page >= 1 && page <= self.known_page_count() => {
                    if self.view != View::Trace {
                        self.abandon_pending(self.view);
                        self.view = View::Trace;
                    }
                    self.goto_page(page)
                }
                Some(page) => {
                    self.report_error(format!(
                        "page {} out of range (1-{})",
                        page,
                        self.known_page_count()
                    ));
                    vec![]
                }
                None => {
                    self.report_error("usage: :page <n>".to_string());
                    vec![]
                }
            },
            "trace" => self.switch_view(View::Trace),
            "stock" => self.switch_view(View::Stock),
            "quit" => {
                self.should_quit = true;
                vec![Effect::Quit]
            }
            "help" => {
                self.overlay = Overlay::Help;
                vec![]
            }
            _ => vec![],
        }
    }

    fn report_error(&mut self, msg: String) {
        if self.connection_status == ConnectionStatus::Connecting {
            self.connection_status = ConnectionStatus::Error(msg.clone());
        }
        self.last_error = Some((msg, Instant::now()));
    }

    fn expire_error(&mut self) {
        if let Some((_, at)) = &self.last_error {
            if at.elapsed() > ERROR_TOAST_TTL {
                self.last_error = None;
            }
        }
    }

    fn is_detail_open(&self) -> bool {
        matches!(self.overlay, Overlay::EventDetail(_))
    }

    fn clamp_selection(&mut self, len: usize) {
        match self.trace_table_state.selected() {
            _ if len == 0 => self.trace_table_state.select(None),
            Some(idx) if idx >= len => self.trace_table_state.select(Some(len - 1)),
            Some(_) => {}
            None => self.trace_table_state.select(Some(0)),
        }
    }

    fn navigate_up(&mut self) {
        if self.view == View::Trace {
            self.trace_table_state.select_previous();
        }
    }

    fn navigate_down(&mut self) {
        if self.view != View::Trace {
            return;
        }
        let len = self.groups().len();
        if len == 0 {
            return;
        }
        let next = self
            .trace_table_state
            .selected()
            .map(|i| (i + 1).min(len - 1))
            .unwrap_or(0);
        self.trace_table_state.select(Some(next));
    }

    fn select_last(&mut self) {
        let len = self.groups().len();
        if len > 0 {
            self.trace_table_state.select(Some(len - 1));
        }
    }

    fn page_height(&self) -> usize {
        20 // approximate; could be made dynamic
    }
}
