use crate::domain::*;
use crate::trace::TracePage;

#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    NavigateUp,
    NavigateDown,
    NavigateTop,
    NavigateBottom,
    PageUp,
    PageDown,
    Select,
    Back,

    // Pagination
    NextPage,
    PrevPage,

    // View switching
    SwitchView(ViewType),
    NextTab,
    PrevTab,

    // Vim chord
    EnterPendingG,

    // UI
    OpenCommandInput,
    CloseOverlay,
    SubmitCommandInput(String),
    UpdateInputBuffer(String),
    ToggleHelp,

    // Data responses, tagged with the request sequence they answer
    TraceLoaded { seq: u64, page: Box<TracePage> },
    TraceFailed { seq: u64, message: String },
    StockLoaded { seq: u64, points: Vec<StockPoint> },
    StockFailed { seq: u64, message: String },

    // App control
    Refresh,
    Quit,
    Tick,
    Error(String),
    ClearError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    Trace,
    Stock,
}

impl ViewType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Trace => "Traceability",
            Self::Stock => "Stock",
        }
    }

    pub fn all() -> [ViewType; 2] {
        [Self::Trace, Self::Stock]
    }
}
