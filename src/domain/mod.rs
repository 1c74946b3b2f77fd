pub mod item;
pub mod stock;
pub mod trace_event;

pub use item::*;
pub use stock::*;
pub use trace_event::*;
