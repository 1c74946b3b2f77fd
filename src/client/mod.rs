#[cfg(test)]
pub mod fake;
pub mod http;
pub mod traits;

pub use http::HttpTraceClient;
pub use traits::{ClientError, ClientResult, TraceClient};
