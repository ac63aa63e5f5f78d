// Gateway module for the remote query service - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod http;
mod traits;
mod types;

// Public re-exports - the ONLY way to access gateway functionality
pub use http::HttpGateway;
pub use traits::QueryGateway;
pub use types::{DataRow, QueryResponse, StatsResponse};

#[cfg(test)]
pub use traits::MockQueryGateway;
