use async_trait::async_trait;

use super::types::{QueryResponse, StatsResponse};
use crate::utils::GatewayError;

/// Abstraction over the remote natural-language-query service.
///
/// The conversation core only ever talks to the backend through this
/// trait; transport, addressing, and retries live behind it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryGateway: Send + Sync {
    /// Ask a natural-language question and get a synthesized answer,
    /// optionally with tabular excerpts and the generated query.
    async fn ask(&self, question: &str) -> Result<QueryResponse, GatewayError>;

    /// Fetch headline dataset statistics. Failures are non-fatal to
    /// callers; they render as "stats unavailable".
    async fn stats(&self) -> Result<StatsResponse, GatewayError>;
}
