//! Provider adapter seam.
//!
//! An adapter turns a [`SearchQuery`] into calls against one upstream metadata
//! provider and returns canonical [`MovieRecord`]s. Adapters absorb their own
//! failures: [`MovieProvider::search`] always yields a [`ProviderOutcome`] and
//! never an error, so one broken provider cannot fail an aggregation.

use thiserror::Error;
use tracing::warn;

use crate::models::{MovieRecord, SearchQuery, Source};

/// Failures an adapter may hit while talking to its provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} unavailable: {message}")]
    Unavailable { provider: Source, message: String },

    #[error("{provider} task failed: {message}")]
    Crashed { provider: Source, message: String },
}

impl ProviderError {
    pub fn unavailable(provider: Source, err: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            provider,
            message: err.to_string(),
        }
    }
}

/// Result of one adapter call as seen by the aggregator.
#[derive(Debug)]
pub enum ProviderOutcome {
    Found(Vec<MovieRecord>),
    Empty,
    Failed(ProviderError),
}

impl ProviderOutcome {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::Empty => "empty",
            Self::Failed(_) => "failed",
        }
    }

    #[must_use]
    pub fn into_records(self) -> Vec<MovieRecord> {
        match self {
            Self::Found(records) => records,
            Self::Empty | Self::Failed(_) => Vec::new(),
        }
    }
}

impl From<Result<Vec<MovieRecord>, ProviderError>> for ProviderOutcome {
    fn from(result: Result<Vec<MovieRecord>, ProviderError>) -> Self {
        match result {
            Ok(records) if records.is_empty() => Self::Empty,
            Ok(records) => Self::Found(records),
            Err(e) => Self::Failed(e),
        }
    }
}

#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    fn source(&self) -> Source;

    /// Runs the provider-specific lookup. Errors here are top-level failures
    /// (the initial list call); per-item failures are skipped inside.
    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<MovieRecord>, ProviderError>;

    async fn search(&self, query: &SearchQuery) -> ProviderOutcome {
        let outcome = ProviderOutcome::from(self.fetch(query).await);

        if let ProviderOutcome::Failed(e) = &outcome {
            warn!(provider = %self.source(), error = %e, "Provider search failed");
        }

        metrics::counter!(
            "provider_requests_total",
            "provider" => self.source().as_str(),
            "outcome" => outcome.label()
        )
        .increment(1);

        outcome
    }
}
