use folio_core::FetchFailure;
use folio_core::GroupSummary;
use folio_core::OwnerSummary;
use folio_core::RawConfig;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("{resource} unavailable: {reason}")]
    Unavailable { resource: &'static str, reason: String },
    #[error("{resource} io: {source}")]
    Io {
        resource: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{resource} decode: {source}")]
    Decode {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl From<BackendError> for FetchFailure {
    fn from(err: BackendError) -> Self {
        FetchFailure::new(err.to_string())
    }
}

/// The data endpoints the route engine depends on.
pub trait PortfolioBackend {
    fn name(&self) -> &'static str;

    fn fetch_owners(&self) -> Result<Vec<OwnerSummary>, BackendError>;
    fn fetch_groups(&self) -> Result<Vec<GroupSummary>, BackendError>;
    fn fetch_config(&self) -> Result<RawConfig, BackendError>;
}
