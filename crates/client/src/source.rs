use carbon_config::ApiConfig;
use carbon_core::{History, Result};
use std::future::Future;

/// Anything that can produce a carbon-intensity [`History`] for a zone.
///
/// The reporter only talks to this trait, so tests swap the network for
/// canned histories or failures.
pub trait HistorySource {
    /// Fetch the history for `api.zone_code`.
    ///
    /// Transport failures map to `ReportError::Network`, non-2xx replies to
    /// `ReportError::Status` and unreadable bodies to `ReportError::Parse`.
    fn fetch_history(&self, api: &ApiConfig) -> impl Future<Output = Result<History>> + Send;
}
