//! The intensity reporter: fetch the zone's history, pick the latest
//! measured sample, write it to every render target.
//!
//! Two "nothing to show" cases are kept apart on purpose:
//! - the fetch fails (transport, non-2xx, bad body): logged, returned as an
//!   error, targets untouched;
//! - the fetch works but no sample is measured: every target shows the
//!   fallback message.

pub mod refresh;

pub use refresh::spawn_refresh;

use carbon_client::HistorySource;
use carbon_config::ApiConfig;
use carbon_core::{Result, Sample};
use carbon_renderer::{Content, Renderer};
use tracing::{error, info};

/// What one successful pass wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Zone that was queried.
    pub zone: String,
    /// Content every target now shows.
    pub content: Content,
    /// Number of targets written.
    pub targets: usize,
}

/// Fetch the history for `api.zone_code` and render the latest measured sample.
///
/// On a fetch failure the error is logged and returned and `renderer` is not
/// called.
pub async fn fetch_and_render<S, R>(api: &ApiConfig, source: &S, renderer: &mut R) -> Result<Report>
where
    S: HistorySource + ?Sized,
    R: Renderer + ?Sized,
{
    let history = match source.fetch_history(api).await {
        Ok(history) => history,
        Err(e) => {
            error!(zone = %api.zone_code, "Error fetching carbon intensity: {e}");
            return Err(e);
        }
    };

    let sample = history.latest_measured();
    if sample.is_none() {
        info!(
            zone = %api.zone_code,
            samples = history.history.len(),
            "No measured sample in history"
        );
    }

    let content = Content::from_sample(sample);
    let targets = renderer.apply(&content)?;
    info!(zone = %api.zone_code, targets, "{content}");

    Ok(Report {
        zone: api.zone_code.clone(),
        content,
        targets,
    })
}

/// Write `sample`, or the fallback message when there is none, to every target.
pub fn render<R: Renderer + ?Sized>(sample: Option<&Sample>, renderer: &mut R) -> Result<usize> {
    renderer.apply(&Content::from_sample(sample))
}
