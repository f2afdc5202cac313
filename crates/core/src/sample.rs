use serde::{Deserialize, Serialize};

/// One carbon-intensity record from the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Grams of CO2-equivalent per kilowatt-hour.  The API sends `null`
    /// for hours it has no value for.
    #[serde(default)]
    pub carbon_intensity: Option<f64>,
    /// Timestamp exactly as the API reported it.
    pub datetime: String,
    /// `true` when the value was modelled rather than measured.
    /// Entries without the flag count as estimated.
    #[serde(default = "assume_estimated")]
    pub is_estimated: bool,
}

fn assume_estimated() -> bool {
    true
}

impl Sample {
    pub fn measured(carbon_intensity: f64, datetime: impl Into<String>) -> Self {
        Self {
            carbon_intensity: Some(carbon_intensity),
            datetime: datetime.into(),
            is_estimated: false,
        }
    }

    pub fn estimated(carbon_intensity: f64, datetime: impl Into<String>) -> Self {
        Self {
            carbon_intensity: Some(carbon_intensity),
            datetime: datetime.into(),
            is_estimated: true,
        }
    }

    /// Measured value, or `None` when estimated or missing.
    #[must_use]
    pub fn measured_value(&self) -> Option<f64> {
        if self.is_estimated {
            return None;
        }
        self.carbon_intensity
    }
}

/// JSON shape returned by `GET /carbon-intensity/history`.
///
/// Samples are expected oldest-to-newest; the order is trusted, not checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub zone: Option<String>,
    pub history: Vec<Sample>,
}

impl History {
    pub fn new(history: Vec<Sample>) -> Self {
        Self {
            zone: None,
            history,
        }
    }

    /// Measured samples that carry a value, in API order.
    pub fn measured(&self) -> impl DoubleEndedIterator<Item = &Sample> {
        self.history.iter().filter(|s| s.measured_value().is_some())
    }

    /// The most recent measured sample, if any.
    #[must_use]
    pub fn latest_measured(&self) -> Option<&Sample> {
        self.measured().next_back()
    }
}
