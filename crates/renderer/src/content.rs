use carbon_core::Sample;
use std::fmt;

/// Unit printed after every intensity value.
pub const UNIT_LABEL: &str = "gCO2eq/kWh";

/// Where the figures come from.
pub const ATTRIBUTION_URL: &str = "https://app.electricitymaps.com/";

/// Shown in every target when no measured sample exists.
pub const NO_DATA_MESSAGE: &str = "No valid data available.";

/// What every render target receives.  All targets get the same content.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Latest measured sample.
    Summary {
        carbon_intensity: f64,
        datetime: String,
    },
    /// The fetch worked but nothing in the history was measured.
    NoData,
}

impl Content {
    pub fn summary(carbon_intensity: f64, datetime: impl Into<String>) -> Self {
        Self::Summary {
            carbon_intensity,
            datetime: datetime.into(),
        }
    }

    /// `NoData` unless `sample` is measured and carries a value.
    pub fn from_sample(sample: Option<&Sample>) -> Self {
        sample
            .and_then(|s| Some(Self::summary(s.measured_value()?, s.datetime.clone())))
            .unwrap_or(Self::NoData)
    }

    /// Markup written into DOM containers and fragment files.
    pub fn to_html(&self) -> String {
        match self {
            Self::NoData => format!("<p>{NO_DATA_MESSAGE}</p>"),
            Self::Summary {
                carbon_intensity,
                datetime,
            } => format!(
                "<p>This server is using energy with a CO2 equivalent of \
                 <strong> {} </strong> gCO<sub>2eq</sub>/kWh </p>\n\
                 <p><em>Data collected at {} with the api {ATTRIBUTION_URL}</em></p>",
                carbon_intensity,
                escape_html(datetime),
            ),
        }
    }

    /// Single line for terminals and logs.
    pub fn to_text(&self) -> String {
        match self {
            Self::NoData => NO_DATA_MESSAGE.to_string(),
            Self::Summary {
                carbon_intensity,
                datetime,
            } => format!(
                "Carbon intensity: {carbon_intensity} {UNIT_LABEL} at {datetime} (data: {ATTRIBUTION_URL})"
            ),
        }
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_html_has_value_and_timestamp() {
        let content = Content::summary(42.0, "2024-01-01T00:00Z");
        let html = content.to_html();
        assert!(html.contains("<strong> 42 </strong>"));
        assert!(html.contains("2024-01-01T00:00Z"));
        assert!(html.contains(ATTRIBUTION_URL));
        assert_eq!(html.matches("<p>").count(), 2);
    }

    #[test]
    fn summary_text_has_unit_label() {
        let content = Content::summary(31.5, "2025-02-10T13:00Z");
        assert_eq!(
            content.to_text(),
            "Carbon intensity: 31.5 gCO2eq/kWh at 2025-02-10T13:00Z (data: https://app.electricitymaps.com/)"
        );
    }

    #[test]
    fn no_data_renders_fallback() {
        assert_eq!(Content::NoData.to_html(), "<p>No valid data available.</p>");
        assert_eq!(Content::NoData.to_string(), NO_DATA_MESSAGE);
        assert_eq!(Content::from_sample(None), Content::NoData);
    }

    #[test]
    fn from_sample_needs_a_measured_value() {
        let measured = Sample::measured(42.0, "t0");
        assert_eq!(Content::from_sample(Some(&measured)), Content::summary(42.0, "t0"));

        let estimated = Sample::estimated(55.0, "t1");
        assert_eq!(Content::from_sample(Some(&estimated)), Content::NoData);

        let blank = Sample {
            carbon_intensity: None,
            ..measured
        };
        assert_eq!(Content::from_sample(Some(&blank)), Content::NoData);
    }

    #[test]
    fn datetime_markup_is_escaped() {
        let content = Content::summary(1.0, "<script>");
        let html = content.to_html();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
