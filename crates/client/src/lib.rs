//! HTTP access to the Electricity Maps carbon-intensity history.

pub mod client;
pub mod source;

pub use client::{history_url, parse_history, ElectricityMapsClient};
pub use source::HistorySource;
