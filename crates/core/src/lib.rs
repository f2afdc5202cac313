pub mod error;
pub mod sample;

pub use error::{ReportError, Result};
pub use sample::{History, Sample};
