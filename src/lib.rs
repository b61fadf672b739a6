//! Water coverage report: load a district coverage table, derive coverage
//! percentages, and build chart specifications for a selected district.
pub mod charts;
pub mod config;
pub mod enrich;
pub mod error;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod reports;
pub mod types;
pub mod util;

pub use error::{ReportError, Result};
