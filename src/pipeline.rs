use crate::charts;
use crate::enrich::enrich;
use crate::error::{ReportError, Result};
use crate::loader::load_table;
use crate::reports::DistrictChoices;
use crate::types::{CoverageRecord, Report};
use std::path::Path;
use tracing::info;

/// Load and enrich the table at `path`.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<CoverageRecord>> {
    Ok(enrich(load_table(path)?))
}

/// Load the table once and compute the districts the analyst may pick.
pub fn load_choices(path: impl AsRef<Path>) -> Result<DistrictChoices> {
    let records = load_records(path)?;
    let choices = DistrictChoices::from_records(&records);
    info!(districts = choices.len(), "computed district choices");
    Ok(choices)
}

/// Run load, enrich, aggregate and present from scratch for `district`.
pub fn run(path: impl AsRef<Path>, district: &str) -> Result<Report> {
    let records = load_records(path)?;
    let choices = DistrictChoices::from_records(&records);
    let selected = choices
        .select(district)
        .ok_or_else(|| ReportError::UnknownDistrict(district.to_string()))?;
    Ok(charts::present(&records, &selected))
}
