use crate::types::{CoverageRecord, RawRow};
use crate::util::{parse_date_code, percentage};
use tracing::debug;

/// Add the parsed cutoff date and the two coverage percentages to every row.
///
/// Rows are never dropped: an unparseable date becomes `None` and a zero or
/// missing total makes both percentages NaN.
pub fn enrich(rows: Vec<RawRow>) -> Vec<CoverageRecord> {
    let mut invalid_dates = 0usize;
    let mut undefined_pcts = 0usize;

    let records: Vec<CoverageRecord> = rows
        .into_iter()
        .map(|row| {
            let cutoff_date = parse_date_code(row.cutoff_date.as_deref());
            if cutoff_date.is_none() {
                invalid_dates += 1;
            }
            let pct_with_coverage =
                percentage(row.population_with_coverage, row.total_population);
            let pct_without_coverage =
                percentage(row.population_without_coverage, row.total_population);
            if pct_with_coverage.is_nan() {
                undefined_pcts += 1;
            }
            CoverageRecord {
                department: row.department,
                province: row.province,
                district: row.district,
                cutoff_date,
                total_population: row.total_population,
                population_with_coverage: row.population_with_coverage,
                population_without_coverage: row.population_without_coverage,
                pct_with_coverage,
                pct_without_coverage,
            }
        })
        .collect();

    debug!(
        rows = records.len(),
        invalid_dates, undefined_pcts, "enriched coverage table"
    );
    records
}
