use crate::types::{CoverageRecord, DatasetSummary, ProvinceTotal};
use std::collections::{BTreeMap, HashSet};

pub const TOP_PROVINCES: usize = 5;

/// Rows with a nonzero population lacking coverage.
pub fn problem_rows(data: &[CoverageRecord]) -> Vec<&CoverageRecord> {
    data.iter().filter(|r| r.has_uncovered_population()).collect()
}

/// Distinct departments, provinces and districts over the whole table, plus
/// the distinct districts that have population without coverage.
pub fn summarize(data: &[CoverageRecord]) -> DatasetSummary {
    let departments: HashSet<&str> = data.iter().map(|r| r.department.as_str()).collect();
    let provinces: HashSet<&str> = data.iter().map(|r| r.province.as_str()).collect();
    let districts: HashSet<&str> = data.iter().map(|r| r.district.as_str()).collect();
    let with_problems: HashSet<&str> = data
        .iter()
        .filter(|r| r.has_uncovered_population())
        .map(|r| r.district.as_str())
        .collect();
    DatasetSummary {
        departments: departments.len(),
        provinces: provinces.len(),
        districts: districts.len(),
        districts_with_problems: with_problems.len(),
    }
}

/// Provinces ranked by summed population without coverage, largest first.
///
/// Groups are keyed alphabetically and the sort is stable, so equal sums come
/// out in province-name order. Missing cells add nothing; sums saturate.
pub fn top_provinces(data: &[CoverageRecord], n: usize) -> Vec<ProvinceTotal> {
    let mut sums: BTreeMap<&str, u64> = BTreeMap::new();
    for r in data {
        let sum = sums.entry(r.province.as_str()).or_insert(0);
        *sum = sum.saturating_add(r.population_without_coverage.unwrap_or(0));
    }
    let mut totals: Vec<ProvinceTotal> = sums
        .into_iter()
        .map(|(province, sum)| ProvinceTotal {
            province: province.to_string(),
            population_without_coverage: sum,
        })
        .collect();
    totals.sort_by(|a, b| b.population_without_coverage.cmp(&a.population_without_coverage));
    totals.truncate(n);
    totals
}

/// The districts an analyst may pick: distinct problem districts in
/// first-encounter order, computed once per load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistrictChoices {
    districts: Vec<String>,
}

/// A district known to be in [`DistrictChoices`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedDistrict(String);

impl SelectedDistrict {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl DistrictChoices {
    pub fn from_records(data: &[CoverageRecord]) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let districts = data
            .iter()
            .filter(|r| r.has_uncovered_population())
            .filter(|r| seen.insert(r.district.as_str()))
            .map(|r| r.district.clone())
            .collect();
        Self { districts }
    }

    pub fn len(&self) -> usize {
        self.districts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.districts.iter().map(String::as_str)
    }

    pub fn select(&self, name: &str) -> Option<SelectedDistrict> {
        self.districts
            .iter()
            .find(|d| d.as_str() == name)
            .map(|d| SelectedDistrict(d.clone()))
    }

    /// Select by zero-based position, as shown in the menu.
    pub fn select_index(&self, idx: usize) -> Option<SelectedDistrict> {
        self.districts.get(idx).map(|d| SelectedDistrict(d.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(province: &str, district: &str, without: Option<u64>) -> CoverageRecord {
        CoverageRecord {
            department: "CUSCO".into(),
            province: province.into(),
            district: district.into(),
            cutoff_date: None,
            total_population: Some(100),
            population_with_coverage: without.map(|w| 100u64.saturating_sub(w)),
            population_without_coverage: without,
            pct_with_coverage: f64::NAN,
            pct_without_coverage: f64::NAN,
        }
    }

    #[test]
    fn problem_filter_keeps_only_positive_uncovered() {
        let data = vec![
            rec("A", "a1", Some(0)),
            rec("A", "a2", Some(3)),
            rec("B", "b1", None),
        ];
        let rows = problem_rows(&data);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].district, "a2");
    }

    #[test]
    fn summary_counts_distinct_values() {
        let data = vec![
            rec("A", "a1", Some(0)),
            rec("A", "a1", Some(2)),
            rec("A", "a2", Some(0)),
            rec("B", "b1", Some(9)),
        ];
        let s = summarize(&data);
        assert_eq!(s.departments, 1);
        assert_eq!(s.provinces, 2);
        assert_eq!(s.districts, 3);
        assert_eq!(s.districts_with_problems, 2);
        assert!(s.districts_with_problems <= s.districts);
    }

    #[test]
    fn top_provinces_sorted_descending_and_truncated() {
        let data = vec![
            rec("A", "a", Some(10)),
            rec("B", "b", Some(50)),
            rec("C", "c", Some(5)),
            rec("D", "d", Some(70)),
            rec("E", "e", Some(1)),
            rec("F", "f", Some(30)),
            rec("A", "a", Some(45)),
        ];
        let top = top_provinces(&data, TOP_PROVINCES);
        let names: Vec<&str> = top.iter().map(|p| p.province.as_str()).collect();
        assert_eq!(names, vec!["D", "A", "B", "F", "C"]);
        assert_eq!(top[1].population_without_coverage, 55);
        assert!(top
            .windows(2)
            .all(|w| w[0].population_without_coverage >= w[1].population_without_coverage));
    }

    #[test]
    fn top_provinces_ties_follow_province_name() {
        let data = vec![
            rec("ZURITE", "z", Some(10)),
            rec("MOLLE", "m", Some(20)),
            rec("ACOMAYO", "a", Some(10)),
        ];
        let top = top_provinces(&data, TOP_PROVINCES);
        let names: Vec<&str> = top.iter().map(|p| p.province.as_str()).collect();
        assert_eq!(names, vec!["MOLLE", "ACOMAYO", "ZURITE"]);
    }

    #[test]
    fn top_provinces_saturate_instead_of_overflowing() {
        let data = vec![rec("A", "a", Some(u64::MAX)), rec("A", "a", Some(5))];
        let top = top_provinces(&data, TOP_PROVINCES);
        assert_eq!(top[0].population_without_coverage, u64::MAX);
    }

    #[test]
    fn top_provinces_skip_missing_cells() {
        let data = vec![rec("A", "a", None), rec("A", "a", Some(4))];
        let top = top_provinces(&data, TOP_PROVINCES);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].population_without_coverage, 4);
    }

    #[test]
    fn choices_are_distinct_problem_districts_in_order() {
        let data = vec![
            rec("A", "x", Some(1)),
            rec("A", "ok", Some(0)),
            rec("B", "y", Some(2)),
            rec("A", "x", Some(7)),
        ];
        let choices = DistrictChoices::from_records(&data);
        assert_eq!(choices.iter().collect::<Vec<_>>(), vec!["x", "y"]);
        assert!(choices.select("ok").is_none());
        assert_eq!(choices.select("y").map(|s| s.name().to_string()), Some("y".into()));
        assert_eq!(choices.select_index(0).map(|s| s.name().to_string()), Some("x".into()));
        assert!(choices.select_index(2).is_none());
    }
}
