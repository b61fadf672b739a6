use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One row of the input table as delivered. Numeric cells may be empty.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRow {
    #[serde(rename = "DEPARTAMENTO")]
    pub department: String,
    #[serde(rename = "PROVINCIA")]
    pub province: String,
    #[serde(rename = "DISTRITO")]
    pub district: String,
    #[serde(rename = "FECHA_CORTE")]
    pub cutoff_date: Option<String>,
    #[serde(rename = "TOTAL_POBLACION")]
    pub total_population: Option<u64>,
    #[serde(rename = "POBLACION_CON_COBERTURA")]
    pub population_with_coverage: Option<u64>,
    #[serde(rename = "POBLACION_SIN_COBERTURA")]
    pub population_without_coverage: Option<u64>,
}

/// A raw row plus the parsed cutoff date and the two derived percentages.
///
/// Percentages are NaN when the total is zero or an operand is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageRecord {
    pub department: String,
    pub province: String,
    pub district: String,
    pub cutoff_date: Option<NaiveDate>,
    pub total_population: Option<u64>,
    pub population_with_coverage: Option<u64>,
    pub population_without_coverage: Option<u64>,
    pub pct_with_coverage: f64,
    pub pct_without_coverage: f64,
}

impl CoverageRecord {
    pub fn has_uncovered_population(&self) -> bool {
        self.population_without_coverage.is_some_and(|n| n > 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Tabled)]
pub struct DatasetSummary {
    #[tabled(rename = "Departments")]
    pub departments: usize,
    #[tabled(rename = "Provinces")]
    pub provinces: usize,
    #[tabled(rename = "Districts")]
    pub districts: usize,
    #[tabled(rename = "DistrictsWithoutCoverage")]
    pub districts_with_problems: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvinceTotal {
    pub province: String,
    pub population_without_coverage: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
    pub start_angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    pub color: String,
    pub label_rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub date: Option<NaiveDate>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub y_label: String,
    pub points: Vec<LinePoint>,
    pub marker: String,
    pub label_rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// `counts.len() + 1` edges; the last bin is closed on the right.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    pub color: String,
    pub edge_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct DistrictRow {
    #[serde(rename = "DEPARTAMENTO")]
    #[tabled(rename = "DEPARTAMENTO")]
    pub department: String,
    #[serde(rename = "PROVINCIA")]
    #[tabled(rename = "PROVINCIA")]
    pub province: String,
    #[serde(rename = "DISTRITO")]
    #[tabled(rename = "DISTRITO")]
    pub district: String,
    #[serde(rename = "FECHA_CORTE")]
    #[tabled(rename = "FECHA_CORTE")]
    pub cutoff_date: String,
    #[serde(rename = "TOTAL_POBLACION")]
    #[tabled(rename = "TOTAL_POBLACION")]
    pub total_population: String,
    #[serde(rename = "POBLACION_CON_COBERTURA")]
    #[tabled(rename = "POBLACION_CON_COBERTURA")]
    pub population_with_coverage: String,
    #[serde(rename = "POBLACION_SIN_COBERTURA")]
    #[tabled(rename = "POBLACION_SIN_COBERTURA")]
    pub population_without_coverage: String,
    #[serde(rename = "PORCENTAJE_CON_COBERTURA")]
    #[tabled(rename = "PORCENTAJE_CON_COBERTURA")]
    pub pct_with_coverage: String,
    #[serde(rename = "PORCENTAJE_SIN_COBERTURA")]
    #[tabled(rename = "PORCENTAJE_SIN_COBERTURA")]
    pub pct_without_coverage: String,
}

/// Everything the display layer needs for one selected district.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub district: String,
    pub summary: DatasetSummary,
    pub pie: PieChart,
    pub bar: BarChart,
    pub line: LineChart,
    pub histogram: Histogram,
    pub scatter: ScatterPlot,
    pub table: Vec<DistrictRow>,
    pub notes: Vec<String>,
}
