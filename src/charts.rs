// Chart specifications for one selected district.
//
// Nothing here draws anything: each function returns plain data that a
// display layer can render. Percentages on the pie are left to that layer.
use crate::reports::{self, SelectedDistrict, TOP_PROVINCES};
use crate::types::{
    BarChart, CoverageRecord, DistrictRow, Histogram, LineChart, LinePoint, PieChart, PieSlice,
    ProvinceTotal, Report, ScatterPlot,
};
use crate::util::{format_count, format_date, format_number};
use std::cmp::Ordering;

pub const HISTOGRAM_BINS: usize = 20;

/// Saturating sum of the present cells.
fn sum_counts<'a>(
    rows: impl Iterator<Item = &'a CoverageRecord>,
    cell: fn(&CoverageRecord) -> Option<u64>,
) -> u64 {
    rows.filter_map(cell).fold(0u64, u64::saturating_add)
}

/// Two slices, with and without coverage, summed over exactly `rows`.
pub fn pie_chart(district: &str, rows: &[&CoverageRecord]) -> PieChart {
    let with = sum_counts(rows.iter().copied(), |r| r.population_with_coverage);
    let without = sum_counts(rows.iter().copied(), |r| r.population_without_coverage);
    PieChart {
        title: format!("Population without water vs population with water in {district}"),
        slices: vec![
            PieSlice {
                label: "With water access".into(),
                value: with,
                color: "blue".into(),
            },
            PieSlice {
                label: "Without water access".into(),
                value: without,
                color: "red".into(),
            },
        ],
        start_angle: 90.0,
    }
}

/// Stable ascending order by cutoff date with undated rows last.
pub fn sort_by_cutoff<'a>(rows: &[&'a CoverageRecord]) -> Vec<&'a CoverageRecord> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| match (a.cutoff_date, b.cutoff_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    sorted
}

/// Coverage percentage per row of `rows`, ordered by [`sort_by_cutoff`].
pub fn line_chart(district: &str, rows: &[&CoverageRecord]) -> LineChart {
    let points = sort_by_cutoff(rows)
        .into_iter()
        .map(|r| LinePoint {
            date: r.cutoff_date,
            value: r.pct_with_coverage,
        })
        .collect();
    LineChart {
        title: format!("Coverage over time in {district}"),
        y_label: "Coverage percentage".into(),
        points,
        marker: "o".into(),
        label_rotation: 45.0,
    }
}

/// One bar per ranked province, in ranking order.
pub fn bar_chart(top: &[ProvinceTotal]) -> BarChart {
    BarChart {
        title: format!("Top {TOP_PROVINCES} provinces with the most population without coverage"),
        y_label: "Population without coverage".into(),
        labels: top.iter().map(|p| p.province.clone()).collect(),
        values: top.iter().map(|p| p.population_without_coverage).collect(),
        color: "orange".into(),
        label_rotation: 45.0,
    }
}

/// Equal-width histogram of the finite values in `values`.
///
/// The range is the finite min..max; a single repeated value widens to
/// `value ± 0.5` and no finite values at all gives `0..1`. A value is counted
/// in the bin whose left edge is the last edge not above it; the last bin also
/// takes values equal to the upper edge.
pub fn bin_values(values: impl IntoIterator<Item = f64>, bins: usize) -> (Vec<f64>, Vec<usize>) {
    let finite: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    let (mut lo, mut hi) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    if finite.is_empty() {
        lo = 0.0;
        hi = 1.0;
    } else if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = hi - lo;
    let mut edges: Vec<f64> = (0..=bins)
        .map(|i| lo + width * i as f64 / bins as f64)
        .collect();
    edges[bins] = hi;
    let mut counts = vec![0usize; bins];
    if bins > 0 {
        for v in finite {
            let idx = edges.partition_point(|e| *e <= v).saturating_sub(1);
            counts[idx.min(bins - 1)] += 1;
        }
    }
    (edges, counts)
}

/// [`HISTOGRAM_BINS`] bins of the coverage percentage over the whole table.
pub fn histogram(data: &[CoverageRecord]) -> Histogram {
    let (edges, counts) = bin_values(data.iter().map(|r| r.pct_with_coverage), HISTOGRAM_BINS);
    Histogram {
        title: "Coverage distribution across districts".into(),
        x_label: "Coverage percentage".into(),
        y_label: "Number of districts".into(),
        edges,
        counts,
        color: "green".into(),
        edge_color: "black".into(),
    }
}

/// Total population against coverage percentage for every row; a missing
/// total is plotted as NaN.
pub fn scatter_plot(data: &[CoverageRecord]) -> ScatterPlot {
    ScatterPlot {
        title: "Population vs coverage".into(),
        x_label: "Total population".into(),
        y_label: "Coverage percentage".into(),
        x: data
            .iter()
            .map(|r| r.total_population.map_or(f64::NAN, |t| t as f64))
            .collect(),
        y: data.iter().map(|r| r.pct_with_coverage).collect(),
        alpha: 0.5,
    }
}

/// Display rows for `rows`, in the order given.
pub fn district_table(rows: &[&CoverageRecord]) -> Vec<DistrictRow> {
    rows.iter()
        .map(|r| DistrictRow {
            department: r.department.clone(),
            province: r.province.clone(),
            district: r.district.clone(),
            cutoff_date: format_date(r.cutoff_date),
            total_population: format_count(r.total_population),
            population_with_coverage: format_count(r.population_with_coverage),
            population_without_coverage: format_count(r.population_without_coverage),
            pct_with_coverage: format_number(r.pct_with_coverage, 2),
            pct_without_coverage: format_number(r.pct_without_coverage, 2),
        })
        .collect()
}

fn notes() -> Vec<String> {
    [
        "The pie chart shows how the selected district's population splits between those with and without water access.",
        "The bar chart lists the provinces with the largest population without water coverage.",
        "The line chart shows how coverage in the selected district changed across cutoff dates.",
        "The histogram shows how the coverage percentage is distributed across all districts.",
        "The scatter plot relates each district's total population to its coverage percentage.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Build every chart and the detail table for `district`.
pub fn present(data: &[CoverageRecord], district: &SelectedDistrict) -> Report {
    let name = district.name();
    let selected: Vec<&CoverageRecord> = reports::problem_rows(data)
        .into_iter()
        .filter(|r| r.district == name)
        .collect();
    let top = reports::top_provinces(data, TOP_PROVINCES);

    Report {
        district: name.to_string(),
        summary: reports::summarize(data),
        pie: pie_chart(name, &selected),
        bar: bar_chart(&top),
        line: line_chart(name, &selected),
        histogram: histogram(data),
        scatter: scatter_plot(data),
        table: district_table(&selected),
        notes: notes(),
    }
}
