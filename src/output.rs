use crate::error::{ReportError, Result};
use crate::types::{BarChart, Histogram, LineChart, PieChart, Report};
use crate::util::{format_date, format_int, format_number};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

/// Write `rows` as a CSV file with a header taken from the serde field names.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(|e| ReportError::io(path, e))?;
    Ok(())
}

/// Pretty JSON; NaN values come out as `null`.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s).map_err(|e| ReportError::io(path, e))?;
    Ok(())
}

/// Markdown table, or `(no rows)` for an empty slice.
pub fn render_table<T: Tabled + Clone>(rows: &[T]) -> String {
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(rows.to_vec()).with(Style::markdown()).to_string()
}

#[derive(Clone, Tabled)]
struct SliceRow {
    #[tabled(rename = "Slice")]
    label: String,
    #[tabled(rename = "Population")]
    value: String,
    #[tabled(rename = "Share")]
    share: String,
}

#[derive(Clone, Tabled)]
struct BarRow {
    #[tabled(rename = "Province")]
    label: String,
    #[tabled(rename = "PopulationWithoutCoverage")]
    value: String,
}

#[derive(Clone, Tabled)]
struct PointRow {
    #[tabled(rename = "CutoffDate")]
    date: String,
    #[tabled(rename = "CoveragePct")]
    value: String,
}

#[derive(Clone, Tabled)]
struct BinRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Count")]
    count: usize,
}

/// Pie slices with their share of the total, `autopct`-style.
pub fn pie_table(pie: &PieChart) -> String {
    let total = pie.slices.iter().fold(0u64, |acc, s| acc.saturating_add(s.value));
    let rows: Vec<SliceRow> = pie
        .slices
        .iter()
        .map(|s| {
            let share = if total == 0 {
                f64::NAN
            } else {
                s.value as f64 / total as f64 * 100.0
            };
            SliceRow {
                label: s.label.clone(),
                value: format_int(s.value),
                share: format!("{}%", format_number(share, 1)),
            }
        })
        .collect();
    render_table(&rows)
}

/// One row per bar, in chart order.
pub fn bar_table(bar: &BarChart) -> String {
    let rows: Vec<BarRow> = bar
        .labels
        .iter()
        .zip(&bar.values)
        .map(|(label, value)| BarRow {
            label: label.clone(),
            value: format_int(*value),
        })
        .collect();
    render_table(&rows)
}

/// One row per point; undated points show as `NaT`.
pub fn line_table(line: &LineChart) -> String {
    let rows: Vec<PointRow> = line
        .points
        .iter()
        .map(|p| PointRow {
            date: format_date(p.date),
            value: format_number(p.value, 2),
        })
        .collect();
    render_table(&rows)
}

/// Each bin with its edges and count.
pub fn histogram_table(hist: &Histogram) -> String {
    let rows: Vec<BinRow> = hist
        .counts
        .iter()
        .enumerate()
        .map(|(i, count)| BinRow {
            from: format_number(hist.edges[i], 2),
            to: format_number(hist.edges[i + 1], 2),
            count: *count,
        })
        .collect();
    render_table(&rows)
}

/// Print every section of the report to the console.
pub fn print_report(report: &Report) {
    println!("Dataset summary\n");
    println!("{}\n", render_table(&[report.summary]));

    println!("{}\n", report.pie.title);
    println!("{}\n", pie_table(&report.pie));

    println!("{}\n", report.bar.title);
    println!("{}\n", bar_table(&report.bar));

    println!("{}\n", report.line.title);
    println!("{}\n", line_table(&report.line));

    println!("{}\n", report.histogram.title);
    println!("{}\n", histogram_table(&report.histogram));

    let plotted = report
        .scatter
        .x
        .iter()
        .zip(&report.scatter.y)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .count();
    println!("{}\n", report.scatter.title);
    println!(
        "{} of {} rows have both a total population and a coverage percentage.\n",
        format_int(plotted),
        format_int(report.scatter.x.len())
    );

    println!("Rows for {}\n", report.district);
    println!("{}\n", render_table(&report.table));

    println!("Conclusions\n");
    for note in &report.notes {
        println!("- {}", note);
    }
    println!();
}
