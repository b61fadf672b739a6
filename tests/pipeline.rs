use chrono::NaiveDate;
use coverage_report::pipeline::{load_choices, load_records, run};
use coverage_report::reports::{summarize, top_provinces, TOP_PROVINCES};
use coverage_report::ReportError;
use std::io::Write;
use tempfile::NamedTempFile;

const TABLE: &str = "\
FECHA_CORTE;DEPARTAMENTO;PROVINCIA;DISTRITO;UBIGEO;TOTAL_POBLACION;POBLACION_CON_COBERTURA;POBLACION_SIN_COBERTURA
20190601;CUSCO;CUSCO;SANTIAGO;080105;1000;800;200
20180101;CUSCO;CUSCO;SANTIAGO;080105;1000;700;300
badvalue;CUSCO;CUSCO;SANTIAGO;080105;1000;900;100
20180101;CUSCO;CUSCO;WANCHAQ;080108;500;500;0
20180101;CUSCO;ANTA;ANTA;080301;0;0;0
20180101;CUSCO;CALCA;CALCA;080401;400;100;300
20180101;CUSCO;URUBAMBA;OLLANTAYTAMBO;081305;300;150;150
20180101;CUSCO;QUISPICANCHI;URCOS;081201;250;200;50
20180101;CUSCO;CANCHIS;SICUANI;080601;900;880;20
";

fn fixture(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(bytes).expect("write fixture");
    file.flush().expect("flush fixture");
    file
}

#[test]
fn enriches_every_row_without_dropping() {
    let file = fixture(TABLE.as_bytes());
    let records = load_records(file.path()).expect("load");
    assert_eq!(records.len(), 9);

    for r in &records {
        match r.total_population {
            Some(t) if t > 0 => {
                assert!((r.pct_with_coverage + r.pct_without_coverage - 100.0).abs() < 1e-9)
            }
            _ => {
                assert!(r.pct_with_coverage.is_nan());
                assert!(r.pct_without_coverage.is_nan());
            }
        }
    }
    assert_eq!(records[2].cutoff_date, None);
    assert_eq!(records[0].cutoff_date, NaiveDate::from_ymd_opt(2019, 6, 1));
}

#[test]
fn summary_and_top_provinces() {
    let file = fixture(TABLE.as_bytes());
    let records = load_records(file.path()).expect("load");

    let summary = summarize(&records);
    assert_eq!(summary.departments, 1);
    assert_eq!(summary.provinces, 6);
    assert_eq!(summary.districts, 7);
    assert_eq!(summary.districts_with_problems, 5);

    let top = top_provinces(&records, TOP_PROVINCES);
    assert_eq!(top.len(), 5);
    let names: Vec<&str> = top.iter().map(|p| p.province.as_str()).collect();
    assert_eq!(names, vec!["CUSCO", "CALCA", "URUBAMBA", "QUISPICANCHI", "CANCHIS"]);
    assert_eq!(top[0].population_without_coverage, 600);
}

#[test]
fn choices_exclude_fully_covered_districts() {
    let file = fixture(TABLE.as_bytes());
    let choices = load_choices(file.path()).expect("load");
    let names: Vec<&str> = choices.iter().collect();
    assert_eq!(
        names,
        vec!["SANTIAGO", "CALCA", "OLLANTAYTAMBO", "URCOS", "SICUANI"]
    );
    assert!(choices.select("WANCHAQ").is_none());
    assert!(choices.select("ANTA").is_none());
}

#[test]
fn district_report_slices_selection() {
    let file = fixture(TABLE.as_bytes());
    let report = run(file.path(), "SANTIAGO").expect("report");

    assert_eq!(report.pie.slices[0].value, 2400);
    assert_eq!(report.pie.slices[1].value, 600);

    let dates: Vec<Option<NaiveDate>> = report.line.points.iter().map(|p| p.date).collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2018, 1, 1),
            NaiveDate::from_ymd_opt(2019, 6, 1),
            None
        ]
    );

    // The detail table keeps file order.
    let table_dates: Vec<&str> = report.table.iter().map(|r| r.cutoff_date.as_str()).collect();
    assert_eq!(table_dates, vec!["2019-06-01", "2018-01-01", "NaT"]);

    assert_eq!(report.histogram.counts.len(), 20);
    assert_eq!(report.histogram.counts.iter().sum::<usize>(), 8);
    assert_eq!(report.scatter.x.len(), 9);
    assert_eq!(report.bar.labels.len(), 5);
}

#[test]
fn unknown_district_is_rejected() {
    let file = fixture(TABLE.as_bytes());
    match run(file.path(), "WANCHAQ") {
        Err(ReportError::UnknownDistrict(name)) => assert_eq!(name, "WANCHAQ"),
        other => panic!("expected unknown district, got {other:?}"),
    }
}

#[test]
fn repeated_runs_are_identical() {
    let file = fixture(TABLE.as_bytes());
    let first = serde_json::to_string(&run(file.path(), "CALCA").expect("first")).expect("json");
    let second = serde_json::to_string(&run(file.path(), "CALCA").expect("second")).expect("json");
    assert_eq!(first, second);
}

#[test]
fn latin1_file_is_loaded() {
    let mut bytes = b"DEPARTAMENTO;PROVINCIA;DISTRITO;FECHA_CORTE;TOTAL_POBLACION;POBLACION_CON_COBERTURA;POBLACION_SIN_COBERTURA\n".to_vec();
    // "CUSCO;CANCHIS;MARANGANÍ" with Í as the Latin-1 byte 0xCD.
    bytes.extend_from_slice(b"CUSCO;CANCHIS;MARANGAN\xCD;20190601;100;60;40\n");
    let file = fixture(&bytes);

    let choices = load_choices(file.path()).expect("load");
    assert_eq!(choices.iter().collect::<Vec<_>>(), vec!["MARANGANÍ"]);

    let report = run(file.path(), "MARANGANÍ").expect("report");
    assert_eq!(report.pie.slices[1].value, 40);
}

#[test]
fn missing_file_is_fatal() {
    let err = load_records("/nonexistent/cobertura.csv").unwrap_err();
    assert!(matches!(err, ReportError::Io { .. }));
}
