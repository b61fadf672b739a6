// Entry point and high-level CLI flow.
//
// - With `--district`, the report is built once and the program exits.
// - Otherwise a menu loads the table ([1]) and lets the analyst pick a
//   district ([2]); every pick re-runs the whole pipeline from the file.
use anyhow::{Context, Result};
use clap::Parser;
use coverage_report::config::{Settings, DEFAULT_CONFIG_PATH};
use coverage_report::reports::DistrictChoices;
use coverage_report::types::Report;
use coverage_report::util::format_int;
use coverage_report::{output, pipeline};
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

// Choices are computed once per load; reports always re-read the file.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { choices: None }));

struct AppState {
    choices: Option<DistrictChoices>,
}

fn app_state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Parser, Debug)]
#[command(about = "Water coverage report for a district coverage table")]
struct Cli {
    /// TOML file with `data_path` / `output_dir`.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// `;`-delimited coverage table.
    #[arg(long)]
    data: Option<PathBuf>,
    /// Where `report.json` and `district_rows.csv` are written.
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Build the report for this district and exit.
    #[arg(long)]
    district: Option<String>,
}

/// `None` once stdin is closed.
fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn parse_yes_no(resp: &str) -> Option<bool> {
    match resp.trim().to_uppercase().as_str() {
        "Y" => Some(true),
        "N" => Some(false),
        _ => None,
    }
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N` or
/// closed stdin.
fn prompt_back_to_selection() -> bool {
    loop {
        let Some(resp) = read_line("Back to district selection (Y/N): ") else {
            return false;
        };
        match parse_yes_no(&resp) {
            Some(answer) => return answer,
            None => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Option [2] repeated: `Y` shows the district list again, `N` returns to
/// the main menu.
fn analyze_loop(settings: &Settings) {
    if app_state().choices.is_none() {
        println!("Error: No data loaded. Please load the file first (option 1).\n");
        return;
    }
    loop {
        if let Err(e) = handle_analyze(settings) {
            eprintln!("Report error: {:#}\n", e);
        }
        if !prompt_back_to_selection() {
            return;
        }
        println!();
    }
}

/// Write the JSON and CSV hand-off files and print the console previews.
fn emit(report: &Report, settings: &Settings) -> Result<()> {
    std::fs::create_dir_all(&settings.output_dir)
        .with_context(|| format!("creating {}", settings.output_dir.display()))?;
    let json_path = settings.output_dir.join("report.json");
    let csv_path = settings.output_dir.join("district_rows.csv");
    output::write_json(&json_path, report)?;
    output::write_csv(&csv_path, &report.table)?;
    info!(json = %json_path.display(), csv = %csv_path.display(), "report written");

    output::print_report(report);
    println!(
        "(Chart data exported to {}, rows to {})\n",
        json_path.display(),
        csv_path.display()
    );
    Ok(())
}

/// Option [1]: load the table and remember which districts can be analyzed.
fn handle_load(settings: &Settings) {
    match pipeline::load_choices(&settings.data_path) {
        Ok(choices) => {
            println!(
                "Loaded {}. {} districts have population without coverage.\n",
                settings.data_path.display(),
                format_int(choices.len())
            );
            app_state().choices = Some(choices);
        }
        Err(e) => eprintln!("Failed to load file: {}\n", e),
    }
}

/// Option [2]: pick a district and build its report from a fresh load.
fn handle_analyze(settings: &Settings) -> Result<()> {
    let choices = app_state().choices.clone();
    let Some(choices) = choices else {
        println!("Error: No data loaded. Please load the file first (option 1).\n");
        return Ok(());
    };
    if choices.is_empty() {
        println!("No district has population without coverage.\n");
        return Ok(());
    }

    println!("Select a district to analyze:");
    for (i, name) in choices.iter().enumerate() {
        println!("[{}] {}", i + 1, name);
    }
    let picked = read_line("Enter choice: ")
        .and_then(|s| s.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| choices.select_index(idx));
    let Some(selected) = picked else {
        println!("Invalid choice.\n");
        return Ok(());
    };

    println!();
    let report = pipeline::run(&settings.data_path, selected.name())?;
    emit(&report, settings)
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load(&cli.config)?;
    if let Some(data) = cli.data {
        settings.data_path = data;
    }
    if let Some(dir) = cli.out_dir {
        settings.output_dir = dir;
    }
    info!(data = %settings.data_path.display(), "startup");

    if let Some(district) = cli.district {
        let report = pipeline::run(&settings.data_path, &district)
            .with_context(|| format!("building report for {district}"))?;
        return emit(&report, &settings);
    }

    loop {
        println!("Water Coverage Report");
        println!("[1] Load the file");
        println!("[2] Analyze a district");
        println!("[3] Exit\n");
        let Some(choice) = read_line("Enter choice: ") else {
            break;
        };
        match choice.as_str() {
            "1" => handle_load(&settings),
            "2" => {
                println!();
                analyze_loop(&settings);
                println!();
            }
            "3" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 1, 2 or 3.\n"),
        }
    }
    Ok(())
}
