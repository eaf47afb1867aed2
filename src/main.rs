// Entry point and the interactive menu.
//
// The CSV is loaded once at startup (and again on request). Every menu
// action is one view transition on the coordinator, whose resulting frame is
// printed straight away.
mod config;
mod coordinator;
mod error;
mod filter;
mod insights;
mod loader;
mod output;
mod reports;
mod types;
mod util;

use clap::Parser;
use config::Config;
use coordinator::{Frame, ViewCoordinator, ViewState};
use error::Result;
use std::io::{self, Write};
use tracing::error;
use tracing_subscriber::EnvFilter;
use types::{ChartKind, MovieRecord};

/// Print `prompt` and read one trimmed line. `None` once stdin is closed.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Load (or reload) the CSV. On failure the dashboard keeps running on an
/// empty dataset, so every chart shows its placeholder.
fn handle_load(cfg: &Config) -> Vec<MovieRecord> {
    match loader::load_movies(&cfg.data) {
        Ok((data, report)) => {
            println!(
                "Processing dataset... ({} rows loaded)",
                util::format_int(report.total_rows)
            );
            if report.parse_errors > 0 {
                println!(
                    "Note: {} rows skipped because the CSV reader could not decode them.",
                    util::format_int(report.parse_errors)
                );
            }
            println!(
                "Info: {} rows without a release date, {} rows without genres.\n",
                util::format_int(report.undated_rows),
                util::format_int(report.ungenred_rows)
            );
            data
        }
        Err(e) => {
            error!(path = %cfg.data.display(), error = %e, "error loading data");
            eprintln!("Failed to load file: {}\n", e);
            Vec::new()
        }
    }
}

fn show(result: Result<Frame>) {
    match result {
        Ok(frame) => output::print_frame(&frame),
        Err(e) => println!("{}\n", e),
    }
}

fn show_options(view: &ViewCoordinator) {
    let opts = view.filter_options();
    println!("Genres: All, {}", opts.genres.join(", "));
    let years: Vec<String> = opts.years.iter().map(|y| y.to_string()).collect();
    println!("Years: All, {}\n", years.join(", "));
}

fn handle_export(view: &ViewCoordinator, cfg: &Config) {
    match output::export_frame(&view.frame(), &cfg.export_dir) {
        Ok(paths) => {
            if let Some(csv) = paths.csv {
                println!("Chart rows exported to {}", csv.display());
            }
            println!("Summary exported to {}\n", paths.json.display());
        }
        Err(e) => eprintln!("Write error: {}\n", e),
    }
}

fn print_menu() {
    println!("Movie Dashboard");
    println!("[1] Reload the file");
    let charts: Vec<&str> = ChartKind::ALL.iter().map(|k| k.as_str()).collect();
    println!("[2] Choose chart ({})", charts.join(", "));
    println!("[3] Set genre filter");
    println!("[4] Set year filter");
    println!("[5] Select a bar (bar chart)");
    println!("[6] Drill into a genre (donut chart)");
    println!("[7] Back to genres (donut drill-down)");
    println!("[8] Export current view");
    println!("[9] List filter values");
    println!("[0] Exit\n");
}

fn main() {
    let cfg = Config::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cfg.log_level).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut view = ViewCoordinator::new(handle_load(&cfg));
    output::print_frame(&view.select_chart(&cfg.chart));
    if cfg.once {
        return;
    }

    loop {
        print_menu();
        let Some(choice) = read_line("Enter choice: ") else { break };
        match choice.as_str() {
            "1" => {
                // Keep the chart and filters across a reload.
                let state = ViewState {
                    drilldown: None,
                    clicked_genre: None,
                    ..view.state().clone()
                };
                view = ViewCoordinator::with_state(handle_load(&cfg), state);
                output::print_frame(&view.frame());
            }
            "2" => {
                let Some(token) = read_line("Chart: ") else { break };
                output::print_frame(&view.select_chart(&token));
            }
            "3" => {
                let Some(token) = read_line("Genre (All or a name): ") else { break };
                output::print_frame(&view.set_genre(&token));
            }
            "4" => {
                let Some(token) = read_line("Year (All or a year): ") else { break };
                show(view.set_year(&token));
            }
            "5" => {
                let Some(genre) = read_line("Genre bar: ") else { break };
                show(view.select_bar(&genre));
            }
            "6" => {
                let Some(genre) = read_line("Genre segment: ") else { break };
                show(view.drill_down(&genre));
            }
            "7" => show(view.back()),
            "8" => handle_export(&view, &cfg),
            "9" => show_options(&view),
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 0-9.\n"),
        }
    }
}
