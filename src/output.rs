// Text rendering of frames and CSV/JSON export of the rows behind them.
use crate::coordinator::{Frame, FrameBody};
use crate::error::Result;
use crate::insights::InsightEntry;
use crate::reports::by_popularity_desc;
use crate::types::{
    AggregationResult, GenreCountRow, GenreProfitRow, MovieProfitRow, ScatterRow, YearRatingRow,
};
use crate::util::{format_int, format_number};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

/// Rows shown on screen for long tables; export always writes everything.
pub const PREVIEW_ROWS: usize = 15;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Display rows for one aggregation, in the order they should be listed.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RowSet {
    Counts(Vec<GenreCountRow>),
    Profits(Vec<GenreProfitRow>),
    Movies(Vec<MovieProfitRow>),
    Ratings(Vec<YearRatingRow>),
    Points(Vec<ScatterRow>),
}

impl RowSet {
    pub fn len(&self) -> usize {
        match self {
            RowSet::Counts(r) => r.len(),
            RowSet::Profits(r) => r.len(),
            RowSet::Movies(r) => r.len(),
            RowSet::Ratings(r) => r.len(),
            RowSet::Points(r) => r.len(),
        }
    }

    pub fn table(&self, max_rows: usize) -> String {
        match self {
            RowSet::Counts(r) => table(r, max_rows),
            RowSet::Profits(r) => table(r, max_rows),
            RowSet::Movies(r) => table(r, max_rows),
            RowSet::Ratings(r) => table(r, max_rows),
            RowSet::Points(r) => table(r, max_rows),
        }
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        match self {
            RowSet::Counts(r) => write_csv(path, r),
            RowSet::Profits(r) => write_csv(path, r),
            RowSet::Movies(r) => write_csv(path, r),
            RowSet::Ratings(r) => write_csv(path, r),
            RowSet::Points(r) => write_csv(path, r),
        }
    }
}

fn table<T: Tabled + Clone>(rows: &[T], max_rows: usize) -> String {
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

fn pct(v: f64) -> String {
    format!("{}%", format_number(v, 2))
}

pub fn rows_for(result: &AggregationResult) -> Option<RowSet> {
    let rows = match result {
        AggregationResult::CategoryCounts(counts) => RowSet::Counts(
            counts
                .iter()
                .map(|c| GenreCountRow { genre: c.genre.clone(), count: c.count })
                .collect(),
        ),
        AggregationResult::GenreProfitShares(shares) => RowSet::Profits(
            shares
                .iter()
                .map(|s| GenreProfitRow {
                    genre: s.genre.clone(),
                    revenue: format_number(s.revenue, 0),
                    budget: format_number(s.budget, 0),
                    profit: format_number(s.profit, 0),
                    share: pct(s.share),
                    margin: pct(s.margin),
                    movie_count: s.movie_count,
                })
                .collect(),
        ),
        AggregationResult::MovieProfitShares(detail) => {
            let mut movies = detail.movies.clone();
            movies.sort_by(|a, b| b.profit.partial_cmp(&a.profit).unwrap_or(Ordering::Equal));
            RowSet::Movies(
                movies
                    .into_iter()
                    .map(|m| MovieProfitRow {
                        title: m.title,
                        revenue: format_number(m.revenue, 0),
                        budget: format_number(m.budget, 0),
                        profit: format_number(m.profit, 0),
                        share: pct(m.share),
                    })
                    .collect(),
            )
        }
        AggregationResult::YearlyGenreRatings(trends) => RowSet::Ratings(
            trends
                .series
                .iter()
                .flat_map(|s| {
                    s.points.iter().map(move |p| YearRatingRow {
                        genre: s.genre.clone(),
                        year: p.year,
                        mean: format_number(p.mean, 2),
                    })
                })
                .collect(),
        ),
        AggregationResult::ScatterPoints(plot) => {
            let mut points = plot.points.clone();
            points.sort_by(by_popularity_desc);
            RowSet::Points(
                points
                    .into_iter()
                    .map(|p| ScatterRow {
                        title: p.title,
                        budget: format_number(p.budget, 0),
                        revenue: format_number(p.revenue, 0),
                        popularity: format_number(p.popularity, 2),
                        vote_average: format_number(p.vote_average, 1),
                        radius: format_number(p.radius, 1),
                        shade: format_number(p.shade, 2),
                    })
                    .collect(),
            )
        }
        AggregationResult::NoData(_) => return None,
    };
    Some(rows)
}

const SCATTER_LEGEND: &str = "Legend: color = average rating (darker = higher), size = popularity (larger = more popular)";

/// Plain-text projection of a frame.
pub fn format_frame(frame: &Frame) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[chart: {} | genre: {} | year: {} | {} movies]",
        frame.chart,
        frame.filters.genre,
        frame.filters.year,
        format_int(frame.filtered_records)
    );

    match &frame.body {
        FrameBody::UnknownChart(_) => {
            let _ = writeln!(out, "\nUnknown chart selected.");
        }
        FrameBody::Chart(AggregationResult::NoData(reason)) => {
            if let Some(h) = &frame.headline {
                let _ = writeln!(out, "\n{}", h);
            }
            let _ = writeln!(out, "\n{}", reason.message());
        }
        FrameBody::Chart(result) => {
            if let Some(h) = &frame.headline {
                let _ = writeln!(out, "\n{}", h);
            }
            if let Some((x, y)) = &frame.axis_labels {
                let _ = writeln!(out, "(x: {}, y: {})", x, y);
            }
            match result {
                AggregationResult::YearlyGenreRatings(trends) => {
                    let _ = writeln!(
                        out,
                        "(years {}-{}, rating axis {}-{})",
                        trends.x_domain.0,
                        trends.x_domain.1,
                        format_number(trends.y_domain.0, 0),
                        format_number(trends.y_domain.1, 0)
                    );
                }
                AggregationResult::MovieProfitShares(_) => {
                    let _ = writeln!(out, "(choose Back to return to genres)");
                }
                _ => {}
            }
            if let Some(rows) = rows_for(result) {
                let _ = writeln!(out, "\n{}", rows.table(PREVIEW_ROWS));
                if rows.len() > PREVIEW_ROWS {
                    let _ = writeln!(
                        out,
                        "({} more rows, export to see all)",
                        format_int(rows.len() - PREVIEW_ROWS)
                    );
                }
            }
            if matches!(result, AggregationResult::ScatterPoints(_)) {
                let _ = writeln!(out, "\n{}", SCATTER_LEGEND);
            }
        }
    }

    if !frame.insight.is_empty() {
        let _ = writeln!(out, "\nInsights:");
        let mut q = 0;
        for entry in &frame.insight.entries {
            match entry {
                InsightEntry::Qa { question, answer } => {
                    q += 1;
                    let _ = writeln!(out, "Q{}: {}\n  A: {}", q, question, answer);
                }
                InsightEntry::Fact { label, value } => {
                    let _ = writeln!(out, "{}: {}", label, value);
                }
            }
        }
        if let Some(note) = &frame.insight.note {
            let _ = writeln!(out, "{}", note);
        }
    }
    out
}

pub fn print_frame(frame: &Frame) {
    println!("{}", format_frame(frame));
}

#[derive(Debug, Serialize)]
struct ExportSummary<'a> {
    chart: String,
    genre: String,
    year: String,
    drilldown: Option<&'a str>,
    filtered_records: usize,
    message: Option<&'static str>,
    rows: Option<RowSet>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportPaths {
    pub csv: Option<PathBuf>,
    pub json: PathBuf,
}

/// Write the rows behind `frame` as `<chart>_chart.csv` and a JSON summary
/// as `<chart>_summary.json` under `dir`. Frames without rows only get the
/// summary.
pub fn export_frame(frame: &Frame, dir: &Path) -> Result<ExportPaths> {
    std::fs::create_dir_all(dir)?;
    let stem = match &frame.chart.kind() {
        Some(kind) if frame.drilldown.is_some() => format!("{}_drilldown", kind),
        Some(kind) => kind.to_string(),
        None => "unknown".to_string(),
    };

    let (rows, message) = match &frame.body {
        FrameBody::Chart(AggregationResult::NoData(reason)) => (None, Some(reason.message())),
        FrameBody::Chart(result) => (rows_for(result), None),
        FrameBody::UnknownChart(_) => (None, Some("Unknown chart selected.")),
    };

    let csv = match &rows {
        Some(r) => {
            let path = dir.join(format!("{}_chart.csv", stem));
            r.write_csv(&path)?;
            Some(path)
        }
        None => None,
    };

    let summary = ExportSummary {
        chart: frame.chart.to_string(),
        genre: frame.filters.genre.to_string(),
        year: frame.filters.year.to_string(),
        drilldown: frame.drilldown.as_deref(),
        filtered_records: frame.filtered_records,
        message,
        rows,
    };
    let json = dir.join(format!("{}_summary.json", stem));
    write_json(&json, &summary)?;
    Ok(ExportPaths { csv, json })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::ViewCoordinator;
    use crate::types::MovieRecord;
    use chrono::NaiveDate;

    fn coordinator() -> ViewCoordinator {
        let m = |title: &str, genre: &str, revenue: f64, budget: f64| MovieRecord {
            title: title.to_string(),
            genres: vec![genre.to_string()],
            release_date: NaiveDate::from_ymd_opt(2001, 1, 1),
            vote_average: 7.5,
            popularity: 3.0,
            revenue,
            budget,
            ..MovieRecord::default()
        };
        ViewCoordinator::new(vec![
            m("Alpha", "Action", 2_000_000.0, 500_000.0),
            m("Beta", "Drama", 900.0, 100.0),
        ])
    }

    #[test]
    fn bar_frame_lists_genres_and_insights() {
        let text = format_frame(&coordinator().frame());
        assert!(text.contains("Number of Movies by Genre (Bar Chart)"));
        assert!(text.contains("| Genre  | Movies |"));
        assert!(text.contains("| Action | 1      |"));
        assert!(text.contains("Q1: Which genres have the most movies?"));
    }

    #[test]
    fn no_data_prints_placeholder() {
        let mut c = coordinator();
        let frame = c.set_year("1900").unwrap();
        let text = format_frame(&frame);
        assert!(text.contains("No data available for this selection."));
        assert!(text.contains("No insights available due to no data."));
    }

    #[test]
    fn unknown_chart_prints_fallback() {
        let mut c = coordinator();
        let text = format_frame(&c.select_chart("pie"));
        assert!(text.contains("Unknown chart selected."));
        assert!(!text.contains("Insights:"));
    }

    #[test]
    fn donut_rows_are_formatted() {
        let mut c = coordinator();
        let frame = c.select_chart("donut");
        let FrameBody::Chart(result) = &frame.body else { panic!("expected chart") };
        let Some(RowSet::Profits(rows)) = rows_for(result) else { panic!("expected profit rows") };
        assert_eq!(rows[0].revenue, "2,000,000");
        assert_eq!(rows[0].profit, "1,500,000");
        assert_eq!(rows[1].share, "0.05%");
    }

    #[test]
    fn export_writes_csv_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = coordinator();
        let frame = c.select_chart("scatter");
        let paths = export_frame(&frame, dir.path()).unwrap();

        let csv_path = paths.csv.unwrap();
        assert_eq!(csv_path.file_name().unwrap(), "scatter_chart.csv");
        let csv_text = std::fs::read_to_string(csv_path).unwrap();
        assert!(csv_text.starts_with("Title,Budget,Revenue,Popularity,AvgRating,Radius,Shade"));
        assert_eq!(csv_text.lines().count(), 3);

        let summary: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(paths.json).unwrap()).unwrap();
        assert_eq!(summary["chart"], "scatter");
        assert_eq!(summary["genre"], "All");
        assert_eq!(summary["filtered_records"], 2);
        assert_eq!(summary["rows"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn export_without_rows_only_writes_summary() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = coordinator();
        let frame = c.set_genre("Western");
        let paths = export_frame(&frame, dir.path()).unwrap();
        assert_eq!(paths.csv, None);
        let summary: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(paths.json).unwrap()).unwrap();
        assert_eq!(summary["message"], "No data available for this selection.");
        assert!(summary["rows"].is_null());
    }
}
