// View state and the transitions between chart views.
//
// The coordinator owns the normalized dataset for the whole session and an
// explicit `ViewState`. Every transition recomputes the filtered subset and
// the aggregation for the current chart from scratch and hands back a
// `Frame`, which is all a renderer needs to draw the screen.
use crate::error::{DashboardError, Result};
use crate::filter::{filter_options, filter_records, parse_genre_choice, parse_year_choice, FilterOptions};
use crate::insights::{self, Insight};
use crate::reports;
use crate::types::{AggregationResult, ChartKind, FilterState, MovieRecord, NoData};
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartSelection {
    Known(ChartKind),
    /// A selector token that names no chart. Terminal until another chart
    /// is chosen.
    Unknown(String),
}

impl ChartSelection {
    pub fn from_token(token: &str) -> ChartSelection {
        match ChartKind::from_token(token) {
            Some(kind) => ChartSelection::Known(kind),
            None => ChartSelection::Unknown(token.trim().to_string()),
        }
    }

    pub fn kind(&self) -> Option<ChartKind> {
        match self {
            ChartSelection::Known(k) => Some(*k),
            ChartSelection::Unknown(_) => None,
        }
    }
}

impl fmt::Display for ChartSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartSelection::Known(k) => write!(f, "{}", k),
            ChartSelection::Unknown(t) => write!(f, "unknown chart '{}'", t),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub chart: ChartSelection,
    pub filters: FilterState,
    /// Genre whose movies the donut is currently broken down into.
    pub drilldown: Option<String>,
    /// Bar the user last clicked; only meaningful on the bar chart.
    pub clicked_genre: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            chart: ChartSelection::Known(ChartKind::Bar),
            filters: FilterState::default(),
            drilldown: None,
            clicked_genre: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameBody {
    Chart(AggregationResult),
    UnknownChart(String),
}

/// Everything one screen shows, derived from the state and the data.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub chart: ChartSelection,
    pub filters: FilterState,
    pub drilldown: Option<String>,
    pub filtered_records: usize,
    pub headline: Option<String>,
    /// (x, y)
    pub axis_labels: Option<(String, String)>,
    pub body: FrameBody,
    pub insight: Insight,
}

pub struct ViewCoordinator {
    data: Vec<MovieRecord>,
    state: ViewState,
}

impl ViewCoordinator {
    pub fn new(data: Vec<MovieRecord>) -> Self {
        ViewCoordinator { data, state: ViewState::default() }
    }

    /// Start from an existing state, e.g. after reloading the dataset.
    pub fn with_state(data: Vec<MovieRecord>, state: ViewState) -> Self {
        ViewCoordinator { data, state }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn filter_options(&self) -> FilterOptions {
        filter_options(&self.data)
    }

    /// Replace both filters at once. Clears any drill-down or clicked bar.
    pub fn set_filters(&mut self, filters: FilterState) -> Frame {
        self.state.filters = filters;
        self.state.drilldown = None;
        self.state.clicked_genre = None;
        self.frame()
    }

    pub fn set_genre(&mut self, token: &str) -> Frame {
        let filters = FilterState { genre: parse_genre_choice(token), ..self.state.filters.clone() };
        self.set_filters(filters)
    }

    /// Fails on a year token that is neither `All` nor an integer; the state
    /// is left as it was.
    pub fn set_year(&mut self, token: &str) -> Result<Frame> {
        let year = parse_year_choice(token)?;
        let filters = FilterState { year, ..self.state.filters.clone() };
        Ok(self.set_filters(filters))
    }

    pub fn select_chart(&mut self, token: &str) -> Frame {
        self.state.chart = ChartSelection::from_token(token);
        self.state.drilldown = None;
        self.state.clicked_genre = None;
        self.frame()
    }

    pub fn select_bar(&mut self, genre: &str) -> Result<Frame> {
        if self.state.chart != ChartSelection::Known(ChartKind::Bar) {
            return Err(self.illegal("select a bar"));
        }
        self.state.clicked_genre = Some(genre.to_string());
        Ok(self.frame())
    }

    /// Donut segment click.
    pub fn drill_down(&mut self, genre: &str) -> Result<Frame> {
        if self.state.chart != ChartSelection::Known(ChartKind::Donut) || self.state.drilldown.is_some() {
            return Err(self.illegal("drill into a genre"));
        }
        self.state.drilldown = Some(genre.to_string());
        Ok(self.frame())
    }

    pub fn back(&mut self) -> Result<Frame> {
        if self.state.drilldown.is_none() {
            return Err(self.illegal("go back"));
        }
        self.state.drilldown = None;
        Ok(self.frame())
    }

    fn illegal(&self, action: &'static str) -> DashboardError {
        let state = match (&self.state.chart, &self.state.drilldown) {
            (_, Some(g)) => format!("drilled into {}", g),
            (chart, None) => format!("showing the {} chart", chart),
        };
        warn!(action, state = %state, "ignored illegal view transition");
        DashboardError::IllegalTransition { action, state }
    }

    /// Project the current state onto the data.
    pub fn frame(&self) -> Frame {
        let state = &self.state;
        let filtered = filter_records(&self.data, &state.filters);
        debug!(filtered = filtered.len(), "filter applied");

        let mut frame = Frame {
            chart: state.chart.clone(),
            filters: state.filters.clone(),
            drilldown: state.drilldown.clone(),
            filtered_records: filtered.len(),
            headline: None,
            axis_labels: None,
            body: FrameBody::Chart(AggregationResult::NoData(NoData::EmptySelection)),
            insight: Insight::default(),
        };

        let kind = match &state.chart {
            ChartSelection::Known(kind) => *kind,
            ChartSelection::Unknown(token) => {
                frame.body = FrameBody::UnknownChart(token.clone());
                return frame;
            }
        };
        if filtered.is_empty() {
            frame.insight = insights::no_data();
            return frame;
        }

        debug!(chart = %kind, records = filtered.len(), "render chart");
        let genre = state.filters.genre.as_only().map(String::as_str);
        let axes = |x: &str, y: &str| Some((x.to_string(), y.to_string()));
        match kind {
            ChartKind::Bar => {
                frame.headline = Some("Number of Movies by Genre (Bar Chart)".into());
                frame.axis_labels = axes("Genres", "Number of Movies");
                frame.body = FrameBody::Chart(reports::category_counts(&filtered));
                frame.insight = insights::bar(&filtered, state.clicked_genre.as_deref());
            }
            ChartKind::Line => {
                frame.headline = Some(format!("Average Movie Ratings Over Years ({})", genre.unwrap_or("All Genres")));
                frame.axis_labels = axes("Year", "Average Rating");
                frame.body = FrameBody::Chart(reports::yearly_genre_ratings(&filtered, genre));
                frame.insight = insights::line(genre);
            }
            ChartKind::Scatter => {
                frame.headline = Some("Budget vs Revenue Scatter Plot".into());
                frame.axis_labels = axes("Budget ($)", "Revenue ($)");
                frame.body = FrameBody::Chart(reports::scatter_points(&filtered));
                frame.insight = insights::scatter(&filtered, genre);
            }
            ChartKind::Donut => match &state.drilldown {
                Some(g) => {
                    frame.headline = Some(format!("Profit Share by Movie ({})", g));
                    let result = reports::genre_drilldown(&filtered, g);
                    frame.insight = match &result {
                        AggregationResult::MovieProfitShares(detail) => insights::drilldown(detail),
                        _ => insights::drilldown_empty(g),
                    };
                    frame.body = FrameBody::Chart(result);
                }
                None => {
                    frame.headline = Some("Profit Share by Genre".into());
                    frame.body = FrameBody::Chart(reports::genre_profit_shares(&filtered));
                    frame.insight = insights::donut();
                }
            },
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::InsightEntry;
    use crate::types::Choice;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn movie(title: &str, genres: &[&str], year: i32, rating: f64, revenue: f64, budget: f64) -> MovieRecord {
        MovieRecord {
            title: title.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            release_date: NaiveDate::from_ymd_opt(year, 3, 15),
            vote_average: rating,
            popularity: 1.0,
            revenue,
            budget,
            ..MovieRecord::default()
        }
    }

    fn coordinator() -> ViewCoordinator {
        ViewCoordinator::new(vec![
            movie("Funny", &["Comedy"], 1995, 6.0, 500.0, 100.0),
            movie("Sad Funny", &["Comedy", "Drama"], 1995, 8.0, 50.0, 100.0),
            movie("Heavy", &["Drama"], 2000, 9.0, 900.0, 300.0),
            movie("Loud", &["Action"], 2000, 5.0, 1000.0, 200.0),
        ])
    }

    #[test]
    fn starts_on_bar_with_all_filters() {
        let c = coordinator();
        assert_eq!(c.state(), &ViewState::default());
        let frame = c.frame();
        assert_eq!(frame.chart, ChartSelection::Known(ChartKind::Bar));
        assert_eq!(frame.filtered_records, 4);
        assert!(matches!(frame.body, FrameBody::Chart(AggregationResult::CategoryCounts(_))));
    }

    #[test]
    fn restored_state_projects_without_a_transition() {
        let state = ViewState {
            chart: ChartSelection::Known(ChartKind::Donut),
            filters: FilterState { genre: Choice::Only("Drama".into()), year: Choice::Only(2000) },
            ..ViewState::default()
        };
        let c = ViewCoordinator::with_state(coordinator().data, state.clone());
        assert_eq!(c.state(), &state);
        let frame = c.frame();
        assert_eq!(frame.chart, ChartSelection::Known(ChartKind::Donut));
        assert_eq!(frame.filtered_records, 1);
        assert!(matches!(frame.body, FrameBody::Chart(AggregationResult::GenreProfitShares(_))));
    }

    #[test]
    fn clicking_a_bar_reports_the_filtered_genre() {
        let mut c = coordinator();
        c.set_genre("Comedy");
        c.set_year("All").unwrap();
        c.select_chart("bar");
        let frame = c.select_bar("Comedy").unwrap();
        assert_eq!(frame.filtered_records, 2);
        assert_eq!(
            frame.insight.entries,
            vec![
                InsightEntry::Fact { label: "Selected Genre".into(), value: "Comedy".into() },
                InsightEntry::Fact { label: "Number of Movies".into(), value: "2".into() },
                InsightEntry::Fact { label: "Average Rating".into(), value: "7.00".into() },
            ]
        );
    }

    #[test]
    fn empty_selection_is_no_data_for_every_chart() {
        let mut c = coordinator();
        c.set_year("1850").unwrap();
        for kind in ChartKind::ALL {
            let frame = c.select_chart(kind.as_str());
            assert_eq!(frame.filtered_records, 0);
            assert_eq!(frame.body, FrameBody::Chart(AggregationResult::NoData(NoData::EmptySelection)));
            assert_eq!(frame.insight, insights::no_data());
        }
    }

    #[test]
    fn empty_dataset_degrades_to_no_data() {
        let c = ViewCoordinator::new(Vec::new());
        assert_eq!(c.frame().body, FrameBody::Chart(AggregationResult::NoData(NoData::EmptySelection)));
    }

    #[test]
    fn donut_drilldown_and_back() {
        let mut c = coordinator();
        let frame = c.select_chart("Donut");
        let FrameBody::Chart(AggregationResult::GenreProfitShares(shares)) = &frame.body else {
            panic!("expected shares, got {:?}", frame.body);
        };
        assert!(shares.iter().any(|s| s.genre == "Drama"));

        let frame = c.drill_down("Drama").unwrap();
        assert_eq!(frame.drilldown.as_deref(), Some("Drama"));
        let FrameBody::Chart(AggregationResult::MovieProfitShares(detail)) = &frame.body else {
            panic!("expected drilldown, got {:?}", frame.body);
        };
        assert_eq!(detail.top_profit.title, "Heavy");

        assert!(matches!(c.drill_down("Comedy"), Err(DashboardError::IllegalTransition { .. })));

        let frame = c.back().unwrap();
        assert_eq!(frame.drilldown, None);
        assert!(matches!(frame.body, FrameBody::Chart(AggregationResult::GenreProfitShares(_))));
    }

    #[test]
    fn filter_change_clears_drilldown() {
        let mut c = coordinator();
        c.select_chart("donut");
        c.drill_down("Drama").unwrap();
        let frame = c.set_genre("Drama");
        assert_eq!(frame.drilldown, None);
        assert_eq!(c.state().filters.genre, Choice::Only("Drama".into()));
    }

    #[test]
    fn chart_change_clears_clicked_bar() {
        let mut c = coordinator();
        c.select_bar("Drama").unwrap();
        c.select_chart("line");
        assert_eq!(c.state().clicked_genre, None);
        c.select_chart("bar");
        assert_eq!(c.state().clicked_genre, None);
    }

    #[test]
    fn illegal_transitions_leave_state_alone() {
        let mut c = coordinator();
        let before = c.state().clone();
        assert!(c.back().is_err());
        assert!(c.drill_down("Drama").is_err());
        assert!(matches!(c.set_year("nineteen"), Err(DashboardError::InvalidFilter(_))));
        c.select_chart("line");
        assert!(c.select_bar("Drama").is_err());
        assert_eq!(c.state().filters, before.filters);
        assert_eq!(c.state().drilldown, None);
    }

    #[test]
    fn unknown_chart_is_a_display_state() {
        let mut c = coordinator();
        let frame = c.select_chart("radar");
        assert_eq!(frame.body, FrameBody::UnknownChart("radar".into()));
        assert!(frame.insight.is_empty());
        assert!(c.select_bar("Drama").is_err());
        let frame = c.select_chart("scatter");
        assert!(matches!(frame.body, FrameBody::Chart(AggregationResult::ScatterPoints(_))));
    }

    #[test]
    fn line_follows_the_genre_filter() {
        let mut c = coordinator();
        c.select_chart("line");
        let frame = c.set_genre("Drama");
        assert_eq!(frame.headline.as_deref(), Some("Average Movie Ratings Over Years (Drama)"));
        let FrameBody::Chart(AggregationResult::YearlyGenreRatings(trends)) = &frame.body else {
            panic!("expected trends");
        };
        assert_eq!(trends.series.len(), 1);
        assert_eq!(trends.series[0].genre, "Drama");
    }
}
