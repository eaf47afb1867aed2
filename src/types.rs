use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

/// One CSV row exactly as the reader hands it over. Every column is optional
/// and nothing has been validated yet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    pub adult: Option<String>,
    pub belongs_to_collection: Option<String>,
    pub budget: Option<String>,
    pub genres: Option<String>,
    pub homepage: Option<String>,
    pub id: Option<String>,
    pub imdb_id: Option<String>,
    pub original_language: Option<String>,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub popularity: Option<String>,
    pub poster_path: Option<String>,
    pub production_companies: Option<String>,
    pub production_countries: Option<String>,
    pub release_date: Option<String>,
    pub revenue: Option<String>,
    pub runtime: Option<String>,
    pub spoken_languages: Option<String>,
    pub status: Option<String>,
    pub tagline: Option<String>,
    pub title: Option<String>,
    pub video: Option<String>,
    pub vote_average: Option<String>,
    pub vote_count: Option<String>,
}

/// Canonical movie record. Numeric fields are always finite and
/// non-negative, `genres` is always a (possibly empty) list and
/// `release_date` is either a real calendar date or `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieRecord {
    pub title: String,
    pub budget: f64,
    pub revenue: f64,
    pub popularity: f64,
    pub vote_average: f64,
    pub vote_count: f64,
    pub runtime: f64,
    pub release_date: Option<NaiveDate>,
    pub genres: Vec<String>,

    // Passthrough attributes, carried but never aggregated.
    pub id: String,
    pub imdb_id: String,
    pub original_title: String,
    pub original_language: String,
    pub overview: String,
    pub tagline: String,
    pub status: String,
    pub poster_path: String,
    pub homepage: Option<String>,
    pub adult: bool,
    pub video: bool,
    pub belongs_to_collection: Option<String>,
    pub production_companies: Vec<String>,
    pub production_countries: Vec<String>,
    pub spoken_languages: Vec<String>,
}

impl MovieRecord {
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}

/// A selector value: either the "All" wildcard or one concrete value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T> Choice<T> {
    pub fn as_only(&self) -> Option<&T> {
        match self {
            Choice::All => None,
            Choice::Only(v) => Some(v),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => write!(f, "All"),
            Choice::Only(v) => write!(f, "{}", v),
        }
    }
}

/// Current genre and year selection. Both fields are always set; the UI
/// starts at `All`/`All`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub genre: Choice<String>,
    pub year: Choice<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Scatter,
    Donut,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [ChartKind::Bar, ChartKind::Line, ChartKind::Scatter, ChartKind::Donut];

    /// Chart selector buttons carry a token such as `bar` or `Donut`.
    pub fn from_token(token: &str) -> Option<ChartKind> {
        match token.trim().to_lowercase().as_str() {
            "bar" => Some(ChartKind::Bar),
            "line" => Some(ChartKind::Line),
            "scatter" => Some(ChartKind::Scatter),
            "donut" => Some(ChartKind::Donut),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Scatter => "scatter",
            ChartKind::Donut => "donut",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreProfit {
    pub genre: String,
    pub revenue: f64,
    pub budget: f64,
    pub profit: f64,
    pub movie_count: usize,
    /// Percent of the total positive profit.
    pub share: f64,
    /// profit / revenue, in percent
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieProfit {
    pub title: String,
    pub revenue: f64,
    pub budget: f64,
    pub profit: f64,
    pub share: f64,
}

/// Movie-level profit breakdown for a single genre.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreDrilldown {
    pub genre: String,
    pub movies: Vec<MovieProfit>,
    pub top_earning: MovieProfit,
    pub top_profit: MovieProfit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearRating {
    pub year: i32,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenreRatingSeries {
    pub genre: String,
    pub points: Vec<YearRating>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatingTrends {
    pub series: Vec<GenreRatingSeries>,
    pub x_domain: (i32, i32),
    pub y_domain: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub title: String,
    pub budget: f64,
    pub revenue: f64,
    pub popularity: f64,
    pub vote_average: f64,
    /// Dot radius from the square-root popularity scale.
    pub radius: f64,
    /// 0..=1 position on the sequential rating scale.
    pub shade: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPlot {
    pub points: Vec<ScatterPoint>,
    pub budget_max: f64,
    pub revenue_max: f64,
}

/// Why an aggregation produced nothing to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoData {
    EmptySelection,
    NoPositiveProfit,
    NoRatings,
    NoValidPoints,
}

impl NoData {
    pub fn message(&self) -> &'static str {
        match self {
            NoData::EmptySelection => "No data available for this selection.",
            NoData::NoPositiveProfit => "No positive profit data available for donut chart.",
            NoData::NoRatings => "No rating data to display.",
            NoData::NoValidPoints => "No valid data available for scatter plot.",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AggregationResult {
    CategoryCounts(Vec<GenreCount>),
    GenreProfitShares(Vec<GenreProfit>),
    MovieProfitShares(GenreDrilldown),
    YearlyGenreRatings(RatingTrends),
    ScatterPoints(ScatterPlot),
    NoData(NoData),
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct GenreCountRow {
    #[serde(rename = "Genre")]
    #[tabled(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Movies")]
    #[tabled(rename = "Movies")]
    pub count: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct GenreProfitRow {
    #[serde(rename = "Genre")]
    #[tabled(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "TotalRevenue")]
    #[tabled(rename = "TotalRevenue")]
    pub revenue: String,
    #[serde(rename = "TotalBudget")]
    #[tabled(rename = "TotalBudget")]
    pub budget: String,
    #[serde(rename = "Profit")]
    #[tabled(rename = "Profit")]
    pub profit: String,
    #[serde(rename = "ProfitShare")]
    #[tabled(rename = "ProfitShare")]
    pub share: String,
    #[serde(rename = "ProfitMargin")]
    #[tabled(rename = "ProfitMargin")]
    pub margin: String,
    #[serde(rename = "Movies")]
    #[tabled(rename = "Movies")]
    pub movie_count: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MovieProfitRow {
    #[serde(rename = "Title")]
    #[tabled(rename = "Title")]
    pub title: String,
    #[serde(rename = "Revenue")]
    #[tabled(rename = "Revenue")]
    pub revenue: String,
    #[serde(rename = "Budget")]
    #[tabled(rename = "Budget")]
    pub budget: String,
    #[serde(rename = "Profit")]
    #[tabled(rename = "Profit")]
    pub profit: String,
    #[serde(rename = "ProfitShare")]
    #[tabled(rename = "ProfitShare")]
    pub share: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct YearRatingRow {
    #[serde(rename = "Genre")]
    #[tabled(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "AvgRating")]
    #[tabled(rename = "AvgRating")]
    pub mean: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ScatterRow {
    #[serde(rename = "Title")]
    #[tabled(rename = "Title")]
    pub title: String,
    #[serde(rename = "Budget")]
    #[tabled(rename = "Budget")]
    pub budget: String,
    #[serde(rename = "Revenue")]
    #[tabled(rename = "Revenue")]
    pub revenue: String,
    #[serde(rename = "Popularity")]
    #[tabled(rename = "Popularity")]
    pub popularity: String,
    #[serde(rename = "AvgRating")]
    #[tabled(rename = "AvgRating")]
    pub vote_average: String,
    #[serde(rename = "Radius")]
    #[tabled(rename = "Radius")]
    pub radius: String,
    #[serde(rename = "Shade")]
    #[tabled(rename = "Shade")]
    pub shade: String,
}
