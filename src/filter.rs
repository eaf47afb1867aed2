use crate::error::{DashboardError, Result};
use crate::types::{Choice, FilterState, MovieRecord};
use crate::util::parse_i32_safe;
use chrono::Datelike;
use std::collections::BTreeSet;

pub const ALL_TOKEN: &str = "All";

/// Keep the records that match both the genre and the year selection,
/// in their original order.
///
/// Generic over any iterator of borrowed records so an already filtered
/// subset can be narrowed again without cloning.
pub fn filter_records<'a, I>(records: I, state: &FilterState) -> Vec<&'a MovieRecord>
where
    I: IntoIterator<Item = &'a MovieRecord>,
{
    records.into_iter().filter(|r| record_matches(r, state)).collect()
}

pub fn record_matches(record: &MovieRecord, state: &FilterState) -> bool {
    let genre_ok = match &state.genre {
        Choice::All => true,
        Choice::Only(g) => record.has_genre(g),
    };
    let year_ok = match state.year {
        Choice::All => true,
        Choice::Only(y) => record.release_date.map(|d| d.year() == y).unwrap_or(false),
    };
    genre_ok && year_ok
}

/// Genre selector value: `All` or a genre name, matched exactly.
pub fn parse_genre_choice(token: &str) -> Choice<String> {
    let token = token.trim();
    if token == ALL_TOKEN {
        Choice::All
    } else {
        Choice::Only(token.to_string())
    }
}

pub fn parse_year_choice(token: &str) -> Result<Choice<i32>> {
    let token = token.trim();
    if token == ALL_TOKEN {
        return Ok(Choice::All);
    }
    parse_i32_safe(Some(token))
        .map(Choice::Only)
        .ok_or_else(|| DashboardError::InvalidFilter(format!("year '{}'", token)))
}

/// Values offered by the genre and year selectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    /// Alphabetical.
    pub genres: Vec<String>,
    /// Ascending.
    pub years: Vec<i32>,
}

pub fn filter_options(data: &[MovieRecord]) -> FilterOptions {
    let mut genres: BTreeSet<&str> = BTreeSet::new();
    let mut years: BTreeSet<i32> = BTreeSet::new();
    for r in data {
        genres.extend(r.genres.iter().map(String::as_str));
        if let Some(d) = r.release_date {
            years.insert(d.year());
        }
    }
    FilterOptions {
        genres: genres.into_iter().map(str::to_string).collect(),
        years: years.into_iter().collect(),
    }
}
