// Aggregations behind each chart. Every function here is pure, works on
// the already filtered subset, and answers `AggregationResult::NoData`
// instead of an empty chart when there is nothing worth drawing.
use crate::types::{
    AggregationResult, GenreCount, GenreDrilldown, GenreProfit, GenreRatingSeries, MovieProfit,
    MovieRecord, NoData, RatingTrends, ScatterPlot, ScatterPoint, YearRating,
};
use chrono::Datelike;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

pub const TOP_GENRES: usize = 10;
/// Ratings are on a 0..10 scale; the line chart always shows all of it.
pub const RATING_SCALE_MAX: f64 = 10.0;
pub const POINT_RADIUS_RANGE: (f64, f64) = (3.0, 15.0);

/// Look up (or append) the accumulator for `key`, keeping first-seen order.
fn slot<'a, V: Default>(
    index: &mut HashMap<String, usize>,
    entries: &'a mut Vec<(String, V)>,
    key: &str,
) -> &'a mut V {
    let pos = *index.entry(key.to_string()).or_insert_with(|| {
        entries.push((key.to_string(), V::default()));
        entries.len() - 1
    });
    &mut entries[pos].1
}

/// Bar chart: how many movies carry each genre. A movie with several genres
/// counts once for each of them.
pub fn category_counts(data: &[&MovieRecord]) -> AggregationResult {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for r in data {
        for g in &r.genres {
            *slot(&mut index, &mut counts, g) += 1;
        }
    }
    if counts.is_empty() {
        return AggregationResult::NoData(NoData::EmptySelection);
    }

    // Stable: equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    AggregationResult::CategoryCounts(
        counts
            .into_iter()
            .take(TOP_GENRES)
            .map(|(genre, count)| GenreCount { genre, count })
            .collect(),
    )
}

fn has_money(r: &MovieRecord) -> bool {
    r.revenue > 0.0 && r.budget > 0.0
}

/// Donut chart: total revenue, budget and profit per genre, keeping only
/// genres that made money overall.
pub fn genre_profit_shares(data: &[&MovieRecord]) -> AggregationResult {
    #[derive(Default)]
    struct Acc {
        revenue: f64,
        budget: f64,
        count: usize,
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut accs: Vec<(String, Acc)> = Vec::new();
    for r in data.iter().filter(|r| has_money(r)) {
        for g in &r.genres {
            let e = slot(&mut index, &mut accs, g);
            e.revenue += r.revenue;
            e.budget += r.budget;
            e.count += 1;
        }
    }

    let profitable: Vec<(String, Acc, f64)> = accs
        .into_iter()
        .map(|(genre, acc)| {
            let profit = acc.revenue - acc.budget;
            (genre, acc, profit)
        })
        .filter(|(_, _, profit)| *profit > 0.0)
        .collect();
    let total_profit: f64 = profitable.iter().map(|(_, _, p)| p).sum();
    if profitable.is_empty() || total_profit == 0.0 {
        return AggregationResult::NoData(NoData::NoPositiveProfit);
    }

    AggregationResult::GenreProfitShares(
        profitable
            .into_iter()
            .map(|(genre, acc, profit)| GenreProfit {
                genre,
                revenue: acc.revenue,
                budget: acc.budget,
                profit,
                movie_count: acc.count,
                share: profit / total_profit * 100.0,
                margin: profit / acc.revenue * 100.0,
            })
            .collect(),
    )
}

/// Donut drill-down: the profitable movies of one genre, plus the top
/// earner and the most profitable title. The first maximum wins ties.
pub fn genre_drilldown(data: &[&MovieRecord], genre: &str) -> AggregationResult {
    let mut movies: Vec<MovieProfit> = data
        .iter()
        .filter(|r| r.has_genre(genre) && has_money(r))
        .map(|r| MovieProfit {
            title: r.title.clone(),
            revenue: r.revenue,
            budget: r.budget,
            profit: r.revenue - r.budget,
            share: 0.0,
        })
        .filter(|m| m.profit > 0.0)
        .collect();
    if movies.is_empty() {
        return AggregationResult::NoData(NoData::NoPositiveProfit);
    }

    let total_profit: f64 = movies.iter().map(|m| m.profit).sum();
    for m in &mut movies {
        m.share = m.profit / total_profit * 100.0;
    }

    let top_earning = first_max(&movies, |m| m.revenue);
    let top_profit = first_max(&movies, |m| m.profit);

    AggregationResult::MovieProfitShares(GenreDrilldown {
        genre: genre.to_string(),
        movies,
        top_earning,
        top_profit,
    })
}

// Callers guarantee `movies` is not empty.
fn first_max(movies: &[MovieProfit], key: impl Fn(&MovieProfit) -> f64) -> MovieProfit {
    let mut best = &movies[0];
    for m in &movies[1..] {
        if key(m) > key(best) {
            best = m;
        }
    }
    best.clone()
}

/// Line chart: mean rating per (genre, year). With `only_genre` set, every
/// other genre is ignored.
pub fn yearly_genre_ratings(data: &[&MovieRecord], only_genre: Option<&str>) -> AggregationResult {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, BTreeMap<i32, (f64, usize)>)> = Vec::new();
    for r in data {
        let Some(date) = r.release_date else { continue };
        if !r.vote_average.is_finite() {
            continue;
        }
        let year = date.year();
        for g in &r.genres {
            if only_genre.map(|sel| sel != g.as_str()).unwrap_or(false) {
                continue;
            }
            let bucket = slot(&mut index, &mut groups, g).entry(year).or_insert((0.0, 0));
            bucket.0 += r.vote_average;
            bucket.1 += 1;
        }
    }
    if groups.is_empty() {
        return AggregationResult::NoData(NoData::NoRatings);
    }

    let series: Vec<GenreRatingSeries> = groups
        .into_iter()
        .map(|(genre, years)| GenreRatingSeries {
            genre,
            points: years
                .into_iter()
                .map(|(year, (sum, n))| YearRating { year, mean: sum / n as f64 })
                .collect(),
        })
        .collect();

    let points = series.iter().flat_map(|s| s.points.iter());
    let (mut min_year, mut max_year) = (i32::MAX, i32::MIN);
    let mut max_mean = f64::MIN;
    for p in points {
        min_year = min_year.min(p.year);
        max_year = max_year.max(p.year);
        max_mean = max_mean.max(p.mean);
    }

    AggregationResult::YearlyGenreRatings(RatingTrends {
        series,
        x_domain: (min_year, max_year),
        y_domain: (0.0, max_mean.max(RATING_SCALE_MAX)),
    })
}

fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Map `v` from `domain` onto `range` through a square root, the way
/// circle areas should grow with the value.
pub fn sqrt_scale(v: f64, domain: (f64, f64), range: (f64, f64)) -> f64 {
    let (a, b) = (domain.0.sqrt(), domain.1.sqrt());
    if (b - a).abs() < f64::EPSILON {
        return (range.0 + range.1) / 2.0;
    }
    range.0 + (v.sqrt() - a) / (b - a) * (range.1 - range.0)
}

/// Position of `v` inside `domain`, in 0..=1.
pub fn sequential_scale(v: f64, domain: (f64, f64)) -> f64 {
    let span = domain.1 - domain.0;
    if span.abs() < f64::EPSILON {
        return 0.5;
    }
    ((v - domain.0) / span).clamp(0.0, 1.0)
}

/// Scatter plot: budget against revenue for movies where both are known.
pub fn scatter_points(data: &[&MovieRecord]) -> AggregationResult {
    let valid: Vec<&MovieRecord> = data
        .iter()
        .copied()
        .filter(|r| {
            r.budget > 0.0
                && r.revenue > 0.0
                && r.budget.is_finite()
                && r.revenue.is_finite()
                && r.popularity.is_finite()
                && r.vote_average.is_finite()
        })
        .collect();
    if valid.is_empty() {
        return AggregationResult::NoData(NoData::NoValidPoints);
    }

    let popularity = extent(valid.iter().map(|r| r.popularity));
    let rating = extent(valid.iter().map(|r| r.vote_average));
    let points: Vec<ScatterPoint> = valid
        .iter()
        .map(|r| ScatterPoint {
            title: r.title.clone(),
            budget: r.budget,
            revenue: r.revenue,
            popularity: r.popularity,
            vote_average: r.vote_average,
            radius: sqrt_scale(r.popularity, popularity, POINT_RADIUS_RANGE),
            shade: sequential_scale(r.vote_average, rating),
        })
        .collect();

    let budget_max = points.iter().map(|p| p.budget).fold(0.0, f64::max);
    let revenue_max = points.iter().map(|p| p.revenue).fold(0.0, f64::max);
    AggregationResult::ScatterPoints(ScatterPlot { points, budget_max, revenue_max })
}

/// Largest points first so the text view lists the most popular titles on top.
pub fn by_popularity_desc(a: &ScatterPoint, b: &ScatterPoint) -> Ordering {
    b.popularity.partial_cmp(&a.popularity).unwrap_or(Ordering::Equal)
}
