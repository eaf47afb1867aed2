// Insight panel text shown next to each chart.
use crate::types::{GenreDrilldown, MovieRecord};
use crate::util::{average, format_int, format_money, format_number};

#[derive(Debug, Clone, PartialEq)]
pub enum InsightEntry {
    Qa { question: String, answer: String },
    Fact { label: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insight {
    pub entries: Vec<InsightEntry>,
    pub note: Option<String>,
}

impl Insight {
    fn qa(pairs: &[(&str, &str)]) -> Insight {
        Insight {
            entries: pairs
                .iter()
                .map(|(q, a)| InsightEntry::Qa { question: q.to_string(), answer: a.to_string() })
                .collect(),
            note: None,
        }
    }

    fn note(text: &str) -> Insight {
        Insight { entries: Vec::new(), note: Some(text.to_string()) }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.note.is_none()
    }
}

/// Count and mean rating of the records tagged with one genre.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreSummary {
    pub genre: String,
    pub count: usize,
    pub mean_rating: f64,
}

pub fn genre_summary(data: &[&MovieRecord], genre: &str) -> GenreSummary {
    let ratings: Vec<f64> = data
        .iter()
        .filter(|r| r.has_genre(genre))
        .map(|r| r.vote_average)
        .collect();
    GenreSummary {
        genre: genre.to_string(),
        count: ratings.len(),
        mean_rating: average(&ratings),
    }
}

pub fn no_data() -> Insight {
    Insight::note("No insights available due to no data.")
}

pub fn bar(data: &[&MovieRecord], clicked: Option<&str>) -> Insight {
    let Some(genre) = clicked else {
        return Insight::qa(&[
            ("Which genres have the most movies?", "The bar chart shows the distribution of movies by genre."),
            ("How does genre popularity change over time?", "Use the year filter to analyze trends across years."),
            (
                "What strategic decisions can the organization make?",
                "Insights from the chart help guide production planning and marketing focus on genres that are gaining or maintaining popularity.",
            ),
        ]);
    };
    let summary = genre_summary(data, genre);
    Insight {
        entries: vec![
            InsightEntry::Fact { label: "Selected Genre".into(), value: summary.genre },
            InsightEntry::Fact { label: "Number of Movies".into(), value: format_int(summary.count) },
            InsightEntry::Fact { label: "Average Rating".into(), value: format_number(summary.mean_rating, 2) },
        ],
        note: Some("Click another bar or change filters to update.".into()),
    }
}

pub fn line(genre: Option<&str>) -> Insight {
    match genre {
        Some(g) => {
            let q1 = format!("What does the line chart show for \"{}\"?", g);
            Insight::qa(&[
                (q1.as_str(), "It shows average movie ratings for the selected genre over years."),
                ("How has the rating changed over time?", "Peaks and dips reveal audience engagement trends."),
                ("How is this useful?", "Helps target production for high-performing years in this genre."),
                (
                    "Why is this valuable for the business?",
                    "It enables strategic planning to invest in genres and years with higher audience approval, maximizing revenue and minimizing risk.",
                ),
            ])
        }
        None => Insight::qa(&[
            ("What are overall rating trends?", "Shows average movie ratings over years for all genres."),
            ("How do genres compare?", "Multiple lines reveal which genres are rising or falling in popularity."),
            (
                "Why is this valuable for the business?",
                "Helps identify broad market trends and prioritize investments in promising genres to optimize portfolio success.",
            ),
        ]),
    }
}

/// Sum of revenue minus sum of budget over the records tagged `genre`.
pub fn genre_total_profit(data: &[&MovieRecord], genre: &str) -> f64 {
    let (revenue, budget) = data
        .iter()
        .filter(|r| r.has_genre(genre))
        .fold((0.0, 0.0), |(rev, bud), r| (rev + r.revenue, bud + r.budget));
    revenue - budget
}

pub fn scatter(data: &[&MovieRecord], genre: Option<&str>) -> Insight {
    match genre {
        None => Insight::qa(&[
            (
                "What does the scatter plot show for all genres?",
                "Relationship between budget and revenue, dot size shows popularity, color is average rating.",
            ),
            ("How can this help business?", "Identifies profitable budget ranges and popular, well-rated movies."),
            ("Business decisions?", "Allocate budget wisely and focus on high-return movies."),
        ]),
        Some(g) => {
            let q1 = format!("Scatter plot trend for \"{}\"?", g);
            let profit = format!("Approximately {}", format_money(genre_total_profit(data, g)));
            Insight::qa(&[
                (q1.as_str(), "Shows budget vs revenue relationship with dot size popularity and color rating."),
                ("Total profit?", profit.as_str()),
                ("Business decisions?", "Focus investment on profitable budget ranges and popular, high-rated movies."),
            ])
        }
    }
}

pub fn donut() -> Insight {
    Insight::qa(&[
        (
            "What does the donut chart show?",
            "It displays profit share by genre, helping identify which genres generate the most profit.",
        ),
        (
            "How is this valuable for the business?",
            "It helps businesses focus investments on the most profitable genres, optimize production strategies, and maximize overall returns.",
        ),
    ])
}

pub fn drilldown(detail: &GenreDrilldown) -> Insight {
    let q1 = format!("Profit share by individual movies in the genre {}.", detail.genre);
    let q2 = format!(
        "Top earning movie: {} with revenue {}. Most profitable movie: {} with profit {}.",
        detail.top_earning.title,
        format_money(detail.top_earning.revenue),
        detail.top_profit.title,
        format_money(detail.top_profit.profit),
    );
    Insight::qa(&[
        ("What does this pie chart show?", q1.as_str()),
        ("Which are the top earning and most profitable movies?", q2.as_str()),
        (
            "What insights can the organization gain from this chart?",
            "The organization can identify high-performing movies to focus marketing and investment efforts, optimize budgets, and plan future productions for maximum profit.",
        ),
    ])
}

pub fn drilldown_empty(genre: &str) -> Insight {
    Insight::note(&format!("No profitable movies with both budget and revenue in {}.", genre))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MovieProfit;
    use pretty_assertions::assert_eq;

    fn movie(genres: &[&str], rating: f64, revenue: f64, budget: f64) -> MovieRecord {
        MovieRecord {
            genres: genres.iter().map(|g| g.to_string()).collect(),
            vote_average: rating,
            revenue,
            budget,
            ..MovieRecord::default()
        }
    }

    #[test]
    fn clicked_bar_reports_count_and_mean() {
        let data = vec![
            movie(&["Comedy"], 6.0, 0.0, 0.0),
            movie(&["Comedy", "Drama"], 8.0, 0.0, 0.0),
            movie(&["Drama"], 1.0, 0.0, 0.0),
        ];
        let refs: Vec<&MovieRecord> = data.iter().collect();
        let insight = bar(&refs, Some("Comedy"));
        assert_eq!(
            insight.entries,
            vec![
                InsightEntry::Fact { label: "Selected Genre".into(), value: "Comedy".into() },
                InsightEntry::Fact { label: "Number of Movies".into(), value: "2".into() },
                InsightEntry::Fact { label: "Average Rating".into(), value: "7.00".into() },
            ]
        );
    }

    #[test]
    fn summary_of_absent_genre_is_zero() {
        let s = genre_summary(&[], "Western");
        assert_eq!(s.count, 0);
        assert_eq!(s.mean_rating, 0.0);
    }

    #[test]
    fn scatter_insight_totals_profit() {
        let data = vec![movie(&["Action"], 5.0, 3000.0, 1000.0), movie(&["Action"], 5.0, 0.0, 500.0)];
        let refs: Vec<&MovieRecord> = data.iter().collect();
        assert_eq!(genre_total_profit(&refs, "Action"), 1500.0);
        let InsightEntry::Qa { answer, .. } = &scatter(&refs, Some("Action")).entries[1] else {
            panic!("expected a question");
        };
        assert_eq!(answer, "Approximately $1,500");
    }

    #[test]
    fn drilldown_names_top_movies() {
        let m = |title: &str, revenue: f64, profit: f64| MovieProfit {
            title: title.into(),
            revenue,
            budget: revenue - profit,
            profit,
            share: 50.0,
        };
        let detail = GenreDrilldown {
            genre: "Action".into(),
            movies: vec![m("big", 1000.0, 100.0), m("lean", 600.0, 500.0)],
            top_earning: m("big", 1000.0, 100.0),
            top_profit: m("lean", 600.0, 500.0),
        };
        let InsightEntry::Qa { answer, .. } = &drilldown(&detail).entries[1] else {
            panic!("expected a question");
        };
        assert!(answer.contains("big with revenue $1,000"));
        assert!(answer.contains("lean with profit $500"));
    }

    #[test]
    fn no_data_is_a_note() {
        assert_eq!(no_data().note.as_deref(), Some("No insights available due to no data."));
        assert!(Insight::default().is_empty());
    }
}
