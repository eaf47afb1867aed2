use crate::error::Result;
use crate::types::{MovieRecord, RawRow};
use crate::util::{
    coerce_amount, decode_named_list, decode_named_object, non_empty, parse_dmy_date, parse_flag,
};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub parse_errors: usize,
    pub undated_rows: usize,
    pub ungenred_rows: usize,
}

/// Read the movie CSV at `path` and normalize every row.
pub fn load_movies<P: AsRef<Path>>(path: P) -> Result<(Vec<MovieRecord>, LoadReport)> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let (data, report) = load_movies_from(file)?;
    info!(path = %path.display(), records = data.len(), "CSV loaded");
    Ok((data, report))
}

pub fn load_movies_from<R: Read>(reader: R) -> Result<(Vec<MovieRecord>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    // A broken header makes the whole file unusable; broken rows do not.
    rdr.headers()?;

    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut raw: Vec<RawRow> = Vec::new();
    for result in rdr.deserialize::<RawRow>() {
        total_rows += 1;
        match result {
            Ok(r) => raw.push(r),
            Err(e) => {
                debug!(row = total_rows, error = %e, "skipping undecodable CSV row");
                parse_errors += 1;
            }
        }
    }

    let data = normalize(&raw);
    let report = LoadReport {
        total_rows,
        parse_errors,
        undated_rows: data.iter().filter(|r| r.release_date.is_none()).count(),
        ungenred_rows: data.iter().filter(|r| r.genres.is_empty()).count(),
    };
    Ok((data, report))
}

/// One record per row, in order. Never fails.
pub fn normalize(rows: &[RawRow]) -> Vec<MovieRecord> {
    rows.iter().map(normalize_row).collect()
}

pub fn normalize_row(row: &RawRow) -> MovieRecord {
    let text = |v: &Option<String>| v.as_deref().unwrap_or("").to_string();

    MovieRecord {
        title: text(&row.title),
        budget: coerce_amount(row.budget.as_deref()),
        revenue: coerce_amount(row.revenue.as_deref()),
        popularity: coerce_amount(row.popularity.as_deref()),
        vote_average: coerce_amount(row.vote_average.as_deref()),
        vote_count: coerce_amount(row.vote_count.as_deref()),
        runtime: coerce_amount(row.runtime.as_deref()),
        release_date: parse_dmy_date(row.release_date.as_deref()),
        genres: decode_named_list(row.genres.as_deref()),

        id: text(&row.id),
        imdb_id: text(&row.imdb_id),
        original_title: text(&row.original_title),
        original_language: text(&row.original_language),
        overview: text(&row.overview),
        tagline: text(&row.tagline),
        status: text(&row.status),
        poster_path: text(&row.poster_path),
        homepage: non_empty(row.homepage.clone()),
        adult: parse_flag(row.adult.as_deref()),
        video: parse_flag(row.video.as_deref()),
        belongs_to_collection: decode_named_object(row.belongs_to_collection.as_deref()),
        production_companies: decode_named_list(row.production_companies.as_deref()),
        production_countries: decode_named_list(row.production_countries.as_deref()),
        spoken_languages: decode_named_list(row.spoken_languages.as_deref()),
    }
}
