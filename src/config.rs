// Command-line and environment configuration.
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "movie-dashboard", version, about = "Explore a movie dataset by genre and year")]
pub struct Config {
    /// Movie CSV to load
    #[arg(long, env = "MOVIES_CSV", default_value = "data/movies.csv")]
    pub data: PathBuf,

    /// Directory exports are written to
    #[arg(long, env = "MOVIES_EXPORT_DIR", default_value = ".")]
    pub export_dir: PathBuf,

    /// Log filter, e.g. `warn` or `movie_dashboard=debug`
    #[arg(long, env = "MOVIES_LOG", default_value = "warn")]
    pub log_level: String,

    /// Chart shown first
    #[arg(long, default_value = "bar")]
    pub chart: String,

    /// Print the first view and exit instead of opening the menu
    #[arg(long)]
    pub once: bool,
}
