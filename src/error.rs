// Error type shared by the loader, the coordinator and the exporters.
//
// Field-level coercion problems never show up here: the normalizer always
// substitutes a safe default instead.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// Reading or writing a CSV file failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A selector value that cannot be turned into a filter
    #[error("Invalid filter value: {0}")]
    InvalidFilter(String),

    /// A user action that is not allowed in the current view state
    #[error("Cannot {action} while {state}")]
    IllegalTransition { action: &'static str, state: String },
}
