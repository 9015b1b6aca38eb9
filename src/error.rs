#[derive(Debug, thiserror::Error)]
pub enum PricerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Please fix the invalid rows before submitting (rows {})", format_rows(.0))]
    InvalidRows(Vec<usize>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

fn format_rows(rows: &[usize]) -> String {
    rows.iter()
        .map(|r| (r + 1).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, PricerError>;
