use std::path::PathBuf;
use std::time::Duration;

/// Fallback API base used when neither the builder nor the environment sets one.
pub const DEFAULT_API_BASE: &str = "http://localhost:3001";

/// Environment variable consulted for the API base URL.
pub const API_BASE_ENV: &str = "CARD_PRICER_API_URL";

pub const SUBMIT_PATH: &str = "submit";
pub const RESULTS_PATH: &str = "results";
pub const VARIANTS_PATH: &str = "variants";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Rows created per "add rows" action and in a fresh grid.
pub const ROW_BATCH: usize = 10;

pub const TEMPLATE_FILE: &str = "card_template.csv";
pub const RESULTS_FILE: &str = "results.csv";

pub const TEMPLATE_HEADER: &str = "cardName,cardId,holo,reverse_holo,first_edition,card_count";

/// Simulated submit progress: per-card cost and fixed base, in milliseconds.
pub const PROGRESS_MS_PER_CARD: u64 = 550;
pub const PROGRESS_BASE_MS: u64 = 250;

pub fn default_api_base() -> String {
    match std::env::var(API_BASE_ENV) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => DEFAULT_API_BASE.to_string(),
    }
}

pub fn default_download_dir() -> PathBuf {
    if let Some(dir) = dirs::download_dir() {
        dir
    } else {
        PathBuf::from(".")
    }
}
