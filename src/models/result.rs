use serde::{Deserialize, Serialize};

use super::grade::{Grade, GradeMap};

// ---------------------------------------------------------------------------
// CardVariant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardVariant {
    #[serde(rename = "type")]
    pub type_field: String,
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub img_link: String,
    #[serde(default)]
    pub final_link: String,
    pub price_modifier: f64,
}

// ---------------------------------------------------------------------------
// VariantState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub enum VariantState {
    /// Never requested.
    #[default]
    NotRequested,
    /// A lookup was handed out and has not been stored yet.
    Loading,
    Loaded(Vec<CardVariant>),
    /// The lookup failed; the message is kept for display.
    Failed(String),
}

impl VariantState {
    /// Variants currently cached, empty unless loaded.
    pub fn variants(&self) -> &[CardVariant] {
        match self {
            VariantState::Loaded(v) => v,
            _ => &[],
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, VariantState::Loaded(_))
    }
}

/// What the results table shows for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordDisplay {
    Collapsed,
    ExpandedLoading,
    ExpandedLoaded,
    ExpandedFailed,
}

// ---------------------------------------------------------------------------
// ResultRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub card: String,
    pub id: String,
    /// Kept as delivered; aggregation parses it as an integer.
    pub card_count: String,
    /// Formatted price strings such as `"$12.50"`; missing grades are empty.
    pub grades: GradeMap<String>,
    pub final_link: String,
    pub img_link: String,
    #[serde(skip)]
    pub is_excluded: bool,
    #[serde(skip)]
    pub is_advanced: bool,
    #[serde(skip)]
    pub variants: VariantState,
    #[serde(skip)]
    pub selected_grade: Option<Grade>,
}

impl ResultRecord {
    pub fn new(card: &str, id: &str, card_count: &str) -> Self {
        Self {
            card: card.to_string(),
            id: id.to_string(),
            card_count: card_count.to_string(),
            grades: GradeMap::default(),
            final_link: String::new(),
            img_link: String::new(),
            is_excluded: false,
            is_advanced: false,
            variants: VariantState::NotRequested,
            selected_grade: None,
        }
    }

    /// Builder-style helper for setting one grade price.
    pub fn with_grade(mut self, grade: Grade, price: &str) -> Self {
        self.grades.set(grade, price.to_string());
        self
    }

    /// Integer card count; unparsable values count as zero.
    pub fn count(&self) -> i64 {
        crate::format::parse_count(&self.card_count)
    }

    pub fn display(&self) -> RecordDisplay {
        match (self.is_advanced, &self.variants) {
            (false, _) => RecordDisplay::Collapsed,
            (true, VariantState::Loaded(_)) => RecordDisplay::ExpandedLoaded,
            (true, VariantState::Failed(_)) => RecordDisplay::ExpandedFailed,
            (true, _) => RecordDisplay::ExpandedLoading,
        }
    }
}
