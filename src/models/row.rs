use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CardRow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRow {
    pub card_name: String,
    pub card_id: String,
    pub holo: bool,
    pub reverse_holo: bool,
    pub first_edition: bool,
    /// `None` only when the count was explicitly cleared; blank rows start at 1.
    pub card_count: Option<i64>,
    #[serde(default)]
    pub is_invalid: bool,
}

impl Default for CardRow {
    fn default() -> Self {
        Self {
            card_name: String::new(),
            card_id: String::new(),
            holo: false,
            reverse_holo: false,
            first_edition: false,
            card_count: Some(1),
            is_invalid: false,
        }
    }
}

impl CardRow {
    /// Convenience constructor for a named card with a count.
    pub fn new(card_name: &str, card_id: &str, card_count: i64) -> Self {
        Self {
            card_name: card_name.to_string(),
            card_id: card_id.to_string(),
            card_count: Some(card_count),
            ..Self::default()
        }
    }

    /// True when neither identifying field has been filled in.
    pub fn is_placeholder(&self) -> bool {
        self.card_name.is_empty() && self.card_id.is_empty()
    }

    /// Evaluate the invalidity predicate for this row.
    ///
    /// A row is invalid when it is partially identified (exactly one of name
    /// or id filled in) or when it carries a non-positive count. Placeholder
    /// rows are always valid.
    pub fn check_invalid(&self) -> bool {
        if self.is_placeholder() {
            return false;
        }
        self.card_name.is_empty()
            || self.card_id.is_empty()
            || matches!(self.card_count, Some(c) if c <= 0)
    }

    /// Convert to the wire shape used by the submit endpoint.
    pub fn to_submit_card(&self) -> SubmitCard {
        SubmitCard {
            card_name: self.card_name.clone(),
            card_id: self.card_id.clone(),
            holo: self.holo,
            reverse_holo: self.reverse_holo,
            first_edition: self.first_edition,
            card_count: self.card_count,
        }
    }
}

// ---------------------------------------------------------------------------
// RowField / FieldValue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    CardName,
    CardId,
    Holo,
    ReverseHolo,
    FirstEdition,
    CardCount,
}

impl RowField {
    pub fn is_checkbox(self) -> bool {
        matches!(self, Self::Holo | Self::ReverseHolo | Self::FirstEdition)
    }
}

impl std::str::FromStr for RowField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cardName" | "card_name" => Ok(Self::CardName),
            "cardId" | "card_id" => Ok(Self::CardId),
            "holo" => Ok(Self::Holo),
            "reverse_holo" | "reverseHolo" => Ok(Self::ReverseHolo),
            "first_edition" | "firstEdition" => Ok(Self::FirstEdition),
            "card_count" | "cardCount" => Ok(Self::CardCount),
            other => Err(format!("unknown row field: {}", other)),
        }
    }
}

/// A raw value coming from an input widget.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
    Number(i64),
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Checked(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n)
    }
}

// ---------------------------------------------------------------------------
// SubmitPayload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitCard {
    pub card_name: String,
    pub card_id: String,
    pub holo: bool,
    pub reverse_holo: bool,
    pub first_edition: bool,
    pub card_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitPayload {
    pub cards: Vec<SubmitCard>,
}

/// Whatever the backend chose to echo back after a submit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub valid_rows: Vec<serde_json::Value>,
}
