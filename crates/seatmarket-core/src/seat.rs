use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SeatError;

/// Maximum number of history entries kept per seat
pub const HISTORY_LIMIT: usize = 20;

/// Current time as an RFC 3339 UTC string with millisecond precision
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Seat label for a grid position, e.g. `(2, 'B', 1)` -> `"2B1"`
pub fn label_for(block: u8, row: char, col: u8) -> String {
    format!("{}{}{}", block, row, col)
}

/// One entry of a seat's change log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default, deserialize_with = "lenient::string")]
    pub time: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub note: String,
}

/// A single desk on the board
///
/// Every field is decoded leniently: a missing or wrongly typed field takes
/// its default instead of failing the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    #[serde(default, deserialize_with = "lenient::integer")]
    pub id: u32,
    #[serde(default, deserialize_with = "lenient::string")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub block: u8,
    #[serde(default, deserialize_with = "lenient::string")]
    pub row: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub col: u8,
    #[serde(default, deserialize_with = "lenient::string")]
    pub owner: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub tenant: String,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub rent_fee: f64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub last_updated: String,
    #[serde(default, deserialize_with = "lenient::history")]
    pub history: Vec<HistoryEntry>,
}

impl Seat {
    /// Create an empty seat at the given grid position
    pub fn new(id: u32, block: u8, row: char, col: u8, last_updated: impl Into<String>) -> Self {
        Self {
            id,
            label: label_for(block, row, col),
            block,
            row: row.to_string(),
            col,
            owner: String::new(),
            tenant: String::new(),
            price: 0.0,
            rent_fee: 0.0,
            last_updated: last_updated.into(),
            history: Vec::new(),
        }
    }

    /// A seat without a tenant is vacant
    pub fn is_vacant(&self) -> bool {
        self.tenant.is_empty()
    }

    /// Apply a patch, stamp `last_updated`, and log `note` if given
    pub fn apply(&mut self, patch: &SeatPatch, note: Option<&str>, at: &str) {
        if let Some(owner) = &patch.owner {
            self.owner = owner.clone();
        }
        if let Some(tenant) = &patch.tenant {
            self.tenant = tenant.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(rent_fee) = patch.rent_fee {
            self.rent_fee = rent_fee;
        }
        self.last_updated = at.to_string();

        if let Some(note) = note {
            self.history.insert(
                0,
                HistoryEntry {
                    time: at.to_string(),
                    note: note.to_string(),
                },
            );
            self.history.truncate(HISTORY_LIMIT);
        }
    }

    /// Case-insensitive substring match on label, owner, and tenant.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.label.to_lowercase().contains(needle)
            || self.owner.to_lowercase().contains(needle)
            || self.tenant.to_lowercase().contains(needle)
    }
}

/// Editable seat fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeatField {
    Owner,
    Tenant,
    Price,
    RentFee,
}

impl SeatField {
    pub const ALL: [SeatField; 4] = [
        SeatField::Owner,
        SeatField::Tenant,
        SeatField::Price,
        SeatField::RentFee,
    ];

    /// Human-readable name used in history notes
    pub fn display_name(self) -> &'static str {
        match self {
            SeatField::Owner => "owner",
            SeatField::Tenant => "tenant",
            SeatField::Price => "price",
            SeatField::RentFee => "rent fee",
        }
    }

    pub fn is_amount(self) -> bool {
        matches!(self, SeatField::Price | SeatField::RentFee)
    }
}

impl fmt::Display for SeatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for SeatField {
    type Err = SeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(SeatField::Owner),
            "tenant" => Ok(SeatField::Tenant),
            "price" => Ok(SeatField::Price),
            "rentfee" | "rent-fee" | "rent_fee" | "rent" => Ok(SeatField::RentFee),
            _ => Err(SeatError::InvalidField(s.to_string())),
        }
    }
}

/// Parse a currency amount typed by a user. Empty input means zero.
pub fn parse_amount(raw: &str) -> Result<f64, SeatError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(SeatError::InvalidAmount(raw.to_string())),
    }
}

/// Partial update of a seat's editable fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeatPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_fee: Option<f64>,
}

impl SeatPatch {
    pub fn owner(value: impl Into<String>) -> Self {
        Self {
            owner: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn tenant(value: impl Into<String>) -> Self {
        Self {
            tenant: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn price(value: f64) -> Self {
        Self {
            price: Some(value),
            ..Self::default()
        }
    }

    pub fn rent_fee(value: f64) -> Self {
        Self {
            rent_fee: Some(value),
            ..Self::default()
        }
    }

    /// Build a single-field patch from raw form input
    pub fn from_field_input(field: SeatField, raw: &str) -> Result<Self, SeatError> {
        Ok(match field {
            SeatField::Owner => Self::owner(raw),
            SeatField::Tenant => Self::tenant(raw),
            SeatField::Price => Self::price(parse_amount(raw)?),
            SeatField::RentFee => Self::rent_fee(parse_amount(raw)?),
        })
    }

    /// History note recorded for a single-field edit, e.g. `"price → 50000"`
    pub fn note_for(field: SeatField, raw: &str) -> String {
        format!("{} → {}", field.display_name(), raw)
    }

    pub fn is_empty(&self) -> bool {
        self.owner.is_none() && self.tenant.is_none() && self.price.is_none() && self.rent_fee.is_none()
    }
}

/// Forgiving field decoders for persisted and imported records
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{HistoryEntry, HISTORY_LIMIT};

    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        })
    }

    pub fn integer<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<u64> + Default,
    {
        let raw = match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        Ok(raw.and_then(|n| T::try_from(n).ok()).unwrap_or_default())
    }

    pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(raw.filter(|n| n.is_finite()).unwrap_or(0.0))
    }

    pub fn history<'de, D>(deserializer: D) -> Result<Vec<HistoryEntry>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value::<HistoryEntry>(item).ok())
                .take(HISTORY_LIMIT)
                .collect(),
            _ => Vec::new(),
        };
        Ok(entries)
    }
}
