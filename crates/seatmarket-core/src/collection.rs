use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SeatError;
use crate::seat::{timestamp_now, Seat, SeatPatch};

/// Number of seats on the board
pub const SEAT_COUNT: usize = 24;
/// Classroom blocks, left to right
pub const BLOCKS: [u8; 3] = [1, 2, 3];
/// Rows within a block, front to back
pub const ROWS: [char; 4] = ['A', 'B', 'C', 'D'];
/// Columns within a row
pub const COLS: [u8; 2] = [1, 2];

/// All grid positions in ascending label order
pub fn positions() -> impl Iterator<Item = (u8, char, u8)> {
    BLOCKS.into_iter().flat_map(|block| {
        ROWS.into_iter()
            .flat_map(move |row| COLS.into_iter().map(move |col| (block, row, col)))
    })
}

/// The authoritative set of 24 seats
///
/// Construction always goes through the default generator or the shape
/// check in [`SeatCollection::from_value`], so a value of this type always
/// holds exactly [`SEAT_COUNT`] seats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatCollection {
    #[serde(deserialize_with = "deserialize_seats")]
    seats: Vec<Seat>,
}

fn deserialize_seats<'de, D>(deserializer: D) -> Result<Vec<Seat>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    SeatCollection::from_value(value)
        .map(|collection| collection.seats)
        .map_err(serde::de::Error::custom)
}

impl Default for SeatCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl SeatCollection {
    /// Fresh default board stamped with the current time
    pub fn new() -> Self {
        Self::with_timestamp(&timestamp_now())
    }

    /// Fresh default board with every seat stamped `at`
    pub fn with_timestamp(at: &str) -> Self {
        let seats = positions()
            .enumerate()
            .map(|(i, (block, row, col))| Seat::new(i as u32 + 1, block, row, col, at))
            .collect();
        Self { seats }
    }

    /// Validate the shape of decoded JSON and build a collection from it.
    ///
    /// Only the outer shape is checked: the value must be an array of
    /// exactly 24 elements. Elements are decoded leniently; one that is not
    /// an object at all is replaced by the default seat for its position.
    pub fn from_value(value: Value) -> Result<Self, SeatError> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(SeatError::Format {
                    expected: SEAT_COUNT,
                    found: json_kind(&other).to_string(),
                })
            }
        };

        if items.len() != SEAT_COUNT {
            return Err(SeatError::Format {
                expected: SEAT_COUNT,
                found: format!("{} elements", items.len()),
            });
        }

        let at = timestamp_now();
        let seats = items
            .into_iter()
            .zip(positions())
            .enumerate()
            .map(|(i, (item, (block, row, col)))| {
                serde_json::from_value::<Seat>(item).unwrap_or_else(|err| {
                    tracing::warn!(index = i, error = %err, "Replacing undecodable seat record");
                    Seat::new(i as u32 + 1, block, row, col, at.as_str())
                })
            })
            .collect();

        Ok(Self { seats })
    }

    /// Parse user-supplied JSON text
    pub fn from_json(json: &str) -> Result<Self, SeatError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Decode a persisted collection, falling back to a fresh board on any failure
    pub fn load_or_default(raw: Option<&str>) -> Self {
        match raw.map(Self::from_json) {
            Some(Ok(collection)) => collection,
            Some(Err(err)) => {
                tracing::warn!(error = %err, "Persisted seats unusable, generating defaults");
                Self::new()
            }
            None => Self::new(),
        }
    }

    /// Compact JSON used for persistence
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Pretty JSON used for export
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Seat> {
        self.seats.iter()
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.seats.iter().any(|s| s.id == id)
    }

    /// Get a seat by id
    pub fn get(&self, id: u32) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == id)
    }

    /// Get a seat by label, ignoring case
    pub fn by_label(&self, label: &str) -> Option<&Seat> {
        let label = label.trim();
        self.seats.iter().find(|s| s.label.eq_ignore_ascii_case(label))
    }

    /// Get the seat at a grid position
    pub fn seat_at(&self, block: u8, row: char, col: u8) -> Option<&Seat> {
        let row = row.to_string();
        self.seats
            .iter()
            .find(|s| s.block == block && s.row == row && s.col == col)
    }

    /// Apply `patch` to the seat with `id`. Returns false if no seat matches.
    pub fn update(&mut self, id: u32, patch: &SeatPatch, note: Option<&str>, at: &str) -> bool {
        match self.seats.iter_mut().find(|s| s.id == id) {
            Some(seat) => {
                seat.apply(patch, note, at);
                true
            }
            None => false,
        }
    }

    /// Grid layout: 3 blocks, each 4 rows of 2 seats, in presentation order
    pub fn blocks(&self) -> Vec<SeatBlock<'_>> {
        BLOCKS
            .iter()
            .map(|&block| SeatBlock {
                block,
                rows: ROWS
                    .iter()
                    .map(|&row| SeatRow {
                        row,
                        seats: COLS
                            .iter()
                            .map(|&col| self.seat_at(block, row, col))
                            .collect(),
                    })
                    .collect(),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a SeatCollection {
    type Item = &'a Seat;
    type IntoIter = std::slice::Iter<'a, Seat>;

    fn into_iter(self) -> Self::IntoIter {
        self.seats.iter()
    }
}

/// One classroom block in grid order
#[derive(Debug, Clone, Serialize)]
pub struct SeatBlock<'a> {
    pub block: u8,
    pub rows: Vec<SeatRow<'a>>,
}

/// One row of a block; a position is `None` if an imported board lacks it
#[derive(Debug, Clone, Serialize)]
pub struct SeatRow<'a> {
    pub row: char,
    pub seats: Vec<Option<&'a Seat>>,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
