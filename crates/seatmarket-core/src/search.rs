use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::SeatError;
use crate::seat::Seat;

/// Ordering applied to the filtered seat list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    /// Ascending by label
    #[default]
    #[serde(rename = "label")]
    Label,
    /// Most expensive first
    #[serde(rename = "priceDesc")]
    PriceDesc,
    /// Cheapest first
    #[serde(rename = "priceAsc")]
    PriceAsc,
    /// Seats without a tenant first, otherwise keeping board order
    #[serde(rename = "vacant")]
    VacantFirst,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::Label,
        SortMode::PriceDesc,
        SortMode::PriceAsc,
        SortMode::VacantFirst,
    ];

    /// Identifier used by front ends and in persisted UI state
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Label => "label",
            SortMode::PriceDesc => "priceDesc",
            SortMode::PriceAsc => "priceAsc",
            SortMode::VacantFirst => "vacant",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = SeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "label" => Ok(SortMode::Label),
            "priceDesc" | "price-desc" | "price_desc" => Ok(SortMode::PriceDesc),
            "priceAsc" | "price-asc" | "price_asc" => Ok(SortMode::PriceAsc),
            "vacant" | "vacantFirst" | "vacant-first" => Ok(SortMode::VacantFirst),
            other => Err(SeatError::InvalidSortMode(other.to_string())),
        }
    }
}

/// Compare labels ignoring case, falling back to a byte comparison so the
/// order is total
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Filter and sort seats for display.
///
/// Keeps seats whose label, owner, or tenant contains the trimmed query
/// (case-insensitive; an empty query keeps everything), then orders them by
/// `sort`. All sorts are stable. The input is never reordered.
pub fn derived_view<'a, I>(seats: I, query: &str, sort: SortMode) -> Vec<&'a Seat>
where
    I: IntoIterator<Item = &'a Seat>,
{
    let needle = query.trim().to_lowercase();
    let mut list: Vec<&Seat> = seats
        .into_iter()
        .filter(|seat| needle.is_empty() || seat.matches(&needle))
        .collect();

    match sort {
        SortMode::Label => list.sort_by(|a, b| compare_labels(&a.label, &b.label)),
        SortMode::PriceDesc => list.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortMode::PriceAsc => list.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortMode::VacantFirst => list.sort_by_key(|seat| !seat.is_vacant()),
    }

    list
}
