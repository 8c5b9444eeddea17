use serde::Serialize;

use crate::seat::Seat;

/// Board-wide price summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatStats<'a> {
    /// Sum of every seat's price
    pub total_price: f64,
    /// Total divided by the number of seats
    pub average_price: f64,
    /// Most expensive seat; first among ties after a stable descending sort
    pub top_seat: Option<&'a Seat>,
}

/// Summarize prices over the whole board.
///
/// Always computed over every seat passed in, so callers pass the full
/// collection rather than a filtered view.
pub fn aggregate_stats<'a, I>(seats: I) -> SeatStats<'a>
where
    I: IntoIterator<Item = &'a Seat>,
{
    let mut total_price = 0.0;
    let mut count = 0usize;
    let mut top_seat: Option<&Seat> = None;

    for seat in seats {
        total_price += seat.price;
        count += 1;
        // Strictly greater keeps the earliest seat among equal prices
        if top_seat.map_or(true, |top| seat.price > top.price) {
            top_seat = Some(seat);
        }
    }

    let average_price = if count == 0 {
        0.0
    } else {
        total_price / count as f64
    };

    SeatStats {
        total_price,
        average_price,
        top_seat,
    }
}
