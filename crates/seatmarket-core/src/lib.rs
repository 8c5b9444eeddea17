pub mod collection;
pub mod error;
pub mod format;
pub mod gate;
pub mod search;
pub mod seat;
pub mod settings;
pub mod stats;

pub use collection::{positions, SeatBlock, SeatCollection, SeatRow, BLOCKS, COLS, ROWS, SEAT_COUNT};
pub use error::SeatError;
pub use format::format_price;
pub use gate::EditGate;
pub use search::{compare_labels, derived_view, SortMode};
pub use seat::{
    label_for, parse_amount, timestamp_now, HistoryEntry, Seat, SeatField, SeatPatch,
    HISTORY_LIMIT,
};
pub use settings::{decode_density, decode_flag, encode_flag, Density, Settings};
pub use stats::{aggregate_stats, SeatStats};
