use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use seatmarket_core::{Density, SeatField, SortMode};
use std::path::PathBuf;

/// Seat market board for a 24-seat classroom
#[derive(Parser, Debug)]
#[command(name = "seat-market", author, version, about, long_about = None)]
pub struct Cli {
    /// Board file; overrides SEAT_MARKET_DATA
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Draw the seat grid
    Board,

    /// List seats, filtered and sorted
    List {
        /// Case-insensitive substring of label, owner or tenant
        #[arg(short, long, default_value = "")]
        query: String,

        /// label, priceDesc, priceAsc or vacant
        #[arg(short, long, default_value = "label")]
        sort: SortMode,
    },

    /// Show one seat with its change history
    Show {
        /// Seat label such as 2B1
        label: String,
    },

    /// Change one field of one seat
    Set {
        label: String,

        /// owner, tenant, price or rentFee
        field: SeatField,

        /// New value; amounts accept an empty string for zero
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Edit PIN when the board is locked
        #[arg(long)]
        pin: Option<String>,
    },

    /// Reset every seat to its defaults
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Undo the last change made in this session
    Undo,

    /// Print the board as JSON
    Export,

    /// Replace the board with a JSON export
    Import {
        /// File to read, or - for stdin
        source: String,

        /// Edit PIN when the board is locked
        #[arg(long)]
        pin: Option<String>,
    },

    /// Show total, average and top price
    Stats,

    /// Show or change board settings
    Settings(SettingsArgs),

    /// Read commands from stdin and run them in one session, so undo can
    /// reach every change made since the session started
    Shell,
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct SettingsArgs {
    /// Require the PIN for edits and imports
    #[arg(long, action = ArgAction::Set, value_name = "BOOL")]
    pub locked: Option<bool>,

    /// New edit PIN; an empty value disables the PIN
    #[arg(long, value_name = "PIN")]
    pub pin: Option<String>,

    /// Where the blackboard is drawn
    #[arg(long, value_enum)]
    pub board: Option<BoardPosition>,

    /// Flip the blackboard position
    #[arg(long, conflicts_with = "board")]
    pub toggle_board: bool,

    /// small, medium or large
    #[arg(long)]
    pub density: Option<Density>,

    /// Wrap long names inside seat cells
    #[arg(long, action = ArgAction::Set, value_name = "BOOL")]
    pub wrap: Option<bool>,
}

impl SettingsArgs {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardPosition {
    Top,
    Bottom,
}

impl BoardPosition {
    pub fn is_top(self) -> bool {
        self == BoardPosition::Top
    }
}
