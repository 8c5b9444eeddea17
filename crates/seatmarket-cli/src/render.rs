//! Plain-text views of the board for the terminal

use seatmarket_core::{format_price, Seat, SeatCollection, SeatStats, Settings};
use std::fmt::Write;

const NAME_WIDTH: usize = 10;
const BLOCK_GAP: &str = "   ";

/// Seat grid with the blackboard above or below it
pub fn board(seats: &SeatCollection, settings: &Settings) -> String {
    let blocks = seats.blocks();
    let mut rows = Vec::new();

    if let Some(first) = blocks.first() {
        for row_index in 0..first.rows.len() {
            let line = blocks
                .iter()
                .filter_map(|block| block.rows.get(row_index))
                .map(|row| {
                    row.seats
                        .iter()
                        .map(|seat| cell(*seat, settings.wrap))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>()
                .join(BLOCK_GAP);
            rows.push(line.trim_end().to_string());
        }
    }

    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let marker = format!("{:^width$}", "[ BOARD ]", width = width);

    let mut out = String::new();
    if settings.board_top {
        let _ = writeln!(out, "{}", marker.trim_end());
    }
    for row in &rows {
        let _ = writeln!(out, "{}", row);
    }
    if !settings.board_top {
        let _ = writeln!(out, "{}", marker.trim_end());
    }
    out
}

fn cell(seat: Option<&Seat>, wrap: bool) -> String {
    let Some(seat) = seat else {
        return format!("{:<4}{:<w$}", "?", "", w = NAME_WIDTH);
    };
    let name = if seat.is_vacant() { "·" } else { seat.tenant.as_str() };
    let name = if wrap { name.to_string() } else { truncate(name, NAME_WIDTH - 1) };
    format!("{:<4}{:<w$}", seat.label, name, w = NAME_WIDTH)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max.saturating_sub(1)).collect();
    short.push('…');
    short
}

/// Status word shown next to each seat
pub fn badge(seat: &Seat) -> &'static str {
    if seat.is_vacant() {
        "vacant"
    } else {
        "rented"
    }
}

/// One line per seat
pub fn seat_line(seat: &Seat) -> String {
    format!(
        "{:<4} {:<6}  owner: {:<12} tenant: {:<12} price: {:>12}  rent: {:>10}",
        seat.label,
        badge(seat),
        or_dash(&seat.owner),
        or_dash(&seat.tenant),
        format_price(seat.price),
        format_price(seat.rent_fee),
    )
}

/// Every field of one seat followed by its history, newest first
pub fn seat_detail(seat: &Seat) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{}) {}", seat.label, seat.id, badge(seat));
    let _ = writeln!(out, "  owner     {}", or_dash(&seat.owner));
    let _ = writeln!(out, "  tenant    {}", or_dash(&seat.tenant));
    let _ = writeln!(out, "  price     {}", format_price(seat.price));
    let _ = writeln!(out, "  rent fee  {}", format_price(seat.rent_fee));
    let _ = writeln!(out, "  updated   {}", seat.last_updated);

    if seat.history.is_empty() {
        let _ = writeln!(out, "  no history");
    } else {
        let _ = writeln!(out, "  history");
        for entry in &seat.history {
            let _ = writeln!(out, "    {}  {}", entry.time, entry.note);
        }
    }
    out
}

pub fn stats(stats: &SeatStats<'_>) -> String {
    let top = match stats.top_seat {
        Some(seat) => format!("{} ({})", seat.label, format_price(seat.price)),
        None => "-".to_string(),
    };
    format!(
        "total    {}\naverage  {}\ntop      {}\n",
        format_price(stats.total_price),
        format_price(stats.average_price),
        top
    )
}

pub fn settings(settings: &Settings) -> String {
    let pin = if settings.pin.is_empty() { "(none)" } else { "****" };
    format!(
        "locked   {}\npin      {}\nboard    {}\ndensity  {} ({}px seats)\nwrap     {}\n",
        settings.locked,
        pin,
        if settings.board_top { "top" } else { "bottom" },
        settings.density,
        settings.density.seat_min_height(settings.wrap),
        settings.wrap,
    )
}

fn or_dash(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}
