pub mod cli;
pub mod config;
pub mod render;

use anyhow::Context;
use clap::Parser;
use seatmarket_core::SeatError;
use seatmarket_store::{KeyValueStore, SeatStore};
use std::io::{self, BufRead, Read, Write};

use crate::cli::{Cli, Command, SettingsArgs};

/// Run one subcommand against an open board, writing its output to `out`
pub fn run<S, W>(command: Command, store: &mut SeatStore<S>, out: &mut W) -> anyhow::Result<()>
where
    S: KeyValueStore,
    W: Write,
{
    match command {
        Command::Board => {
            write!(out, "{}", render::board(store.seats(), store.settings()))?;
        }
        Command::List { query, sort } => {
            let view = store.view(&query, sort);
            for seat in &view {
                writeln!(out, "{}", render::seat_line(seat))?;
            }
            tracing::debug!(query = %query, sort = %sort, shown = view.len(), "Listed seats");
        }
        Command::Show { label } => {
            let seat = store
                .seats()
                .by_label(&label)
                .ok_or_else(|| SeatError::SeatNotFound(label.clone()))?;
            write!(out, "{}", render::seat_detail(seat))?;
        }
        Command::Set {
            label,
            field,
            value,
            pin,
        } => {
            let id = store
                .seats()
                .by_label(&label)
                .map(|seat| seat.id)
                .ok_or_else(|| SeatError::SeatNotFound(label.clone()))?;
            store.edit_field(id, field, &value, pin.as_deref())?;
            if let Some(seat) = store.seats().get(id) {
                writeln!(out, "{}", render::seat_line(seat))?;
            }
        }
        Command::Reset { yes } => {
            store.reset_all(|| yes)?;
            writeln!(out, "Board reset to defaults")?;
        }
        Command::Undo => {
            let description = store.undo()?;
            writeln!(out, "Undid: {}", description)?;
        }
        Command::Export => {
            writeln!(out, "{}", store.export_collection()?)?;
        }
        Command::Import { source, pin } => {
            let text = read_source(&source)?;
            store.import_json(&text, pin.as_deref())?;
            writeln!(out, "Imported {} seats", store.seats().len())?;
        }
        Command::Stats => {
            write!(out, "{}", render::stats(&store.stats()))?;
        }
        Command::Settings(args) => {
            apply_settings(store, &args);
            write!(out, "{}", render::settings(store.settings()))?;
        }
        Command::Shell => {
            let stdin = io::stdin();
            run_session(store, stdin.lock(), out)?;
        }
    }
    Ok(())
}

/// Run one command per input line against the same store until `exit` or
/// end of input. A failing line is reported and the session goes on.
pub fn run_session<S, R, W>(store: &mut SeatStore<S>, input: R, out: &mut W) -> anyhow::Result<()>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line.context("Failed to read session input")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        let words = match split_words(line) {
            Ok(words) => words,
            Err(err) => {
                writeln!(out, "Error: {}", err)?;
                continue;
            }
        };
        let cli = match Cli::try_parse_from(std::iter::once("seat-market".to_string()).chain(words)) {
            Ok(cli) => cli,
            Err(err) => {
                write!(out, "{}", err)?;
                continue;
            }
        };
        if cli.data.is_some() {
            writeln!(out, "Error: the board file cannot change during a session")?;
            continue;
        }
        match &cli.command {
            Command::Shell => {
                writeln!(out, "Error: already in a session")?;
                continue;
            }
            Command::Import { source, .. } if source == "-" => {
                writeln!(out, "Error: stdin is the session input; import from a file")?;
                continue;
            }
            _ => {}
        }

        if let Err(err) = run(cli.command, store, out) {
            tracing::debug!(line, error = %err, "Session command failed");
            writeln!(out, "Error: {}", err)?;
        }
    }
    Ok(())
}

/// Split a session line into words. Single or double quotes group words
/// and a backslash escapes the next character.
pub fn split_words(line: &str) -> anyhow::Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (None, '"') | (None, '\'') => {
                quote = Some(ch);
                in_word = true;
            }
            (_, '\\') => {
                let escaped = chars.next().context("Trailing backslash")?;
                current.push(escaped);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (_, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        anyhow::bail!("Unclosed {} quote", q);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn apply_settings<S: KeyValueStore>(store: &mut SeatStore<S>, args: &SettingsArgs) {
    if args.is_empty() {
        return;
    }
    if let Some(pin) = &args.pin {
        store.set_pin(pin.as_str());
    }
    if let Some(locked) = args.locked {
        store.set_locked(locked);
    }
    if let Some(position) = args.board {
        store.set_board_top(position.is_top());
    }
    if args.toggle_board {
        store.toggle_board_position();
    }
    if let Some(density) = args.density {
        store.set_density(density);
    }
    if let Some(wrap) = args.wrap {
        store.set_wrap(wrap);
    }
    tracing::info!(settings = ?store.settings(), "Settings updated");
}

/// Read an import payload from a file, or from stdin for `-`
pub fn read_source(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read import from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))
}
