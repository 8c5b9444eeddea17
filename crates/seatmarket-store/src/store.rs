use seatmarket_core::{
    aggregate_stats, decode_density, decode_flag, derived_view, encode_flag, Density, EditGate,
    Seat, SeatCollection, SeatError, SeatField, SeatPatch, SeatStats, Settings, SortMode,
};
use seatmarket_history::{
    CommandBox, HistoryManager, ImportCollectionCommand, ResetAllCommand, UpdateSeatCommand,
};

use crate::storage::{keys, KeyValueStore};

/// One session's seat board: the collection, its undo history and the
/// board settings, written through to `S` after every change.
///
/// Storage is best effort. Read failures fall back to defaults and write
/// failures are logged; neither ever reaches the caller.
pub struct SeatStore<S: KeyValueStore> {
    storage: S,
    seats: SeatCollection,
    settings: Settings,
    history: HistoryManager,
}

impl<S: KeyValueStore> SeatStore<S> {
    /// Load the board and settings from `storage`, substituting defaults
    /// for anything missing or malformed
    pub fn open(storage: S) -> Self {
        let read = |key: &str| match storage.get(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "Storage read failed, using default");
                None
            }
        };

        let raw: Vec<(&str, Option<String>)> = keys::ALL.iter().map(|&key| (key, read(key))).collect();

        let seats = SeatCollection::load_or_default(slot(&raw, keys::SEATS));
        let settings = Settings {
            pin: slot(&raw, keys::PIN).unwrap_or_default().to_string(),
            locked: decode_flag(slot(&raw, keys::LOCKED), true),
            board_top: decode_flag(slot(&raw, keys::BOARD_TOP), true),
            density: decode_density(slot(&raw, keys::DENSITY)),
            wrap: decode_flag(slot(&raw, keys::WRAP), false),
        };

        let mut store = Self {
            storage,
            seats,
            settings,
            history: HistoryManager::default(),
        };

        // Rewrite only the slots that were missing or did not hold their canonical form
        for (key, value) in store.encoded_slots() {
            if slot(&raw, key) != Some(value.as_str()) {
                store.persist(key, &value);
            }
        }
        store
    }

    pub fn seats(&self) -> &SeatCollection {
        &self.seats
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Current edit policy
    pub fn edit_gate(&self) -> EditGate {
        EditGate::from_settings(&self.settings)
    }

    // --- Mutations ---

    /// Run a command, asking `prompt` for a PIN only if the gate needs one
    pub fn execute_with<P>(&mut self, command: CommandBox, prompt: P) -> Result<Vec<u32>, SeatError>
    where
        P: FnOnce() -> Option<String>,
    {
        if !command.requires_authorization() {
            return Ok(self.apply(command));
        }
        let gate = self.edit_gate();
        gate.require_edit(prompt, || self.apply(command))
    }

    /// Run a command with a PIN the caller already collected
    pub fn execute(&mut self, command: CommandBox, pin: Option<&str>) -> Result<Vec<u32>, SeatError> {
        self.execute_with(command, || pin.map(str::to_string))
    }

    fn apply(&mut self, command: CommandBox) -> Vec<u32> {
        let affected = self.history.execute(command, &mut self.seats);
        if !affected.is_empty() {
            self.persist_seats();
        }
        affected
    }

    /// Patch one seat without consulting the edit gate.
    /// Returns false, recording nothing, if `id` matches no seat.
    pub fn update_seat(&mut self, id: u32, patch: SeatPatch, note: Option<&str>) -> bool {
        let command = UpdateSeatCommand::new(id, patch, note.map(str::to_string));
        !self.apply(Box::new(command)).is_empty()
    }

    /// Gated single-field edit from raw form input, noted as `"<field> → <raw>"`
    pub fn edit_field(
        &mut self,
        id: u32,
        field: SeatField,
        raw: &str,
        pin: Option<&str>,
    ) -> Result<(), SeatError> {
        let patch = SeatPatch::from_field_input(field, raw)?;
        let note = SeatPatch::note_for(field, raw);
        let affected = self.execute(Box::new(UpdateSeatCommand::new(id, patch, Some(note))), pin)?;
        if affected.is_empty() {
            return Err(SeatError::SeatNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Replace the board with defaults once `confirm` agrees. Settings are kept.
    ///
    /// Not subject to the edit gate.
    pub fn reset_all<C>(&mut self, confirm: C) -> Result<(), SeatError>
    where
        C: FnOnce() -> bool,
    {
        if !confirm() {
            return Err(SeatError::ConfirmationRequired);
        }
        self.execute(Box::new(ResetAllCommand::new()), None)?;
        tracing::info!("Board reset to defaults");
        Ok(())
    }

    /// Gated wholesale replacement from user-supplied JSON text.
    ///
    /// Parse and shape errors are reported before the gate is consulted;
    /// a rejected import leaves the board untouched.
    pub fn import_json(&mut self, text: &str, pin: Option<&str>) -> Result<(), SeatError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        self.import_collection(value, pin)
    }

    /// Gated wholesale replacement from decoded JSON
    pub fn import_collection(
        &mut self,
        data: serde_json::Value,
        pin: Option<&str>,
    ) -> Result<(), SeatError> {
        let incoming = SeatCollection::from_value(data)?;
        self.execute(Box::new(ImportCollectionCommand::new(incoming)), pin)?;
        tracing::info!("Imported seat board");
        Ok(())
    }

    /// Pretty JSON of the current board
    pub fn export_collection(&self) -> Result<String, SeatError> {
        Ok(self.seats.to_json_pretty()?)
    }

    /// Restore the board as it was before the last change
    pub fn undo(&mut self) -> Result<String, SeatError> {
        let description = self
            .history
            .undo(&mut self.seats)
            .ok_or(SeatError::NothingToUndo)?;
        self.persist_seats();
        Ok(description)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn undo_count(&self) -> usize {
        self.history.undo_count()
    }

    /// What the next undo would revert
    pub fn undo_description(&self) -> Option<&str> {
        self.history.undo_description()
    }

    // --- Derived views ---

    pub fn view(&self, query: &str, sort: SortMode) -> Vec<&Seat> {
        derived_view(&self.seats, query, sort)
    }

    pub fn stats(&self) -> SeatStats<'_> {
        aggregate_stats(&self.seats)
    }

    // --- Settings ---

    /// Change the edit PIN; an empty PIN turns the gate off
    pub fn set_pin(&mut self, pin: impl Into<String>) {
        let pin = pin.into();
        self.persist(keys::PIN, &pin);
        self.settings.pin = pin;
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.settings.locked = locked;
        self.persist(keys::LOCKED, encode_flag(locked));
    }

    pub fn set_board_top(&mut self, board_top: bool) {
        self.settings.board_top = board_top;
        self.persist(keys::BOARD_TOP, encode_flag(board_top));
    }

    pub fn toggle_board_position(&mut self) -> bool {
        self.set_board_top(!self.settings.board_top);
        self.settings.board_top
    }

    pub fn set_density(&mut self, density: Density) {
        self.settings.density = density;
        self.persist(keys::DENSITY, density.as_str());
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.settings.wrap = wrap;
        self.persist(keys::WRAP, encode_flag(wrap));
    }

    // --- Persistence ---

    fn persist_seats(&mut self) {
        match self.seats.to_json() {
            Ok(json) => self.persist(keys::SEATS, &json),
            Err(err) => tracing::warn!(error = %err, "Could not serialize seats"),
        }
    }

    /// Every slot as it should be persisted for the current state
    fn encoded_slots(&self) -> Vec<(&'static str, String)> {
        let mut slots = Vec::with_capacity(keys::ALL.len());
        match self.seats.to_json() {
            Ok(json) => slots.push((keys::SEATS, json)),
            Err(err) => tracing::warn!(error = %err, "Could not serialize seats"),
        }
        slots.push((keys::PIN, self.settings.pin.clone()));
        slots.push((keys::LOCKED, encode_flag(self.settings.locked).to_string()));
        slots.push((keys::BOARD_TOP, encode_flag(self.settings.board_top).to_string()));
        slots.push((keys::DENSITY, self.settings.density.as_str().to_string()));
        slots.push((keys::WRAP, encode_flag(self.settings.wrap).to_string()));
        slots
    }

    fn persist(&mut self, key: &str, value: &str) {
        match self.storage.set(key, value) {
            Ok(()) => tracing::debug!(key, bytes = value.len(), "Persisted slot"),
            Err(err) => tracing::warn!(key, error = %err, "Storage write failed"),
        }
    }
}

fn slot<'a>(raw: &'a [(&str, Option<String>)], key: &str) -> Option<&'a str> {
    raw.iter()
        .find(|(k, _)| *k == key)
        .and_then(|(_, value)| value.as_deref())
}

impl<S: KeyValueStore> std::fmt::Debug for SeatStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeatStore")
            .field("seats", &self.seats.len())
            .field("settings", &self.settings)
            .field("history", &self.history)
            .finish()
    }
}
