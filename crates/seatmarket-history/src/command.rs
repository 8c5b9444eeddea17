use seatmarket_core::{timestamp_now, SeatCollection, SeatPatch};

/// Type alias for boxed commands
pub type CommandBox = Box<dyn Command>;

/// A mutation of the seat board that can be recorded for undo
pub trait Command: std::fmt::Debug + Send + Sync {
    /// Execute the command, returning the ids of affected seats.
    /// An empty result means nothing changed.
    fn execute(&mut self, seats: &mut SeatCollection) -> Vec<u32>;

    /// Get a description of this command (for UI display)
    fn description(&self) -> &str;

    /// Whether the edit gate must approve this command before it runs
    fn requires_authorization(&self) -> bool {
        true
    }
}

/// Patch one seat's fields
#[derive(Debug)]
pub struct UpdateSeatCommand {
    id: u32,
    patch: SeatPatch,
    note: Option<String>,
    description: String,
}

impl UpdateSeatCommand {
    pub fn new(id: u32, patch: SeatPatch, note: Option<String>) -> Self {
        let description = match &note {
            Some(note) => format!("Update seat {}: {}", id, note),
            None => format!("Update seat {}", id),
        };
        Self {
            id,
            patch,
            note,
            description,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Command for UpdateSeatCommand {
    fn execute(&mut self, seats: &mut SeatCollection) -> Vec<u32> {
        let at = timestamp_now();
        if seats.update(self.id, &self.patch, self.note.as_deref(), &at) {
            vec![self.id]
        } else {
            tracing::warn!(seat_id = self.id, "Update ignored: no seat with this id");
            Vec::new()
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Replace the board with a freshly generated default one
#[derive(Debug, Default)]
pub struct ResetAllCommand;

impl ResetAllCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ResetAllCommand {
    fn execute(&mut self, seats: &mut SeatCollection) -> Vec<u32> {
        *seats = SeatCollection::new();
        seats.iter().map(|s| s.id).collect()
    }

    fn description(&self) -> &str {
        "Reset all seats"
    }

    // Reset is confirmed by the user but has never been PIN-gated
    fn requires_authorization(&self) -> bool {
        false
    }
}

/// Overwrite the whole board with an imported one
#[derive(Debug)]
pub struct ImportCollectionCommand {
    incoming: SeatCollection,
}

impl ImportCollectionCommand {
    pub fn new(incoming: SeatCollection) -> Self {
        Self { incoming }
    }
}

impl Command for ImportCollectionCommand {
    fn execute(&mut self, seats: &mut SeatCollection) -> Vec<u32> {
        *seats = self.incoming.clone();
        seats.iter().map(|s| s.id).collect()
    }

    fn description(&self) -> &str {
        "Import seats"
    }
}
