use crate::command::CommandBox;
use seatmarket_core::SeatCollection;

/// Number of board snapshots kept for undo
pub const DEFAULT_UNDO_LIMIT: usize = 15;

/// Board state captured right before a command ran
#[derive(Debug, Clone)]
struct Snapshot {
    seats: SeatCollection,
    description: String,
}

/// Manages undo history for board mutations.
///
/// Every command that changes the board leaves a full snapshot of the
/// previous board behind; undo restores the latest one. There is no redo.
pub struct HistoryManager {
    /// Snapshots, oldest first; the last one is restored by the next undo
    undo_stack: Vec<Snapshot>,
    /// Maximum number of undo levels
    max_size: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT)
    }
}

impl HistoryManager {
    /// Create a new history manager with the specified max undo levels
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            max_size,
        }
    }

    /// Execute a command, recording the prior board if anything changed
    pub fn execute(&mut self, mut command: CommandBox, seats: &mut SeatCollection) -> Vec<u32> {
        let before = seats.clone();
        let affected = command.execute(seats);

        if affected.is_empty() {
            return affected;
        }

        self.undo_stack.push(Snapshot {
            seats: before,
            description: command.description().to_string(),
        });

        // Limit stack size
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }

        affected
    }

    /// Restore the board captured before the last command.
    /// Returns that command's description, or `None` if there is nothing to undo.
    pub fn undo(&mut self, seats: &mut SeatCollection) -> Option<String> {
        let snapshot = self.undo_stack.pop()?;
        *seats = snapshot.seats;
        Some(snapshot.description)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Get the description of the command that would be undone
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|s| s.description.as_str())
    }

    /// Get the number of snapshots in the undo stack
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
    }
}

impl std::fmt::Debug for HistoryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryManager")
            .field("undo_count", &self.undo_stack.len())
            .field("max_size", &self.max_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ResetAllCommand, UpdateSeatCommand};
    use seatmarket_core::SeatPatch;

    fn price_cmd(id: u32, price: f64) -> CommandBox {
        Box::new(UpdateSeatCommand::new(id, SeatPatch::price(price), None))
    }

    #[test]
    fn test_undo_restores_previous_board() {
        let mut seats = SeatCollection::new();
        let mut history = HistoryManager::default();
        let original = seats.clone();

        history.execute(price_cmd(1, 42.0), &mut seats);
        assert_eq!(seats.get(1).unwrap().price, 42.0);
        assert!(history.can_undo());
        assert_eq!(history.undo_description(), Some("Update seat 1"));

        assert_eq!(history.undo(&mut seats).as_deref(), Some("Update seat 1"));
        assert_eq!(seats, original);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_undo_empty_stack() {
        let mut seats = SeatCollection::new();
        let original = seats.clone();
        let mut history = HistoryManager::default();

        assert!(history.undo(&mut seats).is_none());
        assert_eq!(seats, original);
    }

    #[test]
    fn test_noop_command_is_not_recorded() {
        let mut seats = SeatCollection::new();
        let mut history = HistoryManager::default();

        let affected = history.execute(price_cmd(404, 1.0), &mut seats);
        assert!(affected.is_empty());
        assert_eq!(history.undo_count(), 0);
    }

    #[test]
    fn test_max_size() {
        let mut seats = SeatCollection::new();
        let mut history = HistoryManager::default();

        for i in 0..20 {
            history.execute(price_cmd(1, i as f64), &mut seats);
        }

        assert_eq!(history.undo_count(), DEFAULT_UNDO_LIMIT);

        // Oldest snapshots were evicted: unwinding everything stops at price 4
        while history.undo(&mut seats).is_some() {}
        assert_eq!(seats.get(1).unwrap().price, 4.0);
    }

    #[test]
    fn test_multiple_undo() {
        let mut seats = SeatCollection::new();
        let mut history = HistoryManager::new(100);

        for id in 1..=3 {
            history.execute(price_cmd(id, id as f64 * 10.0), &mut seats);
        }
        history.undo(&mut seats);
        assert_eq!(seats.get(3).unwrap().price, 0.0);
        assert_eq!(seats.get(2).unwrap().price, 20.0);

        history.undo(&mut seats);
        history.undo(&mut seats);
        assert_eq!(history.undo_count(), 0);
        assert!(seats.iter().all(|s| s.price == 0.0));
    }

    #[test]
    fn test_undo_reset() {
        let mut seats = SeatCollection::new();
        let mut history = HistoryManager::default();
        history.execute(price_cmd(8, 800.0), &mut seats);
        let before_reset = seats.clone();

        history.execute(Box::new(ResetAllCommand::new()), &mut seats);
        assert_eq!(seats.get(8).unwrap().price, 0.0);
        assert_eq!(history.undo_count(), 2);

        history.undo(&mut seats);
        assert_eq!(seats, before_reset);
        assert_eq!(history.undo_count(), 1);
    }
}
