pub mod command;
pub mod stack;

pub use command::{Command, CommandBox, ImportCollectionCommand, ResetAllCommand, UpdateSeatCommand};
pub use stack::{HistoryManager, DEFAULT_UNDO_LIMIT};
