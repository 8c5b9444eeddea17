use thiserror::Error;

/// Errors surfaced by seat board operations.
///
/// None of these are fatal: each one leaves the board in a consistent state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatError {
    /// Import payload is not an array of exactly 24 seats
    #[error("Format error: expected an array of {expected} seats, got {found}")]
    Format { expected: usize, found: String },

    /// Import payload is not valid JSON
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Edit gate rejected the supplied PIN
    #[error("Incorrect PIN")]
    IncorrectPin,

    /// Undo requested with an empty history
    #[error("Nothing to undo")]
    NothingToUndo,

    /// No seat carries the given id or label
    #[error("Seat not found: {0}")]
    SeatNotFound(String),

    /// Amount input is not a non-negative number
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("Invalid sort mode: {0:?}")]
    InvalidSortMode(String),

    #[error("Invalid density: {0:?}")]
    InvalidDensity(String),

    #[error("Invalid field: {0:?}")]
    InvalidField(String),

    /// A destructive action was requested without confirmation
    #[error("Confirmation required")]
    ConfirmationRequired,
}

impl SeatError {
    /// Stable machine-readable code for front ends
    pub fn code(&self) -> &'static str {
        match self {
            SeatError::Format { .. } => "FORMAT_ERROR",
            SeatError::JsonParse(_) => "JSON_PARSE_ERROR",
            SeatError::IncorrectPin => "INCORRECT_PIN",
            SeatError::NothingToUndo => "NOTHING_TO_UNDO",
            SeatError::SeatNotFound(_) => "SEAT_NOT_FOUND",
            SeatError::InvalidAmount(_) => "INVALID_AMOUNT",
            SeatError::InvalidSortMode(_) => "INVALID_SORT_MODE",
            SeatError::InvalidDensity(_) => "INVALID_DENSITY",
            SeatError::InvalidField(_) => "INVALID_FIELD",
            SeatError::ConfirmationRequired => "CONFIRMATION_REQUIRED",
        }
    }
}

impl From<serde_json::Error> for SeatError {
    fn from(err: serde_json::Error) -> Self {
        SeatError::JsonParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SeatError::IncorrectPin.code(), "INCORRECT_PIN");
        assert_eq!(SeatError::NothingToUndo.code(), "NOTHING_TO_UNDO");
        assert_eq!(
            SeatError::Format {
                expected: 24,
                found: "3 elements".to_string()
            }
            .code(),
            "FORMAT_ERROR"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let err = serde_json::from_str::<serde_json::Value>("[1,").unwrap_err();
        let seat_err: SeatError = err.into();
        assert_eq!(seat_err.code(), "JSON_PARSE_ERROR");
        assert!(seat_err.to_string().starts_with("JSON parse error"));
    }
}
