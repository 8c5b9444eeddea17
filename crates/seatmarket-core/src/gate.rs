use crate::error::SeatError;
use crate::settings::Settings;

/// PIN and lock policy deciding whether an edit may proceed.
///
/// The gate never prompts on its own. Callers either pass the PIN they
/// already collected to [`EditGate::authorize`] or hand a prompt callback to
/// [`EditGate::require_edit`], which only invokes it when a PIN is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditGate {
    pin: String,
    locked: bool,
}

impl EditGate {
    pub fn new(pin: impl Into<String>, locked: bool) -> Self {
        Self {
            pin: pin.into(),
            locked,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.pin.clone(), settings.locked)
    }

    /// A PIN is required only when one is configured and the lock is on
    pub fn requires_pin(&self) -> bool {
        self.locked && !self.pin.is_empty()
    }

    /// Check a pre-collected PIN. `None` means the user declined to enter one.
    pub fn authorize(&self, input: Option<&str>) -> Result<(), SeatError> {
        if !self.requires_pin() {
            return Ok(());
        }
        match input {
            Some(pin) if pin == self.pin => Ok(()),
            _ => Err(SeatError::IncorrectPin),
        }
    }

    /// Run `action` if the edit is authorized, prompting for a PIN if needed
    pub fn require_edit<T, P, F>(&self, prompt: P, action: F) -> Result<T, SeatError>
    where
        P: FnOnce() -> Option<String>,
        F: FnOnce() -> T,
    {
        if self.requires_pin() {
            let input = prompt();
            self.authorize(input.as_deref())?;
        }
        Ok(action())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_no_pin_runs_without_prompt() {
        let gate = EditGate::new("", true);
        let prompted = Cell::new(false);
        let result = gate.require_edit(
            || {
                prompted.set(true);
                None
            },
            || 7,
        );
        assert_eq!(result, Ok(7));
        assert!(!prompted.get());
    }

    #[test]
    fn test_unlocked_runs_without_prompt() {
        let gate = EditGate::new("1234", false);
        assert!(!gate.requires_pin());
        assert_eq!(gate.require_edit(|| None, || "ran"), Ok("ran"));
    }

    #[test]
    fn test_wrong_pin_blocks_action() {
        let gate = EditGate::new("1234", true);
        let calls = Cell::new(0);
        let result = gate.require_edit(|| Some("0000".to_string()), || calls.set(calls.get() + 1));
        assert_eq!(result, Err(SeatError::IncorrectPin));
        assert_eq!(calls.get(), 0);

        let result = gate.require_edit(|| None, || calls.set(calls.get() + 1));
        assert_eq!(result, Err(SeatError::IncorrectPin));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_correct_pin_runs_once() {
        let gate = EditGate::new("1234", true);
        let calls = Cell::new(0);
        let result = gate.require_edit(|| Some("1234".to_string()), || calls.set(calls.get() + 1));
        assert!(result.is_ok());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_authorize_is_exact() {
        let gate = EditGate::from_settings(&Settings {
            pin: "1234".to_string(),
            ..Settings::default()
        });
        assert!(gate.authorize(Some("1234")).is_ok());
        assert!(gate.authorize(Some(" 1234")).is_err());
        assert!(gate.authorize(None).is_err());
    }
}
