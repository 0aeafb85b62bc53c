//! EEPROM save/load sequencing
//!
//! Saving the shadow registers to EEPROM (or reloading them) is started by a
//! `DEV_CTRL` bit and completes asynchronously inside the device. The driver
//! tracks the operation with [`EepromCommit`]:
//!
//! ```text
//! Idle -> CommandIssued -> Polling -> Done
//!                                  \-> TimedOut
//! ```
//!
//! While polling, `EEPROM_WR_DONE` bit 0 is read once per poll interval
//! until it is set or the timeout budget is spent. Time is accounted by the
//! delays actually requested, so a timeout of `T` ms never expires early.

/// Default time allowed for an EEPROM save/load to complete
pub const DEFAULT_EEPROM_TIMEOUT_MS: u32 = 5000;

/// Default interval between `EEPROM_WR_DONE` polls
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 10;

/// EEPROM operation requested through `DEV_CTRL`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromOperation {
    /// Write shadow registers to EEPROM (`DEV_CTRL` bit 8)
    Save,
    /// Reload shadow registers from EEPROM (`DEV_CTRL` bit 9)
    Load,
}

/// Progress of an EEPROM operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromState {
    /// Nothing requested yet
    Idle,
    /// Control bit written, polling not started
    CommandIssued(EepromOperation),
    /// Waiting for the done flag
    Polling,
    /// Done flag observed
    Done,
    /// Timeout budget spent without seeing the done flag
    TimedOut,
}

/// EEPROM completion tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EepromCommit {
    state: EepromState,
    timeout_ms: u32,
    poll_interval_ms: u32,
    elapsed_ms: u32,
}

impl EepromCommit {
    /// Create a tracker with the given budget
    ///
    /// A zero poll interval is treated as 1 ms.
    #[must_use]
    pub const fn new(timeout_ms: u32, poll_interval_ms: u32) -> Self {
        Self {
            state: EepromState::Idle,
            timeout_ms,
            poll_interval_ms: if poll_interval_ms == 0 {
                1
            } else {
                poll_interval_ms
            },
            elapsed_ms: 0,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> EepromState {
        self.state
    }

    /// Time spent polling so far
    #[must_use]
    pub const fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Delay to apply between two polls
    #[must_use]
    pub const fn poll_interval_ms(&self) -> u32 {
        self.poll_interval_ms
    }

    /// Record that the save/load control bit has been written
    pub fn command_issued(&mut self, operation: EepromOperation) {
        self.state = EepromState::CommandIssued(operation);
    }

    /// Enter the polling state
    ///
    /// Valid from `Idle` as well, for waiting on an operation started elsewhere.
    pub fn begin_polling(&mut self) {
        if matches!(self.state, EepromState::Idle | EepromState::CommandIssued(_)) {
            self.state = EepromState::Polling;
            self.elapsed_ms = 0;
        }
    }

    /// Whether another poll fits in the budget
    ///
    /// Moves to `TimedOut` once the budget is spent.
    pub fn poll_due(&mut self) -> bool {
        if self.state != EepromState::Polling {
            return false;
        }
        if self.elapsed_ms >= self.timeout_ms {
            self.state = EepromState::TimedOut;
            return false;
        }
        true
    }

    /// Record a poll result, returning `true` when the operation completed
    pub fn record(&mut self, done: bool) -> bool {
        if done && self.state == EepromState::Polling {
            self.state = EepromState::Done;
        }
        self.state == EepromState::Done
    }

    /// Account for one poll interval of waiting
    pub fn advance(&mut self) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(self.poll_interval_ms);
    }
}

impl Default for EepromCommit {
    fn default() -> Self {
        Self::new(DEFAULT_EEPROM_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS)
    }
}
