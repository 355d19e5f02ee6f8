use crate::extract::Reading;
use crate::PortalError;
use chrono::{DateTime, Utc};

/// State published by the poll coordinator after every cycle
///
/// The last good reading survives failed cycles so collaborators can keep
/// displaying it while `last_update_success` reports the outage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollState {
    /// Most recent successfully extracted reading
    pub reading: Option<Reading>,

    /// Whether the most recent cycle succeeded
    pub last_update_success: bool,

    /// Error raised by the most recent cycle, if it failed
    pub last_error: Option<PortalError>,

    /// When `reading` was stored
    pub last_success_at: Option<DateTime<Utc>>,

    /// When the most recent cycle finished
    pub last_attempt_at: Option<DateTime<Utc>>,

    /// Number of completed cycles
    pub cycles: u64,

    /// Number of failed cycles
    pub failures: u64,
}

impl PollState {
    /// Records a successful cycle
    pub fn record_success(&mut self, reading: Reading) {
        let now = Utc::now();
        self.reading = Some(reading);
        self.last_update_success = true;
        self.last_error = None;
        self.last_success_at = Some(now);
        self.last_attempt_at = Some(now);
        self.cycles += 1;
    }

    /// Records a failed cycle, keeping the cached reading untouched
    pub fn record_failure(&mut self, error: PortalError) {
        self.last_update_success = false;
        self.last_error = Some(error);
        self.last_attempt_at = Some(Utc::now());
        self.cycles += 1;
        self.failures += 1;
    }

    /// Returns true if collaborators should report the reading as available
    pub fn is_available(&self) -> bool {
        self.last_update_success && self.reading.is_some()
    }
}
