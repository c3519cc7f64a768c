use crate::model::DEFAULT_HISTORY_CAP;
use chrono::NaiveDate;
use thiserror::Error;

/// Options de rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationConfig {
    pub history_cap: usize,
    pub upcoming_days: usize,
}

impl RotationConfig {
    pub fn new(history_cap: usize, upcoming_days: usize) -> Result<Self, EngineError> {
        if history_cap == 0 {
            return Err(EngineError::InvalidConfig("history_cap must be > 0"));
        }
        Ok(Self {
            history_cap,
            upcoming_days,
        })
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            history_cap: DEFAULT_HISTORY_CAP,
            upcoming_days: 7,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("no eligible candidate on {date}: everyone is absent")]
    NoEligibleCandidate { date: NaiveDate },
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("invalid range: {end} is before {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("date overflow: {days} days after {from}")]
    DateOverflow { from: NaiveDate, days: usize },
    #[error("{date} falls outside the last {cap} history entries")]
    BeyondHistoryCap { date: NaiveDate, cap: usize },
    #[error("unknown person: {0}")]
    UnknownPerson(String),
    #[error("absence index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unknown absence: {0}")]
    UnknownAbsence(String),
    #[error("roster is empty")]
    EmptyRoster,
    #[error("duplicate person id: {0}")]
    DuplicatePerson(String),
    #[error("setup incomplete: every person needs a name")]
    IncompleteSetup,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}
