use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::session::{ChargingSession, SessionStatus};

pub type StatusCounts = BTreeMap<SessionStatus, u64>;

pub fn count_by_status<'a, I>(sessions: I) -> StatusCounts
where
    I: IntoIterator<Item = &'a ChargingSession>,
{
    let mut counts = StatusCounts::new();
    for session in sessions {
        *counts.entry(session.status()).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoundsError {
    #[error("lower limit {low} must not be negative")]
    NegativeLow { low: i64 },
    #[error("lower limit {low} must not exceed upper limit {high}")]
    Inverted { low: i64, high: i64 },
}

/// Inclusive range of accepted summary window lengths, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryBounds {
    low: i64,
    high: i64,
}

impl SummaryBounds {
    pub fn new(low: i64, high: i64) -> Result<Self, BoundsError> {
        if low < 0 {
            return Err(BoundsError::NegativeLow { low });
        }
        if low > high {
            return Err(BoundsError::Inverted { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> i64 {
        self.low
    }

    pub fn high(&self) -> i64 {
        self.high
    }

    pub fn contains(&self, seconds: i64) -> bool {
        (self.low..=self.high).contains(&seconds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSummary {
    pub total_count: u64,
    pub started_count: u64,
    pub stopped_count: u64,
}

impl From<&StatusCounts> for SessionSummary {
    fn from(counts: &StatusCounts) -> Self {
        let started_count = counts
            .get(&SessionStatus::InProgress)
            .copied()
            .unwrap_or(0);
        let stopped_count = counts.get(&SessionStatus::Finished).copied().unwrap_or(0);

        Self {
            total_count: started_count + stopped_count,
            started_count,
            stopped_count,
        }
    }
}
