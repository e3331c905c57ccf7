use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::adapters::session_index::{IndexError, SessionIndex};
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::session::ChargingSession;
use crate::domain::summary::{StatusCounts, SummaryBounds, count_by_status};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid charging session id [{0}] received")]
    UnknownSession(Uuid),
    #[error("the number of seconds specified ({seconds}) should be between {low} and {high}")]
    WindowOutOfRange { seconds: i64, low: i64, high: i64 },
    #[error("session store lock poisoned")]
    LockPoisoned,
    #[error("session index update failed: {0}")]
    Index(#[from] IndexError),
}

pub trait SessionQueryHandler {
    fn list_sessions(&self) -> Result<Vec<ChargingSession>, ServiceError>;
    /// Counts sessions started within `[now - seconds, now)` per status.
    fn summarize(
        &self,
        seconds: i64,
        bounds: SummaryBounds,
    ) -> Result<StatusCounts, ServiceError>;
}

pub trait SessionCommandHandler {
    /// Assumes `station_id` is non-blank; the HTTP layer rejects blank ids.
    fn start_session(&self, station_id: &str) -> Result<ChargingSession, ServiceError>;
    fn stop_session(&self, id: Uuid) -> Result<ChargingSession, ServiceError>;
}

#[derive(Clone)]
pub struct InMemorySessionService {
    index: Arc<RwLock<SessionIndex>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemorySessionService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionService {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            index: Arc::new(RwLock::new(SessionIndex::new())),
            clock,
        }
    }

    fn read_index(&self) -> Result<RwLockReadGuard<'_, SessionIndex>, ServiceError> {
        self.index.read().map_err(|_| ServiceError::LockPoisoned)
    }

    fn write_index(&self) -> Result<RwLockWriteGuard<'_, SessionIndex>, ServiceError> {
        self.index.write().map_err(|_| ServiceError::LockPoisoned)
    }
}

impl SessionQueryHandler for InMemorySessionService {
    fn list_sessions(&self) -> Result<Vec<ChargingSession>, ServiceError> {
        let index = self.read_index()?;
        Ok(index.sessions().cloned().collect())
    }

    fn summarize(
        &self,
        seconds: i64,
        bounds: SummaryBounds,
    ) -> Result<StatusCounts, ServiceError> {
        if !bounds.contains(seconds) {
            tracing::debug!(
                seconds,
                low = bounds.low(),
                high = bounds.high(),
                "summary window rejected"
            );
            return Err(ServiceError::WindowOutOfRange {
                seconds,
                low: bounds.low(),
                high: bounds.high(),
            });
        }
        let window = TimeDelta::try_seconds(seconds);

        let counts = {
            let index = self.read_index()?;
            let now = self.clock.now();
            // Windows reaching past the representable range start at the earliest instant.
            let from = window
                .and_then(|window| now.checked_sub_signed(window))
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            count_by_status(index.started_within(from, now))
        };

        tracing::debug!(seconds, groups = counts.len(), "charging sessions summarized");
        Ok(counts)
    }
}

impl SessionCommandHandler for InMemorySessionService {
    fn start_session(&self, station_id: &str) -> Result<ChargingSession, ServiceError> {
        let session = {
            let mut index = self.write_index()?;
            let session = ChargingSession::start(Uuid::new_v4(), station_id, self.clock.now());
            index.insert(session.clone())?;
            session
        };

        tracing::info!(
            session_id = %session.id(),
            station_id = %session.station_id(),
            started_at = %session.started_at(),
            "charging session started"
        );

        Ok(session)
    }

    fn stop_session(&self, id: Uuid) -> Result<ChargingSession, ServiceError> {
        let session = {
            let mut index = self.write_index()?;
            let stopped_at = self.clock.now();
            index.stop(id, stopped_at).cloned()
        };

        match session {
            Some(session) => {
                tracing::info!(
                    session_id = %id,
                    station_id = %session.station_id(),
                    stopped_at = ?session.stopped_at(),
                    "charging session stopped"
                );
                Ok(session)
            }
            None => {
                tracing::warn!(session_id = %id, "stop requested for unknown charging session");
                Err(ServiceError::UnknownSession(id))
            }
        }
    }
}
