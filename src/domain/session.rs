use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SessionStatus {
    InProgress,
    Finished,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Finished => "FINISHED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargingSession {
    id: Uuid,
    station_id: String,
    started_at: DateTime<Utc>,
    stopped_at: Option<DateTime<Utc>>,
    status: SessionStatus,
}

impl ChargingSession {
    /// Assumes `station_id` has already been checked to be non-blank.
    pub fn start(id: Uuid, station_id: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            station_id: station_id.into(),
            started_at,
            stopped_at: None,
            status: SessionStatus::InProgress,
        }
    }

    // No-op returning false once finished.
    pub fn stop(&mut self, stopped_at: DateTime<Utc>) -> bool {
        match self.status {
            SessionStatus::Finished => false,
            SessionStatus::InProgress => {
                self.status = SessionStatus::Finished;
                self.stopped_at = Some(stopped_at.max(self.started_at));
                true
            }
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn stopped_at(&self) -> Option<DateTime<Utc>> {
        self.stopped_at
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }
}
