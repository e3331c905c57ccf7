use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::session::ChargingSession;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("session id {0} is already indexed")]
    DuplicateId(Uuid),
}

// Rows keyed by start time, columns by session id. Not synchronised.
#[derive(Debug, Default)]
pub struct SessionIndex {
    rows: BTreeMap<DateTime<Utc>, HashMap<Uuid, ChargingSession>>,
    columns: HashMap<Uuid, DateTime<Utc>>,
}

impl SessionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, session: ChargingSession) -> Result<(), IndexError> {
        let id = session.id();
        if self.columns.contains_key(&id) {
            return Err(IndexError::DuplicateId(id));
        }

        let started_at = session.started_at();
        self.columns.insert(id, started_at);
        self.rows.entry(started_at).or_default().insert(id, session);

        Ok(())
    }

    #[cfg(test)]
    pub fn get(&self, id: Uuid) -> Option<&ChargingSession> {
        let started_at = self.columns.get(&id)?;
        self.rows.get(started_at)?.get(&id)
    }

    pub fn stop(&mut self, id: Uuid, stopped_at: DateTime<Utc>) -> Option<&ChargingSession> {
        let started_at = self.columns.get(&id)?;
        let session = self.rows.get_mut(started_at)?.get_mut(&id)?;
        session.stop(stopped_at);
        Some(session)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &ChargingSession> {
        self.rows.values().flat_map(HashMap::values)
    }

    /// Sessions with `from <= started_at < to`.
    pub fn started_within(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> impl Iterator<Item = &ChargingSession> {
        // BTreeMap::range panics on an inverted range.
        let to = to.max(from);
        self.rows.range(from..to).flat_map(|(_, row)| row.values())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use uuid::Uuid;

    use super::{IndexError, SessionIndex};
    use crate::domain::session::{ChargingSession, SessionStatus};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    fn insert_at(index: &mut SessionIndex, station_id: &str, started_at: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        index
            .insert(ChargingSession::start(id, station_id, started_at))
            .expect("insert should succeed");
        id
    }

    #[test]
    fn keeps_sessions_sharing_a_start_time_apart() {
        let mut index = SessionIndex::new();
        let first = insert_at(&mut index, "A-1", at(0));
        let second = insert_at(&mut index, "A-2", at(0));

        assert_eq!(index.len(), 2);
        assert_eq!(index.get(first).map(|s| s.station_id()), Some("A-1"));
        assert_eq!(index.get(second).map(|s| s.station_id()), Some("A-2"));
    }

    #[test]
    fn rejects_duplicate_id() {
        let mut index = SessionIndex::new();
        let id = insert_at(&mut index, "A-1", at(0));

        let result = index.insert(ChargingSession::start(id, "A-2", at(5)));

        assert_eq!(result, Err(IndexError::DuplicateId(id)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn stop_transitions_only_the_addressed_session() {
        let mut index = SessionIndex::new();
        let stopped = insert_at(&mut index, "A-1", at(0));
        let running = insert_at(&mut index, "A-2", at(0));

        let session = index.stop(stopped, at(30)).expect("session should exist");
        assert_eq!(session.status(), SessionStatus::Finished);
        assert_eq!(session.stopped_at(), Some(at(30)));

        let untouched = index.get(running).expect("session should exist");
        assert_eq!(untouched.status(), SessionStatus::InProgress);
    }

    #[test]
    fn stop_returns_none_for_unknown_id() {
        let mut index = SessionIndex::new();
        insert_at(&mut index, "A-1", at(0));

        assert!(index.stop(Uuid::new_v4(), at(1)).is_none());
    }

    #[test]
    fn restop_keeps_first_stop_time() {
        let mut index = SessionIndex::new();
        let id = insert_at(&mut index, "A-1", at(0));

        index.stop(id, at(10));
        let session = index.stop(id, at(20)).expect("session should exist");

        assert_eq!(session.stopped_at(), Some(at(10)));
    }

    #[test]
    fn range_is_half_open_on_start_time() {
        let mut index = SessionIndex::new();
        insert_at(&mut index, "before", at(-1));
        insert_at(&mut index, "lower-edge", at(0));
        insert_at(&mut index, "inside", at(30));
        insert_at(&mut index, "upper-edge", at(60));

        let mut stations: Vec<&str> = index
            .started_within(at(0), at(60))
            .map(|session| session.station_id())
            .collect();
        stations.sort_unstable();

        assert_eq!(stations, vec!["inside", "lower-edge"]);
    }

    #[test]
    fn inverted_range_is_empty() {
        let mut index = SessionIndex::new();
        insert_at(&mut index, "A-1", at(0));

        assert_eq!(index.started_within(at(10), at(-10)).count(), 0);
    }

    #[test]
    fn sessions_yields_every_entry() {
        let mut index = SessionIndex::new();
        for idx in 0..3 {
            insert_at(&mut index, &format!("A-{idx}"), at(idx));
        }

        assert_eq!(index.sessions().count(), 3);
        assert!(!index.is_empty());
    }
}
