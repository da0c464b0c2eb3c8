use chrono::Utc;
use tracing::{debug, info, warn};

use crate::client::RemoteScheduleClient;
use crate::models::{NewSchedule, Schedule, ScheduleId, ScheduleStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// The server accepted the record and assigned its id.
    Remote(Schedule),
    /// The server call failed; the record exists only in this session.
    LocalFallback(Schedule),
}

impl AddOutcome {
    pub fn schedule(&self) -> &Schedule {
        match self {
            AddOutcome::Remote(s) | AddOutcome::LocalFallback(s) => s,
        }
    }
}

/// Whether the server acknowledged a mutation that was already applied locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Confirmed,
    LocalOnly,
}

/// In-memory mirror of the remote schedule collection.
///
/// Mark-done and delete are applied locally before the server is told and are
/// never rolled back, so the mirror may drift from the server for the rest of
/// the session.
pub struct ScheduleStore {
    client: RemoteScheduleClient,
    schedules: Vec<Schedule>,
    load_state: LoadState,
}

impl ScheduleStore {
    pub fn new(client: RemoteScheduleClient) -> Self {
        Self {
            client,
            schedules: Vec::new(),
            load_state: LoadState::NotLoaded,
        }
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    pub fn get(&self, id: ScheduleId) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.id == id)
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// Replaces the local collection with the server's. No retry on failure.
    pub async fn load(&mut self) -> LoadState {
        self.load_state = match self.client.list().await {
            Ok(schedules) => {
                info!(count = schedules.len(), "loaded schedules from server");
                self.schedules = schedules;
                LoadState::Loaded
            }
            Err(err) => {
                warn!(error = %err, "failed to load schedules from server");
                self.schedules.clear();
                LoadState::Failed
            }
        };
        self.load_state
    }

    pub async fn add(&mut self, new: NewSchedule) -> AddOutcome {
        match self.client.create(&new).await {
            Ok(created) => {
                info!(id = created.id, "schedule created on server");
                self.schedules.push(created.clone());
                AddOutcome::Remote(created)
            }
            Err(err) => {
                let id = self.local_id_at(Utc::now().timestamp_millis());
                warn!(error = %err, id, "failed to create schedule on server, keeping it locally");
                let local = new.into_local(id);
                self.schedules.push(local.clone());
                AddOutcome::LocalFallback(local)
            }
        }
    }

    pub async fn mark_done(&mut self, id: ScheduleId) -> SyncOutcome {
        match self.schedules.iter_mut().find(|s| s.id == id) {
            Some(schedule) => schedule.mark_done(),
            None => debug!(id, "mark done for schedule missing locally"),
        }
        match self.client.update_status(id, ScheduleStatus::Done).await {
            Ok(()) => SyncOutcome::Confirmed,
            Err(err) => {
                warn!(error = %err, id, "failed to update schedule status on server");
                SyncOutcome::LocalOnly
            }
        }
    }

    pub async fn delete(&mut self, id: ScheduleId) -> SyncOutcome {
        self.schedules.retain(|s| s.id != id);
        match self.client.delete(id).await {
            Ok(()) => SyncOutcome::Confirmed,
            Err(err) => {
                warn!(error = %err, id, "failed to delete schedule on server");
                SyncOutcome::LocalOnly
            }
        }
    }

    fn local_id_at(&self, now_ms: i64) -> ScheduleId {
        let mut id = now_ms;
        while self.schedules.iter().any(|s| s.id == id) {
            id += 1;
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;

    fn offline_store() -> ScheduleStore {
        // Port 1 refuses connections, so every remote call fails fast.
        ScheduleStore::new(RemoteScheduleClient::new(
            Url::parse("http://127.0.0.1:1").unwrap(),
        ))
    }

    fn new_schedule(subject: &str) -> NewSchedule {
        NewSchedule {
            subject: subject.to_string(),
            date: "2030-05-01".to_string(),
            time: "10:00".to_string(),
            note: None,
        }
    }

    #[tokio::test]
    async fn test_offline_adds_get_distinct_ids() {
        let mut store = offline_store();
        let first = store.add(new_schedule("History")).await;
        let second = store.add(new_schedule("Geography")).await;
        assert!(matches!(first, AddOutcome::LocalFallback(_)));
        assert!(matches!(second, AddOutcome::LocalFallback(_)));
        assert_ne!(first.schedule().id, second.schedule().id);
        assert_eq!(store.schedules().len(), 2);
        assert_eq!(store.schedules()[0].subject, "History");
    }

    #[tokio::test]
    async fn test_offline_mark_done_then_delete() {
        let mut store = offline_store();
        let id = store.add(new_schedule("History")).await.schedule().id;
        assert_eq!(store.mark_done(id).await, SyncOutcome::LocalOnly);
        assert!(store.get(id).unwrap().is_done());
        assert_eq!(store.delete(id).await, SyncOutcome::LocalOnly);
        assert!(store.schedules().is_empty());
    }

    #[test]
    fn test_local_id_skips_taken_ids() {
        let mut store = offline_store();
        let now_ms = 1_735_689_600_000;
        store.schedules.push(new_schedule("History").into_local(now_ms));
        store.schedules.push(new_schedule("Geography").into_local(now_ms + 1));
        assert_eq!(store.local_id_at(now_ms), now_ms + 2);
        assert_eq!(store.local_id_at(now_ms - 5), now_ms - 5);
    }

    #[tokio::test]
    async fn test_offline_load_fails() {
        let mut store = offline_store();
        assert_eq!(store.load_state(), LoadState::NotLoaded);
        assert_eq!(store.load().await, LoadState::Failed);
        assert!(store.schedules().is_empty());
    }
}
