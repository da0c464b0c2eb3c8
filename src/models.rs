use serde::{Deserialize, Serialize};

pub type ScheduleId = i64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    #[default]
    Pending,
    Done,
}

/// A study session as stored by the remote schedule service.
///
/// `date` is `YYYY-MM-DD` text and `time` is 24-hour `HH:MM` text; both are kept
/// verbatim as entered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Schedule {
    pub id: ScheduleId,
    pub subject: String,
    pub date: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub status: ScheduleStatus,
}

impl Schedule {
    pub fn is_done(&self) -> bool {
        self.status == ScheduleStatus::Done
    }

    /// Moves the schedule to `done`. There is no way back to `pending`.
    pub fn mark_done(&mut self) {
        self.status = ScheduleStatus::Done;
    }
}

/// Request body for `POST /schedules`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSchedule {
    pub subject: String,
    pub date: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl NewSchedule {
    pub fn into_local(self, id: ScheduleId) -> Schedule {
        Schedule {
            id,
            subject: self.subject,
            date: self.date,
            time: self.time,
            note: self.note,
            status: ScheduleStatus::Pending,
        }
    }
}

/// Request body for `PATCH /schedules/{id}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StatusUpdate {
    pub status: ScheduleStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HomeLocation {
    pub lat: f64,
    pub lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_deserialize_without_note() {
        let raw = r#"{"id":7,"subject":"Algebra","date":"2025-01-02","time":"09:30","status":"pending"}"#;
        let schedule: Schedule = serde_json::from_str(raw).unwrap();
        assert_eq!(schedule.id, 7);
        assert_eq!(schedule.note, None);
        assert_eq!(schedule.status, ScheduleStatus::Pending);
    }

    #[test]
    fn test_new_schedule_omits_missing_note() {
        let body = NewSchedule {
            subject: "Algebra".to_string(),
            date: "2025-01-02".to_string(),
            time: "09:30".to_string(),
            note: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("note").is_none());
    }

    #[test]
    fn test_mark_done() {
        let mut schedule = NewSchedule {
            subject: "Physics".to_string(),
            date: "2025-01-02".to_string(),
            time: "09:30".to_string(),
            note: Some("chapter 3".to_string()),
        }
        .into_local(1);
        assert!(!schedule.is_done());
        schedule.mark_done();
        assert!(schedule.is_done());
        assert_eq!(
            serde_json::to_value(StatusUpdate { status: schedule.status }).unwrap(),
            serde_json::json!({"status": "done"})
        );
    }
}
