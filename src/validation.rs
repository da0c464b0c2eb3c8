use crate::error::AppError;
use crate::models::{HomeLocation, NewSchedule};

/// Placeholder home coordinate used when no coordinates are entered.
pub const DEFAULT_HOME: HomeLocation = HomeLocation {
    lat: -2.9761,
    lng: 104.7754,
};

#[derive(Debug, Clone, Default)]
pub struct AddScheduleForm {
    pub subject: String,
    pub date: String,
    pub time: String,
    pub note: String,
}

impl AddScheduleForm {
    pub fn validate(&self) -> Result<NewSchedule, AppError> {
        let subject = self.subject.trim();
        let date = self.date.trim();
        let time = self.time.trim();
        if subject.is_empty() || date.is_empty() || time.is_empty() {
            return Err(AppError::Validation(
                "Subject, date, and time are required.".into(),
            ));
        }
        let note = self.note.trim();
        Ok(NewSchedule {
            subject: subject.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            note: (!note.is_empty()).then(|| note.to_string()),
        })
    }
}

pub fn parse_home_location(input: &str) -> Result<HomeLocation, AppError> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    match parts.as_slice() {
        [] => Ok(DEFAULT_HOME),
        [lat, lng] => {
            let lat: f64 = lat
                .parse()
                .map_err(|_| AppError::Validation("Latitude must be a number".into()))?;
            let lng: f64 = lng
                .parse()
                .map_err(|_| AppError::Validation("Longitude must be a number".into()))?;
            if !(-90.0..=90.0).contains(&lat) {
                return Err(AppError::Validation(
                    "Latitude must be between -90 and 90".into(),
                ));
            }
            if !(-180.0..=180.0).contains(&lng) {
                return Err(AppError::Validation(
                    "Longitude must be between -180 and 180".into(),
                ));
            }
            Ok(HomeLocation { lat, lng })
        }
        _ => Err(AppError::Validation(
            "Enter the location as: <lat> <lng>".into(),
        )),
    }
}

pub fn is_confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
