use chrono::{
    DateTime, Days, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Utc,
};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)-(\d+)-(\d+)$").expect("regex compiles"));
static TIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d*):(\d*)$").expect("regex compiles"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Use date format YYYY-MM-DD and time format HH:MM")]
    InvalidFormat,
    #[error("The chosen date and time have already passed")]
    PastTime,
}

/// Zone used to interpret the wall-clock date/time a user typed in.
#[derive(Debug, Clone, Copy, Default)]
pub enum ReminderZone {
    #[default]
    Local,
    Named(chrono_tz::Tz),
}

/// Parses `YYYY-MM-DD`, rolling months and days past their range into the
/// following ones (`2025-02-30` is March 2nd). Years below 100 count from 1900.
pub fn parse_date(text: &str) -> Result<NaiveDate, ResolveError> {
    let caps = DATE_RE
        .captures(text.trim())
        .ok_or(ResolveError::InvalidFormat)?;
    let year: i32 = caps[1].parse().map_err(|_| ResolveError::InvalidFormat)?;
    let month: u32 = caps[2].parse().map_err(|_| ResolveError::InvalidFormat)?;
    let day: u64 = caps[3].parse().map_err(|_| ResolveError::InvalidFormat)?;
    if year == 0 || month == 0 || day == 0 {
        return Err(ResolveError::InvalidFormat);
    }
    let year = if year < 100 { year + 1900 } else { year };
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.checked_add_months(Months::new(month - 1)))
        .and_then(|d| d.checked_add_days(Days::new(day - 1)))
        .ok_or(ResolveError::InvalidFormat)
}

/// Parses `HH:MM` into raw (hour, minute). An empty component counts as zero.
pub fn parse_time(text: &str) -> Result<(u32, u32), ResolveError> {
    let caps = TIME_RE
        .captures(text.trim())
        .ok_or(ResolveError::InvalidFormat)?;
    let component = |raw: &str| -> Result<u32, ResolveError> {
        if raw.is_empty() {
            return Ok(0);
        }
        raw.parse().map_err(|_| ResolveError::InvalidFormat)
    };
    Ok((component(&caps[1])?, component(&caps[2])?))
}

/// Wall-clock instant for a date and raw time; `24:00` and `10:60` roll over.
pub fn wall_clock(
    date: NaiveDate,
    (hour, minute): (u32, u32),
) -> Result<NaiveDateTime, ResolveError> {
    let offset = Duration::seconds(i64::from(hour) * 3600 + i64::from(minute) * 60);
    date.and_time(NaiveTime::MIN)
        .checked_add_signed(offset)
        .ok_or(ResolveError::InvalidFormat)
}

/// Whole seconds from `now` until `target`, rounded half up.
pub fn delay_seconds(target: DateTime<Utc>, now: DateTime<Utc>) -> Result<u64, ResolveError> {
    let diff_ms = (target - now).num_milliseconds();
    let seconds = (diff_ms + 500).div_euclid(1000);
    if seconds <= 0 {
        return Err(ResolveError::PastTime);
    }
    u64::try_from(seconds).map_err(|_| ResolveError::PastTime)
}

fn to_utc<Z: TimeZone>(zone: &Z, naive: NaiveDateTime) -> Result<DateTime<Utc>, ResolveError> {
    if let Some(dt) = zone.from_local_datetime(&naive).earliest() {
        return Ok(dt.with_timezone(&Utc));
    }
    // Skipped by a forward transition: apply the offset in force before it,
    // which moves the instant forward by the size of the gap.
    let before = naive
        .checked_sub_signed(Duration::days(1))
        .and_then(|earlier| zone.from_local_datetime(&earlier).earliest())
        .ok_or(ResolveError::InvalidFormat)?;
    let offset = before.offset().fix();
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(ResolveError::InvalidFormat)
}

impl ReminderZone {
    pub fn from_name(name: Option<&str>) -> Result<Self, String> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            None => Ok(ReminderZone::Local),
            Some(name) => name
                .parse::<chrono_tz::Tz>()
                .map(ReminderZone::Named)
                .map_err(|err| format!("unknown timezone {name}: {err}")),
        }
    }

    pub fn instant(&self, naive: NaiveDateTime) -> Result<DateTime<Utc>, ResolveError> {
        match self {
            ReminderZone::Local => to_utc(&Local, naive),
            ReminderZone::Named(tz) => to_utc(tz, naive),
        }
    }

    /// Resolves schedule date/time text into the delay before its reminder fires.
    pub fn resolve(
        &self,
        date: &str,
        time: &str,
        now: DateTime<Utc>,
    ) -> Result<u64, ResolveError> {
        let naive = wall_clock(parse_date(date)?, parse_time(time)?)?;
        let target = self.instant(naive)?;
        let delay = delay_seconds(target, now)?;
        tracing::debug!(%now, %target, delay, "resolved reminder delay");
        Ok(delay)
    }
}
