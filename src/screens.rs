use std::fmt::Write;

use crate::AppState;
use crate::models::{HomeLocation, Schedule};
use crate::store::LoadState;

pub fn home_card(location: Option<&HomeLocation>) -> String {
    match location {
        Some(loc) => format!(
            "Home location saved ✅\n  Lat: {:.4} | Lng: {:.4}\n",
            loc.lat, loc.lng
        ),
        None => "Home location not set. Use `home` to set it.\n".to_string(),
    }
}

fn schedule_row(schedule: &Schedule) -> String {
    let status = if schedule.is_done() { "Done" } else { "Pending" };
    let mut row = format!(
        "[{}] {}  {} • {}  ({status})\n",
        schedule.id, schedule.subject, schedule.date, schedule.time
    );
    if let Some(note) = schedule.note.as_deref().filter(|n| !n.is_empty()) {
        let _ = writeln!(row, "      {note}");
    }
    row
}

/// Renders the main list screen.
pub fn list_screen(state: &AppState) -> String {
    let mut out = String::new();
    out.push_str("== Home location ==\n");
    out.push_str(&home_card(state.home_location.as_ref()));
    if let Some(tip) = &state.tip {
        let _ = writeln!(out, "\nTip: {tip}");
    }
    out.push_str("\n== Study schedule ==\n");
    if state.store.load_state() == LoadState::Failed {
        out.push_str("(could not load schedules from server)\n");
    }
    let schedules = state.store.schedules();
    if schedules.is_empty() {
        out.push_str("No study schedules yet. Use `add` to create one.\n");
    }
    for schedule in schedules {
        out.push_str(&schedule_row(schedule));
    }
    out
}

/// The "check reminder" message for the current collection.
pub fn reminder_preview(schedules: &[Schedule]) -> String {
    if schedules.is_empty() {
        return "No study schedules yet.".to_string();
    }
    match schedules.iter().find(|s| !s.is_done()) {
        Some(next) => format!("Don't forget to study: {} at {}", next.subject, next.time),
        None => "All schedules are done ✅".to_string(),
    }
}

pub fn alert(title: &str, body: &str) -> String {
    format!("[{title}] {body}\n")
}

pub const HELP: &str = "\
Commands:
  list               show home location and schedules
  add                add a schedule and set its reminder
  done <id>          mark a schedule as done
  delete <id>        delete a schedule
  home [lat lng]     set the home location
  remind             show the next pending schedule
  tip                fetch a study tip
  help               show this help
  quit               exit
";
