use std::io;

use chrono::{DateTime, Utc};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::{debug, info};

use crate::AppState;
use crate::advice::AdviceFetcher;
use crate::error::AppError;
use crate::models::ScheduleId;
use crate::notifier::{NotificationBackend, schedule_reminder};
use crate::reminder::ReminderZone;
use crate::screens;
use crate::store::{AddOutcome, LoadState};
use crate::validation::{AddScheduleForm, is_confirmed, parse_home_location};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Add,
    Done(ScheduleId),
    Delete(ScheduleId),
    Home(String),
    Remind,
    Tip,
    Help,
    Quit,
}

impl Command {
    /// Parses one input line; blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, AppError> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        let command = match name.to_ascii_lowercase().as_str() {
            "" => return Ok(None),
            "list" | "ls" => Command::List,
            "add" => Command::Add,
            "done" => Command::Done(parse_id(rest)?),
            "delete" | "rm" => Command::Delete(parse_id(rest)?),
            "home" => Command::Home(rest.to_string()),
            "remind" => Command::Remind,
            "tip" => Command::Tip,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(AppError::Validation(format!(
                    "Unknown command `{other}`, type `help` for the list"
                )));
            }
        };
        Ok(Some(command))
    }
}

fn parse_id(text: &str) -> Result<ScheduleId, AppError> {
    text.parse()
        .map_err(|_| AppError::Validation(format!("`{text}` is not a schedule id")))
}

/// Line-oriented console used by the screens.
pub struct Console<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: input.lines(),
            out,
        }
    }

    pub async fn print(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await
    }

    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        self.lines.next_line().await
    }

    pub async fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        self.print(&format!("{label}: ")).await?;
        self.read_line().await
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

pub struct App<N> {
    pub state: AppState,
    notifier: N,
    advice: AdviceFetcher,
    zone: ReminderZone,
}

impl<N: NotificationBackend> App<N> {
    pub fn new(state: AppState, notifier: N, advice: AdviceFetcher, zone: ReminderZone) -> Self {
        Self {
            state,
            notifier,
            advice,
            zone,
        }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Initial schedule load and tip fetch; they touch disjoint state.
    pub async fn start(&mut self) -> LoadState {
        let (load_state, tip) =
            futures::join!(self.state.store.load(), self.advice.fetch());
        self.state.tip = tip;
        load_state
    }

    /// Validates the form, schedules its reminder and only then stores it.
    pub async fn add_schedule(
        &mut self,
        form: &AddScheduleForm,
        now: DateTime<Utc>,
    ) -> Result<AddOutcome, AppError> {
        let new = form.validate()?;
        let delay = self.zone.resolve(&new.date, &new.time, now)?;
        schedule_reminder(&self.notifier, delay, &new.subject, &new.time).await?;
        Ok(self.state.store.add(new).await)
    }

    pub async fn run_loop<R, W>(&mut self, console: &mut Console<R, W>) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        console.print(&screens::list_screen(&self.state)).await?;
        loop {
            console.print("> ").await?;
            let Some(line) = console.read_line().await? else {
                break;
            };
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    let (title, body) = err.user_message();
                    console.print(&screens::alert(title, &body)).await?;
                    continue;
                }
            };
            debug!(?command, "dispatching command");
            if command == Command::Quit {
                break;
            }
            self.dispatch(command, console).await?;
        }
        info!("leaving command loop");
        Ok(())
    }

    async fn dispatch<R, W>(&mut self, command: Command, console: &mut Console<R, W>) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        match command {
            Command::List => console.print(&screens::list_screen(&self.state)).await,
            Command::Add => self.add_screen(console).await,
            Command::Done(id) => self.mark_done(id, console).await,
            Command::Delete(id) => self.delete(id, console).await,
            Command::Home(input) => match parse_home_location(&input) {
                Ok(location) => {
                    self.state.home_location = Some(location);
                    console
                        .print(&screens::alert("Saved", "Home location has been saved."))
                        .await
                }
                Err(err) => {
                    let (title, body) = err.user_message();
                    console.print(&screens::alert(title, &body)).await
                }
            },
            Command::Remind => {
                let preview = screens::reminder_preview(self.state.store.schedules());
                console.print(&screens::alert("Reminder", &preview)).await
            }
            Command::Tip => {
                self.state.tip = self.advice.fetch().await;
                let text = match &self.state.tip {
                    Some(tip) => format!("Tip: {tip}\n"),
                    None => "No tip available right now.\n".to_string(),
                };
                console.print(&text).await
            }
            Command::Help => console.print(screens::HELP).await,
            Command::Quit => Ok(()),
        }
    }

    async fn add_screen<R, W>(&mut self, console: &mut Console<R, W>) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut form = AddScheduleForm::default();
        for (label, field) in [
            ("Subject / topic", &mut form.subject),
            ("Date (YYYY-MM-DD)", &mut form.date),
            ("Time (HH:MM, 24h)", &mut form.time),
            ("Note (optional)", &mut form.note),
        ] {
            let Some(value) = console.prompt(label).await? else {
                return Ok(());
            };
            *field = value;
        }
        match self.add_schedule(&form, Utc::now()).await {
            Ok(outcome) => {
                let schedule = outcome.schedule();
                console
                    .print(&screens::alert(
                        "Saved",
                        &format!(
                            "Schedule [{}] {} saved and reminder set.",
                            schedule.id, schedule.subject
                        ),
                    ))
                    .await
            }
            Err(err) => {
                let (title, body) = err.user_message();
                console.print(&screens::alert(title, &body)).await
            }
        }
    }

    async fn mark_done<R, W>(&mut self, id: ScheduleId, console: &mut Console<R, W>) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        match self.state.store.get(id) {
            None => {
                return console
                    .print(&screens::alert("Error", &format!("No schedule with id {id}.")))
                    .await;
            }
            Some(schedule) if schedule.is_done() => {
                return console
                    .print(&screens::alert("Done", "That schedule is already done."))
                    .await;
            }
            Some(_) => {}
        }
        self.state.store.mark_done(id).await;
        console.print(&screens::list_screen(&self.state)).await
    }

    async fn delete<R, W>(&mut self, id: ScheduleId, console: &mut Console<R, W>) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let Some(subject) = self.state.store.get(id).map(|s| s.subject.clone()) else {
            return console
                .print(&screens::alert("Error", &format!("No schedule with id {id}.")))
                .await;
        };
        let answer = console
            .prompt(&format!("Delete \"{subject}\"? [y/N]"))
            .await?
            .unwrap_or_default();
        if !is_confirmed(&answer) {
            return console.print("Cancelled.\n").await;
        }
        self.state.store.delete(id).await;
        console.print(&screens::list_screen(&self.state)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("  ").unwrap(), None);
        assert_eq!(Command::parse("list").unwrap(), Some(Command::List));
        assert_eq!(Command::parse("DONE 12").unwrap(), Some(Command::Done(12)));
        assert_eq!(Command::parse("rm 3").unwrap(), Some(Command::Delete(3)));
        assert_eq!(
            Command::parse("home -2.9 104.7").unwrap(),
            Some(Command::Home("-2.9 104.7".to_string()))
        );
        assert_eq!(Command::parse("home").unwrap(), Some(Command::Home(String::new())));
        assert_eq!(Command::parse("quit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Command::parse("done").is_err());
        assert!(Command::parse("delete abc").is_err());
        assert!(Command::parse("fly").is_err());
    }

    #[tokio::test]
    async fn test_console_prompt() {
        let input: &[u8] = b"Math\n";
        let mut console = Console::new(input, Vec::new());
        assert_eq!(console.prompt("Subject").await.unwrap().as_deref(), Some("Math"));
        assert_eq!(console.read_line().await.unwrap(), None);
        assert_eq!(console.into_output(), b"Subject: ".to_vec());
    }
}
