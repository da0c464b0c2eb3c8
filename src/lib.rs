pub mod advice;
pub mod app;
pub mod client;
pub mod error;
pub mod models;
pub mod notifier;
pub mod reminder;
pub mod screens;
pub mod settings;
pub mod store;
pub mod validation;

use tokio::io::BufReader;
use tracing::info;

use crate::advice::AdviceFetcher;
use crate::app::{App, Console};
use crate::client::RemoteScheduleClient;
use crate::models::HomeLocation;
use crate::notifier::TerminalNotifier;
use crate::settings::Settings;
use crate::store::ScheduleStore;

/// App-wide state, created empty at launch and owned by the running app.
pub struct AppState {
    pub store: ScheduleStore,
    pub home_location: Option<HomeLocation>,
    pub tip: Option<String>,
}

impl AppState {
    pub fn new(client: RemoteScheduleClient) -> Self {
        Self {
            store: ScheduleStore::new(client),
            home_location: None,
            tip: None,
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let zone = settings.reminder_zone()?;
    let state = AppState::new(RemoteScheduleClient::new(settings.api_base_url.clone()));
    let mut app = App::new(
        state,
        TerminalNotifier::new(settings.notifications_enabled),
        AdviceFetcher::new(settings.advice_url.clone()),
        zone,
    );

    info!("Starting FocusStudy against {}", settings.api_base_url);
    app.start().await;

    let mut console = Console::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    app.run_loop(&mut console).await?;
    Ok(())
}
