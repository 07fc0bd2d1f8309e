//! `panel-watch`: follow live deployment events from the terminal.
//!
//! Reads configuration from the environment (see [`ClientConfig::from_env`]).
//! When no valid session is stored, logs in with `PANEL_EMAIL` and
//! `PANEL_PASSWORD`. Set `PANEL_PROJECT_ID` to follow a single project.

use std::process::ExitCode;
use std::sync::Arc;

use lib_utils::{format_time, get_env, get_env_parse};
use panel_client::config::LOGIN_ROUTE;
use panel_client::navigation::ChannelNavigator;
use panel_client::storage::FileStorage;
use panel_client::{App, ClientConfig, ClientError, Result};
use shared::StreamEvent;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    panel_client::debug::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "panel-watch failed");
            eprintln!("panel-watch: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = ClientConfig::load()?;
    let storage = Arc::new(FileStorage::open(&config.state_file)?);
    let (navigator, routes) = ChannelNavigator::new();
    let app = App::create(config, storage, Arc::new(navigator))?;

    sign_in(&app).await?;

    if let Some(project_id) = project_filter()? {
        app.stream.subscribe_to_project(project_id);
    }

    let events = app.stream.events();
    app.stream.connect();
    info!(filter = %app.stream.filter(), "Watching deployment events");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => print_event(&event),
                Err(_) => break,
            },
            route = routes.recv() => {
                if let Ok(route) = route {
                    if route == LOGIN_ROUTE {
                        warn!("Session ended, stopping");
                        eprintln!("panel-watch: session expired, log in again");
                        break;
                    }
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    app.dispose();
    Ok(())
}

async fn sign_in(app: &App) -> Result<()> {
    if app.auth.is_authenticated() {
        let user = app.auth.refresh_current_user().await?;
        info!(user_id = user.id, email = %user.email, "Resumed stored session");
        return Ok(());
    }

    let email = get_env("PANEL_EMAIL")?;
    let password = get_env("PANEL_PASSWORD")?;
    let session = app.auth.login(&email, &password).await?;
    if let Some(user) = session.user {
        info!(user_id = user.id, email = %user.email, "Logged in");
    }
    Ok(())
}

fn project_filter() -> Result<Option<i64>> {
    match get_env_parse::<i64>("PANEL_PROJECT_ID") {
        Ok(id) => Ok(Some(id)),
        Err(lib_utils::envs::Error::MissingEnv(_)) => Ok(None),
        Err(e) => Err(ClientError::from(e)),
    }
}

fn print_event(event: &StreamEvent) {
    match event {
        StreamEvent::DeploymentStatus(p) => match &p.error {
            Some(error) => println!(
                "[project {}] deployment {} -> {} ({error})",
                p.project_id, p.deployment_id, p.status
            ),
            None => println!(
                "[project {}] deployment {} -> {}",
                p.project_id, p.deployment_id, p.status
            ),
        },
        StreamEvent::BuildLog(p) => {
            let at = p
                .timestamp_utc()
                .map(format_time)
                .unwrap_or_else(|| p.timestamp.clone());
            println!(
                "[project {}] #{} {at} {:>5} {}",
                p.project_id, p.deployment_id, p.level, p.message
            );
        }
        StreamEvent::DeploymentStart(_) | StreamEvent::DeploymentEnd(_) => {
            println!(
                "[project {}] deployment {} {:?}",
                event.project_id().map_or_else(|| "?".to_string(), |id| id.to_string()),
                event.deployment_id().map_or_else(|| "?".to_string(), |id| id.to_string()),
                event.kind()
            );
        }
    }
}
