//! Terminal UI for Ecoleta that lets users register waste collection points.

mod app;
mod cli;
mod input;
mod logging;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ecoleta_core::{
    backends::Backends, driver::LoaderDriver, form::PointForm, service::EcoletaService,
};
use ecoleta_provider_api as api;
use ecoleta_provider_ibge as ibge;
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tracing::{info, warn};

use crate::app::{App, StatusMessage};
use crate::cli::Cli;
use crate::input::Action;
use crate::logging::{LogConfig, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        log_file: cli.log_file.clone(),
    })
    .context("failed to open log file")?;

    // HTTP + service setup
    let client = Client::builder()
        .user_agent("ecoleta/0.1")
        .timeout(cli.request_timeout())
        .build()?;

    let (catalog, points) = api::plugin(client.clone(), &cli.api_url);
    let geo = ibge::plugin(client, &cli.geo_url);
    let service = Arc::new(EcoletaService::new(Backends::new(catalog, geo, points)));
    info!(api_url = %cli.api_url, geo_url = %cli.geo_url, "starting ecoleta");

    // App state; startup loads run while the terminal is set up
    let mut driver = LoaderDriver::new(service);
    driver.start();
    let app = App::new(driver);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Fold in finished loads, then draw
        app.sync_loads();
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout so loads show up promptly)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::ReloadFailed => {
                    app.status = None;
                    app.driver.reload_failed();
                }
                Action::Submit => {
                    if app.is_submitting {
                        continue;
                    }

                    app.is_submitting = true;
                    app.status = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let service = Arc::clone(app.driver.service());
                    let selection = app.driver.loader().confirmed_selection();
                    let res = service.register(&app.form, &selection).await;

                    app.is_submitting = false;
                    match res {
                        Ok(id) => {
                            app.form = PointForm::default();
                            app.status = Some(StatusMessage::Info(format!(
                                "Collection point #{id} registered"
                            )));
                        }
                        Err(err) => {
                            warn!(error = %err, "registration failed");
                            app.status =
                                Some(StatusMessage::Error(format!("Registration failed: {err}")));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
