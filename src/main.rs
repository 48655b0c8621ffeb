mod app;
mod components;
mod config;
mod error;
mod event;
mod format;
mod handler;
mod logging;
mod nav;
mod remote;
#[cfg(test)]
mod test_support;
mod theme;
mod tui;
mod ui;

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{error, info};

use crate::app::App;
use crate::config::{AppConfig, GeneralConfig, LogConfig, RcloneConfig, ThemeConfig};
use crate::event::{Event, EventHandler};
use crate::nav::{BreadcrumbStack, ListingCache, NavigationEngine};
use crate::remote::rclone::{self, RcloneProvider};
use crate::remote::target::RemoteTarget;
use crate::tui::{install_panic_hook, Tui};

/// rclone explorer - An ncdu-like explorer for rclone storages.
#[derive(Parser, Debug)]
#[command(
    name = "rcx",
    version,
    about,
    after_help = "Examples:\n  rcx my_storage:\n  rcx my_storage:/backup/Media\n  rcx --max-items 20 my_storage:/docs"
)]
struct Cli {
    /// Remote storage and optional path (e.g. 'my_storage:' or 'my_storage:/backup/Media')
    target: RemoteTarget,

    /// Number of items shown per page
    #[arg(short = 'm', long = "max-items", visible_alias = "page-size")]
    max_items: Option<NonZeroUsize>,

    /// Explicit config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Color scheme: dark, light or custom
    #[arg(long)]
    theme: Option<String>,

    /// rclone executable to run
    #[arg(long)]
    rclone: Option<String>,

    /// Seconds before a directory listing is abandoned
    #[arg(long)]
    timeout: Option<u64>,

    /// Write the log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Config values given on the command line.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                page_size: self.max_items,
            },
            rclone: RcloneConfig {
                binary: self.rclone.clone(),
                timeout_secs: self.timeout,
                ..Default::default()
            },
            log: LogConfig {
                file: self.log_file.clone(),
                level: None,
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                custom: None,
            },
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> error::Result<()> {
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));
    logging::init(&config);
    info!("rcx starting: target {}", cli.target);

    rclone::check_available(config.rclone_binary()).await?;

    let provider = RcloneProvider::new(
        config.rclone_binary(),
        cli.target.remote.as_str(),
        config.timeout(),
        config.listing_order(),
    );
    let breadcrumbs = BreadcrumbStack::new(cli.target.remote.as_str(), cli.target.path.as_str());
    let engine =
        NavigationEngine::start(ListingCache::new(provider), breadcrumbs, config.page_size())
            .await?;

    install_panic_hook();

    let theme = theme::resolve_theme(&config.theme);
    let mut app = App::new(engine, theme);
    let mut tui = Tui::new()?;
    let mut events = EventHandler::new(Duration::from_millis(250));

    let result = event_loop(&mut tui, &mut app, &mut events).await;
    tui.restore()?;
    info!("rcx exiting");
    result
}

async fn event_loop(
    tui: &mut Tui,
    app: &mut App<RcloneProvider>,
    events: &mut EventHandler,
) -> error::Result<()> {
    while !app.should_quit {
        tui.terminal_mut().draw(|frame| ui::render(app, frame))?;

        match events.next().await? {
            Event::Key(key) => {
                let Some(nav_event) = handler::map_key(key) else {
                    continue;
                };
                if app.engine.needs_fetch(nav_event) {
                    app.loading = true;
                    tui.terminal_mut().draw(|frame| ui::render(app, frame))?;
                }
                app.dispatch(nav_event, handler::next_interrupt(events)).await;
                app.loading = false;
            }
            Event::Tick => {}
            Event::Resize(_, _) => {}
        }
    }
    Ok(())
}
