use dotenv::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::sync::oneshot;

mod autoreply;
mod bot;
mod channels;
mod config;
mod db;
mod error;
mod models;

use bot::AutoReplyBot;
use channels::console::{self, ConsoleClient};
use channels::MessageDispatcher;
use config::{Config, SettingsHandle};
use db::Database;

const SETTINGS_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    if let Err(e) = run().await {
        log::error!("Auto-reply bot exited with error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> error::Result<()> {
    let config = Config::from_env()?;

    log::info!("Initializing database at {}", config.database_url);
    let db = Arc::new(Database::new(&config.database_url)?);

    log::info!("Loading settings from {:?}", config.settings_path);
    let settings = Arc::new(SettingsHandle::load(&config.settings_path)?);
    spawn_settings_watcher(settings.clone());
    spawn_reload_on_hangup(settings.clone());

    let client = Arc::new(ConsoleClient::new(
        &config.bot_user_id,
        config.direct_rooms_file.clone(),
    ));

    let bot = Arc::new(AutoReplyBot::init(config.bot_user_id.clone(), db, settings, client).await?);
    log::info!(
        "Auto-reply bot started for {} (management room {})",
        bot.owner(),
        bot.management_room()
    );

    let dispatcher = Arc::new(MessageDispatcher::new(bot.clone()));

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    let result = console::run_console(BufReader::new(tokio::io::stdin()), dispatcher, shutdown_rx).await;
    bot.shutdown();
    result
}

/// Poll the settings file's modification time on the blocking pool
fn spawn_settings_watcher(settings: Arc<SettingsHandle>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SETTINGS_POLL_INTERVAL);
        // The first tick completes immediately and the file was just loaded
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let settings = settings.clone();
            if let Err(e) = tokio::task::spawn_blocking(move || settings.refresh_if_changed()).await {
                log::error!("[settings] Watcher task failed: {}", e);
            }
        }
    });
}

/// SIGHUP forces a settings reload on top of the modification-time check
#[cfg(unix)]
fn spawn_reload_on_hangup(settings: Arc<SettingsHandle>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Could not install SIGHUP handler: {}", e);
            return;
        }
    };

    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            let settings = settings.clone();
            match tokio::task::spawn_blocking(move || settings.reload()).await {
                Ok(Err(e)) => log::error!("[settings] Reload on SIGHUP failed: {}", e),
                Err(e) => log::error!("[settings] Reload task failed: {}", e),
                Ok(Ok(_)) => {}
            }
        }
    });
}

#[cfg(not(unix))]
fn spawn_reload_on_hangup(_settings: Arc<SettingsHandle>) {}
