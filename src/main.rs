use log::{info, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::Config as LogConfig;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use tokio::sync::watch;

use crate::config::{Config, RETRY_PERIOD};
use crate::error::TokenError;
use crate::practicum::api::PracticumInterface;
use crate::telegram::BotClient;
use crate::watcher::{poll_worker, Watcher};

mod config;
mod error;
mod practicum;
mod telegram;
mod watcher;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} [{l}] {m}{n}";
const LOG_FILE: &str = "homework-watch.log";

fn init_logging() {
    let console = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(LOG_FILE)
        .unwrap();

    let logconfig = LogConfig::builder()
        .appender(Appender::builder().build("console", Box::new(console)))
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .build(
            Root::builder()
                .appender("console")
                .appender("logfile")
                .build(LevelFilter::Debug),
        )
        .unwrap();

    log4rs::init_config(logconfig).unwrap();
}

#[tokio::main]
async fn main() -> Result<(), TokenError> {
    init_logging();

    let config = Config::from_env()?;
    info!(
        "Watching {} every {:?}, cursor starts from {:?}",
        practicum::ENDPOINT,
        RETRY_PERIOD,
        config.start_from
    );

    let api = PracticumInterface::new(&config);
    let bot = BotClient::new(&config.telegram_token, config.chat_id.clone());
    let watcher = Watcher::new(config.start_from.initial_cursor());

    // Flip the stop channel on Ctrl-C so the worker can leave its sleep.
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = stop_tx.send(true);
        }
    });

    poll_worker(watcher, &api, &bot, RETRY_PERIOD, stop_rx).await;
    info!("Poll worker stopped, exiting");
    Ok(())
}
