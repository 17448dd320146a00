mod advisor;
mod alerts;
mod app_context;
mod commands;
mod config;
mod jobs;
mod monitor;
mod notify;
mod remote;
mod sampler;
mod subscribers;

use clap::Parser;
use teloxide::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::app_context::AppContext;
use crate::commands::{answer, MyCommands};
use crate::config::{load_config, load_fleet};
use crate::jobs::start_background_jobs;
use crate::monitor::MonitorRuntime;
use crate::subscribers::SubscriberStore;

#[derive(Parser)]
#[command(name = "fleetwatch", version, about = "The watchful fleet monitor")]
struct Cli {
    /// Run a single monitoring pass and exit (cron mode).
    #[arg(short, long)]
    check: bool,
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,
}

fn init_json_logging() {
    if let Err(error) = tracing_log::LogTracer::init() {
        eprintln!(
            "logging bridge initialization failed (continuing with existing logger): {}",
            error
        );
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .finish();

    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("global logger initialization failed: {}", error);
    }
}

#[tokio::main]
async fn main() {
    init_json_logging();

    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(error) => {
            log::error!("Configuration error: {}", error);
            std::process::exit(1);
        }
    };

    let fleet = match load_fleet(&config.servers_path) {
        Ok(fleet) => fleet,
        Err(error) => {
            log::error!("Fleet configuration error: {}", error);
            std::process::exit(1);
        }
    };
    if fleet.is_empty() {
        log::warn!("fleet_empty hint=add_servers_to_{}", config.servers_path);
    }

    let bot = if config.telegram.enabled {
        Some(Bot::new(&config.telegram.bot_token))
    } else {
        None
    };

    if cli.check {
        let subscribers = SubscriberStore::load(&config.telegram.subscribers_path);
        let mut runtime = MonitorRuntime::new(config, fleet, bot, subscribers);
        if let Err(error) = runtime.run_once().await {
            log::error!("monitor_pass_failed error={}", error);
            std::process::exit(1);
        }
        return;
    }

    log::info!("Fleetwatch is starting...");
    let app_context = AppContext::new(config, fleet);
    start_background_jobs(app_context.clone(), bot.clone());

    match bot {
        Some(bot) => {
            MyCommands::repl(bot, move |bot, msg, cmd| {
                let app_context = app_context.clone();
                async move { answer(bot, msg, cmd, &app_context).await }
            })
            .await;
        }
        None => {
            // No chat loop to run; park until interrupted.
            if let Err(error) = tokio::signal::ctrl_c().await {
                log::error!("signal wait failed: {}", error);
            }
            log::info!("Fleetwatch shutting down");
        }
    }
}
