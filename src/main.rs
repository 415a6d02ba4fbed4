mod commands;
mod config;
mod error;
mod geometry;
mod linking;
mod storage;
mod survey;
mod validation;

use anyhow::Context;
use chrono::Local;
use log::{error, info};
use std::sync::Arc;

use crate::commands::{AppCommand, AppContext};
use crate::config::AppConfig;

fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    let ts = Local::now().format("%Y%m%d-%H%M%S").to_string();
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("creating log dir {}", config.log_dir.display()))?;
    let log_path = config.log_dir.join(format!("app-{}.log", ts));
    let log_file = std::fs::File::create(&log_path)
        .with_context(|| format!("creating log file {}", log_path.display()))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter_level(log::LevelFilter::Warn)
        .filter_module("cropsurvey", config.log_level)
        .filter_module("sqlx", log::LevelFilter::Error)
        .filter_module("sea_orm", log::LevelFilter::Error)
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // a missing .env is fine, the process environment is used as-is
    let _ = dotenv::dotenv();
    let config = AppConfig::from_env();
    init_logging(&config)?;

    let line = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let command = line
        .parse::<AppCommand>()
        .unwrap_or_else(|never| match never {});

    match &command {
        AppCommand::Help => {
            println!("{}", commands::USAGE);
            return Ok(());
        }
        AppCommand::Unknown(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        _ => {}
    }

    info!("connecting to {}", config.database_url);
    let db = storage::establish_connection(&config.database_url, config.db_max_connections)
        .await
        .context("database connection failed")?;
    let ctx = AppContext::new(Arc::new(db), &config);

    match ctx.execute(command).await {
        Ok(out) => {
            println!("{out}");
            Ok(())
        }
        Err(e) => {
            error!("{:#}", e);
            Err(e)
        }
    }
}
