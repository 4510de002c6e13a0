use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use spdlog::prelude::*;

use crate::config::Config;
use crate::error::AllowlistError;
use crate::page::Page;

mod allowlist;
mod config;
mod error;
mod page;
mod storage;

async fn run(config: &Config) -> Result<usize> {
    let client = page::client(config.timeout)?;
    let page = Page::fetch(&client, config.source.clone()).await?;
    debug!("page: {}", serde_json::to_string(&page)?);

    let allowlist = allowlist::extract(&page)?;
    storage::write(&config.output, &allowlist.render())?;
    Ok(allowlist.len())
}

// Env levels only reach loggers built after `init_env_level`, and the
// default logger is built on first access.
fn init_logging() -> Arc<Logger> {
    let env_applied = matches!(spdlog::init_env_level(), Ok(true));
    let default_logger: Arc<Logger> = spdlog::default_logger();
    if !env_applied {
        default_logger.set_level_filter(LevelFilter::MoreSevereEqual(spdlog::Level::Info));
    }
    default_logger
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let config = Config::default();
    match run(&config).await {
        Ok(count) => {
            info!(
                "{} URLs written to {}",
                count,
                config.output.to_string_lossy()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            let kind = err
                .downcast_ref::<AllowlistError>()
                .map_or("internal", AllowlistError::kind);
            error!(
                "{} error, {} left unchanged: {:#}",
                kind,
                config.output.to_string_lossy(),
                err
            );
            ExitCode::FAILURE
        }
    }
}
