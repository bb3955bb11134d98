mod cli;
mod commands;
mod source;

use std::{
    fs::{self, OpenOptions},
    sync::Mutex,
};

use anyhow::Result;
use clap::{CommandFactory, Parser};
use gamehub_core::config::{self as settings, AppConfig};
use tracing_subscriber::{prelude::*, EnvFilter};

use cli::{AdminCommand, CacheCommand, Cli, Command};
use commands::{admin, cache, catalog, community, Context};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    if let Command::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "gamehub", &mut std::io::stdout());
        return Ok(());
    }

    settings::ensure_default_config()?;
    let mut config = AppConfig::load()?;
    if let Some(url) = cli.data_url {
        config.data_url = Some(url);
    }
    if let Some(dir) = cli.data_dir {
        config.data_url = None;
        config.data_dir = dir;
    }
    let ctx = Context::new(&config)?;

    match cli.command {
        Command::Games {
            category,
            platform,
            sort,
            q,
            limit,
            query,
        } => {
            let args = catalog::GamesArgs {
                category,
                platform,
                sort,
                q,
                limit,
                query,
            };
            catalog::games(&ctx, args).await?;
        }
        Command::Show { slug } => catalog::show(&ctx, &slug).await?,
        Command::Suggest { term } => catalog::suggest(&ctx, &term).await?,
        Command::Search => catalog::search(&ctx).await?,
        Command::Categories => catalog::categories(&ctx).await?,
        Command::Platforms => catalog::platforms(&ctx).await?,
        Command::Channels {
            category,
            popular,
            join,
        } => community::channels(&ctx, category, popular, join).await?,
        Command::Notifications { unread, kind } => {
            community::notifications(&ctx, unread, kind).await?
        }
        Command::Admin { command } => match command {
            AdminCommand::List {
                search,
                category,
                status,
                sort,
                page,
            } => {
                let args = admin::ListArgs {
                    search,
                    category,
                    status,
                    sort,
                    page,
                };
                admin::list(&ctx, args).await?;
            }
            AdminCommand::Stats => admin::stats(&ctx).await?,
            AdminCommand::Notify {
                kind,
                title,
                message,
                link,
            } => admin::notify(&ctx, kind, title, message, link).await?,
        },
        Command::Cache { command } => match command {
            CacheCommand::Status => cache::status(&ctx)?,
            CacheCommand::Clear => cache::clear(&ctx)?,
        },
        Command::Completions { .. } => {}
    }

    Ok(())
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("gamehub.log"))?;

    let env_filter = EnvFilter::from_default_env();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
