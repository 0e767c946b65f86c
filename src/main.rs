use clap::Parser;

mod app;
mod auth;
mod body_records;
mod cli;
mod clock;
mod columns;
mod config;
mod db;
mod diary;
mod error;
mod exercise_records;
mod pagination;
mod rpc;
mod seed;
mod state;
#[cfg(test)]
mod testing;
mod validation;
mod wire;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    init_tracing();

    if let Err(e) = cli::run(cli).await {
        tracing::error!(error = ?e, "fatal");
        return Err(e);
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "healthlog=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}
