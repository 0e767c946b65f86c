use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{Parser, Subcommand};

use crate::{
    app,
    auth::jwt::JwtKeys,
    config::{AppConfig, JwtConfig},
    db, seed,
    state::AppState,
};

#[derive(Parser)]
#[command(name = "healthlog")]
#[command(about = "Personal health log API server")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Load environment variables from this file instead of ./.env")]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run migrations and serve the RPC API (default)")]
    Serve,

    #[command(about = "Run migrations and insert sample columns")]
    Seed,

    #[command(about = "Print a signed HS256 token for local testing")]
    IssueToken {
        #[arg(long, help = "Value for the `sub` claim")]
        subject: String,
        #[arg(long, default_value_t = 60, help = "Token lifetime in minutes")]
        ttl_minutes: u64,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = Arc::new(AppConfig::from_env()?);
            let pool = db::connect(&config).await?;
            db::migrate(&pool).await?;
            app::serve(AppState::from_pool(pool, config)).await
        }
        Commands::Seed => {
            let config = Arc::new(AppConfig::from_env()?);
            let pool = db::connect(&config).await?;
            db::migrate(&pool).await?;
            let state = AppState::from_pool(pool, config);
            let inserted = seed::sample_columns(state.columns.as_ref(), state.clock.now()).await?;
            tracing::info!(inserted, "seed complete");
            Ok(())
        }
        Commands::IssueToken {
            subject,
            ttl_minutes,
        } => {
            let keys = JwtKeys::from_config(&JwtConfig::from_env()?);
            let token = keys.sign(&subject, Duration::from_secs(ttl_minutes.saturating_mul(60)))?;
            println!("{token}");
            Ok(())
        }
    }
}
