//! CLI administration tool for linktrack.
//!
//! Manages links and inspects analytics directly against PostgreSQL,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a link, optionally with a chosen alias
//! cargo run --bin admin -- link create https://example.com --alias go2
//!
//! # Show a link
//! cargo run --bin admin -- link show go2
//!
//! # Retire a link (the alias stays reserved)
//! cargo run --bin admin -- link retire go2
//!
//! # Click summary
//! cargo run --bin admin -- analytics go2
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` (or `DB_*`) is required, `REDIS_URL`
//! is used to drop cached redirects of retired links.

use linktrack::application::services::{AliasPolicy, AnalyticsService, LinkService};
use linktrack::config::{self, Config, StoreBackend};
use linktrack::infrastructure::cache::{CacheService, RedisCache};
use linktrack::infrastructure::persistence::{PgClickRepository, PgLinkRepository};
use linktrack::server::connect_pool;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linktrack.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show the click summary of a link
    Analytics {
        /// Alias of the link
        alias: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Create a short link
    Create {
        /// Target URL
        url: String,

        /// Alias to claim (generated if omitted)
        #[arg(short, long)]
        alias: Option<String>,
    },

    /// Show a link
    Show { alias: String },

    /// Retire a link; its alias is never reissued
    Retire {
        alias: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and row counts
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    if config.store_backend != StoreBackend::Postgres {
        anyhow::bail!("The admin tool works against PostgreSQL only (STORE_BACKEND=postgres)");
    }

    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &config, pool).await?,
        Commands::Analytics { alias } => show_analytics(&config, pool, &alias).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn link_service(config: &Config, pool: Arc<PgPool>) -> LinkService<PgLinkRepository> {
    let policy = AliasPolicy {
        length: config.alias_length,
        max_attempts: config.alias_max_attempts,
    };

    LinkService::new(
        Arc::new(PgLinkRepository::new(pool)),
        policy,
        config.store_timeout(),
    )
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, config: &Config, pool: PgPool) -> Result<()> {
    let service = link_service(config, Arc::new(pool));

    match action {
        LinkAction::Create { url, alias } => {
            println!("{}", "🔗 Create Link".bright_blue().bold());
            println!();

            let link = service.create_link(url, alias).await?;

            println!("  Alias:   {}", link.alias.bright_yellow().bold());
            println!("  URL:     {}", link.url.cyan());
            println!("  ID:      {}", link.id.to_string().bright_black());
            println!(
                "  Created: {}",
                link.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_black()
            );
            println!();
            println!("{}", "✅ Link created".green().bold());
        }
        LinkAction::Show { alias } => {
            let link = service.resolve(&alias).await?;

            println!("  Alias:   {}", link.alias.bright_yellow().bold());
            println!("  URL:     {}", link.url.cyan());
            println!("  ID:      {}", link.id.to_string().bright_black());
            println!(
                "  Created: {}",
                link.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_black()
            );
        }
        LinkAction::Retire { alias, yes } => {
            println!("{}", "🗑  Retire Link".bright_blue().bold());
            println!();

            let link = service.resolve(&alias).await?;
            println!("  Alias: {}", link.alias.bright_yellow());
            println!("  URL:   {}", link.url.cyan());
            println!();
            println!(
                "{}",
                "The alias stays reserved and can never be reused.".yellow()
            );

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Retire this link?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            service.retire(&alias).await?;
            invalidate_cached_redirect(config, &alias).await;

            println!();
            println!("{}", "✅ Link retired".green().bold());
        }
    }

    Ok(())
}

/// Drops the cached redirect so the retirement takes effect immediately.
async fn invalidate_cached_redirect(config: &Config, alias: &str) {
    let Some(redis_url) = &config.redis_url else {
        return;
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(cache) => {
            if let Err(e) = cache.invalidate(alias).await {
                eprintln!("{} {}", "⚠️  Cache invalidation failed:".yellow(), e);
            }
        }
        Err(e) => {
            eprintln!(
                "{} {}",
                "⚠️  Redis unreachable, cached redirect expires with its TTL:".yellow(),
                e
            );
        }
    }
}

/// Prints the click summary of a link.
///
/// # Output Format
///
/// ```text
/// 📊 Analytics for go2
///
///   Total clicks: 2
///
///   By day (UTC)
///   2024-05-01   1
///   2024-05-02   1
///
///   By user agent
///        2  curl/8.0
/// ```
async fn show_analytics(config: &Config, pool: PgPool, alias: &str) -> Result<()> {
    let pool = Arc::new(pool);
    let service = AnalyticsService::new(
        Arc::new(PgLinkRepository::new(pool.clone())),
        Arc::new(PgClickRepository::new(pool)),
        config.store_timeout(),
    );

    let summary = service.summarize(alias).await?;

    println!(
        "{} {}",
        "📊 Analytics for".bright_blue().bold(),
        summary.alias.bright_yellow().bold()
    );
    println!();
    println!(
        "  Total clicks: {}",
        summary.total_clicks.to_string().bright_green().bold()
    );

    if summary.total_clicks == 0 {
        println!();
        return Ok(());
    }

    let mut days: Vec<_> = summary.daily.into_iter().collect();
    days.sort();

    println!();
    println!("  {}", "By day (UTC)".bright_white().bold());
    for (day, count) in days {
        println!("  {}   {}", day, count.to_string().bright_green());
    }

    let mut agents: Vec<_> = summary.user_agent.into_iter().collect();
    agents.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    println!();
    println!("  {}", "By user agent".bright_white().bold());
    for (agent, count) in agents {
        let agent = if agent.is_empty() {
            "(none)".to_string()
        } else {
            agent
        };
        println!("  {:>6}  {}", count.to_string().bright_green(), agent.bright_black());
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;
            println!("{}", "✅ Database connection OK".green().bold());
            println!();

            let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE retired_at IS NULL")
                .fetch_one(pool)
                .await?;
            let retired: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE retired_at IS NOT NULL")
                    .fetch_one(pool)
                    .await?;
            let clicks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM click_events")
                .fetch_one(pool)
                .await?;

            println!("  Live links:    {}", links.to_string().bright_green().bold());
            println!("  Retired links: {}", retired.to_string().bright_black());
            println!("  Clicks:        {}", clicks.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}
