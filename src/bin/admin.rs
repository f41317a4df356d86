//! CLI administration tool for adlink-rotator.
//!
//! Provides commands for managing accounts and the domain pool, running a
//! rotation batch by hand, and database checks without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create the first administrator
//! cargo run --bin admin -- user create --username admin --admin
//!
//! # List accounts
//! cargo run --bin admin -- user list
//!
//! # Add a landing domain
//! cargo run --bin admin -- domain add lp1.example.com
//!
//! # Rotate all running links now
//! cargo run --bin admin -- rotate
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `rotate` additionally reads the full service configuration
//!   (`JWT_SECRET`, `REDIRECT_BASE_URL`, `ADS_MODE`, ...)

use adlink_rotator::application::services::{DomainService, RotationService, RotationSettings};
use adlink_rotator::config;
use adlink_rotator::domain::entities::{ADMIN_ROLE, NewUser, USER_ROLE};
use adlink_rotator::domain::repositories::UserRepository;
use adlink_rotator::infrastructure::ads::campaign_client_from_config;
use adlink_rotator::infrastructure::persistence::{
    PgAdLinkRepository, PgDomainRepository, PgRunLogRepository, PgUserRepository,
};
use adlink_rotator::utils::password::hash_password;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing adlink-rotator.
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
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage the landing domain pool
    Domain {
        #[command(subcommand)]
        action: DomainAction,
    },

    /// Run one rotation batch with the configured ads client
    Rotate,

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create an account
    Create {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Password (prompted if omitted; generated when combined with --yes)
        #[arg(short, long)]
        password: Option<String>,

        /// Grant the admin role in addition to the user role
        #[arg(long)]
        admin: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all accounts
    List,
}

#[derive(Subcommand)]
enum DomainAction {
    /// Add a domain to the pool
    Add {
        /// Bare hostname, e.g. lp1.example.com
        hostname: String,

        /// Referer URL to present for this domain
        #[arg(short, long)]
        referer: Option<String>,
    },

    /// List domains in selection order
    List {
        /// Include inactive domains
        #[arg(short, long)]
        all: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Domain { action } => handle_domain_action(action, &pool).await?,
        Commands::Rotate => handle_rotate(&pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::Create {
            username,
            email,
            password,
            admin,
            yes,
        } => create_user(&repo, username, email, password, admin, yes).await,
        UserAction::List => list_users(&repo).await,
    }
}

/// Creates an account with the `user` role (and `admin` with `--admin`).
///
/// # Flow
///
/// 1. Prompt for username (or use provided)
/// 2. Prompt for password, or generate one with `--yes`
/// 3. Confirm creation (unless `--yes`)
/// 4. Hash with Argon2id and store
/// 5. Assign roles
async fn create_user(
    repo: &PgUserRepository,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
    admin: bool,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let username = username.trim().to_string();
    anyhow::ensure!(!username.is_empty(), "Username must not be empty");

    let (password, generated) = match password {
        Some(p) => (p, false),
        None if skip_confirm => (generate_password(), true),
        None => (
            Password::new()
                .with_prompt("Password")
                .with_confirmation("Repeat password", "Passwords do not match")
                .interact()?,
            false,
        ),
    };
    anyhow::ensure!(password.len() >= 8, "Password must be at least 8 characters");

    let mut roles = vec![USER_ROLE];
    if admin {
        roles.push(ADMIN_ROLE);
    }

    println!();
    println!("{}", "Account details:".bright_white().bold());
    println!("  Username: {}", username.cyan());
    println!(
        "  Email:    {}",
        email.as_deref().unwrap_or("-").bright_black()
    );
    println!("  Roles:    {}", roles.join(", ").cyan());
    if generated {
        println!("  Password: {}", password.bright_yellow().bold());
        println!();
        println!(
            "{}",
            "⚠️  Save this password now! It is not stored in readable form."
                .red()
                .bold()
        );
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this account?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let password_hash = hash_password(&password)?;

    let user = repo
        .create(NewUser {
            username,
            email,
            password_hash,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    for role in &roles {
        repo.assign_role(user.id, role)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to assign role '{}': {}", role, e))?;
    }

    println!(
        "{}",
        format!("✅ User '{}' created (id {})", user.username, user.id)
            .green()
            .bold()
    );
    println!();

    Ok(())
}

/// Lists all accounts.
///
/// # Output Format
///
/// ```text
/// 📋 Users
///
///   ID  Username             Status     Last login
///   ──────────────────────────────────────────────────────────
///   1   admin                ACTIVE     2026-01-15 10:30
/// ```
async fn list_users(repo: &PgUserRepository) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create --admin",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<3} {:<20} {:<10} {:<20}",
        "ID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Status".bright_white().bold(),
        "Last login".bright_white().bold()
    );
    println!("  {}", "─".repeat(58).bright_black());

    for user in &users {
        let status = if user.is_active() {
            "ACTIVE".green()
        } else {
            user.status.to_uppercase().red()
        };

        let last_login = user
            .last_login_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<3} {:<20} {:<10} {}",
            user.id.to_string().bright_black(),
            user.username.cyan(),
            status,
            last_login.bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn handle_domain_action(action: DomainAction, pool: &PgPool) -> Result<()> {
    let service = DomainService::new(Arc::new(PgDomainRepository::new(Arc::new(pool.clone()))));

    match action {
        DomainAction::Add { hostname, referer } => {
            let domain = service
                .create_domain(hostname, referer)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to add domain: {}", e))?;

            println!(
                "{}",
                format!("✅ Domain '{}' added (id {})", domain.hostname, domain.id)
                    .green()
                    .bold()
            );
        }
        DomainAction::List { all } => {
            let domains = service
                .list_domains(!all)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list domains: {}", e))?;

            println!("{}", "🌐 Domains (selection order)".bright_blue().bold());
            println!();

            if domains.is_empty() {
                println!("{}", "  No domains found".yellow());
                return Ok(());
            }

            println!(
                "  {:<4} {:<32} {:<9} {:>6}  {:<20}",
                "ID".bright_white().bold(),
                "Hostname".bright_white().bold(),
                "Status".bright_white().bold(),
                "Uses".bright_white().bold(),
                "Last used".bright_white().bold()
            );
            println!("  {}", "─".repeat(75).bright_black());

            for d in &domains {
                let status = if d.is_active() {
                    "active".green()
                } else {
                    "inactive".red()
                };
                let last_used = d
                    .last_used_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "never".to_string());

                println!(
                    "  {:<4} {:<32} {:<9} {:>6}  {}",
                    d.id.to_string().bright_black(),
                    d.hostname.cyan(),
                    status,
                    d.usage_count,
                    last_used.bright_black()
                );
            }
            println!();
        }
    }

    Ok(())
}

/// Runs one batch exactly like the scheduler would and prints each result.
async fn handle_rotate(pool: &PgPool) -> Result<()> {
    let config = config::load_from_env()?;
    let campaigns = campaign_client_from_config(&config)?;
    let pool = Arc::new(pool.clone());

    let service = RotationService::new(
        Arc::new(PgAdLinkRepository::new(pool.clone())),
        Arc::new(PgDomainRepository::new(pool.clone())),
        Arc::new(PgRunLogRepository::new(pool)),
        campaigns,
        RotationSettings {
            redirect_base_url: config.redirect_base_url.clone(),
            log_skipped: config.rotation_log_skipped,
        },
    );

    println!(
        "{}",
        format!("🔄 Running rotation ({} mode)", service.ads_mode())
            .bright_blue()
            .bold()
    );
    println!();

    let summary = service
        .run_batch()
        .await
        .map_err(|e| anyhow::anyhow!("Rotation aborted: {}", e))?;

    for result in &summary.results {
        let mark = if result.success {
            "✅".to_string()
        } else {
            "❌".to_string()
        };
        println!(
            "  {} #{:<5} {:<30} {}",
            mark,
            result.link_id,
            result.campaign_name.cyan(),
            result.message.bright_black()
        );
    }
    for id in &summary.skipped {
        println!("  ⏭️  #{:<5} {}", id, "no active domain".yellow());
    }

    println!();
    println!(
        "  Succeeded: {}  Failed: {}  Skipped: {}",
        summary.succeeded().to_string().green().bold(),
        summary.failed().to_string().red().bold(),
        summary.skipped.len().to_string().yellow().bold()
    );
    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Links (total and running)
/// - Active domains
/// - Run logs by status
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let (links, running): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COUNT(*) FILTER (WHERE status = 'running') FROM ad_links",
    )
    .fetch_one(pool)
    .await?;

    let domains: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM domains WHERE status = 'active'")
        .fetch_one(pool)
        .await?;

    let (succeeded, failed, skipped): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FILTER (WHERE status = 'success'),
               COUNT(*) FILTER (WHERE status = 'failed'),
               COUNT(*) FILTER (WHERE status = 'skipped')
        FROM run_logs
        "#,
    )
    .fetch_one(pool)
    .await?;

    println!(
        "  Links:          {} ({} running)",
        links.to_string().bright_green().bold(),
        running.to_string().bright_green()
    );
    println!(
        "  Active domains: {}",
        domains.to_string().bright_green().bold()
    );
    println!(
        "  Runs:           {} ok / {} failed / {} skipped",
        succeeded.to_string().green().bold(),
        failed.to_string().red().bold(),
        skipped.to_string().yellow().bold()
    );
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
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}

/// Generates a random password for non-interactive account creation.
///
/// # Format
///
/// - Length: 20 characters
/// - Character set: A-Z, a-z, 0-9
fn generate_password() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const PASSWORD_LEN: usize = 20;

    let mut rng = rand::rng();

    (0..PASSWORD_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
