//! CLI administration tool for tiny-url.
//!
//! Manages user accounts and inspects the database without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a user account (prompts for missing fields)
//! cargo run --bin admin -- user create
//!
//! # List accounts
//! cargo run --bin admin -- user list
//!
//! # Delete an account by username or id
//! cargo run --bin admin -- user delete alice
//!
//! # Service statistics
//! cargo run --bin admin -- stats
//!
//! # Database diagnostics
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db info
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;

use tiny_url::domain::entities::NewUser;
use tiny_url::domain::repositories::UserRepository;
use tiny_url::infrastructure::persistence::PgUserRepository;
use tiny_url::utils::code_generator::generate_token;
use tiny_url::utils::password::hash_password;

/// CLI tool for managing tiny-url.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show service statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user account
    Create {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Password (generated if not provided)
        #[arg(short, long)]
        password: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all user accounts
    List,

    /// Delete a user account by username or id
    Delete { name_or_id: String },
}

#[derive(Subcommand)]
enum DbAction {
    /// Verify connectivity and schema
    Check,

    /// Show size and row counts
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
        Commands::User { action } => handle_user_action(action, &pool).await,
        Commands::Stats => show_stats(&pool).await,
        Commands::Db { action } => handle_db_action(action, &pool).await,
    }
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repository = PgUserRepository::new(pool.clone());

    match action {
        UserAction::Create {
            username,
            email,
            password,
            yes,
        } => create_user(&repository, username, email, password, yes).await,
        UserAction::List => list_users(&repository).await,
        UserAction::Delete { name_or_id } => delete_user(&repository, name_or_id).await,
    }
}

async fn create_user(
    repository: &PgUserRepository,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
    yes: bool,
) -> Result<()> {
    let username = match username {
        Some(value) => value,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let email = match email {
        Some(value) => value,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let (password, generated) = match password {
        Some(value) => (value, false),
        None => (generate_token(16)?, true),
    };

    println!("\n{}", "New account".bold());
    println!("  username: {}", username.cyan());
    println!("  email:    {}", email.cyan());
    if generated {
        println!("  password: {} {}", password.yellow(), "(generated)".dimmed());
    }

    if !yes {
        let proceed = Confirm::new()
            .with_prompt("Create this account?")
            .default(true)
            .interact()?;
        if !proceed {
            println!("{}", "Cancelled".yellow());
            return Ok(());
        }
    }

    let user = repository
        .create(NewUser {
            username,
            email,
            password_hash: hash_password(&password)?,
        })
        .await?;

    println!(
        "\n{} user {} (id {})",
        "Created".green().bold(),
        user.username.cyan(),
        user.id
    );
    if generated {
        println!("Store the generated password now; it is not recoverable later.");
    }

    Ok(())
}

async fn list_users(repository: &PgUserRepository) -> Result<()> {
    let users = repository.list().await?;

    if users.is_empty() {
        println!("{}", "No user accounts".yellow());
        return Ok(());
    }

    println!("{}", "User accounts".bold());
    println!("{:<6} {:<24} {:<32} {}", "ID", "USERNAME", "EMAIL", "CREATED");
    for user in &users {
        println!(
            "{:<6} {:<24} {:<32} {}",
            user.id,
            user.username,
            user.email,
            user.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    println!("\n{} account(s)", users.len());

    Ok(())
}

async fn delete_user(repository: &PgUserRepository, name_or_id: String) -> Result<()> {
    let user = match name_or_id.parse::<i64>() {
        Ok(id) => repository.find_by_id(id).await?,
        Err(_) => repository.find_by_username(&name_or_id).await?,
    }
    .with_context(|| format!("No user matches {name_or_id:?}"))?;

    let proceed = Confirm::new()
        .with_prompt(format!(
            "Delete user {} (id {})? This cannot be undone",
            user.username, user.id
        ))
        .default(false)
        .interact()?;
    if !proceed {
        println!("{}", "Cancelled".yellow());
        return Ok(());
    }

    repository.delete(user.id).await?;
    println!("{} user {}", "Deleted".green().bold(), user.username.cyan());

    Ok(())
}

async fn show_stats(pool: &PgPool) -> Result<()> {
    let url_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await?;
    let user_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    let total_visits =
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(visits), 0)::BIGINT FROM urls")
            .fetch_one(pool)
            .await?;

    println!("{}", "Service statistics".bold());
    println!("  short urls:   {url_count}");
    println!("  users:        {user_count}");
    println!("  total visits: {total_visits}");

    let top = sqlx::query_as::<_, (String, String, i64)>(
        r#"
        SELECT short_code, original_url, visits
        FROM urls
        ORDER BY visits DESC, id ASC
        LIMIT 5
        "#,
    )
    .fetch_all(pool)
    .await?;

    if !top.is_empty() {
        println!("\n{}", "Most visited".bold());
        for (short_code, original_url, visits) in &top {
            println!(
                "  {:<8} {:>8}  {}",
                short_code.cyan(),
                visits,
                truncate(original_url, 60)
            );
        }
    }

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            sqlx::query("SELECT 1").execute(pool).await?;
            println!("{} database reachable", "OK".green().bold());

            let version = sqlx::query_scalar::<_, String>("SHOW server_version")
                .fetch_one(pool)
                .await?;
            println!("{} server version {}", "OK".green().bold(), version);

            let tables = sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COUNT(*) FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name IN ('urls', 'users')
                "#,
            )
            .fetch_one(pool)
            .await?;
            if tables == 2 {
                println!("{} schema present (urls, users)", "OK".green().bold());
            } else {
                println!(
                    "{} schema incomplete, run the server once to apply migrations",
                    "WARN".yellow().bold()
                );
            }
        }
        DbAction::Info => {
            let size = sqlx::query_scalar::<_, String>(
                "SELECT pg_size_pretty(pg_database_size(current_database()))",
            )
            .fetch_one(pool)
            .await?;
            let url_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM urls")
                .fetch_one(pool)
                .await?;
            let user_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
                .fetch_one(pool)
                .await?;

            println!("{}", "Database".bold());
            println!("  size:  {size}");
            println!("  urls:  {url_count} rows");
            println!("  users: {user_count} rows");
        }
    }

    Ok(())
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let cut: String = value.chars().take(max).collect();
        format!("{cut}…")
    }
}
