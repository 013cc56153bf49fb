//! # Meridian CLI
//!
//! Command-line interface for the Meridian appraisal backend.
//!
//! ## Usage
//!
//! ```bash
//! meridian serve          # Start the API server (runs migrations automatically)
//! meridian migrate        # Run database migrations
//! meridian create-user    # Create a user account
//! meridian --help         # Show help
//! ```

mod config;
mod serve;
mod tls;

use anyhow::anyhow;
use auth::{hash_password, secrecy::SecretString, validate_password_strength};
use chrono::Utc;
use clap::{Args, CommandFactory as _, Parser, Subcommand};
use error::Result;
use migration::MigratorTrait as _;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::config::{build_database_url, DatabaseConfig};

/// Meridian - Employee Appraisal Backend
#[derive(Parser, Debug)]
#[command(name = "meridian")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (debug, info, warn, error)
    #[arg(short = 'L', long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short, long, env = "MERIDIAN_LOG_FORMAT", default_value = "pretty")]
    log_format: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the API server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Create a user account
    CreateUser(CreateUserArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Verify configuration
    Validate,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Server host to bind to
    #[arg(long, env = "MERIDIAN_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port to bind to
    #[arg(short, long, env = "MERIDIAN_PORT", default_value = "3000")]
    pub port: u16,

    /// Enable TLS/HTTPS
    #[arg(long, env = "MERIDIAN_TLS")]
    pub tls: bool,

    /// TLS certificate file path
    #[arg(long, env = "MERIDIAN_TLS_CERT", requires = "tls")]
    pub tls_cert: Option<String>,

    /// TLS key file path
    #[arg(long, env = "MERIDIAN_TLS_KEY", requires = "tls")]
    pub tls_key: Option<String>,
}

#[derive(Args, Debug)]
struct MigrateArgs {
    /// Rollback the last migration instead of applying pending ones
    #[arg(long)]
    rollback: bool,
}

#[derive(Args, Debug)]
struct CreateUserArgs {
    /// Login username
    #[arg(long)]
    username: String,

    /// Email address
    #[arg(long)]
    email: String,

    /// Password (prompted use is recommended; this ends up in shell history)
    #[arg(long)]
    password: String,

    /// First name
    #[arg(long, default_value = "")]
    first_name: String,

    /// Last name
    #[arg(long, default_value = "")]
    last_name: String,

    /// Company the user belongs to
    #[arg(long)]
    company_id: Option<Uuid>,

    /// Grant the staff/administrator flag
    #[arg(long)]
    staff: bool,
}

#[derive(Args, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: clap_complete::Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level, &cli.log_format, None)
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    logging::info!(target: "app", command = ?cli.command, "Meridian CLI starting...");

    match cli.command {
        Commands::Serve(args) => {
            let config = DatabaseConfig::from_env().map_err(|e| anyhow!("Invalid database configuration: {}", e))?;
            serve::run(&config, &args).await?;
        }
        Commands::Migrate(args) => migrate(&args).await?,
        Commands::CreateUser(args) => create_user(&args).await?,
        Commands::Completions(args) => completions(&args),
        Commands::Validate => validate()?,
    }

    Ok(())
}

async fn connect() -> Result<sea_orm::DatabaseConnection> {
    let config = DatabaseConfig::from_env().map_err(|e| anyhow!("Invalid database configuration: {}", e))?;
    let database_url = build_database_url(&config);
    Ok(migration::connect_to_database(&database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?)
}

async fn migrate(args: &MigrateArgs) -> Result<()> {
    let db = connect().await?;

    if args.rollback {
        logging::info!(target: "migrate", "Rolling back the last migration...");
        migration::Migrator::down(&db, Some(1))
            .await
            .map_err(|e| anyhow!("Rollback failed: {}", e))?;
        logging::info!(target: "migrate", "Rollback completed successfully");
        return Ok(());
    }

    logging::info!(target: "migrate", "Running database migrations...");
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| anyhow!("Migration failed: {}", e))?;
    logging::info!(target: "migrate", "Migrations completed successfully");

    Ok(())
}

async fn create_user(args: &CreateUserArgs) -> Result<()> {
    if let Err(errors) = validate_password_strength(&args.password) {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(error::AppError::validation(format!(
            "Password validation failed: {}",
            messages.join(", ")
        )));
    }

    let db = connect().await?;

    let existing = entity::users::Entity::find()
        .filter(entity::users::Column::Username.eq(&args.username))
        .one(&db)
        .await?;
    if existing.is_some() {
        return Err(error::AppError::conflict("Username is already taken"));
    }

    if let Some(company_id) = args.company_id {
        entity::companies::Entity::find_by_id(company_id)
            .one(&db)
            .await?
            .ok_or_else(|| error::AppError::not_found("Company not found"))?;
    }

    let password_secret = SecretString::from(args.password.clone());
    let password_hash =
        hash_password(&password_secret).map_err(|e| anyhow!("Failed to hash password: {}", e))?;

    let now = Utc::now();
    let user = entity::users::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(args.username.clone()),
        email: Set(args.email.clone()),
        password_hash: Set(password_hash),
        first_name: Set(args.first_name.clone()),
        last_name: Set(args.last_name.clone()),
        company_id: Set(args.company_id),
        position: Set(String::new()),
        division: Set(String::new()),
        date_joined: Set(Some(now.date_naive())),
        last_promotion_date: Set(None),
        is_active: Set(true),
        is_staff: Set(args.staff),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;

    logging::info!(target: "create_user", user_id = %user.id, username = %user.username, staff = %user.is_staff, "User created");
    println!("{}", user.id);

    Ok(())
}

fn completions(args: &CompletionsArgs) {
    clap_complete::generate(args.shell, &mut Cli::command(), "meridian", &mut std::io::stdout());
}

fn validate() -> Result<()> {
    logging::info!(target: "validate", "Validating configuration...");

    let config = DatabaseConfig::from_env().map_err(|e| anyhow!("Invalid database configuration: {}", e))?;
    logging::info!(target: "validate", host = %config.host, port = %config.port, database = %config.database, "Database configuration OK");

    // The JWT secret must be valid base64 or every token operation fails.
    let jwt_config = auth::JwtConfig::default();
    use base64::Engine as _;
    base64::engine::general_purpose::STANDARD
        .decode(&jwt_config.secret)
        .map_err(|e| error::AppError::config(format!("MERIDIAN_JWT_SECRET is not valid base64: {}", e)))?;
    logging::info!(target: "validate", issuer = %jwt_config.issuer, "JWT configuration OK");

    logging::info!(target: "validate", "Configuration is valid");
    Ok(())
}
