//! Operator tooling: schema bootstrap and credential maintenance.

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pos_backend::{
    auth::{claims::Role, password::verify_password, repo_types::User},
    db,
    users::{
        dto::parse_role,
        services::{self, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_NAME, DEFAULT_ADMIN_PASSWORD},
    },
    validation::normalize_email,
};
use sqlx::PgPool;

#[derive(Debug, Parser)]
#[command(name = "pos-admin", about = "Administer the point-of-sale backend", version)]
struct Cli {
    /// Database connection URL.
    #[arg(long, env = "DATABASE_URL", value_name = "url")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending schema migrations.
    Bootstrap,
    /// Create a user; does nothing if the email is already registered.
    CreateUser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// `admin` or `sales`.
        #[arg(long, default_value = "sales")]
        role: String,
        #[arg(long)]
        full_name: Option<String>,
    },
    /// Replace a user's password.
    ResetPassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Check a password against the stored hash.
    VerifyPassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    ListUsers,
    /// Create the default administrator when the users table is empty.
    EnsureDefaultAdmin,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "pos_backend=info,warn".to_string()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let pool = db::connect_url(&cli.database_url, 2).await?;

    match cli.command {
        Command::Bootstrap => {
            db::migrate(&pool).await?;
            println!("[OK] schema is up to date");
        }
        Command::CreateUser {
            email,
            password,
            role,
            full_name,
        } => {
            let role = parse_role(&role)?;
            if let Some(existing) = User::find_by_email(&pool, &normalize_email(&email)).await? {
                println!("[INFO] {} already exists ({})", existing.email, existing.role);
                return Ok(ExitCode::SUCCESS);
            }
            let user =
                services::create_user(&pool, &email, &password, role, full_name.as_deref()).await?;
            println!("[OK] created {} ({}) id={}", user.email, user.role, user.user_id);
        }
        Command::ResetPassword { email, password } => {
            let user = services::set_password(&pool, &email, &password).await?;
            println!("[OK] password updated for {}", user.email);
        }
        Command::VerifyPassword { email, password } => {
            return verify(&pool, &email, &password).await;
        }
        Command::ListUsers => {
            for u in User::list(&pool).await? {
                println!(
                    "{:>5}  {:<32} {:<6} {:<8} {}",
                    u.user_id,
                    u.email,
                    u.role,
                    if u.is_active { "active" } else { "inactive" },
                    u.full_name.as_deref().unwrap_or("-"),
                );
            }
        }
        Command::EnsureDefaultAdmin => {
            let count = User::count(&pool).await?;
            if count > 0 {
                println!("[INFO] {count} user(s) present, default admin not needed");
            } else {
                let user = services::create_user(
                    &pool,
                    DEFAULT_ADMIN_EMAIL,
                    DEFAULT_ADMIN_PASSWORD,
                    Role::Admin,
                    Some(DEFAULT_ADMIN_NAME),
                )
                .await?;
                println!("[OK] created default admin {}", user.email);
                println!("[WARN] change the default password after first login");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn verify(pool: &PgPool, email: &str, password: &str) -> anyhow::Result<ExitCode> {
    let Some(user) = User::find_by_email(pool, &normalize_email(email)).await? else {
        println!("[ERROR] no user with email {email}");
        return Ok(ExitCode::FAILURE);
    };
    println!("[INFO] found {} ({})", user.email, user.role);
    println!(
        "[INFO] account is {}",
        if user.is_active { "ACTIVE" } else { "INACTIVE" }
    );

    let matches = verify_password(password, &user.password_hash).context("read stored hash")?;
    if matches && user.is_active {
        println!("[OK] password matches");
        Ok(ExitCode::SUCCESS)
    } else if matches {
        println!("[ERROR] password matches but the account is inactive");
        Ok(ExitCode::FAILURE)
    } else {
        println!("[ERROR] password does not match");
        Ok(ExitCode::FAILURE)
    }
}
