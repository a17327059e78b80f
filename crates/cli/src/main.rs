//! Bazaar CLI - database migrations and principal seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run one service's migrations
//! bazaar-cli migrate catalog
//!
//! # Run every service's migrations
//! bazaar-cli migrate all
//!
//! # Create an active principal
//! bazaar-cli user create -e admin@example.com -p 's3cret' -n admin
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "bazaar-cli")]
#[command(author, version, about = "Bazaar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Manage principals
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Run user service migrations
    Users,
    /// Run catalog service migrations
    Catalog,
    /// Run order service migrations
    Orders,
    /// Run all migrations
    All,
}

#[derive(Subcommand)]
enum UserAction {
    /// Create an active principal
    Create {
        /// Email address (login identifier)
        #[arg(short, long)]
        email: String,

        /// Plain-text password, hashed before storage
        #[arg(short, long)]
        password: String,

        /// User name (defaults to the email's local part)
        #[arg(short = 'n', long)]
        user_name: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    bazaar_web::config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Users => commands::migrate::users().await?,
            MigrateTarget::Catalog => commands::migrate::catalog().await?,
            MigrateTarget::Orders => commands::migrate::orders().await?,
            MigrateTarget::All => {
                commands::migrate::users().await?;
                commands::migrate::catalog().await?;
                commands::migrate::orders().await?;
            }
        },
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                password,
                user_name,
            } => {
                commands::user::create(&email, &password, user_name).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_user_create() {
        let cli = Cli::try_parse_from([
            "bazaar-cli", "user", "create", "-e", "a@b.io", "-p", "pw", "-n", "ada",
        ])
        .unwrap_or_else(|e| panic!("{e}"));

        let Commands::User {
            action:
                UserAction::Create {
                    email,
                    password,
                    user_name,
                },
        } = cli.command
        else {
            panic!("expected user create");
        };
        assert_eq!(email, "a@b.io");
        assert_eq!(password, "pw");
        assert_eq!(user_name.as_deref(), Some("ada"));
    }

    #[test]
    fn test_migrate_requires_target() {
        assert!(Cli::try_parse_from(["bazaar-cli", "migrate"]).is_err());
        assert!(Cli::try_parse_from(["bazaar-cli", "migrate", "storefront"]).is_err());
        assert!(Cli::try_parse_from(["bazaar-cli", "migrate", "all"]).is_ok());
    }
}
