//! Marketplace CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! mp-cli migrate
//!
//! # Create a customer
//! mp-cli customer create -u ada -p 'correct horse' --firstname Ada --lastname Lovelace
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `customer create` - Create a customer account

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mp-cli")]
#[command(author, version, about = "Marketplace CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage customers
    Customer {
        #[command(subcommand)]
        action: CustomerAction,
    },
}

#[derive(Subcommand)]
enum CustomerAction {
    /// Create a new customer
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Plaintext password (hashed before storage)
        #[arg(short, long)]
        password: String,

        /// Given name
        #[arg(long, default_value = "")]
        firstname: String,

        /// Family name
        #[arg(long, default_value = "")]
        lastname: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Customer { action } => match action {
            CustomerAction::Create {
                username,
                password,
                firstname,
                lastname,
            } => {
                commands::customer::create(&username, &password, firstname, lastname).await?;
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
    fn test_parse_customer_create() {
        let cli = Cli::try_parse_from([
            "mp-cli", "customer", "create", "-u", "ada", "-p", "pw", "--firstname", "Ada",
        ])
        .unwrap_or_else(|e| panic!("{e}"));

        match cli.command {
            Commands::Customer {
                action:
                    CustomerAction::Create {
                        username,
                        firstname,
                        lastname,
                        ..
                    },
            } => {
                assert_eq!(username, "ada");
                assert_eq!(firstname, "Ada");
                assert_eq!(lastname, "");
            }
            Commands::Migrate => panic!("expected customer create"),
        }
    }
}
