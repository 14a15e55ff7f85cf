pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "gigboard")]
#[command(about = "Gigboard CLI - Serve, migrate and poke at the Gigboard API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the API server")]
    Serve {
        #[arg(long, help = "Port to bind (defaults to API_PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Mint a bearer token signed with the configured secret")]
    Token {
        #[arg(long, help = "User id to place in the `sub` claim")]
        user: Uuid,
        #[arg(long, help = "Email claim")]
        email: Option<String>,
        #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },

    #[command(about = "Apply database migrations to DATABASE_URL")]
    Migrate,

    #[command(about = "Check a running server's /health endpoint")]
    Ping {
        #[arg(long, default_value = "http://localhost:3000", help = "Server base URL")]
        url: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Serve { port } => commands::serve::handle(port).await,
        Commands::Token { user, email, hours } => commands::token::handle(user, email, hours, output_format),
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::Ping { url } => commands::ping::handle(&url, output_format).await,
    }
}
