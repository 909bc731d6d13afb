pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::Theme;

#[derive(Parser)]
#[command(name = "roadmap")]
#[command(about = "Roadmap CLI - Command-line client for the Roadmap API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create the configured admin account (talks to the database directly)")]
    Seed {
        #[arg(long, help = "Also insert sample topics when there are none")]
        sample_topics: bool,
    },

    #[command(about = "Sign in and store the session token")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Sign in as an admin")]
        admin: bool,
    },

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Show server health and the stored session")]
    Status,

    #[command(about = "List topics, or show one topic with its roadmaps")]
    Topics {
        #[arg(help = "Topic id")]
        id: Option<Uuid>,
    },

    #[command(about = "List community posts")]
    Posts,

    #[command(about = "Show your own profile")]
    Me,

    #[command(about = "Show or set the colour theme")]
    Theme {
        #[arg(value_enum, help = "New theme")]
        theme: Option<Theme>,
    },

    #[command(about = "Show or set layout preferences")]
    Layout {
        #[arg(long, help = "Header height in pixels")]
        header_height: Option<u32>,
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
        Commands::Seed { sample_topics } => commands::seed::handle(sample_topics, output_format).await,
        Commands::Login {
            username,
            password,
            admin,
        } => commands::session::login(username, password, admin, output_format).await,
        Commands::Logout => commands::session::logout(output_format),
        Commands::Status => commands::session::status(output_format).await,
        Commands::Topics { id } => commands::browse::topics(id, output_format).await,
        Commands::Posts => commands::browse::posts(output_format).await,
        Commands::Me => commands::browse::me(output_format).await,
        Commands::Theme { theme } => commands::prefs::theme(theme, output_format),
        Commands::Layout { header_height } => commands::prefs::layout(header_height, output_format),
    }
}
