//! DonutMarket CLI - Operator tools for the ticket relay.
//!
//! # Usage
//!
//! ```bash
//! # Show tickets waiting in the file-drop directory
//! dm-cli tickets list --dir tickets
//!
//! # Hand every waiting ticket to the companion bot
//! dm-cli tickets drain --forward-to http://localhost:8080/webhook/purchase
//!
//! # Send the sample ticket to the companion bot
//! dm-cli test-ticket --webhook http://localhost:8080/webhook/purchase
//!
//! # Price a purchase the way the checkout modal does
//! dm-cli quote --product "DonutSMP Coins" --quantity 100 --referral FRIEND
//!
//! # Preview a cart
//! dm-cli cart --add Elytra --add "DonutSMP Coins=100"
//! ```
//!
//! # Commands
//!
//! - `tickets list` - Show pending dropped tickets
//! - `tickets drain` - Forward or log pending tickets, then remove them
//! - `test-ticket` - Send the sample ticket
//! - `quote` - Print subtotal, discount and total, optionally submit
//! - `cart` - Print cart lines and the nav label

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dm-cli")]
#[command(author, version, about = "DonutMarket operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or drain the file-drop ticket queue
    Tickets {
        #[command(subcommand)]
        action: TicketsAction,
    },
    /// Send the sample ticket to the companion bot webhook
    TestTicket {
        /// Webhook that receives purchase tickets
        #[arg(
            long,
            env = "DISCORD_BOT_WEBHOOK_URL",
            default_value = "http://localhost:8080/webhook/purchase"
        )]
        webhook: String,

        /// Companion bot health endpoint, used with --check-health
        #[arg(
            long,
            env = "DISCORD_BOT_HEALTH_URL",
            default_value = "http://localhost:8080/health"
        )]
        health: String,

        /// Check the health endpoint before posting
        #[arg(long)]
        check_health: bool,
    },
    /// Compute a checkout quote
    Quote {
        /// Product name as listed in the shop
        #[arg(short, long)]
        product: String,

        /// Quantity, read like the checkout form reads it
        #[arg(short, long, default_value = "1")]
        quantity: String,

        /// Referral code; any non-blank code gives the discount
        #[arg(short, long, default_value = "")]
        referral: String,

        /// Minecraft username; submits the purchase when given
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Preview a cart
    Cart {
        /// `NAME` or `NAME=QUANTITY`, repeatable
        #[arg(short, long = "add")]
        add: Vec<String>,
    },
}

#[derive(Subcommand)]
enum TicketsAction {
    /// List pending tickets
    List {
        /// File-drop directory
        #[arg(short, long, env = "TICKETS_DIR", default_value = "tickets")]
        dir: PathBuf,
    },
    /// Take every pending ticket off the queue
    Drain {
        /// File-drop directory
        #[arg(short, long, env = "TICKETS_DIR", default_value = "tickets")]
        dir: PathBuf,

        /// Post each ticket to this webhook; failed posts stay queued
        #[arg(long)]
        forward_to: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

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
        Commands::Tickets { action } => match action {
            TicketsAction::List { dir } => commands::tickets::list(&dir).await?,
            TicketsAction::Drain { dir, forward_to } => {
                let summary = commands::tickets::drain(&dir, forward_to.as_deref()).await?;
                tracing::info!(
                    handled = summary.handled,
                    kept = summary.kept,
                    "Drain complete"
                );
            }
        },
        Commands::TestTicket {
            webhook,
            health,
            check_health,
        } => commands::relay::test_ticket(&webhook, &health, check_health).await?,
        Commands::Quote {
            product,
            quantity,
            referral,
            username,
        } => commands::quote::print(&product, &quantity, &referral, username.as_deref()).await?,
        Commands::Cart { add } => commands::cart::print(&add)?,
    }
    Ok(())
}
