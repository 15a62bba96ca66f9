//! Stockroom CLI - Inventory inspection and demo checkout.
//!
//! # Usage
//!
//! ```bash
//! # List the seeded demo ledger
//! sr-cli inventory list
//!
//! # Show low-stock products
//! sr-cli inventory low-stock
//!
//! # Show dashboard counts
//! sr-cli inventory counts
//!
//! # Walk a full checkout against the demo ledger
//! sr-cli demo
//! ```
//!
//! # Commands
//!
//! - `inventory` - Inspect the seeded demo ledger
//! - `demo` - Run a scripted cart + checkout against it

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod catalog;
mod commands;
mod config;

#[derive(Parser)]
#[command(name = "sr-cli")]
#[command(author, version, about = "Stockroom CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the demo inventory ledger
    Inventory {
        #[command(subcommand)]
        action: InventoryAction,
    },
    /// Run a scripted checkout against the demo ledger
    Demo,
}

#[derive(Subcommand)]
enum InventoryAction {
    /// List every stock record
    List,
    /// Show products at or below their reorder point
    LowStock,
    /// Show dashboard counts
    Counts,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Inventory { action } => match action {
            InventoryAction::List => commands::inventory::list()?,
            InventoryAction::LowStock => commands::inventory::low_stock()?,
            InventoryAction::Counts => commands::inventory::counts()?,
        },
        Commands::Demo => commands::demo::run()?,
    }
    Ok(())
}
