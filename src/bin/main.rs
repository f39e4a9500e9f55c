use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use fincat::Session;

/// A cli interface to the fincat transaction categorizer
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// The path to the persisted category file
    #[arg(long, default_value = "categories.json")]
    categories: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Categorize a transaction CSV export and print the expense summary
    Report {
        /// The path to the transaction CSV file
        filename: PathBuf,
    },
    /// List the known category names
    Categories,
    /// Create a new, empty category
    AddCategory {
        /// The name of the category to create
        name: String,
    },
    /// Associate a keyword with an existing category
    AddKeyword {
        /// The category to add the keyword to
        category: String,
        /// The keyword; transactions whose description equals it will be
        /// assigned to the category
        keyword: String,
    },
}

fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Args::parse();
    let mut session = Session::open(&args.categories);

    match args.command {
        Command::Report { filename } => {
            let file = File::open(&filename)
                .context(format!("unable to open file {}", filename.display()))?;
            session.load_transactions(file)?;

            println!("Expenses by category");
            for row in session.summary() {
                println!("  {:<24} {:>12}", row.category, row.total.round_dp(2));
            }
            println!();
            println!("Total payments: {}", session.total_payments().round_dp(2));
        }
        Command::Categories => {
            for name in session.category_names() {
                println!("{name}");
            }
        }
        Command::AddCategory { name } => {
            if session.add_category(&name)? {
                println!("Category '{name}' added.");
            } else {
                println!("Category '{name}' was not added (empty or duplicate name).");
            }
        }
        Command::AddKeyword { category, keyword } => {
            if session.add_keyword(&category, &keyword)? {
                println!("Keyword '{}' added to category '{category}'.", keyword.trim());
            } else {
                println!("Keyword '{}' was not added (empty or duplicate).", keyword.trim());
            }
        }
    }

    Ok(())
}

/// Initializes the tracing subscriber, honoring RUST_LOG when set.
fn init_logger() {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!("{}=info", env!("CARGO_CRATE_NAME"))),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
