use std::{
    error::Error,
    process::exit,
    sync::{Arc, Mutex},
};

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pennywise::{
    ConsoleNavigator, ConsoleNotifier, Dashboard, DashboardSummary, LocalIdentityProvider,
    SQLiteTransactionService, Transaction, format_currency, initialize_db, parse_timestamp,
};

/// Track your income and expenses from the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    ///
    /// The database is created if it does not exist.
    #[arg(long)]
    db_path: String,

    /// The email address to sign in with.
    #[arg(long, short)]
    email: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the balance, income and expenses.
    List,
    /// Record a new transaction.
    Add {
        /// The amount, negative for an expense.
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,
        /// The date, e.g. "2024-05-01" or "2024-05-01T12:00:00Z".
        #[arg(long)]
        date: String,
        /// What the transaction was for.
        #[arg(long, default_value = "")]
        description: String,
        /// The category, e.g. "Groceries".
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a transaction by ID.
    Delete {
        /// The ID shown by `list`.
        id: String,
    },
    /// Show spending by category.
    Report,
    /// Sign out.
    LogOut,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

    let args = Args::parse();

    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;
    let connection = Arc::new(Mutex::new(connection));

    let provider = LocalIdentityProvider::new();
    let mut dashboard = Dashboard::new(
        Arc::new(provider.clone()),
        Arc::new(SQLiteTransactionService::new(connection)),
        Arc::new(ConsoleNotifier),
        Arc::new(ConsoleNavigator),
    );

    // The provider reports nobody signed in as soon as the dashboard subscribes.
    dashboard.next_session_change().await?;
    provider.sign_in(&args.email)?;
    dashboard.next_session_change().await?;

    let succeeded = match args.command {
        Command::List => {
            print_transactions(&dashboard.summary());
            true
        }
        Command::Add {
            amount,
            date,
            description,
            category,
        } => {
            let date = parse_timestamp(&date)?;
            let new_transaction =
                Transaction::build(amount, date, &description).category(category.as_deref());

            match dashboard.add_transaction(new_transaction).await {
                Some(id) => {
                    println!("Created transaction {id}.");
                    true
                }
                None => false,
            }
        }
        Command::Delete { id } => dashboard.delete_transaction(id).await,
        Command::Report => {
            print_report(&dashboard.summary());
            true
        }
        Command::LogOut => {
            let logged_out = dashboard.log_out().await;
            if logged_out {
                dashboard.next_session_change().await?;
            }
            logged_out
        }
    };

    dashboard.shutdown();

    if !succeeded {
        exit(1);
    }

    Ok(())
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_transactions(summary: &DashboardSummary) {
    println!("Balance: {}", format_currency(summary.balance));

    println!("\nIncome");
    if summary.income.is_empty() {
        println!("  Nothing here yet.");
    }
    for transaction in &summary.income {
        print_transaction(transaction);
    }

    println!("\nExpenses");
    if summary.expenses.is_empty() {
        println!("  Nothing here yet.");
    }
    for transaction in &summary.expenses {
        print_transaction(transaction);
    }
}

fn print_transaction(transaction: &Transaction) {
    println!(
        "  {:>6}  {}  {:>14}  {}{}",
        transaction.id,
        transaction.date.date(),
        format_currency(transaction.amount),
        transaction.description,
        transaction
            .category
            .as_deref()
            .map(|category| format!(" [{category}]"))
            .unwrap_or_default(),
    );
}

fn print_report(summary: &DashboardSummary) {
    let report = &summary.report;

    if report.categories.is_empty() {
        println!("No spending to report.");
        return;
    }

    for category in &report.categories {
        println!(
            "  {:<20} {:>14} {:>5.1}%  ({} transactions)",
            category.category,
            format_currency(category.total),
            category.share * 100.0,
            category.count,
        );
    }
    println!("  {:<20} {:>14}", "Total", format_currency(report.total));
}
