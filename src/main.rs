//! Prop-trading payout monitor CLI.
//!
//! Thin presentation layer over the account collection: every command loads
//! the persisted state, applies at most one mutation and writes the state
//! back. The evaluation rules live in the domain layer.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use propmon::application::AccountService;
use propmon::domain::account::AccountType;
use propmon::domain::config::GlobalConfig;
use propmon::domain::payout::max_allowed_payout;
use propmon::domain::status;
use propmon::infrastructure::Store;

#[derive(Parser)]
#[command(author, version, about = "Prop-trading payout monitor", long_about = None)]
struct Cli {
    /// Override the store directory (defaults to ~/.propmon)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List accounts with their evaluated status
    List,
    /// Create a new account
    Add,
    /// Rename an account
    Rename { id: String, name: String },
    /// Set the account type (manual or algo)
    SetType { id: String, account_type: String },
    /// Record a daily P/L entry
    Record { id: String, pnl: String },
    /// Edit a recorded P/L entry in place
    EditEntry {
        id: String,
        index: usize,
        value: String,
    },
    /// Delete a recorded P/L entry
    DeleteEntry { id: String, index: usize },
    /// Execute a payout (defaults to the maximum allowed amount)
    Payout { id: String, amount: Option<String> },
    /// Append a manual payout record
    AddPayout { id: String, amount: String },
    /// Delete a payout record by index
    DeletePayout { id: String, index: usize },
    /// Delete an account
    Delete { id: String },
    /// Remove every blown account
    Sweep,
    /// Show or change the evaluation rules
    Config {
        #[arg(long)]
        target_profit_threshold: Option<String>,
        #[arg(long)]
        required_days: Option<u32>,
        #[arg(long)]
        max_drawdown: Option<String>,
        #[arg(long)]
        post_payout_liquidation_level: Option<String>,
        #[arg(long)]
        subsequent_payout_ratio: Option<u32>,
    },
    /// Clear persisted data and restore defaults
    Reset,
}

/// Invalid numeric input is a no-op, not an error.
fn parse_money(raw: &str) -> Option<Decimal> {
    match Decimal::from_str(raw) {
        Ok(value) => Some(value),
        Err(_) => {
            println!("Ignoring invalid amount: {raw}");
            None
        }
    }
}

fn print_account(service: &AccountService, id: &str, config: &GlobalConfig) {
    let Some(account) = service.get(id) else {
        return;
    };
    let status = status::evaluate(account, config);

    let flag = if status.is_blown {
        "BLOWN"
    } else if status.can_payout {
        "PAYOUT READY"
    } else {
        "IN EVALUATION"
    };

    println!(
        "{}  {:<20} {:<6} ${:>12}  {}/{} days  [{}] {}",
        account.id,
        account.name,
        account.account_type,
        account.balance,
        status.qualified_days,
        config.required_days,
        flag,
        status.reason
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let store = match cli.data_dir {
        Some(dir) => Store::with_dir(dir),
        None => Store::new()?,
    };

    let mut config = store.load_config();
    let mut service = AccountService::new(store.load_accounts());

    match cli.command {
        Commands::List => {
            if service.accounts().is_empty() {
                println!("No accounts. Create one with `propmon add`.");
            }
            let ids: Vec<String> = service.accounts().iter().map(|a| a.id.clone()).collect();
            for id in &ids {
                print_account(&service, id, &config);
            }
            println!(
                "Net balance: ${}   Total payouts: ${}",
                service.total_balance(),
                service.total_payouts()
            );
        }
        Commands::Add => {
            let account = service.create_account();
            println!("Created {} ({})", account.id, account.name);
        }
        Commands::Rename { id, name } => {
            if let Err(e) = service.rename(&id, name) {
                println!("{e}");
            }
        }
        Commands::SetType { id, account_type } => match AccountType::from_str(&account_type) {
            Ok(account_type) => {
                if let Err(e) = service.set_type(&id, account_type) {
                    println!("{e}");
                }
            }
            Err(e) => println!("{e}"),
        },
        Commands::Record { id, pnl } => {
            if let Some(pnl) = parse_money(&pnl) {
                match service.add_profit(&id, pnl) {
                    Ok(()) => print_account(&service, &id, &config),
                    Err(e) => println!("{e}"),
                }
            }
        }
        Commands::EditEntry { id, index, value } => {
            if let Some(value) = parse_money(&value) {
                match service.edit_profit(&id, index, value) {
                    Ok(()) => print_account(&service, &id, &config),
                    Err(e) => println!("{e}"),
                }
            }
        }
        Commands::DeleteEntry { id, index } => match service.delete_profit(&id, index) {
            Ok(()) => print_account(&service, &id, &config),
            Err(e) => println!("{e}"),
        },
        Commands::Payout { id, amount } => {
            let amount = match amount {
                Some(raw) => parse_money(&raw),
                None => service
                    .get(&id)
                    .map(|account| max_allowed_payout(account, &config)),
            };
            if let Some(amount) = amount {
                match service.execute_payout(&id, amount, &config, chrono::Utc::now()) {
                    Ok(record) => println!(
                        "Paid out ${}, post balance ${}",
                        record.amount, record.post_balance
                    ),
                    Err(e) => println!("{e}"),
                }
            } else if service.get(&id).is_none() {
                println!("Account not found: {id}");
            }
        }
        Commands::AddPayout { id, amount } => {
            if let Some(amount) = parse_money(&amount) {
                match service.add_payout_record(&id, amount, chrono::Utc::now()) {
                    Ok(()) => print_account(&service, &id, &config),
                    Err(e) => println!("{e}"),
                }
            }
        }
        Commands::DeletePayout { id, index } => {
            match service.delete_payout_record(&id, index) {
                Ok(()) => print_account(&service, &id, &config),
                Err(e) => println!("{e}"),
            }
        }
        Commands::Delete { id } => match service.delete_account(&id) {
            Ok(account) => println!("Deleted {} ({})", account.id, account.name),
            Err(e) => println!("{e}"),
        },
        Commands::Sweep => {
            for account in service.remove_blown(&config) {
                println!(
                    "Account \"{}\" was liquidated and removed.",
                    account.name
                );
            }
        }
        Commands::Config {
            target_profit_threshold,
            required_days,
            max_drawdown,
            post_payout_liquidation_level,
            subsequent_payout_ratio,
        } => {
            if let Some(v) = target_profit_threshold.as_deref().and_then(parse_money) {
                config.target_profit_threshold = v;
            }
            if let Some(v) = required_days {
                config.required_days = v;
            }
            if let Some(v) = max_drawdown.as_deref().and_then(parse_money) {
                config.max_drawdown = v;
            }
            if let Some(v) = post_payout_liquidation_level
                .as_deref()
                .and_then(parse_money)
            {
                config.post_payout_liquidation_level = v;
            }
            if let Some(v) = subsequent_payout_ratio {
                config.subsequent_payout_ratio = v.min(100);
            }
            if let Err(e) = config.validate() {
                println!("{e}");
                config = store.load_config();
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Reset => {
            store.reset()?;
            config = GlobalConfig::default();
            service = AccountService::new(Vec::new());
            println!("State cleared, defaults restored.");
        }
    }

    // Persistence is fire-and-forget: a failed save is logged, never fatal.
    if let Err(e) = store.save_accounts(service.accounts()) {
        warn!("Failed to persist accounts: {e:#}");
    }
    if let Err(e) = store.save_config(&config) {
        warn!("Failed to persist config: {e:#}");
    }

    Ok(())
}
