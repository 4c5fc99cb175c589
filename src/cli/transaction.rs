//! Transaction CLI commands
//!
//! Implements listing, creation, lookup and deletion of transactions, plus
//! the balance summary.

use std::collections::HashMap;
use std::io::{self, Write};

use clap::Subcommand;

use crate::config::{OutputFormat, Settings};
use crate::display::{format_balance, format_transaction_details, format_transaction_register};
use crate::error::{TallyError, TallyResult};
use crate::models::{CategoryId, Money, TransactionKind};
use crate::services::{CreateTransactionInput, TransactionService};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// List all transactions with the current balance
    List {
        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Add a new transaction
    Add {
        /// Short description
        title: String,
        /// Amount, e.g. "500" or "12.50"; at most two decimal places
        value: String,
        /// "income" or "outcome"
        kind: String,
        /// Category title; created if it does not exist yet
        #[arg(short, long)]
        category: String,
    },

    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> TallyResult<()> {
    let service = TransactionService::new(storage);

    match cmd {
        TransactionCommands::List { format } => {
            let snapshot = service.snapshot()?;
            match format.unwrap_or(settings.default_format) {
                OutputFormat::Table => {
                    let titles = category_titles(storage)?;
                    print!(
                        "{}",
                        format_transaction_register(
                            &snapshot.transactions,
                            &titles,
                            &snapshot.balance,
                            settings
                        )
                    );
                }
                OutputFormat::Json => {
                    let stdout = io::stdout();
                    let mut out = stdout.lock();
                    serde_json::to_writer_pretty(&mut out, &snapshot)?;
                    writeln!(out)?;
                }
                OutputFormat::Yaml => {
                    serde_yaml::to_writer(io::stdout().lock(), &snapshot)
                        .map_err(|e| TallyError::Export(e.to_string()))?;
                }
            }
        }

        TransactionCommands::Add {
            title,
            value,
            kind,
            category,
        } => {
            let value = Money::parse(&value)
                .map_err(|e| TallyError::Validation(e.to_string()))?;
            let kind: TransactionKind = kind
                .parse()
                .map_err(|e| TallyError::Validation(format!("{}", e)))?;

            let txn = service.create(CreateTransactionInput {
                title,
                value,
                kind,
                category: category.clone(),
            })?;

            println!("Created transaction: {}", txn.title);
            println!("  ID:       {}", txn.id);
            println!("  Kind:     {}", txn.kind);
            println!(
                "  Value:    {}",
                txn.value.format_with_symbol(&settings.currency_symbol)
            );
            println!("  Category: {}", category.trim());
        }

        TransactionCommands::Show { id } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| TallyError::transaction_not_found(&id))?;
            let category = storage.categories.get(txn.category_id)?;
            print!(
                "{}",
                format_transaction_details(
                    &txn,
                    category.as_ref().map(|c| c.title.as_str()),
                    settings
                )
            );
        }

        TransactionCommands::Delete { id } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| TallyError::transaction_not_found(&id))?;
            let removed = service.delete(txn.id)?;
            println!("Deleted transaction: {} ({})", removed.title, removed.id);
        }
    }

    Ok(())
}

/// Handle the balance command
pub fn handle_balance_command(storage: &Storage, settings: &Settings) -> TallyResult<()> {
    let balance = TransactionService::new(storage).get_balance()?;
    print!("{}", format_balance(&balance, settings));
    Ok(())
}

fn category_titles(storage: &Storage) -> TallyResult<HashMap<CategoryId, String>> {
    Ok(storage
        .categories
        .get_all()?
        .into_iter()
        .map(|c| (c.id, c.title))
        .collect())
}
