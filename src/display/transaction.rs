//! Transaction display formatting
//!
//! Provides utilities for formatting the transaction register, single
//! transaction details and the balance summary for terminal display.

use std::collections::HashMap;

use crate::config::Settings;
use crate::models::{Balance, CategoryId, Transaction, TransactionKind};

/// Format a single transaction for display (register row)
pub fn format_transaction_row(
    txn: &Transaction,
    category: &str,
    settings: &Settings,
) -> String {
    let (income, outcome) = split_amount(txn, settings);

    format!(
        "{:12} {:16} {:20} {:16} {:>12} {:>12}",
        txn.id.to_string(),
        txn.created_at.format(&settings.date_format).to_string(),
        truncate(&txn.title, 20),
        truncate(category, 16),
        income,
        outcome
    )
}

/// Format a list of transactions as a register, followed by the balance
pub fn format_transaction_register(
    transactions: &[Transaction],
    categories: &HashMap<CategoryId, String>,
    balance: &Balance,
    settings: &Settings,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:16} {:20} {:16} {:>12} {:>12}\n",
        "ID", "Created", "Title", "Category", "Income", "Outcome"
    ));
    output.push_str(&"-".repeat(93));
    output.push('\n');

    for txn in transactions {
        let category = categories
            .get(&txn.category_id)
            .map(String::as_str)
            .unwrap_or("(unknown)");
        output.push_str(&format_transaction_row(txn, category, settings));
        output.push('\n');
    }

    output.push_str(&"-".repeat(93));
    output.push('\n');
    output.push_str(&format_balance(balance, settings));

    output
}

/// Format transaction details for display
pub fn format_transaction_details(
    txn: &Transaction,
    category: Option<&str>,
    settings: &Settings,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Title:       {}\n", txn.title));
    output.push_str(&format!("Kind:        {}\n", txn.kind));
    output.push_str(&format!(
        "Value:       {}\n",
        txn.value.format_with_symbol(&settings.currency_symbol)
    ));
    output.push_str(&format!(
        "Category:    {}\n",
        category.unwrap_or("(unknown)")
    ));
    output.push_str(&format!(
        "Created:     {}\n",
        txn.created_at.format(&settings.date_format)
    ));

    output
}

/// Format the income, outcome and total lines
pub fn format_balance(balance: &Balance, settings: &Settings) -> String {
    let symbol = &settings.currency_symbol;
    format!(
        "{:>10} {:>14}\n{:>10} {:>14}\n{:>10} {:>14}\n",
        "Income:",
        balance.income.format_with_symbol(symbol),
        "Outcome:",
        balance.outcome.format_with_symbol(symbol),
        "Total:",
        balance.total.format_with_symbol(symbol),
    )
}

fn split_amount(txn: &Transaction, settings: &Settings) -> (String, String) {
    let amount = txn.value.format_with_symbol(&settings.currency_symbol);
    match txn.kind {
        TransactionKind::Income => (amount, String::new()),
        TransactionKind::Outcome => (String::new(), amount),
    }
}

/// Pad or cut a string to exactly `max_len` characters
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
