//! Category CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_category_usage;
use crate::error::{TallyError, TallyResult};
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories with transaction counts
    List,

    /// Show a category
    Show {
        /// Category title or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CategoryCommands,
) -> TallyResult<()> {
    let service = CategoryService::from_storage(storage);

    match cmd {
        CategoryCommands::List => {
            let usage = service.usage()?;
            print!("{}", format_category_usage(&usage, settings));
        }

        CategoryCommands::Show { category } => {
            let cat = service
                .find(&category)?
                .ok_or_else(|| TallyError::category_not_found(&category))?;
            let usage = service.usage_of(cat)?;

            println!("Category:     {}", usage.category.title);
            println!("ID:           {}", usage.category.id);
            println!(
                "Created:      {}",
                usage.category.created_at.format(&settings.date_format)
            );
            println!("Transactions: {}", usage.transaction_count);
            println!(
                "Net:          {}",
                usage.net.format_with_symbol(&settings.currency_symbol)
            );
        }
    }

    Ok(())
}
