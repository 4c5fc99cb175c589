use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use tally::cli::{
    handle_balance_command, handle_category_command, handle_export_command,
    handle_import_command, handle_transaction_command, CategoryCommands, ExportFormat,
    TransactionCommands,
};
use tally::config::{paths::TallyPaths, settings::Settings};
use tally::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Terminal ledger for income and outcome transactions",
    long_about = "Tally keeps a ledger of income and outcome transactions filed \
                  under categories. A new outcome may never exceed the current \
                  balance, and whole CSV batches can be imported in one step."
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Show income, outcome and total
    Balance,

    /// Category commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Import transactions from a CSV file
    Import {
        /// Path to the CSV file: a header row, then `title, kind, value, category`
        /// lines; values take at most two decimal places
        file: PathBuf,
        /// Delete the file once it has been read
        #[arg(long)]
        remove_source: bool,
    },

    /// Export the ledger
    Export {
        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Initialize a new ledger
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = TallyPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    tally::logging::init(cli.verbose, &settings.log_filter)?;

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Balance) => {
            handle_balance_command(&storage, &settings)?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Import {
            file,
            remove_source,
        }) => {
            handle_import_command(&storage, &settings, &file, remove_source)?;
        }
        Some(Commands::Export { format, output }) => {
            handle_export_command(&storage, format, output)?;
        }
        Some(Commands::Init) => {
            println!("Initializing Tally at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'tally import <file>' or 'tally transaction add' to get started.");
        }
        Some(Commands::Config) => {
            println!("Tally Configuration");
            println!("===================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Initialized:      {}", storage.is_initialized());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!("  Default format:  {:?}", settings.default_format);
            println!("  Log filter:      {}", settings.log_filter);
        }
        None => {
            println!("Tally - terminal ledger");
            println!();
            println!("Run 'tally --help' for usage information.");
        }
    }

    Ok(())
}
