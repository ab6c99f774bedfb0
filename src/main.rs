use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use settleup::application::ledger::{LedgerService, NamedExpense};
use settleup::domain::expense::ExpenseId;
use settleup::domain::participant::{Color, ParticipantUpdate};
use settleup::domain::ports::LedgerStoreBox;
use settleup::domain::split::ServicePercent;
use settleup::infrastructure::in_memory::InMemoryLedgerStore;
#[cfg(feature = "storage-rocksdb")]
use settleup::infrastructure::rocksdb::RocksDBLedgerStore;
use settleup::interfaces::csv::expense_reader::ExpenseReader;
use settleup::interfaces::text::summary_writer::SummaryWriter;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Track shared expenses and settle who owes whom", long_about = None)]
struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a participant
    AddPerson {
        name: String,
        /// Display color, #RGB or #RRGGBB. Defaults to the next free palette color.
        #[arg(long, value_parser = parse_color)]
        color: Option<Color>,
    },
    /// Rename or recolor a participant
    EditPerson {
        name: String,
        #[arg(long = "name")]
        new_name: Option<String>,
        #[arg(long, value_parser = parse_color)]
        color: Option<Color>,
    },
    /// Remove a participant and every expense that involves them
    RemovePerson { name: String },
    /// Record an expense split equally among participants
    AddExpense {
        #[arg(long)]
        description: String,
        #[arg(long)]
        amount: Decimal,
        /// Name of the participant who paid
        #[arg(long)]
        payer: String,
        /// Comma-separated names sharing the expense
        #[arg(long, value_delimiter = ',', required = true)]
        split: Vec<String>,
    },
    /// Remove an expense by id
    RemoveExpense { id: String },
    /// List participants and expenses
    List,
    /// Import expenses from a CSV file, then print the summary
    Import {
        /// Input CSV: description, amount, payer, participants (`;`-separated)
        input: PathBuf,
        /// Service percentage (0-100) applied to per-person totals
        #[arg(long, value_parser = parse_service)]
        service: Option<ServicePercent>,
    },
    /// Print balances and the settlement plan
    Summary {
        /// Service percentage (0-100) applied to per-person totals
        #[arg(long, value_parser = parse_service)]
        service: Option<ServicePercent>,
    },
}

fn parse_color(value: &str) -> std::result::Result<Color, String> {
    Color::parse(value).map_err(|e| e.to_string())
}

fn parse_service(value: &str) -> std::result::Result<ServicePercent, String> {
    value.parse::<ServicePercent>().map_err(|e| e.to_string())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn open_store(db_path: Option<PathBuf>) -> Result<LedgerStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => Ok(Box::new(RocksDBLedgerStore::open(path).into_diagnostic()?)),
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryLedgerStore::new()))
        }
        None => Ok(Box::new(InMemoryLedgerStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let store = open_store(cli.db_path)?;
    let mut ledger = LedgerService::open(store).await.into_diagnostic()?;

    match cli.command {
        Command::AddPerson { name, color } => {
            let participant = ledger.add_participant(&name, color).await.into_diagnostic()?;
            println!("Added {} ({})", participant.name, participant.id);
        }
        Command::EditPerson {
            name,
            new_name,
            color,
        } => {
            let id = ledger.participant_id(&name).into_diagnostic()?;
            let participant = ledger
                .edit_participant(
                    &id,
                    ParticipantUpdate {
                        name: new_name,
                        color,
                    },
                )
                .await
                .into_diagnostic()?;
            println!("Updated {} ({})", participant.name, participant.id);
        }
        Command::RemovePerson { name } => {
            let id = ledger.participant_id(&name).into_diagnostic()?;
            let removed = ledger.remove_participant(&id).await.into_diagnostic()?;
            println!("Removed {}", removed.name);
        }
        Command::AddExpense {
            description,
            amount,
            payer,
            split,
        } => {
            let expense = ledger
                .add_named_expense(
                    NamedExpense {
                        description,
                        amount,
                        payer,
                        participants: split,
                    },
                    false,
                )
                .await
                .into_diagnostic()?;
            println!("Added expense {}", expense.id);
        }
        Command::RemoveExpense { id } => {
            let removed = ledger
                .remove_expense(&ExpenseId::new(id))
                .await
                .into_diagnostic()?;
            println!("Removed expense {} ({})", removed.id, removed.description);
        }
        Command::List => {
            for participant in ledger.participants() {
                let color = participant.color.as_ref().map(Color::as_str).unwrap_or("-");
                println!("person,{},{},{}", participant.id, participant.name, color);
            }
            for expense in ledger.expenses() {
                let names: Vec<&str> = expense
                    .participant_ids
                    .iter()
                    .filter_map(|id| ledger.participants().iter().find(|p| p.id == *id))
                    .map(|p| p.name.as_str())
                    .collect();
                let payer = ledger
                    .participants()
                    .iter()
                    .find(|p| p.id == expense.payer_id)
                    .map(|p| p.name.as_str())
                    .unwrap_or(expense.payer_id.as_str());
                println!(
                    "expense,{},{},{},{},{}",
                    expense.id,
                    expense.description,
                    expense.amount,
                    payer,
                    names.join(";")
                );
            }
        }
        Command::Import { input, service } => {
            let file = File::open(input).into_diagnostic()?;
            let reader = ExpenseReader::new(file);
            for record in reader.records() {
                match record {
                    Ok(record) => {
                        if let Err(e) = ledger.add_named_expense(record.into(), true).await {
                            eprintln!("Error processing expense: {}", e);
                        }
                    }
                    Err(e) => {
                        eprintln!("Error reading expense: {}", e);
                    }
                }
            }
            print_summary(&ledger, service)?;
        }
        Command::Summary { service } => print_summary(&ledger, service)?,
    }

    Ok(())
}

fn print_summary(ledger: &LedgerService, service: Option<ServicePercent>) -> Result<()> {
    let summary = ledger.summary(service).into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = SummaryWriter::new(stdout.lock());
    writer.write_summary(&summary).into_diagnostic()?;
    Ok(())
}
