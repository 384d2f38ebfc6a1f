//! Cashbox CLI
//!
//! Streams movement records from a CSV file and applies them to a cash
//! data directory: denomination counts are updated and every movement is
//! appended to the history collection.
//!
//! # Usage
//!
//! ```bash
//! cashbox data/ movements.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: set to `debug` or `warn` to control logging verbosity
//! - `CASHBOX_WALLET`, `CASHBOX_SAVINGS`, `CASHBOX_HISTORY`: collection name overrides
//! - `CASHBOX_USER`, `CASHBOX_PIN`: when set, `--user` and `--pin` must match

use cashbox::{
    Account, CashEngine, CashError, Config, Credentials, CsvStore, MovementRecord, Result,
    Session, Store,
};
use chrono::Local;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut positional = Vec::new();
    let mut user = None;
    let mut pin = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--user" => user = args.next(),
            "--pin" => pin = args.next(),
            _ => positional.push(arg),
        }
    }
    if positional.len() < 2 {
        return Err(CashError::MissingArgument);
    }
    let data_dir = &positional[0];
    let movements_path = &positional[1];

    let session = match Credentials::from_env() {
        Some(credentials) => credentials.verify(
            user.as_deref().unwrap_or_default(),
            pin.as_deref().unwrap_or_default(),
        )?,
        None => Session::local(),
    };

    let store = CsvStore::open(data_dir)?;
    let mut engine = CashEngine::with_config(store, Config::from_env());

    print_totals(&engine)?;
    process_movements(&mut engine, &session, movements_path)?;
    print_totals(&engine)?;

    Ok(())
}

/// Streams movement records, registering each one. Invalid records and
/// rejected movements are logged and skipped; the run continues.
fn process_movements<S: Store>(
    engine: &mut CashEngine<S>,
    session: &Session,
    path: &str,
) -> Result<()> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let today = Local::now().date_naive();

    for (row_idx, result) in reader.deserialize::<MovementRecord>().enumerate() {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Row {}: CSV parse error: {}", row_num, e);
                continue;
            }
        };
        let Some(draft) = record.parse() else {
            warn!("Row {}: invalid movement record, skipped", row_num);
            continue;
        };

        let inventory = engine.inventory(draft.account)?;
        let movement = match draft.resolve(&inventory, today) {
            Ok(movement) => movement,
            Err(e) => {
                warn!("Row {}: {}", row_num, e);
                continue;
            }
        };

        match engine.register(session, movement) {
            Ok(receipt) => {
                for warning in &receipt.warnings {
                    warn!("Row {}: {}", row_num, warning);
                }
                println!(
                    "{}  {}  balance {}  [{}]",
                    receipt.entry.date.format(cashbox::ledger::DATE_FORMAT),
                    receipt.entry.signed_amount.format_eur(),
                    receipt.entry.resulting_balance.format_eur(),
                    receipt.history_collection,
                );
                if let Some(change) = receipt.entry.change_due {
                    println!("  change due: {}", change.format_eur());
                }
            }
            Err(e) => warn!("Row {}: {}", row_num, e),
        }
    }

    Ok(())
}

fn print_totals<S: Store>(engine: &CashEngine<S>) -> Result<()> {
    let config = engine.config();
    let wallet = engine.inventory(Account::Wallet)?;
    let savings = engine.inventory(Account::Savings)?;

    for (name, inventory) in [
        (&config.wallet_collection, &wallet),
        (&config.savings_collection, &savings),
    ] {
        println!("{}: {}", name, inventory.total().format_eur());
        for row in inventory.by_value_desc() {
            debug!("  {} x{}", row.label, row.count);
        }
    }
    println!("Total: {}", (wallet.total() + savings.total()).format_eur());

    Ok(())
}
