//! # Cashbox
//!
//! Tracks physical cash across two accounts (a day-to-day wallet and a
//! savings jar) as counts of individual note/coin denominations, and
//! records expenses and income in an append-only history.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: amounts carry exactly 2 decimal places via `rust_decimal`
//! - **All-or-nothing stock validation**: every denomination delta is checked before any cell is written
//! - **Append-only history**: corrections are new entries, never edits
//! - **Lenient cell parsing**: malformed monetary text degrades to zero instead of aborting a total
//!
//! ## Example
//!
//! ```no_run
//! use cashbox::{Account, CashEngine, CsvStore, Movement, MovementKind, Session};
//! use std::collections::BTreeMap;
//!
//! let store = CsvStore::open("data")?;
//! let mut engine = CashEngine::new(store);
//!
//! let movement = Movement {
//!     account: Account::Wallet,
//!     kind: MovementKind::Expense,
//!     date: chrono::Local::now().date_naive(),
//!     stated_amount: "12.50".parse()?,
//!     tendered: None,
//!     note: "groceries".to_string(),
//!     update_stock: false,
//!     breakdown: BTreeMap::new(),
//! };
//! let receipt = engine.register(&Session::local(), movement)?;
//! println!("balance: {}", receipt.entry.resulting_balance.format_eur());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod money;
pub mod movement;
pub mod store;

pub use auth::{Credentials, Session};
pub use config::Config;
pub use engine::{CashEngine, Receipt, Warning};
pub use error::{CashError, Result};
pub use inventory::{Account, DenominationRow, Inventory};
pub use ledger::{HistoryTarget, LedgerEntry};
pub use money::Money;
pub use movement::{Movement, MovementDraft, MovementKind, MovementRecord};
pub use store::{CsvStore, MemoryStore, Store, Table};
