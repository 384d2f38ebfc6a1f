//! Core reconciliation engine.
//!
//! Resolves a movement's final amount, validates the whole denomination
//! breakdown against current stock before touching anything, applies the
//! count updates, and appends one history row.
//!
//! Validation is all-or-nothing across the breakdown set: no cell is
//! written until every touched row has been checked. History posting
//! happens after stock mutation; a missing history target is therefore
//! reported without rolling stock back (the operator reconciles by hand,
//! guided by the candidate list the error carries).

use crate::auth::Session;
use crate::config::Config;
use crate::error::{CashError, Result};
use crate::inventory::{Account, DenominationRow, Inventory};
use crate::ledger::{self, LedgerEntry};
use crate::money::Money;
use crate::movement::{Movement, MovementKind};
use crate::store::Store;
use log::{debug, warn};
use std::fmt;

/// Non-fatal conditions surfaced alongside a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A stock update was requested but no denominations were marked;
    /// only the history was written.
    HistoryOnly,

    /// The cash handed over does not cover the amount.
    InsufficientTender { shortfall: Money },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::HistoryOnly => {
                write!(f, "no denominations marked; history updated but stock left untouched")
            }
            Warning::InsufficientTender { shortfall } => {
                write!(f, "payment short by {}", shortfall.format_eur())
            }
        }
    }
}

/// The outcome of a successful registration.
#[derive(Debug, Clone)]
pub struct Receipt {
    /// The history row that was appended.
    pub entry: LedgerEntry,

    /// Collection the entry was appended to (may differ from the
    /// configured name after fuzzy resolution).
    pub history_collection: String,

    /// Monetary value of the stock that actually moved, signed.
    pub stock_delta: Money,

    /// Non-fatal conditions the operator should see.
    pub warnings: Vec<Warning>,
}

/// A validated count update, held back until the whole breakdown passes.
struct RowUpdate {
    row: usize,
    new_count: u32,
    subtotal: Money,
}

/// Denomination reconciliation and ledger-posting engine.
///
/// Holds the backing store and the collection configuration. One engine
/// serves one operator at a time; there is no optimistic-concurrency
/// protection on the rows it updates.
pub struct CashEngine<S: Store> {
    store: S,
    config: Config,
}

impl<S: Store> CashEngine<S> {
    /// Creates an engine over a store with the default collection names.
    pub fn new(store: S) -> Self {
        CashEngine::with_config(store, Config::default())
    }

    /// Creates an engine with explicit collection names.
    pub fn with_config(store: S, config: Config) -> Self {
        CashEngine { store, config }
    }

    /// The collection configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Borrow of the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the current inventory of an account.
    pub fn inventory(&self, account: Account) -> Result<Inventory> {
        Inventory::load(&self.store, self.config.collection_for(account))
    }

    /// An account's derived total value.
    pub fn account_total(&self, account: Account) -> Result<Money> {
        Ok(self.inventory(account)?.total())
    }

    /// Wallet and savings combined.
    pub fn grand_total(&self) -> Result<Money> {
        Ok(self.account_total(Account::Wallet)? + self.account_total(Account::Savings)?)
    }

    /// Registers a movement: resolves the final amount, validates and
    /// applies the stock changes, and appends the history row.
    ///
    /// [`CashError::InvalidAmount`] and [`CashError::InsufficientStock`]
    /// are raised before any write; nothing is mutated on those paths.
    pub fn register(&mut self, session: &Session, movement: Movement) -> Result<Receipt> {
        let collection = self.config.collection_for(movement.account).to_string();
        let inventory = Inventory::load(&self.store, &collection)?;
        let prior_total = inventory.total();

        let mut warnings = Vec::new();

        // Value of the units moved, independent of direction: the operator
        // marks "N units of denomination X changed", not a signed amount.
        let mut breakdown_value = Money::ZERO;
        let mut touched: Vec<(&DenominationRow, i32)> = Vec::new();
        if movement.update_stock {
            for (&row, &delta) in &movement.breakdown {
                let Some(denom) = inventory.get(row) else {
                    warn!("breakdown references missing row {row} in '{collection}'; skipped");
                    continue;
                };
                if !denom.is_tracked() {
                    warn!(
                        "breakdown references untracked row {row} in '{collection}'; skipped"
                    );
                    continue;
                }
                if delta == 0 {
                    continue;
                }
                breakdown_value += denom.face_value.times(i64::from(delta.unsigned_abs()));
                touched.push((denom, delta));
            }
        }

        let final_amount = if !movement.stated_amount.is_zero() {
            movement.stated_amount
        } else if !breakdown_value.is_zero() {
            debug!("amount derived from breakdown: {}", breakdown_value.format_eur());
            breakdown_value
        } else {
            return Err(CashError::InvalidAmount);
        };

        // Validate every touched row before writing any of them.
        let mut updates: Vec<RowUpdate> = Vec::with_capacity(touched.len());
        let mut stock_delta = Money::ZERO;
        for (denom, delta) in &touched {
            // The operator marks units moved; for an expense they leave
            // the account, for an income they come in.
            let real_delta = match movement.kind {
                MovementKind::Income => *delta,
                MovementKind::Expense => -*delta,
            };
            let new_count = i64::from(denom.count) + i64::from(real_delta);
            if new_count < 0 {
                return Err(CashError::InsufficientStock {
                    account: collection.clone(),
                    label: denom.label.clone(),
                    have: denom.count,
                    need: real_delta.unsigned_abs(),
                });
            }
            stock_delta += denom.face_value.times(i64::from(real_delta));
            updates.push(RowUpdate {
                row: denom.row,
                new_count: new_count as u32,
                subtotal: denom.face_value.times(new_count),
            });
        }

        if movement.update_stock && touched.is_empty() {
            warn!("stock update requested but no denominations marked; registering history only");
            warnings.push(Warning::HistoryOnly);
        }

        for update in &updates {
            // Header occupies row 1; counts live in column 2, the
            // denormalized subtotal in column 3.
            self.store
                .update_cell(&collection, update.row + 2, 2, &update.new_count.to_string())?;
            self.store
                .update_cell(&collection, update.row + 2, 3, &update.subtotal.format_eur())?;
            debug!(
                "'{collection}' row {}: count set to {}",
                update.row, update.new_count
            );
        }

        // Change only makes sense for a cash payment on an expense.
        let tendered = match movement.kind {
            MovementKind::Expense => movement.tendered.filter(|t| !t.is_zero()),
            MovementKind::Income => None,
        };
        let change_due = tendered.map(|t| {
            let change = t - final_amount;
            if change.is_negative() {
                warn!(
                    "tendered {} does not cover {}",
                    t.format_eur(),
                    final_amount.format_eur()
                );
                warnings.push(Warning::InsufficientTender { shortfall: -change });
            }
            change
        });

        let signed_amount = movement.kind.signed(final_amount);
        let resulting_balance = prior_total + signed_amount;

        let entry = LedgerEntry {
            date: movement.date,
            signed_amount,
            tendered,
            change_due,
            resulting_balance,
            note: movement.note.clone(),
        };

        let history_collection = ledger::post(&mut self.store, &self.config.history_collection, &entry)?;

        debug!(
            "{} registered {} on '{collection}', balance {}",
            session.user(),
            signed_amount.format_eur(),
            resulting_balance.format_eur()
        );

        Ok(Receipt {
            entry,
            history_collection,
            stock_delta,
            warnings,
        })
    }
}
