//! Accounts and their denomination inventories.
//!
//! An account's value is never stored; it is always derived from the unit
//! counts of its denomination rows.

use crate::error::Result;
use crate::money::Money;
use crate::store::{Store, Table};
use std::fmt;

/// Label marking a row whose denomination is unknown. Such rows are
/// excluded from every computation.
pub const UNKNOWN_LABEL: &str = "???";

/// One of the two cash accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Account {
    /// Day-to-day cash.
    Wallet,
    /// The savings jar.
    Savings,
}

impl Account {
    /// Parses an operator-facing account name. Accepts the deployed
    /// collection names as well as the English aliases.
    pub fn parse(text: &str) -> Option<Account> {
        match text.trim().to_lowercase().as_str() {
            "cartera" | "wallet" => Some(Account::Wallet),
            "diners" | "savings" => Some(Account::Savings),
            _ => None,
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Account::Wallet => write!(f, "wallet"),
            Account::Savings => write!(f, "savings"),
        }
    }
}

/// One denomination row of an account's inventory.
#[derive(Debug, Clone)]
pub struct DenominationRow {
    /// 0-based position within the collection's data rows; the row's
    /// stable identity.
    pub row: usize,

    /// Display identifier, e.g. `"50,00 €"`. Opaque text.
    pub label: String,

    /// Value of one unit, parsed leniently from the label.
    pub face_value: Money,

    /// Units on hand.
    pub count: u32,
}

impl DenominationRow {
    /// Whether this row takes part in totals and stock mutation.
    pub fn is_tracked(&self) -> bool {
        !self.label.is_empty() && self.label != UNKNOWN_LABEL
    }

    /// Current monetary value of this row's units.
    pub fn subtotal(&self) -> Money {
        self.face_value.times(self.count as i64)
    }
}

/// An account's denomination rows, in stored order.
#[derive(Debug, Clone)]
pub struct Inventory {
    rows: Vec<DenominationRow>,
}

impl Inventory {
    /// Builds an inventory from a collection table: label in column 1,
    /// unit count in column 2. Counts that fail to parse as a
    /// non-negative integer contribute zero.
    pub fn from_table(table: &Table) -> Self {
        let rows = table
            .data_rows()
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                let label = cells
                    .first()
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default();
                let count = cells
                    .get(1)
                    .and_then(|c| c.trim().parse::<u32>().ok())
                    .unwrap_or(0);
                let face_value = Money::parse_lenient(&label);
                DenominationRow {
                    row,
                    label,
                    face_value,
                    count,
                }
            })
            .collect();
        Inventory { rows }
    }

    /// Reads the inventory behind a collection name.
    pub fn load<S: Store>(store: &S, collection: &str) -> Result<Self> {
        Ok(Inventory::from_table(&store.read_all(collection)?))
    }

    /// All rows in stored order.
    pub fn rows(&self) -> &[DenominationRow] {
        &self.rows
    }

    /// The row at a stable position, if present.
    pub fn get(&self, row: usize) -> Option<&DenominationRow> {
        self.rows.get(row)
    }

    /// Finds a tracked row by its label.
    pub fn find_by_label(&self, label: &str) -> Option<&DenominationRow> {
        let label = label.trim();
        self.rows.iter().find(|r| r.is_tracked() && r.label == label)
    }

    /// Total value: face value times unit count summed over tracked rows.
    pub fn total(&self) -> Money {
        self.rows
            .iter()
            .filter(|r| r.is_tracked())
            .fold(Money::ZERO, |acc, r| acc + r.subtotal())
    }

    /// Rows ordered by face value, highest first (display order).
    pub fn by_value_desc(&self) -> Vec<&DenominationRow> {
        let mut rows: Vec<&DenominationRow> = self.rows.iter().filter(|r| r.is_tracked()).collect();
        rows.sort_by(|a, b| b.face_value.cmp(&a.face_value));
        rows
    }
}
