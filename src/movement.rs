//! Movement records: raw CSV rows and their parsed, validated form.
//!
//! A movement goes through two stages before reconciliation: the raw
//! [`MovementRecord`] is parsed into a [`MovementDraft`] whose breakdown
//! still refers to denomination labels, and the draft is resolved against
//! the account's inventory into a [`Movement`] keyed by stable row
//! positions.

use crate::error::{CashError, Result};
use crate::inventory::{Account, Inventory};
use crate::money::Money;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Largest per-row unit delta accepted from operator input. This is an
/// input sanity bound; stock validation happens in the engine.
pub const MAX_UNIT_DELTA: i32 = 20;

/// Raw movement record as read from CSV.
#[derive(Debug, Deserialize)]
pub struct MovementRecord {
    /// Affected account: cartera/wallet or diners/savings
    pub account: String,

    /// Movement kind: gasto/expense or ingreso/income
    pub kind: String,

    /// Total amount; empty or zero derives it from the breakdown
    pub amount: Option<String>,

    /// Cash physically handed over (expenses only)
    pub tendered: Option<String>,

    /// Free-text memo
    pub note: Option<String>,

    /// Whether denomination counts should be updated (defaults to true)
    pub update_stock: Option<String>,

    /// `;`-separated `label=delta` pairs, e.g. `50,00 €=+1;0,50 €=-2`
    pub breakdown: Option<String>,
}

impl MovementRecord {
    /// Parses the raw CSV record into a draft movement.
    ///
    /// Returns `None` if the record is invalid (unknown account or kind,
    /// malformed amounts, deltas outside the sanity bound).
    pub fn parse(&self) -> Option<MovementDraft> {
        let account = Account::parse(&self.account)?;
        let kind = MovementKind::parse(&self.kind)?;
        let stated_amount = parse_amount_field(self.amount.as_deref())?;
        let tendered = parse_tendered_field(self.tendered.as_deref())?;
        let update_stock = parse_flag_field(self.update_stock.as_deref())?;

        // With stock updates off the breakdown is irrelevant; drop it so
        // the engine never sees stale deltas.
        let breakdown = if update_stock {
            parse_breakdown_field(self.breakdown.as_deref())?
        } else {
            Vec::new()
        };

        Some(MovementDraft {
            account,
            kind,
            stated_amount,
            tendered,
            note: self.note.as_deref().unwrap_or("").trim().to_string(),
            update_stock,
            breakdown,
        })
    }
}

/// Strict dot-decimal amount; empty means zero, negatives are rejected.
fn parse_amount_field(field: Option<&str>) -> Option<Money> {
    let text = field.map(str::trim).unwrap_or("");
    if text.is_empty() {
        return Some(Money::ZERO);
    }
    let amount = Money::from_str(text).ok()?;
    if amount.is_negative() {
        return None;
    }
    Some(amount)
}

/// Like [`parse_amount_field`], but empty and zero both mean "not tendered".
fn parse_tendered_field(field: Option<&str>) -> Option<Option<Money>> {
    let amount = parse_amount_field(field)?;
    Some(if amount.is_zero() { None } else { Some(amount) })
}

fn parse_flag_field(field: Option<&str>) -> Option<bool> {
    match field.map(str::trim) {
        None | Some("") => Some(true),
        Some(text) => match text.to_lowercase().as_str() {
            "true" | "yes" | "si" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
    }
}

fn parse_breakdown_field(field: Option<&str>) -> Option<Vec<(String, i32)>> {
    let mut entries = Vec::new();
    let Some(text) = field else {
        return Some(entries);
    };
    for part in text.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (label, delta) = part.split_once('=')?;
        let delta: i32 = delta.trim().parse().ok()?;
        if delta < -MAX_UNIT_DELTA || delta > MAX_UNIT_DELTA {
            return None;
        }
        if delta == 0 {
            continue;
        }
        entries.push((label.trim().to_string(), delta));
    }
    Some(entries)
}

/// Expense or income.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementKind {
    /// Cash out. Recorded with a negative sign.
    Expense,

    /// Cash in. Recorded with a positive sign.
    Income,
}

impl MovementKind {
    /// Parses an operator-facing kind name.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "gasto" | "expense" => Some(MovementKind::Expense),
            "ingreso" | "income" => Some(MovementKind::Income),
            _ => None,
        }
    }

    /// Applies the sign convention to an amount.
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            MovementKind::Expense => -amount,
            MovementKind::Income => amount,
        }
    }
}

/// A parsed movement whose breakdown still refers to denomination labels.
#[derive(Debug, Clone)]
pub struct MovementDraft {
    pub account: Account,
    pub kind: MovementKind,
    pub stated_amount: Money,
    pub tendered: Option<Money>,
    pub note: String,
    pub update_stock: bool,
    pub breakdown: Vec<(String, i32)>,
}

impl MovementDraft {
    /// Resolves label-keyed breakdown entries against the account's
    /// inventory into a movement keyed by stable row positions. Deltas
    /// for the same label are summed.
    pub fn resolve(&self, inventory: &Inventory, date: NaiveDate) -> Result<Movement> {
        let mut breakdown = BTreeMap::new();
        for (label, delta) in &self.breakdown {
            let denom = inventory.find_by_label(label).ok_or_else(|| {
                CashError::UnknownDenomination {
                    label: label.clone(),
                }
            })?;
            *breakdown.entry(denom.row).or_insert(0) += delta;
        }

        Ok(Movement {
            account: self.account,
            kind: self.kind,
            date,
            stated_amount: self.stated_amount,
            tendered: self.tendered,
            note: self.note.clone(),
            update_stock: self.update_stock,
            breakdown,
        })
    }
}

/// A movement ready for reconciliation.
#[derive(Debug, Clone)]
pub struct Movement {
    /// Affected account.
    pub account: Account,

    /// Expense or income.
    pub kind: MovementKind,

    /// Transaction date, day granularity.
    pub date: NaiveDate,

    /// Operator-entered amount; zero means "derive from breakdown".
    pub stated_amount: Money,

    /// Cash physically handed over, when relevant.
    pub tendered: Option<Money>,

    /// Free-text memo. Opaque.
    pub note: String,

    /// Whether denomination counts should be updated.
    pub update_stock: bool,

    /// Signed unit deltas keyed by stable row position.
    pub breakdown: BTreeMap<usize, i32>,
}
