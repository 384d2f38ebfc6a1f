//! Append-only movement history.
//!
//! Every registered movement becomes one immutable history row.
//! Corrections are new entries; no update or delete exists.

use crate::error::{CashError, Result};
use crate::money::Money;
use crate::store::Store;
use chrono::NaiveDate;
use log::debug;

/// Placeholder written for history fields that do not apply, so readers
/// can tell "not applicable" from zero.
pub const NOT_APPLICABLE: &str = "-";

/// Date format used in the history collection (two-digit year).
pub const DATE_FORMAT: &str = "%d/%m/%y";

/// Name fragment every history collection carries.
const HISTORY_FRAGMENT: &str = "Gastos";

/// Accepted spellings of the second fragment; one deployment carries a
/// misspelled collection name.
const HISTORY_COFRAGMENTS: [&str; 2] = ["Ingresos", "Ingresso"];

/// One immutable history row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Transaction date, day granularity.
    pub date: NaiveDate,

    /// Resolved amount, negative for expenses.
    pub signed_amount: Money,

    /// Cash handed over, when the movement was a cash payment.
    pub tendered: Option<Money>,

    /// Change owed back to the operator; negative when the payment fell short.
    pub change_due: Option<Money>,

    /// The affected account's total value after the movement.
    pub resulting_balance: Money,

    /// Free-text memo.
    pub note: String,
}

impl LedgerEntry {
    /// Renders the entry as a history row: date, amount, tendered, change
    /// due, resulting balance, note. Absent optionals become the literal
    /// [`NOT_APPLICABLE`] placeholder.
    pub fn to_row(&self) -> Vec<String> {
        let formatted = |field: Option<Money>| {
            field
                .map(|m| m.format_eur())
                .unwrap_or_else(|| NOT_APPLICABLE.to_string())
        };
        vec![
            self.date.format(DATE_FORMAT).to_string(),
            self.signed_amount.format_eur(),
            formatted(self.tendered),
            formatted(self.change_due),
            self.resulting_balance.format_eur(),
            self.note.clone(),
        ]
    }
}

/// Outcome of resolving the history collection name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryTarget {
    /// The collection to append to.
    Found(String),

    /// Nothing matched; carries every collection that does exist.
    NotFound(Vec<String>),
}

/// Resolves the history collection against the names that exist: the
/// exact configured name first, then any collection carrying the
/// recognizable name fragments. The fallback exists because the backing
/// collection has been renamed across deployments.
pub fn resolve_history_target(configured: &str, collections: &[String]) -> HistoryTarget {
    if collections.iter().any(|name| name == configured) {
        return HistoryTarget::Found(configured.to_string());
    }
    for name in collections {
        if name.contains(HISTORY_FRAGMENT)
            && HISTORY_COFRAGMENTS.iter().any(|f| name.contains(f))
        {
            return HistoryTarget::Found(name.clone());
        }
    }
    HistoryTarget::NotFound(collections.to_vec())
}

/// Appends the entry to the history collection, resolving the target name
/// first. Returns the name of the collection written to.
pub fn post<S: Store>(store: &mut S, configured: &str, entry: &LedgerEntry) -> Result<String> {
    let collections = store.list_collections()?;
    match resolve_history_target(configured, &collections) {
        HistoryTarget::Found(name) => {
            store.append_row(&name, &entry.to_row())?;
            debug!("appended history row to '{name}'");
            Ok(name)
        }
        HistoryTarget::NotFound(candidates) => Err(CashError::HistoryTargetMissing { candidates }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn entry() -> LedgerEntry {
        LedgerEntry {
            date: NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
            signed_amount: Money::parse_lenient("-32,50 €"),
            tendered: Some(Money::parse_lenient("50,00 €")),
            change_due: Some(Money::parse_lenient("17,50 €")),
            resulting_balance: Money::parse_lenient("89,50 €"),
            note: "pan".to_string(),
        }
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_to_row_formats_all_fields() {
        assert_eq!(
            entry().to_row(),
            vec!["05/08/26", "-32,50 €", "50,00 €", "17,50 €", "89,50 €", "pan"]
        );
    }

    #[test]
    fn test_to_row_uses_placeholder_for_absent_fields() {
        let mut e = entry();
        e.tendered = None;
        e.change_due = None;

        let row = e.to_row();
        assert_eq!(row[2], NOT_APPLICABLE);
        assert_eq!(row[3], NOT_APPLICABLE);
    }

    #[test]
    fn test_resolution_prefers_exact_name() {
        let candidates = names(&["Cartera", "Gastos-Ingresos", "Gastos/Ingresos"]);
        assert_eq!(
            resolve_history_target("Gastos/Ingresos", &candidates),
            HistoryTarget::Found("Gastos/Ingresos".to_string())
        );
    }

    #[test]
    fn test_resolution_falls_back_to_fragments() {
        let candidates = names(&["Cartera", "Diners", "Gastos-Ingresos 2026"]);
        assert_eq!(
            resolve_history_target("Gastos/Ingresos", &candidates),
            HistoryTarget::Found("Gastos-Ingresos 2026".to_string())
        );
    }

    #[test]
    fn test_resolution_tolerates_known_misspelling() {
        let candidates = names(&["Gastos e Ingresso"]);
        assert_eq!(
            resolve_history_target("Gastos/Ingresos", &candidates),
            HistoryTarget::Found("Gastos e Ingresso".to_string())
        );
    }

    #[test]
    fn test_resolution_reports_candidates_when_missing() {
        let candidates = names(&["Cartera", "Diners", "Gastos"]);
        assert_eq!(
            resolve_history_target("Gastos/Ingresos", &candidates),
            HistoryTarget::NotFound(candidates.clone())
        );
    }

    #[test]
    fn test_post_appends_one_row() {
        let mut store = MemoryStore::new();
        store.insert_table(
            "Gastos-Ingresos",
            [["Data", "Preu/Afegit", "Pagat", "Canvi rebut", "Total Cartera", "Notes"]],
        );

        let written = post(&mut store, "Gastos/Ingresos", &entry()).unwrap();
        assert_eq!(written, "Gastos-Ingresos");

        let table = store.read_all("Gastos-Ingresos").unwrap();
        assert_eq!(table.data_rows().len(), 1);
        assert_eq!(table.data_rows()[0][1], "-32,50 €");
    }

    #[test]
    fn test_post_fails_with_candidate_list() {
        let mut store = MemoryStore::new();
        store.insert_table("Cartera", [["Monedes", "Quantes?", "Total"]]);

        let err = post(&mut store, "Gastos/Ingresos", &entry()).unwrap_err();
        match err {
            CashError::HistoryTargetMissing { candidates } => {
                assert_eq!(candidates, vec!["Cartera"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
