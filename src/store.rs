//! Named-collection tabular storage.
//!
//! Inventories and the movement history live in named collections of
//! ordered rows. Cell addressing is 1-indexed: the header occupies row 1,
//! the first data row is row 2. Two implementations are provided: an
//! in-memory store for tests and a directory of CSV files for the CLI.

use crate::error::{CashError, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// A collection's full contents: the header row followed by data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// All rows in stored order, header included.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// The rows below the header.
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Sets a 1-indexed cell, padding the row with empty cells when the
    /// column does not exist yet. Returns `false` when the address is
    /// outside the stored rows.
    fn set_cell(&mut self, row: usize, col: usize, value: &str) -> bool {
        if row == 0 || col == 0 || row > self.rows.len() {
            return false;
        }
        let cells = &mut self.rows[row - 1];
        if cells.len() < col {
            cells.resize(col, String::new());
        }
        cells[col - 1] = value.to_string();
        true
    }
}

/// Contract for the backing tabular service.
pub trait Store {
    /// Reads a collection's rows, header first.
    fn read_all(&self, collection: &str) -> Result<Table>;

    /// Writes one cell. 1-indexed; the header is row 1, data starts at row 2.
    fn update_cell(&mut self, collection: &str, row: usize, col: usize, value: &str) -> Result<()>;

    /// Appends a row at the end of a collection.
    fn append_row(&mut self, collection: &str, values: &[String]) -> Result<()>;

    /// Names of all collections, sorted.
    fn list_collections(&self) -> Result<Vec<String>>;
}

/// In-memory store used by tests and embedding callers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: BTreeMap<String, Table>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Inserts (or replaces) a collection from literal rows, header first.
    pub fn insert_table<I, R, V>(&mut self, name: &str, rows: I)
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        self.tables.insert(name.to_string(), Table { rows });
    }
}

impl Store for MemoryStore {
    fn read_all(&self, collection: &str) -> Result<Table> {
        self.tables
            .get(collection)
            .cloned()
            .ok_or_else(|| CashError::CollectionNotFound(collection.to_string()))
    }

    fn update_cell(&mut self, collection: &str, row: usize, col: usize, value: &str) -> Result<()> {
        let table = self
            .tables
            .get_mut(collection)
            .ok_or_else(|| CashError::CollectionNotFound(collection.to_string()))?;
        if !table.set_cell(row, col, value) {
            return Err(CashError::CellOutOfRange {
                collection: collection.to_string(),
                row,
                col,
            });
        }
        Ok(())
    }

    fn append_row(&mut self, collection: &str, values: &[String]) -> Result<()> {
        let table = self
            .tables
            .get_mut(collection)
            .ok_or_else(|| CashError::CollectionNotFound(collection.to_string()))?;
        table.rows.push(values.to_vec());
        Ok(())
    }

    fn list_collections(&self) -> Result<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }
}

/// A directory of `<collection>.csv` files.
///
/// The collection name is the file stem, so a deployed name containing a
/// path separator (the history collection) lands on disk under a close
/// variant and is found by the fuzzy history resolution.
#[derive(Debug)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    /// Opens an existing data directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(CashError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("data directory '{}' not found", dir.display()),
            )));
        }
        Ok(CsvStore { dir })
    }

    fn path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.csv"))
    }

    fn load(&self, collection: &str) -> Result<Table> {
        let path = self.path(collection);
        if !path.is_file() {
            return Err(CashError::CollectionNotFound(collection.to_string()));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(BufReader::new(File::open(&path)?));

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Table { rows })
    }

    fn save(&self, collection: &str, table: &Table) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .from_path(self.path(collection))?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Store for CsvStore {
    fn read_all(&self, collection: &str) -> Result<Table> {
        self.load(collection)
    }

    fn update_cell(&mut self, collection: &str, row: usize, col: usize, value: &str) -> Result<()> {
        let mut table = self.load(collection)?;
        if !table.set_cell(row, col, value) {
            return Err(CashError::CellOutOfRange {
                collection: collection.to_string(),
                row,
                col,
            });
        }
        self.save(collection, &table)
    }

    fn append_row(&mut self, collection: &str, values: &[String]) -> Result<()> {
        let mut table = self.load(collection)?;
        table.rows.push(values.to_vec());
        self.save(collection, &table)
    }

    fn list_collections(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_memory() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert_table(
            "Cartera",
            [
                ["Monedes", "Quantes?", "Total"],
                ["50,00 €", "2", "100,00 €"],
                ["0,50 €", "4", "2,00 €"],
            ],
        );
        store
    }

    #[test]
    fn test_read_all_returns_header_and_data() {
        let store = seeded_memory();
        let table = store.read_all("Cartera").unwrap();

        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0][0], "Monedes");
        assert_eq!(table.data_rows().len(), 2);
        assert_eq!(table.data_rows()[1][0], "0,50 €");
    }

    #[test]
    fn test_read_all_missing_collection() {
        let store = seeded_memory();
        let err = store.read_all("Diners").unwrap_err();
        assert!(matches!(err, CashError::CollectionNotFound(name) if name == "Diners"));
    }

    #[test]
    fn test_update_cell_is_one_indexed_with_header_row() {
        let mut store = seeded_memory();
        store.update_cell("Cartera", 2, 2, "1").unwrap();

        let table = store.read_all("Cartera").unwrap();
        assert_eq!(table.data_rows()[0][1], "1");
        assert_eq!(table.rows[0][1], "Quantes?");
    }

    #[test]
    fn test_update_cell_out_of_range() {
        let mut store = seeded_memory();
        let err = store.update_cell("Cartera", 9, 2, "1").unwrap_err();
        assert!(matches!(err, CashError::CellOutOfRange { row: 9, .. }));

        let err = store.update_cell("Cartera", 0, 2, "1").unwrap_err();
        assert!(matches!(err, CashError::CellOutOfRange { row: 0, .. }));
    }

    #[test]
    fn test_update_cell_pads_missing_columns() {
        let mut store = MemoryStore::new();
        store.insert_table("Cartera", [vec!["Monedes"], vec!["50,00 €"]]);
        store.update_cell("Cartera", 2, 3, "x").unwrap();

        let table = store.read_all("Cartera").unwrap();
        assert_eq!(table.data_rows()[0], vec!["50,00 €", "", "x"]);
    }

    #[test]
    fn test_append_row_keeps_order() {
        let mut store = seeded_memory();
        store
            .append_row("Cartera", &["5,00 €".to_string(), "1".to_string()])
            .unwrap();

        let table = store.read_all("Cartera").unwrap();
        assert_eq!(table.rows.last().unwrap()[0], "5,00 €");
    }

    #[test]
    fn test_list_collections_sorted() {
        let mut store = seeded_memory();
        store.insert_table("Diners", [["Monedes", "Quantes?", "Total"]]);
        assert_eq!(store.list_collections().unwrap(), vec!["Cartera", "Diners"]);
    }

    #[test]
    fn test_csv_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Cartera.csv"),
            "Monedes,Quantes?,Total\n\"50,00 €\",2,\"100,00 €\"\n",
        )
        .unwrap();

        let mut store = CsvStore::open(dir.path()).unwrap();
        let table = store.read_all("Cartera").unwrap();
        assert_eq!(table.data_rows()[0], vec!["50,00 €", "2", "100,00 €"]);

        store.update_cell("Cartera", 2, 2, "3").unwrap();
        store
            .append_row("Cartera", &["0,50 €".into(), "4".into(), "2,00 €".into()])
            .unwrap();

        let table = store.read_all("Cartera").unwrap();
        assert_eq!(table.data_rows()[0][1], "3");
        assert_eq!(table.data_rows()[1][0], "0,50 €");
    }

    #[test]
    fn test_csv_store_lists_file_stems() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Diners.csv"), "Monedes,Quantes?,Total\n").unwrap();
        fs::write(dir.path().join("Cartera.csv"), "Monedes,Quantes?,Total\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let store = CsvStore::open(dir.path()).unwrap();
        assert_eq!(store.list_collections().unwrap(), vec!["Cartera", "Diners"]);
    }

    #[test]
    fn test_csv_store_missing_directory() {
        assert!(CsvStore::open("/no/such/dir").is_err());
    }
}
