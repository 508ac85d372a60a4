//! Document Store
//!
//! Bulk record storage queried by (database, collection). The store is an
//! explicit session value: it is opened with [`FileDocumentStore::connect`],
//! passed to whoever needs it, and released by [`FileDocumentStore::close`]
//! or when it goes out of scope.
use crate::constants::{DOCUMENT_ID, STORE_ROOT_ENV};
use crate::data::{Cell, Column, Dataset};
use crate::errors::SensorError;
use log::{debug, info};
use serde_json::{Map, Value};
use std::env;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// A single stored record.
pub type Document = Map<String, Value>;

pub trait DocumentStore {
    /// Every document of a collection, in insertion order.
    /// An unknown collection has no documents.
    fn find(&self, database: &str, collection: &str) -> Result<Vec<Document>, SensorError>;

    /// Append documents to a collection, returning how many were written.
    fn insert_many(&self, database: &str, collection: &str, documents: Vec<Document>) -> Result<usize, SensorError>;
}

/// Document store keeping one JSON lines file per collection
/// under `<root>/<database>/<collection>.jsonl`.
#[derive(Debug)]
pub struct FileDocumentStore {
    root: PathBuf,
}

impl FileDocumentStore {
    /// Open a session on the store rooted at `root`, creating it if needed.
    pub fn connect<P: AsRef<Path>>(root: P) -> Result<Self, SensorError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .map_err(|e| SensorError::DataAccess(format!("unable to open store {}: {}", root.display(), e)))?;
        info!("Connected to document store at {}", root.display());
        Ok(FileDocumentStore { root })
    }

    /// Open the store named by the `SENSOR_STORE_ROOT` environment variable,
    /// falling back to `default_root`.
    pub fn connect_from_env<P: AsRef<Path>>(default_root: P) -> Result<Self, SensorError> {
        match env::var(STORE_ROOT_ENV) {
            Ok(root) if !root.is_empty() => Self::connect(root),
            _ => Self::connect(default_root),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// End the session.
    pub fn close(self) {}

    fn collection_path(&self, database: &str, collection: &str) -> Result<PathBuf, SensorError> {
        for (kind, name) in [("database", database), ("collection", collection)] {
            if name.is_empty() || name.contains(&['/', '\\'][..]) || name == "." || name == ".." {
                return Err(SensorError::InvalidParameter(
                    kind.to_string(),
                    "a plain name".to_string(),
                    name.to_string(),
                ));
            }
        }
        Ok(self.root.join(database).join(format!("{}.jsonl", collection)))
    }
}

impl Drop for FileDocumentStore {
    fn drop(&mut self) {
        debug!("Released document store at {}", self.root.display());
    }
}

impl DocumentStore for FileDocumentStore {
    fn find(&self, database: &str, collection: &str) -> Result<Vec<Document>, SensorError> {
        let path = self.collection_path(database, collection)?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = fs::File::open(&path).map_err(|e| SensorError::DataAccess(format!("{}: {}", path.display(), e)))?;
        let mut documents = Vec::new();
        for (line_idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| SensorError::DataAccess(format!("{}: {}", path.display(), e)))?;
            if line.trim().is_empty() {
                continue;
            }
            let doc: Document = serde_json::from_str(&line).map_err(|e| {
                SensorError::DataAccess(format!("{} line {}: {}", path.display(), line_idx + 1, e))
            })?;
            documents.push(doc);
        }
        Ok(documents)
    }

    fn insert_many(&self, database: &str, collection: &str, documents: Vec<Document>) -> Result<usize, SensorError> {
        let path = self.collection_path(database, collection)?;
        let existing = self.find(database, collection)?.len();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| SensorError::Persistence(format!("{}: {}", dir.display(), e)))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| SensorError::Persistence(format!("{}: {}", path.display(), e)))?;
        let mut writer = BufWriter::new(file);
        let n = documents.len();
        for (i, mut doc) in documents.into_iter().enumerate() {
            doc.entry(DOCUMENT_ID)
                .or_insert_with(|| Value::String(format!("{:024x}", existing + i)));
            let line = serde_json::to_string(&doc).map_err(|e| SensorError::Persistence(e.to_string()))?;
            writeln!(writer, "{}", line).map_err(|e| SensorError::Persistence(format!("{}: {}", path.display(), e)))?;
        }
        writer
            .flush()
            .map_err(|e| SensorError::Persistence(format!("{}: {}", path.display(), e)))?;
        Ok(n)
    }
}

fn value_to_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Missing,
        Value::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64().map_or(Cell::Missing, Cell::Number),
        Value::String(s) => Cell::parse(s),
        other => Cell::Text(other.to_string()),
    }
}

fn cell_to_value(cell: &Cell) -> Value {
    match cell {
        Cell::Missing => Value::Null,
        Cell::Number(v) => serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number),
        Cell::Text(s) => Value::String(s.clone()),
    }
}

/// Build a dataset from documents. Columns appear in first seen order,
/// keys absent from a document are missing values, and the synthetic
/// `_id` field is dropped.
pub fn dataset_from_documents(documents: &[Document]) -> Result<Dataset, SensorError> {
    let mut names: Vec<&str> = Vec::new();
    for doc in documents {
        for key in doc.keys() {
            if key != DOCUMENT_ID && !names.contains(&key.as_str()) {
                names.push(key.as_str());
            }
        }
    }
    if documents.iter().any(|d| d.contains_key(DOCUMENT_ID)) {
        debug!("Dropping column: {}", DOCUMENT_ID);
    }
    let columns = names
        .iter()
        .map(|name| {
            let cells = documents
                .iter()
                .map(|doc| doc.get(*name).map_or(Cell::Missing, value_to_cell))
                .collect();
            Column::new(*name, cells)
        })
        .collect();
    Dataset::new(columns)
}

/// One document per dataset row.
pub fn dataset_to_documents(dataset: &Dataset) -> Vec<Document> {
    (0..dataset.rows())
        .map(|row| {
            dataset
                .columns()
                .iter()
                .map(|c| (c.name.clone(), cell_to_value(&c.cells[row])))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_insert_and_find() {
        let dir = tempdir().unwrap();
        let store = FileDocumentStore::connect(dir.path()).unwrap();
        let docs = vec![doc(json!({"a": 1.0, "class": "neg"})), doc(json!({"a": 2.0, "class": "pos"}))];
        assert_eq!(store.insert_many("aps", "sensor", docs).unwrap(), 2);
        assert_eq!(store.insert_many("aps", "sensor", vec![doc(json!({"a": 3.0}))]).unwrap(), 1);

        let found = store.find("aps", "sensor").unwrap();
        assert_eq!(found.len(), 3);
        assert_eq!(found[0]["_id"], json!(format!("{:024x}", 0)));
        assert_eq!(found[2]["_id"], json!(format!("{:024x}", 2)));
        store.close();
    }

    #[test]
    fn test_unknown_collection_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileDocumentStore::connect(dir.path()).unwrap();
        assert!(store.find("aps", "nothing").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_path_like_names() {
        let dir = tempdir().unwrap();
        let store = FileDocumentStore::connect(dir.path()).unwrap();
        assert!(matches!(
            store.find("../aps", "sensor"),
            Err(SensorError::InvalidParameter(..))
        ));
    }

    #[test]
    fn test_dataset_from_documents_strips_id() {
        let docs = vec![
            doc(json!({"_id": "0", "a": "1.5", "b": "na", "class": "pos"})),
            doc(json!({"_id": "1", "a": 2, "class": "neg", "c": null})),
        ];
        let ds = dataset_from_documents(&docs).unwrap();
        assert_eq!(ds.column_names(), vec!["a", "b", "class", "c"]);
        assert_eq!(ds.column("a").unwrap().cells, vec![Cell::Number(1.5), Cell::Number(2.0)]);
        assert_eq!(
            ds.column("b").unwrap().cells,
            vec![Cell::Text("na".to_string()), Cell::Missing]
        );
        assert_eq!(ds.column("c").unwrap().missing_fraction(), 1.0);
    }

    #[test]
    fn test_documents_round_trip() {
        let ds = Dataset::new(vec![
            Column::new("a", vec![Cell::Number(1.0), Cell::Missing]),
            Column::new("class", vec![Cell::Text("pos".to_string()), Cell::Text("neg".to_string())]),
        ])
        .unwrap();
        let docs = dataset_to_documents(&ds);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1]["a"], Value::Null);
        assert_eq!(dataset_from_documents(&docs).unwrap(), ds);
    }
}
