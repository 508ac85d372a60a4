//! Dataset sources: delimited text files and document store collections.
use crate::data::{Cell, Column, Dataset};
use crate::errors::SensorError;
use crate::store::{dataset_from_documents, DocumentStore};
use log::info;
use std::path::{Path, PathBuf};

pub trait DatasetSource {
    fn load(&self) -> Result<Dataset, SensorError>;
}

/// Read a comma separated file with a header row.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Dataset, SensorError> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| SensorError::DataAccess(format!("{}: {}", path.display(), e)))?;
    let headers = reader
        .headers()
        .map_err(|e| SensorError::DataAccess(format!("{}: {}", path.display(), e)))?
        .clone();
    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result.map_err(|e| SensorError::DataAccess(format!("{}: {}", path.display(), e)))?;
        for (i, field) in record.iter().enumerate() {
            cells[i].push(Cell::parse(field));
        }
    }
    let columns = headers
        .iter()
        .zip(cells)
        .map(|(name, cells)| Column::new(name, cells))
        .collect();
    let dataset = Dataset::new(columns).map_err(|e| match e {
        SensorError::DataAccess(msg) => SensorError::DataAccess(format!("{}: {}", path.display(), msg)),
        e => e,
    })?;
    info!(
        "Read {} rows and {} columns from {}",
        dataset.rows(),
        dataset.cols(),
        path.display()
    );
    Ok(dataset)
}

/// Write a dataset as a comma separated file with a header row.
pub fn write_csv<P: AsRef<Path>>(path: P, dataset: &Dataset) -> Result<(), SensorError> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|e| SensorError::Persistence(format!("{}: {}", dir.display(), e)))?;
        }
    }
    let to_err = |e: csv::Error| SensorError::Persistence(format!("{}: {}", path.display(), e));
    let mut writer = csv::Writer::from_path(path).map_err(to_err)?;
    writer.write_record(dataset.column_names()).map_err(to_err)?;
    for row in 0..dataset.rows() {
        writer
            .write_record(dataset.columns().iter().map(|c| c.cells[row].to_string()))
            .map_err(to_err)?;
    }
    writer
        .flush()
        .map_err(|e| SensorError::Persistence(format!("{}: {}", path.display(), e)))
}

/// A delimited text file.
#[derive(Debug, Clone)]
pub struct CsvSource {
    pub path: PathBuf,
}

impl CsvSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        CsvSource { path: path.into() }
    }
}

impl DatasetSource for CsvSource {
    fn load(&self) -> Result<Dataset, SensorError> {
        read_csv(&self.path)
    }
}

/// A named collection of an injected document store.
pub struct CollectionSource<'a, S: DocumentStore> {
    store: &'a S,
    pub database: String,
    pub collection: String,
}

impl<'a, S: DocumentStore> CollectionSource<'a, S> {
    pub fn new(store: &'a S, database: &str, collection: &str) -> Self {
        CollectionSource {
            store,
            database: database.to_string(),
            collection: collection.to_string(),
        }
    }
}

impl<'a, S: DocumentStore> DatasetSource for CollectionSource<'a, S> {
    fn load(&self) -> Result<Dataset, SensorError> {
        info!(
            "Reading data from database: [{}] and collection: [{}]",
            self.database, self.collection
        );
        let documents = self.store.find(&self.database, &self.collection)?;
        if documents.is_empty() {
            return Err(SensorError::DataAccess(format!(
                "collection {}.{} holds no documents",
                self.database, self.collection
            )));
        }
        let dataset = dataset_from_documents(&documents)?;
        info!("Found columns: {:?}", dataset.column_names());
        info!("Rows and columns in dataset: ({}, {})", dataset.rows(), dataset.cols());
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{dataset_to_documents, FileDocumentStore};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("base.csv");
        fs::write(&path, "class,aa_000,ab_000\nneg,76698,na\npos,33058,\n").unwrap();
        let ds = CsvSource::new(&path).load().unwrap();
        assert_eq!(ds.column_names(), vec!["class", "aa_000", "ab_000"]);
        assert_eq!(ds.rows(), 2);
        assert_eq!(ds.column("aa_000").unwrap().cells[1], Cell::Number(33058.0));
        assert_eq!(ds.column("ab_000").unwrap().cells[0], Cell::Text("na".to_string()));
        assert_eq!(ds.column("ab_000").unwrap().cells[1], Cell::Missing);
    }

    #[test]
    fn test_read_csv_missing_file() {
        let dir = tempdir().unwrap();
        let res = read_csv(dir.path().join("nothing.csv"));
        assert!(matches!(res, Err(SensorError::DataAccess(_))));
    }

    #[test]
    fn test_read_csv_ragged_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "a,b\n1,2\n3\n").unwrap();
        assert!(matches!(read_csv(&path), Err(SensorError::DataAccess(_))));
    }

    #[test]
    fn test_write_then_read_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("data.csv");
        let ds = Dataset::new(vec![
            Column::new("a", vec![Cell::Number(1.5), Cell::Missing]),
            Column::new("class", vec![Cell::Text("pos".to_string()), Cell::Text("neg".to_string())]),
        ])
        .unwrap();
        write_csv(&path, &ds).unwrap();
        assert_eq!(read_csv(&path).unwrap(), ds);
    }

    #[test]
    fn test_collection_source() {
        let dir = tempdir().unwrap();
        let store = FileDocumentStore::connect(dir.path()).unwrap();
        let ds = Dataset::new(vec![
            Column::new("a", vec![Cell::Number(1.0), Cell::Number(2.0)]),
            Column::new("class", vec![Cell::Text("pos".to_string()), Cell::Text("neg".to_string())]),
        ])
        .unwrap();
        store.insert_many("aps", "sensor", dataset_to_documents(&ds)).unwrap();

        let loaded = CollectionSource::new(&store, "aps", "sensor").load().unwrap();
        assert_eq!(loaded, ds);
        assert!(!loaded.has_column("_id"));

        let empty = CollectionSource::new(&store, "aps", "other").load();
        assert!(matches!(empty, Err(SensorError::DataAccess(_))));
    }
}
