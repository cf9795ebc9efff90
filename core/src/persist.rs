use crate::eval::GroundTruthEntry;
use crate::{Document, InvertedIndex};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub created_at: String,
    pub version: u32,
}

/// Layout of a data directory produced by the indexer.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub root: PathBuf,
}

impl DataPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn corpus(&self) -> PathBuf { self.root.join("processed_hotel_data.json") }
    pub fn index(&self) -> PathBuf { self.root.join("inverted_index.json") }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(value)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            create_dir_all(dir)?;
        }
    }
    let f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, value)?;
    w.flush()?;
    Ok(())
}

pub fn save_corpus(paths: &DataPaths, corpus: &[Document]) -> Result<()> {
    write_json(&paths.corpus(), corpus)
}

pub fn load_corpus(paths: &DataPaths) -> Result<Vec<Document>> {
    read_json(&paths.corpus())
}

pub fn save_index(paths: &DataPaths, index: &InvertedIndex) -> Result<()> {
    write_json(&paths.index(), index)
}

/// Posting lists are re-sorted on load; files written by other producers are
/// not assumed to be ordered.
pub fn load_index(paths: &DataPaths) -> Result<InvertedIndex> {
    read_json(&paths.index())
}

pub fn save_meta(paths: &DataPaths, meta: &MetaFile) -> Result<()> {
    write_json(&paths.meta(), meta)
}

pub fn load_meta(paths: &DataPaths) -> Result<Option<MetaFile>> {
    let path = paths.meta();
    if !path.exists() {
        return Ok(None);
    }
    read_json(&path).map(Some)
}

/// Ground truth is written as a list but read in either the list form or the
/// `{query: [names]}` map form. Map entries come back ordered by query.
#[derive(Deserialize)]
#[serde(untagged)]
enum GroundTruthFile {
    List(Vec<GroundTruthEntry>),
    Map(BTreeMap<String, Vec<String>>),
}

pub fn load_ground_truth(path: &Path) -> Result<Vec<GroundTruthEntry>> {
    let entries = match read_json::<GroundTruthFile>(path)? {
        GroundTruthFile::List(entries) => entries,
        GroundTruthFile::Map(map) => map
            .into_iter()
            .map(|(query, relevant_documents)| GroundTruthEntry { query, relevant_documents })
            .collect(),
    };
    Ok(entries)
}

pub fn save_ground_truth(path: &Path, entries: &[GroundTruthEntry]) -> Result<()> {
    write_json(path, entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn ground_truth_map_form_is_normalized() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ground_truth.json");
        std::fs::write(&path, r#"{"spa OR pool": ["Harbor Inn"], "bar": []}"#).unwrap();
        let entries = load_ground_truth(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].query, "bar");
        assert_eq!(entries[1].relevant_documents, vec!["Harbor Inn".to_string()]);
    }

    #[test]
    fn missing_meta_is_not_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_meta(&DataPaths::new(dir.path())).unwrap().is_none());
    }
}
