use crate::error::{Result, SnippetError};
use crate::models::snippet::{Snippet, SnippetId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// On-disk shape of one snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetRecord {
    pub id: SnippetId,
    pub title: String,
    pub language: String,
    pub code: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<&Snippet> for SnippetRecord {
    fn from(snippet: &Snippet) -> Self {
        Self {
            id: snippet.id(),
            title: snippet.title().to_string(),
            language: snippet.language().to_string(),
            code: snippet.code().to_string(),
            tags: snippet.tags_ref().iter().cloned().collect(),
            description: Some(snippet.description().to_string()),
        }
    }
}

impl SnippetRecord {
    /// Builds a validated snippet from this record, keeping the record's id.
    pub fn to_snippet(&self) -> Result<Snippet> {
        self.to_snippet_with_id(self.id)
    }

    pub fn to_snippet_with_id(&self, id: SnippetId) -> Result<Snippet> {
        Snippet::with_details(
            id,
            &self.title,
            &self.language,
            &self.code,
            &self.tags,
            self.description.as_deref(),
        )
    }
}

/// Turns a record list into bytes and back.
pub trait RecordCodec {
    fn encode(&self, records: &[SnippetRecord]) -> Result<Vec<u8>>;
    fn decode(&self, bytes: &[u8]) -> Result<Vec<SnippetRecord>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl RecordCodec for JsonCodec {
    fn encode(&self, records: &[SnippetRecord]) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(records)
            .map_err(|e| SnippetError::persistence_with("Failed to serialize snippets to JSON", e))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<SnippetRecord>> {
        serde_json::from_slice(bytes)
            .map_err(|e| SnippetError::persistence_with("Failed to parse snippets JSON", e))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl RecordCodec for YamlCodec {
    fn encode(&self, records: &[SnippetRecord]) -> Result<Vec<u8>> {
        serde_yaml::to_string(records)
            .map(String::into_bytes)
            .map_err(|e| SnippetError::persistence_with("Failed to serialize snippets to YAML", e))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<SnippetRecord>> {
        serde_yaml::from_slice(bytes)
            .map_err(|e| SnippetError::persistence_with("Failed to parse snippets YAML", e))
    }
}

/// Record encoding used for the data file and for exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    #[default]
    Json,
    Yaml,
}

impl StorageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            StorageFormat::Json => "json",
            StorageFormat::Yaml => "yaml",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(StorageFormat::Json),
            "yml" | "yaml" => Some(StorageFormat::Yaml),
            _ => None,
        }
    }

    pub fn codec(&self) -> Box<dyn RecordCodec + Send + Sync> {
        match self {
            StorageFormat::Json => Box::new(JsonCodec),
            StorageFormat::Yaml => Box::new(YamlCodec),
        }
    }
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for StorageFormat {
    type Err = SnippetError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s.trim())
            .ok_or_else(|| SnippetError::validation(format!("Unknown storage format: {}", s)))
    }
}

/// Backing store for the flattened snippet list.
pub trait SnippetPersistence: Send {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Vec<SnippetRecord>>>;

    /// Replaces the whole snapshot.
    fn save(&self, records: &[SnippetRecord]) -> Result<()>;
}

/// File-backed persistence under a data directory.
#[derive(Debug)]
pub struct StorageManager {
    data_dir: PathBuf,
    database_file: PathBuf,
    format: StorageFormat,
}

impl StorageManager {
    pub fn new(data_dir: &Path, file_name: &str, format: StorageFormat) -> Result<Self> {
        fs::create_dir_all(data_dir).map_err(|e| {
            SnippetError::persistence_with(
                format!("Failed to create data directory {}", data_dir.display()),
                e,
            )
        })?;

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            database_file: data_dir.join(file_name),
            format,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn database_file(&self) -> &Path {
        &self.database_file
    }

    pub fn format(&self) -> StorageFormat {
        self.format
    }

    /// Copies the data file to `backups/backup_<timestamp>.<ext>`.
    pub fn backup(&self) -> Result<PathBuf> {
        if !self.database_file.exists() {
            return Err(SnippetError::persistence(format!(
                "Nothing to back up: {} does not exist",
                self.database_file.display()
            )));
        }

        let backup_dir = self.data_dir.join("backups");
        fs::create_dir_all(&backup_dir)?;

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let name = format!("backup_{}.{}", timestamp, self.format.extension());
        let backup_file = backup_dir.join(name);

        fs::copy(&self.database_file, &backup_file).map_err(|e| {
            SnippetError::persistence_with("Failed to copy database file for backup", e)
        })?;
        tracing::info!("Backed up snippets to {}", backup_file.display());

        Ok(backup_file)
    }
}

impl SnippetPersistence for StorageManager {
    fn load(&self) -> Result<Option<Vec<SnippetRecord>>> {
        if !self.database_file.exists() {
            return Ok(None);
        }

        let content = fs::read(&self.database_file)
            .map_err(|e| SnippetError::persistence_with("Failed to read snippets file", e))?;
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        self.format.codec().decode(&content).map(Some)
    }

    fn save(&self, records: &[SnippetRecord]) -> Result<()> {
        let content = self.format.codec().encode(records)?;

        let mut tmp = NamedTempFile::new_in(&self.data_dir)
            .map_err(|e| SnippetError::persistence_with("Failed to create temporary file", e))?;
        tmp.write_all(&content)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| SnippetError::persistence_with("Failed to write snippets file", e))?;
        tmp.persist(&self.database_file).map_err(|e| {
            SnippetError::persistence_with("Failed to replace snippets file", e.error)
        })?;

        Ok(())
    }
}

/// In-memory persistence holding the encoded snapshot. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    bytes: Arc<Mutex<Option<Vec<u8>>>>,
    format: StorageFormat,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(format: StorageFormat) -> Self {
        Self {
            bytes: Arc::default(),
            format,
        }
    }

    /// Starts from raw bytes, as if read from a file.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Arc::new(Mutex::new(Some(bytes.into()))),
            format: StorageFormat::Json,
        }
    }

    pub fn snapshot(&self) -> Option<Vec<u8>> {
        self.bytes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SnippetPersistence for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<SnippetRecord>>> {
        match self.snapshot() {
            Some(bytes) if !bytes.iter().all(u8::is_ascii_whitespace) => {
                self.format.codec().decode(&bytes).map(Some)
            }
            _ => Ok(None),
        }
    }

    fn save(&self, records: &[SnippetRecord]) -> Result<()> {
        let encoded = self.format.codec().encode(records)?;
        *self
            .bytes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(encoded);
        Ok(())
    }
}
