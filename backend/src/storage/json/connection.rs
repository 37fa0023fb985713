//! JSON storage connection: base-directory handle plus the shared
//! read/write machinery for the per-collection document files.

use anyhow::{Context, Result};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Version tag written into every persisted document so future field
/// additions can be migrated.
pub const DATA_FORMAT_VERSION: &str = "1.0";

/// Envelope wrapping each persisted collection.
#[derive(Debug, Serialize, Deserialize)]
pub struct Document<T> {
    pub data_format_version: String,
    pub records: T,
}

/// JsonConnection manages the data directory holding the four
/// collection documents (config, members, expenses, attrition).
#[derive(Clone)]
pub struct JsonConnection {
    base_directory: PathBuf,
}

impl JsonConnection {
    /// Create a new JSON connection with a base directory, creating the
    /// directory if needed.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {:?}", base_path))?;
        }

        Ok(Self { base_directory: base_path })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    fn document_path(&self, name: &str) -> PathBuf {
        self.base_directory.join(name)
    }

    /// Read a named document. A missing file yields None so callers can
    /// fall back to an empty collection or default config.
    pub fn read_document<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.document_path(name);
        if !path.exists() {
            debug!("Document {} not found, treating as empty", name);
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        let document: Document<T> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;

        debug!(
            "Loaded {} (format version {})",
            name, document.data_format_version
        );
        Ok(Some(document.records))
    }

    /// Write a named document atomically: write to a temp file in the
    /// same directory, then rename over the target.
    pub fn write_document<T: Serialize>(&self, name: &str, records: &T) -> Result<()> {
        let path = self.document_path(name);
        let document = Document {
            data_format_version: DATA_FORMAT_VERSION.to_string(),
            records,
        };

        let json = serde_json::to_string_pretty(&document)
            .with_context(|| format!("Failed to serialize {}", name))?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, json)
            .with_context(|| format!("Failed to write {:?}", temp_path))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace {:?}", path))?;

        debug!("Saved {}", name);
        Ok(())
    }
}
