use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

const PDF_MAGIC: &[u8] = b"%PDF-";
const CACHE_BUSTER_MARKER: &str = "?t=";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read document: {0}")]
    Io(#[from] io::Error),
    #[error("{0} is not a PDF file")]
    NotPdf(String),
    #[error("document is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
}

/// A source document handed to a question producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    path: Option<PathBuf>,
    bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            path: None,
            bytes,
        }
    }

    /// Reads a PDF no larger than `max_bytes`.
    pub fn from_path<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let size = fs::metadata(path)?.len();
        if size > max_bytes {
            return Err(DocumentError::TooLarge { size, limit: max_bytes });
        }

        let bytes = fs::read(path)?;
        if !has_pdf_extension(path) && !bytes.starts_with(PDF_MAGIC) {
            return Err(DocumentError::NotPdf(name));
        }

        Ok(Self {
            name,
            path: Some(path.to_path_buf()),
            bytes,
        })
    }

    /// Same content under a name that differs from every earlier request.
    pub fn with_cache_buster(&self) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();

        Self {
            name: format!("{}{}{}", self.display_name(), CACHE_BUSTER_MARKER, millis),
            path: self.path.clone(),
            bytes: self.bytes.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without any cache-busting suffix.
    pub fn display_name(&self) -> &str {
        strip_cache_buster(&self.name)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Size of the content in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

pub fn strip_cache_buster(name: &str) -> &str {
    match name.find(CACHE_BUSTER_MARKER) {
        Some(position) => &name[..position],
        None => name,
    }
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("pdf"))
}
