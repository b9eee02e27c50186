//! jobdocs-storage-csv
//!
//! Filesystem persistence: the quote/invoice CSV dialect, per-job receipts
//! ledgers and the job-folder tree.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use jobdocs_core::{
    storage::DocumentStorage,
    time::{Clock, SystemClock},
    CoreError, DecodeMode, Decoded, ParseWarning,
};
use jobdocs_domain::Document;
use tracing::{debug, info, warn};

pub mod decoder;
pub mod encoder;
pub mod jobs;
pub mod receipts;
pub mod record;

pub use decoder::{decode_bytes, decode_str};
pub use encoder::{encode_document, encode_records};
pub use jobs::{
    apply_suffix, backup_originals, copy_logo, document_paths, quote_files, sanitize_name,
    BackupReport, FolderListing, JobFolders,
};
pub use receipts::{new_receipts_path, receipt_files, LoadedReceipts, ReceiptLedger};

const TMP_SUFFIX: &str = "tmp";

/// Reads and writes documents in the tagged-record CSV layout.
#[derive(Clone)]
pub struct CsvDocumentStorage {
    clock: Arc<dyn Clock>,
}

impl Default for CsvDocumentStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvDocumentStorage {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// The clock supplies the date used when a file has none or an unreadable one.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl DocumentStorage for CsvDocumentStorage {
    fn save_document(&self, document: &Document, path: &Path) -> Result<(), CoreError> {
        let data = encode_document(document)?;
        write_atomic(path, &data)?;
        info!(path = %path.display(), job = %document.job_id, "saved {}", document.doc_type);
        Ok(())
    }

    fn load_document(&self, path: &Path, mode: DecodeMode) -> Result<Decoded, CoreError> {
        let today = self.clock.today();
        if !path.exists() {
            warn!(path = %path.display(), "document not found, using an empty one");
            return Decoded {
                document: Document::empty(today),
                warnings: vec![ParseWarning::MissingFile {
                    path: path.to_path_buf(),
                }],
            }
            .finish(mode);
        }

        let data = fs::read(path)?;
        let decoded = decoder::decode_bytes(&data, today);
        for warning in &decoded.warnings {
            warn!(path = %path.display(), "{warning}");
        }
        debug!(
            path = %path.display(),
            lines = decoded.document.lines.len(),
            allowances = decoded.document.allowances.len(),
            "loaded document"
        );
        decoded.finish(mode)
    }
}

/// `name.csv` is staged as `name.csv.tmp`.
pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Replaces `path` as a whole: written to a temp sibling, then renamed into place.
pub fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    {
        let mut file = File::create(&tmp)?;
        file.write_all(data.as_bytes())?;
        file.flush()?;
    }
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), bytes = data.len(), "wrote file");
    Ok(())
}
