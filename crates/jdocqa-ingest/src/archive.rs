use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Directory inside the extracted archive that holds the PDFs.
pub const DOCUMENTS_SUBDIR: &str = "pdf_files";

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("unsupported archive format: {}", .0.display())]
    Unsupported(PathBuf),
    #[error("no PDF files found in archive")]
    NoDocuments,
}

/// Result of archive extraction, including any warnings (e.g. size limit reached).
#[derive(Debug, Default)]
pub struct ExtractionSummary {
    /// Paths of the written PDFs, in archive order.
    pub files: Vec<PathBuf>,
    pub total_bytes: u64,
    pub warnings: Vec<String>,
}

/// Returns true if the given path looks like a supported archive.
pub fn is_archive_path(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase().ends_with(".zip"))
        .unwrap_or(false)
}

/// The documents directory under an extraction root.
pub fn documents_dir(extracted_root: &Path) -> PathBuf {
    extracted_root.join(DOCUMENTS_SUBDIR)
}

fn is_pdf_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

/// Extract the PDFs of a ZIP archive under `dest`, keeping their relative paths.
///
/// Directories, hidden files, `__MACOSX` forks, path traversal entries and
/// files not starting with `%PDF-` are skipped. `max_size` limits total
/// extracted bytes (0 = unlimited); when the limit is reached extraction stops
/// and a warning is recorded.
pub fn extract_documents(
    archive_path: &Path,
    dest: &Path,
    max_size: u64,
) -> Result<ExtractionSummary, ArchiveError> {
    let mut file = File::open(archive_path)?;
    let mut magic = [0u8; 2];
    let looks_like_zip = file.read_exact(&mut magic).is_ok() && &magic == b"PK";
    if !is_archive_path(archive_path) && !looks_like_zip {
        return Err(ArchiveError::Unsupported(archive_path.to_path_buf()));
    }

    let mut archive = zip::ZipArchive::new(File::open(archive_path)?)?;
    let mut summary = ExtractionSummary::default();

    tracing::info!(archive = %archive_path.display(), entries = archive.len(), "extracting documents");

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        let name = match entry.enclosed_name() {
            Some(p) => p.to_path_buf(),
            None => {
                tracing::debug!(entry = entry.name(), "skipping entry outside archive root");
                continue;
            }
        };
        let name_str = name.to_string_lossy().to_string();

        if entry.is_dir() || name_str.contains("__MACOSX") {
            continue;
        }
        if name
            .file_name()
            .is_none_or(|f| f.to_string_lossy().starts_with('.'))
        {
            continue;
        }
        if !is_pdf_name(&name_str) {
            continue;
        }

        if max_size > 0 && summary.total_bytes + entry.size() > max_size {
            summary.warnings.push(format!(
                "Size limit ({}MB) reached after {} files, skipping remaining",
                max_size / 1024 / 1024,
                summary.files.len()
            ));
            break;
        }

        let mut buf = Vec::new();
        entry.read_to_end(&mut buf)?;

        if !buf.starts_with(b"%PDF-") {
            tracing::debug!(entry = %name_str, "skipping entry without PDF header");
            continue;
        }

        let out_path = dest.join(&name);
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&out_path, &buf)?;

        summary.total_bytes += buf.len() as u64;
        summary.files.push(out_path);
    }

    if summary.files.is_empty() {
        return Err(ArchiveError::NoDocuments);
    }

    tracing::info!(
        files = summary.files.len(),
        bytes = summary.total_bytes,
        dest = %dest.display(),
        "documents extracted"
    );
    Ok(summary)
}
