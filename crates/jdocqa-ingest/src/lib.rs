use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

pub mod archive;

// Re-export domain types for convenience
pub use jdocqa_core::{LoaderConfig, NormalizeError, NormalizedRecord, RawRecord};
// Re-export archive API
pub use archive::{ArchiveError, ExtractionSummary, documents_dir, extract_documents, is_archive_path};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read line {line}: {source}")]
    Read { line: usize, source: std::io::Error },
    #[error("malformed JSON on line {line}: {source}")]
    MalformedJson {
        line: usize,
        source: serde_json::Error,
    },
    #[error("line {line}: {source}")]
    Record {
        line: usize,
        source: NormalizeError,
    },
    #[error("unknown split {0:?} (expected train, validation or test)")]
    UnknownSplit(String),
}

/// One of the three partitions of the annotation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Validation,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Validation, Split::Test];

    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Validation => "validation",
            Split::Test => "test",
        }
    }

    /// File name of this split's annotation file.
    pub fn annotation_filename(self) -> String {
        format!("jdocqa_{}_all.json", self.as_str())
    }

    /// Where the annotation file is published.
    pub fn source_url(self) -> &'static str {
        match self {
            Split::Train => jdocqa_core::schema::TRAIN_ANNOTATIONS_URL,
            Split::Validation => jdocqa_core::schema::VALIDATION_ANNOTATIONS_URL,
            Split::Test => jdocqa_core::schema::TEST_ANNOTATIONS_URL,
        }
    }

    /// Number of records in the published annotation file.
    pub fn expected_num_rows(self) -> usize {
        match self {
            Split::Train => 9290,
            Split::Validation => 1134,
            Split::Test => 1176,
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "train" => Ok(Split::Train),
            "validation" | "valid" | "val" => Ok(Split::Validation),
            "test" => Ok(Split::Test),
            _ => Err(IngestError::UnknownSplit(s.to_string())),
        }
    }
}

/// Local directories holding the annotation files and the extracted PDFs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    pub annotations_dir: PathBuf,
    pub documents_dir: PathBuf,
}

/// Inputs for generating one split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSource {
    pub split: Split,
    pub annotation_path: PathBuf,
    pub documents_dir: PathBuf,
}

impl DatasetLayout {
    pub fn new(annotations_dir: impl Into<PathBuf>, documents_dir: impl Into<PathBuf>) -> Self {
        Self {
            annotations_dir: annotations_dir.into(),
            documents_dir: documents_dir.into(),
        }
    }

    pub fn split_source(&self, split: Split) -> SplitSource {
        SplitSource {
            split,
            annotation_path: self.annotations_dir.join(split.annotation_filename()),
            documents_dir: self.documents_dir.clone(),
        }
    }

    /// Train, validation and test sources, in that order.
    pub fn split_sources(&self) -> Vec<SplitSource> {
        Split::ALL.iter().map(|&s| self.split_source(s)).collect()
    }
}

/// Lazy iterator over `(index, record)` pairs of one annotation file.
///
/// `index` is the zero-based line number. The iterator stops for good after
/// the first error; the underlying reader is released when it is dropped.
pub struct Examples<R> {
    lines: Lines<R>,
    documents_dir: PathBuf,
    config: LoaderConfig,
    index: usize,
    failed: bool,
}

impl<R: BufRead> Examples<R> {
    pub fn new(reader: R, documents_dir: impl Into<PathBuf>, config: LoaderConfig) -> Self {
        Self {
            lines: reader.lines(),
            documents_dir: documents_dir.into(),
            config,
            index: 0,
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for Examples<R> {
    type Item = Result<(usize, NormalizedRecord), IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let index = self.index;
        let result = match self.lines.next()? {
            Ok(line) => parse_line(&line, index, &self.documents_dir, self.config),
            Err(source) => Err(IngestError::Read {
                line: index + 1,
                source,
            }),
        };
        self.index += 1;

        match result {
            Ok(record) => Some(Ok((index, record))),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> FusedIterator for Examples<R> {}

/// Decode and normalize one annotation line. Errors report 1-based line numbers.
fn parse_line(
    line: &str,
    index: usize,
    documents_dir: &Path,
    config: LoaderConfig,
) -> Result<NormalizedRecord, IngestError> {
    let raw: RawRecord = serde_json::from_str(line).map_err(|source| IngestError::MalformedJson {
        line: index + 1,
        source,
    })?;
    jdocqa_core::normalize_record(&raw, documents_dir, config.rename_pdf_category).map_err(
        |source| IngestError::Record {
            line: index + 1,
            source,
        },
    )
}

/// Open an annotation file and return its lazy example iterator.
pub fn generate_examples(
    annotation_path: &Path,
    documents_dir: &Path,
    config: LoaderConfig,
) -> Result<Examples<BufReader<File>>, IngestError> {
    let file = File::open(annotation_path).map_err(|source| IngestError::Open {
        path: annotation_path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %annotation_path.display(), documents = %documents_dir.display(), "opened annotation file");
    Ok(Examples::new(BufReader::new(file), documents_dir, config))
}

/// Read a whole split, stopping at the first error.
pub fn load_split(
    source: &SplitSource,
    config: LoaderConfig,
) -> Result<Vec<(usize, NormalizedRecord)>, IngestError> {
    let records = generate_examples(&source.annotation_path, &source.documents_dir, config)?
        .collect::<Result<Vec<_>, _>>()?;

    let expected = source.split.expected_num_rows();
    if records.len() == expected {
        tracing::info!(split = %source.split, records = records.len(), "loaded split");
    } else {
        tracing::info!(
            split = %source.split,
            records = records.len(),
            expected,
            "loaded split with a row count differing from the published set"
        );
    }
    Ok(records)
}
