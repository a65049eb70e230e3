use std::path::PathBuf;

use thiserror::Error;

pub mod config_file;
pub mod labels;
pub mod normalize;
pub mod record;
pub mod schema;

// Re-export for convenience
pub use labels::{AnswerType, ImageType, PdfCategory};
pub use normalize::{
    decode_answer_type, decode_multiple_select_question, decode_pdf_category,
    decode_question_number, decode_reason_of_answer_bbox, decode_type_of_image, normalize_record,
    resolve_pdf_filepath,
};
pub use record::{NormalizedRecord, RawRecord};
pub use schema::{ClassLabel, DatasetInfo, Feature, FeatureType, features};

/// Errors raised while normalizing a single annotation record.
///
/// Every variant carries the raw fragment that failed so upstream annotation
/// problems can be traced back to the source file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("invalid code {code:?} for field `{field}`")]
    InvalidEnumCode { field: &'static str, code: String },
    #[error("multiple choice question is not split into (A)-(D) segments: {text:?}")]
    MalformedMultipleChoice { text: String },
    #[error("invalid integer {token:?} in {text:?}")]
    InvalidInteger { token: String, text: String },
    #[error("invalid bounding box token {token:?} in {text:?}")]
    InvalidBoundingBoxToken { token: String, text: String },
    #[error("File not found: {}", path.display())]
    DocumentNotFound { path: PathBuf },
}

/// Runtime options for the loader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Map `Document`/`Kouhou` to `Report`/`Pamphlet` in `pdf_category`.
    pub rename_pdf_category: bool,
}
