use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::labels::{AnswerType, ImageType, PdfCategory};

/// One annotation line exactly as it appears in the source JSON.
///
/// Every value is a string; the delimited fields are decoded by
/// [`normalize_record`](crate::normalize_record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub answer: String,
    pub answer_type: String,
    pub context: String,
    pub multiple_select_answer: String,
    pub multiple_select_question: String,
    pub no_reason: String,
    pub normalized_answer: String,
    pub original_answer: String,
    pub original_context: String,
    pub original_question: String,
    pub pdf_category: String,
    pub pdf_name: String,
    pub question: String,
    pub question_number: String,
    pub question_page_number: String,
    pub reason_of_answer_bbox: String,
    pub text_from_ocr_pdf: String,
    pub text_from_pdf: String,
    pub type_of_image: String,
}

/// A fully decoded annotation record.
///
/// Field order is the serialization order, so two equal records always
/// serialize to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub answer: String,
    pub answer_type: AnswerType,
    pub context: String,
    pub multiple_select_answer: String,
    pub multiple_select_question: [String; 4],
    pub no_reason: String,
    pub normalized_answer: String,
    pub original_answer: String,
    pub original_context: String,
    pub original_question: String,
    pub pdf_category: PdfCategory,
    pub pdf_name: String,
    pub question: String,
    pub question_number: Vec<i64>,
    pub question_page_number: String,
    /// Digit strings as written, including empty placeholders.
    pub reason_of_answer_bbox: Vec<String>,
    pub text_from_ocr_pdf: String,
    pub text_from_pdf: String,
    pub type_of_image: Vec<ImageType>,
    /// `documents_dir` joined with `pdf_name`; not part of the source data.
    pub pdf_filepath: PathBuf,
}
