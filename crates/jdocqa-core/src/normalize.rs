//! Field decoders for raw annotation records.
//!
//! Each decoder is a pure function of its input string. [`normalize_record`]
//! applies them field by field and stops at the first failure.

use std::path::{Path, PathBuf};

use crate::NormalizeError;
use crate::labels::{AnswerType, ImageType, PdfCategory};
use crate::record::{NormalizedRecord, RawRecord};

/// Markers separating the four sub-questions, in the order they must appear.
const CHOICE_MARKERS: [&str; 4] = ["(A)", "(B)", "(C)", "(D)"];

/// Trailing punctuation stripped from each sub-question.
const CHOICE_TRAILER: char = '、';

const QUESTION_NUMBER_SEPARATOR: char = '-';

/// Any of these separates tokens in `reason_of_answer_bbox`.
const BBOX_SEPARATORS: [char; 4] = ['.', ',', '、', '､'];

const IMAGE_TYPE_SEPARATOR: char = ',';

/// Decode an `answer_type` numeral (`"1"`-`"4"`).
pub fn decode_answer_type(code: &str) -> Result<AnswerType, NormalizeError> {
    AnswerType::from_code(code).ok_or_else(|| NormalizeError::InvalidEnumCode {
        field: "answer_type",
        code: code.to_string(),
    })
}

/// Split a multiple choice question into its `(A)`-`(D)` sub-questions.
///
/// The text is split on `(A)`, then the remainder on `(B)`, `(C)` and `(D)`
/// in turn. Text before `(A)` is discarded, so markers there are ignored.
/// `(A)` must occur exactly once in the whole text and every later marker
/// exactly once in the remainder it splits. Trailing `、` is stripped from
/// every segment.
pub fn decode_multiple_select_question(text: &str) -> Result<[String; 4], NormalizeError> {
    let malformed = || NormalizeError::MalformedMultipleChoice {
        text: text.to_string(),
    };

    let mut segments = Vec::with_capacity(CHOICE_MARKERS.len());
    let mut rest = text;
    for marker in CHOICE_MARKERS {
        if rest.matches(marker).count() != 1 {
            return Err(malformed());
        }
        let (head, tail) = rest.split_once(marker).ok_or_else(malformed)?;
        segments.push(head);
        rest = tail;
    }
    segments.push(rest);

    // segments[0] is the discarded prefix
    let [_, a, b, c, d] = <[&str; 5]>::try_from(segments).map_err(|_| malformed())?;
    Ok([a, b, c, d].map(|segment| segment.trim_end_matches(CHOICE_TRAILER).to_string()))
}

/// Decode a `-`-joined question number such as `"3-1-2"`.
///
/// Full-width digits (`０`-`９`) are read as their ASCII counterparts.
pub fn decode_question_number(text: &str) -> Result<Vec<i64>, NormalizeError> {
    text.split(QUESTION_NUMBER_SEPARATOR)
        .map(|token| {
            to_ascii_digits(token.trim())
                .parse::<i64>()
                .map_err(|_| NormalizeError::InvalidInteger {
                    token: token.to_string(),
                    text: text.to_string(),
                })
        })
        .collect()
}

fn to_ascii_digits(token: &str) -> String {
    token
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            _ => c,
        })
        .collect()
}

/// Split `reason_of_answer_bbox` into digit tokens.
///
/// Consecutive separators produce empty tokens, which are kept. Tokens stay as
/// strings so leading zeros survive.
pub fn decode_reason_of_answer_bbox(text: &str) -> Result<Vec<String>, NormalizeError> {
    text.split(BBOX_SEPARATORS)
        .map(|token| {
            if token.chars().all(is_digit) {
                Ok(token.to_string())
            } else {
                Err(NormalizeError::InvalidBoundingBoxToken {
                    token: token.to_string(),
                    text: text.to_string(),
                })
            }
        })
        .collect()
}

/// ASCII or full-width decimal digit.
fn is_digit(c: char) -> bool {
    c.is_ascii_digit() || ('０'..='９').contains(&c)
}

/// Decode a comma-joined list of image type codes. The empty code is `Null`.
pub fn decode_type_of_image(text: &str) -> Result<Vec<ImageType>, NormalizeError> {
    text.split(IMAGE_TYPE_SEPARATOR)
        .map(|code| {
            ImageType::from_code(code).ok_or_else(|| NormalizeError::InvalidEnumCode {
                field: "type_of_image",
                code: code.to_string(),
            })
        })
        .collect()
}

/// Decode `pdf_category`, optionally renaming `Document`/`Kouhou`.
pub fn decode_pdf_category(code: &str, rename: bool) -> Result<PdfCategory, NormalizeError> {
    let category =
        PdfCategory::from_original(code).ok_or_else(|| NormalizeError::InvalidEnumCode {
            field: "pdf_category",
            code: code.to_string(),
        })?;
    Ok(if rename { category.renamed() } else { category })
}

/// Join `pdf_name` onto `documents_dir`, requiring the file to exist.
pub fn resolve_pdf_filepath(
    pdf_name: &str,
    documents_dir: &Path,
) -> Result<PathBuf, NormalizeError> {
    let path = documents_dir.join(pdf_name);
    if !path.exists() {
        return Err(NormalizeError::DocumentNotFound { path });
    }
    Ok(path)
}

/// Decode every delimited field of `raw` and attach `pdf_filepath`.
pub fn normalize_record(
    raw: &RawRecord,
    documents_dir: &Path,
    rename_pdf_category: bool,
) -> Result<NormalizedRecord, NormalizeError> {
    let answer_type = decode_answer_type(&raw.answer_type)?;
    let multiple_select_question = decode_multiple_select_question(&raw.multiple_select_question)?;
    let pdf_category = decode_pdf_category(&raw.pdf_category, rename_pdf_category)?;
    let question_number = decode_question_number(&raw.question_number)?;
    let reason_of_answer_bbox = decode_reason_of_answer_bbox(&raw.reason_of_answer_bbox)?;
    let type_of_image = decode_type_of_image(&raw.type_of_image)?;
    let pdf_filepath = resolve_pdf_filepath(&raw.pdf_name, documents_dir)?;

    tracing::trace!(pdf = %raw.pdf_name, question_number = %raw.question_number, "normalized record");

    Ok(NormalizedRecord {
        answer: raw.answer.clone(),
        answer_type,
        context: raw.context.clone(),
        multiple_select_answer: raw.multiple_select_answer.clone(),
        multiple_select_question,
        no_reason: raw.no_reason.clone(),
        normalized_answer: raw.normalized_answer.clone(),
        original_answer: raw.original_answer.clone(),
        original_context: raw.original_context.clone(),
        original_question: raw.original_question.clone(),
        pdf_category,
        pdf_name: raw.pdf_name.clone(),
        question: raw.question.clone(),
        question_number,
        question_page_number: raw.question_page_number.clone(),
        reason_of_answer_bbox,
        text_from_ocr_pdf: raw.text_from_ocr_pdf.clone(),
        text_from_pdf: raw.text_from_pdf.clone(),
        type_of_image,
        pdf_filepath,
    })
}
