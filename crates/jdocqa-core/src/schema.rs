//! Dataset metadata and the typed feature schema consumers apply to
//! normalized records.

use serde::{Deserialize, Serialize};

use crate::labels::{AnswerType, ImageType, PdfCategory};

pub const DATASET_NAME: &str = "JDocQA";
pub const VERSION: &str = "1.0.0";

pub const DESCRIPTION: &str = "Japanese Document Question Answering (JDocQA), a large-scale \
document-based QA dataset, essentially requiring both visual and textual information to answer \
questions, which comprises 5,504 documents in PDF format and annotated 11,600 question-and-answer \
instances in Japanese.";

pub const HOMEPAGE: &str = "https://github.com/mizuumi/JDocQA";

pub const LICENSE: &str = "JDocQA dataset annotations are distributed under CC BY-SA 4.0.";

pub const CITATION: &str = r#"@inproceedings{onami2024jdocqa,
  title={JDocQA: Japanese Document Question Answering Dataset for Generative Language Models},
  author={Onami, Eri and Kurita, Shuhei and Miyanishi, Taiki and Watanabe, Taro},
  booktitle={Proceedings of the 2024 Joint International Conference on Computational Linguistics, Language Resources and Evaluation (LREC-COLING 2024)},
  year={2024}
}"#;

pub const TRAIN_ANNOTATIONS_URL: &str =
    "https://raw.githubusercontent.com/mizuumi/JDocQA/main/dataset/annotation_files/jdocqa_train_all.json";
pub const VALIDATION_ANNOTATIONS_URL: &str =
    "https://github.com/mizuumi/JDocQA/raw/main/dataset/annotation_files/jdocqa_validation_all.json";
pub const TEST_ANNOTATIONS_URL: &str =
    "https://github.com/mizuumi/JDocQA/raw/main/dataset/annotation_files/jdocqa_test_all.json";
pub const DOCUMENTS_URL: &str =
    "https://vlm-lab-fileshare.s3.ap-northeast-1.amazonaws.com/pdf_files.zip";

/// A categorical feature with a fixed, ordered set of names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLabel {
    pub names: Vec<String>,
}

impl ClassLabel {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn num_classes(&self) -> usize {
        self.names.len()
    }

    /// Index of `label`, or `None` if it is outside the declared universe.
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.names.iter().position(|n| n == label)
    }

    pub fn decode(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }
}

/// Type of a single feature column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum FeatureType {
    Value { dtype: String },
    ClassLabel(ClassLabel),
    Sequence { feature: Box<FeatureType> },
}

impl FeatureType {
    fn string() -> Self {
        FeatureType::Value {
            dtype: "string".to_string(),
        }
    }

    fn sequence(feature: FeatureType) -> Self {
        FeatureType::Sequence {
            feature: Box::new(feature),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FeatureType,
}

/// Feature schema of a normalized record, in serialization order.
///
/// The `pdf_category` label universe depends on `rename_pdf_category`.
pub fn features(rename_pdf_category: bool) -> Vec<Feature> {
    let answer_type = ClassLabel::new(AnswerType::ALL.map(AnswerType::label));
    let pdf_category = ClassLabel::new(
        PdfCategory::universe(rename_pdf_category)
            .iter()
            .map(|c| c.label()),
    );
    let type_of_image = ClassLabel::new(ImageType::ALL.map(ImageType::label));

    let columns = [
        ("answer", FeatureType::string()),
        ("answer_type", FeatureType::ClassLabel(answer_type)),
        ("context", FeatureType::string()),
        ("multiple_select_answer", FeatureType::string()),
        (
            "multiple_select_question",
            FeatureType::sequence(FeatureType::string()),
        ),
        ("no_reason", FeatureType::string()),
        ("normalized_answer", FeatureType::string()),
        ("original_answer", FeatureType::string()),
        ("original_context", FeatureType::string()),
        ("original_question", FeatureType::string()),
        ("pdf_category", FeatureType::ClassLabel(pdf_category)),
        ("pdf_name", FeatureType::string()),
        ("question", FeatureType::string()),
        (
            "question_number",
            FeatureType::sequence(FeatureType::Value {
                dtype: "int64".to_string(),
            }),
        ),
        ("question_page_number", FeatureType::string()),
        (
            "reason_of_answer_bbox",
            FeatureType::sequence(FeatureType::string()),
        ),
        ("text_from_ocr_pdf", FeatureType::string()),
        ("text_from_pdf", FeatureType::string()),
        (
            "type_of_image",
            FeatureType::sequence(FeatureType::ClassLabel(type_of_image)),
        ),
        ("pdf_filepath", FeatureType::string()),
    ];

    columns
        .into_iter()
        .map(|(name, kind)| Feature {
            name: name.to_string(),
            kind,
        })
        .collect()
}

/// Source URLs for the annotation files and the documents archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUrls {
    pub train: String,
    pub validation: String,
    pub test: String,
    pub documents: String,
}

/// Descriptive metadata plus the feature schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub homepage: String,
    pub license: String,
    pub citation: String,
    pub urls: SourceUrls,
    pub features: Vec<Feature>,
}

impl DatasetInfo {
    pub fn new(rename_pdf_category: bool) -> Self {
        Self {
            name: DATASET_NAME.to_string(),
            version: VERSION.to_string(),
            description: DESCRIPTION.to_string(),
            homepage: HOMEPAGE.to_string(),
            license: LICENSE.to_string(),
            citation: CITATION.to_string(),
            urls: SourceUrls {
                train: TRAIN_ANNOTATIONS_URL.to_string(),
                validation: VALIDATION_ANNOTATIONS_URL.to_string(),
                test: TEST_ANNOTATIONS_URL.to_string(),
                documents: DOCUMENTS_URL.to_string(),
            },
            features: features(rename_pdf_category),
        }
    }

    /// Look up a feature by column name.
    pub fn feature(&self, name: &str) -> Option<&FeatureType> {
        self.features.iter().find(|f| f.name == name).map(|f| &f.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_label<'a>(info: &'a DatasetInfo, name: &str) -> &'a ClassLabel {
        match info.feature(name) {
            Some(FeatureType::ClassLabel(c)) => c,
            other => panic!("expected ClassLabel for {name}, got {other:?}"),
        }
    }

    #[test]
    fn test_pdf_category_universe_follows_rename() {
        let original = DatasetInfo::new(false);
        let renamed = DatasetInfo::new(true);

        assert_eq!(
            class_label(&original, "pdf_category").names,
            ["Document", "Kouhou", "Slide", "Website"]
        );
        assert_eq!(
            class_label(&renamed, "pdf_category").names,
            ["Report", "Pamphlet", "Slide", "Website"]
        );
    }

    #[test]
    fn test_class_label_encode_decode() {
        let info = DatasetInfo::new(false);
        let answer_type = class_label(&info, "answer_type");
        assert_eq!(answer_type.num_classes(), 4);
        assert_eq!(answer_type.encode("numerical"), Some(2));
        assert_eq!(answer_type.encode("3"), None);
        assert_eq!(answer_type.decode(3), Some("open-ended"));
        assert_eq!(answer_type.decode(4), None);
    }

    #[test]
    fn test_type_of_image_is_sequence_of_labels() {
        let info = DatasetInfo::new(false);
        let Some(FeatureType::Sequence { feature }) = info.feature("type_of_image") else {
            panic!("type_of_image should be a sequence");
        };
        let FeatureType::ClassLabel(labels) = &**feature else {
            panic!("type_of_image items should be class labels");
        };
        assert_eq!(labels.num_classes(), 10);
        assert_eq!(labels.encode("Null"), Some(0));
        assert_eq!(labels.encode("null"), None);
    }

    #[test]
    fn test_feature_order_matches_record_serialization() {
        use crate::record::NormalizedRecord;
        use crate::{AnswerType, PdfCategory};

        let record = NormalizedRecord {
            answer: String::new(),
            answer_type: AnswerType::Factoid,
            context: String::new(),
            multiple_select_answer: String::new(),
            multiple_select_question: Default::default(),
            no_reason: String::new(),
            normalized_answer: String::new(),
            original_answer: String::new(),
            original_context: String::new(),
            original_question: String::new(),
            pdf_category: PdfCategory::Slide,
            pdf_name: String::new(),
            question: String::new(),
            question_number: vec![1],
            question_page_number: String::new(),
            reason_of_answer_bbox: vec![String::new()],
            text_from_ocr_pdf: String::new(),
            text_from_pdf: String::new(),
            type_of_image: vec![ImageType::Null],
            pdf_filepath: "x.pdf".into(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let mut last = 0;
        for feature in features(false) {
            let key = format!("\"{}\":", feature.name);
            let pos = json.find(&key).expect("every feature is serialized");
            assert!(pos >= last, "{} out of order", feature.name);
            last = pos;
        }
    }

    #[test]
    fn test_info_serializes_with_type_tags() {
        let value = serde_json::to_value(DatasetInfo::new(false)).unwrap();
        assert_eq!(value["name"], "JDocQA");
        assert_eq!(value["features"][0]["type"]["_type"], "Value");
        assert_eq!(value["features"][1]["type"]["_type"], "ClassLabel");
    }
}
