//! Closed label sets for the enumerated annotation fields.
//!
//! Each enum serializes to the exact label string the dataset schema declares,
//! so a normalized record can be written out without any further mapping.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of answer expected for a question (`answer_type` codes `1`-`4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerType {
    #[serde(rename = "yes/no")]
    YesNo,
    #[serde(rename = "factoid")]
    Factoid,
    #[serde(rename = "numerical")]
    Numerical,
    #[serde(rename = "open-ended")]
    OpenEnded,
}

impl AnswerType {
    pub const ALL: [AnswerType; 4] = [
        AnswerType::YesNo,
        AnswerType::Factoid,
        AnswerType::Numerical,
        AnswerType::OpenEnded,
    ];

    /// Look up the answer type for a numeral code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(AnswerType::YesNo),
            "2" => Some(AnswerType::Factoid),
            "3" => Some(AnswerType::Numerical),
            "4" => Some(AnswerType::OpenEnded),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnswerType::YesNo => "yes/no",
            AnswerType::Factoid => "factoid",
            AnswerType::Numerical => "numerical",
            AnswerType::OpenEnded => "open-ended",
        }
    }
}

impl fmt::Display for AnswerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Figure type present on the question page (`type_of_image` codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageType {
    /// Empty code: the page carries no figure.
    #[serde(rename = "Null")]
    Null,
    #[serde(rename = "Table")]
    Table,
    #[serde(rename = "Bar chart")]
    BarChart,
    #[serde(rename = "Line chart")]
    LineChart,
    #[serde(rename = "Pie chart")]
    PieChart,
    #[serde(rename = "Map")]
    Map,
    #[serde(rename = "Other figures")]
    OtherFigures,
    #[serde(rename = "Mixed writing style from left to the right and from upside to the downside")]
    MixedWritingDirection,
    #[serde(rename = "Drawings")]
    Drawings,
    #[serde(rename = "Others")]
    Others,
}

impl ImageType {
    /// All variants in code order (`""`, then `1`-`9`).
    pub const ALL: [ImageType; 10] = [
        ImageType::Null,
        ImageType::Table,
        ImageType::BarChart,
        ImageType::LineChart,
        ImageType::PieChart,
        ImageType::Map,
        ImageType::OtherFigures,
        ImageType::MixedWritingDirection,
        ImageType::Drawings,
        ImageType::Others,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "" => Some(ImageType::Null),
            "1" => Some(ImageType::Table),
            "2" => Some(ImageType::BarChart),
            "3" => Some(ImageType::LineChart),
            "4" => Some(ImageType::PieChart),
            "5" => Some(ImageType::Map),
            "6" => Some(ImageType::OtherFigures),
            "7" => Some(ImageType::MixedWritingDirection),
            "8" => Some(ImageType::Drawings),
            "9" => Some(ImageType::Others),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ImageType::Null => "Null",
            ImageType::Table => "Table",
            ImageType::BarChart => "Bar chart",
            ImageType::LineChart => "Line chart",
            ImageType::PieChart => "Pie chart",
            ImageType::Map => "Map",
            ImageType::OtherFigures => "Other figures",
            ImageType::MixedWritingDirection => {
                "Mixed writing style from left to the right and from upside to the downside"
            }
            ImageType::Drawings => "Drawings",
            ImageType::Others => "Others",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Genre of the source PDF.
///
/// The annotation files use `Document` and `Kouhou`; with renaming enabled
/// these become `Report` and `Pamphlet`. `Slide` and `Website` are shared by
/// both naming schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PdfCategory {
    Document,
    Kouhou,
    Report,
    Pamphlet,
    Slide,
    Website,
}

impl PdfCategory {
    /// Labels as they appear in the annotation files.
    pub const ORIGINAL: [PdfCategory; 4] = [
        PdfCategory::Document,
        PdfCategory::Kouhou,
        PdfCategory::Slide,
        PdfCategory::Website,
    ];

    /// Labels after renaming.
    pub const RENAMED: [PdfCategory; 4] = [
        PdfCategory::Report,
        PdfCategory::Pamphlet,
        PdfCategory::Slide,
        PdfCategory::Website,
    ];

    /// The label universe for the given naming scheme.
    pub fn universe(rename: bool) -> &'static [PdfCategory; 4] {
        if rename {
            &Self::RENAMED
        } else {
            &Self::ORIGINAL
        }
    }

    /// Parse an original (un-renamed) category name.
    pub fn from_original(code: &str) -> Option<Self> {
        Self::ORIGINAL.into_iter().find(|c| c.label() == code)
    }

    /// Apply the `Document→Report`, `Kouhou→Pamphlet` renaming.
    pub fn renamed(self) -> Self {
        match self {
            PdfCategory::Document => PdfCategory::Report,
            PdfCategory::Kouhou => PdfCategory::Pamphlet,
            other => other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PdfCategory::Document => "Document",
            PdfCategory::Kouhou => "Kouhou",
            PdfCategory::Report => "Report",
            PdfCategory::Pamphlet => "Pamphlet",
            PdfCategory::Slide => "Slide",
            PdfCategory::Website => "Website",
        }
    }
}

impl fmt::Display for PdfCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
