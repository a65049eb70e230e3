use std::io::Write;

use jdocqa_core::NormalizedRecord;
use jdocqa_ingest::Split;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// One output line of `jdocqa normalize`.
#[derive(Serialize)]
struct ExampleLine<'a> {
    split: &'a str,
    index: usize,
    record: &'a NormalizedRecord,
}

/// Write one normalized record as a JSON line.
pub fn write_example(
    w: &mut dyn Write,
    split: Split,
    index: usize,
    record: &NormalizedRecord,
) -> std::io::Result<()> {
    let line = ExampleLine {
        split: split.as_str(),
        index,
        record,
    };
    serde_json::to_writer(&mut *w, &line)?;
    writeln!(w)
}

/// Print the per-split record count, flagging counts that differ from the
/// published annotation set.
pub fn print_split_summary(
    w: &mut dyn Write,
    split: Split,
    records: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let expected = split.expected_num_rows();
    let msg = format!("{:<10} {:>6} records", split.as_str(), records);
    if records == expected {
        if color.enabled() {
            writeln!(w, "{}", msg.green())
        } else {
            writeln!(w, "{}", msg)
        }
    } else {
        let note = format!("(published set has {})", expected);
        if color.enabled() {
            writeln!(w, "{} {}", msg.yellow(), note.dimmed())
        } else {
            writeln!(w, "{} {}", msg, note)
        }
    }
}

/// Print the outcome of extracting the documents archive.
pub fn print_extraction_summary(
    w: &mut dyn Write,
    files: usize,
    bytes: u64,
    warnings: &[String],
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(
        w,
        "Extracted {} PDFs ({:.1} MB)",
        files,
        bytes as f64 / 1024.0 / 1024.0
    )?;
    for warning in warnings {
        if color.enabled() {
            writeln!(w, "{}", warning.yellow())?;
        } else {
            writeln!(w, "{}", warning)?;
        }
    }
    Ok(())
}
