use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use jdocqa_core::LoaderConfig;
use jdocqa_core::config_file::{self, ConfigFile};
use jdocqa_core::schema::DatasetInfo;
use jdocqa_ingest::{DatasetLayout, Split};
use tracing_subscriber::EnvFilter;

mod output;

use output::ColorMode;

/// JDocQA loader - normalize the Japanese Document QA annotation set
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize annotation files into JSON lines
    Normalize {
        /// Splits to process (default: train, validation, test)
        #[arg(long = "split", value_delimiter = ',')]
        splits: Vec<Split>,

        /// Directory containing jdocqa_{split}_all.json
        #[arg(long)]
        annotations_dir: Option<PathBuf>,

        /// Directory containing the PDF files (the archive's pdf_files/)
        #[arg(long)]
        documents_dir: Option<PathBuf>,

        /// Report `Document`/`Kouhou` as `Report`/`Pamphlet`
        #[arg(long)]
        rename_pdf_category: bool,

        /// Write records to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored summary output
        #[arg(long)]
        no_color: bool,
    },

    /// Extract the PDFs of the documents archive
    ExtractDocuments {
        /// Path to pdf_files.zip
        archive: PathBuf,

        /// Directory to extract into; PDFs land in <DEST>/pdf_files
        dest: PathBuf,

        /// Stop after this many megabytes (0 = unlimited)
        #[arg(long)]
        max_size_mb: Option<u32>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Print dataset metadata and the feature schema as JSON
    Info {
        /// Describe the renamed pdf_category label set
        #[arg(long)]
        rename_pdf_category: bool,
    },

    /// Inspect or persist the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the merged configuration as TOML
    Show,
    /// Write the merged configuration to the platform config directory
    Save,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = config_file::load_config();

    match cli.command {
        Command::Normalize {
            splits,
            annotations_dir,
            documents_dir,
            rename_pdf_category,
            output,
            no_color,
        } => normalize(
            &config,
            splits,
            annotations_dir,
            documents_dir,
            rename_pdf_category,
            output,
            no_color,
        ),
        Command::ExtractDocuments {
            archive,
            dest,
            max_size_mb,
            no_color,
        } => extract_documents(&config, &archive, &dest, max_size_mb, no_color),
        Command::Info {
            rename_pdf_category,
        } => {
            let info = DatasetInfo::new(rename_pdf_category);
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(())
        }
        Command::Config { action } => match action {
            ConfigAction::Show => {
                print!("{}", toml::to_string_pretty(&config)?);
                Ok(())
            }
            ConfigAction::Save => {
                let path = config_file::save_config(&config).map_err(|e| anyhow::anyhow!(e))?;
                println!("Saved configuration to {}", path.display());
                Ok(())
            }
        },
    }
}

/// Logs go to stderr so JSON lines on stdout stay clean.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

/// Parse a boolean environment flag (`1`/`true`/`yes`, case-insensitive).
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

/// Directories and loader options for one `normalize` run.
#[derive(Debug, PartialEq, Eq)]
struct NormalizeSettings {
    annotations_dir: PathBuf,
    documents_dir: PathBuf,
    loader: LoaderConfig,
}

/// Resolve configuration: CLI flags > env vars > config file > defaults.
///
/// `env` looks up a variable by name; `main` passes `std::env::var`.
fn resolve_settings(
    annotations_dir: Option<PathBuf>,
    documents_dir: Option<PathBuf>,
    rename_pdf_category: bool,
    env: impl Fn(&str) -> Option<String>,
    config: &ConfigFile,
) -> anyhow::Result<NormalizeSettings> {
    let annotations_dir = annotations_dir
        .or_else(|| env("JDOCQA_ANNOTATIONS_DIR").map(PathBuf::from))
        .or_else(|| config.annotations_dir())
        .context("no annotations directory: pass --annotations-dir or set JDOCQA_ANNOTATIONS_DIR")?;
    let documents_dir = documents_dir
        .or_else(|| env("JDOCQA_DOCUMENTS_DIR").map(PathBuf::from))
        .or_else(|| config.documents_dir())
        .context("no documents directory: pass --documents-dir or set JDOCQA_DOCUMENTS_DIR")?;
    let rename_pdf_category = rename_pdf_category
        || env("JDOCQA_RENAME_PDF_CATEGORY")
            .map(|v| parse_flag(&v))
            .unwrap_or_else(|| config.loader_config().rename_pdf_category);

    Ok(NormalizeSettings {
        annotations_dir,
        documents_dir,
        loader: LoaderConfig {
            rename_pdf_category,
        },
    })
}

fn normalize(
    config: &ConfigFile,
    splits: Vec<Split>,
    annotations_dir: Option<PathBuf>,
    documents_dir: Option<PathBuf>,
    rename_pdf_category: bool,
    output: Option<PathBuf>,
    no_color: bool,
) -> anyhow::Result<()> {
    let NormalizeSettings {
        annotations_dir,
        documents_dir,
        loader,
    } = resolve_settings(
        annotations_dir,
        documents_dir,
        rename_pdf_category,
        |name| std::env::var(name).ok(),
        config,
    )?;

    if !documents_dir.is_dir() {
        anyhow::bail!("Documents directory not found: {}", documents_dir.display());
    }

    let splits = if splits.is_empty() {
        Split::ALL.to_vec()
    } else {
        splits
    };

    let color = ColorMode(!no_color);
    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        let file = std::fs::File::create(output_path)
            .with_context(|| format!("Failed to create {}", output_path.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(std::io::stdout().lock()))
    };

    let layout = DatasetLayout::new(annotations_dir, documents_dir);
    let mut summary = Vec::with_capacity(splits.len());

    for split in splits {
        let source = layout.split_source(split);
        tracing::info!(split = %split, path = %source.annotation_path.display(), "normalizing split");

        let mut count = 0;
        for example in
            jdocqa_ingest::generate_examples(&source.annotation_path, &source.documents_dir, loader)?
        {
            let (index, record) =
                example.with_context(|| format!("Failed to load {} split", split))?;
            output::write_example(&mut *writer, split, index, &record)?;
            count += 1;
        }
        summary.push((split, count));
    }
    writer.flush()?;

    let mut stderr = std::io::stderr();
    for (split, count) in summary {
        output::print_split_summary(&mut stderr, split, count, color)?;
    }
    Ok(())
}

fn extract_documents(
    config: &ConfigFile,
    archive: &Path,
    dest: &Path,
    max_size_mb: Option<u32>,
    no_color: bool,
) -> anyhow::Result<()> {
    if !archive.exists() {
        anyhow::bail!("Archive not found: {}", archive.display());
    }
    let max_size_mb = max_size_mb
        .or_else(|| config.max_archive_size_mb())
        .unwrap_or(0);

    let summary =
        jdocqa_ingest::extract_documents(archive, dest, u64::from(max_size_mb) * 1024 * 1024)
            .with_context(|| format!("Failed to extract {}", archive.display()))?;

    let mut stdout = std::io::stdout();
    output::print_extraction_summary(
        &mut stdout,
        summary.files.len(),
        summary.total_bytes,
        &summary.warnings,
        ColorMode(!no_color),
    )?;
    println!(
        "Documents directory: {}",
        jdocqa_ingest::documents_dir(dest).display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdocqa_core::config_file::{LoaderSection, PathsSection};

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn config_with_paths(rename: Option<bool>) -> ConfigFile {
        ConfigFile {
            loader: Some(LoaderSection {
                rename_pdf_category: rename,
            }),
            paths: Some(PathsSection {
                annotations_dir: Some("/cfg/annotations".to_string()),
                documents_dir: Some("/cfg/pdf_files".to_string()),
            }),
            archive: None,
        }
    }

    #[test]
    fn test_parse_flag() {
        for truthy in ["1", "true", "TRUE", "Yes", " yes "] {
            assert!(parse_flag(truthy), "{truthy:?}");
        }
        for falsy in ["", "0", "false", "no", "on"] {
            assert!(!parse_flag(falsy), "{falsy:?}");
        }
    }

    #[test]
    fn test_flags_override_env_and_config() {
        let env = |name: &str| match name {
            "JDOCQA_ANNOTATIONS_DIR" => Some("/env/annotations".to_string()),
            "JDOCQA_DOCUMENTS_DIR" => Some("/env/pdf_files".to_string()),
            "JDOCQA_RENAME_PDF_CATEGORY" => Some("0".to_string()),
            _ => None,
        };
        let settings = resolve_settings(
            Some("/flag/annotations".into()),
            Some("/flag/pdf_files".into()),
            true,
            env,
            &config_with_paths(Some(false)),
        )
        .unwrap();

        assert_eq!(settings.annotations_dir, PathBuf::from("/flag/annotations"));
        assert_eq!(settings.documents_dir, PathBuf::from("/flag/pdf_files"));
        assert!(settings.loader.rename_pdf_category);
    }

    #[test]
    fn test_env_overrides_config() {
        let env = |name: &str| match name {
            "JDOCQA_DOCUMENTS_DIR" => Some("/env/pdf_files".to_string()),
            "JDOCQA_RENAME_PDF_CATEGORY" => Some("false".to_string()),
            _ => None,
        };
        let settings =
            resolve_settings(None, None, false, env, &config_with_paths(Some(true))).unwrap();

        assert_eq!(settings.annotations_dir, PathBuf::from("/cfg/annotations"));
        assert_eq!(settings.documents_dir, PathBuf::from("/env/pdf_files"));
        assert!(!settings.loader.rename_pdf_category);
    }

    #[test]
    fn test_config_then_defaults() {
        let settings =
            resolve_settings(None, None, false, no_env, &config_with_paths(Some(true))).unwrap();
        assert_eq!(settings.documents_dir, PathBuf::from("/cfg/pdf_files"));
        assert!(settings.loader.rename_pdf_category);

        let settings =
            resolve_settings(None, None, false, no_env, &config_with_paths(None)).unwrap();
        assert_eq!(settings.loader, LoaderConfig::default());
    }

    #[test]
    fn test_missing_directories_are_errors() {
        let err = resolve_settings(None, None, false, no_env, &ConfigFile::default()).unwrap_err();
        assert!(err.to_string().contains("--annotations-dir"));

        let err = resolve_settings(
            Some("/flag/annotations".into()),
            None,
            false,
            no_env,
            &ConfigFile::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("--documents-dir"));
    }
}
