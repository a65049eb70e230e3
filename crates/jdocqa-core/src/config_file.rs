use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::LoaderConfig;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub loader: Option<LoaderSection>,
    pub paths: Option<PathsSection>,
    pub archive: Option<ArchiveSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderSection {
    pub rename_pdf_category: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsSection {
    pub annotations_dir: Option<String>,
    pub documents_dir: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveSection {
    pub max_archive_size_mb: Option<u32>,
}

impl ConfigFile {
    /// Runtime loader options, falling back to defaults for unset values.
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            rename_pdf_category: self
                .loader
                .as_ref()
                .and_then(|l| l.rename_pdf_category)
                .unwrap_or_default(),
        }
    }

    pub fn annotations_dir(&self) -> Option<PathBuf> {
        self.paths
            .as_ref()
            .and_then(|p| p.annotations_dir.as_deref())
            .map(PathBuf::from)
    }

    pub fn documents_dir(&self) -> Option<PathBuf> {
        self.paths
            .as_ref()
            .and_then(|p| p.documents_dir.as_deref())
            .map(PathBuf::from)
    }

    pub fn max_archive_size_mb(&self) -> Option<u32> {
        self.archive.as_ref().and_then(|a| a.max_archive_size_mb)
    }
}

/// Platform config directory path: `<config_dir>/jdocqa/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("jdocqa").join("config.toml"))
}

/// Load config by cascading CWD `.jdocqa.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".jdocqa.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        loader: Some(LoaderSection {
            rename_pdf_category: overlay
                .loader
                .as_ref()
                .and_then(|l| l.rename_pdf_category)
                .or_else(|| base.loader.as_ref().and_then(|l| l.rename_pdf_category)),
        }),
        paths: Some(PathsSection {
            annotations_dir: overlay
                .paths
                .as_ref()
                .and_then(|p| p.annotations_dir.clone())
                .or_else(|| base.paths.as_ref().and_then(|p| p.annotations_dir.clone())),
            documents_dir: overlay
                .paths
                .as_ref()
                .and_then(|p| p.documents_dir.clone())
                .or_else(|| base.paths.as_ref().and_then(|p| p.documents_dir.clone())),
        }),
        archive: Some(ArchiveSection {
            max_archive_size_mb: overlay
                .archive
                .as_ref()
                .and_then(|a| a.max_archive_size_mb)
                .or_else(|| base.archive.as_ref().and_then(|a| a.max_archive_size_mb)),
        }),
    }
}

/// Save the current config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
    save_to_path(config, &path)?;
    Ok(path)
}

/// Write `config` as TOML to `path`, creating parent directories.
pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(path, content).map_err(|e| format!("Failed to write config: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_flag_round_trip_toml() {
        let config = ConfigFile {
            loader: Some(LoaderSection {
                rename_pdf_category: Some(true),
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert!(parsed.loader_config().rename_pdf_category);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let parsed: ConfigFile = toml::from_str("[paths]\ndocuments_dir = \"/data/pdf_files\"\n").unwrap();
        assert_eq!(parsed.loader_config(), LoaderConfig::default());
        assert_eq!(parsed.documents_dir(), Some(PathBuf::from("/data/pdf_files")));
        assert!(parsed.annotations_dir().is_none());
        assert!(parsed.max_archive_size_mb().is_none());
    }

    #[test]
    fn merge_overlay_wins_per_field() {
        let base = ConfigFile {
            loader: Some(LoaderSection {
                rename_pdf_category: Some(true),
            }),
            paths: Some(PathsSection {
                annotations_dir: Some("/base/ann".to_string()),
                documents_dir: Some("/base/pdf".to_string()),
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            paths: Some(PathsSection {
                documents_dir: Some("/overlay/pdf".to_string()),
                ..Default::default()
            }),
            archive: Some(ArchiveSection {
                max_archive_size_mb: Some(512),
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        assert!(merged.loader_config().rename_pdf_category);
        assert_eq!(merged.annotations_dir(), Some(PathBuf::from("/base/ann")));
        assert_eq!(merged.documents_dir(), Some(PathBuf::from("/overlay/pdf")));
        assert_eq!(merged.max_archive_size_mb(), Some(512));
    }

    #[test]
    fn load_and_save_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = ConfigFile {
            archive: Some(ArchiveSection {
                max_archive_size_mb: Some(64),
            }),
            ..Default::default()
        };
        save_to_path(&config, &path).unwrap();
        assert_eq!(load_from_path(&path), Some(config));
    }

    #[test]
    fn unparseable_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[loader\nrename_pdf_category = ").unwrap();
        assert!(load_from_path(&path).is_none());
        assert!(load_from_path(&dir.path().join("absent.toml")).is_none());
    }
}
