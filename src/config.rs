//! Viewer configuration
//!
//! A table is described by an optional YAML file: given with `--config`, or
//! found next to the data file as `<stem>.table.yaml`. Anything the file
//! leaves out is inferred from the data.

use anyhow::Context;
use gridline::engine::{
    Column, EmptyState, FilterFacet, SortOrder, TableOptions, ToolbarAction,
};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = ".gridline";
const SIDECAR_SUFFIX: &str = "table.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub title: String,
    pub persist_key: Option<String>,
    pub page_size: Option<usize>,
    pub page_size_options: Option<Vec<usize>>,
    pub default_sort_field: Option<String>,
    pub default_sort_order: SortOrder,
    pub columns: Vec<Column>,
    pub filters: Vec<FilterFacet>,
    pub empty_state: Option<EmptyState>,
    pub toolbar_actions: Vec<ToolbarAction>,
}

impl TableConfig {
    /// `~/.gridline`
    pub fn app_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(APP_DIR))
    }

    pub fn prefs_dir() -> Option<PathBuf> {
        Self::app_dir().map(|dir| dir.join("prefs"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::app_dir().map(|dir| dir.join("gridline.log"))
    }

    pub fn parse(contents: &str) -> anyhow::Result<TableConfig> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<TableConfig> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// `data/jobs.csv` -> `data/jobs.table.yaml`
    pub fn sidecar_path(data_path: &Path) -> PathBuf {
        let stem = data_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        data_path.with_file_name(format!("{}.{}", stem, SIDECAR_SUFFIX))
    }

    /// An explicit path must exist; a missing sidecar just means defaults.
    pub fn resolve(data_path: &Path, explicit: Option<&Path>) -> anyhow::Result<TableConfig> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let sidecar = Self::sidecar_path(data_path);
        if sidecar.exists() {
            Self::load(&sidecar)
        } else {
            Ok(TableConfig::default())
        }
    }

    /// Build table options. Title and persist key default to the data file's
    /// stem; columns default to one plain column per header.
    pub fn into_options(self, data_path: &Path, headers: &[String]) -> TableOptions {
        let stem = data_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let columns = if self.columns.is_empty() {
            headers.iter().map(|h| Column::new(h.as_str(), h.as_str())).collect()
        } else {
            self.columns
        };

        let defaults = TableOptions::default();
        TableOptions {
            title: if self.title.is_empty() {
                stem.clone()
            } else {
                self.title
            },
            columns,
            filters: self.filters,
            persist_key: self.persist_key.or(Some(stem)),
            default_sort_field: self.default_sort_field,
            default_sort_order: self.default_sort_order,
            page_size: self.page_size.unwrap_or(defaults.page_size),
            page_size_options: self
                .page_size_options
                .unwrap_or(defaults.page_size_options),
            remote_page: None,
            empty_state: self.empty_state.or_else(|| {
                Some(EmptyState {
                    title: "No rows".to_string(),
                    description: format!("{} has no data rows", data_path.display()),
                    action_label: None,
                })
            }),
            toolbar_actions: self.toolbar_actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridline::engine::{Align, Value};

    const SAMPLE: &str = r#"
title: Nightly Jobs
page_size: 25
default_sort_field: name
default_sort_order: desc
columns:
  - field: name
    label: Name
  - field: runtime
    label: Runtime (s)
    align: right
  - field: owner
    label: Owner
    sortable: false
    exportable: false
filters:
  - key: status
    label: Status
    options:
      - value: active
        label: Active
      - value: paused
empty_state:
  title: Nothing scheduled
  description: Add a job to get started
  action_label: New job
toolbar_actions:
  - label: New job
"#;

    #[test]
    fn test_parse_full_config() {
        let config = TableConfig::parse(SAMPLE).unwrap();

        assert_eq!(config.title, "Nightly Jobs");
        assert_eq!(config.page_size, Some(25));
        assert_eq!(config.default_sort_order, SortOrder::Desc);
        assert_eq!(config.columns.len(), 3);
        assert_eq!(config.columns[1].align, Align::Right);
        assert!(!config.columns[2].sortable);
        assert!(!config.columns[2].exportable);
        assert_eq!(config.filters[0].options[0].value, Value::from("active"));
        assert_eq!(config.filters[0].options[1].display_label(), "paused");
        assert_eq!(config.toolbar_actions.len(), 1);
    }

    #[test]
    fn test_empty_config_infers_from_data() {
        let config = TableConfig::parse("{}").unwrap();
        let headers = vec!["id".to_string(), "name".to_string()];
        let options = config.into_options(Path::new("/tmp/jobs.csv"), &headers);

        assert_eq!(options.title, "jobs");
        assert_eq!(options.persist_key.as_deref(), Some("jobs"));
        assert_eq!(options.columns.len(), 2);
        assert_eq!(options.columns[1].label(), "name");
        assert_eq!(options.page_size, 10);
        assert!(options.empty_state.is_some());
    }

    #[test]
    fn test_declared_columns_win_over_headers() {
        let config = TableConfig::parse(SAMPLE).unwrap();
        let headers = vec!["id".to_string()];
        let options = config.into_options(Path::new("jobs.csv"), &headers);

        assert_eq!(options.title, "Nightly Jobs");
        assert_eq!(options.columns.len(), 3);
        assert_eq!(options.page_size, 25);
        assert_eq!(options.empty_state.unwrap().title, "Nothing scheduled");
    }

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            TableConfig::sidecar_path(Path::new("data/jobs.csv")),
            PathBuf::from("data/jobs.table.yaml")
        );
    }

    #[test]
    fn test_missing_sidecar_is_default() {
        let config =
            TableConfig::resolve(Path::new("/nonexistent/dir/jobs.csv"), None).unwrap();
        assert!(config.columns.is_empty());
        assert!(TableConfig::resolve(
            Path::new("jobs.csv"),
            Some(Path::new("/nonexistent/table.yaml"))
        )
        .is_err());
    }
}
