use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::table::ColumnConfig;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    #[serde(alias = "data_url")]
    pub url: Option<String>,
    pub input_file: Option<String>,
    pub container_id: Option<String>,
    pub table_id: Option<String>,
    pub table_classes: Option<String>,
    #[serde(alias = "table_caption")]
    pub caption: Option<String>,
    #[serde(alias = "table_footer")]
    pub footer: Option<String>,
    pub sticky_header: Option<bool>,
    pub enable_search: Option<bool>,
    pub search_classes: Option<String>,
    pub title_style: Option<String>,
    #[serde(alias = "column_config")]
    pub columns: Option<HashMap<String, ColumnConfig>>,
    pub timeout: Option<usize>,
    pub proxy: Option<String>,
    pub header: Option<String>,
    pub follow_redirects: Option<bool>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub page_title: Option<String>,
    pub no_color: Option<bool>,
    pub number_format: Option<bool>,
    pub date_format: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".moderntable").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

pub fn parse_config(contents: &str) -> Result<ConfigFile, serde_yaml::Error> {
    // an empty or comment-only file is a null document
    if contents
        .lines()
        .all(|l| l.trim().is_empty() || l.trim_start().starts_with('#'))
    {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str::<ConfigFile>(contents)
}

pub fn default_config_yaml() -> String {
    r#"# ModernTable config
#
# Location (default):
#   ~/.moderntable/config.yml
#
# Command line flags override every value here.

# Data source (choose one)
# url: https://example.com/api/people.json
# input_file: ./people.json

# Table
container_id: table-container
table_id: modern-table
# table_classes: "table table-striped"
# caption: People
# footer: "Source: HR"
sticky_header: true
title_style: first-underscore

# Search box
enable_search: true
# search_classes: form-control

# Formatting capabilities
number_format: true
date_format: true

# Per-column settings, keyed by the JSON field name
# columns:
#   salary:
#     display_title: Annual Salary
#     format: currency-us
#     decimal_count: 2
#     alignment: right
#   hired_on:
#     format: date-us
#     date_source_pattern: YYYY-MM-DD
#     date_display_pattern: MMM D, YYYY
#     alignment: center

# HTTP
timeout: 10
# proxy: http://127.0.0.1:8080
# header: "Authorization: Bearer <token>"
follow_redirects: true

# Output (optional, stdout when unset)
# output: ./table.html
# output_format: html
page_title: ModernTable

# Output styling
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}
