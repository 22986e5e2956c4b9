use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// One flat record from the source document. Key order follows the document.
pub type Row = serde_json::Map<String, Value>;

pub const DEFAULT_CONTAINER_ID: &str = "table-container";
pub const DEFAULT_TABLE_ID: &str = "modern-table";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "left" | "l" => Some(Self::Left),
            "center" | "centre" | "c" => Some(Self::Center),
            "right" | "r" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    /// Presentation class carried by every cell of the column.
    pub fn class(self) -> String {
        format!("align-text-{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnFormat {
    DateUs,
    NumberGrouped,
    NumberUngrouped,
    CurrencyUs,
    Percent,
}

impl ColumnFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "date-us" => Some(Self::DateUs),
            "number-grouped" => Some(Self::NumberGrouped),
            "number-ungrouped" => Some(Self::NumberUngrouped),
            "currency-us" => Some(Self::CurrencyUs),
            "percent" => Some(Self::Percent),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DateUs => "date-us",
            Self::NumberGrouped => "number-grouped",
            Self::NumberUngrouped => "number-ungrouped",
            Self::CurrencyUs => "currency-us",
            Self::Percent => "percent",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::DateUs)
    }
}

/// How a column title is derived from its key (or configured title).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TitleStyle {
    /// Only the first `_` becomes a space.
    #[default]
    FirstUnderscore,
    AllUnderscores,
    Verbatim,
}

impl TitleStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "first-underscore" | "first" => Some(Self::FirstUnderscore),
            "all-underscores" | "all" => Some(Self::AllUnderscores),
            "verbatim" | "none" => Some(Self::Verbatim),
            _ => None,
        }
    }

    pub fn apply(self, title: &str) -> String {
        match self {
            Self::FirstUnderscore => title.replacen('_', " ", 1),
            Self::AllUnderscores => title.replace('_', " "),
            Self::Verbatim => title.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColumnConfig {
    #[serde(default, alias = "colTitle", alias = "title")]
    pub display_title: Option<String>,
    #[serde(default)]
    pub format: Option<ColumnFormat>,
    #[serde(default, alias = "dateFrom", alias = "dateSource")]
    pub date_source_pattern: Option<String>,
    #[serde(default, alias = "dateTo", alias = "dateDisplay")]
    pub date_display_pattern: Option<String>,
    #[serde(default, alias = "numDecimals", alias = "decimals")]
    pub decimal_count: Option<u32>,
    #[serde(default)]
    pub alignment: Option<Alignment>,
}

impl ColumnConfig {
    pub fn alignment(&self) -> Alignment {
        self.alignment.unwrap_or_default()
    }

    pub fn decimals(&self) -> u32 {
        self.decimal_count.unwrap_or(0)
    }
}

#[derive(Clone, Debug)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
    Inline(Vec<Row>),
}

impl DataSource {
    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::File(path) => path.display().to_string(),
            Self::Inline(rows) => format!("<inline: {} rows>", rows.len()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TableOptions {
    pub table_classes: String,
    pub caption: String,
    pub footer: String,
    pub sticky_header: bool,
    pub enable_search: bool,
    pub search_classes: String,
    pub title_style: TitleStyle,
    pub columns: HashMap<String, ColumnConfig>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            table_classes: String::new(),
            caption: String::new(),
            footer: String::new(),
            sticky_header: true,
            enable_search: true,
            search_classes: String::new(),
            title_style: TitleStyle::default(),
            columns: HashMap::new(),
        }
    }
}

impl TableOptions {
    pub fn column(&self, key: &str) -> Option<&ColumnConfig> {
        self.columns.get(key)
    }

    pub fn alignment_for(&self, key: &str) -> Alignment {
        self.column(key)
            .map(ColumnConfig::alignment)
            .unwrap_or_default()
    }

    pub fn title_for(&self, key: &str) -> String {
        let title = self
            .column(key)
            .and_then(|c| c.display_title.as_deref())
            .unwrap_or(key);
        self.title_style.apply(title)
    }
}

/// Everything needed to produce one table. Built once by the caller.
#[derive(Clone, Debug)]
pub struct TableSpec {
    pub container_id: String,
    pub table_id: String,
    pub source: DataSource,
    pub options: TableOptions,
}

impl TableSpec {
    pub fn new(container_id: &str, table_id: &str, source: DataSource) -> Self {
        Self {
            container_id: container_id.to_string(),
            table_id: table_id.to_string(),
            source,
            options: TableOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }
}

/// Display text of a raw cell before any column formatting.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn title_style_first_underscore_only_replaces_once() {
        assert_eq!(TitleStyle::FirstUnderscore.apply("first_last_name"), "first last_name");
        assert_eq!(TitleStyle::AllUnderscores.apply("first_last_name"), "first last name");
        assert_eq!(TitleStyle::Verbatim.apply("first_last_name"), "first_last_name");
    }

    #[test]
    fn configured_title_wins_over_key() {
        let mut options = TableOptions::default();
        options.columns.insert(
            "amt".to_string(),
            ColumnConfig {
                display_title: Some("Total_Amount".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(options.title_for("amt"), "Total Amount");
        assert_eq!(options.title_for("order_id"), "order id");
    }

    #[test]
    fn unconfigured_columns_align_left() {
        let mut options = TableOptions::default();
        options.columns.insert(
            "amt".to_string(),
            ColumnConfig {
                alignment: Some(Alignment::Right),
                ..Default::default()
            },
        );
        options
            .columns
            .insert("name".to_string(), ColumnConfig::default());
        assert_eq!(options.alignment_for("amt"), Alignment::Right);
        assert_eq!(options.alignment_for("name"), Alignment::Left);
        assert_eq!(options.alignment_for("missing"), Alignment::Left);
    }

    #[test]
    fn column_config_accepts_legacy_option_names() {
        let cfg: ColumnConfig = serde_json::from_value(json!({
            "colTitle": "Hired",
            "format": "date-us",
            "dateFrom": "YYYY-MM-DD",
            "dateTo": "MM/DD/YYYY",
            "numDecimals": 2,
            "alignment": "center"
        }))
        .unwrap();
        assert_eq!(cfg.display_title.as_deref(), Some("Hired"));
        assert_eq!(cfg.format, Some(ColumnFormat::DateUs));
        assert_eq!(cfg.date_source_pattern.as_deref(), Some("YYYY-MM-DD"));
        assert_eq!(cfg.date_display_pattern.as_deref(), Some("MM/DD/YYYY"));
        assert_eq!(cfg.decimals(), 2);
        assert_eq!(cfg.alignment(), Alignment::Center);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let res = serde_json::from_value::<ColumnConfig>(json!({ "format": "roman" }));
        assert!(res.is_err());
    }

    #[test]
    fn cell_text_renders_scalars() {
        assert_eq!(cell_text(&json!("abc")), "abc");
        assert_eq!(cell_text(&json!(1000)), "1000");
        assert_eq!(cell_text(&json!(1.5)), "1.5");
        assert_eq!(cell_text(&json!(true)), "true");
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&json!([1, 2])), "[1,2]");
    }
}
