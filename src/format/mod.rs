//! Cell formatting.
//!
//! A [`Formatter`] rewrites the display text of a cell when its column has a
//! `format` configured. Number and date rendering are optional capabilities
//! supplied at construction; when the one a column needs is missing the cell
//! keeps its raw text.

pub mod date;
pub mod number;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::table::{cell_text, ColumnConfig, ColumnFormat};

pub use date::MomentDateFormatter;
pub use number::IntlNumberFormatter;

/// Renders a numeric cell for one of the numeric [`ColumnFormat`]s.
pub trait NumberFormatting: Send + Sync {
    fn format_number(&self, value: &Value, kind: ColumnFormat, decimals: u32) -> String;
}

/// Parses `value` with `source_pattern` and renders it with `display_pattern`.
pub trait DateFormatting: Send + Sync {
    fn format_date(
        &self,
        value: &str,
        source_pattern: Option<&str>,
        display_pattern: Option<&str>,
    ) -> String;
}

#[derive(Clone)]
pub struct Formatter {
    number: Option<Arc<dyn NumberFormatting>>,
    date: Option<Arc<dyn DateFormatting>>,
}

impl Formatter {
    /// No capabilities: every cell is shown as-is.
    pub fn none() -> Self {
        Self {
            number: None,
            date: None,
        }
    }

    /// Built-in en-US number and moment-style date formatting.
    pub fn builtin() -> Self {
        Self {
            number: Some(Arc::new(IntlNumberFormatter)),
            date: Some(Arc::new(MomentDateFormatter::new())),
        }
    }

    pub fn with_number(mut self, number: Arc<dyn NumberFormatting>) -> Self {
        self.number = Some(number);
        self
    }

    pub fn with_date(mut self, date: Arc<dyn DateFormatting>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn without_number(mut self) -> Self {
        self.number = None;
        self
    }

    pub fn without_date(mut self) -> Self {
        self.date = None;
        self
    }

    pub fn has_number(&self) -> bool {
        self.number.is_some()
    }

    pub fn has_date(&self) -> bool {
        self.date.is_some()
    }

    pub fn format_cell(&self, value: &Value, config: Option<&ColumnConfig>) -> String {
        let text = cell_text(value);
        let Some(config) = config else {
            return text;
        };
        let Some(kind) = config.format else {
            return text;
        };
        // empty cells stay empty whatever the column format
        if value.is_null() {
            return text;
        }

        if kind.is_numeric() {
            match self.number.as_ref() {
                Some(number) => number.format_number(value, kind, config.decimals()),
                None => text,
            }
        } else {
            match self.date.as_ref() {
                Some(date) => date.format_date(
                    &text,
                    config.date_source_pattern.as_deref(),
                    config.date_display_pattern.as_deref(),
                ),
                None => text,
            }
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("number", &self.number.is_some())
            .field("date", &self.date.is_some())
            .finish()
    }
}
