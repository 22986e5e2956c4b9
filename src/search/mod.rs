//! Search-as-you-type row filter.
//!
//! Each key release re-reads the search text and rescans every body row of
//! the rendered table; there is no index. A row stays visible when any of
//! its cells contains the lower-cased query. The header row is never hidden.

use crate::render::RenderedTable;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Backspace,
    Char(char),
    Other,
}

/// A key release on the search box. `value` is the input text after the key.
#[derive(Clone, Debug)]
pub struct KeyUp<'a> {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
    pub value: &'a str,
}

impl<'a> KeyUp<'a> {
    pub fn typed(value: &'a str) -> Self {
        let key = value.chars().last().map(Key::Char).unwrap_or(Key::Other);
        Self {
            key,
            ctrl: false,
            meta: false,
            value,
        }
    }

    /// Escape, or Ctrl/Cmd+Z.
    pub fn is_cancel(&self) -> bool {
        match self.key {
            Key::Escape => true,
            Key::Char(c) => (self.ctrl || self.meta) && c.eq_ignore_ascii_case(&'z'),
            _ => false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SearchState {
    #[default]
    Unfiltered,
    Filtered {
        query: String,
    },
}

#[derive(Clone, Debug, Default)]
pub struct TableSearch {
    value: String,
    state: SearchState,
}

impl TableSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text of the search box.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn key_up(&mut self, table: &mut RenderedTable, event: KeyUp<'_>) -> &SearchState {
        if event.is_cancel() {
            self.value.clear();
        } else {
            self.value = event.value.to_string();
        }

        let query = self.value.to_lowercase();
        filter_rows(table, &query);
        self.state = if query.is_empty() {
            SearchState::Unfiltered
        } else {
            SearchState::Filtered { query }
        };
        &self.state
    }
}

/// Runs one scan with `query` and returns how many body rows stay visible.
pub fn apply_query(table: &mut RenderedTable, query: &str) -> usize {
    let visible = filter_rows(table, &query.to_lowercase());
    tracing::debug!(query, visible, "applied table search");
    visible
}

fn filter_rows(table: &mut RenderedTable, needle: &str) -> usize {
    let mut visible = 0;
    for row in table.body_rows_mut() {
        let matched = needle.is_empty()
            || row
                .children
                .iter()
                .any(|cell| cell.text_content().to_lowercase().contains(needle));
        row.hidden = !matched;
        if matched {
            visible += 1;
        }
    }
    visible
}
