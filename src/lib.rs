pub mod app;
pub mod cli;
pub mod config;
pub mod fetcher;
pub mod format;
pub mod output;
pub mod render;
pub mod runner;
pub mod search;
pub mod table;
pub mod utils;

pub use fetcher::{FetchError, FetchOptions};
pub use format::Formatter;
pub use render::RenderedTable;
pub use runner::{ModernTable, TableError, TableView};
pub use table::{Alignment, ColumnConfig, ColumnFormat, DataSource, TableOptions, TableSpec};

#[cfg(test)]
mod tests;
