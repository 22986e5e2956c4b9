use thiserror::Error;

use crate::fetcher::{FetchError, FetchOptions, Fetcher};
use crate::format::Formatter;
use crate::output::panel::{self, ErrorPanel};
use crate::render::{RenderedTable, TableRenderer};
use crate::table::{DataSource, TableSpec};

#[derive(Debug, Error)]
pub enum TableError {
    #[error("table container id is empty")]
    MissingContainerId,

    #[error("table id is empty")]
    MissingTableId,

    #[error("data URL is empty")]
    MissingDataUrl,

    #[error("invalid data URL: {url}")]
    InvalidUrl { url: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl TableError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(e) => e.kind(),
            _ => "ConfigurationError",
        }
    }
}

/// Either a rendered table or the panel shown in its place.
#[derive(Clone, Debug)]
pub enum TableView {
    Rendered(RenderedTable),
    Failed {
        container_id: String,
        panel: ErrorPanel,
    },
}

impl TableView {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }
}

#[derive(Clone, Debug)]
pub struct ModernTable {
    spec: TableSpec,
    formatter: Formatter,
    fetch: FetchOptions,
}

impl ModernTable {
    pub fn new(spec: TableSpec) -> Result<Self, TableError> {
        if spec.container_id.trim().is_empty() {
            return Err(TableError::MissingContainerId);
        }
        if spec.table_id.trim().is_empty() {
            return Err(TableError::MissingTableId);
        }
        match &spec.source {
            DataSource::Url(url) if url.trim().is_empty() => {
                return Err(TableError::MissingDataUrl)
            }
            DataSource::Url(url) if reqwest::Url::parse(url).is_err() => {
                return Err(TableError::InvalidUrl { url: url.clone() })
            }
            DataSource::File(path) if path.as_os_str().is_empty() => {
                return Err(TableError::MissingDataUrl)
            }
            _ => {}
        }
        Ok(Self {
            spec,
            formatter: Formatter::default(),
            fetch: FetchOptions::default(),
        })
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_fetch_options(mut self, fetch: FetchOptions) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn spec(&self) -> &TableSpec {
        &self.spec
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Renders already-fetched rows.
    pub fn render(&self, rows: &[crate::table::Row]) -> RenderedTable {
        TableRenderer::new(&self.spec, &self.formatter).render(rows)
    }

    /// Fetches the data once and renders it.
    pub async fn build(&self) -> Result<RenderedTable, TableError> {
        let fetcher = Fetcher::new(&self.fetch)?;
        let rows = fetcher.fetch_rows(&self.spec.source).await?;
        Ok(self.render(&rows))
    }

    /// Like [`ModernTable::build`], with a failure turned into an error panel.
    pub async fn build_view(&self) -> TableView {
        match self.build().await {
            Ok(table) => TableView::Rendered(table),
            Err(e) => {
                tracing::warn!(
                    source = %self.spec.source.describe(),
                    kind = e.kind(),
                    error = %e,
                    "table build failed"
                );
                TableView::Failed {
                    container_id: self.spec.container_id.clone(),
                    panel: panel::error_panel(&e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableOptions;

    #[test]
    fn rejects_empty_ids() {
        let spec = TableSpec::new("", "t", DataSource::Url("http://example.com/".to_string()));
        assert!(matches!(
            ModernTable::new(spec),
            Err(TableError::MissingContainerId)
        ));
        let spec = TableSpec::new("c", " ", DataSource::Url("http://example.com/".to_string()));
        assert!(matches!(
            ModernTable::new(spec),
            Err(TableError::MissingTableId)
        ));
    }

    #[test]
    fn rejects_bad_urls() {
        let spec = TableSpec::new("c", "t", DataSource::Url(String::new()));
        assert!(matches!(
            ModernTable::new(spec),
            Err(TableError::MissingDataUrl)
        ));
        let spec = TableSpec::new("c", "t", DataSource::Url("not a url".to_string()));
        assert!(matches!(
            ModernTable::new(spec),
            Err(TableError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn inline_rows_build_a_table() {
        let rows = crate::fetcher::decode_rows(br#"[{"id":1,"amt":1000}]"#, "test").unwrap();
        let mut options = TableOptions::default();
        options.columns.insert(
            "amt".to_string(),
            crate::table::ColumnConfig {
                format: Some(crate::table::ColumnFormat::NumberGrouped),
                ..Default::default()
            },
        );
        let table = ModernTable::new(
            TableSpec::new("c", "t", DataSource::Inline(rows)).with_options(options),
        )
        .unwrap();

        let rendered = table.build().await.unwrap();
        assert_eq!(rendered.body_rows()[0].children[1].text_content(), "1,000");

        let plain = table.clone().with_formatter(Formatter::none());
        let rendered = plain.build().await.unwrap();
        assert_eq!(rendered.body_rows()[0].children[1].text_content(), "1000");
    }

    #[tokio::test]
    async fn missing_file_becomes_a_panel() {
        let table = ModernTable::new(TableSpec::new(
            "c",
            "t",
            DataSource::File("/definitely/not/here.json".into()),
        ))
        .unwrap();
        match table.build_view().await {
            TableView::Failed { container_id, panel } => {
                assert_eq!(container_id, "c");
                assert_eq!(panel.kind, "ReadError");
            }
            TableView::Rendered(_) => panic!("expected a failure"),
        }
    }
}
