pub mod page;
pub mod panel;

use crate::render::RenderedTable;
use crate::runner::TableView;

pub const DEFAULT_PAGE_TITLE: &str = "ModernTable";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Standalone document with stylesheet and search script.
    #[default]
    Html,
    /// Just the container markup, for pasting into an existing page.
    Fragment,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "html" | "htm" | "page" => Some(Self::Html),
            "fragment" | "frag" | "partial" => Some(Self::Fragment),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Fragment => "fragment",
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".frag.html") || lower.ends_with(".fragment") || lower.ends_with(".frag") {
        return Some(OutputFormat::Fragment);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    None
}

pub fn render_fragment(view: &TableView) -> String {
    match view {
        TableView::Rendered(table) => table.to_html(),
        TableView::Failed {
            container_id,
            panel,
        } => panel.to_html(container_id),
    }
}

pub fn render_page(view: &TableView, title: &str) -> String {
    let search_tables = match view {
        TableView::Rendered(table) => searchable_table_ids(table),
        TableView::Failed { .. } => Vec::new(),
    };
    page::render_document(title, &render_fragment(view), &search_tables)
}

pub fn render_view(view: &TableView, format: OutputFormat, title: &str) -> Vec<u8> {
    let mut out = match format {
        OutputFormat::Html => render_page(view, title),
        OutputFormat::Fragment => render_fragment(view),
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.into_bytes()
}

fn searchable_table_ids(table: &RenderedTable) -> Vec<String> {
    match (table.search_box.as_ref(), table.table_id()) {
        (Some(_), Some(id)) => vec![id.to_string()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchError;
    use crate::format::Formatter;
    use crate::render::TableRenderer;
    use crate::runner::TableError;
    use crate::table::{DataSource, TableOptions, TableSpec};

    fn rendered(options: TableOptions) -> TableView {
        let rows = crate::fetcher::decode_rows(br#"[{"name":"<Ada>"}]"#, "test").unwrap();
        let spec = TableSpec::new("table-container", "people", DataSource::Inline(Vec::new()))
            .with_options(options);
        TableView::Rendered(TableRenderer::new(&spec, &Formatter::none()).render(&rows))
    }

    #[test]
    fn parse_and_infer_formats() {
        assert_eq!(OutputFormat::parse("HTML"), Some(OutputFormat::Html));
        assert_eq!(OutputFormat::parse("fragment"), Some(OutputFormat::Fragment));
        assert_eq!(OutputFormat::parse("xml"), None);
        assert_eq!(infer_format_from_path("out/table.html"), Some(OutputFormat::Html));
        assert_eq!(
            infer_format_from_path("table.frag.html"),
            Some(OutputFormat::Fragment)
        );
        assert_eq!(infer_format_from_path("table.txt"), None);
    }

    #[test]
    fn fragment_escapes_cell_text() {
        let html = render_fragment(&rendered(TableOptions::default()));
        assert!(html.starts_with(r#"<div id="table-container" class="mt-table-height"><input"#));
        assert!(html.contains("<td class=\"align-text-left\">&lt;Ada&gt;</td>"));
    }

    #[test]
    fn page_includes_search_script_only_with_search_box() {
        let page = render_page(&rendered(TableOptions::default()), "People");
        assert!(page.contains(r#"["people"]"#));

        let page = render_page(
            &rendered(TableOptions {
                enable_search: false,
                ..TableOptions::default()
            }),
            "People",
        );
        assert!(!page.contains("<script"));
    }

    #[test]
    fn failed_view_renders_panel_before_container() {
        let err = TableError::from(FetchError::JsonSyntax {
            content_type: "text/html".to_string(),
            url: "http://example.com/".to_string(),
        });
        let view = TableView::Failed {
            container_id: "table-container".to_string(),
            panel: panel::error_panel(&err),
        };
        let bytes = render_view(&view, OutputFormat::Fragment, DEFAULT_PAGE_TITLE);
        let html = String::from_utf8(bytes).unwrap();
        let panel_at = html.find("table-error").unwrap();
        let container_at = html.find(r#"id="table-container""#).unwrap();
        assert!(panel_at < container_at);
        assert!(html.contains("JSONSyntaxError"));
        assert!(html.ends_with('\n'));
    }
}
