pub mod element;

pub use element::Element;

use crate::format::Formatter;
use crate::table::{Row, TableSpec};

pub const TABLE_CLASS: &str = "mt-table";
pub const CAPTION_CLASS: &str = "mt-caption";
pub const CONTAINER_CLASS: &str = "mt-table-height";
pub const HEADER_CLASS: &str = "mt-col-header-capitalize";
pub const STICKY_HEADER_CLASSES: [&str; 2] = ["mt-header-sticky", "mt-thead-style"];
pub const SEARCH_PLACEHOLDER: &str = "Search table";

/// Output of one render pass: the table plus the chrome around it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedTable {
    pub container_id: String,
    pub table: Element,
    /// Present when search is enabled; sits right before the table.
    pub search_box: Option<Element>,
    /// Column keys taken from the first row.
    pub columns: Vec<String>,
}

impl RenderedTable {
    pub fn table_id(&self) -> Option<&str> {
        self.table.id.as_deref()
    }

    pub fn head_row(&self) -> Option<&Element> {
        self.table.child("thead").and_then(|thead| thead.child("tr"))
    }

    pub fn header_titles(&self) -> Vec<String> {
        self.head_row()
            .map(|tr| tr.children.iter().map(Element::text_content).collect())
            .unwrap_or_default()
    }

    pub fn body_rows(&self) -> &[Element] {
        match self.table.child("tbody") {
            Some(tbody) => &tbody.children,
            None => &[],
        }
    }

    pub fn body_rows_mut(&mut self) -> &mut [Element] {
        match self.table.child_mut("tbody") {
            Some(tbody) => &mut tbody.children,
            None => &mut [],
        }
    }

    pub fn visible_rows(&self) -> usize {
        self.body_rows().iter().filter(|r| !r.hidden).count()
    }

    /// The container element with the search box (if any) and the table.
    pub fn container(&self) -> Element {
        let mut container = Element::new("div")
            .with_id(&self.container_id)
            .with_class(CONTAINER_CLASS);
        if let Some(search) = self.search_box.as_ref() {
            container.push(search.clone());
        }
        container.push(self.table.clone());
        container
    }

    pub fn to_html(&self) -> String {
        self.container().to_html()
    }
}

pub struct TableRenderer<'a> {
    spec: &'a TableSpec,
    formatter: &'a Formatter,
}

impl<'a> TableRenderer<'a> {
    pub fn new(spec: &'a TableSpec, formatter: &'a Formatter) -> Self {
        Self { spec, formatter }
    }

    pub fn render(&self, rows: &[Row]) -> RenderedTable {
        let options = &self.spec.options;

        // rows first, then the header row, then the chrome
        let tbody = self.render_body(rows);
        let (thead, columns) = self.render_head(rows);

        let mut table = Element::new("table").with_id(&self.spec.table_id);
        table.add_classes(&options.table_classes);
        table.add_class(TABLE_CLASS);

        if !options.caption.is_empty() {
            table.push(
                Element::new("caption")
                    .with_class(CAPTION_CLASS)
                    .with_text(&options.caption),
            );
        }
        table.push(thead);
        table.push(tbody);
        if !options.footer.is_empty() {
            table.push(Element::new("tfoot").with_text(&options.footer));
        }

        let search_box = options.enable_search.then(|| self.render_search_box());

        tracing::debug!(
            table = %self.spec.table_id,
            columns = columns.len(),
            rows = rows.len(),
            "rendered table"
        );

        RenderedTable {
            container_id: self.spec.container_id.clone(),
            table,
            search_box,
            columns,
        }
    }

    fn render_body(&self, rows: &[Row]) -> Element {
        let options = &self.spec.options;
        let mut tbody = Element::new("tbody");
        for row in rows {
            let mut tr = Element::new("tr");
            for (key, value) in row {
                let config = options.column(key);
                let text = self.formatter.format_cell(value, config);
                let alignment = options.alignment_for(key);
                tr.push(
                    Element::new("td")
                        .with_class(&alignment.class())
                        .with_text(&text),
                );
            }
            tbody.push(tr);
        }
        tbody
    }

    fn render_head(&self, rows: &[Row]) -> (Element, Vec<String>) {
        let options = &self.spec.options;
        let columns: Vec<String> = rows
            .first()
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default();

        let mut tr = Element::new("tr");
        for key in &columns {
            let mut th = Element::new("th")
                .with_attr("scope", "col")
                .with_class(HEADER_CLASS)
                .with_text(&options.title_for(key));
            if options.sticky_header {
                for class in STICKY_HEADER_CLASSES {
                    th.add_class(class);
                }
            }
            th.add_class(&options.alignment_for(key).class());
            tr.push(th);
        }

        let mut thead = Element::new("thead");
        thead.push(tr);
        (thead, columns)
    }

    fn render_search_box(&self) -> Element {
        let options = &self.spec.options;
        let mut input = Element::new("input")
            .with_id(&format!("{}-search", self.spec.table_id))
            .with_attr("type", "search")
            .with_attr("placeholder", SEARCH_PLACEHOLDER)
            .with_attr("aria-label", "Search")
            .with_attr("size", "50")
            .with_attr("data-table", &self.spec.table_id);
        input.add_classes(&options.search_classes);
        input
    }
}
