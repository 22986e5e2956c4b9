use std::error::Error as StdError;

use crate::render::Element;
use crate::runner::TableError;

pub const PANEL_CLASS: &str = "table-error";
pub const DETAILS_CLASS: &str = "table-error-details";
pub const PANEL_HEADING: &str = "Error Displaying Table";
pub const PANEL_APOLOGY: &str =
    "Our apologies. Please contact your system administrator with these details:";

/// What the error panel shows: the error name, its message and the chain of
/// causes, outermost first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorPanel {
    pub kind: String,
    pub message: String,
    pub trace: Vec<String>,
}

pub fn error_panel(err: &TableError) -> ErrorPanel {
    let kind = err.kind().to_string();
    let message = err.to_string();

    let mut trace = vec![format!("{kind}: {message}")];
    let mut source = err.source();
    while let Some(cause) = source {
        trace.push(format!("caused by: {cause}"));
        source = cause.source();
    }

    ErrorPanel {
        kind,
        message,
        trace,
    }
}

impl ErrorPanel {
    pub fn to_element(&self) -> Element {
        let mut summary = Element::new("p");
        summary.push(Element::new("strong").with_text(&self.kind));
        summary.push(Element::new("span").with_text(&format!(": {}", self.message)));

        let mut label = Element::new("p");
        label.push(Element::new("strong").with_text("Stack trace:"));

        let mut trace = Element::new("p").with_class(DETAILS_CLASS);
        for (i, line) in self.trace.iter().enumerate() {
            if i > 0 {
                trace.push(Element::new("br"));
            }
            trace.push(Element::new("span").with_text(line));
        }

        let mut details = Element::new("section").with_class(DETAILS_CLASS);
        details.push(summary);
        details.push(label);
        details.push(trace);

        let mut body = Element::new("div");
        body.push(Element::new("h2").with_text(PANEL_APOLOGY));
        body.push(details);

        let mut panel = Element::new("section").with_class(PANEL_CLASS);
        panel.push(Element::new("h1").with_text(PANEL_HEADING));
        panel.push(body);
        panel
    }

    /// The panel followed by the (empty) table container it sits before.
    pub fn to_html(&self, container_id: &str) -> String {
        let mut out = self.to_element().to_html();
        Element::new("div")
            .with_id(container_id)
            .write_html(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchError;

    #[test]
    fn http_panel_names_status_and_kind() {
        let err = TableError::from(FetchError::Http {
            status: 404,
            reason: "Not Found".to_string(),
            url: "http://example.com/data.json".to_string(),
        });
        let panel = error_panel(&err);
        assert_eq!(panel.kind, "HTTPError");
        assert!(panel.message.contains("404 Not Found"));

        let html = panel.to_html("table-container");
        assert!(html.starts_with(r#"<section class="table-error"><h1>Error Displaying Table</h1>"#));
        assert!(html.contains("<strong>HTTPError</strong>"));
        assert!(html.ends_with(r#"<div id="table-container"></div>"#));
    }

    #[test]
    fn trace_follows_the_source_chain() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = TableError::from(FetchError::Parse {
            location: "data.json".to_string(),
            source,
        });
        let panel = error_panel(&err);
        assert_eq!(panel.kind, "SyntaxError");
        assert_eq!(panel.trace.len(), 2);
        assert!(panel.trace[1].starts_with("caused by: "));
    }

    #[test]
    fn panel_text_is_escaped() {
        let panel = ErrorPanel {
            kind: "HTTPError".to_string(),
            message: "<script>".to_string(),
            trace: vec!["<script>".to_string()],
        };
        let html = panel.to_element().to_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
