use crate::utils::{escape_html, json_for_script_tag};

const STYLESHEET: &str = r#"
    body {
      font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
      margin: 2rem;
      color: #1f2933;
    }
    .mt-table-height {
      max-height: 80vh;
      overflow: auto;
    }
    .mt-table {
      width: 100%;
      border-collapse: collapse;
    }
    .mt-table td, .mt-table th {
      padding: 0.5rem 0.75rem;
      border-bottom: 1px solid #e4e7eb;
    }
    .mt-caption {
      caption-side: top;
      text-align: left;
      font-weight: 600;
      padding: 0.5rem 0;
    }
    .mt-col-header-capitalize {
      text-transform: capitalize;
    }
    .mt-header-sticky {
      position: sticky;
      top: 0;
      z-index: 1;
    }
    .mt-thead-style {
      background-color: #f5f7fa;
      box-shadow: 0 1px 0 #cbd2d9;
    }
    .align-text-left { text-align: left; }
    .align-text-center { text-align: center; }
    .align-text-right { text-align: right; }
    input[type="search"] {
      margin-bottom: 0.75rem;
      padding: 0.375rem 0.5rem;
    }
    .table-error {
      border: 1px solid #e12d39;
      border-radius: 0.375rem;
      background-color: #ffe3e3;
      color: #610316;
      padding: 1rem 1.5rem;
      margin-bottom: 1rem;
    }
    .table-error-details {
      font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
      font-size: 0.875rem;
    }
"#;

const SEARCH_SCRIPT: &str = r#"
  <script>
    (function() {
      var ids = JSON.parse(document.getElementById('mt-search-tables').textContent || '[]');

      function isCancel(e) {
        if (e.key === 'Escape') return true;
        return (e.ctrlKey || e.metaKey) && (e.key === 'z' || e.key === 'Z');
      }

      function filterRows(table, query) {
        var body = table.tBodies[0];
        if (!body) return;
        Array.prototype.forEach.call(body.rows, function(row) {
          var match = query === '' || Array.prototype.some.call(row.cells, function(cell) {
            return cell.textContent.toLowerCase().indexOf(query) > -1;
          });
          row.style.display = match ? '' : 'none';
        });
      }

      ids.forEach(function(id) {
        var table = document.getElementById(id);
        var input = document.getElementById(id + '-search');
        if (!table || !input) return;
        input.addEventListener('keyup', function(e) {
          if (isCancel(e)) input.value = '';
          filterRows(table, input.value.toLowerCase());
        });
      });
    })();
  </script>
"#;

/// Wraps a rendered fragment in a standalone document.
///
/// `search_tables` lists the ids of tables that carry a search box; the
/// filter script is only emitted when it is non-empty.
pub fn render_document(title: &str, fragment: &str, search_tables: &[String]) -> String {
    let mut scripts = String::new();
    if !search_tables.is_empty() {
        let ids = serde_json::to_string(search_tables).unwrap_or_else(|_| "[]".to_string());
        scripts.push_str(&format!(
            "  <script type=\"application/json\" id=\"mt-search-tables\">{}</script>",
            json_for_script_tag(&ids)
        ));
        scripts.push_str(SEARCH_SCRIPT);
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta content="width=device-width, initial-scale=1.0" name="viewport">
  <title>{title}</title>
  <style>{STYLESHEET}  </style>
</head>
<body>
  {fragment}
{scripts}</body>
</html>
"#,
        title = escape_html(title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_without_search_has_no_script() {
        let html = render_document("People", "<div></div>", &[]);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>People</title>"));
        assert!(html.contains(".mt-header-sticky"));
        assert!(!html.contains("<script"));
    }

    #[test]
    fn document_with_search_embeds_table_ids() {
        let html = render_document(
            "<People>",
            "<div></div>",
            &["modern-table".to_string()],
        );
        assert!(html.contains("<title>&lt;People&gt;</title>"));
        assert!(html.contains(r#"id="mt-search-tables">["modern-table"]</script>"#));
        assert!(html.contains("addEventListener('keyup'"));
        assert!(html.contains("var match = query === '' ||"));
    }

    #[test]
    fn table_ids_cannot_close_the_script() {
        let html = render_document("t", "", &["</script>".to_string()]);
        assert!(html.contains(r#"["<\/script>"]"#));
    }
}
