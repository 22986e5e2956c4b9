use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::json;

use crate::format::Formatter;
use crate::output::{self, OutputFormat};
use crate::runner::{ModernTable, TableView};
use crate::search::{self, Key, KeyUp, TableSearch};
use crate::table::{Alignment, ColumnConfig, ColumnFormat, DataSource, TableOptions, TableSpec};

fn write_temp_json(name: &str, value: &serde_json::Value) -> PathBuf {
    let path = std::env::temp_dir().join(format!("moderntable-{}-{name}.json", std::process::id()));
    std::fs::write(&path, value.to_string()).unwrap();
    path
}

fn staff_options() -> TableOptions {
    let mut columns = HashMap::new();
    columns.insert(
        "salary".to_string(),
        ColumnConfig {
            display_title: Some("annual_salary".to_string()),
            format: Some(ColumnFormat::CurrencyUs),
            decimal_count: Some(2),
            alignment: Some(Alignment::Right),
            ..Default::default()
        },
    );
    columns.insert(
        "hired_on".to_string(),
        ColumnConfig {
            format: Some(ColumnFormat::DateUs),
            date_source_pattern: Some("YYYY-MM-DD".to_string()),
            alignment: Some(Alignment::Center),
            ..Default::default()
        },
    );
    TableOptions {
        caption: "Staff".to_string(),
        columns,
        ..TableOptions::default()
    }
}

#[tokio::test]
async fn file_source_renders_formatted_table() {
    let path = write_temp_json(
        "staff",
        &json!([
            {"first_name": "Ada", "salary": 1234.5, "hired_on": "2021-03-07"},
            {"first_name": "Alan", "salary": 98000, "hired_on": "2019-11-30"}
        ]),
    );
    let table = ModernTable::new(
        TableSpec::new("table-container", "staff", DataSource::File(path.clone()))
            .with_options(staff_options()),
    )
    .unwrap();

    let rendered = table.build().await.unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(
        rendered.header_titles(),
        vec!["first name", "annual salary", "hired on"]
    );
    let first = &rendered.body_rows()[0];
    assert_eq!(first.children[1].text_content(), "$1,234.50");
    assert!(first.children[1].has_class("align-text-right"));
    assert_eq!(first.children[2].text_content(), "03/07/2021");
    assert!(first.children[2].has_class("align-text-center"));
    assert_eq!(
        rendered.body_rows()[1].children[1].text_content(),
        "$98,000.00"
    );
}

#[tokio::test]
async fn formatting_capabilities_can_be_dropped() {
    let path = write_temp_json(
        "raw",
        &json!([{"first_name": "Ada", "salary": 1234.5, "hired_on": "2021-03-07"}]),
    );
    let table = ModernTable::new(
        TableSpec::new("c", "t", DataSource::File(path.clone())).with_options(staff_options()),
    )
    .unwrap()
    .with_formatter(Formatter::builtin().without_number().without_date());

    let rendered = table.build().await.unwrap();
    let _ = std::fs::remove_file(&path);

    let row = &rendered.body_rows()[0];
    assert_eq!(row.children[1].text_content(), "1234.5");
    assert_eq!(row.children[2].text_content(), "2021-03-07");
}

#[tokio::test]
async fn search_then_page_output_hides_rows() {
    let path = write_temp_json(
        "search",
        &json!([
            {"name": "Ada Lovelace", "city": "London"},
            {"name": "Grace Hopper", "city": "New York"}
        ]),
    );
    let table =
        ModernTable::new(TableSpec::new("c", "people", DataSource::File(path.clone()))).unwrap();
    let mut view = table.build_view().await;
    let _ = std::fs::remove_file(&path);

    let TableView::Rendered(rendered) = &mut view else {
        panic!("expected a rendered table");
    };
    assert_eq!(search::apply_query(rendered, "YORK"), 1);

    let html = String::from_utf8(output::render_view(&view, OutputFormat::Html, "People")).unwrap();
    assert_eq!(html.matches(r#"<tr style="display: none">"#).count(), 1);
    assert!(html.contains(r#"id="people-search""#));
    assert!(html.contains("<title>People</title>"));
}

#[tokio::test]
async fn key_events_drive_the_filter() {
    let rows = crate::fetcher::decode_rows(
        br#"[{"sku":"A-1","qty":3},{"sku":"B-2","qty":30},{"sku":"C-3","qty":300}]"#,
        "inline",
    )
    .unwrap();
    let table = ModernTable::new(TableSpec::new("c", "t", DataSource::Inline(rows))).unwrap();
    let mut rendered = table.build().await.unwrap();
    let mut search = TableSearch::new();

    search.key_up(&mut rendered, KeyUp::typed("30"));
    assert_eq!(rendered.visible_rows(), 2);
    search.key_up(&mut rendered, KeyUp::typed("300"));
    assert_eq!(rendered.visible_rows(), 1);

    search.key_up(
        &mut rendered,
        KeyUp {
            key: Key::Char('z'),
            ctrl: true,
            meta: false,
            value: "300",
        },
    );
    assert_eq!(search.value(), "");
    assert_eq!(rendered.visible_rows(), 3);
    assert!(rendered.head_row().is_some_and(|r| !r.hidden));
}

#[tokio::test]
async fn non_array_file_becomes_data_shape_panel() {
    let path = write_temp_json("shape", &json!({"rows": []}));
    let table = ModernTable::new(TableSpec::new("c", "t", DataSource::File(path.clone()))).unwrap();
    let view = table.build_view().await;
    let _ = std::fs::remove_file(&path);

    let html = output::render_fragment(&view);
    assert!(!view.is_rendered());
    assert!(html.contains("DataShapeError"));
    assert!(!html.contains("<table"));
}

#[tokio::test]
async fn yaml_decimal_count_is_capped_and_huge_values_render() {
    let cfg = crate::config::parse_config(
        r#"
columns:
  ratio:
    format: number-grouped
    numDecimals: 4000000000
  share:
    format: percent
"#,
    )
    .unwrap();
    let options = TableOptions {
        columns: cfg.columns.unwrap(),
        ..TableOptions::default()
    };
    let rows = crate::fetcher::decode_rows(br#"[{"ratio":0.5,"share":1e27}]"#, "inline").unwrap();
    let table = ModernTable::new(
        TableSpec::new("c", "t", DataSource::Inline(rows)).with_options(options),
    )
    .unwrap();

    let rendered = table.build().await.unwrap();
    let row = &rendered.body_rows()[0];
    assert_eq!(
        row.children[0].text_content(),
        format!("0.5{}", "0".repeat(crate::format::number::MAX_DECIMALS as usize - 1))
    );
    assert_eq!(
        row.children[1].text_content(),
        "100,000,000,000,000,000,000,000,000,000%"
    );
}
