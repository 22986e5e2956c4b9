use crate::table::{Alignment, ColumnConfig, ColumnFormat};

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Makes a string safe to embed inside a `<script>` element.
pub fn json_for_script_tag(value: &str) -> String {
    value.replace("</", "<\\/")
}

/// Parses a `--column` value: `NAME:key=value,key=value`.
///
/// Keys: `title`, `format`, `from`, `to`, `decimals`, `align`.
pub fn parse_column_spec(value: &str) -> Result<(String, ColumnConfig), String> {
    let raw = value.trim();
    let (name, settings) = raw.split_once(':').unwrap_or((raw, ""));
    let name = name.trim();
    if name.is_empty() {
        return Err("column name is empty".to_string());
    }

    let mut cfg = ColumnConfig::default();
    for part in settings.split(',') {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        let (key, val) = item
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{item}'"))?;
        let val = val.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "title" => cfg.display_title = Some(val.to_string()),
            "format" => {
                let format = ColumnFormat::parse(val)
                    .ok_or_else(|| format!("invalid format '{val}'"))?;
                cfg.format = Some(format);
            }
            "from" | "date-from" => cfg.date_source_pattern = Some(val.to_string()),
            "to" | "date-to" => cfg.date_display_pattern = Some(val.to_string()),
            "decimals" => {
                let n = val
                    .parse::<u32>()
                    .map_err(|_| format!("invalid decimals '{val}'"))?;
                if n > 20 {
                    return Err(format!("invalid decimals '{val}', expected 0-20"));
                }
                cfg.decimal_count = Some(n);
            }
            "align" | "alignment" => {
                let alignment = Alignment::parse(val)
                    .ok_or_else(|| format!("invalid alignment '{val}'"))?;
                cfg.alignment = Some(alignment);
            }
            other => return Err(format!("unknown column setting '{other}'")),
        }
    }
    Ok((name.to_string(), cfg))
}
