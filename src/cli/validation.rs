use crate::cli::args::CliArgs;
use crate::output::OutputFormat;
use crate::table::TitleStyle;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if args.url.is_some() && args.input_file.is_some() {
        return Err("use either --url or --input-file, not both".to_string());
    }
    if let Some(url) = args.url.as_deref() {
        reqwest::Url::parse(url).map_err(|e| format!("invalid --url '{url}': {e}"))?;
    }
    for raw in &args.column {
        crate::utils::parse_column_spec(raw)
            .map_err(|e| format!("invalid --column '{raw}': {e}"))?;
    }
    if let Some(raw) = args.title_style.as_deref() {
        if TitleStyle::parse(raw).is_none() {
            return Err(format!(
                "invalid --title-style '{raw}', expected first-underscore, all-underscores, or verbatim"
            ));
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected html or fragment"
            ));
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.header.as_deref() {
        let valid = raw
            .split_once(':')
            .is_some_and(|(k, _)| !k.trim().is_empty());
        if !valid {
            return Err(format!("invalid --header '{raw}', expected 'Key: Value'"));
        }
    }
    Ok(())
}
