use std::path::PathBuf;
use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::fetcher::FetchOptions;
use crate::format::Formatter;
use crate::output::{self, OutputFormat};
use crate::runner::{ModernTable, TableView};
use crate::search;
use crate::table::{DataSource, TableOptions, TableSpec, TitleStyle};

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn status_line(tag: &str, message: &str) {
    eprintln!(
        "{}{}{} {}",
        "[".bold().white(),
        tag.bold().green(),
        "]".bold().white(),
        message
    );
}

fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let mut out = format!("{} {}\n", cmd.get_name(), cmd.get_version().unwrap_or(""));
    if let Some(about) = cmd.get_about() {
        out.push_str(&format!("{about}\n"));
    }
    if let Some(long_about) = cmd.get_long_about() {
        out.push_str(&format!("\n{long_about}\n"));
    }
    out.push_str(&format!("\nUsage: {} [OPTIONS]\n\n", cmd.get_name()));

    // headings keep the order in which their first flag is declared
    let mut sections: Vec<(&str, Vec<&clap::Arg>)> = Vec::new();
    for arg in cmd.get_arguments().filter(|a| !a.is_hide_set()) {
        let heading = arg.get_help_heading().unwrap_or("Options");
        match sections.iter_mut().find(|(h, _)| *h == heading) {
            Some((_, args)) => args.push(arg),
            None => sections.push((heading, vec![arg])),
        }
    }

    for (heading, args) in sections {
        out.push_str(&format!("{heading}:\n"));
        for arg in args {
            let mut names: Vec<String> = Vec::new();
            if let Some(short) = arg.get_short() {
                names.push(format!("-{short}"));
            }
            let longs = arg
                .get_long()
                .into_iter()
                .chain(arg.get_visible_aliases().unwrap_or_default());
            for long in longs {
                let rendered = format!("--{long}");
                if !names.contains(&rendered) {
                    names.push(rendered);
                }
            }

            let mut flags = names.join(", ");
            if arg.get_action().takes_values() {
                let value_name = arg
                    .get_value_names()
                    .and_then(|names| names.first())
                    .map(|name| name.as_str())
                    .unwrap_or("VALUE");
                let optional = arg.get_num_args().is_some_and(|r| r.min_values() == 0);
                if optional {
                    flags.push_str(&format!(" [<{value_name}>]"));
                } else {
                    flags.push_str(&format!(" <{value_name}>"));
                }
            }
            out.push_str(&format!("  {flags}\n"));

            let help = arg.get_help().map(|h| h.to_string()).unwrap_or_default();
            if !help.trim().is_empty() {
                out.push_str(&format!("          {}\n", help.trim()));
            }
            out.push('\n');
        }
    }

    out
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

#[derive(Debug)]
struct RunConfig {
    spec: TableSpec,
    fetch: FetchOptions,
    number_format: bool,
    date_format: bool,
    query: Option<String>,
    output: Option<String>,
    output_format: OutputFormat,
    page_title: String,
    no_color: bool,
}

fn resolve_source(args: &CliArgs, cfg: &ConfigFile) -> Result<DataSource, String> {
    // a source given on the command line replaces both config keys
    let (url, input_file) = if args.url.is_some() || args.input_file.is_some() {
        (args.url.clone(), args.input_file.clone())
    } else {
        (cfg.url.clone(), cfg.input_file.clone())
    };
    match (url, input_file) {
        (Some(_), Some(_)) => Err("config sets both url and input_file, choose one".to_string()),
        (Some(url), None) => Ok(DataSource::Url(url.trim().to_string())),
        (None, Some(path)) => Ok(DataSource::File(config::expand_tilde(path.trim()))),
        (None, None) => Err("a data source must be specified (--url or --input-file)".to_string()),
    }
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let source = resolve_source(&args, &cfg)?;

    let mut columns = cfg.columns.clone().unwrap_or_default();
    for raw in &args.column {
        let (name, column) = crate::utils::parse_column_spec(raw)
            .map_err(|e| format!("invalid --column '{raw}': {e}"))?;
        columns.insert(name, column);
    }

    let title_style_raw = args.title_style.clone().or(cfg.title_style.clone());
    let title_style = match title_style_raw.as_deref() {
        Some(raw) => TitleStyle::parse(raw).ok_or_else(|| format!("invalid title_style '{raw}'"))?,
        None => TitleStyle::default(),
    };

    let options = TableOptions {
        table_classes: args
            .table_classes
            .or(cfg.table_classes)
            .unwrap_or_default(),
        caption: args.caption.or(cfg.caption).unwrap_or_default(),
        footer: args.footer.or(cfg.footer).unwrap_or_default(),
        sticky_header: !args.no_sticky_header && cfg.sticky_header.unwrap_or(true),
        enable_search: !args.no_search && cfg.enable_search.unwrap_or(true),
        search_classes: args
            .search_classes
            .or(cfg.search_classes)
            .unwrap_or_default(),
        title_style,
        columns,
    };

    let container_id = args
        .container_id
        .or(cfg.container_id)
        .unwrap_or_else(|| crate::table::DEFAULT_CONTAINER_ID.to_string());
    let table_id = args
        .table_id
        .or(cfg.table_id)
        .unwrap_or_else(|| crate::table::DEFAULT_TABLE_ID.to_string());
    let spec = TableSpec::new(&container_id, &table_id, source).with_options(options);

    let fetch = FetchOptions {
        timeout_seconds: args.timeout.or(cfg.timeout).unwrap_or(10),
        proxy: args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty()),
        header: args.header.or(cfg.header).filter(|h| !h.trim().is_empty()),
        follow_redirects: args
            .follow_redirects
            .or(cfg.follow_redirects)
            .unwrap_or(true),
    };

    let output_path = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde(&p).to_string_lossy().to_string());
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output_format '{raw}', expected html or fragment"))?,
        None => output_path
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or_default(),
    };

    Ok(RunConfig {
        spec,
        fetch,
        number_format: !args.no_number_format && cfg.number_format.unwrap_or(true),
        date_format: !args.no_date_format && cfg.date_format.unwrap_or(true),
        query: args.query.filter(|q| !q.is_empty()),
        output: output_path,
        output_format,
        page_title: args
            .page_title
            .or(cfg.page_title)
            .unwrap_or_else(|| output::DEFAULT_PAGE_TITLE.to_string()),
        no_color: args.no_color || cfg.no_color.unwrap_or(false),
    })
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn write_output(path: Option<&str>, rendered: &[u8]) -> Result<(), String> {
    match path {
        Some(path) => {
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .await
                .map_err(|e| format!("failed to open output file: {e}"))?;
            outfile
                .write_all(rendered)
                .await
                .map_err(|e| format!("failed to write output file: {e}"))?;
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(rendered)
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
        }
    }
    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }

    let source = run.spec.source.describe();
    format_kv_line("Source", &source);
    format_kv_line("Table", &format!("#{}", run.spec.table_id));
    format_kv_line("Search", format_bool(run.spec.options.enable_search));
    format_kv_line("Format", run.output_format.as_str());
    format_kv_line("Output", run.output.as_deref().unwrap_or("stdout"));
    eprintln!();

    let mut formatter = Formatter::builtin();
    if !run.number_format {
        formatter = formatter.without_number();
    }
    if !run.date_format {
        formatter = formatter.without_date();
    }

    let table = ModernTable::new(run.spec)
        .map_err(|e| e.to_string())?
        .with_formatter(formatter)
        .with_fetch_options(run.fetch);

    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template(":: {spinner} {msg} [{elapsed_precise}]")
            .map_err(|e| format!("failed to build progress style: {e}"))?,
    );
    pb.set_message(format!("fetching {source}"));

    let now = Instant::now();
    let mut view = table.build_view().await;
    pb.finish_and_clear();

    if let (TableView::Rendered(rendered), Some(query)) = (&mut view, run.query.as_deref()) {
        let visible = search::apply_query(rendered, query);
        status_line(
            "SEARCH",
            &format!("'{query}' matched {visible} of {} rows", rendered.body_rows().len()),
        );
    }

    let bytes = output::render_view(&view, run.output_format, &run.page_title);
    write_output(run.output.as_deref(), &bytes).await?;

    match view {
        TableView::Rendered(rendered) => {
            status_line(
                "OK",
                &format!(
                    "rendered {} rows x {} columns in {}ms",
                    rendered.body_rows().len(),
                    rendered.columns.len(),
                    now.elapsed().as_millis()
                ),
            );
            Ok(())
        }
        TableView::Failed { panel, .. } => {
            if let Some(path) = run.output.as_deref() {
                eprintln!(
                    "{} error page written to {}",
                    "::".bold().yellow(),
                    path
                );
            }
            Err(format!("{}: {}", panel.kind, panel.message))
        }
    }
}

fn init_config(path: Option<PathBuf>) -> Result<(), String> {
    let path = path
        .or_else(config::default_config_path)
        .ok_or_else(|| "could not determine home directory for config file".to_string())?;
    let existed = path.exists();
    config::ensure_default_config_file(&path)?;
    if existed {
        status_line("OK", &format!("config already exists at {}", path.display()));
    } else {
        status_line("OK", &format!("wrote default config to {}", path.display()));
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_tracing(args.verbose);

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    if args.init_config {
        return init_config(user_config_path);
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
