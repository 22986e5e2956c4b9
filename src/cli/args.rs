use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "moderntable",
    version,
    about = "render JSON data as a searchable HTML table",
    long_about = "ModernTable fetches a JSON array of objects and renders it as an HTML table with per-column formatting, alignment, a sticky header and a search box.\n\nExamples:\n  moderntable -u https://example.com/api/people.json -o people.html\n  moderntable -i ./people.json --column salary:format=currency-us,decimals=2,align=right\n  moderntable -u https://example.com/api/people.json -q ada -A fragment\n\nTip: Use --config to persist table settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'u',
        long = "u",
        visible_alias = "url",
        value_name = "URL",
        help_heading = "Input",
        help = "URL of the JSON data (an array of objects)."
    )]
    pub url: Option<String>,

    #[arg(
        short = 'i',
        long = "if",
        visible_alias = "input-file",
        value_name = "FILE",
        help_heading = "Input",
        help = "Read the JSON data from a local file instead of a URL."
    )]
    pub input_file: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.moderntable/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "cid",
        visible_alias = "container-id",
        value_name = "ID",
        help_heading = "Table",
        help = "Id of the element holding the table (default: table-container)."
    )]
    pub container_id: Option<String>,

    #[arg(
        long = "tid",
        visible_alias = "table-id",
        value_name = "ID",
        help_heading = "Table",
        help = "Id given to the table element (default: modern-table)."
    )]
    pub table_id: Option<String>,

    #[arg(
        long = "tc",
        visible_alias = "table-classes",
        value_name = "CLASSES",
        help_heading = "Table",
        help = "Extra space-separated classes for the table element."
    )]
    pub table_classes: Option<String>,

    #[arg(
        long = "cap",
        visible_alias = "caption",
        value_name = "TEXT",
        help_heading = "Table",
        help = "Table caption."
    )]
    pub caption: Option<String>,

    #[arg(
        long = "ftr",
        visible_alias = "footer",
        value_name = "TEXT",
        help_heading = "Table",
        help = "Table footer text."
    )]
    pub footer: Option<String>,

    #[arg(
        long = "nsh",
        visible_alias = "no-sticky-header",
        help_heading = "Table",
        help = "Do not pin the header row while scrolling."
    )]
    pub no_sticky_header: bool,

    #[arg(
        long = "col",
        visible_alias = "column",
        value_name = "NAME:KEY=VALUE,...",
        action = ArgAction::Append,
        help_heading = "Table",
        help = "Column settings (repeatable). Keys: title, format, from, to, decimals, align."
    )]
    pub column: Vec<String>,

    #[arg(
        long = "tst",
        visible_alias = "title-style",
        value_name = "STYLE",
        help_heading = "Table",
        help = "How underscores in column keys become spaces (first-underscore, all-underscores, verbatim)."
    )]
    pub title_style: Option<String>,

    #[arg(
        long = "nnf",
        visible_alias = "no-number-format",
        help_heading = "Formatting",
        help = "Leave number columns unformatted."
    )]
    pub no_number_format: bool,

    #[arg(
        long = "ndf",
        visible_alias = "no-date-format",
        help_heading = "Formatting",
        help = "Leave date columns unformatted."
    )]
    pub no_date_format: bool,

    #[arg(
        long = "ns",
        visible_alias = "no-search",
        help_heading = "Search",
        help = "Do not render the search box."
    )]
    pub no_search: bool,

    #[arg(
        long = "sc",
        visible_alias = "search-classes",
        value_name = "CLASSES",
        help_heading = "Search",
        help = "Extra space-separated classes for the search box."
    )]
    pub search_classes: Option<String>,

    #[arg(
        short = 'q',
        long = "qry",
        visible_alias = "query",
        value_name = "TEXT",
        help_heading = "Search",
        help = "Pre-filter rows as if TEXT had been typed into the search box."
    )]
    pub query: Option<String>,

    #[arg(
        short = 'p',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'F',
        long = "frd",
        visible_alias = "follow-redirects",
        num_args = 0..=1,
        default_missing_value = "true",
        value_name = "BOOL",
        help_heading = "HTTP",
        help = "Follow HTTP redirects (default: true)."
    )]
    pub follow_redirects: Option<bool>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'H',
        long = "hdr",
        visible_alias = "header",
        value_name = "HEADER",
        help_heading = "HTTP",
        help = "Add a header to the data request (format: 'Key: Value')."
    )]
    pub header: Option<String>,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the table to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (html or fragment)."
    )]
    pub output_format: Option<String>,

    #[arg(
        long = "pt",
        visible_alias = "page-title",
        value_name = "TEXT",
        help_heading = "Output",
        help = "Title of the generated HTML page."
    )]
    pub page_title: Option<String>,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Input",
        help = "Write a default config file (if missing) and exit."
    )]
    pub init_config: bool,
}
