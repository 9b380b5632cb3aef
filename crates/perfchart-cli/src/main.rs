use futures::executor::block_on;
use perfchart::render::{HeadlessError, SvgRenderOptions, sanitize_chart_id};
use perfchart::{ChartConfig, Dataset, RecordSource, TsvSource};
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Chart(HeadlessError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Chart(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Chart(value)
    }
}

impl From<perfchart::Error> for CliError {
    fn from(value: perfchart::Error) -> Self {
        Self::Chart(value.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Parse,
    Layout,
    Render,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    verbose: bool,
    config: Option<String>,
    chart_id: Option<String>,
    no_script: bool,
    out: Option<String>,
}

fn usage() -> &'static str {
    "perfchart-cli\n\
\n\
USAGE:\n\
  perfchart-cli [parse] [--pretty] [--config <path|json>] [<path>|-]\n\
  perfchart-cli layout [--pretty] [--config <path|json>] [<path>|-]\n\
  perfchart-cli render [--config <path|json>] [--id <chart-id>] [--no-script] [--out <path>] [<path>|-]\n\
\n\
OPTIONS:\n\
  --verbose   log pipeline details to stderr (same as RUST_LOG=debug)\n\
\n\
NOTES:\n\
  - Input is a tab-separated history with a `build` column and one column per scenario.\n\
  - '-' reads stdin; an omitted <path> falls back to the config's dataSource (data.tsv).\n\
  - --config takes a JSON object (inline, or a path to a file) overriding chart defaults.\n\
  - parse prints the parsed records as JSON; layout prints the chart model as JSON.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "parse" => args.command = Command::Parse,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            "--no-script" => args.no_script = true,
            "--config" => {
                let Some(cfg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(cfg.clone());
            }
            "--id" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.chart_id = Some(id.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(raw: Option<&str>) -> Result<ChartConfig, CliError> {
    let Some(raw) = raw else {
        return Ok(ChartConfig::default());
    };
    let text = if raw.trim_start().starts_with('{') {
        raw.to_string()
    } else {
        std::fs::read_to_string(raw)?
    };
    Ok(ChartConfig::from_json_str(&text)?)
}

fn open_source(input: Option<&str>, config: &ChartConfig) -> Result<TsvSource, CliError> {
    match input {
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(TsvSource::from_text(buf))
        }
        Some(path) => Ok(TsvSource::from_path(path)),
        None => Ok(TsvSource::from_path(config.data_source.as_str())),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn load(source: &dyn RecordSource, config: &ChartConfig) -> Result<Dataset, CliError> {
    tracing::debug!(source = %source.location(), "loading history");
    Ok(block_on(perfchart::load_dataset(source, config))?)
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let source = open_source(args.input.as_deref(), &config)?;
    let dataset = load(&source, &config)?;

    match args.command {
        Command::Parse => write_json(&dataset.records, args.pretty),
        Command::Layout => {
            let model = perfchart::render::build_chart_model(&dataset, &config);
            write_json(&model, args.pretty)
        }
        Command::Render => {
            let options = SvgRenderOptions {
                chart_id: args
                    .chart_id
                    .as_deref()
                    .map(sanitize_chart_id)
                    .unwrap_or_else(|| SvgRenderOptions::default().chart_id),
                include_hover_script: !args.no_script,
                ..SvgRenderOptions::default()
            };
            let svg = perfchart::render::render_dataset_svg(&dataset, &config, &options)?;
            write_text(&svg, args.out.as_deref())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    init_tracing(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
