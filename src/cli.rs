//! CLI definition and dispatch.

use chrono::{Duration, Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::adapters::json_chart_adapter::JsonChartAdapter;
use crate::domain::catalog::{self, STOCKS};
use crate::domain::error::DashboardError;
use crate::domain::options::{self, DashboardRequest, IndicatorOptions};
use crate::domain::pipeline;
use crate::ports::chart_port::ChartPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

/// Default look-back window when no start date is configured.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

#[derive(Parser, Debug)]
#[command(name = "stockdash", about = "Stock price dashboard with technical indicators")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch one stock, derive its indicators and write the charts
    Show(ShowArgs),
    /// List the preset stocks
    Tickers,
    /// Start the web dashboard
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        listen: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    Yahoo,
    Csv,
}

impl ProviderKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "yahoo" => Some(Self::Yahoo),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

fn parse_ticker(value: &str) -> Result<String, String> {
    options::validate_ticker(value)
}

fn parse_period(value: &str) -> Result<usize, String> {
    let period: usize = value
        .parse()
        .map_err(|_| format!("{value:?} is not a whole number"))?;
    options::validate_period(period)
}

#[derive(Args, Debug, Default)]
pub struct ShowArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(short, long, value_parser = parse_ticker)]
    pub ticker: Option<String>,
    /// First day to fetch (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// Day after the last one to fetch (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
    #[arg(long, conflicts_with = "no_sma")]
    pub sma: bool,
    #[arg(long)]
    pub no_sma: bool,
    #[arg(long, value_parser = parse_period)]
    pub sma_period: Option<usize>,
    #[arg(long, conflicts_with = "no_ema")]
    pub ema: bool,
    #[arg(long)]
    pub no_ema: bool,
    #[arg(long, value_parser = parse_period)]
    pub ema_period: Option<usize>,
    #[arg(long, conflicts_with = "no_bollinger")]
    pub bollinger: bool,
    #[arg(long)]
    pub no_bollinger: bool,
    #[arg(long, conflicts_with = "no_rsi")]
    pub rsi: bool,
    #[arg(long)]
    pub no_rsi: bool,
    #[arg(long, conflicts_with = "no_macd")]
    pub macd: bool,
    #[arg(long)]
    pub no_macd: bool,
    /// Output file; JSON goes to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,
    #[arg(long)]
    pub csv_dir: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Show(args) => run_show(&args),
        Command::Tickers => run_tickers(),
        Command::Serve { config, listen } => run_serve(config.as_ref(), listen.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = DashboardError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_optional_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    match path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            load_config(path)
        }
        None => FileConfigAdapter::from_string("").map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }),
    }
}

fn config_date(
    config: &dyn ConfigPort,
    key: &str,
    default: NaiveDate,
) -> Result<NaiveDate, DashboardError> {
    match config.get_string("dashboard", key) {
        Some(value) => NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
            DashboardError::ConfigInvalid {
                section: "dashboard".into(),
                key: key.into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            }
        }),
        None => Ok(default),
    }
}

fn invalid_indicator(key: &str, reason: String) -> DashboardError {
    DashboardError::ConfigInvalid {
        section: "indicators".into(),
        key: key.into(),
        reason,
    }
}

fn config_period(config: &dyn ConfigPort, key: &str) -> Result<usize, DashboardError> {
    let value = config
        .get_int("indicators", key, options::DEFAULT_PERIOD as i64)
        .map_err(|reason| invalid_indicator(key, reason))?;
    let period = usize::try_from(value)
        .map_err(|_| invalid_indicator(key, format!("{value} is negative")))?;
    options::validate_period(period).map_err(|reason| invalid_indicator(key, reason))
}

fn config_flag(config: &dyn ConfigPort, key: &str, default: bool) -> Result<bool, DashboardError> {
    config
        .get_bool("indicators", key, default)
        .map_err(|reason| invalid_indicator(key, reason))
}

/// Builds the initial selection from the `[dashboard]` and `[indicators]`
/// sections. Missing dates default to the year ending `today`.
pub fn build_request(
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<DashboardRequest, DashboardError> {
    let ticker = match config
        .get_string("dashboard", "ticker")
        .filter(|t| !t.trim().is_empty())
    {
        Some(value) => {
            options::validate_ticker(&value).map_err(|reason| DashboardError::ConfigInvalid {
                section: "dashboard".into(),
                key: "ticker".into(),
                reason,
            })?
        }
        None => catalog::default_ticker().to_string(),
    };
    let start_date = config_date(
        config,
        "start_date",
        today - Duration::days(DEFAULT_LOOKBACK_DAYS),
    )?;
    let end_date = config_date(config, "end_date", today)?;

    let defaults = IndicatorOptions::default();
    let indicators = IndicatorOptions {
        show_sma: config_flag(config, "show_sma", defaults.show_sma)?,
        sma_period: config_period(config, "sma_period")?,
        show_ema: config_flag(config, "show_ema", defaults.show_ema)?,
        ema_period: config_period(config, "ema_period")?,
        show_bollinger: config_flag(config, "show_bollinger", defaults.show_bollinger)?,
        show_rsi: config_flag(config, "show_rsi", defaults.show_rsi)?,
        show_macd: config_flag(config, "show_macd", defaults.show_macd)?,
    };

    Ok(DashboardRequest::new(&ticker, start_date, end_date).with_indicators(indicators))
}

/// Sets `flag` when `on`, clears it when `off`, and otherwise leaves it.
fn toggle(flag: &mut bool, on: bool, off: bool) {
    if on {
        *flag = true;
    }
    if off {
        *flag = false;
    }
}

/// Applies command-line flags on top of the configured selection.
pub fn apply_overrides(mut request: DashboardRequest, args: &ShowArgs) -> DashboardRequest {
    if let Some(ticker) = &args.ticker {
        request.ticker = options::normalize_ticker(ticker);
    }
    if let Some(start) = args.start {
        request.start_date = start;
    }
    if let Some(end) = args.end {
        request.end_date = end;
    }

    let ind = &mut request.indicators;
    toggle(&mut ind.show_sma, args.sma, args.no_sma);
    if let Some(period) = args.sma_period {
        ind.sma_period = period;
    }
    toggle(&mut ind.show_ema, args.ema, args.no_ema);
    if let Some(period) = args.ema_period {
        ind.ema_period = period;
    }
    toggle(&mut ind.show_bollinger, args.bollinger, args.no_bollinger);
    toggle(&mut ind.show_rsi, args.rsi, args.no_rsi);
    toggle(&mut ind.show_macd, args.macd, args.no_macd);

    request
}

/// Creates the market-data adapter named by `[provider] kind` or `kind`.
pub fn build_data_port(
    config: &dyn ConfigPort,
    kind: Option<ProviderKind>,
    csv_dir: Option<&Path>,
) -> Result<Box<dyn DataPort + Send + Sync>, DashboardError> {
    let kind = match kind {
        Some(k) => k,
        None => match config.get_string("provider", "kind") {
            Some(value) => {
                ProviderKind::parse(&value).ok_or_else(|| DashboardError::ConfigInvalid {
                    section: "provider".into(),
                    key: "kind".into(),
                    reason: format!("unknown provider {value:?} (expected yahoo or csv)"),
                })?
            }
            None if cfg!(feature = "yahoo") => ProviderKind::Yahoo,
            None => ProviderKind::Csv,
        },
    };

    match kind {
        ProviderKind::Csv => {
            let dir = match csv_dir {
                Some(dir) => dir.to_path_buf(),
                None => config
                    .get_string("provider", "csv_dir")
                    .map(PathBuf::from)
                    .ok_or_else(|| DashboardError::ConfigMissing {
                        section: "provider".into(),
                        key: "csv_dir".into(),
                    })?,
            };
            Ok(Box::new(CsvAdapter::new(dir)))
        }
        ProviderKind::Yahoo => build_yahoo(config),
    }
}

#[cfg(feature = "yahoo")]
fn build_yahoo(config: &dyn ConfigPort) -> Result<Box<dyn DataPort + Send + Sync>, DashboardError> {
    use crate::adapters::yahoo_adapter::{DEFAULT_BASE_URL, YahooAdapter};

    let base_url = config
        .get_string("provider", "base_url")
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let adapter =
        YahooAdapter::with_base_url(base_url).map_err(|e| DashboardError::ConfigInvalid {
            section: "provider".into(),
            key: "base_url".into(),
            reason: e.to_string(),
        })?;
    Ok(Box::new(adapter))
}

#[cfg(not(feature = "yahoo"))]
fn build_yahoo(_config: &dyn ConfigPort) -> Result<Box<dyn DataPort + Send + Sync>, DashboardError> {
    Err(DashboardError::ConfigInvalid {
        section: "provider".into(),
        key: "kind".into(),
        reason: "yahoo feature is not enabled".into(),
    })
}

/// Runs one interaction for `request`, writing charts or messages to `sink`.
///
/// `Ok` carries the exit code once the sink has been written, including
/// when it only holds failure messages. `Err` means the sink itself failed.
pub fn run_dashboard(
    data_port: &dyn DataPort,
    sink: &mut dyn ChartPort,
    request: &DashboardRequest,
) -> Result<ExitCode, ExitCode> {
    eprintln!(
        "Fetching {} from {} to {}",
        request.ticker, request.start_date, request.end_date
    );
    match pipeline::run_interaction(data_port, sink, request) {
        Ok(None) => Ok(ExitCode::SUCCESS),
        Ok(Some(failure)) => {
            for message in pipeline::failure_messages(&failure) {
                eprintln!("error: {message}");
            }
            Ok((&failure).into())
        }
        Err(e) => {
            eprintln!("error: {e}");
            Err((&e).into())
        }
    }
}

fn run_show(args: &ShowArgs) -> ExitCode {
    let config = match load_optional_config(args.config.as_ref()) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let request = match build_request(&config, Local::now().date_naive()) {
        Ok(r) => apply_overrides(r, args),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = match build_data_port(&config, args.provider, args.csv_dir.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let format = args.format.unwrap_or(match &args.output {
        Some(path) if path.extension().is_some_and(|ext| ext == "json") => OutputFormat::Json,
        Some(_) => OutputFormat::Html,
        None => OutputFormat::Json,
    });

    match format {
        OutputFormat::Html => {
            let output = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from("dashboard.html"));
            let mut sink = HtmlReportAdapter::new(&output);
            match run_dashboard(data_port.as_ref(), &mut sink, &request) {
                Ok(code) => {
                    eprintln!("Dashboard written to: {}", output.display());
                    code
                }
                Err(code) => code,
            }
        }
        OutputFormat::Json => {
            let writer: Box<dyn Write> = match &args.output {
                Some(path) => match File::create(path) {
                    Ok(f) => Box::new(BufWriter::new(f)),
                    Err(e) => {
                        let err = DashboardError::Io(e);
                        eprintln!("error: failed to create {}: {err}", path.display());
                        return (&err).into();
                    }
                },
                None => Box::new(io::stdout().lock()),
            };
            let mut sink = JsonChartAdapter::new(writer);
            match run_dashboard(data_port.as_ref(), &mut sink, &request) {
                Ok(code) | Err(code) => code,
            }
        }
    }
}

fn run_tickers() -> ExitCode {
    for stock in STOCKS {
        println!("{}\t{}", stock.ticker, stock.label);
    }
    ExitCode::SUCCESS
}

fn run_serve(config_path: Option<&PathBuf>, listen: Option<&str>) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};
        use std::net::SocketAddr;
        use std::sync::Arc;

        let config = match load_optional_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let defaults = match build_request(&config, Local::now().date_naive()) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let data_port: Arc<dyn DataPort + Send + Sync> =
            match build_data_port(&config, None, None) {
                Ok(p) => Arc::from(p),
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            };

        let listen = listen
            .map(str::to_string)
            .or_else(|| config.get_string("web", "listen"))
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let addr: SocketAddr = match listen.parse() {
            Ok(a) => a,
            Err(_) => {
                let err = DashboardError::ConfigInvalid {
                    section: "web".into(),
                    key: "listen".into(),
                    reason: format!("{listen:?} is not a socket address"),
                };
                eprintln!("error: {err}");
                return (&err).into();
            }
        };

        let router = build_router(AppState {
            data_port: Arc::clone(&data_port),
            defaults,
        });

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                eprintln!("error: failed to start runtime: {e}");
                return ExitCode::from(1);
            }
        };

        eprintln!("Starting web server on {}", addr);
        let served = runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, router).await
        });
        drop(runtime);
        drop(data_port);

        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: web server failed: {e}");
                ExitCode::from(1)
            }
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = (config_path, listen);
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_show_flags() {
        let cli = Cli::try_parse_from([
            "stockdash",
            "show",
            "--ticker",
            "tsla",
            "--start",
            "2024-01-01",
            "--rsi",
            "--sma-period",
            "50",
            "--format",
            "json",
        ])
        .unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.ticker.as_deref(), Some("TSLA"));
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert!(args.rsi);
        assert_eq!(args.sma_period, Some(50));
        assert_eq!(args.format, Some(OutputFormat::Json));
    }

    #[test]
    fn cli_rejects_period_out_of_range() {
        assert!(Cli::try_parse_from(["stockdash", "show", "--sma-period", "101"]).is_err());
        assert!(Cli::try_parse_from(["stockdash", "show", "--ema-period", "4"]).is_err());
    }

    #[test]
    fn cli_rejects_conflicting_indicator_flags() {
        for name in ["sma", "ema", "bollinger", "rsi", "macd"] {
            let on = format!("--{name}");
            let off = format!("--no-{name}");
            assert!(
                Cli::try_parse_from(["stockdash", "show", on.as_str(), off.as_str()]).is_err(),
                "{name}"
            );
        }
    }

    #[test]
    fn cli_parses_every_no_flag() {
        let cli = Cli::try_parse_from([
            "stockdash",
            "show",
            "--no-ema",
            "--no-bollinger",
            "--no-rsi",
            "--no-macd",
        ])
        .unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert!(args.no_ema && args.no_bollinger && args.no_rsi && args.no_macd);
        assert!(!args.no_sma);
    }

    #[test]
    fn cli_rejects_path_like_ticker() {
        assert!(Cli::try_parse_from(["stockdash", "show", "--ticker", "../secret"]).is_err());
        assert!(Cli::try_parse_from(["stockdash", "show", "--ticker", "AAPL?x"]).is_err());
    }

    #[test]
    fn provider_kind_parses_case_insensitively() {
        assert_eq!(ProviderKind::parse(" CSV "), Some(ProviderKind::Csv));
        assert_eq!(ProviderKind::parse("yahoo"), Some(ProviderKind::Yahoo));
        assert_eq!(ProviderKind::parse("bloomberg"), None);
    }
}
