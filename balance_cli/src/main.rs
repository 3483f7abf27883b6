//! # bbal - Blade Balance CLI
//!
//! Terminal front end for `balance_core`: analyze pasted magnitude/phase
//! rows, export reports, and generate entry grids.
//!
//! ```text
//! bbal analyze blades.txt --warn 1 --critical 10
//! pbpaste | bbal report - --html report.html --pdf report.pdf
//! bbal grid --blades 48 > template.tsv
//! bbal enter --blades 12
//! bbal config init
//! ```

use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::{debug, LevelFilter};

use balance_core::analysis::{Analysis, EMPTY_PLACEHOLDER};
use balance_core::grid::{grid_to_text, phase_grid};
use balance_core::parser::MalformedLinePolicy;
use balance_core::report::mailto::order_request_link;
use balance_core::report::{render_to_file, Report, ReportFormat, ReportMeta};
use balance_core::settings::{Settings, DEFAULT_SETTINGS_FILE};
use balance_core::{analyze, BalanceError, Thresholds};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "bbal", author, version, about = "Blade resultant unbalance calculator")]
struct Cli {
    /// Settings file (defaults to ./bbal.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,
    /// Only log errors
    #[arg(short = 'q', long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sum the blade phasors and grade the resultant
    Analyze {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
    /// Write HTML, PDF, JSON or SVG reports
    Report(ReportArgs),
    /// Print an evenly spaced entry template
    Grid(GridArgs),
    /// Prompt for each blade magnitude on an evenly spaced grid
    Enter(GridArgs),
    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Blade data file, `-` or omitted for stdin
    input: Option<PathBuf>,
    /// Lower bound of the attention band
    #[arg(long)]
    warn: Option<f64>,
    /// Upper bound of the attention band
    #[arg(long)]
    critical: Option<f64>,
    /// Fail on the first malformed line instead of skipping it
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[command(flatten)]
    input: InputArgs,
    #[arg(long)]
    html: Option<PathBuf>,
    #[arg(long)]
    pdf: Option<PathBuf>,
    #[arg(long)]
    json: Option<PathBuf>,
    #[arg(long)]
    svg: Option<PathBuf>,
    #[arg(long)]
    customer: Option<String>,
    #[arg(long)]
    engineer: Option<String>,
    #[arg(long)]
    title: Option<String>,
}

#[derive(Args, Debug)]
struct GridArgs {
    #[arg(long)]
    blades: usize,
    /// Phase of the first blade, degrees
    #[arg(long, default_value_t = 0.0)]
    start: f64,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default settings file
    Init {
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(balance_error) = e.downcast_ref::<BalanceError>() {
                if let Ok(json) = serde_json::to_string_pretty(balance_error) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{}", json);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(LevelFilter::Error);
    } else if let Some(lvl) = cli.log_level {
        let f = match lvl {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        };
        builder.filter_level(f);
    } else if cli.verbose > 0 {
        let f = match cli.verbose {
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        builder.filter_level(f);
    }
    builder.init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Analyze { input, output } => {
            let settings = load_settings(cli.config.as_deref(), &input)?;
            let analysis = analyze_input(&input, &settings)?;
            match output {
                OutputFormat::Text => print_analysis(&analysis, &settings),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&analysis).context("Failed to serialize analysis")?
                ),
            }
            Ok(())
        }
        Command::Report(args) => run_report(cli.config.as_deref(), args),
        Command::Grid(args) => {
            let grid = phase_grid(args.blades, args.start)?;
            println!("{}", grid_to_text(&grid));
            Ok(())
        }
        Command::Enter(args) => {
            let settings = Settings::load_or_default(cli.config.as_deref())?;
            run_enter(&settings, &args)
        }
        Command::Config {
            action: ConfigCommand::Init { path, force },
        } => {
            let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            Settings::default()
                .save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("[OK] wrote {}", path.display());
            Ok(())
        }
    }
}

/// Settings file, then command-line overrides.
fn load_settings(config: Option<&Path>, input: &InputArgs) -> Result<Settings> {
    let mut settings = Settings::load_or_default(config)?;
    if input.warn.is_some() || input.critical.is_some() {
        let warn = input.warn.unwrap_or(settings.thresholds.warn);
        let critical = input.critical.unwrap_or(settings.thresholds.critical.max(warn));
        settings.thresholds = Thresholds::new(warn, critical)?;
    }
    if input.strict {
        settings.parser.malformed_lines = MalformedLinePolicy::Reject;
    }
    debug!("effective settings: {:?}", settings);
    Ok(settings)
}

fn analyze_input(input: &InputArgs, settings: &Settings) -> Result<Analysis> {
    let text = read_input(input.input.as_deref())?;
    Ok(analyze(&text, settings)?)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            fs::read_to_string(p).with_context(|| format!("Failed to read {}", p.display()))
        }
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read blade data from stdin")?;
            Ok(text)
        }
    }
}

fn run_report(config: Option<&Path>, args: ReportArgs) -> Result<()> {
    let targets: Vec<(ReportFormat, &PathBuf)> = [
        (ReportFormat::Html, args.html.as_ref()),
        (ReportFormat::Pdf, args.pdf.as_ref()),
        (ReportFormat::Json, args.json.as_ref()),
        (ReportFormat::Svg, args.svg.as_ref()),
    ]
    .into_iter()
    .filter_map(|(format, path)| path.map(|p| (format, p)))
    .collect();
    if targets.is_empty() {
        bail!("No output requested; pass at least one of --html, --pdf, --json, --svg");
    }

    let mut settings = load_settings(config, &args.input)?;
    if let Some(customer) = args.customer {
        settings.report.customer = customer;
    }
    if let Some(engineer) = args.engineer {
        settings.report.engineer = engineer;
    }
    if let Some(title) = args.title {
        settings.report.title = title;
    }

    let analysis = analyze_input(&args.input, &settings)?;
    let report = Report::new(
        ReportMeta::from_settings(&settings.report),
        analysis,
        settings.chart.clone(),
    );

    for (format, path) in targets {
        render_to_file(&report, format, path)
            .with_context(|| format!("Failed to write {} report to {}", format, path.display()))?;
        println!("[OK] {} -> {}", format, path.display());
    }
    println!("{}", report.analysis.summary());
    Ok(())
}

fn prompt_magnitude(prompt: &str, default: f64) -> f64 {
    read_magnitude(&mut io::stdin().lock(), &mut io::stdout(), prompt, default)
}

/// Prompt until the answer is empty (keeps `default`) or a finite,
/// non-negative number. End of input or an IO error keeps `default`.
fn read_magnitude(
    input: &mut impl BufRead,
    out: &mut impl Write,
    prompt: &str,
    default: f64,
) -> f64 {
    loop {
        if write!(out, "{}", prompt).and_then(|_| out.flush()).is_err() {
            return default;
        }

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => return default,
            Ok(_) => {}
        }

        let answer = line.trim();
        if answer.is_empty() {
            return default;
        }
        match answer.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => return value,
            _ => {
                debug!("rejected magnitude entry {:?}", answer);
                let warning = format!("  '{}' is not a finite, non-negative number; try again", answer);
                if writeln!(out, "{}", warning).is_err() {
                    return default;
                }
            }
        }
    }
}

fn run_enter(settings: &Settings, args: &GridArgs) -> Result<()> {
    let mut records = phase_grid(args.blades, args.start)?;

    println!("B-Balance - Blade Magnitude Entry");
    println!("=================================");
    println!("{} blades, {:.3}° apart. Press Enter to keep 0.", records.len(), 360.0 / records.len() as f64);
    println!();

    for record in records.iter_mut() {
        let serial = record.serial.clone().unwrap_or_default();
        record.magnitude = prompt_magnitude(&format!("Blade {:>4} @ {:>8.3}° magnitude [0]: ", serial, record.phase), 0.0);
    }

    println!();
    let analysis = Analysis::from_records(records, settings.thresholds);
    print_analysis(&analysis, settings);
    println!();
    println!("Entered data (reusable with `bbal analyze`):");
    println!("{}", grid_to_text(&analysis.records));
    Ok(())
}

fn print_analysis(analysis: &Analysis, settings: &Settings) {
    if analysis.is_empty() {
        println!("{}", EMPTY_PLACEHOLDER);
        if analysis.skipped_count() > 0 {
            println!("Skipped lines: {}", analysis.skipped_count());
        }
        return;
    }

    let resultant = &analysis.resultant;
    println!("═══════════════════════════════════════");
    println!("  RESULTANT UNBALANCE");
    println!("═══════════════════════════════════════");
    println!();
    println!("  Blades:     {}", analysis.blade_count());
    println!("  Magnitude:  {:.6}", resultant.magnitude);
    println!("  Angle:      {:.2}°", resultant.angle);
    println!("  Sum X / Y:  {:.6} / {:.6}", resultant.sum_x, resultant.sum_y);
    println!(
        "  Band:       warn {} / critical {}",
        analysis.thresholds.warn, analysis.thresholds.critical
    );
    println!();
    println!("  {} {}", status_icon(analysis.class), analysis.class.headline());
    println!("  {}", analysis.class.diagnosis());

    println!();
    println!("  Skipped lines: {}", analysis.skipped_count());
    for skipped in &analysis.skipped {
        println!("    line {}: '{}' ({})", skipped.line_number, skipped.content, skipped.reason);
    }

    println!();
    println!("  Order request:");
    println!("  {}", order_request_link(&settings.report.contact_email, analysis));
    println!("═══════════════════════════════════════");
}

fn status_icon(class: balance_core::ToleranceClass) -> &'static str {
    match class {
        balance_core::ToleranceClass::Stable => "[OK]",
        balance_core::ToleranceClass::Attention => "[WARN]",
        balance_core::ToleranceClass::Critical => "[FAIL]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_typo_is_reprompted_not_zeroed() {
        let mut input = io::Cursor::new("12o\n-3\n120.5\n");
        let mut out = Vec::new();
        let magnitude = read_magnitude(&mut input, &mut out, "m: ", 0.0);

        assert_eq!(magnitude, 120.5);
        let shown = String::from_utf8(out).unwrap();
        assert_eq!(shown.matches("m: ").count(), 3);
        assert!(shown.contains("'12o' is not a finite"));
        assert!(shown.contains("'-3' is not a finite"));
    }

    #[test]
    fn test_empty_answer_and_eof_keep_default() {
        let mut out = Vec::new();
        assert_eq!(read_magnitude(&mut io::Cursor::new("\n"), &mut out, "m: ", 7.0), 7.0);
        assert_eq!(read_magnitude(&mut io::Cursor::new(""), &mut out, "m: ", 7.0), 7.0);
        assert_eq!(read_magnitude(&mut io::Cursor::new("abc"), &mut out, "m: ", 7.0), 7.0);
    }

    #[test]
    fn test_parse_report_flags() {
        let cli = Cli::try_parse_from([
            "bbal", "-vv", "report", "blades.txt", "--html", "out.html", "--pdf", "out.pdf", "--warn", "1",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Report(args) => {
                assert_eq!(args.input.input.as_deref(), Some(Path::new("blades.txt")));
                assert_eq!(args.html.as_deref(), Some(Path::new("out.html")));
                assert!(args.json.is_none());
                assert_eq!(args.input.warn, Some(1.0));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_threshold_overrides() {
        let input = InputArgs {
            input: None,
            warn: Some(2.0),
            critical: None,
            strict: true,
        };
        let settings = load_settings(Some(Path::new("/nonexistent/bbal.toml")), &input);
        assert!(settings.is_err());

        let dir = std::env::temp_dir().join("bbal_cli_test_settings.toml");
        Settings::default().save(&dir).unwrap();
        let settings = load_settings(Some(&dir), &input).unwrap();
        assert_eq!(settings.thresholds.warn, 2.0);
        assert_eq!(settings.thresholds.critical, 2.0);
        assert_eq!(settings.parser.malformed_lines, MalformedLinePolicy::Reject);
        let _ = fs::remove_file(&dir);
    }
}
