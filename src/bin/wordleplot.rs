use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use wordle_plotter::stats::error_table;
use wordle_plotter::time::{format_clock, format_duration};
use wordle_plotter::{ReportConfig, report, storage};

#[derive(Parser, Debug)]
#[command(
    name = "wordleplot",
    version,
    about = "Aggregate a daily word-puzzle log and render comparative charts"
)]
struct Cli {
    /// Log progress (info level unless RUST_LOG says otherwise).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the full chart report.
    Report(ReportArgs),
    /// Print or save the per-date mean/std table.
    Stats(StatsArgs),
    /// List the persons in the log, in first-seen order.
    Names(NamesArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// CSV log to read.
    #[arg(short, long)]
    input: PathBuf,
    /// Output document (.svg or .png).
    #[arg(short, long)]
    out: PathBuf,
    /// Write one file per chart (`<stem>-NN.<ext>`) instead of one stacked document.
    #[arg(long, default_value_t = false)]
    split: bool,
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Right edge of date axes (YYYY-MM-DD); defaults to the local date.
    #[arg(long)]
    today: Option<NaiveDate>,
    /// Page width in pixels.
    #[arg(long)]
    width: Option<u32>,
    /// Page height in pixels.
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Args, Debug)]
struct StatsArgs {
    #[arg(short, long)]
    input: PathBuf,
    /// Restrict to one person.
    #[arg(short, long)]
    person: Option<String>,
    /// Save to file instead of printing (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct NamesArgs {
    #[arg(short, long)]
    input: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.cmd {
        Command::Report(args) => cmd_report(args),
        Command::Stats(args) => cmd_stats(args),
        Command::Names(args) => cmd_names(args),
    }
}

fn cmd_report(args: ReportArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ReportConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => ReportConfig::default(),
    };
    if let Some(today) = args.today {
        config.today = Some(today);
    }
    if let Some(w) = args.width {
        config.page_width = w;
    }
    if let Some(h) = args.height {
        config.page_height = h;
    }

    let written = report::run(&args.input, &args.out, &config, args.split)
        .with_context(|| format!("building report from {}", args.input.display()))?;
    for path in &written {
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> Result<()> {
    let table = storage::load_csv(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    let rows = error_table(&table, args.person.as_deref())?;

    let Some(path) = args.out.as_ref() else {
        println!("date        n  mean_time  std_time  mean_guesses  std_guesses");
        for r in &rows {
            println!(
                "{}  {:>2}  {:>9}  {:>8}  {:>12.2}  {:>11.2}",
                r.date,
                r.count,
                format_clock(r.mean_time),
                format_duration(r.std_dev_time),
                r.mean_guesses,
                r.std_dev_guesses
            );
        }
        return Ok(());
    };

    let fmt = match args.format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_error_table_csv(&rows, path)?,
        "json" => storage::save_error_table_json(&rows, path)?,
        other => anyhow::bail!("unsupported format: {}", other),
    }
    eprintln!("Saved {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn cmd_names(args: NamesArgs) -> Result<()> {
    let table = storage::load_csv(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    for name in table.distinct_persons() {
        println!("{name}");
    }
    Ok(())
}
