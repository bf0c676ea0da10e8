// Command-line front end for weave.
//
// Running with no arguments converts every pchtxt file below the current
// directory, which is how the tool is normally launched (double-click in a
// mod folder). Subcommands expose the parser and the container decoder for
// troubleshooting.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use owo_colors::{OwoColorize, Style};

use crate::io::{FileOutcome, FileReport, RunSummary, convert_all, discover};
use crate::ips32::{self, PatchRecord};
use crate::pchtxt::{self, DEFAULT_DISPLAY_NAME};

/// Payload bytes shown per record by `inspect` and `parse`.
const PREVIEW_BYTES: usize = 16;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// pchtxt to IPS32 patch converter.
#[derive(Parser, Debug)]
#[command(
    name = "weave",
    version,
    about = "Convert pchtxt patch files to IPS32 containers"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Cmd>,

    #[command(flatten)]
    convert: ConvertArgs,

    /// Quiet mode (only failures and the summary).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose logging (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Print results as JSON to stdout instead of status lines.
    #[arg(long = "json", global = true)]
    json_output: bool,

    /// Exit without waiting for Enter.
    #[arg(long = "no-pause", global = true)]
    no_pause: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Convert every pchtxt file below a directory (the default).
    Convert(ConvertArgs),
    /// List the records stored in an IPS32 container.
    Inspect(FileArgs),
    /// Show what a pchtxt file parses to, without writing anything.
    Parse(FileArgs),
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Directory to search recursively (default: current directory).
    #[arg(value_hint = ValueHint::DirPath)]
    root: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FileArgs {
    /// Input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Convert,
    Inspect,
    Parse,
}

#[derive(Debug)]
struct Options {
    command: Command,
    root: PathBuf,
    input_file: Option<PathBuf>,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    pause: bool,
}

fn resolve_options(cli: Cli) -> Options {
    let (command, root, input_file) = match cli.command {
        None => (Command::Convert, cli.convert.root, None),
        Some(Cmd::Convert(args)) => (Command::Convert, args.root.or(cli.convert.root), None),
        Some(Cmd::Inspect(args)) => (Command::Inspect, None, Some(args.input)),
        Some(Cmd::Parse(args)) => (Command::Parse, None, Some(args.input)),
    };

    Options {
        command,
        root: root.unwrap_or_else(|| PathBuf::from(".")),
        input_file,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
        // Only a convert run ends with the prompt.
        pause: command == Command::Convert && !cli.no_pause && !cli.json_output,
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("weave".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// Styling
// ---------------------------------------------------------------------------

struct Palette {
    title: Style,
    dim: Style,
    bold: Style,
    ok: Style,
    skip: Style,
    fail: Style,
}

impl Palette {
    fn new(color: bool) -> Self {
        if !color {
            let plain = Style::new();
            return Self {
                title: plain,
                dim: plain,
                bold: plain,
                ok: plain,
                skip: plain,
                fail: plain,
            };
        }
        Self {
            title: Style::new().purple().bold(),
            dim: Style::new().dimmed(),
            bold: Style::new().bold(),
            ok: Style::new().green(),
            skip: Style::new().yellow(),
            fail: Style::new().red(),
        }
    }

    fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self::new(io::stdout().is_terminal() && !no_color)
    }
}

fn hex_preview(payload: &[u8]) -> String {
    let shown = &payload[..payload.len().min(PREVIEW_BYTES)];
    let mut s = hex::encode_upper(shown);
    if payload.len() > PREVIEW_BYTES {
        s.push_str("...");
    }
    s
}

fn record_json(record: &PatchRecord) -> serde_json::Value {
    serde_json::json!({
        "address": format!("{:#010X}", record.address),
        "len": record.payload.len(),
        "payload": hex::encode_upper(&record.payload),
    })
}

fn print_json(value: &serde_json::Value) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{s}");
            0
        }
        Err(e) => {
            eprintln!("weave: json: {e}");
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Convert command
// ---------------------------------------------------------------------------

fn folder_display(input: &Path) -> String {
    match input.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.display().to_string(),
        _ => ".".to_string(),
    }
}

fn print_report(p: &Palette, report: &FileReport, index: usize, total: usize, quiet: bool) {
    if quiet && !report.outcome.is_failed() {
        return;
    }

    let status = match report.outcome {
        FileOutcome::Created { .. } => p.ok,
        FileOutcome::Skipped { .. } => p.skip,
        FileOutcome::Failed { .. } => p.fail,
    };
    let name = report
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| report.input.display().to_string());

    println!(
        "  {} {}",
        format!("[{index}/{total}]").style(status),
        name.style(p.bold)
    );
    println!(
        "   {}{}",
        "│ Folder:   ".style(p.dim),
        folder_display(&report.input)
    );
    if report.binary_id.is_some() {
        let label = report.label.as_deref().unwrap_or(DEFAULT_DISPLAY_NAME);
        println!("   {}{label}", "│ Mod:      ".style(p.dim));
    }

    let line = match &report.outcome {
        FileOutcome::Created { output, .. } => {
            let file = output
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("Created {file}").style(p.ok).to_string()
        }
        FileOutcome::Skipped { .. } => "Skipped (File exists)".style(p.skip).to_string(),
        FileOutcome::Failed { reason } => format!("Failed: {reason}").style(p.fail).to_string(),
    };
    println!("   {} {line}", "└".style(p.dim));
    println!();
}

fn print_summary(p: &Palette, summary: &RunSummary) {
    println!("  {}", "─".repeat(40).style(p.dim));
    println!("  {}", "Finished".style(p.bold));
    if summary.created > 0 {
        println!("  {}", format!("• Created: {}", summary.created).style(p.ok));
    }
    if summary.skipped > 0 {
        println!("  {}", format!("• Skipped: {}", summary.skipped).style(p.skip));
    }
    if summary.failed > 0 {
        println!("  {}", format!("• Failed:  {}", summary.failed).style(p.fail));
    }
    println!();
}

fn reports_json(reports: &[FileReport], summary: &RunSummary) -> serde_json::Value {
    let files: Vec<_> = reports
        .iter()
        .map(|r| {
            let (status, output, detail) = match &r.outcome {
                FileOutcome::Created { output, stats } => (
                    "created",
                    Some(output.display().to_string()),
                    serde_json::json!({
                        "container_size": stats.container_size,
                        "sha256": stats.sha256.map(hex::encode),
                    }),
                ),
                FileOutcome::Skipped { output } => (
                    "skipped",
                    Some(output.display().to_string()),
                    serde_json::Value::Null,
                ),
                FileOutcome::Failed { reason } => (
                    "failed",
                    None,
                    serde_json::json!({ "reason": reason.to_string() }),
                ),
            };
            serde_json::json!({
                "input": r.input.display().to_string(),
                "binary_id": r.binary_id,
                "name": r.label,
                "records": r.records,
                "status": status,
                "output": output,
                "detail": detail,
            })
        })
        .collect();

    serde_json::json!({
        "files": files,
        "created": summary.created,
        "skipped": summary.skipped,
        "failed": summary.failed,
    })
}

fn cmd_convert(opts: &Options) -> i32 {
    let p = Palette::detect();
    let human = !opts.json_output;

    if human && !opts.quiet {
        println!();
        println!("  {}", "WEAVE: PCHTXT TO IPS CONVERTER".style(p.title));
        println!("  {}", "Looking for patch files...".style(p.dim));
        println!();
    }

    let files = discover(&opts.root);
    log::debug!("found {} pchtxt files under {}", files.len(), opts.root.display());

    if files.is_empty() {
        if human {
            println!("  {}", "No .pchtxt files found here.".style(p.skip));
        } else {
            return print_json(&reports_json(&[], &RunSummary::default()));
        }
        return 0;
    }

    let reports = convert_all(&files);
    let summary = RunSummary::from_reports(&reports);

    if !human {
        return print_json(&reports_json(&reports, &summary));
    }

    for (i, report) in reports.iter().enumerate() {
        print_report(&p, report, i + 1, reports.len(), opts.quiet);
    }
    print_summary(&p, &summary);

    0
}

fn wait_for_enter() {
    if !io::stdin().is_terminal() {
        return;
    }
    print!("  Press Enter to close...");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

// ---------------------------------------------------------------------------
// Inspect command
// ---------------------------------------------------------------------------

fn cmd_inspect(opts: &Options) -> i32 {
    let Some(path) = &opts.input_file else {
        eprintln!("weave: inspect requires an input file");
        return 1;
    };

    let data = match std::fs::read(path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("weave: {}: {e}", path.display());
            return 1;
        }
    };
    let records = match ips32::decode_all(&data) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("weave: {}: {e}", path.display());
            return 1;
        }
    };

    if opts.json_output {
        let list: Vec<_> = records.iter().map(record_json).collect();
        return print_json(&serde_json::json!({
            "file": path.display().to_string(),
            "size": data.len(),
            "records": list,
        }));
    }

    println!("{}: IPS32, {} records, {} bytes", path.display(), records.len(), data.len());
    for record in &records {
        println!(
            "  {:#010X}  {:>5}  {}",
            record.address,
            record.payload.len(),
            hex_preview(&record.payload)
        );
    }

    0
}

// ---------------------------------------------------------------------------
// Parse command
// ---------------------------------------------------------------------------

fn cmd_parse(opts: &Options) -> i32 {
    let Some(path) = &opts.input_file else {
        eprintln!("weave: parse requires an input file");
        return 1;
    };

    let parsed = pchtxt::parse_file(path);
    if let Some(err) = &parsed.error {
        eprintln!("weave: {}: {err}", path.display());
        return 1;
    }

    if opts.json_output {
        let list: Vec<_> = parsed.records.iter().map(record_json).collect();
        return print_json(&serde_json::json!({
            "file": path.display().to_string(),
            "binary_id": parsed.binary_id,
            "title": parsed.display_name,
            "offset_shift": parsed.offset_shift,
            "records": list,
        }));
    }

    println!(
        "binary id:    {}",
        parsed.binary_id.as_deref().unwrap_or("(missing)")
    );
    println!("title:        {}", parsed.display_name);
    println!("offset shift: {:#X}", parsed.offset_shift);
    println!("records:      {}", parsed.records.len());
    for record in &parsed.records {
        println!(
            "  {:#010X}  {:>5}  {}",
            record.address,
            record.payload.len(),
            hex_preview(&record.payload)
        );
    }

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let opts = resolve_options(cli);

    let level = match opts.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let exit_code = match opts.command {
        Command::Convert => cmd_convert(&opts),
        Command::Inspect => cmd_inspect(&opts),
        Command::Parse => cmd_parse(&opts),
    };

    if opts.pause {
        wait_for_enter();
    }

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
