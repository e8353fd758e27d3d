mod debug_report;

use clap::Parser;
use rpl_facts::{FactsAssembler, FactsStore, Options, RunningConfig, parse_verbose_with};
use serde::Serialize;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Turn IOS-XR route-policy configuration into structured `route_maps` facts.
///
/// Reads aggregate running-config text (every `route-policy ... end-policy`
/// block) and prints the facts as JSON. Logging goes to stderr and follows
/// `RUST_LOG` (default `warn`).
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file. Reads stdin when omitted or `-`.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Reject `elseif` / `else` lines with no preceding branch in their scope.
    #[arg(long)]
    strict: bool,

    /// Print the segmented block tree of every policy instead of facts.
    #[arg(long, conflicts_with = "verbose")]
    tree: bool,

    /// Print a per-policy report (rule hits, unrecognized lines, timing).
    #[arg(short, long)]
    verbose: bool,

    /// Force ANSI colour in the verbose report.
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable ANSI colour in the verbose report.
    #[arg(long)]
    no_color: bool,

    /// Pretty-print JSON output.
    #[arg(short, long)]
    pretty: bool,
}

#[derive(Serialize)]
struct TreeEntry<'a> {
    name: &'a str,
    body: &'a rpl_facts::Scope,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let text = match read_input(cli.input.as_ref()) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    match run(&cli, &text) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = std::error::Error::source(&*err);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let options = Options { strict_branches: cli.strict };

    if cli.verbose {
        let details = parse_verbose_with(text, &options)?;
        let color = if cli.no_color { false } else { cli.color || io::stdout().is_terminal() };
        debug_report::print_run(&details, color);
        return Ok(());
    }

    if cli.tree {
        let traces = FactsAssembler::new(&options).collect(&mut RunningConfig::new(text), None)?;
        let entries: Vec<TreeEntry<'_>> = traces.iter().map(|t| TreeEntry { name: &t.name, body: &t.scope }).collect();
        return print_json(&entries, cli.pretty);
    }

    let mut store = FactsStore::new();
    FactsAssembler::new(&options).populate(&mut RunningConfig::new(text), &mut store, None)?;
    print_json(&store, cli.pretty)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    let out = if pretty { serde_json::to_string_pretty(value)? } else { serde_json::to_string(value)? };
    println!("{out}");
    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path),
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(io::stderr).init();
}
