//! Lumen CLI - runs Lumen scripts from the command line.
//!
//! Parses arguments with clap, wires up tracing, builds a
//! [`lumen_rt::Context`] with the standard native modules already
//! registered, evaluates the given script (or a fixed hello-world
//! program if no path is given), and invokes its `Main()` entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser;
use lumen_heap::Value;
use lumen_rt::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const HELLO_WORLD: &str = r#"void Main() { io.WriteLine("Hello, world!"); }"#;

/// Lumen - run an embeddable scripting language from the command line.
#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run Lumen scripts", long_about = None)]
struct Cli {
    /// Script file to run. Runs a fixed hello-world program if omitted.
    script: Option<PathBuf>,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true, env = "LUMEN_VERBOSE")]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose { EnvFilter::new("debug") } else { EnvFilter::new("info") };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .context("failed to initialize logging")
}

fn run(cli: Cli) -> Result<()> {
    let mut ctx = Context::new().context("failed to initialize runtime")?;

    match &cli.script {
        Some(path) => {
            tracing::debug!(path = %path.display(), "evaluating script");
            ctx.eval_file(path).with_context(|| format!("failed to run {}", path.display()))?;
        }
        None => {
            tracing::debug!("no script given, running the built-in hello-world program");
            ctx.eval_string(HELLO_WORLD).context("failed to run the built-in program")?;
        }
    }

    match ctx.call("Main()", &[]).context("failed to call `Main()`")? {
        Some(value) => print_value(&value, &ctx),
        None => {}
    }
    Ok(())
}

fn print_value(value: &Value, ctx: &Context) {
    match value {
        Value::Unit => println!("()"),
        Value::Bool(b) => println!("{b}"),
        Value::Int(i) => println!("{i}"),
        Value::Float(f) => println!("{f}"),
        Value::Str(s) => println!("{}", ctx.pool().as_str(*s)),
        Value::Obj(_) => println!("<object>"),
    }
}
