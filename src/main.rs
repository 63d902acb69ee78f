use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{warn, Level};

use sievers_interp::store::script_io::{load_message, load_script};
use sievers_interp::{
    apply_all, telemetry, Interpreter, LoggingDispatcher, MessageMail, Registries, RegistryConfig,
};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT"),
    ", built ",
    env!("BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "sievers-interp")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Run a SIEVE filter against a mail message", long_about = None)]
struct Cli {
    /// SIEVE script to run
    script: PathBuf,

    /// RFC 5322 message file, or `-` for stdin
    message: Option<PathBuf>,

    /// Registry configuration (default: <config dir>/registry.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Envelope sender, for the `envelope` test
    #[arg(long)]
    envelope_from: Option<String>,

    /// Envelope recipient, for the `envelope` test (repeatable)
    #[arg(long)]
    envelope_to: Vec<String>,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Only compile and validate the script
    #[arg(long)]
    check: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(if cli.verbose { Level::DEBUG } else { Level::WARN });

    let config = match &cli.config {
        Some(path) => RegistryConfig::load(path)
            .with_context(|| format!("loading registry configuration {}", path.display()))?,
        None => RegistryConfig::load_default().context("loading default registry configuration")?,
    };
    let registries = Registries::from_config(&config).context("building registries")?;
    let interpreter = Interpreter::new(Arc::new(registries));

    let source = load_script(&cli.script)
        .with_context(|| format!("reading script {}", cli.script.display()))?;
    let commands = interpreter
        .compile(&source)
        .with_context(|| format!("compiling {}", cli.script.display()))?;

    if cli.check {
        println!("{}: ok", cli.script.display());
        return Ok(());
    }

    let message_path = cli
        .message
        .context("a message is required unless --check is given")?;
    let raw = load_message(&message_path)
        .with_context(|| format!("reading message {}", message_path.display()))?;
    let mut mail = MessageMail::parse(&raw)
        .with_context(|| format!("parsing message {}", message_path.display()))?;
    if let Some(from) = cli.envelope_from {
        mail = mail.with_envelope_from(from);
    }
    for to in cli.envelope_to {
        mail = mail.with_envelope_to(to);
    }

    let outcome = match interpreter.execute(&commands, &mail) {
        Ok(outcome) => outcome,
        Err(failure) => {
            warn!(actions = ?failure.actions, "discarding partial actions");
            return Err(failure).context("running script");
        }
    };

    apply_all(&mut LoggingDispatcher::new(), &outcome.actions, &mail)
        .context("applying actions")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if outcome.actions.is_empty() {
        println!("keep;  # implicit");
    } else {
        for action in &outcome.actions {
            println!("{action}");
        }
    }
    Ok(())
}
