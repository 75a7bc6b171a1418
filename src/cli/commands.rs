use crate::{
    dispatcher::Dispatcher,
    echo::echo_handler,
    gateway::Request,
    logging::{init_logging, LogConfig, LogFormat},
    middleware::AuthMiddleware,
};
use anyhow::{Context, Result};
use clap::Parser;
use http::Method;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::info;

/// Header checked when a token is configured
pub const TOKEN_HEADER: &str = "x-api-key";

/// Command-line interface for the local invocation harness
#[derive(Parser, Debug)]
#[command(name = "lux-local")]
#[command(about = "Dispatch API Gateway proxy events through echo routes", long_about = None)]
pub struct Cli {
    /// File with one JSON event per line (reads stdin when omitted)
    #[arg(short, long)]
    pub events: Option<PathBuf>,

    /// Log output format (overrides LUX_LOG_FORMAT)
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Require this token in the `x-api-key` header
    #[arg(long, env = "LUX_API_TOKEN")]
    pub token: Option<String>,
}

/// Build the dispatcher used by the harness.
///
/// Every common method echoes the request back; `DELETE` additionally requires
/// `?confirm=true`.
#[must_use]
pub fn build_dispatcher(token: Option<&str>) -> Dispatcher {
    let mut dispatcher = Dispatcher::new();

    for method in [Method::GET, Method::POST, Method::PUT, Method::PATCH] {
        dispatcher.handler(method, echo_handler);
    }
    dispatcher
        .handler(Method::DELETE, echo_handler)
        .queries(["confirm", "true"]);

    if let Some(token) = token {
        dispatcher.middleware(AuthMiddleware::new(TOKEN_HEADER, token));
    }

    dispatcher
}

/// Dispatch every event line from `input`, writing one JSON response per line.
///
/// Blank lines are skipped. Returns the number of events handled.
///
/// # Errors
///
/// Fails on unreadable input, a line that is not a valid event, or a failed
/// write to `out`.
pub fn run_events<R: BufRead, W: Write>(dispatcher: &Dispatcher, input: R, mut out: W) -> Result<usize> {
    let mut handled = 0;

    for (idx, line) in input.lines().enumerate() {
        let line = line.context("Failed to read event")?;
        if line.trim().is_empty() {
            continue;
        }

        let req: Request = serde_json::from_str(&line)
            .with_context(|| format!("Invalid event on line {}", idx + 1))?;
        let resp = dispatcher.handle(&req)?;

        serde_json::to_writer(&mut out, &resp).context("Failed to write response")?;
        writeln!(out).context("Failed to write response")?;
        handled += 1;
    }

    out.flush().context("Failed to flush responses")?;
    Ok(handled)
}

/// Parse arguments, set up logging and run the harness.
///
/// # Errors
///
/// Propagates logging setup, input and output failures.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let mut config = LogConfig::from_env();
    if let Some(format) = cli.log_format {
        config.format = format;
    }
    init_logging(&config)?;

    let dispatcher = build_dispatcher(cli.token.as_deref());
    let stdout = io::stdout();

    let handled = match &cli.events {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            run_events(&dispatcher, BufReader::new(file), stdout.lock())?
        }
        None => run_events(&dispatcher, io::stdin().lock(), stdout.lock())?,
    };

    info!(events = handled, "local invocation complete");
    Ok(())
}
