//! # CLI Module
//!
//! `lux-local` runs API Gateway proxy events through a dispatcher without any
//! network or runtime: each input line is one event, each output line the
//! JSON response for it. Logs go to stderr.
//!
//! ```bash
//! echo '{"httpMethod":"GET","path":"/pets"}' | lux-local
//! lux-local --events events.jsonl --log-format pretty --token s3cret
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use lux::cli::run_cli;
//!
//! run_cli()?;
//! ```

mod commands;

pub use commands::{build_dispatcher, run_cli, run_events, Cli, TOKEN_HEADER};
