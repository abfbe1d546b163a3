//! quote-fill - fill a quote template from a JSON request
//!
//! Reads `{"templatePath", "outputPath", "quoteData"}` on stdin and prints
//! `{"success":true,"file":...}` or `{"error":...}` on stdout. The exit status
//! is 0 either way; logs go to stderr.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use quote_sheets::{QuoteFiller, Response, TemplateLayout};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "quote-fill")]
#[command(
    author,
    version,
    about = "Fill a spreadsheet quote template from a JSON request read on stdin"
)]
struct Cli {
    /// TOML file overriding sheet names and cell positions
    #[arg(short, long)]
    layout: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let response = run(&cli);
    let json = response.to_json().context("Failed to encode response")?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json).context("Failed to write response")?;
    stdout.flush().context("Failed to write response")?;
    Ok(())
}

/// Everything that can fail ends up in the response
fn run(cli: &Cli) -> Response {
    let layout = match &cli.layout {
        Some(path) => match TemplateLayout::load(path) {
            Ok(layout) => layout,
            Err(err) => return Response::error(err),
        },
        None => TemplateLayout::default(),
    };

    let mut input = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut input) {
        return Response::error(format!("Invalid JSON input: {}", err));
    }

    QuoteFiller::new(layout).handle_json(&input)
}

/// stderr only: stdout carries the JSON response
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_flags() {
        let cli = Cli::try_parse_from(["quote-fill", "--layout", "layout.toml", "-v"]).unwrap();
        assert_eq!(cli.layout, Some(PathBuf::from("layout.toml")));
        assert!(cli.verbose);

        let cli = Cli::try_parse_from(["quote-fill"]).unwrap();
        assert!(cli.layout.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_unreadable_layout_is_a_json_error() {
        let cli = Cli {
            layout: Some(PathBuf::from("/nonexistent/layout.toml")),
            verbose: false,
        };
        let response = run(&cli);
        assert!(!response.is_success());
        assert!(response
            .to_json()
            .unwrap()
            .starts_with(r#"{"error":"Invalid layout: cannot read /nonexistent/layout.toml"#));
    }
}
