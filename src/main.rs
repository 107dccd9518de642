//! mail-canon - canonical mail serialization CLI
//!
//! Reads one RFC 5322 message from stdin and writes its canonical
//! serialization to stdout.
//!
//! Usage:
//!   mail-canon < message.eml                 JSON output
//!   mail-canon --format block < message.eml  Block-structured output
//!   mail-canon --indent 4 < message.eml      Four-space indentation

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mail_canon::{Error, Format, Layout, RenderOptions, render_message};
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Block,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Self::Json,
            OutputFormat::Block => Self::Block,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "mail-canon", version, about = "Serialize an email into canonical structured text")]
struct Cli {
    /// Output grammar
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Spaces per indentation level
    #[arg(long, default_value_t = 2)]
    indent: usize,
}

/// `RUST_LOG` directives when given and valid, otherwise warnings only
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .init();

    let cli = Cli::parse();

    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .context("Failed to read message from stdin")?;

    if input.is_empty() {
        return Err(Error::EmptyInput.into());
    }

    let options = RenderOptions::new(cli.format.into(), Layout::new(" ".repeat(cli.indent), "\n"));
    let text = render_message(&input, &options).context("Failed to serialize message")?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}").context("Failed to write output")?;
    stdout.flush().context("Failed to flush output")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::log_filter;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_bare_level_is_honored() {
        assert_eq!(log_filter(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_default_is_warn() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(Some("")).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_target_directive_is_honored() {
        assert_eq!(
            log_filter(Some("mail_canon=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }
}
