mod error;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use profsel_core::{tokenize, Query};
use std::io::{self, BufRead, Read, Write};
use tracing::debug;

use crate::error::Result;
use crate::output::{write_query, write_suggestions, write_tokens, Format};

#[derive(Parser, Debug)]
#[command(name = "profsel")]
#[command(about = "Parse profile selectors and suggest what to type next")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    /// Log level used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a selector, recovering what it can from incomplete input
    Parse {
        /// Selector text; read from stdin when omitted
        input: Option<String>,
    },
    /// List valid continuations of a partial selector
    Suggest {
        /// Selector text; read from stdin when omitted
        input: Option<String>,
    },
    /// Show the lexer's tokens
    Tokens {
        /// Selector text; read from stdin when omitted
        input: Option<String>,
    },
    /// Read selectors line by line and print suggestions for each
    Repl,
}

/// The argument, or all of stdin without its trailing newline
fn read_input(input: Option<String>) -> Result<String> {
    if let Some(input) = input {
        return Ok(input);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    let trimmed = buf.trim_end_matches(['\n', '\r']).len();
    buf.truncate(trimmed);
    Ok(buf)
}

fn repl(format: Format) -> Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        let query = Query::parse(&line);
        write_query(&mut out, &query, format)?;
        write_suggestions(&mut out, &Query::suggest(&line), format)?;
        out.flush()?;
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let format = args.format;
    let mut out = io::stdout().lock();

    match args.command {
        Command::Parse { input } => {
            let input = read_input(input)?;
            debug!(input = %input, "parse");
            write_query(&mut out, &Query::parse(&input), format)?;
        }
        Command::Suggest { input } => {
            let input = read_input(input)?;
            debug!(input = %input, "suggest");
            write_suggestions(&mut out, &Query::suggest(&input), format)?;
        }
        Command::Tokens { input } => {
            let input = read_input(input)?;
            write_tokens(&mut out, &tokenize(&input), format)?;
        }
        Command::Repl => {
            drop(out);
            repl(format)?;
        }
    }
    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init_with_filter(&args.log_level);
    debug!(version = env!("CARGO_PKG_VERSION"), "profsel starting");

    run(args)?;
    Ok(())
}
