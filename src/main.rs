//! CLI entry point: argument parsing and dispatch.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use rangelink::commands::{self, CliPosition};
use rangelink::diagnostics;
use rangelink::types::RangeNotation;

#[derive(Parser)]
#[command(name = "rangelink", about = "Parse, format, and detect file#line-range links")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Position-notation choice for the format command.
#[derive(Clone, Copy, clap::ValueEnum)]
enum NotationArg {
    /// Line-only when the selection covers full lines.
    Auto,
    /// Always line-only.
    FullLine,
    /// Always with character positions.
    Positions,
}

impl From<NotationArg> for RangeNotation {
    /// Map the CLI flag onto the library policy.
    fn from(arg: NotationArg) -> Self {
        return match arg {
            NotationArg::Auto => RangeNotation::Auto,
            NotationArg::FullLine => RangeNotation::EnforceFullLine,
            NotationArg::Positions => RangeNotation::EnforcePositions,
        };
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a link and print its structure as JSON
    Parse {
        /// The link to parse, e.g. `src/auth.ts#L42C10-L58C25`
        link: String,
    },
    /// Scan text for links and print them as JSON
    Scan {
        /// File to scan; reads stdin when omitted
        file: Option<PathBuf>,
        /// Emit scan counters to stderr
        #[arg(long)]
        verbose: bool,
    },
    /// Build a link from a path and 1-indexed positions
    Format {
        /// Target file path as it should appear in the link
        path: String,
        /// Start position, `LINE` or `LINE:CHAR`
        #[arg(value_parser = commands::parse_cli_position)]
        start: CliPosition,
        /// End position, `LINE` or `LINE:CHAR`; defaults to the start line
        #[arg(value_parser = commands::parse_cli_position)]
        end: Option<CliPosition>,
        /// Position notation policy
        #[arg(long, value_enum, default_value = "auto")]
        notation: NotationArg,
        /// Append the portable delimiter trailer
        #[arg(long)]
        portable: bool,
        /// Emit generation details to stderr
        #[arg(long)]
        verbose: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { link } => commands::parse(&link),
        Commands::Scan { file, verbose } => commands::scan(file.as_ref(), verbose),
        Commands::Format {
            path,
            start,
            end,
            notation,
            portable,
            verbose,
        } => commands::format(&path, start, end, notation.into(), portable, verbose),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}
