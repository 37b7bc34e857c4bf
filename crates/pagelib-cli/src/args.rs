//! Command line arguments

use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: pagelib <input.html> [--config <config.json>] [--output <output.html>]

Collapses tables and turns images into lazy-load placeholders, then writes
the resulting HTML to the output file or stdout.

Options:
  -c, --config <file>   Transform settings (JSON)
  -o, --output <file>   Write here instead of stdout
  -h, --help            Show this message

Log verbosity follows RUST_LOG (default: info).";

/// Argument errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgsError {
    #[error("missing input file\n\n{USAGE}")]
    MissingInput,

    #[error("option {0} needs a value")]
    MissingValue(String),

    #[error("unknown option {0}")]
    UnknownOption(String),

    #[error("unexpected argument {0}")]
    UnexpectedArgument(String),
}

/// A prerender run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// What the command line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Prerender(Args),
    Help,
}

impl Command {
    /// Parse arguments, program name excluded
    pub fn parse<I>(args: I) -> Result<Self, ArgsError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let mut input = None;
        let mut config = None;
        let mut output = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Command::Help),
                "-c" | "--config" => {
                    config = Some(args.next().ok_or_else(|| ArgsError::MissingValue(arg.clone()))?.into());
                }
                "-o" | "--output" => {
                    output = Some(args.next().ok_or_else(|| ArgsError::MissingValue(arg.clone()))?.into());
                }
                flag if flag.starts_with('-') && flag != "-" => {
                    return Err(ArgsError::UnknownOption(arg));
                }
                _ if input.is_none() => input = Some(PathBuf::from(arg)),
                _ => return Err(ArgsError::UnexpectedArgument(arg)),
            }
        }

        let input = input.ok_or(ArgsError::MissingInput)?;
        Ok(Command::Prerender(Args { input, config, output }))
    }
}
