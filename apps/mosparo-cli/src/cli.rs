//! Command line parsing.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

/// Usage text printed by `mosparo help`.
pub const USAGE: &str = "\
Usage:
  mosparo verify <FILE|-> [--required <FIELD,...>]
  mosparo stats [--range <SECONDS>] [--start-date <YYYY-MM-DD>]
  mosparo health
  mosparo help

Configuration is read from MOSPARO_URL, MOSPARO_PUBLIC_KEY, MOSPARO_PRIVATE_KEY,
MOSPARO_TIMEOUT_SECS and LOG_LEVEL.";

/// Where the submitted form is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Standard input.
    Stdin,
    /// A JSON file.
    File(PathBuf),
}

/// A parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Verify a submission read from a JSON object.
    Verify {
        /// Source of the form.
        input: Input,
        /// Fields the server must report as verified.
        required_fields: Vec<String>,
    },
    /// Fetch statistics by date.
    Stats {
        /// Seconds to look back.
        range: Option<i64>,
        /// First day to include.
        start_date: Option<NaiveDate>,
    },
    /// Query the server health.
    Health,
}

impl Command {
    /// Parse arguments, excluding the program name.
    ///
    /// Returns `None` when usage was requested or no command was given.
    pub fn parse<I>(args: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let Some(name) = args.next() else {
            return Ok(None);
        };

        let command = match name.as_str() {
            "verify" => parse_verify(args)?,
            "stats" => parse_stats(args)?,
            "health" => no_more_args(args).map(|()| Self::Health)?,
            "help" | "-h" | "--help" => return Ok(None),
            other => bail!("unknown command: {other}"),
        };
        Ok(Some(command))
    }
}

fn parse_verify(mut args: impl Iterator<Item = String>) -> Result<Command> {
    let mut input = None;
    let mut required_fields = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--required" => {
                let list = flag_value(&mut args, "--required")?;
                required_fields.extend(
                    list.split(',')
                        .map(str::trim)
                        .filter(|f| !f.is_empty())
                        .map(str::to_owned),
                );
            }
            "-" if input.is_none() => input = Some(Input::Stdin),
            path if input.is_none() && !path.starts_with("--") => {
                input = Some(Input::File(PathBuf::from(path)));
            }
            other => bail!("unexpected argument for verify: {other}"),
        }
    }

    let input = input.context("verify requires a form file or '-' for stdin")?;
    Ok(Command::Verify {
        input,
        required_fields,
    })
}

fn parse_stats(mut args: impl Iterator<Item = String>) -> Result<Command> {
    let mut range = None;
    let mut start_date = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--range" => {
                let value = flag_value(&mut args, "--range")?;
                range = Some(
                    value
                        .parse::<i64>()
                        .with_context(|| format!("invalid range: {value}"))?,
                );
            }
            "--start-date" => {
                let value = flag_value(&mut args, "--start-date")?;
                start_date = Some(
                    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                        .with_context(|| format!("invalid start date: {value}"))?,
                );
            }
            other => bail!("unexpected argument for stats: {other}"),
        }
    }

    Ok(Command::Stats { range, start_date })
}

fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("{flag} requires a value"))
}

fn no_more_args(mut args: impl Iterator<Item = String>) -> Result<()> {
    match args.next() {
        Some(arg) => bail!("unexpected argument: {arg}"),
        None => Ok(()),
    }
}
