/*
 * SPDX-FileCopyrightText: 2026 The sparse-heatmap developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Command-line interface structs, functions, and methods.

use crate::build_info;
use crate::ingest::read_entries;
use crate::render::{save_heatmap, RenderOptions};
use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{value_parser, Args, Command, FromArgMatches};
use jiff::fmt::friendly::{Designator, Spacing, SpanPrinter};
use jiff::SpanRound;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

pub const COMMAND_NAME: &str = "sparse-heatmap";

/// Shared CLI arguments for the size of the rendered image.
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderArgs {
    #[arg(long, default_value_t = 640, value_parser = value_parser!(u32).range(1..))]
    /// The width of the image in pixels.
    pub width: u32,

    #[arg(long, default_value_t = 480, value_parser = value_parser!(u32).range(1..))]
    /// The height of the image in pixels.
    pub height: u32,
}

impl From<RenderArgs> for RenderOptions {
    fn from(value: RenderArgs) -> Self {
        RenderOptions {
            width: value.width,
            height: value.height,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct CliArgs {
    /// The text file containing the matrix, one `<row> <col> <value>` triplet
    /// per line.
    pub input_file: PathBuf,

    /// The image to write; the extension selects the format (png, jpg, bmp,
    /// gif, tiff, tga, ico, pnm, or svg).
    pub output_file: PathBuf,

    #[clap(flatten)]
    pub render: RenderArgs,
}

/// Builds the top-level command.
pub fn cli() -> Command {
    let command = Command::new(COMMAND_NAME)
        .about("Renders a sparse matrix, given as (row, column, value) triplets, as a heatmap image.")
        .version(build_info::version_string())
        .after_help(
            "Environment (noteworthy environment variables used):
RUST_LOG: configuration for env_logger, pass `info` (the default) to see the
  progress of the ingestion, `debug` to see more details, and `warn` to keep
  only warnings and errors.
",
        );
    CliArgs::augment_args(command)
}

/// Parses the command-line arguments, including the program name.
pub fn parse_args<I, T>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = cli().try_get_matches_from(args)?;
    CliArgs::from_arg_matches(&matches)
}

/// Whether a parsing error should be reported as a usage error (as opposed to
/// a request for help or for the version).
pub fn is_usage_error(err: &clap::Error) -> bool {
    !matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

/// Reads the matrix, materializes it, and writes the heatmap.
///
/// Nothing is written if the input cannot be read or parsed.
pub fn run(args: CliArgs) -> Result<()> {
    let entries = read_entries(&args.input_file)?;
    let matrix = entries.to_dense().with_context(|| {
        format!(
            "Could not build the matrix of {}",
            args.input_file.display()
        )
    })?;
    save_heatmap(&matrix, &args.output_file, &args.render.into())?;
    log::info!("Heatmap written to {}", args.output_file.display());
    Ok(())
}

/// Formats a duration in compact form (e.g., `1m3s250ms`).
fn format_span(elapsed: Duration) -> Result<String> {
    let printer = SpanPrinter::new()
        .spacing(Spacing::None)
        .designator(Designator::Compact);
    let span_round = SpanRound::new()
        .largest(jiff::Unit::Day)
        .smallest(jiff::Unit::Millisecond)
        .days_are_24_hours();
    let span = jiff::Span::new()
        .seconds(elapsed.as_secs() as i64)
        .milliseconds(elapsed.subsec_millis() as i64)
        .round(span_round)?;
    Ok(printer.span_to_string(&span))
}

/// Installs a logger writing to standard error, filtered by `RUST_LOG`
/// (default `info`).
///
/// Each line carries the wall-clock time, the time elapsed since the logger
/// was installed, and the level; the module path is shown only for records
/// coming from other crates.
pub fn init_envlogger() -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let start = std::time::Instant::now();
    builder.format(move |buf, record| {
        let Ok(ts) = jiff::Timestamp::try_from(SystemTime::now()) else {
            return Err(std::io::Error::other("Failed to get timestamp"));
        };
        let style = buf.default_level_style(record.level());
        let span = format_span(start.elapsed()).map_err(std::io::Error::other)?;
        write!(
            buf,
            "{} [+{}] {style}{:<5}{style:#} ",
            ts.strftime("%T%.3f"),
            span,
            record.level(),
        )?;
        if !record.target().starts_with(env!("CARGO_CRATE_NAME")) {
            write!(buf, "({}) ", record.target())?;
        }
        writeln!(buf, "{}", record.args())
    });
    builder.try_init()?;
    Ok(())
}

/// The entry point of the command-line interface.
///
/// On a usage error, prints the usage message to standard output and exits
/// with status 1.
pub fn main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();

    let args = match parse_args(args) {
        Ok(args) => args,
        Err(err) if is_usage_error(&err) => {
            println!("{}", cli().render_usage());
            std::process::exit(1);
        }
        Err(err) => err.exit(),
    };

    run(args)?;

    log::info!("The command took {}", format_span(start.elapsed())?);
    Ok(())
}
