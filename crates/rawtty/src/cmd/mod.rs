use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use rawtty_line::{BaudRate, LineConfig, ReadTiming, SerialLine};

use crate::exit::{line_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod info;
pub mod recv;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write one payload to a line.
    Send(SendArgs),
    /// Drain a line repeatedly and print what arrives.
    Recv(RecvArgs),
    /// Open a line and print the attributes now in effect.
    Info(InfoArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args, format),
        Command::Recv(args) => recv::run(args, format),
        Command::Info(args) => info::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Line attributes shared by every subcommand that opens a device.
#[derive(Args, Debug, Clone)]
pub struct LineArgs {
    /// Line speed in bits per second.
    #[arg(long, default_value_t = 9600)]
    pub baud: u32,
    /// Bytes a single read waits for (VMIN).
    #[arg(long, default_value_t = 0)]
    pub min_bytes: u8,
    /// Read timer in tenths of a second (VTIME).
    #[arg(long = "timeout-ds", default_value_t = 5)]
    pub timeout_ds: u8,
}

impl LineArgs {
    pub fn to_config(&self) -> CliResult<LineConfig> {
        let baud = BaudRate::from_bps(self.baud)
            .ok_or_else(|| CliError::new(USAGE, format!("unsupported baud rate: {}", self.baud)))?;
        Ok(LineConfig {
            baud,
            timing: ReadTiming::new(self.min_bytes, self.timeout_ds),
        })
    }
}

pub fn open_line(path: &Path, line: &LineArgs) -> CliResult<SerialLine> {
    let config = line.to_config()?;
    SerialLine::open_with_config(path, &config).map_err(|err| line_error("open failed", err))
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Device path to open.
    pub path: PathBuf,
    /// String payload, written as UTF-8.
    #[arg(long, conflicts_with_all = ["hex", "file"])]
    pub data: Option<String>,
    /// Hex-encoded payload (e.g. 4b780d).
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub hex: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with_all = ["data", "hex"])]
    pub file: Option<PathBuf>,
    /// Drain the line once after writing and print the reply.
    #[arg(long)]
    pub wait: bool,
    #[command(flatten)]
    pub line: LineArgs,
}

#[derive(Args, Debug)]
pub struct RecvArgs {
    /// Device path to open.
    pub path: PathBuf,
    /// Exit after printing N non-empty drains.
    #[arg(long)]
    pub count: Option<usize>,
    #[command(flatten)]
    pub line: LineArgs,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Device path to open.
    pub path: PathBuf,
    #[command(flatten)]
    pub line: LineArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_args(baud: u32) -> LineArgs {
        LineArgs {
            baud,
            min_bytes: 2,
            timeout_ds: 9,
        }
    }

    #[test]
    fn line_args_build_config() {
        let config = line_args(115200).to_config().unwrap();
        assert_eq!(config.baud, BaudRate::B115200);
        assert_eq!(config.timing, ReadTiming::new(2, 9));
    }

    #[test]
    fn unsupported_baud_is_usage_error() {
        let err = line_args(12345).to_config().unwrap_err();
        assert_eq!(err.code, USAGE);
    }
}
