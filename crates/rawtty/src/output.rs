use std::io::{IsTerminal, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use rawtty_line::{LineSettings, ReadMode};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ReceivedOutput {
    path: String,
    size: usize,
    payload: String,
    hex: String,
    timestamp: String,
}

#[derive(Serialize)]
struct WrittenOutput {
    path: String,
    requested: usize,
    written: usize,
}

#[derive(Serialize)]
struct SettingsOutput {
    path: String,
    input_baud: Option<u32>,
    output_baud: Option<u32>,
    min_bytes: u8,
    timeout_deciseconds: u8,
    read_mode: &'static str,
    raw: bool,
}

pub fn print_received(data: &[u8], path: &Path, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ReceivedOutput {
                path: path.display().to_string(),
                size: data.len(),
                payload: payload_preview(data),
                hex: hex_string(data),
                timestamp: now_unix_seconds(),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PATH", "SIZE", "PAYLOAD"])
                .add_row(vec![
                    path.display().to_string(),
                    data.len().to_string(),
                    payload_preview(data),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "path={} size={} payload={}",
                path.display(),
                data.len(),
                payload_preview(data)
            );
        }
        OutputFormat::Raw => print_raw(data),
    }
}

pub fn print_written(path: &Path, requested: usize, written: usize, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&WrittenOutput {
            path: path.display().to_string(),
            requested,
            written,
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PATH", "REQUESTED", "WRITTEN"])
                .add_row(vec![
                    path.display().to_string(),
                    requested.to_string(),
                    written.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "path={} requested={requested} written={written}",
                path.display()
            );
        }
        // Raw output is reserved for line data.
        OutputFormat::Raw => {}
    }
}

pub fn print_settings(path: &Path, settings: &LineSettings, format: OutputFormat) {
    let out = SettingsOutput {
        path: path.display().to_string(),
        input_baud: settings.input_baud.map(|b| b.bps()),
        output_baud: settings.output_baud.map(|b| b.bps()),
        min_bytes: settings.timing.min_bytes,
        timeout_deciseconds: settings.timing.timeout_deciseconds,
        read_mode: read_mode_name(settings.timing.mode()),
        raw: settings.is_raw(),
    };

    match format {
        OutputFormat::Json | OutputFormat::Raw => print_json(&out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SETTING", "VALUE"])
                .add_row(vec!["path".to_string(), out.path.clone()])
                .add_row(vec!["input baud".to_string(), baud_text(out.input_baud)])
                .add_row(vec!["output baud".to_string(), baud_text(out.output_baud)])
                .add_row(vec!["min bytes".to_string(), out.min_bytes.to_string()])
                .add_row(vec![
                    "timeout (ds)".to_string(),
                    out.timeout_deciseconds.to_string(),
                ])
                .add_row(vec!["read mode".to_string(), out.read_mode.to_string()])
                .add_row(vec!["raw".to_string(), out.raw.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "path={} baud={} min_bytes={} timeout_ds={} mode={} raw={}",
                out.path,
                baud_text(out.output_baud),
                out.min_bytes,
                out.timeout_deciseconds,
                out.read_mode,
                out.raw
            );
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn read_mode_name(mode: ReadMode) -> &'static str {
    match mode {
        ReadMode::Poll => "poll",
        ReadMode::Blocking => "blocking",
        ReadMode::BoundedAny => "bounded",
        ReadMode::AfterFirstByte => "after-first-byte",
    }
}

fn print_json(value: &impl Serialize) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn baud_text(baud: Option<u32>) -> String {
    baud.map(|b| b.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", payload.len()),
    }
}

fn hex_string(payload: &[u8]) -> String {
    payload.iter().map(|b| format!("{b:02x}")).collect()
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_payloads_are_summarized() {
        assert_eq!(payload_preview(b"OK"), "OK");
        assert_eq!(payload_preview(&[0xff, 0xfe]), "<binary 2 bytes>");
    }

    #[test]
    fn hex_is_lowercase_pairs() {
        assert_eq!(hex_string(&[0x00, 0x1b, 0xff]), "001bff");
    }

    #[test]
    fn read_modes_have_stable_names() {
        assert_eq!(read_mode_name(ReadMode::BoundedAny), "bounded");
        assert_eq!(read_mode_name(ReadMode::AfterFirstByte), "after-first-byte");
    }
}
