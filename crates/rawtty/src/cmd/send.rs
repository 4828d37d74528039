use std::fs;

use rawtty_line::Payload;
use tracing::warn;

use crate::cmd::{open_line, SendArgs};
use crate::exit::{line_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_received, print_written, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;
    let line = open_line(&args.path, &args.line)?;

    let requested = payload.len();
    let written = match &payload {
        OwnedPayload::Text(text) => line.write(Payload::Text(text)),
        OwnedPayload::Bytes(bytes) => line.write(Payload::Bytes(bytes)),
    }
    .map_err(|err| line_error("write failed", err))?;

    if written < requested {
        warn!(written, requested, "partial write");
    }
    print_written(&args.path, requested, written, format);

    if args.wait {
        let reply = line.read();
        print_received(&reply, &args.path, format);
    }

    line.close();
    Ok(SUCCESS)
}

#[derive(Debug, PartialEq, Eq)]
enum OwnedPayload {
    Text(String),
    Bytes(Vec<u8>),
}

impl OwnedPayload {
    fn len(&self) -> usize {
        match self {
            OwnedPayload::Text(text) => text.len(),
            OwnedPayload::Bytes(bytes) => bytes.len(),
        }
    }
}

fn resolve_payload(args: &SendArgs) -> CliResult<OwnedPayload> {
    if let Some(data) = &args.data {
        return Ok(OwnedPayload::Text(data.clone()));
    }
    if let Some(hex) = &args.hex {
        return parse_hex(hex).map(OwnedPayload::Bytes);
    }
    if let Some(path) = &args.file {
        return fs::read(path).map(OwnedPayload::Bytes).map_err(|err| {
            crate::exit::io_error(&format!("failed reading {}", path.display()), err)
        });
    }
    Ok(OwnedPayload::Bytes(Vec::new()))
}

fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let digits: Vec<u8> = input
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        return Err(CliError::new(
            DATA_INVALID,
            "--hex must contain an even number of digits",
        ));
    }

    digits
        .chunks(2)
        .map(|pair| {
            let text = std::str::from_utf8(pair).unwrap_or("??");
            u8::from_str_radix(text, 16)
                .map_err(|_| CliError::new(DATA_INVALID, format!("invalid hex byte: {text}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::cmd::LineArgs;

    fn args() -> SendArgs {
        SendArgs {
            path: PathBuf::from("/dev/null"),
            data: None,
            hex: None,
            file: None,
            wait: false,
            line: LineArgs {
                baud: 9600,
                min_bytes: 0,
                timeout_ds: 5,
            },
        }
    }

    #[test]
    fn parse_hex_accepts_spaced_pairs() {
        assert_eq!(parse_hex("4b 78 0D").unwrap(), vec![0x4b, 0x78, 0x0d]);
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn parse_hex_rejects_bad_input() {
        assert_eq!(parse_hex("abc").unwrap_err().code, DATA_INVALID);
        assert_eq!(parse_hex("zz").unwrap_err().code, DATA_INVALID);
    }

    #[test]
    fn text_and_hex_payloads_match_on_the_wire() {
        let mut text = args();
        text.data = Some("Kx".to_string());
        let mut hex = args();
        hex.hex = Some("4b78".to_string());

        let text = resolve_payload(&text).unwrap();
        let hex = resolve_payload(&hex).unwrap();
        let wire = |p: &OwnedPayload| match p {
            OwnedPayload::Text(t) => t.as_bytes().to_vec(),
            OwnedPayload::Bytes(b) => b.clone(),
        };
        assert_eq!(wire(&text), wire(&hex));
    }

    #[test]
    fn missing_payload_is_empty_write() {
        assert_eq!(resolve_payload(&args()).unwrap().len(), 0);
    }
}
