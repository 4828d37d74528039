use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rawtty_line::ReadMode;
use tracing::{debug, warn};

use crate::cmd::{open_line, RecvArgs};
use crate::exit::{CliError, CliResult, SUCCESS};
use crate::output::{print_received, OutputFormat};

/// Pause between empty drains when the line is in poll mode.
const POLL_IDLE: Duration = Duration::from_millis(20);

pub fn run(args: RecvArgs, format: OutputFormat) -> CliResult<i32> {
    let line = open_line(&args.path, &args.line)?;

    let timing = args.line.to_config()?.timing;
    if matches!(timing.mode(), ReadMode::Blocking | ReadMode::AfterFirstByte) {
        warn!(
            min_bytes = timing.min_bytes,
            "reads wait for data with no upper bound; interrupt may not take effect until bytes arrive"
        );
    }

    let idle = idle_after_empty(timing.mode());

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;
    while running.load(Ordering::SeqCst) {
        let data = line.read();
        if data.is_empty() {
            if let Some(pause) = idle {
                thread::sleep(pause);
            }
            continue;
        }
        debug!(len = data.len(), "drained");

        print_received(&data, &args.path, format);
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count {
                break;
            }
        }
    }

    line.close();
    Ok(SUCCESS)
}

/// Every mode except poll already waits inside `read(2)` before returning empty.
fn idle_after_empty(mode: ReadMode) -> Option<Duration> {
    match mode {
        ReadMode::Poll => Some(POLL_IDLE),
        ReadMode::Blocking | ReadMode::BoundedAny | ReadMode::AfterFirstByte => None,
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use rawtty_line::ReadTiming;

    use super::*;

    #[test]
    fn only_poll_mode_pauses_between_drains() {
        assert_eq!(idle_after_empty(ReadTiming::poll().mode()), Some(POLL_IDLE));
        assert_eq!(idle_after_empty(ReadTiming::DEFAULT.mode()), None);
        assert_eq!(idle_after_empty(ReadTiming::blocking(4).mode()), None);
        assert_eq!(idle_after_empty(ReadTiming::after_first_byte(4, 5).mode()), None);
    }
}
