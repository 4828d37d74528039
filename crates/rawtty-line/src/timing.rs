use std::time::Duration;

use crate::error::{LineError, Result};

/// Which blocking behavior a [`ReadTiming`] pair selects for a single `read(2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// `(0, 0)`: return immediately with whatever is buffered, possibly nothing.
    Poll,
    /// `(N, 0)`: wait indefinitely until N bytes have arrived.
    Blocking,
    /// `(0, T)`: wait up to T deciseconds for at least one byte.
    BoundedAny,
    /// `(N, T)`: wait for N bytes, or T deciseconds after the first byte arrives.
    AfterFirstByte,
}

/// The VMIN/VTIME pair programmed into the line discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadTiming {
    /// Byte count a read waits for (`VMIN`).
    pub min_bytes: u8,
    /// Timer in tenths of a second (`VTIME`).
    pub timeout_deciseconds: u8,
}

impl ReadTiming {
    /// Open-time mode: wait up to half a second for any data.
    pub const DEFAULT: ReadTiming = ReadTiming {
        min_bytes: 0,
        timeout_deciseconds: 5,
    };

    /// Timer used when only `min_bytes` is reconfigured on an open line.
    pub const RECONFIGURE_TIMEOUT_DECISECONDS: u8 = 5;

    pub const fn new(min_bytes: u8, timeout_deciseconds: u8) -> Self {
        Self {
            min_bytes,
            timeout_deciseconds,
        }
    }

    /// Validate caller-supplied values that arrive wider than `cc_t`.
    pub fn checked(min_bytes: i64, timeout_deciseconds: i64) -> Result<Self> {
        let min_bytes = u8::try_from(min_bytes).map_err(|_| {
            LineError::invalid_argument(format!("min_bytes must be 0..=255, got {min_bytes}"))
        })?;
        let timeout = u8::try_from(timeout_deciseconds).map_err(|_| {
            LineError::invalid_argument(format!(
                "timeout_deciseconds must be 0..=255, got {timeout_deciseconds}"
            ))
        })?;
        Ok(Self::new(min_bytes, timeout))
    }

    pub const fn poll() -> Self {
        Self::new(0, 0)
    }

    pub const fn blocking(min_bytes: u8) -> Self {
        Self::new(min_bytes, 0)
    }

    pub const fn bounded(timeout_deciseconds: u8) -> Self {
        Self::new(0, timeout_deciseconds)
    }

    pub const fn after_first_byte(min_bytes: u8, timeout_deciseconds: u8) -> Self {
        Self::new(min_bytes, timeout_deciseconds)
    }

    /// The `(min_bytes, 5)` pair applied by `set_blocking`.
    pub const fn reconfigured(min_bytes: u8) -> Self {
        Self::new(min_bytes, Self::RECONFIGURE_TIMEOUT_DECISECONDS)
    }

    pub fn mode(self) -> ReadMode {
        match (self.min_bytes, self.timeout_deciseconds) {
            (0, 0) => ReadMode::Poll,
            (_, 0) => ReadMode::Blocking,
            (0, _) => ReadMode::BoundedAny,
            (_, _) => ReadMode::AfterFirstByte,
        }
    }

    /// The timer as a duration, or `None` when there is no timer.
    ///
    /// For [`ReadMode::AfterFirstByte`] the timer only starts once a byte has arrived,
    /// so a read with no incoming data can still block indefinitely.
    pub fn max_wait(self) -> Option<Duration> {
        match self.timeout_deciseconds {
            0 => None,
            ds => Some(Duration::from_millis(u64::from(ds) * 100)),
        }
    }
}

impl Default for ReadTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_follow_vmin_vtime_table() {
        assert_eq!(ReadTiming::poll().mode(), ReadMode::Poll);
        assert_eq!(ReadTiming::blocking(4).mode(), ReadMode::Blocking);
        assert_eq!(ReadTiming::bounded(5).mode(), ReadMode::BoundedAny);
        assert_eq!(
            ReadTiming::after_first_byte(4, 5).mode(),
            ReadMode::AfterFirstByte
        );
    }

    #[test]
    fn default_is_half_second_bounded_wait() {
        let timing = ReadTiming::default();
        assert_eq!(timing, ReadTiming::new(0, 5));
        assert_eq!(timing.mode(), ReadMode::BoundedAny);
        assert_eq!(timing.max_wait(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn reconfigured_keeps_half_second_timer() {
        assert_eq!(ReadTiming::reconfigured(0), ReadTiming::DEFAULT);
        assert_eq!(ReadTiming::reconfigured(8), ReadTiming::new(8, 5));
    }

    #[test]
    fn max_wait_is_none_without_timer() {
        assert_eq!(ReadTiming::poll().max_wait(), None);
        assert_eq!(ReadTiming::blocking(4).max_wait(), None);
        assert_eq!(
            ReadTiming::after_first_byte(4, 20).max_wait(),
            Some(Duration::from_secs(2))
        );
    }

    #[test]
    fn checked_rejects_out_of_range() {
        assert_eq!(ReadTiming::checked(3, 7).unwrap(), ReadTiming::new(3, 7));
        assert!(matches!(
            ReadTiming::checked(256, 5),
            Err(LineError::InvalidArgument(_))
        ));
        assert!(matches!(
            ReadTiming::checked(0, -1),
            Err(LineError::InvalidArgument(_))
        ));
    }
}
