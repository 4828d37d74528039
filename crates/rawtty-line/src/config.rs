use crate::baud::BaudRate;
use crate::timing::ReadTiming;

/// Attributes applied when a line is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineConfig {
    /// Input and output speed.
    pub baud: BaudRate,
    /// VMIN/VTIME pair for subsequent reads.
    pub timing: ReadTiming,
}

impl LineConfig {
    pub fn with_baud(mut self, baud: BaudRate) -> Self {
        self.baud = baud;
        self
    }

    pub fn with_timing(mut self, timing: ReadTiming) -> Self {
        self.timing = timing;
        self
    }
}

/// Snapshot of the attributes currently programmed on a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSettings {
    /// `None` when the kernel reports a speed outside [`BaudRate`].
    pub input_baud: Option<BaudRate>,
    pub output_baud: Option<BaudRate>,
    pub timing: ReadTiming,
    /// Whether every raw-mode flag (8N1, no flow control, no line editing) is in effect.
    pub raw: bool,
}

impl LineSettings {
    pub fn is_raw(&self) -> bool {
        self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_9600_half_second() {
        let config = LineConfig::default();
        assert_eq!(config.baud, BaudRate::B9600);
        assert_eq!(config.timing, ReadTiming::new(0, 5));
    }

    #[test]
    fn builders_replace_fields() {
        let config = LineConfig::default()
            .with_baud(BaudRate::B115200)
            .with_timing(ReadTiming::poll());
        assert_eq!(config.baud, BaudRate::B115200);
        assert_eq!(config.timing, ReadTiming::poll());
    }
}
