use std::fmt;

/// Symbolic line speeds supported on every Unix target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaudRate {
    B50,
    B75,
    B110,
    B134,
    B150,
    B200,
    B300,
    B600,
    B1200,
    B1800,
    B2400,
    B4800,
    B9600,
    B19200,
    B38400,
    B57600,
    B115200,
    B230400,
}

impl BaudRate {
    /// Rate programmed by [`SerialLine::open`](crate::SerialLine::open).
    pub const DEFAULT: BaudRate = BaudRate::B9600;

    /// Every variant, slowest first.
    pub const ALL: [BaudRate; 18] = [
        BaudRate::B50,
        BaudRate::B75,
        BaudRate::B110,
        BaudRate::B134,
        BaudRate::B150,
        BaudRate::B200,
        BaudRate::B300,
        BaudRate::B600,
        BaudRate::B1200,
        BaudRate::B1800,
        BaudRate::B2400,
        BaudRate::B4800,
        BaudRate::B9600,
        BaudRate::B19200,
        BaudRate::B38400,
        BaudRate::B57600,
        BaudRate::B115200,
        BaudRate::B230400,
    ];

    /// Bits per second.
    pub fn bps(self) -> u32 {
        match self {
            BaudRate::B50 => 50,
            BaudRate::B75 => 75,
            BaudRate::B110 => 110,
            BaudRate::B134 => 134,
            BaudRate::B150 => 150,
            BaudRate::B200 => 200,
            BaudRate::B300 => 300,
            BaudRate::B600 => 600,
            BaudRate::B1200 => 1200,
            BaudRate::B1800 => 1800,
            BaudRate::B2400 => 2400,
            BaudRate::B4800 => 4800,
            BaudRate::B9600 => 9600,
            BaudRate::B19200 => 19200,
            BaudRate::B38400 => 38400,
            BaudRate::B57600 => 57600,
            BaudRate::B115200 => 115200,
            BaudRate::B230400 => 230400,
        }
    }

    /// Look up the symbolic rate for a numeric bits-per-second value.
    pub fn from_bps(bps: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|rate| rate.bps() == bps)
    }

    /// The platform `speed_t` constant for this rate.
    #[cfg(unix)]
    pub(crate) fn speed(self) -> libc::speed_t {
        match self {
            BaudRate::B50 => libc::B50,
            BaudRate::B75 => libc::B75,
            BaudRate::B110 => libc::B110,
            BaudRate::B134 => libc::B134,
            BaudRate::B150 => libc::B150,
            BaudRate::B200 => libc::B200,
            BaudRate::B300 => libc::B300,
            BaudRate::B600 => libc::B600,
            BaudRate::B1200 => libc::B1200,
            BaudRate::B1800 => libc::B1800,
            BaudRate::B2400 => libc::B2400,
            BaudRate::B4800 => libc::B4800,
            BaudRate::B9600 => libc::B9600,
            BaudRate::B19200 => libc::B19200,
            BaudRate::B38400 => libc::B38400,
            BaudRate::B57600 => libc::B57600,
            BaudRate::B115200 => libc::B115200,
            BaudRate::B230400 => libc::B230400,
        }
    }

    /// Map a `speed_t` read back from the kernel. Rates outside the table yield `None`.
    #[cfg(unix)]
    pub(crate) fn from_speed(speed: libc::speed_t) -> Option<Self> {
        Self::ALL.into_iter().find(|rate| rate.speed() == speed)
    }
}

impl Default for BaudRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bps())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bps_lookup_matches_variants() {
        for rate in BaudRate::ALL {
            assert_eq!(BaudRate::from_bps(rate.bps()), Some(rate));
        }
        assert_eq!(BaudRate::from_bps(12345), None);
    }

    #[test]
    fn default_is_9600() {
        assert_eq!(BaudRate::default().bps(), 9600);
    }

    #[cfg(unix)]
    #[test]
    fn speed_constants_round_trip() {
        assert_eq!(BaudRate::from_speed(libc::B115200), Some(BaudRate::B115200));
        assert_eq!(BaudRate::from_speed(BaudRate::B50.speed()), Some(BaudRate::B50));
    }
}
